//! Common types shared by every layer: values, sort direction and the field
//! separator.

mod sort_order;
mod value;

pub use sort_order::*;
pub use value::*;

/// Separator between the segments of an embedded field path (`address.city`).
pub const FIELD_SEPARATOR: &str = ".";
