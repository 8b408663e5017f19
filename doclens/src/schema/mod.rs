//! Structural schema inference over a sample of documents.

mod field_info;
mod inferencer;

pub use field_info::*;
pub use inferencer::*;
