//! Predicates selecting documents from a collection.
//!
//! Filters are built with a fluent API and evaluated against documents by
//! in-memory stores. Every node also describes itself through
//! [FilterProvider], so a store backed by a real database can translate the
//! tree into its own query language instead of evaluating it.
//!
//! ```rust
//! use doclens::doc;
//! use doclens::filter::{all, field};
//!
//! let filter = field("age").gt(30).and(field("status").eq("active"));
//! assert!(filter.apply(&doc! { age: 31, status: "active" }).unwrap());
//!
//! assert!(all().apply(&doc! {}).unwrap());
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `eq`, `in`, `nin`
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`
//! - **Pattern**: `regex`, wildcard
//! - **Presence**: `exists`
//! - **Logical**: `and`

mod filter;
mod fluent;

mod basic_filters;
mod logical_filters;
mod pattern_filters;
mod range_filters;

pub(crate) use basic_filters::*;
pub use filter::*;
pub use fluent::*;
pub(crate) use logical_filters::*;
pub use pattern_filters::*;
pub(crate) use range_filters::*;
