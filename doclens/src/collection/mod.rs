//! Documents and the read options applied to collections.
//!
//! A `Document` is a key-value map where keys are strings and values are
//! `Value`s. Nested fields are addressed with the `.` separator.
//!
//! ```rust
//! use doclens::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.put("name", "Alice").unwrap();
//! doc.put("address.city", "New York").unwrap();
//! assert!(doc.contains_field("address.city"));
//! ```
//!
//! `FindOptions` (sort, skip, limit) and `Pagination` describe which window of
//! a collection a read returns; `Page` is the window handed back.

mod document;
mod find_options;
mod pagination;

pub use document::*;
pub use find_options::*;
pub use pagination::*;
