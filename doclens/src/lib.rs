//! # doclens - Schema-less Collection Access
//!
//! doclens exposes the collections of a document store as queryable,
//! introspectable resources. It lists collections, pages and sorts through
//! documents, filters them with a small operator algebra, enumerates
//! distinct field values and infers a structural schema from a sample of
//! documents.
//!
//! ## Quick Start
//!
//! ```rust
//! use doclens::accessor::CollectionAccessor;
//! use doclens::common::SortOrder;
//! use doclens::doc;
//! use doclens::query::FilterSpec;
//! use doclens::store::memory::InMemoryStore;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! store.insert_many("orders", vec![
//!     doc! { customer: "John", total: 120.5, status: "shipped" },
//!     doc! { customer: "Jim", total: 35.0, status: "pending" },
//! ])?;
//!
//! let accessor = CollectionAccessor::builder().store(store).build()?;
//!
//! // paging and sorting
//! let page = accessor.get_page("orders", 0, 20, Some("total"), SortOrder::Descending)?;
//! assert_eq!(page.total, 2);
//!
//! // searching
//! let criteria = FilterSpec::from_json(json!({ "customer": "jo*", "total": { "$gt": 100 } }))?;
//! assert_eq!(accessor.search("orders", &criteria, 0, 20)?.total, 1);
//!
//! // introspection
//! let schema = accessor.get_schema("orders", 100)?;
//! assert!(schema.schema["total"].numeric);
//! let statuses = accessor.get_distinct_values("orders", "status")?;
//! assert_eq!(statuses.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Pattern
//!
//! The accessor, its configuration and the store are PIMPL handles: each
//! wraps an `Arc` so clones are cheap and share state across threads.
//!
//! ## Module Organization
//!
//! - [`accessor`] - Collection reads, search, distinct values and schema
//! - [`accessor_builder`] - Builder for the accessor
//! - [`accessor_config`] - Accessor configuration
//! - [`collection`] - Documents, find options and pagination
//! - [`common`] - Values, sort order and shared utilities
//! - [`envelope`] - JSON response bodies
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Filters and filter providers
//! - [`query`] - Search criteria and their translation into filters
//! - [`schema`] - Schema inference
//! - [`store`] - Backend abstraction and the in-memory backend

pub mod accessor;
pub mod accessor_builder;
pub mod accessor_config;
pub mod collection;
pub mod common;
pub mod envelope;
pub mod errors;
pub mod filter;
pub mod query;
pub mod schema;
pub mod store;
