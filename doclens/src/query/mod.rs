//! Translation of caller-supplied search criteria into filters.
//!
//! A [FilterSpec] is the request-shaped description of a search; the
//! [QueryBuilder] turns it into a backend-neutral [crate::filter::Filter].

mod filter_spec;
mod query_builder;

pub use filter_spec::*;
pub use query_builder::*;
