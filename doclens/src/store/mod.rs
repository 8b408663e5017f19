//! Document backends.
//!
//! The accessor reaches its backend only through [DocumentStoreProvider],
//! wrapped in the clonable [DocumentStore] handle. The crate ships one
//! backend, [memory::InMemoryStore], which evaluates filters in process.
//! Backends for real databases implement the same trait and translate the
//! filter tree into their own query language.

mod document_store;
pub mod memory;

pub use document_store::*;
