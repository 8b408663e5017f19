//! In-memory document backend.

mod collection;
mod store;

pub use store::*;
