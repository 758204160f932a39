//! Data layer contracts for halyard
//!
//! This crate defines what the CRUD handlers need from a backing store:
//!
//! - [`Model`]: a persisted type with a well-known primary key field
//! - [`Store`]: select / insert / save / delete against some storage
//! - [`QuerySet`]: a lazy, re-iterable, filterable handle over a store
//! - [`Lookup`]: the outcome of fetching exactly one instance
//! - [`Manager`]: the model-level entry point (`objects` in Django terms)
//!
//! [`MemoryStore`] implements [`Store`] over a vector guarded by a lock.

pub mod backends;
pub mod error;
pub mod manager;
pub mod model;
pub mod query;

pub use backends::memory::MemoryStore;
pub use error::{DbError, DbResult};
pub use manager::Manager;
pub use model::{Attrs, Model, ModelKey, Unbound};
pub use query::{Filters, Lookup, QuerySet, Store, values_match};
