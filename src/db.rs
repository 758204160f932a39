//! Data layer module.
//!
//! This module provides the model, queryset and store contracts, and the
//! in-memory store.

pub use halyard_db::*;
