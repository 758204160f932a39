//! Views module.
//!
//! This module provides fields, views and emitters.

pub use halyard_views::*;
