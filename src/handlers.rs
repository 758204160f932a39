//! Handlers module.
//!
//! This module provides the CRUD contract, verb dispatch and the handler
//! registry.

pub use halyard_handlers::*;
