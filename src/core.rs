//! Core types shared by every halyard crate.

pub use halyard_core::*;
