//! Core types shared by the halyard crates.
//!
//! - [`object`]: the object graph walked by field paths ([`Node`], [`Resolve`],
//!   [`Accessor`])
//! - [`outcome`]: standardized outcome codes returned by CRUD handlers

pub mod object;
pub mod outcome;

pub use object::{Accessor, ArityMismatch, Computed, Node, Resolve};
pub use outcome::Outcome;
