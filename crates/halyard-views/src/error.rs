//! View error types

use halyard_core::ArityMismatch;
use thiserror::Error;

/// Errors raised while declaring or rendering views.
#[derive(Debug, Error)]
pub enum ViewError {
	/// The field declaration is malformed.
	#[error("Invalid field '{name}': {reason}")]
	InvalidFieldSpec { name: String, reason: &'static str },

	/// A required path segment was neither an attribute nor a key.
	#[error("Cannot resolve '{segment}' while reading field '{path}'")]
	AttributeLookupFailed { path: String, segment: String },

	/// A required computed attribute could not be invoked without arguments.
	#[error("Cannot invoke '{segment}' while reading field '{path}': {source}")]
	ComputedInvocation {
		path: String,
		segment: String,
		#[source]
		source: ArityMismatch,
	},

	/// Encoding the rendered output failed.
	#[error("Encoding error: {0}")]
	Encode(#[from] serde_json::Error),
}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;
