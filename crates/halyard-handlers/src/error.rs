//! Handler error types

use halyard_db::DbError;
use halyard_views::ViewError;
use http::Method;
use thiserror::Error;

/// Errors raised by handlers.
///
/// Expected conditions such as a missing row are not errors; they come back
/// as [`Outcome`](halyard_core::Outcome) replies.
#[derive(Debug, Error)]
pub enum HandlerError {
	/// The handler is not backed by a model.
	#[error("Handler is not backed by a model")]
	NotImplemented,

	#[error("Method {0} is not allowed")]
	MethodNotAllowed(Method),

	#[error("Malformed payload: {0}")]
	MalformedPayload(String),

	#[error(transparent)]
	Database(#[from] DbError),

	#[error(transparent)]
	View(#[from] ViewError),
}

/// Result type for handler operations
pub type HandlerResult<T> = Result<T, HandlerError>;
