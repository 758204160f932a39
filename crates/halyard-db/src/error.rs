//! Error types for the data layer.

use thiserror::Error;

/// Errors raised by models and stores.
#[derive(Debug, Error)]
pub enum DbError {
	/// The model has no field with this name.
	#[error("Unknown field '{field}' on model {model}")]
	UnknownField { model: &'static str, field: String },

	/// A value could not be stored in a field.
	#[error("Invalid value for {model}.{field}: {message}")]
	InvalidValue {
		model: &'static str,
		field: String,
		message: String,
	},

	/// An operation needed a saved instance.
	#[error("Instance of {0} has no primary key")]
	MissingPrimaryKey(&'static str),

	/// A uniqueness constraint rejected the write.
	#[error("Integrity error on {model}: {message}")]
	IntegrityError { model: &'static str, message: String },

	/// The model cannot be constructed or persisted.
	#[error("Model {0} does not support this operation")]
	Unsupported(&'static str),

	/// Storage-level failure.
	#[error("Backend error: {0}")]
	Backend(String),
}

impl DbError {
	/// Returns `true` when the error is a uniqueness violation.
	pub fn is_integrity_error(&self) -> bool {
		matches!(self, DbError::IntegrityError { .. })
	}

	/// Returns `true` when the error was caused by the supplied attributes.
	pub fn is_validation_error(&self) -> bool {
		matches!(
			self,
			DbError::UnknownField { .. } | DbError::InvalidValue { .. }
		)
	}
}

/// Result type alias for data layer operations.
pub type DbResult<T> = Result<T, DbError>;
