//! Standardized outcome codes
//!
//! CRUD handlers return one of these instead of data when an operation ends in
//! a well-known condition (missing row, duplicate, ...). A resource router maps
//! them 1:1 to HTTP responses.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a CRUD operation that produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
	AllOk,
	Created,
	Deleted,
	BadRequest,
	Forbidden,
	NotFound,
	DuplicateEntry,
	NotHere,
	InternalError,
	NotImplemented,
	Throttled,
}

impl Outcome {
	/// All outcome codes, in status order.
	pub const ALL: [Outcome; 11] = [
		Outcome::AllOk,
		Outcome::Created,
		Outcome::Deleted,
		Outcome::BadRequest,
		Outcome::Forbidden,
		Outcome::NotFound,
		Outcome::DuplicateEntry,
		Outcome::NotHere,
		Outcome::InternalError,
		Outcome::NotImplemented,
		Outcome::Throttled,
	];

	/// HTTP status the outcome maps to.
	///
	/// # Examples
	///
	/// ```
	/// use halyard_core::Outcome;
	/// use http::StatusCode;
	///
	/// assert_eq!(Outcome::DuplicateEntry.status(), StatusCode::CONFLICT);
	/// assert_eq!(Outcome::NotHere.status(), StatusCode::GONE);
	/// ```
	pub fn status(&self) -> StatusCode {
		match self {
			Outcome::AllOk => StatusCode::OK,
			Outcome::Created => StatusCode::CREATED,
			Outcome::Deleted => StatusCode::NO_CONTENT,
			Outcome::BadRequest => StatusCode::BAD_REQUEST,
			Outcome::Forbidden => StatusCode::UNAUTHORIZED,
			Outcome::NotFound => StatusCode::NOT_FOUND,
			Outcome::DuplicateEntry => StatusCode::CONFLICT,
			Outcome::NotHere => StatusCode::GONE,
			Outcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
			Outcome::NotImplemented => StatusCode::NOT_IMPLEMENTED,
			Outcome::Throttled => StatusCode::SERVICE_UNAVAILABLE,
		}
	}

	/// Response body phrase sent with the status.
	pub fn reason(&self) -> &'static str {
		match self {
			Outcome::AllOk => "OK",
			Outcome::Created => "Created",
			Outcome::Deleted => "",
			Outcome::BadRequest => "Bad Request",
			Outcome::Forbidden => "Forbidden",
			Outcome::NotFound => "Not Found",
			Outcome::DuplicateEntry => "Conflict/Duplicate",
			Outcome::NotHere => "Gone",
			Outcome::InternalError => "Internal Error",
			Outcome::NotImplemented => "Not Implemented",
			Outcome::Throttled => "Throttled",
		}
	}

	/// Returns `true` for 2xx outcomes.
	pub fn is_success(&self) -> bool {
		self.status().is_success()
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let code = self.status().as_u16();
		match self.reason() {
			"" => write!(f, "{}", code),
			reason => write!(f, "{} {}", code, reason),
		}
	}
}
