//! Replies returned by CRUD operations

use crate::error::HandlerResult;
use halyard_core::{Node, Outcome};
use halyard_db::{Model, QuerySet};
use halyard_views::{Emittable, View};
use http::StatusCode;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Result of a CRUD operation: a single instance, a lazy collection, or an
/// outcome code.
pub enum Reply<M: Model> {
	Instance(M),
	Collection(QuerySet<M>),
	Status(Outcome),
}

impl<M: Model> Reply<M> {
	/// The outcome code, when the reply carries no data.
	pub fn outcome(&self) -> Option<Outcome> {
		match self {
			Reply::Status(outcome) => Some(*outcome),
			Reply::Instance(_) | Reply::Collection(_) => None,
		}
	}

	pub fn instance(&self) -> Option<&M> {
		match self {
			Reply::Instance(instance) => Some(instance),
			_ => None,
		}
	}

	pub fn into_instance(self) -> Option<M> {
		match self {
			Reply::Instance(instance) => Some(instance),
			_ => None,
		}
	}

	pub fn collection(&self) -> Option<&QuerySet<M>> {
		match self {
			Reply::Collection(queryset) => Some(queryset),
			_ => None,
		}
	}

	/// HTTP status a router would answer with.
	pub fn status(&self) -> StatusCode {
		self.outcome()
			.map(|outcome| outcome.status())
			.unwrap_or(StatusCode::OK)
	}

	/// Renders the reply through `view`.
	///
	/// Instances render to a mapping and collections to a sequence of
	/// mappings. Outcome codes render to their reason phrase.
	pub fn to_json(&self, view: &Arc<View>) -> HandlerResult<Value> {
		let value = match self {
			Reply::Instance(instance) => view.bind(Node::object(instance.clone())).emittable()?,
			Reply::Collection(queryset) => view
				.bind_many(queryset.iter()?.map(Node::object))
				.emittable()?,
			Reply::Status(outcome) => Value::String(outcome.reason().to_string()),
		};
		Ok(value)
	}
}

impl<M: Model> From<Outcome> for Reply<M> {
	fn from(outcome: Outcome) -> Self {
		Reply::Status(outcome)
	}
}

impl<M: Model> fmt::Debug for Reply<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Reply::Instance(instance) => f
				.debug_tuple("Instance")
				.field(&instance.to_value())
				.finish(),
			Reply::Collection(queryset) => f.debug_tuple("Collection").field(queryset).finish(),
			Reply::Status(outcome) => f.debug_tuple("Status").field(outcome).finish(),
		}
	}
}
