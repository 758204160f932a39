//! Field resolution
//!
//! A field walks its dotted path through a [`Node`] one segment at a time.
//! Each segment is tried as an attribute first and as a mapping key second.
//! Computed attributes are invoked with no arguments.
//!
//! A required field fails when a segment cannot be resolved. An optional field
//! resolves to `None` instead, which the renderer omits from the output.

use crate::error::{ViewError, ViewResult};
use crate::view::{FieldValue, View};
use halyard_core::{Accessor, Node};
use std::sync::Arc;

/// A single entry in a view's field list.
#[derive(Debug, Clone)]
pub struct Field {
	name: String,
	segments: Vec<String>,
	required: bool,
	view: Option<Arc<View>>,
	destination: String,
}

impl Field {
	/// Declares a required top-level field. The output key is the name.
	///
	/// Dotted paths need an explicit destination, see
	/// [`Field::with_destination`].
	///
	/// ```
	/// use halyard_views::{Field, ViewError};
	///
	/// let field = Field::new("title").unwrap();
	/// assert_eq!(field.destination(), "title");
	/// assert!(field.is_required());
	///
	/// let err = Field::new("author.name").unwrap_err();
	/// assert!(matches!(err, ViewError::InvalidFieldSpec { .. }));
	/// ```
	pub fn new(name: impl Into<String>) -> ViewResult<Self> {
		Self::build(name.into(), None)
	}

	/// Declares a required field written under `destination`.
	///
	/// An empty destination falls back to the name.
	///
	/// ```
	/// use halyard_views::Field;
	///
	/// let field = Field::with_destination("author.name", "author_name").unwrap();
	/// assert_eq!(field.path(), ["author", "name"]);
	/// assert_eq!(field.destination(), "author_name");
	/// ```
	pub fn with_destination(
		name: impl Into<String>,
		destination: impl Into<String>,
	) -> ViewResult<Self> {
		Self::build(name.into(), Some(destination.into()))
	}

	fn build(name: String, destination: Option<String>) -> ViewResult<Self> {
		if name.is_empty() {
			return Err(ViewError::InvalidFieldSpec {
				name,
				reason: "field name is empty",
			});
		}

		let segments: Vec<String> = name.split('.').map(str::to_string).collect();
		if segments.iter().any(String::is_empty) {
			return Err(ViewError::InvalidFieldSpec {
				name,
				reason: "field path contains an empty segment",
			});
		}

		let destination = match destination {
			Some(destination) if !destination.is_empty() => destination,
			Some(_) => name.clone(),
			None if segments.len() > 1 => {
				return Err(ViewError::InvalidFieldSpec {
					name,
					reason: "a non top-level attribute needs a destination name",
				});
			}
			None => name.clone(),
		};

		Ok(Self {
			name,
			segments,
			required: true,
			view: None,
			destination,
		})
	}

	/// Marks the field optional.
	pub fn optional(self) -> Self {
		self.required(false)
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// Wraps the resolved value in `view`.
	pub fn nested(mut self, view: Arc<View>) -> Self {
		self.view = Some(view);
		self
	}

	/// Full dotted name as declared.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn path(&self) -> &[String] {
		&self.segments
	}

	pub fn destination(&self) -> &str {
		&self.destination
	}

	pub fn is_required(&self) -> bool {
		self.required
	}

	pub fn view(&self) -> Option<&Arc<View>> {
		self.view.as_ref()
	}

	/// Resolves the field against `source`.
	///
	/// Returns `Ok(None)` when an optional field cannot be resolved. A declared
	/// nested view wraps the resolved value, once per element when the value is
	/// a sequence. Null values are never wrapped.
	pub fn get_value(&self, source: &Node) -> ViewResult<Option<FieldValue>> {
		let mut value = source.clone();

		for segment in &self.segments {
			value = match value.attribute(segment) {
				Some(Accessor::Plain(node)) => node,
				Some(Accessor::Computed(computed)) => match computed.call(&[]) {
					Ok(node) => node,
					Err(source) if self.required => {
						return Err(ViewError::ComputedInvocation {
							path: self.name.clone(),
							segment: segment.clone(),
							source,
						});
					}
					Err(_) => {
						tracing::trace!(field = %self.name, %segment, "computed attribute skipped");
						return Ok(None);
					}
				},
				None => match value.item(segment) {
					Some(node) => node,
					None if self.required => {
						return Err(ViewError::AttributeLookupFailed {
							path: self.name.clone(),
							segment: segment.clone(),
						});
					}
					None => {
						tracing::trace!(field = %self.name, %segment, "optional field unresolved");
						return Ok(None);
					}
				},
			};
		}

		Ok(Some(match &self.view {
			Some(view) if !value.is_null() => view.wrap(value),
			_ => FieldValue::Node(value),
		}))
	}
}
