//! Emitters
//!
//! [`Emittable`] is the hook output encoders use to obtain a plain JSON
//! representation. Bound views render themselves; nested views are rendered
//! recursively.

use crate::error::ViewResult;
use crate::view::{BoundView, FieldValue, Rendered};
use serde_json::{Map, Value};

/// Produces a serializable representation of `self`.
pub trait Emittable {
	fn emittable(&self) -> ViewResult<Value>;
}

impl Emittable for BoundView {
	/// Renders the view. Views marked serialized emit their data unchanged.
	fn emittable(&self) -> ViewResult<Value> {
		if self.view().is_serialized() {
			return Ok(self.data().to_value());
		}
		self.render()?.emittable()
	}
}

impl Emittable for Rendered {
	fn emittable(&self) -> ViewResult<Value> {
		let mut map = Map::with_capacity(self.len());
		for (destination, value) in self {
			map.insert(destination.clone(), value.emittable()?);
		}
		Ok(Value::Object(map))
	}
}

impl Emittable for FieldValue {
	fn emittable(&self) -> ViewResult<Value> {
		match self {
			FieldValue::Node(node) => Ok(node.to_value()),
			FieldValue::View(bound) => bound.emittable(),
			FieldValue::Views(bound) => bound.emittable(),
		}
	}
}

impl Emittable for Value {
	fn emittable(&self) -> ViewResult<Value> {
		Ok(self.clone())
	}
}

impl<T: Emittable> Emittable for [T] {
	fn emittable(&self) -> ViewResult<Value> {
		self.iter()
			.map(Emittable::emittable)
			.collect::<ViewResult<Vec<_>>>()
			.map(Value::Array)
	}
}

impl<T: Emittable> Emittable for Vec<T> {
	fn emittable(&self) -> ViewResult<Value> {
		self.as_slice().emittable()
	}
}

/// Encodes emittable output as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter {
	pretty: bool,
}

impl JsonEmitter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables indented output.
	pub fn pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}

	pub fn emit(&self, data: &(impl Emittable + ?Sized)) -> ViewResult<String> {
		let value = data.emittable()?;
		let text = if self.pretty {
			serde_json::to_string_pretty(&value)?
		} else {
			serde_json::to_string(&value)?
		};
		Ok(text)
	}
}
