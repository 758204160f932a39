//! Model trait
//!
//! A model is a persisted type addressed by a primary key field. Models are
//! also [`Resolve`] objects so that views can walk their attributes.

use crate::error::{DbError, DbResult};
use crate::query::{Filters, values_match};
use halyard_core::{Accessor, Resolve};
use indexmap::IndexMap;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;

/// Flat attribute map used to construct and update instances.
pub type Attrs = IndexMap<String, Value>;

/// A persisted type.
///
/// # Examples
///
/// ```
/// use halyard_core::{Accessor, Resolve};
/// use halyard_db::{Attrs, DbError, DbResult, Model};
/// use serde_json::{json, Value};
///
/// #[derive(Debug, Clone)]
/// struct Tag {
///     id: Option<i64>,
///     label: String,
/// }
///
/// impl Resolve for Tag {
///     fn attribute(&self, name: &str) -> Option<Accessor> {
///         self.field(name).map(Accessor::plain)
///     }
///
///     fn to_value(&self) -> Value {
///         json!({ "id": self.id, "label": self.label })
///     }
/// }
///
/// impl Model for Tag {
///     fn model_name() -> &'static str { "Tag" }
///
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "id" => Some(json!(self.id)),
///             "label" => Some(json!(self.label)),
///             _ => None,
///         }
///     }
///
///     fn set_field(&mut self, name: &str, value: Value) -> DbResult<()> {
///         match (name, value) {
///             ("id", v) => self.id = v.as_i64(),
///             ("label", Value::String(s)) => self.label = s,
///             (field, _) => return Err(DbError::UnknownField { model: "Tag", field: field.into() }),
///         }
///         Ok(())
///     }
///
///     fn from_attrs(attrs: &Attrs) -> DbResult<Self> {
///         let mut tag = Tag { id: None, label: String::new() };
///         for (name, value) in attrs {
///             tag.set_field(name, value.clone())?;
///         }
///         Ok(tag)
///     }
/// }
///
/// let tag = Tag::from_attrs(&Attrs::from([("label".to_string(), json!("rust"))])).unwrap();
/// assert_eq!(tag.primary_key(), None);
/// assert!(tag.matches(&[("label".to_string(), json!("rust"))].into_iter().collect()));
/// ```
pub trait Model: Resolve + Clone + Send + Sync + 'static {
	/// Name used in diagnostics and registry listings.
	fn model_name() -> &'static str;

	/// Name of the primary key field.
	fn primary_key_field() -> &'static str {
		"id"
	}

	/// Reads a stored field as plain data.
	fn field(&self, name: &str) -> Option<Value>;

	/// Assigns a stored field.
	fn set_field(&mut self, name: &str, value: Value) -> DbResult<()>;

	/// Builds an unsaved instance from attributes.
	fn from_attrs(attrs: &Attrs) -> DbResult<Self>;

	/// Primary key value, `None` while unsaved.
	fn primary_key(&self) -> Option<Value> {
		self.field(Self::primary_key_field())
			.filter(|value| !value.is_null())
	}

	/// Returns `true` when every filter matches the stored field of the same
	/// name. `pk` is accepted as an alias for the primary key field.
	fn matches(&self, filters: &Filters) -> bool {
		filters.iter().all(|(name, expected)| {
			let name = if name == "pk" {
				Self::primary_key_field()
			} else {
				name.as_str()
			};
			self.field(name)
				.is_some_and(|actual| values_match(&actual, expected))
		})
	}
}

/// Identity of a model type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKey {
	type_id: TypeId,
	name: &'static str,
}

impl ModelKey {
	/// Key of model `M`.
	pub fn of<M: Model>() -> Self {
		Self {
			type_id: TypeId::of::<M>(),
			name: M::model_name(),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl fmt::Debug for ModelKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModelKey({})", self.name)
	}
}

impl fmt::Display for ModelKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Model type for handlers that are not backed by a model.
///
/// It has no fields and cannot be constructed from attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbound;

impl Resolve for Unbound {
	fn attribute(&self, _name: &str) -> Option<Accessor> {
		None
	}

	fn to_value(&self) -> Value {
		Value::Null
	}
}

impl Model for Unbound {
	fn model_name() -> &'static str {
		"Unbound"
	}

	fn field(&self, _name: &str) -> Option<Value> {
		None
	}

	fn set_field(&mut self, _name: &str, _value: Value) -> DbResult<()> {
		Err(DbError::Unsupported(Self::model_name()))
	}

	fn from_attrs(_attrs: &Attrs) -> DbResult<Self> {
		Err(DbError::Unsupported(Self::model_name()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Debug, Clone)]
	struct Slot {
		code: String,
		size: i64,
	}

	impl Resolve for Slot {
		fn attribute(&self, name: &str) -> Option<Accessor> {
			self.field(name).map(Accessor::plain)
		}

		fn to_value(&self) -> Value {
			json!({ "code": self.code, "size": self.size })
		}
	}

	impl Model for Slot {
		fn model_name() -> &'static str {
			"Slot"
		}

		fn primary_key_field() -> &'static str {
			"code"
		}

		fn field(&self, name: &str) -> Option<Value> {
			match name {
				"code" => Some(json!(self.code)),
				"size" => Some(json!(self.size)),
				_ => None,
			}
		}

		fn set_field(&mut self, name: &str, _value: Value) -> DbResult<()> {
			Err(DbError::UnknownField {
				model: "Slot",
				field: name.to_string(),
			})
		}

		fn from_attrs(_attrs: &Attrs) -> DbResult<Self> {
			Err(DbError::Unsupported("Slot"))
		}
	}

	fn filters(pairs: &[(&str, Value)]) -> Filters {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	#[rstest]
	fn test_custom_primary_key_and_pk_alias() {
		let slot = Slot {
			code: "A1".to_string(),
			size: 3,
		};

		assert_eq!(slot.primary_key(), Some(json!("A1")));
		assert!(slot.matches(&filters(&[("pk", json!("A1"))])));
		assert!(slot.matches(&filters(&[("code", json!("A1")), ("size", json!("3"))])));
		assert!(!slot.matches(&filters(&[("size", json!(4))])));
		assert!(!slot.matches(&filters(&[("colour", json!("red"))])));
	}

	#[rstest]
	fn test_empty_filters_match_everything() {
		let slot = Slot {
			code: "B2".to_string(),
			size: 1,
		};
		assert!(slot.matches(&Filters::new()));
	}

	#[rstest]
	fn test_model_key() {
		let key = ModelKey::of::<Slot>();
		assert_eq!(key, ModelKey::of::<Slot>());
		assert_ne!(key, ModelKey::of::<Unbound>());
		assert_eq!(key.to_string(), "Slot");
	}

	#[rstest]
	fn test_unbound_rejects_construction() {
		let result = Unbound::from_attrs(&Attrs::new());
		assert!(matches!(result, Err(DbError::Unsupported("Unbound"))));
	}
}
