//! View rendering
//!
//! A [`View`] is declared once and shared behind an [`Arc`]. Binding it to
//! data yields a [`BoundView`], and rendering a bound view produces a
//! [`Rendered`] mapping keyed by field destination.

use crate::error::ViewResult;
use crate::field::Field;
use halyard_core::Node;
use indexmap::IndexMap;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Output of rendering one bound view, in field definition order.
pub type Rendered = IndexMap<String, FieldValue>;

/// An entry in a view's field list: a bare attribute name or a full [`Field`].
#[derive(Debug, Clone)]
pub enum FieldSpec {
	Name(String),
	Field(Field),
}

impl FieldSpec {
	/// Normalizes the entry. A bare name becomes a required top-level field.
	pub fn to_field(&self) -> ViewResult<Cow<'_, Field>> {
		match self {
			FieldSpec::Name(name) => Field::new(name.as_str()).map(Cow::Owned),
			FieldSpec::Field(field) => Ok(Cow::Borrowed(field)),
		}
	}
}

impl From<&str> for FieldSpec {
	fn from(name: &str) -> Self {
		FieldSpec::Name(name.to_string())
	}
}

impl From<String> for FieldSpec {
	fn from(name: String) -> Self {
		FieldSpec::Name(name)
	}
}

impl From<Field> for FieldSpec {
	fn from(field: Field) -> Self {
		FieldSpec::Field(field)
	}
}

/// A resolved field value.
#[derive(Debug, Clone)]
pub enum FieldValue {
	Node(Node),
	/// The value wrapped in a nested view.
	View(BoundView),
	/// A sequence wrapped element by element in a nested view.
	Views(Vec<BoundView>),
}

impl FieldValue {
	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Node(node) if node.is_null())
	}
}

/// A declarative output shape.
#[derive(Debug, Clone, Default)]
pub struct View {
	name: String,
	fields: Vec<FieldSpec>,
	serialized: bool,
}

impl View {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
			serialized: false,
		}
	}

	/// Appends a field.
	pub fn field(mut self, spec: impl Into<FieldSpec>) -> Self {
		self.fields.push(spec.into());
		self
	}

	/// Appends several fields.
	pub fn fields<I, S>(mut self, specs: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<FieldSpec>,
	{
		self.fields.extend(specs.into_iter().map(Into::into));
		self
	}

	/// Marks bound data as already serialized, so emitters pass it through
	/// untouched.
	pub fn serialized(mut self, serialized: bool) -> Self {
		self.serialized = serialized;
		self
	}

	/// Finishes the declaration.
	pub fn build(self) -> Arc<Self> {
		Arc::new(self)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_specs(&self) -> &[FieldSpec] {
		&self.fields
	}

	pub fn is_serialized(&self) -> bool {
		self.serialized
	}

	/// Binds the view to a single object.
	pub fn bind(self: &Arc<Self>, data: impl Into<Node>) -> BoundView {
		BoundView {
			view: Arc::clone(self),
			data: data.into(),
		}
	}

	/// Binds the view to each element of a sequence.
	pub fn bind_many<I>(self: &Arc<Self>, items: I) -> Vec<BoundView>
	where
		I: IntoIterator,
		I::Item: Into<Node>,
	{
		items.into_iter().map(|item| self.bind(item)).collect()
	}

	/// Renders a single object.
	pub fn render_one(self: &Arc<Self>, data: impl Into<Node>) -> ViewResult<Rendered> {
		self.bind(data).render()
	}

	/// Renders each element of a sequence independently.
	pub fn render_many<I>(self: &Arc<Self>, items: I) -> ViewResult<Vec<Rendered>>
	where
		I: IntoIterator,
		I::Item: Into<Node>,
	{
		items
			.into_iter()
			.map(|item| self.render_one(item))
			.collect()
	}

	/// Wraps a resolved value for a nested field, fanning out over sequences.
	pub(crate) fn wrap(self: &Arc<Self>, value: Node) -> FieldValue {
		match value {
			Node::List(items) => FieldValue::Views(self.bind_many(items)),
			Node::Value(Value::Array(items)) => FieldValue::Views(self.bind_many(items)),
			single => FieldValue::View(self.bind(single)),
		}
	}
}

/// A view bound to its data.
#[derive(Debug, Clone)]
pub struct BoundView {
	view: Arc<View>,
	data: Node,
}

impl BoundView {
	pub fn view(&self) -> &Arc<View> {
		&self.view
	}

	pub fn data(&self) -> &Node {
		&self.data
	}

	/// Resolves every field in definition order.
	///
	/// A field is left out only when it is optional and resolved to nothing or
	/// to null. When two fields share a destination the later one wins.
	pub fn render(&self) -> ViewResult<Rendered> {
		let mut result = Rendered::new();
		for spec in &self.view.fields {
			let field = spec.to_field()?;
			let value = field.get_value(&self.data)?;
			let absent = value.as_ref().is_none_or(FieldValue::is_null);
			if absent && !field.is_required() {
				continue;
			}
			result.insert(
				field.destination().to_string(),
				value.unwrap_or(FieldValue::Node(Node::null())),
			);
		}
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ViewError;
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn plain(value: &FieldValue) -> Value {
		match value {
			FieldValue::Node(node) => node.to_value(),
			other => panic!("expected a plain node, got {:?}", other),
		}
	}

	#[fixture]
	fn article() -> Arc<View> {
		View::new("Article")
			.fields(["id", "title"])
			.field(Field::new("summary").unwrap().optional())
			.field(Field::with_destination("author.name", "author").unwrap())
			.build()
	}

	#[rstest]
	fn test_render_in_definition_order(article: Arc<View>) {
		let data = json!({ "title": "T", "id": 1, "author": { "name": "Ada" }, "summary": "S" });

		let rendered = article.render_one(data).unwrap();

		let keys: Vec<_> = rendered.keys().cloned().collect();
		assert_eq!(keys, vec!["id", "title", "summary", "author"]);
		assert_eq!(plain(&rendered["author"]), json!("Ada"));
	}

	#[rstest]
	fn test_optional_absent_and_null_are_omitted(article: Arc<View>) {
		let missing = json!({ "id": 1, "title": "T", "author": { "name": "Ada" } });
		let null = json!({ "id": 1, "title": "T", "author": { "name": "Ada" }, "summary": null });

		assert!(!article.render_one(missing).unwrap().contains_key("summary"));
		assert!(!article.render_one(null).unwrap().contains_key("summary"));
	}

	#[rstest]
	fn test_required_null_is_present(article: Arc<View>) {
		let data = json!({ "id": 1, "title": null, "author": { "name": "Ada" } });

		let rendered = article.render_one(data).unwrap();

		assert_eq!(plain(&rendered["title"]), Value::Null);
	}

	#[rstest]
	fn test_required_missing_fails(article: Arc<View>) {
		let data = json!({ "id": 1, "author": { "name": "Ada" } });

		let err = article.render_one(data).unwrap_err();

		assert!(matches!(err, ViewError::AttributeLookupFailed { ref segment, .. } if segment == "title"));
	}

	#[rstest]
	fn test_bare_dotted_name_fails_at_render() {
		let view = View::new("Broken").field("author.name").build();

		let err = view.render_one(json!({ "author": { "name": "Ada" } })).unwrap_err();

		assert!(matches!(err, ViewError::InvalidFieldSpec { .. }));
	}

	#[rstest]
	fn test_last_write_wins_on_shared_destination() {
		let view = View::new("Alias")
			.field(Field::with_destination("nick", "name").unwrap())
			.field("name")
			.build();

		let rendered = view.render_one(json!({ "nick": "ada", "name": "Ada" })).unwrap();

		assert_eq!(rendered.len(), 1);
		assert_eq!(plain(&rendered["name"]), json!("Ada"));
	}

	#[rstest]
	fn test_render_many_is_independent(article: Arc<View>) {
		let items = (1..=3).map(|id| {
			json!({ "id": id, "title": format!("T{id}"), "author": { "name": "Ada" } })
		});

		let rendered = article.render_many(items).unwrap();

		assert_eq!(rendered.len(), 3);
		for (index, mapping) in rendered.iter().enumerate() {
			assert_eq!(plain(&mapping["id"]), json!(index + 1));
		}
	}

	#[rstest]
	fn test_bind_many_fans_out(article: Arc<View>) {
		let bound = article.bind_many(vec![json!({}), json!({})]);
		assert_eq!(bound.len(), 2);
		assert!(Arc::ptr_eq(bound[0].view(), &article));
	}

	#[rstest]
	fn test_render_empty_view() {
		let view = View::new("Empty").build();
		assert!(view.render_one(json!({ "a": 1 })).unwrap().is_empty());
	}
}
