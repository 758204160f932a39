//! Requests
//!
//! A [`Request`] carries the verb, the payload and the identity of the caller.
//! Payload keys may repeat, as in form submissions; [`RequestData::flatten`]
//! keeps the last value of each key.

use crate::error::{HandlerError, HandlerResult};
use halyard_db::Attrs;
use http::Method;
use indexmap::IndexMap;
use serde_json::Value;

/// Multi-valued request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestData {
	values: IndexMap<String, Vec<Value>>,
}

impl RequestData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a JSON object payload. Each member becomes one value.
	///
	/// ```
	/// use halyard_handlers::RequestData;
	/// use serde_json::json;
	///
	/// let data = RequestData::from_json(json!({ "title": "Hello" })).unwrap();
	/// assert_eq!(data.get("title"), Some(&json!("Hello")));
	///
	/// assert!(RequestData::from_json(json!(["not", "an", "object"])).is_err());
	/// ```
	pub fn from_json(payload: Value) -> HandlerResult<Self> {
		match payload {
			Value::Object(map) => Ok(map.into_iter().collect()),
			Value::Null => Ok(Self::new()),
			other => Err(HandlerError::MalformedPayload(format!(
				"expected a JSON object, got {}",
				json_kind(&other)
			))),
		}
	}

	/// Adds a value for `key`, keeping earlier ones.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.values.entry(key.into()).or_default().push(value.into());
		self
	}

	/// Replaces every value of `key`.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.values.insert(key.into(), vec![value.into()]);
		self
	}

	/// Last value of `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key).and_then(|values| values.last())
	}

	pub fn get_all(&self, key: &str) -> &[Value] {
		self.values.get(key).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Flattens the payload to one value per key, the last one submitted.
	pub fn flatten(&self) -> Attrs {
		self.values
			.iter()
			.filter_map(|(key, values)| values.last().map(|value| (key.clone(), value.clone())))
			.collect()
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for RequestData {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		let mut data = Self::new();
		for (key, value) in iter {
			data.append(key, value);
		}
		data
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// An inbound request as seen by a handler.
#[derive(Debug, Clone)]
pub struct Request {
	method: Method,
	data: RequestData,
	user: Option<String>,
}

impl Request {
	pub fn new(method: Method) -> Self {
		Self {
			method,
			data: RequestData::new(),
			user: None,
		}
	}

	pub fn get() -> Self {
		Self::new(Method::GET)
	}

	pub fn post(data: RequestData) -> Self {
		Self::new(Method::POST).with_data(data)
	}

	pub fn put(data: RequestData) -> Self {
		Self::new(Method::PUT).with_data(data)
	}

	pub fn delete() -> Self {
		Self::new(Method::DELETE)
	}

	pub fn with_data(mut self, data: RequestData) -> Self {
		self.data = data;
		self
	}

	/// Attaches an authenticated identity.
	pub fn with_user(mut self, user: impl Into<String>) -> Self {
		self.user = Some(user.into());
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn data(&self) -> &RequestData {
		&self.data
	}

	pub fn user(&self) -> Option<&str> {
		self.user.as_deref()
	}

	pub fn is_authenticated(&self) -> bool {
		self.user.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_flatten_keeps_last_value() {
		let mut data = RequestData::new();
		data.append("tag", "a").append("tag", "b").append("title", "T");

		let attrs = data.flatten();

		assert_eq!(attrs.get("tag"), Some(&json!("b")));
		assert_eq!(attrs.get("title"), Some(&json!("T")));
		assert_eq!(data.get_all("tag"), &[json!("a"), json!("b")]);
	}

	#[rstest]
	fn test_flatten_preserves_key_order() {
		let data: RequestData = vec![("b", json!(1)), ("a", json!(2)), ("b", json!(3))]
			.into_iter()
			.collect();

		let keys: Vec<_> = data.flatten().keys().cloned().collect();

		assert_eq!(keys, vec!["b", "a"]);
	}

	#[rstest]
	fn test_set_replaces_values() {
		let mut data = RequestData::new();
		data.append("tag", "a").set("tag", "z");
		assert_eq!(data.get_all("tag"), &[json!("z")]);
	}

	#[rstest]
	#[case(json!(null), 0)]
	#[case(json!({}), 0)]
	#[case(json!({ "a": 1, "b": [1, 2] }), 2)]
	fn test_from_json_objects(#[case] payload: Value, #[case] len: usize) {
		assert_eq!(RequestData::from_json(payload).unwrap().len(), len);
	}

	#[rstest]
	#[case(json!(3))]
	#[case(json!("text"))]
	#[case(json!([1]))]
	fn test_from_json_rejects_non_objects(#[case] payload: Value) {
		assert!(matches!(
			RequestData::from_json(payload),
			Err(HandlerError::MalformedPayload(_))
		));
	}

	#[rstest]
	fn test_request_builders() {
		let request = Request::delete().with_user("ada");

		assert_eq!(request.method(), Method::DELETE);
		assert_eq!(request.user(), Some("ada"));
		assert!(request.is_authenticated());
		assert!(!Request::get().is_authenticated());
	}
}
