//! QuerySet and store contract
//!
//! A [`QuerySet`] only records filters. The store is consulted each time the
//! queryset is evaluated, so the same queryset can be iterated repeatedly and
//! always reflects the current contents of the store.

use crate::error::DbResult;
use crate::model::Model;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Exact-match filters, field name to expected value.
pub type Filters = IndexMap<String, Value>;

/// Storage backing a model.
///
/// Implementations provide their own consistency guarantees; callers perform
/// no locking.
pub trait Store<M: Model>: Send + Sync {
	/// Instances matching every filter, in storage order, at most `limit`.
	fn select(&self, filters: &Filters, limit: Option<usize>) -> DbResult<Vec<M>>;

	/// Persists a new instance and returns it with its primary key assigned.
	fn insert(&self, instance: M) -> DbResult<M>;

	/// Persists changes to a saved instance.
	fn save(&self, instance: &M) -> DbResult<()>;

	/// Removes a saved instance.
	fn delete(&self, instance: &M) -> DbResult<()>;
}

/// Outcome of fetching exactly one instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<M> {
	Found(M),
	NotFound,
	/// More than one instance matched.
	Ambiguous,
}

impl<M> Lookup<M> {
	/// Builds a lookup from at most two candidates.
	pub fn from_candidates(mut candidates: Vec<M>) -> Self {
		match candidates.len() {
			0 => Lookup::NotFound,
			1 => Lookup::Found(candidates.remove(0)),
			_ => Lookup::Ambiguous,
		}
	}

	pub fn found(self) -> Option<M> {
		match self {
			Lookup::Found(instance) => Some(instance),
			Lookup::NotFound | Lookup::Ambiguous => None,
		}
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Lookup::Found(_))
	}
}

/// A lazy, re-iterable, filterable handle over a model's store.
pub struct QuerySet<M: Model> {
	store: Arc<dyn Store<M>>,
	filters: Filters,
}

impl<M: Model> QuerySet<M> {
	/// A queryset over every instance in `store`.
	pub fn new(store: Arc<dyn Store<M>>) -> Self {
		Self {
			store,
			filters: Filters::new(),
		}
	}

	/// Narrows the queryset. Later filters on the same field replace earlier
	/// ones.
	pub fn filter(&self, filters: &Filters) -> Self {
		let mut combined = self.filters.clone();
		combined.extend(filters.iter().map(|(k, v)| (k.clone(), v.clone())));
		Self {
			store: Arc::clone(&self.store),
			filters: combined,
		}
	}

	/// Filters recorded so far.
	pub fn filters(&self) -> &Filters {
		&self.filters
	}

	/// Fetches the single instance matching `filters` on top of this queryset.
	pub fn get(&self, filters: &Filters) -> DbResult<Lookup<M>> {
		let query = self.filter(filters);
		let candidates = self.store.select(&query.filters, Some(2))?;
		Ok(Lookup::from_candidates(candidates))
	}

	/// Fetches by primary key within this queryset.
	pub fn get_by_pk(&self, pk: &Value) -> DbResult<Lookup<M>> {
		let mut filters = Filters::new();
		filters.insert(M::primary_key_field().to_string(), pk.clone());
		self.get(&filters)
	}

	/// Evaluates the queryset.
	pub fn fetch(&self) -> DbResult<Vec<M>> {
		self.store.select(&self.filters, None)
	}

	/// Evaluates the queryset and iterates the result.
	pub fn iter(&self) -> DbResult<std::vec::IntoIter<M>> {
		Ok(self.fetch()?.into_iter())
	}

	pub fn first(&self) -> DbResult<Option<M>> {
		Ok(self.store.select(&self.filters, Some(1))?.into_iter().next())
	}

	pub fn count(&self) -> DbResult<usize> {
		Ok(self.fetch()?.len())
	}

	pub fn exists(&self) -> DbResult<bool> {
		Ok(self.first()?.is_some())
	}
}

impl<M: Model> Clone for QuerySet<M> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
			filters: self.filters.clone(),
		}
	}
}

impl<M: Model> fmt::Debug for QuerySet<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QuerySet")
			.field("model", &M::model_name())
			.field("filters", &self.filters)
			.finish()
	}
}

/// Compares a stored value against a filter value.
///
/// Request data usually arrives as strings, so a string filter matches a
/// number or boolean with the same textual form.
///
/// ```
/// use halyard_db::values_match;
/// use serde_json::json;
///
/// assert!(values_match(&json!(7), &json!("7")));
/// assert!(values_match(&json!(true), &json!("true")));
/// assert!(!values_match(&json!("7"), &json!(8)));
/// ```
pub fn values_match(stored: &Value, expected: &Value) -> bool {
	if stored == expected {
		return true;
	}
	match (stored, expected) {
		(Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
			numeric_eq(n, s)
		}
		(Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
			s.trim().parse::<bool>().is_ok_and(|parsed| parsed == *b)
		}
		_ => false,
	}
}

fn numeric_eq(number: &serde_json::Number, text: &str) -> bool {
	let text = text.trim();
	if let (Some(n), Ok(t)) = (number.as_i64(), text.parse::<i64>()) {
		return n == t;
	}
	match (number.as_f64(), text.parse::<f64>()) {
		(Some(n), Ok(t)) => n == t,
		_ => false,
	}
}
