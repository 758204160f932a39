//! Queryset evaluation against a store that records every call.

use halyard_core::{Accessor, Resolve};
use halyard_db::{Attrs, DbError, DbResult, Filters, Lookup, Manager, Model, Store};
use parking_lot::Mutex;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Crate {
	name: String,
	downloads: i64,
}

impl Resolve for Crate {
	fn attribute(&self, name: &str) -> Option<Accessor> {
		self.field(name).map(Accessor::plain)
	}

	fn to_value(&self) -> Value {
		json!({ "name": self.name, "downloads": self.downloads })
	}
}

impl Model for Crate {
	fn model_name() -> &'static str {
		"Crate"
	}

	fn primary_key_field() -> &'static str {
		"name"
	}

	fn field(&self, name: &str) -> Option<Value> {
		match name {
			"name" => Some(json!(self.name)),
			"downloads" => Some(json!(self.downloads)),
			_ => None,
		}
	}

	fn set_field(&mut self, name: &str, value: Value) -> DbResult<()> {
		match (name, value) {
			("name", Value::String(s)) => self.name = s,
			("downloads", v) => self.downloads = v.as_i64().unwrap_or_default(),
			(field, _) => {
				return Err(DbError::UnknownField {
					model: "Crate",
					field: field.to_string(),
				});
			}
		}
		Ok(())
	}

	fn from_attrs(attrs: &Attrs) -> DbResult<Self> {
		let mut instance = Crate {
			name: String::new(),
			downloads: 0,
		};
		for (name, value) in attrs {
			instance.set_field(name, value.clone())?;
		}
		Ok(instance)
	}
}

/// Store that records the filters and limit of every select.
#[derive(Default)]
struct RecordingStore {
	rows: Mutex<Vec<Crate>>,
	selects: Mutex<Vec<(Filters, Option<usize>)>>,
}

impl Store<Crate> for RecordingStore {
	fn select(&self, filters: &Filters, limit: Option<usize>) -> DbResult<Vec<Crate>> {
		self.selects.lock().push((filters.clone(), limit));
		let rows = self.rows.lock();
		let matching = rows.iter().filter(|row| row.matches(filters)).cloned();
		Ok(matching.take(limit.unwrap_or(usize::MAX)).collect())
	}

	fn insert(&self, instance: Crate) -> DbResult<Crate> {
		self.rows.lock().push(instance.clone());
		Ok(instance)
	}

	fn save(&self, _instance: &Crate) -> DbResult<()> {
		Err(DbError::Unsupported("Crate"))
	}

	fn delete(&self, instance: &Crate) -> DbResult<()> {
		self.rows.lock().retain(|row| row.name != instance.name);
		Ok(())
	}
}

fn filters(pairs: &[(&str, Value)]) -> Filters {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), v.clone()))
		.collect()
}

#[fixture]
fn store() -> Arc<RecordingStore> {
	let store = RecordingStore::default();
	for (name, downloads) in [("serde", 10), ("tokio", 10), ("rstest", 3)] {
		store
			.insert(Crate {
				name: name.to_string(),
				downloads,
			})
			.unwrap();
	}
	Arc::new(store)
}

#[rstest]
fn test_filter_does_not_touch_store(store: Arc<RecordingStore>) {
	let manager = Manager::new(store.clone());

	let popular = manager
		.all()
		.filter(&filters(&[("downloads", json!(10))]))
		.filter(&filters(&[("name", json!("serde"))]));

	assert!(store.selects.lock().is_empty());
	assert_eq!(
		popular.filters(),
		&filters(&[("downloads", json!(10)), ("name", json!("serde"))])
	);
}

#[rstest]
fn test_each_evaluation_queries_store(store: Arc<RecordingStore>) {
	let manager = Manager::new(store.clone());
	let popular = manager.filter(&filters(&[("downloads", json!("10"))]));

	assert_eq!(popular.count().unwrap(), 2);
	assert_eq!(popular.fetch().unwrap().len(), 2);
	assert_eq!(store.selects.lock().len(), 2);
}

#[rstest]
fn test_get_limits_to_two_candidates(store: Arc<RecordingStore>) {
	let manager = Manager::new(store.clone());

	let lookup = manager.get(&filters(&[("downloads", json!(10))])).unwrap();

	assert_eq!(lookup, Lookup::Ambiguous);
	assert_eq!(store.selects.lock().last().map(|(_, limit)| *limit), Some(Some(2)));
}

#[rstest]
fn test_get_by_pk_uses_primary_key_field(store: Arc<RecordingStore>) {
	let manager = Manager::new(store.clone());

	let lookup = manager.all().get_by_pk(&json!("rstest")).unwrap();

	assert_eq!(lookup.found().map(|c| c.downloads), Some(3));
	let (recorded, _) = store.selects.lock().last().cloned().unwrap();
	assert_eq!(recorded, filters(&[("name", json!("rstest"))]));
}

#[rstest]
fn test_first_and_exists(store: Arc<RecordingStore>) {
	let manager = Manager::new(store.clone());

	assert_eq!(manager.all().first().unwrap().map(|c| c.name), Some("serde".to_string()));
	assert!(!manager.filter(&filters(&[("downloads", json!(0))])).exists().unwrap());
}

#[rstest]
fn test_store_errors_propagate(store: Arc<RecordingStore>) {
	let manager = Manager::new(store.clone());
	let serde = manager.all().first().unwrap().unwrap();

	assert!(matches!(manager.save(&serde), Err(DbError::Unsupported("Crate"))));
}
