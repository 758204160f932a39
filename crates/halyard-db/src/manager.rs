//! Model manager

use crate::error::DbResult;
use crate::model::{Attrs, Model};
use crate::query::{Filters, Lookup, QuerySet, Store};
use std::fmt;
use std::sync::Arc;

/// Model-level entry point to a store, like Django's `Model.objects`.
pub struct Manager<M: Model> {
	store: Arc<dyn Store<M>>,
}

impl<M: Model> Manager<M> {
	pub fn new(store: Arc<dyn Store<M>>) -> Self {
		Self { store }
	}

	/// The underlying store.
	pub fn store(&self) -> &Arc<dyn Store<M>> {
		&self.store
	}

	/// A queryset over every instance.
	pub fn all(&self) -> QuerySet<M> {
		QuerySet::new(Arc::clone(&self.store))
	}

	pub fn filter(&self, filters: &Filters) -> QuerySet<M> {
		self.all().filter(filters)
	}

	pub fn get(&self, filters: &Filters) -> DbResult<Lookup<M>> {
		self.all().get(filters)
	}

	/// Builds an instance from `attrs` and persists it.
	pub fn create(&self, attrs: &Attrs) -> DbResult<M> {
		let instance = M::from_attrs(attrs)?;
		self.store.insert(instance)
	}

	pub fn save(&self, instance: &M) -> DbResult<()> {
		self.store.save(instance)
	}

	pub fn delete(&self, instance: &M) -> DbResult<()> {
		self.store.delete(instance)
	}
}

impl<M: Model> Clone for Manager<M> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
		}
	}
}

impl<M: Model> fmt::Debug for Manager<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Manager")
			.field("model", &M::model_name())
			.finish_non_exhaustive()
	}
}
