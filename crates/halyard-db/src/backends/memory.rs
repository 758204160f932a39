//! In-memory store
//!
//! Rows live in a vector guarded by a [`RwLock`]. Integer primary keys are
//! assigned on insert when the instance has none. Optional unique-together
//! constraints reject inserts and saves that would duplicate another row.

use crate::error::{DbError, DbResult};
use crate::manager::Manager;
use crate::model::Model;
use crate::query::{Filters, Store, values_match};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct MemoryStore<M: Model> {
	rows: RwLock<Vec<M>>,
	next_pk: AtomicI64,
	unique_together: Vec<Vec<String>>,
}

impl<M: Model> MemoryStore<M> {
	pub fn new() -> Self {
		Self {
			rows: RwLock::new(Vec::new()),
			next_pk: AtomicI64::new(1),
			unique_together: Vec::new(),
		}
	}

	/// Adds a unique-together constraint over `fields`.
	pub fn unique_together(mut self, fields: &[&str]) -> Self {
		self.unique_together
			.push(fields.iter().map(|f| f.to_string()).collect());
		self
	}

	/// Wraps the store in a [`Manager`].
	pub fn into_manager(self) -> Manager<M> {
		Manager::new(Arc::new(self))
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}

	/// Copy of every stored row.
	pub fn snapshot(&self) -> Vec<M> {
		self.rows.read().clone()
	}

	fn same_pk(a: &Value, b: &Value) -> bool {
		values_match(a, b)
	}

	fn pk_taken(rows: &[M], pk: &Value) -> bool {
		rows.iter()
			.filter_map(|row| row.primary_key())
			.any(|existing| Self::same_pk(&existing, pk))
	}

	/// Keeps the counter past an integer key stored by the caller.
	fn advance_past(&self, pk: &Value) {
		if let Some(n) = pk.as_i64() {
			self.next_pk.fetch_max(n.saturating_add(1), Ordering::SeqCst);
		}
	}

	/// Next unused integer key. Callers hold the rows write lock.
	fn assign_pk(&self, rows: &[M]) -> DbResult<i64> {
		loop {
			let pk = self.next_pk.load(Ordering::SeqCst);
			let taken = Self::pk_taken(rows, &Value::from(pk));
			if taken && pk == i64::MAX {
				return Err(DbError::IntegrityError {
					model: M::model_name(),
					message: "primary key space exhausted".to_string(),
				});
			}
			self.next_pk.store(pk.saturating_add(1), Ordering::SeqCst);
			if !taken {
				return Ok(pk);
			}
		}
	}

	fn check_unique(&self, rows: &[M], candidate: &M) -> DbResult<()> {
		let candidate_pk = candidate.primary_key();
		for fields in &self.unique_together {
			let clash = rows.iter().any(|row| {
				let is_self = match (row.primary_key(), &candidate_pk) {
					(Some(a), Some(b)) => Self::same_pk(&a, b),
					_ => false,
				};
				!is_self
					&& fields.iter().all(|field| {
						match (row.field(field), candidate.field(field)) {
							(Some(a), Some(b)) => a == b,
							_ => false,
						}
					})
			});
			if clash {
				return Err(DbError::IntegrityError {
					model: M::model_name(),
					message: format!("unique together constraint on ({}) failed", fields.join(", ")),
				});
			}
		}
		Ok(())
	}
}

impl<M: Model> Default for MemoryStore<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Model> Store<M> for MemoryStore<M> {
	fn select(&self, filters: &Filters, limit: Option<usize>) -> DbResult<Vec<M>> {
		let rows = self.rows.read();
		let matching = rows.iter().filter(|row| row.matches(filters)).cloned();
		Ok(match limit {
			Some(limit) => matching.take(limit).collect(),
			None => matching.collect(),
		})
	}

	fn insert(&self, mut instance: M) -> DbResult<M> {
		let mut rows = self.rows.write();

		match instance.primary_key() {
			Some(pk) => {
				if Self::pk_taken(&rows, &pk) {
					return Err(DbError::IntegrityError {
						model: M::model_name(),
						message: format!("duplicate primary key {}", pk),
					});
				}
				self.check_unique(&rows, &instance)?;
				self.advance_past(&pk);
			}
			None => {
				let pk = self.assign_pk(&rows)?;
				instance.set_field(M::primary_key_field(), Value::from(pk))?;
				self.check_unique(&rows, &instance)?;
			}
		}

		tracing::debug!(model = M::model_name(), pk = ?instance.primary_key(), "inserted row");
		rows.push(instance.clone());
		Ok(instance)
	}

	fn save(&self, instance: &M) -> DbResult<()> {
		let pk = instance
			.primary_key()
			.ok_or(DbError::MissingPrimaryKey(M::model_name()))?;
		let mut rows = self.rows.write();
		self.check_unique(&rows, instance)?;

		let position = rows.iter().position(|row| {
			row.primary_key()
				.is_some_and(|existing| Self::same_pk(&existing, &pk))
		});
		match position {
			Some(index) => rows[index] = instance.clone(),
			None => {
				self.advance_past(&pk);
				rows.push(instance.clone());
			}
		}
		Ok(())
	}

	fn delete(&self, instance: &M) -> DbResult<()> {
		let pk = instance
			.primary_key()
			.ok_or(DbError::MissingPrimaryKey(M::model_name()))?;
		let mut rows = self.rows.write();
		let before = rows.len();
		rows.retain(|row| {
			!row.primary_key()
				.is_some_and(|existing| Self::same_pk(&existing, &pk))
		});
		tracing::debug!(
			model = M::model_name(),
			pk = %pk,
			removed = before - rows.len(),
			"deleted row"
		);
		Ok(())
	}
}
