//! Handler registry
//!
//! Records, for every registered handler type, the model it serves and
//! whether it is anonymous. Registering a second handler for the same
//! `(model, anonymous)` pair is allowed but logs a warning, since lookups by
//! model then depend on registration order.
//!
//! A process-wide registry is available through [`handlers`] and
//! [`register_handler`]. Independent registries can be created with
//! [`HandlerRegistry::new`].

use crate::handler::Handler;
use halyard_conf::Settings;
use halyard_db::ModelKey;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handler types left out of the tracker.
const ABSTRACT_HANDLERS: [&str; 2] = ["BaseHandler", "AnonymousBaseHandler"];

/// Identity of a handler type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerKey {
	type_id: TypeId,
	name: &'static str,
}

impl HandlerKey {
	pub fn of<H: Handler>() -> Self {
		Self {
			type_id: TypeId::of::<H>(),
			name: type_name::<H>(),
		}
	}

	/// Fully qualified type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Type name without module path or generic arguments.
	///
	/// ```
	/// use halyard_db::Unbound;
	/// use halyard_handlers::{BaseHandler, HandlerKey};
	///
	/// assert_eq!(HandlerKey::of::<BaseHandler<Unbound>>().short_name(), "BaseHandler");
	/// ```
	pub fn short_name(&self) -> &'static str {
		let base = self.name.split('<').next().unwrap_or(self.name);
		base.rsplit("::").next().unwrap_or(base)
	}
}

impl fmt::Debug for HandlerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "HandlerKey({})", self.name)
	}
}

impl fmt::Display for HandlerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.short_name())
	}
}

/// What the registry knows about one handler type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
	pub handler: HandlerKey,
	pub model: Option<ModelKey>,
	pub is_anonymous: bool,
}

/// Result of [`HandlerRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
	Registered,
	/// Registered, but `existing` already serves the same model and
	/// anonymous flag.
	Duplicate { existing: HandlerKey },
	/// The handler type was registered before; nothing changed.
	AlreadyRegistered,
}

#[derive(Default)]
struct Inner {
	entries: Vec<RegistryEntry>,
	tracker: Vec<HandlerKey>,
	duplicates: Vec<HandlerKey>,
}

/// Table of handler types, in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
	inner: RwLock<Inner>,
	ignore_duplicate_models: AtomicBool,
}

impl HandlerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry honoring `ignore_duplicate_models` from `settings`.
	pub fn from_settings(settings: &Settings) -> Self {
		let registry = Self::new();
		registry.configure(settings);
		registry
	}

	pub fn configure(&self, settings: &Settings) {
		self.set_ignore_duplicate_models(settings.ignore_duplicate_models);
	}

	/// Silences duplicate model warnings. Duplicates are still recorded.
	pub fn set_ignore_duplicate_models(&self, ignore: bool) {
		self.ignore_duplicate_models.store(ignore, Ordering::Relaxed);
	}

	pub fn ignores_duplicate_models(&self) -> bool {
		self.ignore_duplicate_models.load(Ordering::Relaxed)
	}

	/// Registers handler type `H`.
	pub fn register<H: Handler>(&self) -> Registration {
		let options = H::options();
		let entry = RegistryEntry {
			handler: HandlerKey::of::<H>(),
			model: options.model,
			is_anonymous: options.is_anonymous,
		};

		let mut inner = self.inner.write();
		if inner.entries.iter().any(|e| e.handler == entry.handler) {
			return Registration::AlreadyRegistered;
		}

		let existing = entry.model.and_then(|model| {
			inner
				.entries
				.iter()
				.find(|e| e.model == Some(model) && e.is_anonymous == entry.is_anonymous)
				.map(|e| e.handler)
		});

		let registration = match (existing, entry.model) {
			(Some(existing), Some(model)) => {
				if !self.ignores_duplicate_models() {
					tracing::warn!(
						handler = %entry.handler,
						existing = %existing,
						model = %model,
						"Handler already registered for model {}, you may experience inconsistent results.",
						model
					);
				}
				inner.duplicates.push(entry.handler);
				Registration::Duplicate { existing }
			}
			_ => Registration::Registered,
		};

		if !ABSTRACT_HANDLERS.contains(&entry.handler.short_name()) {
			inner.tracker.push(entry.handler);
		}
		inner.entries.push(entry);
		tracing::debug!(
			handler = %entry.handler,
			model = entry.model.map(|m| m.name()),
			anonymous = entry.is_anonymous,
			"registered handler"
		);

		registration
	}

	/// First handler registered for `(model, anonymous)`.
	pub fn lookup(&self, model: ModelKey, anonymous: bool) -> Option<HandlerKey> {
		self.inner
			.read()
			.entries
			.iter()
			.find(|e| e.model == Some(model) && e.is_anonymous == anonymous)
			.map(|e| e.handler)
	}

	/// Every handler registered for `model`, in registration order.
	pub fn handlers_for(&self, model: ModelKey) -> Vec<RegistryEntry> {
		self.inner
			.read()
			.entries
			.iter()
			.filter(|e| e.model == Some(model))
			.copied()
			.collect()
	}

	pub fn entry<H: Handler>(&self) -> Option<RegistryEntry> {
		let key = HandlerKey::of::<H>();
		self.inner
			.read()
			.entries
			.iter()
			.find(|e| e.handler == key)
			.copied()
	}

	pub fn is_registered<H: Handler>(&self) -> bool {
		self.entry::<H>().is_some()
	}

	pub fn entries(&self) -> Vec<RegistryEntry> {
		self.inner.read().entries.clone()
	}

	/// Concrete handlers in registration order.
	pub fn tracked(&self) -> Vec<HandlerKey> {
		self.inner.read().tracker.clone()
	}

	/// Handlers registered for an already-served `(model, anonymous)` pair.
	pub fn duplicates(&self) -> Vec<HandlerKey> {
		self.inner.read().duplicates.clone()
	}

	pub fn len(&self) -> usize {
		self.inner.read().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.read().entries.is_empty()
	}

	/// Forgets every registration. Primarily for tests.
	pub fn clear(&self) {
		*self.inner.write() = Inner::default();
	}
}

impl fmt::Debug for HandlerRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.read();
		f.debug_struct("HandlerRegistry")
			.field("entries", &inner.entries)
			.field("duplicates", &inner.duplicates)
			.field("ignore_duplicate_models", &self.ignores_duplicate_models())
			.finish()
	}
}

static HANDLERS: Lazy<HandlerRegistry> = Lazy::new(HandlerRegistry::new);

/// The process-wide registry.
pub fn handlers() -> &'static HandlerRegistry {
	&HANDLERS
}

/// Registers `H` in the process-wide registry.
pub fn register_handler<H: Handler>() -> Registration {
	HANDLERS.register::<H>()
}
