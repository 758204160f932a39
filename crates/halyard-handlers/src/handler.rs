//! Handlers
//!
//! A handler binds a model to the CRUD contract. The class-level settings of
//! a handler live in [`HandlerOptions`], returned by [`Handler::options`]; the
//! model capability is the [`Manager`] returned by [`Handler::manager`].
//!
//! ```
//! use halyard_db::{Manager, MemoryStore};
//! use halyard_handlers::{Handler, HandlerOptions};
//! # use halyard_core::{Accessor, Resolve};
//! # use halyard_db::{Attrs, DbResult, Model};
//! # use serde_json::{json, Value};
//! # #[derive(Clone)]
//! # struct Note { id: Option<i64> }
//! # impl Resolve for Note {
//! #     fn attribute(&self, name: &str) -> Option<Accessor> { self.field(name).map(Accessor::plain) }
//! #     fn to_value(&self) -> Value { json!({ "id": self.id }) }
//! # }
//! # impl Model for Note {
//! #     fn model_name() -> &'static str { "Note" }
//! #     fn field(&self, name: &str) -> Option<Value> { (name == "id").then(|| json!(self.id)) }
//! #     fn set_field(&mut self, _: &str, value: Value) -> DbResult<()> { self.id = value.as_i64(); Ok(()) }
//! #     fn from_attrs(_: &Attrs) -> DbResult<Self> { Ok(Note { id: None }) }
//! # }
//!
//! struct NoteHandler {
//!     notes: Manager<Note>,
//! }
//!
//! impl Handler for NoteHandler {
//!     type Model = Note;
//!
//!     fn options() -> HandlerOptions {
//!         HandlerOptions::base().for_model::<Note>()
//!     }
//!
//!     fn manager(&self) -> Option<&Manager<Note>> {
//!         Some(&self.notes)
//!     }
//! }
//!
//! let handler = NoteHandler { notes: MemoryStore::new().into_manager() };
//! assert!(handler.has_model());
//! ```

use crate::crud;
use crate::error::HandlerResult;
use crate::registry::HandlerKey;
use crate::reply::Reply;
use crate::request::Request;
use halyard_db::{Filters, Manager, Model, ModelKey, QuerySet};
use http::Method;
use std::fmt;

/// Class-level handler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOptions {
	/// Model the handler is bound to, if any.
	pub model: Option<ModelKey>,
	pub allowed_methods: Vec<Method>,
	/// Fields hidden from output.
	pub exclude: Vec<String>,
	/// Fields exposed in output. Empty means every field not excluded.
	pub fields: Vec<String>,
	/// Usable without an authenticated identity.
	pub is_anonymous: bool,
	/// Companion handler serving unauthenticated requests.
	pub anonymous: Option<HandlerKey>,
}

impl HandlerOptions {
	/// Defaults of a full CRUD handler: every verb allowed, `id` excluded.
	pub fn base() -> Self {
		Self {
			model: None,
			allowed_methods: vec![Method::GET, Method::POST, Method::PUT, Method::DELETE],
			exclude: vec!["id".to_string()],
			fields: Vec::new(),
			is_anonymous: false,
			anonymous: None,
		}
	}

	/// Defaults of a handler for unauthenticated callers: read only.
	pub fn anonymous_base() -> Self {
		Self {
			allowed_methods: vec![Method::GET],
			is_anonymous: true,
			..Self::base()
		}
	}

	pub fn for_model<M: Model>(mut self) -> Self {
		self.model = Some(ModelKey::of::<M>());
		self
	}

	pub fn allowed_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
		self.allowed_methods = methods.into_iter().collect();
		self
	}

	pub fn exclude<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclude = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = fields.into_iter().map(Into::into).collect();
		self
	}

	/// Links the companion handler used for unauthenticated requests.
	pub fn anonymous_handler<A: Handler>(mut self) -> Self {
		self.anonymous = Some(HandlerKey::of::<A>());
		self
	}

	pub fn allows(&self, method: &Method) -> bool {
		self.allowed_methods.contains(method)
	}

	/// Whether `field` appears in output under `fields` and `exclude`.
	pub fn exposes(&self, field: &str) -> bool {
		let listed = self.fields.is_empty() || self.fields.iter().any(|f| f == field);
		listed && !self.exclude.iter().any(|f| f == field)
	}
}

impl Default for HandlerOptions {
	fn default() -> Self {
		Self::base()
	}
}

/// The CRUD contract.
///
/// Every operation has a default implementation in [`crud`]; override one to
/// customize it and call the [`crud`] function to fall back.
pub trait Handler: Send + Sync + 'static {
	type Model: Model;

	/// Class-level settings, read at registration time.
	fn options() -> HandlerOptions
	where
		Self: Sized;

	/// Model capability. `None` for handlers not backed by a model.
	fn manager(&self) -> Option<&Manager<Self::Model>>;

	fn has_model(&self) -> bool {
		self.manager().is_some()
	}

	/// Base queryset for `request`. Override to scope rows per caller.
	fn queryset(&self, _request: &Request) -> Option<QuerySet<Self::Model>> {
		self.manager().map(Manager::all)
	}

	fn exists(&self, filters: &Filters) -> HandlerResult<bool> {
		crud::exists(self, filters)
	}

	fn read(&self, request: &Request, filters: &Filters) -> HandlerResult<Reply<Self::Model>> {
		crud::read(self, request, filters)
	}

	fn create(&self, request: &Request) -> HandlerResult<Reply<Self::Model>> {
		crud::create(self, request)
	}

	fn update(&self, request: &Request, filters: &Filters) -> HandlerResult<Reply<Self::Model>> {
		crud::update(self, request, filters)
	}

	fn delete(&self, request: &Request, filters: &Filters) -> HandlerResult<Reply<Self::Model>> {
		crud::delete(self, request, filters)
	}
}

/// Ready-made handler giving CRUD over `M`.
pub struct BaseHandler<M: Model> {
	manager: Option<Manager<M>>,
}

impl<M: Model> BaseHandler<M> {
	pub fn new(manager: Manager<M>) -> Self {
		Self {
			manager: Some(manager),
		}
	}

	/// A handler with no model capability.
	pub fn unbound() -> Self {
		Self { manager: None }
	}
}

impl<M: Model> Handler for BaseHandler<M> {
	type Model = M;

	fn options() -> HandlerOptions {
		HandlerOptions::base().for_model::<M>()
	}

	fn manager(&self) -> Option<&Manager<M>> {
		self.manager.as_ref()
	}
}

impl<M: Model> fmt::Debug for BaseHandler<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BaseHandler")
			.field("model", &M::model_name())
			.field("bound", &self.manager.is_some())
			.finish()
	}
}

/// Ready-made read-only handler for unauthenticated callers.
pub struct AnonymousBaseHandler<M: Model> {
	manager: Option<Manager<M>>,
}

impl<M: Model> AnonymousBaseHandler<M> {
	pub fn new(manager: Manager<M>) -> Self {
		Self {
			manager: Some(manager),
		}
	}
}

impl<M: Model> Handler for AnonymousBaseHandler<M> {
	type Model = M;

	fn options() -> HandlerOptions {
		HandlerOptions::anonymous_base().for_model::<M>()
	}

	fn manager(&self) -> Option<&Manager<M>> {
		self.manager.as_ref()
	}
}

impl<M: Model> fmt::Debug for AnonymousBaseHandler<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnonymousBaseHandler")
			.field("model", &M::model_name())
			.finish_non_exhaustive()
	}
}
