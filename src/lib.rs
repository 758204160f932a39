//! # Halyard
//!
//! Declarative output views and CRUD handlers over a model layer, inspired by
//! Django resource handlers.
//!
//! - [`views`]: fields, views and emitters that turn object graphs into plain
//!   mappings
//! - [`handlers`]: the CRUD contract, verb dispatch and the handler registry
//! - [`db`]: the model, queryset and store contracts handlers run against
//! - [`conf`]: settings and logging setup
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything below
//! - `views` - field resolution and rendering
//! - `db` - data layer contracts and the in-memory store
//! - `conf` - settings and logging
//! - `handlers` - CRUD handlers; enables `views`, `db` and `conf`
//!
//! ## Quick Example
//!
//! ```rust
//! use halyard::prelude::*;
//! use serde_json::json;
//!
//! let view = View::new("Post")
//! 	.field("title")
//! 	.field(Field::with_destination("author.name", "author").unwrap())
//! 	.build();
//!
//! let output = view
//! 	.render_one(json!({ "title": "Hello", "author": { "name": "Ada" } }))
//! 	.unwrap();
//! assert_eq!(output.len(), 2);
//! ```

pub mod core;

#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "db")]
pub mod db;
#[cfg(feature = "handlers")]
pub mod handlers;
#[cfg(feature = "views")]
pub mod views;

pub use halyard_core::{Accessor, Computed, Node, Outcome, Resolve};

#[cfg(feature = "conf")]
pub use halyard_conf::{Settings, init_logging};

#[cfg(feature = "db")]
pub use halyard_db::{Manager, MemoryStore, Model, QuerySet, Store};

#[cfg(feature = "views")]
pub use halyard_views::{Emittable, Field, JsonEmitter, View};

#[cfg(feature = "handlers")]
pub use halyard_handlers::{
	AnonymousBaseHandler, BaseHandler, Handler, HandlerOptions, Reply, Request, dispatch,
	handlers, register_handler,
};

/// Common imports.
pub mod prelude {
	pub use crate::{Accessor, Computed, Node, Outcome, Resolve};

	#[cfg(feature = "conf")]
	pub use crate::{Settings, init_logging};

	#[cfg(feature = "db")]
	pub use crate::{Manager, MemoryStore, Model, QuerySet, Store};
	#[cfg(feature = "db")]
	pub use halyard_db::{Attrs, DbError, DbResult, Filters, Lookup};

	#[cfg(feature = "views")]
	pub use crate::{Emittable, Field, JsonEmitter, View};
	#[cfg(feature = "views")]
	pub use halyard_views::{ViewError, ViewResult};

	#[cfg(feature = "handlers")]
	pub use crate::{
		AnonymousBaseHandler, BaseHandler, Handler, HandlerOptions, Reply, Request, dispatch,
		handlers, register_handler,
	};
	#[cfg(feature = "handlers")]
	pub use halyard_handlers::{HandlerError, HandlerRegistry, HandlerResult, RequestData};
}
