//! Handlers for halyard
//!
//! A [`Handler`] exposes a model through read, create, update and delete.
//! The default operations in [`crud`] map data-layer results onto
//! [`Outcome`](halyard_core::Outcome) codes, and [`dispatch`] routes a request
//! to the operation for its verb.
//!
//! Handler types are announced to a [`HandlerRegistry`] at startup, which
//! remembers the model each one serves and warns when two handlers claim the
//! same model.

pub mod crud;
pub mod error;
pub mod handler;
pub mod registry;
pub mod reply;
pub mod request;

pub use crud::dispatch;
pub use error::{HandlerError, HandlerResult};
pub use handler::{AnonymousBaseHandler, BaseHandler, Handler, HandlerOptions};
pub use registry::{
	HandlerKey, HandlerRegistry, Registration, RegistryEntry, handlers, register_handler,
};
pub use reply::Reply;
pub use request::{Request, RequestData};
