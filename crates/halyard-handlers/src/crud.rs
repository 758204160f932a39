//! Default CRUD operations
//!
//! These back the default methods of [`Handler`]. Expected conditions are
//! returned as [`Outcome`] replies; only store failures and [`delete`] on a
//! handler without a model are errors.
//!
//! `create` checks for an existing instance before inserting. The check and
//! the insert are separate store calls, so two concurrent identical creates
//! can both pass the check. A store-level unique constraint closes the window:
//! its integrity error is reported as [`Outcome::DuplicateEntry`].

use crate::error::{HandlerError, HandlerResult};
use crate::handler::Handler;
use crate::reply::Reply;
use crate::request::Request;
use halyard_core::Outcome;
use halyard_db::{DbError, Filters, Lookup, Model};
use serde_json::Value;

fn status<H: Handler + ?Sized>(outcome: Outcome) -> HandlerResult<Reply<H::Model>> {
	tracing::debug!(outcome = %outcome, "handler outcome");
	Ok(Reply::Status(outcome))
}

/// Maps a store error to an outcome when it was caused by the caller.
fn rejected<H: Handler + ?Sized>(err: DbError) -> HandlerResult<Reply<H::Model>> {
	if err.is_integrity_error() {
		return status::<H>(Outcome::DuplicateEntry);
	}
	if err.is_validation_error() {
		tracing::debug!(error = %err, "rejected request attributes");
		return status::<H>(Outcome::BadRequest);
	}
	Err(err.into())
}

fn primary_key<'a, M: Model>(filters: &'a Filters) -> Option<&'a Value> {
	filters.get(M::primary_key_field())
}

/// Returns `true` when an instance matches `filters`.
pub fn exists<H: Handler + ?Sized>(handler: &H, filters: &Filters) -> HandlerResult<bool> {
	let manager = handler.manager().ok_or(HandlerError::NotImplemented)?;
	Ok(manager.get(filters)?.is_found())
}

/// Fetches one instance by primary key, or a lazy filtered collection when
/// `filters` holds no primary key.
pub fn read<H: Handler + ?Sized>(
	handler: &H,
	request: &Request,
	filters: &Filters,
) -> HandlerResult<Reply<H::Model>> {
	let Some(queryset) = handler.queryset(request) else {
		return status::<H>(Outcome::NotImplemented);
	};

	match primary_key::<H::Model>(filters) {
		Some(pk) => match queryset.get_by_pk(pk)? {
			Lookup::Found(instance) => Ok(Reply::Instance(instance)),
			Lookup::NotFound => status::<H>(Outcome::NotFound),
			Lookup::Ambiguous => status::<H>(Outcome::BadRequest),
		},
		None => Ok(Reply::Collection(queryset.filter(filters))),
	}
}

/// Creates an instance from the flattened payload unless one with the same
/// attributes exists.
pub fn create<H: Handler + ?Sized>(handler: &H, request: &Request) -> HandlerResult<Reply<H::Model>> {
	let (Some(manager), Some(queryset)) = (handler.manager(), handler.queryset(request)) else {
		return status::<H>(Outcome::NotImplemented);
	};

	let attrs = request.data().flatten();
	match queryset.get(&attrs)? {
		Lookup::Found(_) | Lookup::Ambiguous => return status::<H>(Outcome::DuplicateEntry),
		Lookup::NotFound => {}
	}

	match manager.create(&attrs) {
		Ok(instance) => {
			tracing::debug!(model = H::Model::model_name(), "created instance");
			Ok(Reply::Instance(instance))
		}
		Err(err) => rejected::<H>(err),
	}
}

/// Applies the flattened payload to the instance addressed by primary key.
pub fn update<H: Handler + ?Sized>(
	handler: &H,
	request: &Request,
	filters: &Filters,
) -> HandlerResult<Reply<H::Model>> {
	let (Some(manager), Some(queryset)) = (handler.manager(), handler.queryset(request)) else {
		return status::<H>(Outcome::NotImplemented);
	};
	let Some(pk) = primary_key::<H::Model>(filters) else {
		return status::<H>(Outcome::BadRequest);
	};

	let mut instance = match queryset.get_by_pk(pk)? {
		Lookup::Found(instance) => instance,
		Lookup::NotFound => return status::<H>(Outcome::NotFound),
		Lookup::Ambiguous => return status::<H>(Outcome::BadRequest),
	};

	for (name, value) in request.data().flatten() {
		if let Err(err) = instance.set_field(&name, value) {
			return rejected::<H>(err);
		}
	}
	if let Err(err) = manager.save(&instance) {
		return rejected::<H>(err);
	}
	status::<H>(Outcome::AllOk)
}

/// Deletes the single instance matching `filters`.
///
/// Unlike the other operations, a handler without a model is an error here
/// rather than a [`Outcome::NotImplemented`] reply.
pub fn delete<H: Handler + ?Sized>(
	handler: &H,
	request: &Request,
	filters: &Filters,
) -> HandlerResult<Reply<H::Model>> {
	let (Some(manager), Some(queryset)) = (handler.manager(), handler.queryset(request)) else {
		return Err(HandlerError::NotImplemented);
	};

	match queryset.get(filters)? {
		Lookup::Found(instance) => {
			manager.delete(&instance)?;
			status::<H>(Outcome::Deleted)
		}
		Lookup::Ambiguous => status::<H>(Outcome::DuplicateEntry),
		Lookup::NotFound => status::<H>(Outcome::NotHere),
	}
}

/// Routes `request` to the operation for its verb.
///
/// Verbs missing from the handler's `allowed_methods` are refused before any
/// operation runs.
pub fn dispatch<H: Handler>(
	handler: &H,
	request: &Request,
	filters: &Filters,
) -> HandlerResult<Reply<H::Model>> {
	let method = request.method();
	if !H::options().allows(method) {
		tracing::debug!(%method, handler = std::any::type_name::<H>(), "method not allowed");
		return Err(HandlerError::MethodNotAllowed(method.clone()));
	}

	match method.as_str() {
		"GET" => handler.read(request, filters),
		"POST" => handler.create(request),
		"PUT" => handler.update(request, filters),
		"DELETE" => handler.delete(request, filters),
		_ => Err(HandlerError::MethodNotAllowed(method.clone())),
	}
}
