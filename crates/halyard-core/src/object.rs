//! Object graph nodes
//!
//! Field paths such as `author.profile.display_name` are resolved against a
//! graph of [`Node`]s. A node is either plain JSON data, an object exposing
//! named attributes through [`Resolve`], or a list of nodes.
//!
//! Attribute access returns an [`Accessor`], which tells the caller whether the
//! attribute is a stored value or a computed one that must be invoked.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An object that exposes named attributes to field resolution.
///
/// # Examples
///
/// ```
/// use halyard_core::{Accessor, Computed, Node, Resolve};
/// use serde_json::{json, Value};
///
/// struct Author {
///     first: String,
///     last: String,
/// }
///
/// impl Resolve for Author {
///     fn attribute(&self, name: &str) -> Option<Accessor> {
///         match name {
///             "first" => Some(Accessor::plain(json!(self.first))),
///             "full_name" => {
///                 let full = format!("{} {}", self.first, self.last);
///                 Some(Accessor::Computed(Computed::new(move || Node::from(json!(full.clone())))))
///             }
///             _ => None,
///         }
///     }
///
///     fn to_value(&self) -> Value {
///         json!({ "first": self.first, "last": self.last })
///     }
/// }
///
/// let node = Node::object(Author { first: "Ada".into(), last: "Lovelace".into() });
/// assert!(node.attribute("full_name").is_some());
/// assert!(node.attribute("missing").is_none());
/// ```
pub trait Resolve: Send + Sync {
	/// Attribute-style access. `None` means the object has no such attribute.
	fn attribute(&self, name: &str) -> Option<Accessor>;

	/// Mapping-style access, consulted when attribute access fails.
	fn item(&self, _key: &str) -> Option<Node> {
		None
	}

	/// Plain data form, used when the object reaches an encoder without a view.
	fn to_value(&self) -> Value;

	/// Name used in diagnostics.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// A value reached while walking a field path.
#[derive(Clone)]
pub enum Node {
	/// Plain data. JSON objects answer mapping-style lookups.
	Value(Value),
	/// An object exposing attributes.
	Object(Arc<dyn Resolve>),
	/// A sequence of nodes, such as a reverse relation.
	List(Vec<Node>),
}

impl Node {
	/// The null node.
	pub fn null() -> Self {
		Node::Value(Value::Null)
	}

	/// Wraps an object implementing [`Resolve`].
	pub fn object(object: impl Resolve + 'static) -> Self {
		Node::Object(Arc::new(object))
	}

	/// Returns `true` for JSON `null`.
	pub fn is_null(&self) -> bool {
		matches!(self, Node::Value(Value::Null))
	}

	/// Attribute-style access on this node.
	///
	/// Only objects have attributes; plain data and lists never do.
	pub fn attribute(&self, name: &str) -> Option<Accessor> {
		match self {
			Node::Object(object) => object.attribute(name),
			Node::Value(_) | Node::List(_) => None,
		}
	}

	/// Mapping-style access on this node.
	pub fn item(&self, key: &str) -> Option<Node> {
		match self {
			Node::Value(Value::Object(map)) => map.get(key).cloned().map(Node::Value),
			Node::Object(object) => object.item(key),
			Node::Value(_) | Node::List(_) => None,
		}
	}

	/// Converts the node to plain JSON.
	pub fn to_value(&self) -> Value {
		match self {
			Node::Value(value) => value.clone(),
			Node::Object(object) => object.to_value(),
			Node::List(items) => Value::Array(items.iter().map(Node::to_value).collect()),
		}
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Node::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Node::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
			Node::List(items) => f.debug_tuple("List").field(items).finish(),
		}
	}
}

impl From<Value> for Node {
	fn from(value: Value) -> Self {
		Node::Value(value)
	}
}

impl From<Arc<dyn Resolve>> for Node {
	fn from(object: Arc<dyn Resolve>) -> Self {
		Node::Object(object)
	}
}

impl From<Vec<Node>> for Node {
	fn from(items: Vec<Node>) -> Self {
		Node::List(items)
	}
}

/// The result of attribute-style access.
#[derive(Clone, Debug)]
pub enum Accessor {
	/// A stored value.
	Plain(Node),
	/// A computed attribute that must be invoked to obtain its value.
	Computed(Computed),
}

impl Accessor {
	/// Shorthand for a plain accessor.
	pub fn plain(node: impl Into<Node>) -> Self {
		Accessor::Plain(node.into())
	}
}

type ComputeFn = dyn Fn(&[Node]) -> Node + Send + Sync;

/// A computed attribute with a declared arity.
///
/// Field resolution always invokes computed attributes with zero arguments, so
/// an attribute declared with a non-zero arity fails with [`ArityMismatch`].
#[derive(Clone)]
pub struct Computed {
	arity: usize,
	func: Arc<ComputeFn>,
}

impl Computed {
	/// Creates a zero-argument computed attribute.
	pub fn new<F>(func: F) -> Self
	where
		F: Fn() -> Node + Send + Sync + 'static,
	{
		Self {
			arity: 0,
			func: Arc::new(move |_| func()),
		}
	}

	/// Creates a computed attribute expecting `arity` arguments.
	pub fn with_arity<F>(arity: usize, func: F) -> Self
	where
		F: Fn(&[Node]) -> Node + Send + Sync + 'static,
	{
		Self {
			arity,
			func: Arc::new(func),
		}
	}

	/// Number of arguments the attribute expects.
	pub fn arity(&self) -> usize {
		self.arity
	}

	/// Invokes the attribute.
	pub fn call(&self, args: &[Node]) -> Result<Node, ArityMismatch> {
		if args.len() != self.arity {
			return Err(ArityMismatch {
				expected: self.arity,
				given: args.len(),
			});
		}
		Ok((self.func)(args))
	}
}

impl fmt::Debug for Computed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Computed")
			.field("arity", &self.arity)
			.finish_non_exhaustive()
	}
}

/// A computed attribute was invoked with the wrong number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("computed attribute takes {expected} argument(s) but {given} were given")]
pub struct ArityMismatch {
	pub expected: usize,
	pub given: usize,
}
