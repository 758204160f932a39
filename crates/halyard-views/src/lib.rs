//! Views for halyard
//!
//! A [`View`] is an ordered list of fields applied to an object graph. Each
//! [`Field`] names a possibly dotted path, resolved attribute by attribute
//! with a fallback to mapping lookup, and may wrap its value in a nested view.
//!
//! ```
//! use halyard_core::Node;
//! use halyard_views::{Emittable, Field, View};
//! use serde_json::json;
//!
//! let author = View::new("Author").field("name").build();
//! let post = View::new("Post")
//! 	.field("title")
//! 	.field(Field::new("author").unwrap().nested(author))
//! 	.field(Field::new("subtitle").unwrap().optional())
//! 	.build();
//!
//! let data = Node::from(json!({ "title": "Hello", "author": { "name": "Ada" } }));
//! let output = post.bind(data).emittable().unwrap();
//!
//! assert_eq!(output, json!({ "title": "Hello", "author": { "name": "Ada" } }));
//! ```

pub mod emitter;
pub mod error;
pub mod field;
pub mod view;

pub use emitter::{Emittable, JsonEmitter};
pub use error::{ViewError, ViewResult};
pub use field::Field;
pub use view::{BoundView, FieldSpec, FieldValue, Rendered, View};
