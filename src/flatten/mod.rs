//! Object-graph flattening - convert a value tree into flat parameters
//!
//! This module turns a self-describing value tree into a flat mapping
//! from dotted/bracketed path names (`user.address.street`, `tags[0]`)
//! to rendered string values, the shape consumed by query strings,
//! hidden form fields and redirect URLs.

pub mod directive;
pub mod flattener;
pub mod value;
pub mod writer;

pub use directive::Directive;
pub use flattener::{FlattenError, Flattener, ParamMap, UnbindOverride};
pub use value::{Access, AccessError, Field, Kind, Modifiers, ObjectValue, Value, NON_WRITABLE};
pub use writer::{redirect_url, to_query_string};
