//! # Rollmill - Object-Graph Flattening Toolkit
//!
//! A library for unbinding in-memory value trees into flat
//! `path -> string` parameter maps, the inverse of a form-parameter
//! binder. Path names keep enough structure (`user.address.street`,
//! `tags[0]`, `points[1].x`) for the companion binder to rebuild the
//! original graph.
//!
//! ## Modules
//!
//! - **flatten**: the value model, the classifying traversal, and the
//!   query-string writers
//! - **format**: the process-wide default date pattern for temporal
//!   leaves
//!
//! ## Quick Start
//!
//! ```rust
//! use rollmill::flatten::{Field, Flattener, Kind, ObjectValue, Value};
//!
//! # fn main() -> Result<(), rollmill::flatten::FlattenError> {
//! let user = Value::Object(
//!     ObjectValue::new("User")
//!         .with_field(Field::new("name", Kind::Str, Value::Str("Alice".into())))
//!         .with_field(Field::new(
//!             "tags",
//!             Kind::Seq(Box::new(Kind::Str)),
//!             Value::Seq {
//!                 elem: Kind::Str,
//!                 items: vec![Value::Str("admin".into()), Value::Str("staff".into())],
//!             },
//!         )),
//! );
//!
//! let params = Flattener::new().flatten_value(&user, "user")?;
//!
//! assert_eq!(params["user.name"], Some("Alice".to_string()));
//! assert_eq!(params["user.tags[0]"], Some("admin".to_string()));
//! assert_eq!(params["user.tags[1]"], Some("staff".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ### Wire rendering
//!
//! ```rust
//! use rollmill::flatten::{to_query_string, Flattener, Value};
//!
//! let params = Flattener::new()
//!     .flatten_value(&Value::Int(42), "answer")
//!     .unwrap();
//!
//! assert_eq!(to_query_string(&params), "answer=42");
//! ```

pub mod flatten;
pub mod format;

// Re-export commonly used types for convenience
pub use flatten::{
    Directive, Field, FlattenError, Flattener, Kind, ObjectValue, ParamMap, UnbindOverride, Value,
};

/// Main entry point: flatten `value` under `name` into `out` with no
/// collaborator overrides registered.
pub fn flatten(
    out: &mut ParamMap,
    value: &Value,
    name: &str,
    directives: &[Directive],
) -> Result<(), FlattenError> {
    Flattener::new().flatten(out, value, name, directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_flattening() {
        let value = Value::Object(
            ObjectValue::new("User")
                .with_field(Field::new("id", Kind::Int, Value::Int(1)))
                .with_field(Field::new("name", Kind::Str, Value::Str("Alice".into()))),
        );

        let mut out = ParamMap::new();
        flatten(&mut out, &value, "user", &[]).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out["user.id"], Some("1".to_string()));
        assert_eq!(out["user.name"], Some("Alice".to_string()));
    }
}
