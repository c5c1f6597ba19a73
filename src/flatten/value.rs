use std::cell::Cell;
use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flatten::directive::Directive;

bitflags::bitflags! {
    /// Structural modifiers attached to a field.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
        const TRANSIENT = 1 << 2;
        const SYNTHETIC = 1 << 3;
    }
}

/// Fields carrying any of these modifiers are invisible to the flattener,
/// and to the companion binder that reconstructs objects from the map.
/// The two must agree bit-for-bit or a round trip drops data.
pub const NON_WRITABLE: Modifiers = Modifiers::STATIC
    .union(Modifiers::FINAL)
    .union(Modifiers::TRANSIENT);

/// Declared type of a value, independent of any runtime instance.
///
/// Where the runtime value is present its own kind governs classification;
/// the declared kind takes over when the value is `Null`, so an untyped
/// null still lands in the right strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// Unknown declared type, e.g. a field typed as "anything".
    Any,
    Str,
    Int,
    UInt,
    Float,
    Bool,
    Decimal,
    Enum,
    /// A type descriptor used as a value.
    Type,
    Temporal,
    Seq(Box<Kind>),
    Collection(Box<Kind>),
    Map,
    Composite(String),
}

impl Kind {
    /// The leaf predicate: kinds with a direct one-line string rendering.
    /// Recursion stops exactly where this returns true.
    pub fn is_direct(&self) -> bool {
        matches!(
            self,
            Kind::Str
                | Kind::Int
                | Kind::UInt
                | Kind::Float
                | Kind::Bool
                | Kind::Decimal
                | Kind::Enum
                | Kind::Type
        )
    }
}

/// A node in the value tree being flattened.
///
/// The tree is self-describing: every variant carries enough type
/// information to classify itself, and container variants also carry the
/// declared kind of their elements for the sake of `Null` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Decimal(Decimal),
    Enum { type_name: String, variant: String },
    /// A type descriptor (metatype). Not data; never expanded.
    Type(String),
    Temporal(NaiveDateTime),
    /// Fixed-length sequence.
    Seq { elem: Kind, items: Vec<Value> },
    /// Dynamic non-map collection, already in iteration order.
    Collection { elem: Kind, items: Vec<Value> },
    /// Key-value mapping. Carried so it can be rejected with a clear error.
    Map(Vec<(String, Value)>),
    Object(ObjectValue),
}

impl Value {
    /// The runtime kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Any,
            Value::Str(_) => Kind::Str,
            Value::Int(_) => Kind::Int,
            Value::UInt(_) => Kind::UInt,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Decimal(_) => Kind::Decimal,
            Value::Enum { .. } => Kind::Enum,
            Value::Type(_) => Kind::Type,
            Value::Temporal(_) => Kind::Temporal,
            Value::Seq { elem, .. } => Kind::Seq(Box::new(elem.clone())),
            Value::Collection { elem, .. } => Kind::Collection(Box::new(elem.clone())),
            Value::Map(_) => Kind::Map,
            Value::Object(obj) => Kind::Composite(obj.type_name().to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Canonical one-line rendering. This is what leaf entries contain.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Enum { variant, .. } => f.write_str(variant),
            Value::Type(name) => f.write_str(name),
            Value::Temporal(dt) => write!(f, "{}", dt),
            Value::Seq { items, .. } | Value::Collection { items, .. } => {
                write!(f, "[{} items]", items.len())
            }
            Value::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
            Value::Object(obj) => f.write_str(obj.type_name()),
        }
    }
}

/// A composite value: a named type with declared fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectValue {
    type_name: String,
    fields: Vec<Field>,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        ObjectValue {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The object's own declared fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Access control on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Access {
    #[default]
    Public,
    /// Readable only while elevated.
    Private,
    /// Never readable, elevated or not.
    Sealed,
}

/// Raised when a field's value cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("field is sealed against elevated access")]
    Sealed,
    #[error("private field read without elevation")]
    Restricted,
}

/// A declared member of a composite value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    kind: Kind,
    value: Value,
    #[serde(default)]
    directives: Vec<Directive>,
    #[serde(default)]
    modifiers: Modifiers,
    #[serde(default)]
    access: Access,
    /// Runtime suppression of the access check, mirroring the elevation
    /// state of a reflective accessor. Never persisted.
    #[serde(skip)]
    accessible: Cell<bool>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: Kind, value: Value) -> Self {
        Field {
            name: name.into(),
            kind,
            value,
            directives: Vec::new(),
            modifiers: Modifiers::empty(),
            access: Access::Public,
            accessible: Cell::new(false),
        }
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind, which may be broader than the value's runtime kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Directives declared directly on this field.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Suppress the access check until the returned guard drops. The prior
    /// elevation state is restored on drop, so nested elevations compose.
    pub fn elevate(&self) -> AccessGuard<'_> {
        let prior = self.accessible.replace(true);
        AccessGuard { field: self, prior }
    }

    /// Read the field's current value, honoring access control.
    pub fn read(&self) -> Result<&Value, AccessError> {
        match self.access {
            Access::Sealed => Err(AccessError::Sealed),
            Access::Private if !self.accessible.get() => Err(AccessError::Restricted),
            _ => Ok(&self.value),
        }
    }
}

/// Scoped access elevation for one field. See [`Field::elevate`].
#[must_use = "the elevation ends as soon as the guard drops"]
pub struct AccessGuard<'a> {
    field: &'a Field,
    prior: bool,
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        self.field.accessible.set(self.prior);
    }
}
