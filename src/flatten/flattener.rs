use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::{debug, trace};
use thiserror::Error;

use crate::flatten::directive::Directive;
use crate::flatten::value::{AccessError, Kind, Value, NON_WRITABLE};
use crate::format;

/// The flat output mapping. `None` is an explicit null entry, written for
/// absent leaves so the companion binder can restore them.
pub type ParamMap = BTreeMap<String, Option<String>>;

/// Collaborator hook consulted once per node before any built-in
/// strategy. A `Some` result fully replaces built-in handling for that
/// node, and its entries may overwrite keys already in the output.
pub trait UnbindOverride {
    fn try_unbind(&self, value: &Value, name: &str) -> Option<ParamMap>;
}

/// Raised when the traversal meets a value it refuses to flatten. The
/// whole call aborts; nothing is retried.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("flattening map values is not supported yet (at `{path}`)")]
    MapsUnsupported { path: String },

    #[error("`{type_name}` won't unbind field `{field}`: {source}")]
    FieldRead {
        type_name: String,
        field: String,
        #[source]
        source: AccessError,
    },
}

/// Recursively converts a value tree into a flat `path -> string` map.
///
/// Entries are written first-writer-wins; only override hooks may
/// replace an existing entry. The traversal assumes a tree of bounded
/// depth and never mutates the source graph.
#[derive(Default)]
pub struct Flattener {
    overrides: Vec<Box<dyn UnbindOverride>>,
}

impl Flattener {
    pub fn new() -> Self {
        Flattener {
            overrides: Vec::new(),
        }
    }

    /// Register a collaborator override. Hooks are consulted in
    /// registration order; the first `Some` wins.
    pub fn with_override(mut self, hook: impl UnbindOverride + 'static) -> Self {
        self.overrides.push(Box::new(hook));
        self
    }

    /// Flatten `value` under `name` into `out`.
    ///
    /// An absent root writes nothing, and a metatype root is not data,
    /// so both are no-ops. Everything else classifies by the value's own
    /// runtime kind.
    pub fn flatten(
        &self,
        out: &mut ParamMap,
        value: &Value,
        name: &str,
        directives: &[Directive],
    ) -> Result<(), FlattenError> {
        match value {
            Value::Null => Ok(()),
            Value::Type(_) => Ok(()),
            _ => self.unbind(out, value, &value.kind(), name, directives),
        }
    }

    /// Flatten into a fresh map and return it.
    pub fn flatten_value(&self, value: &Value, name: &str) -> Result<ParamMap, FlattenError> {
        let mut out = ParamMap::new();
        self.flatten(&mut out, value, name, &[])?;
        Ok(out)
    }

    fn unbind(
        &self,
        out: &mut ParamMap,
        value: &Value,
        kind: &Kind,
        name: &str,
        directives: &[Directive],
    ) -> Result<(), FlattenError> {
        trace!("unbinding `{}` as {:?}", name, kind);

        for hook in &self.overrides {
            if let Some(sub) = hook.try_unbind(value, name) {
                debug!("override produced {} entries for `{}`", sub.len(), name);
                // Override entries replace existing ones; the one
                // exception to first-writer-wins.
                out.extend(sub);
                return Ok(());
            }
        }

        if value.is_null() {
            // An absent composite yields nothing for its subtree; every
            // other absent kind records an explicit null so the binder
            // can restore the field.
            if !matches!(kind, Kind::Composite(_)) {
                write_if_vacant(out, name, None);
            }
            return Ok(());
        }

        if value.kind().is_direct() {
            write_if_vacant(out, name, Some(value.to_string()));
            return Ok(());
        }

        match value {
            Value::Seq { elem, items } => {
                for (i, item) in items.iter().enumerate() {
                    let child = format!("{}[{}]", name, i);
                    self.unbind(out, item, elem, &child, directives)?;
                }
                Ok(())
            }
            Value::Collection { elem, items } => {
                // Materialize in iteration order, then reuse the
                // sequence strategy.
                let seq = Value::Seq {
                    elem: elem.clone(),
                    items: items.clone(),
                };
                self.unbind(out, &seq, kind, name, directives)
            }
            Value::Map(_) => Err(FlattenError::MapsUnsupported {
                path: name.to_string(),
            }),
            Value::Temporal(dt) => {
                write_if_vacant(out, name, Some(render_temporal(dt, directives)));
                Ok(())
            }
            Value::Object(obj) => {
                for field in obj.fields() {
                    if field.modifiers().intersects(NON_WRITABLE) {
                        continue;
                    }

                    let child = format!("{}.{}", name, field.name());

                    // Use-site directives first, the field's own after,
                    // so both scopes are visible below.
                    let mut child_directives = directives.to_vec();
                    child_directives.extend_from_slice(field.directives());

                    let _access = field.elevate();
                    let field_value =
                        field.read().map_err(|source| FlattenError::FieldRead {
                            type_name: obj.type_name().to_string(),
                            field: field.name().to_string(),
                            source,
                        })?;

                    self.unbind(out, field_value, field.kind(), &child, &child_directives)?;
                }
                Ok(())
            }
            // Null and direct leaves returned above.
            _ => Ok(()),
        }
    }
}

/// Render a temporal leaf: the first format directive wins; any failure
/// applying it abandons the scan and falls back to the process default.
fn render_temporal(dt: &NaiveDateTime, directives: &[Directive]) -> String {
    if let Some(directive) = directives.iter().find(|d| d.is_format()) {
        if let Some(rendered) = directive
            .args()
            .first()
            .and_then(|pattern| format::try_format(dt, pattern))
        {
            return rendered;
        }
        debug!("unusable format directive, using the default pattern");
    }
    format::format_with_default(dt)
}

fn write_if_vacant(out: &mut ParamMap, name: &str, value: Option<String>) {
    out.entry(name.to_string()).or_insert(value);
}
