use serde::{Deserialize, Serialize};

/// Name of the pattern-bearing directive recognized by the temporal
/// renderer.
pub const FORMAT: &str = "format";

/// A declarative rendering directive attached to a field, or inherited
/// from the field's use site.
///
/// Directives are an open set: the flattener only interprets [`FORMAT`],
/// everything else is carried along untouched for other components to
/// read. When descending into a field, the use-site directives come
/// first and the field's own follow, so the first match in a scan is the
/// most broadly scoped one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    name: String,
    #[serde(default)]
    args: Vec<String>,
}

impl Directive {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Directive {
            name: name.into(),
            args,
        }
    }

    /// A [`FORMAT`] directive carrying a strftime pattern.
    pub fn date_format(pattern: impl Into<String>) -> Self {
        Directive {
            name: FORMAT.to_string(),
            args: vec![pattern.into()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether this is the pattern-bearing kind, well-formed or not.
    pub fn is_format(&self) -> bool {
        self.name == FORMAT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_format_is_recognized() {
        let d = Directive::date_format("%Y-%m-%d");
        assert!(d.is_format());
        assert_eq!(d.args(), ["%Y-%m-%d"]);
    }

    #[test]
    fn other_directives_are_not_format() {
        let d = Directive::new("no-binding", vec![]);
        assert!(!d.is_format());
    }

    #[test]
    fn format_without_pattern_is_still_format() {
        // Malformed, but the scan matches on the name; application is
        // what fails and falls back.
        let d = Directive::new(FORMAT, vec![]);
        assert!(d.is_format());
        assert!(d.args().is_empty());
    }
}
