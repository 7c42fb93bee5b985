use std::collections::BTreeMap;

use serde::Serialize;

/// A value on the right-hand side of a declaration or object entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// `{ key: value, ... }`, entries in source order.
    Object(Vec<(String, Value)>),
    Str(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// `NAME`, `NAME.key`, `NAME[500]` as a list of segments.
    Reference(Vec<String>),
}

impl Value {
    /// Look up an object entry. Later duplicates win.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Value::Object(entries) => format!("object with {} entries", entries.len()),
            Value::Str(s) => format!("string '{s}'"),
            Value::Number(n) => format!("number {n}"),
            Value::Reference(path) => format!("reference {}", path.join(".")),
        }
    }
}

/// A top-level `const NAME = value` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub value: Value,
    pub line: usize,
}

/// Something the parser skipped or could not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

/// A named set of color shades, e.g. `DEEP_CURRENT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: String,
    pub shades: BTreeMap<u16, String>,
}

impl Palette {
    pub fn shade(&self, key: u16) -> Option<&str> {
        self.shades.get(&key).map(String::as_str)
    }

    /// Interpret an object value as a palette.
    ///
    /// Every key must be a shade number. Entries whose value is not a hex
    /// color are dropped and reported in the returned list. Returns `None`
    /// if the value is not shade-keyed or has no usable shades.
    pub fn from_value(name: &str, value: &Value) -> Option<(Palette, Vec<String>)> {
        let Value::Object(entries) = value else {
            return None;
        };
        if entries.is_empty() {
            return None;
        }

        let mut shades = BTreeMap::new();
        let mut dropped = Vec::new();
        for (key, entry) in entries {
            let shade: u16 = key.parse().ok()?;
            match entry {
                Value::Str(s) if is_hex_color(s) => {
                    shades.insert(shade, s.clone());
                }
                other => dropped.push(format!(
                    "{name}[{shade}] is {}, not a hex color",
                    other.describe()
                )),
            }
        }

        if shades.is_empty() {
            return None;
        }
        Some((
            Palette {
                name: name.to_string(),
                shades,
            },
            dropped,
        ))
    }
}

/// Where a semantic role points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AliasTarget {
    /// A palette shade, e.g. `DEEP_CURRENT[500]`.
    Shade { palette: String, shade: u16 },
    /// A literal hex color written directly in the alias.
    Literal { hex: String },
}

impl AliasTarget {
    /// Interpret an alias value.
    ///
    /// Accepted shapes:
    /// - `{ palette: 'DEEP_CURRENT', shade: 500 }` (palette may also be a bare reference)
    /// - `DEEP_CURRENT[500]`
    /// - `'#08A4BD'`
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Object(_) => {
                let palette = match value.get("palette") {
                    Some(Value::Str(s)) => s.clone(),
                    Some(Value::Reference(path)) if path.len() == 1 => path[0].clone(),
                    Some(other) => {
                        return Err(format!("palette is {}, expected a name", other.describe()))
                    }
                    None => return Err("missing `palette` entry".into()),
                };
                let shade = match value.get("shade") {
                    Some(Value::Number(n) | Value::Str(n)) => parse_shade(n)?,
                    Some(other) => {
                        return Err(format!("shade is {}, expected a number", other.describe()))
                    }
                    None => return Err("missing `shade` entry".into()),
                };
                Ok(AliasTarget::Shade { palette, shade })
            }
            Value::Reference(path) if path.len() == 2 => Ok(AliasTarget::Shade {
                palette: path[0].clone(),
                shade: parse_shade(&path[1])?,
            }),
            Value::Str(s) if is_hex_color(s) => Ok(AliasTarget::Literal { hex: s.clone() }),
            other => Err(format!("unsupported alias value: {}", other.describe())),
        }
    }
}

fn parse_shade(s: &str) -> Result<u16, String> {
    s.parse()
        .map_err(|_| format!("shade '{s}' is not a whole number"))
}

/// The parsed contents of a token source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub declarations: Vec<Declaration>,
    /// Aliases declared by role name (`focus-ring`), as manifests do.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Value of a top-level declaration. Later declarations shadow earlier ones.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.name == name)
            .map(|d| &d.value)
    }

    /// Resolve a dotted path such as `SEMANTIC.focus.ring`.
    ///
    /// The first segment names a declaration; the rest walk object keys.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.get(segments.next()?)?;
        for segment in segments {
            value = value.get(segment)?;
        }
        Some(value)
    }

    /// Every declaration that reads as a palette, in source order.
    pub fn palettes(&self) -> Vec<Palette> {
        self.declarations
            .iter()
            .filter_map(|d| Palette::from_value(&d.name, &d.value))
            .map(|(palette, _)| palette)
            .collect()
    }

    /// A single palette by name, logging any dropped shades.
    pub fn palette(&self, name: &str) -> Option<Palette> {
        let (palette, dropped) = Palette::from_value(name, self.get(name)?)?;
        for message in dropped {
            tracing::debug!(palette = %name, "{message}");
        }
        Some(palette)
    }

    /// The alias at `path`: `None` if absent, `Some(Err)` if present but unusable.
    pub fn alias(&self, path: &str) -> Option<Result<AliasTarget, String>> {
        self.lookup(path).map(AliasTarget::from_value)
    }

    /// The alias declared for `role`, e.g. `[aliases.focus-ring]` in a manifest.
    pub fn role_alias(&self, role: &str) -> Option<Result<AliasTarget, String>> {
        self.roles.get(role).map(AliasTarget::from_value)
    }
}

/// `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: &[(&str, Value)]) -> Value {
        Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn s(v: &str) -> Value {
        Value::Str(v.into())
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#08A4BD"));
        assert!(is_hex_color("#08a4bd"));
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#08A4BDCC"));
        assert!(!is_hex_color("08A4BD"));
        assert!(!is_hex_color("#08A4BG"));
        assert!(!is_hex_color("#08A4"));
    }

    #[test]
    fn test_palette_from_value() {
        let value = object(&[("50", s("#E6F6F8")), ("500", s("#08A4BD"))]);
        let (palette, dropped) = Palette::from_value("DEEP_CURRENT", &value).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(palette.shade(500), Some("#08A4BD"));
        assert_eq!(palette.shade(50), Some("#E6F6F8"));
        assert_eq!(palette.shade(900), None);
    }

    #[test]
    fn test_palette_drops_non_hex_shades() {
        let value = object(&[("500", s("#08A4BD")), ("600", s("teal"))]);
        let (palette, dropped) = Palette::from_value("P", &value).unwrap();
        assert_eq!(palette.shades.len(), 1);
        assert_eq!(dropped.len(), 1);
        assert!(dropped[0].contains("P[600]"));
    }

    #[test]
    fn test_non_numeric_keys_are_not_a_palette() {
        let value = object(&[("500", s("#08A4BD")), ("name", s("#000000"))]);
        assert!(Palette::from_value("P", &value).is_none());
        assert!(Palette::from_value("P", &s("#08A4BD")).is_none());
        assert!(Palette::from_value("P", &object(&[])).is_none());
    }

    #[test]
    fn test_alias_shapes() {
        let obj = object(&[
            ("palette", s("DEEP_CURRENT")),
            ("shade", Value::Number("600".into())),
        ]);
        assert_eq!(
            AliasTarget::from_value(&obj),
            Ok(AliasTarget::Shade {
                palette: "DEEP_CURRENT".into(),
                shade: 600
            })
        );

        let reference = Value::Reference(vec!["SLATE".into(), "400".into()]);
        assert_eq!(
            AliasTarget::from_value(&reference),
            Ok(AliasTarget::Shade {
                palette: "SLATE".into(),
                shade: 400
            })
        );

        assert_eq!(
            AliasTarget::from_value(&s("#FF7A5C")),
            Ok(AliasTarget::Literal {
                hex: "#FF7A5C".into()
            })
        );
    }

    #[test]
    fn test_alias_errors() {
        let missing_shade = object(&[("palette", s("DEEP_CURRENT"))]);
        assert!(AliasTarget::from_value(&missing_shade)
            .unwrap_err()
            .contains("shade"));

        let bad_shade = object(&[("palette", s("DEEP_CURRENT")), ("shade", s("dark"))]);
        assert!(AliasTarget::from_value(&bad_shade).is_err());

        assert!(AliasTarget::from_value(&s("teal")).is_err());
    }

    #[test]
    fn test_lookup_walks_nested_objects() {
        let doc = Document {
            declarations: vec![Declaration {
                name: "SEMANTIC".into(),
                value: object(&[("focus", object(&[("ring", s("#08A4BD"))]))]),
                line: 1,
            }],
            ..Document::default()
        };
        assert_eq!(doc.lookup("SEMANTIC.focus.ring"), Some(&s("#08A4BD")));
        assert_eq!(doc.lookup("SEMANTIC.focus.outline"), None);
        assert_eq!(doc.lookup("OTHER"), None);
    }

    #[test]
    fn test_role_alias() {
        let mut doc = Document::default();
        doc.roles.insert(
            "focus-ring".into(),
            object(&[("palette", s("DEEP_CURRENT")), ("shade", Value::Number("600".into()))]),
        );
        assert_eq!(
            doc.role_alias("focus-ring"),
            Some(Ok(AliasTarget::Shade {
                palette: "DEEP_CURRENT".into(),
                shade: 600
            }))
        );
        assert_eq!(doc.role_alias("focus-ring-dark"), None);
        assert_eq!(doc.alias("focus-ring"), None);
    }

    #[test]
    fn test_later_declaration_shadows() {
        let doc = Document {
            declarations: vec![
                Declaration {
                    name: "A".into(),
                    value: s("first"),
                    line: 1,
                },
                Declaration {
                    name: "A".into(),
                    value: s("second"),
                    line: 2,
                },
            ],
            ..Document::default()
        };
        assert_eq!(doc.get("A"), Some(&s("second")));
    }
}
