//! Structured token manifests.
//!
//! ```toml
//! [palettes.DEEP_CURRENT]
//! 500 = "#08A4BD"
//!
//! [aliases.focus-ring]
//! palette = "DEEP_CURRENT"
//! shade = 500
//! ```
//!
//! Each `palettes.<NAME>` table becomes a declaration named `NAME` and each
//! `aliases.<role>` entry becomes the alias for that role. Any other
//! top-level table is kept as a plain declaration, so dotted alias paths
//! such as `SEMANTIC.focus.ring` resolve the same way they do in a
//! TypeScript source.

use crate::document::{Declaration, Diagnostic, Document, Value};

const PALETTES: &str = "palettes";
const ALIASES: &str = "aliases";

/// Parse a TOML manifest into a [`Document`].
///
/// Unlike [`crate::parse`], malformed TOML is an error: a structured source
/// has no partial reading. Unsupported value types (booleans, floats, arrays,
/// dates) are dropped and recorded as diagnostics.
pub fn parse_manifest(source: &str) -> Result<Document, toml::de::Error> {
    let table: toml::Table = toml::from_str(source)?;
    let mut document = Document::default();
    let mut dropped = Vec::new();

    for (name, value) in table {
        match (name.as_str(), value) {
            (PALETTES, toml::Value::Table(palettes)) => {
                for (palette, value) in palettes {
                    let path = format!("{PALETTES}.{palette}");
                    if let Some(value) = convert(&path, value, &mut dropped) {
                        document.declarations.push(Declaration {
                            name: palette,
                            value,
                            line: 0,
                        });
                    } else {
                        dropped.push(format!("{path}: unsupported value type"));
                    }
                }
            }
            (ALIASES, toml::Value::Table(aliases)) => {
                for (role, value) in aliases {
                    let path = format!("{ALIASES}.{role}");
                    if let Some(value) = convert(&path, value, &mut dropped) {
                        document.roles.insert(role, value);
                    } else {
                        dropped.push(format!("{path}: unsupported value type"));
                    }
                }
            }
            (PALETTES | ALIASES, _) => dropped.push(format!("{name}: expected a table")),
            (_, value) => match convert(&name, value, &mut dropped) {
                Some(value) => document.declarations.push(Declaration {
                    name: name.clone(),
                    value,
                    line: 0,
                }),
                None => dropped.push(format!("{name}: unsupported top-level value")),
            },
        }
    }

    for message in dropped {
        tracing::debug!("Manifest entry skipped: {message}");
        document.diagnostics.push(Diagnostic { line: 0, message });
    }

    Ok(document)
}

fn convert(path: &str, value: toml::Value, dropped: &mut Vec<String>) -> Option<Value> {
    match value {
        toml::Value::String(s) => Some(Value::Str(s)),
        toml::Value::Integer(n) => Some(Value::Number(n.to_string())),
        toml::Value::Table(table) => {
            let entries = table
                .into_iter()
                .filter_map(|(key, value)| {
                    let child = format!("{path}.{key}");
                    match convert(&child, value, dropped) {
                        Some(value) => Some((key, value)),
                        None => {
                            dropped.push(format!("{child}: unsupported value type"));
                            None
                        }
                    }
                })
                .collect();
            Some(Value::Object(entries))
        }
        _ => None,
    }
}
