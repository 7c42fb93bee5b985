//! Stylesheet rendering.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::color_space::Conversion;
use crate::config::OutputConfig;
use crate::resolve::ResolvedToken;

/// Start of the provenance line that carries the generation time.
/// The only line that differs between two runs on the same input.
pub const TIMESTAMP_PREFIX: &str = " * Generated at: ";

/// Resolved and converted focus-ring colors for both modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusRing {
    pub light: ResolvedToken,
    pub light_css: Conversion,
    pub dark: ResolvedToken,
    pub dark_css: Conversion,
}

/// Render the generated stylesheet.
///
/// Pure: the same inputs always give the same text, and `generated_at` only
/// affects the [`TIMESTAMP_PREFIX`] line.
pub fn render(
    focus: &FocusRing,
    source: &Path,
    output: &OutputConfig,
    generated_at: DateTime<Utc>,
) -> String {
    let mut header = vec![
        "/*".to_string(),
        " * AUTO-GENERATED by tidemark. DO NOT EDIT MANUALLY.".to_string(),
        " * Changes are overwritten on the next build; edit the token source instead.".to_string(),
        " *".to_string(),
        format!(" * Source: {}", source.display()),
        format!(
            "{TIMESTAMP_PREFIX}{}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        format!(
            " * Focus ring: {}, {}",
            focus.light.hex, focus.light.resolution
        ),
    ];
    if focus.dark.hex != focus.light.hex || focus.dark.resolution != focus.light.resolution {
        header.push(format!(
            " * Focus ring (dark): {}, {}",
            focus.dark.hex, focus.dark.resolution
        ));
    }
    for conversion in unconverted(focus) {
        header.push(format!(
            " * Warning: no OKLCH mapping for {}, emitted as hex.",
            conversion.input
        ));
    }

    let mut css = header.join("\n");
    css.push('\n');
    css.push_str(" */\n\n");

    css.push_str(&format!(
        ":root {{\n  {}: {};\n  {}: {};\n}}\n",
        output.light_property, focus.light_css.value, output.dark_property, focus.dark_css.value,
    ));

    if !output.dark_selectors.is_empty() {
        css.push_str(&format!(
            "\n{} {{\n  {}: var({});\n}}\n",
            output.dark_selectors.join(",\n"),
            output.light_property,
            output.dark_property,
        ));
    }

    css
}

fn unconverted(focus: &FocusRing) -> Vec<&Conversion> {
    let mut misses: Vec<&Conversion> = Vec::new();
    for conversion in [&focus.light_css, &focus.dark_css] {
        if !conversion.converted && !misses.iter().any(|c| c.input == conversion.input) {
            misses.push(conversion);
        }
    }
    misses
}

/// The stylesheet with its timestamp line removed, for freshness comparison.
pub fn without_timestamp(css: &str) -> String {
    css.lines()
        .filter(|line| !line.starts_with(TIMESTAMP_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read the generation time back out of a rendered stylesheet.
pub fn generated_at(css: &str) -> Option<DateTime<Utc>> {
    css.lines()
        .find_map(|line| line.strip_prefix(TIMESTAMP_PREFIX))
        .and_then(|stamp| DateTime::parse_from_rfc3339(stamp.trim()).ok())
        .map(|stamp| stamp.with_timezone(&Utc))
}
