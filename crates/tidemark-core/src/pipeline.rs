//! read → parse → resolve → convert → emit → write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tidemark_parse::Document;

use crate::color_space;
use crate::config::Config;
use crate::emit::{self, FocusRing};
use crate::error::TidemarkError;
use crate::resolve::{self, Degradation};

/// A rendered stylesheet and everything that went into it.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub css: String,
    pub focus: FocusRing,
    pub degradations: Vec<Degradation>,
}

/// Outcome of a `generate` run.
#[derive(Debug, Clone)]
pub struct Report {
    pub output: PathBuf,
    pub generated: Generated,
}

/// Whether the output file matches what the source would generate now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    UpToDate,
    Stale {
        generated_at: Option<DateTime<Utc>>,
    },
    Missing,
}

/// Read and parse the token source.
///
/// `.toml` paths are read as structured manifests; anything else goes through
/// the declaration parser. Only an unreadable file or an invalid manifest is
/// an error.
pub fn load_document(path: &Path) -> Result<Document, TidemarkError> {
    let text = std::fs::read_to_string(path).map_err(|source| TidemarkError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = if is_manifest(path) {
        tidemark_parse::parse_manifest(&text).map_err(|source| TidemarkError::Manifest {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        tidemark_parse::parse(&text)
    };

    tracing::debug!(
        path = %path.display(),
        declarations = document.declarations.len(),
        skipped = document.diagnostics.len(),
        "Token source parsed"
    );
    for diagnostic in &document.diagnostics {
        tracing::warn!(
            path = %path.display(),
            line = diagnostic.line,
            "Skipped unreadable token entry: {}",
            diagnostic.message
        );
    }
    Ok(document)
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

/// Resolve, convert and render from an already-parsed document.
pub fn build_from(document: &Document, config: &Config, generated_at: DateTime<Utc>) -> Generated {
    let (light, mut degradations) = resolve::resolve_focus(document, &config.tokens);
    let (dark, dark_degradations) = resolve::resolve_focus_dark(document, &config.tokens, &light);
    degradations.extend(dark_degradations);

    let light_css = color_space::to_oklch(&light.hex);
    let dark_css = if dark.hex == light.hex {
        light_css.clone()
    } else {
        color_space::to_oklch(&dark.hex)
    };
    for conversion in [&light_css, &dark_css] {
        let unmapped = Degradation::UnmappedColor {
            hex: conversion.input.clone(),
        };
        if !conversion.converted && !degradations.contains(&unmapped) {
            degradations.push(unmapped);
        }
    }

    let focus = FocusRing {
        light,
        light_css,
        dark,
        dark_css,
    };
    let css = emit::render(&focus, &config.paths.source, &config.output, generated_at);

    Generated {
        css,
        focus,
        degradations,
    }
}

/// Read the configured source and render the stylesheet in memory.
///
/// In strict mode any degradation is an error.
pub fn build(config: &Config, generated_at: DateTime<Utc>) -> Result<Generated, TidemarkError> {
    let document = load_document(&config.paths.source)?;
    let generated = build_from(&document, config, generated_at);

    if config.strict && !generated.degradations.is_empty() {
        return Err(TidemarkError::Degraded(
            generated
                .degradations
                .iter()
                .map(ToString::to_string)
                .collect(),
        ));
    }
    Ok(generated)
}

/// Run the full pipeline and overwrite the output file.
pub fn generate(config: &Config) -> Result<Report, TidemarkError> {
    let generated = build(config, Utc::now())?;
    let output = config.paths.output.clone();
    write_output(&output, &generated.css)?;

    let light = &generated.focus.light;
    tracing::info!(
        output = %output.display(),
        color = %light.hex,
        css = %generated.focus.light_css.value,
        resolution = %light.resolution,
        degraded = generated.degradations.len(),
        "Focus ring stylesheet generated"
    );

    Ok(Report { output, generated })
}

/// Compare the existing output with a fresh render, ignoring the timestamp.
pub fn check(config: &Config) -> Result<Freshness, TidemarkError> {
    let generated = build(config, Utc::now())?;
    let path = &config.paths.output;

    let existing = match std::fs::read_to_string(path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Freshness::Missing),
        Err(source) => {
            return Err(TidemarkError::Read {
                path: path.clone(),
                source,
            })
        }
    };

    if emit::without_timestamp(&existing) == emit::without_timestamp(&generated.css) {
        Ok(Freshness::UpToDate)
    } else {
        Ok(Freshness::Stale {
            generated_at: emit::generated_at(&existing),
        })
    }
}

fn write_output(path: &Path, css: &str) -> Result<(), TidemarkError> {
    let to_error = |source| TidemarkError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, css).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolution;

    const TOKENS: &str = r#"
export const DEEP_CURRENT = {
  50: '#E6F6F8',
  300: '#6BCCDA',
  500: '#08A4BD',
  600: '#07899E',
} as const;

export const SEMANTIC = {
  focus: {
    ring: { palette: 'DEEP_CURRENT', shade: 600 },
  },
} as const;
"#;

    fn config_in(dir: &Path, source_name: &str, source: &str) -> Config {
        let source_path = dir.join(source_name);
        std::fs::write(&source_path, source).unwrap();
        let mut config = Config::default();
        config.paths.source = source_path;
        config.paths.output = dir.join("styles/generated/focus-ring.css");
        config
    }

    #[test]
    fn test_generate_writes_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "colors.ts", TOKENS);

        let report = generate(&config).unwrap();
        assert!(report.generated.degradations.is_empty());
        assert_eq!(report.generated.focus.light.hex, "#07899E");

        let css = std::fs::read_to_string(&config.paths.output).unwrap();
        assert_eq!(css, report.generated.css);
        assert!(css.contains("--focus-ring-color: oklch(57.96% 0.1005 213.60);"));
        assert!(css.contains("--focus-ring-color-dark: oklch(57.96% 0.1005 213.60);"));
    }

    #[test]
    fn test_minimal_source_both_properties_use_converted_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "colors.ts", "DEEP_CURRENT = { 500: '#08A4BD' }");

        let report = generate(&config).unwrap();
        let expected = color_space::to_oklch("#08A4BD").value;
        let css = std::fs::read_to_string(&config.paths.output).unwrap();
        assert!(css.contains(&format!("  --focus-ring-color: {expected};\n")));
        assert!(css.contains(&format!("  --focus-ring-color-dark: {expected};\n")));
        assert_eq!(
            report.generated.degradations,
            vec![Degradation::MissingAlias {
                path: "SEMANTIC.focus.ring".into()
            }]
        );
    }

    #[test]
    fn test_rerun_only_changes_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "colors.ts", TOKENS);

        let document = load_document(&config.paths.source).unwrap();
        let first = build_from(&document, &config, "2026-10-15T09:00:00Z".parse().unwrap());
        let second = build_from(&document, &config, "2026-10-16T17:30:00Z".parse().unwrap());
        assert_ne!(first.css, second.css);
        assert_eq!(
            emit::without_timestamp(&first.css),
            emit::without_timestamp(&second.css)
        );

        generate(&config).unwrap();
        let written_first = std::fs::read_to_string(&config.paths.output).unwrap();
        generate(&config).unwrap();
        let written_second = std::fs::read_to_string(&config.paths.output).unwrap();
        assert_eq!(
            emit::without_timestamp(&written_first),
            emit::without_timestamp(&written_second)
        );
    }

    #[test]
    fn test_shipped_token_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "colors.ts",
            include_str!("../../../tokens/colors.ts"),
        );
        let report = generate(&config).unwrap();
        let focus = &report.generated.focus;
        assert!(report.generated.degradations.is_empty());
        assert_eq!(focus.light.hex, "#08A4BD");
        assert_eq!(focus.light_css.value, "oklch(66.11% 0.1150 213.72)");
        assert_eq!(focus.dark_css, focus.light_css);
    }

    #[test]
    fn test_missing_source_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.source = dir.path().join("missing.ts");
        config.paths.output = dir.path().join("out.css");

        let err = generate(&config).unwrap_err();
        assert!(matches!(err, TidemarkError::Read { .. }));
        assert!(!config.paths.output.exists());
    }

    #[test]
    fn test_unmapped_color_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "colors.ts",
            "const SEMANTIC = { focus: { ring: '#123456' } };",
        );
        let report = generate(&config).unwrap();
        assert_eq!(report.generated.focus.light_css.value, "#123456");
        assert_eq!(
            report.generated.degradations,
            vec![Degradation::UnmappedColor {
                hex: "#123456".into()
            }]
        );
    }

    #[test]
    fn test_strict_mode_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), "colors.ts", "export const nothing = 0;");
        config.strict = true;

        let err = generate(&config).unwrap_err();
        match err {
            TidemarkError::Degraded(reasons) => {
                assert_eq!(reasons.len(), 2);
                assert!(reasons[0].contains("SEMANTIC.focus.ring"));
            }
            other => panic!("expected Degraded, got {other:?}"),
        }
        assert!(!config.paths.output.exists());
    }

    #[test]
    fn test_manifest_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "tokens.toml",
            "[DEEP_CURRENT]\n300 = \"#6BCCDA\"\n\n[SEMANTIC.focus]\nring = \"#6BCCDA\"\n",
        );
        let report = generate(&config).unwrap();
        assert_eq!(report.generated.focus.light.hex, "#6BCCDA");
    }

    #[test]
    fn test_documented_manifest_shape() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "tokens.toml",
            r##"
[palettes.DEEP_CURRENT]
500 = "#08A4BD"
600 = "#07899E"

[aliases.focus-ring]
palette = "DEEP_CURRENT"
shade = 600
"##,
        );
        let report = generate(&config).unwrap();
        let focus = &report.generated.focus;
        assert!(report.generated.degradations.is_empty());
        assert_eq!(focus.light.hex, "#07899E");
        assert_eq!(focus.light.resolution.to_string(), "DEEP_CURRENT[600] via aliases.focus-ring");
        assert_eq!(focus.light_css.value, "oklch(57.96% 0.1005 213.60)");
    }

    #[test]
    fn test_unreadable_shade_does_not_drop_palette() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "colors.ts",
            "export const DEEP_CURRENT = {\n  500: '#08A4BD',\n  600: shade('#08A4BD', 0.8),\n} as const;\n",
        );
        let document = load_document(&config.paths.source).unwrap();
        assert_eq!(document.diagnostics.len(), 1);

        let generated = build_from(&document, &config, Utc::now());
        assert_eq!(
            generated.focus.light.resolution,
            Resolution::DefaultPalette {
                palette: "DEEP_CURRENT".into(),
                shade: 500
            }
        );
    }

    #[test]
    fn test_invalid_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "tokens.toml", "[DEEP_CURRENT\n");
        assert!(matches!(
            generate(&config).unwrap_err(),
            TidemarkError::Manifest { .. }
        ));
    }

    #[test]
    fn test_check_freshness() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "colors.ts", TOKENS);

        assert_eq!(check(&config).unwrap(), Freshness::Missing);

        generate(&config).unwrap();
        assert_eq!(check(&config).unwrap(), Freshness::UpToDate);

        let css = std::fs::read_to_string(&config.paths.output).unwrap();
        let stamp = emit::generated_at(&css);
        std::fs::write(&config.paths.output, css.replace("57.96%", "58%")).unwrap();
        assert_eq!(
            check(&config).unwrap(),
            Freshness::Stale {
                generated_at: stamp
            }
        );
    }
}
