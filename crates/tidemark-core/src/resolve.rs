//! Focus-ring resolution: alias → palette shade → hardcoded fallback.

use std::fmt;

use serde::Serialize;
use tidemark_parse::{AliasTarget, Document};

use crate::config::TokensConfig;

const FOCUS_ROLE: &str = "focus-ring";
const FOCUS_DARK_ROLE: &str = "focus-ring-dark";

/// How a token's color was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The declared alias pointed at an existing palette shade.
    Alias {
        path: String,
        palette: String,
        shade: u16,
    },
    /// The declared alias was a literal hex color.
    Literal { path: String },
    /// No usable alias; the default palette shade was used.
    DefaultPalette { palette: String, shade: u16 },
    /// Neither alias nor default palette shade; the configured fallback was used.
    Fallback,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Alias {
                path,
                palette,
                shade,
            } => write!(f, "{palette}[{shade}] via {path}"),
            Resolution::Literal { path } => write!(f, "literal at {path}"),
            Resolution::DefaultPalette { palette, shade } => {
                write!(f, "{palette}[{shade}] (default)")
            }
            Resolution::Fallback => write!(f, "hardcoded fallback"),
        }
    }
}

/// A semantic role resolved to a concrete hex color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedToken {
    pub role: String,
    pub hex: String,
    pub resolution: Resolution,
}

/// Something that forced a fallback. Logged as a warning; fatal in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    MissingAlias { path: String },
    InvalidAlias { path: String, reason: String },
    MissingAliasTarget {
        path: String,
        palette: String,
        shade: u16,
    },
    MissingPalette { palette: String },
    MissingShade { palette: String, shade: u16 },
    UnmappedColor { hex: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::MissingAlias { path } => write!(f, "alias {path} is not declared"),
            Degradation::InvalidAlias { path, reason } => {
                write!(f, "alias {path} is unusable: {reason}")
            }
            Degradation::MissingAliasTarget {
                path,
                palette,
                shade,
            } => write!(f, "alias {path} points at missing {palette}[{shade}]"),
            Degradation::MissingPalette { palette } => {
                write!(f, "palette {palette} is not declared")
            }
            Degradation::MissingShade { palette, shade } => {
                write!(f, "palette {palette} has no shade {shade}")
            }
            Degradation::UnmappedColor { hex } => write!(f, "no OKLCH mapping for {hex}"),
        }
    }
}

/// Resolve the focus-ring color.
///
/// Chain: `tokens.focus_alias` → `default_palette[default_shade]` →
/// `fallback_hex`. Each step that is skipped adds a [`Degradation`].
///
/// A role alias declared by the source (`[aliases.focus-ring]` in a manifest)
/// takes the place of `tokens.focus_alias`.
pub fn resolve_focus(doc: &Document, tokens: &TokensConfig) -> (ResolvedToken, Vec<Degradation>) {
    resolve_role(doc, tokens, FOCUS_ROLE, &tokens.focus_alias)
}

/// Resolve the dark focus-ring color, if a separate alias is declared or configured.
///
/// An absent or broken dark alias falls back to `light`, not the default palette.
pub fn resolve_focus_dark(
    doc: &Document,
    tokens: &TokensConfig,
    light: &ResolvedToken,
) -> (ResolvedToken, Vec<Degradation>) {
    let same_as_light = || ResolvedToken {
        role: FOCUS_DARK_ROLE.into(),
        ..light.clone()
    };
    let (path, found) = match (
        doc.role_alias(FOCUS_DARK_ROLE),
        tokens.dark_focus_alias.as_deref(),
    ) {
        (Some(found), _) => (role_path(FOCUS_DARK_ROLE), Some(found)),
        (None, Some(path)) => (path.to_string(), doc.alias(path)),
        (None, None) => return (same_as_light(), Vec::new()),
    };

    let mut degradations = Vec::new();
    let token = match resolve_alias(doc, &path, found, &mut degradations) {
        Some((hex, resolution)) => ResolvedToken {
            role: FOCUS_DARK_ROLE.into(),
            hex,
            resolution,
        },
        None => same_as_light(),
    };
    log_degradations(&token.role, &degradations);
    (token, degradations)
}

fn log_degradations(role: &str, degradations: &[Degradation]) {
    for degradation in degradations {
        tracing::warn!(role, "{degradation}; falling back");
    }
}

fn resolve_role(
    doc: &Document,
    tokens: &TokensConfig,
    role: &str,
    alias_path: &str,
) -> (ResolvedToken, Vec<Degradation>) {
    let mut degradations = Vec::new();
    let (path, found) = match doc.role_alias(role) {
        Some(found) => (role_path(role), Some(found)),
        None => (alias_path.to_string(), doc.alias(alias_path)),
    };

    let (hex, resolution) = match resolve_alias(doc, &path, found, &mut degradations) {
        Some(found) => found,
        None => default_color(doc, tokens, &mut degradations),
    };

    log_degradations(role, &degradations);

    (
        ResolvedToken {
            role: role.to_string(),
            hex,
            resolution,
        },
        degradations,
    )
}

/// Path reported for a role alias, as written in a manifest.
fn role_path(role: &str) -> String {
    format!("aliases.{role}")
}

fn resolve_alias(
    doc: &Document,
    path: &str,
    found: Option<Result<AliasTarget, String>>,
    degradations: &mut Vec<Degradation>,
) -> Option<(String, Resolution)> {
    let target = match found {
        Some(Ok(target)) => target,
        Some(Err(reason)) => {
            degradations.push(Degradation::InvalidAlias {
                path: path.to_string(),
                reason,
            });
            return None;
        }
        None => {
            degradations.push(Degradation::MissingAlias {
                path: path.to_string(),
            });
            return None;
        }
    };

    match target {
        AliasTarget::Literal { hex } => Some((
            hex,
            Resolution::Literal {
                path: path.to_string(),
            },
        )),
        AliasTarget::Shade { palette, shade } => {
            let hex = doc
                .palette(&palette)
                .and_then(|p| p.shade(shade).map(str::to_string));
            match hex {
                Some(hex) => Some((
                    hex,
                    Resolution::Alias {
                        path: path.to_string(),
                        palette,
                        shade,
                    },
                )),
                None => {
                    degradations.push(Degradation::MissingAliasTarget {
                        path: path.to_string(),
                        palette,
                        shade,
                    });
                    None
                }
            }
        }
    }
}

fn default_color(
    doc: &Document,
    tokens: &TokensConfig,
    degradations: &mut Vec<Degradation>,
) -> (String, Resolution) {
    let name = &tokens.default_palette;
    let shade = tokens.default_shade;

    match doc.palette(name) {
        Some(palette) => match palette.shade(shade) {
            Some(hex) => {
                return (
                    hex.to_string(),
                    Resolution::DefaultPalette {
                        palette: name.clone(),
                        shade,
                    },
                )
            }
            None => degradations.push(Degradation::MissingShade {
                palette: name.clone(),
                shade,
            }),
        },
        None => degradations.push(Degradation::MissingPalette {
            palette: name.clone(),
        }),
    }

    (tokens.fallback_hex.clone(), Resolution::Fallback)
}
