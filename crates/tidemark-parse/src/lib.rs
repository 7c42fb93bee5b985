//! Reader for design-token source files.
//!
//! Turns TypeScript-shaped token declarations (or an equivalent TOML
//! manifest) into a [`Document`] of palettes and aliases.

pub mod document;
pub mod manifest;
pub mod parser;
pub mod tokenizer;

pub use document::{is_hex_color, AliasTarget, Declaration, Diagnostic, Document, Palette, Value};
pub use manifest::parse_manifest;
pub use parser::parse;
