//! Hex → OKLCH conversion for generated CSS custom properties.
//!
//! Conversion is a lookup against precomputed values rather than math at run
//! time, so the generated stylesheet only ever contains values that were
//! reviewed when the palette was added. Colors missing from the table pass
//! through as hex.

use phf::phf_map;
use serde::Serialize;

/// Compile-time hex → OKLCH table.
/// All keys are uppercase `#RRGGBB` for case-insensitive matching.
pub static OKLCH: phf::Map<&'static str, &'static str> = phf_map! {
    // DEEP_CURRENT 50–900
    "#E6F6F8" => "oklch(96.19% 0.0171 205.85)",
    "#C0E9EF" => "oklch(90.69% 0.0433 207.30)",
    "#96DBE5" => "oklch(84.90% 0.0703 207.32)",
    "#6BCCDA" => "oklch(79.13% 0.0934 207.74)",
    "#3AB8CB" => "oklch(72.29% 0.1099 209.63)",
    "#08A4BD" => "oklch(66.11% 0.1150 213.72)",
    "#07899E" => "oklch(57.96% 0.1005 213.60)",
    "#056E7F" => "oklch(49.51% 0.0856 213.38)",
    "#045461" => "oklch(41.01% 0.0704 212.91)",
    "#023A43" => "oklch(32.02% 0.0547 211.94)",

    // SLATE 50–900
    "#F8FAFC" => "oklch(98.42% 0.0034 247.86)",
    "#F1F5F9" => "oklch(96.83% 0.0069 247.90)",
    "#E2E8F0" => "oklch(92.88% 0.0126 255.51)",
    "#CBD5E1" => "oklch(86.90% 0.0198 252.89)",
    "#94A3B8" => "oklch(71.07% 0.0351 256.79)",
    "#64748B" => "oklch(55.44% 0.0407 257.42)",
    "#475569" => "oklch(44.55% 0.0374 257.28)",
    "#334155" => "oklch(37.17% 0.0392 257.29)",
    "#1E293B" => "oklch(27.95% 0.0368 260.03)",
    "#0F172A" => "oklch(20.77% 0.0398 265.75)",

    // CORAL 50–900
    "#FFF1EE" => "oklch(96.83% 0.0157 32.01)",
    "#FFDCD4" => "oklch(92.15% 0.0406 32.99)",
    "#FFBFB0" => "oklch(85.91% 0.0772 33.55)",
    "#FF9C85" => "oklch(78.91% 0.1237 33.88)",
    "#FF7A5C" => "oklch(72.94% 0.1687 34.05)",
    "#F25C3B" => "oklch(66.64% 0.1910 33.97)",
    "#D4432A" => "oklch(58.78% 0.1858 32.24)",
    "#AD321F" => "oklch(50.17% 0.1626 31.64)",
    "#852517" => "oklch(41.48% 0.1332 31.31)",
    "#5C1A10" => "oklch(32.38% 0.0985 31.38)",
};

/// The result of converting one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// The hex color as given.
    pub input: String,
    /// OKLCH string, or `input` unchanged on a table miss.
    pub value: String,
    pub converted: bool,
}

/// Look up the OKLCH equivalent of a hex color (case-insensitive, `#` optional).
pub fn lookup(hex: &str) -> Option<&'static str> {
    let digits = hex.trim().trim_start_matches('#');
    OKLCH
        .get(format!("#{}", digits.to_ascii_uppercase()).as_str())
        .copied()
}

/// Convert a hex color to OKLCH.
///
/// On a miss the input is returned unchanged and a warning is logged; the
/// generated stylesheet then carries a hex value where OKLCH was expected.
pub fn to_oklch(hex: &str) -> Conversion {
    match lookup(hex) {
        Some(value) => Conversion {
            input: hex.to_string(),
            value: value.to_string(),
            converted: true,
        },
        None => {
            tracing::warn!(color = %hex, "No OKLCH mapping for color, using hex value as-is");
            Conversion {
                input: hex.to_string(),
                value: hex.to_string(),
                converted: false,
            }
        }
    }
}
