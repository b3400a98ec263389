//! Human-readable byte sizes.
//!
//! Parsing accepts decimal units (`B`, `KB`, `MB`, `GB`, `TB`, `PB`, powers of
//! 1000) and binary units (`KiB` .. `PiB`, powers of 1024), case-insensitive.

use humansize::{format_size, FormatSizeOptions, DECIMAL};

use crate::error::AppError;

const DECIMAL_UNITS: &[(&str, u64)] = &[
    ("b", 1),
    ("kb", 1_000),
    ("k", 1_000),
    ("mb", 1_000_000),
    ("m", 1_000_000),
    ("gb", 1_000_000_000),
    ("g", 1_000_000_000),
    ("tb", 1_000_000_000_000),
    ("pb", 1_000_000_000_000_000),
];

const BINARY_UNITS: &[(&str, u64)] = &[
    ("kib", 1 << 10),
    ("mib", 1 << 20),
    ("gib", 1 << 30),
    ("tib", 1 << 40),
    ("pib", 1 << 50),
];

/// Parse a size such as `"3MB"`, `"1.5 GiB"` or `"512"` into bytes.
pub fn parse_size(input: &str) -> crate::error::Result<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid size '{}'", input)))?;

    let unit = unit.trim().to_ascii_lowercase();
    let multiplier = if unit.is_empty() {
        1
    } else {
        DECIMAL_UNITS
            .iter()
            .chain(BINARY_UNITS)
            .find(|(name, _)| *name == unit)
            .map(|(_, m)| *m)
            .ok_or_else(|| AppError::Config(format!("Unknown size unit in '{}'", input)))?
    };

    Ok((value * multiplier as f64).round() as u64)
}

/// Render a byte count with one decimal and upper-case units, e.g. `5.0MB`
/// or `1.5KB`.
pub fn format_bytes(bytes: u64) -> String {
    let options = FormatSizeOptions::from(DECIMAL)
        .decimal_places(1)
        .decimal_zeroes(1)
        .space_after_value(false);
    // humansize writes the SI kilo as `kB`
    format_size(bytes, options).replace("kB", "KB")
}
