use crate::error::{ErrorKind, Result};
use exn::OptionExt;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Render a byte count with binary units and two decimals: `"512 B"`,
/// `"1.50 KB"`, `"700.00 MB"`, `"4.37 GB"`. Gigabytes is the largest unit.
pub fn human_size(bytes: u64) -> String {
    match bytes {
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{:.2} KB", b as f64 / KB as f64),
        b if b < GB => format!("{:.2} MB", b as f64 / MB as f64),
        b => format!("{:.2} GB", b as f64 / GB as f64),
    }
}

/// The inverse of [`human_size`], rounding to the nearest byte.
///
/// Precision lost to the two-decimal rendering is not recovered, so this is
/// only suitable for display data such as legacy cache rows.
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let (number, unit) = [("GB", GB), ("MB", MB), ("KB", KB), ("B", 1)]
        .into_iter()
        .find_map(|(suffix, unit)| trimmed.strip_suffix(suffix).map(|n| (n.trim(), unit)))
        .ok_or_raise(|| ErrorKind::InvalidSize(input.to_string()))?;
    let value = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_raise(|| ErrorKind::InvalidSize(input.to_string()))?;
    Ok((value * unit as f64).round() as u64)
}
