//! Common utilities shared across report generators.

use crate::columns::CellValue;
use crate::facts::SearchTarget;
use std::borrow::Cow;

/// Format an integer with `,` as the thousands separator.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format a mean as a whole number with thousands separators, dropping the fraction.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "means of non-negative counts, truncated for display")]
pub fn format_whole(value: f64) -> String {
    format_thousands(value.max(0.0).trunc() as u64)
}

/// Format a cell for human-facing output.
pub fn format_cell(value: &CellValue<'_>) -> String {
    match value {
        CellValue::UInt(u) => format_thousands(*u),
        CellValue::Float(f) => format!("{f:.1}"),
        CellValue::Text(s) => (*s).to_string(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

/// The file name used when a CSV export is requested without an explicit path.
pub fn default_csv_file_name(target: &SearchTarget) -> String {
    let stem: String = target
        .value()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') || c.is_control() { '_' } else { c })
        .collect();

    format!("youtube_{stem}.csv")
}

/// Link to a video's watch page.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Shorten `s` to at most `width` characters, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> Cow<'_, str> {
    if s.chars().count() <= width {
        return Cow::Borrowed(s);
    }

    if width == 0 {
        return Cow::Borrowed("");
    }

    let mut result: String = s.chars().take(width - 1).collect();
    result.push('…');
    Cow::Owned(result)
}
