//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a byte count as KB or MB.
///
/// Usage in templates: `{{ photo.size|file_size }}`
#[askama::filter_fn]
pub fn file_size(bytes: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(human_size(bytes.to_string().parse().unwrap_or(0)))
}

#[allow(clippy::cast_precision_loss)]
fn human_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}
