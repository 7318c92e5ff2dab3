pub mod config;
pub mod errors;
pub mod escape;

pub use config::{AppConfig, CacheConfig, LanguageConfig, SheetConfig, TabConfig, TargetColumns};
pub use errors::{DecodeReason, Result, RowDecodeError, SheetTranslatorError};
pub use escape::escape_html;

pub fn sanitize_cell(value: &str) -> String {
    if value.starts_with('=')
        || value.starts_with('+')
        || value.starts_with('-')
        || value.starts_with('@')
    {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

/// Undoes `sanitize_cell` on a cell read back from an earlier run.
pub fn strip_cell_guard(value: &str) -> &str {
    match value.strip_prefix('\'') {
        Some(rest) if rest.starts_with(['=', '+', '-', '@']) => rest,
        _ => value,
    }
}
