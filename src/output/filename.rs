//! Download filenames for rendered reports

use crate::url::extract_host;
use unicode_normalization::UnicodeNormalization;

/// Longest sanitized name, in characters
pub const MAX_FILENAME_CHARS: usize = 100;

/// Name used when nothing usable is left after sanitizing
pub const DEFAULT_FILENAME: &str = "report";

fn is_separator(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '_') || c.is_whitespace()
}

/// Turns arbitrary text into a safe ASCII file stem
///
/// Compatibility-decomposes the text, drops non-ASCII characters, replaces
/// runs of path-hostile characters and whitespace with a single `_` and
/// trims `_` from both ends.
///
/// # Examples
///
/// ```
/// use sitesage::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Google \u{25a0} Gemini"), "Google_Gemini");
/// assert_eq!(sanitize_filename("Café: menu"), "Cafe_menu");
/// assert_eq!(sanitize_filename("???"), "report");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.nfkd().filter(char::is_ascii) {
        if is_separator(c) {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed: String = out
        .trim_matches('_')
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect();

    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed
    }
}

/// Derives `<name>.pdf` for a report
///
/// Uses the page title when it is present and not blank, otherwise the host
/// of the report URL.
pub fn report_filename(title: Option<&str>, url: &str) -> String {
    let base = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| extract_host(url))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    format!("{}.pdf", sanitize_filename(&base))
}
