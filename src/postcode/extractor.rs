use crate::models::PostalCode;
use regex::Regex;
use std::sync::LazyLock;

/// Label keyword, as spelled after cleaning
pub const KEYWORD: &str = "Postcode";

// Keyword, any run of colons/whitespace, then five ASCII digits.
// A longer digit run yields its first five digits.
static POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{KEYWORD}[:\s]*([0-9]{{{}}})", PostalCode::LEN))
        .expect("postcode pattern is valid")
});

/// Find the first postcode that follows the label keyword
pub fn extract(cleaned: &str) -> Option<PostalCode> {
    POSTCODE
        .captures(cleaned)
        .and_then(|caps| caps.get(1))
        .and_then(|m| PostalCode::parse(m.as_str()))
}
