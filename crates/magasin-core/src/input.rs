//! Operator input normalization

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("static regex"));

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Strip `<script>` blocks and markup tags, then trim surrounding whitespace
#[must_use]
pub fn sanitize(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    MARKUP_TAG
        .replace_all(&without_scripts, "")
        .trim()
        .to_string()
}

/// Trimmed, lower-cased form used for scan comparisons
#[inline]
#[must_use]
pub fn fold(input: &str) -> String {
    input.trim().to_lowercase()
}
