//! Plain-text sanitization for values written into image metadata.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script\s*>|<style[^>]*>.*?</style\s*>").unwrap()
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\t ]+").unwrap());

static OCTET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)%[a-f0-9]{2}").unwrap());

/// Reduce `input` to a single line of plain text.
///
/// Script and style elements are dropped with their content, remaining tags
/// are stripped, a `<` that does not open a tag is escaped as `&lt;`,
/// whitespace runs collapse to one space and percent-encoded octets are
/// removed.
pub fn sanitize_text_field(input: &str) -> String {
    let mut text = input.to_string();

    if text.contains('<') {
        text = SCRIPT_STYLE_RE.replace_all(&text, "").into_owned();
        text = TAG_RE.replace_all(&text, "").into_owned();
        text = text.replace('<', "&lt;");
    }

    text = WHITESPACE_RE.replace_all(&text, " ").trim().to_string();

    let mut stripped_octets = false;
    while OCTET_RE.is_match(&text) {
        text = OCTET_RE.replace_all(&text, "").into_owned();
        stripped_octets = true;
    }
    if stripped_octets {
        text = WHITESPACE_RE.replace_all(&text, " ").trim().to_string();
    }

    text
}
