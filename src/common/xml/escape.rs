use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Automata are built once on first use and shared across threads.
static ATTRIBUTE_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build attribute escaper")
});

static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build text escaper")
});

// LeftmostLongest so that "&amp;lt;" yields "&lt;" and not "<".
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape a string for use inside a double-quoted attribute value.
///
/// # Examples
///
/// ```
/// use redline::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("Jane \"JD\" O'Neil"), "Jane &quot;JD&quot; O&apos;Neil");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    ATTRIBUTE_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Escape character data. Quotes are left as they are, the way word
/// processors write `w:t` content.
///
/// # Examples
///
/// ```
/// use redline::common::xml::escape_text;
/// assert_eq!(escape_text("say \"x < y\""), "say \"x &lt; y\"");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Unescape the five predefined XML entities.
///
/// Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use redline::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;w:t&gt;"), "<w:t>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&bogus;"), "&bogus;");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}
