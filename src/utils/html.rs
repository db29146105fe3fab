//! Markup escaping.
//!
//! - `escape()`, `escape_attr()` for HTML text and attribute values
//! - `escape_xml()` for sitemap and other XML output

use std::borrow::Cow;

const HTML_SPECIAL: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn html_entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

#[inline]
fn xml_entity(c: char) -> Option<&'static str> {
    match c {
        '\'' => Some("&apos;"),
        c => html_entity(c),
    }
}

/// Escape HTML special characters in text content.
///
/// Borrows when nothing needs escaping.
///
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    replace_with(s, html_entity)
}

/// Escape an attribute value. Same character set as `escape`; quotes are
/// always encoded so either delimiter is safe.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    replace_with(s, html_entity)
}

/// XML flavour: apostrophes become `&apos;`.
#[inline]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    replace_with(s, xml_entity)
}

fn replace_with(s: &str, entity: fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !s.contains(HTML_SPECIAL) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("hello world"), Cow::Borrowed(_)));
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape("<b>"), "&lt;b&gt;");
        assert_eq!(escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("width=device-width"), "width=device-width");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("/blog/?q=a&b=c"), "/blog/?q=a&amp;b=c");
        assert_eq!(escape_xml("it's"), "it&apos;s");
        assert_eq!(escape_xml("<loc>"), "&lt;loc&gt;");
    }
}
