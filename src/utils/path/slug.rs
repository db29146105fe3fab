//! URL slugs.

use deunicode::deunicode;

/// Transliterate to ASCII, lowercase, and join alphanumeric runs with `-`.
///
/// ```ignore
/// assert_eq!(slugify("Déjà Vu: A Story"), "deja-vu-a-story");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Accepts only slugs `slugify` could have produced.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Base64 -- Explained!  "), "base64-explained");
        assert_eq!(slugify("Déjà Vu"), "deja-vu");
        assert_eq!(slugify("what's new in v2.0?"), "what-s-new-in-v2-0");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_unicode() {
        let slug = slugify("北京");
        assert!(is_valid_slug(&slug), "{slug}");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("json-vs-yaml"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-lead"));
        assert!(!is_valid_slug("Upper"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("a/b"));
    }
}
