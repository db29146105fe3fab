//! Shared helpers for tools, the site builder and the dev server.

pub mod html;
pub mod mime;
pub mod path;

/// `plural_count(3, "article")` gives `"3 articles"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let s = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{s}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "draft"), "0 drafts");
        assert_eq!(plural_count(1, "article"), "1 article");
        assert_eq!(plural_count(12, "tool"), "12 tools");
    }
}
