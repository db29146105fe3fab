//! Templates with typed variable injection.
//!
//! Placeholders look like `__NAME__`. Substitution is a single pass, so a
//! value that happens to contain a placeholder is left alone.

use std::marker::PhantomData;

/// A set of values for one template.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace every `__KEY__` whose key is listed in `vars`; unknown
/// placeholders are copied through.
pub fn substitute(content: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(content.len() + extra);
    let mut rest = content;

    while let Some(start) = rest.find("__") {
        let after = &rest[start + 2..];
        let hit = vars
            .iter()
            .find(|(key, _)| after.strip_prefix(key).is_some_and(|t| t.starts_with("__")));
        match hit {
            Some((key, value)) => {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = &after[key.len() + 2..];
            }
            None => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute() {
        assert_eq!(
            substitute("<h1>__TITLE__</h1>__BODY__", &[("TITLE", "Hi"), ("BODY", "<p>x</p>")]),
            "<h1>Hi</h1><p>x</p>"
        );
    }

    #[test]
    fn test_substitute_single_pass() {
        // a value containing a placeholder is not expanded again
        assert_eq!(
            substitute("__A__|__B__", &[("A", "__B__"), ("B", "b")]),
            "__B__|b"
        );
    }

    #[test]
    fn test_substitute_unknown_and_stray() {
        assert_eq!(substitute("__NOPE__ a__b", &[("X", "y")]), "__NOPE__ a__b");
        assert_eq!(substitute("snake__case__X__", &[("X", "1")]), "snake__case1");
    }
}
