//! HTML entity encoder/decoder.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::{Tool, ToolError};
use crate::utils::html::escape;

/// `&name;`, `&#123;` or `&#x7B;`.
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z][a-zA-Z0-9]{1,31}));")
        .expect("entity pattern is valid")
});

/// Named references understood by `decode` and produced by `encodeNonAscii`.
const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("iexcl", '¡'),
    ("cent", '¢'),
    ("pound", '£'),
    ("curren", '¤'),
    ("yen", '¥'),
    ("brvbar", '¦'),
    ("sect", '§'),
    ("uml", '¨'),
    ("copy", '©'),
    ("ordf", 'ª'),
    ("laquo", '«'),
    ("not", '¬'),
    ("shy", '\u{ad}'),
    ("reg", '®'),
    ("macr", '¯'),
    ("deg", '°'),
    ("plusmn", '±'),
    ("sup2", '²'),
    ("sup3", '³'),
    ("acute", '´'),
    ("micro", 'µ'),
    ("para", '¶'),
    ("middot", '·'),
    ("cedil", '¸'),
    ("sup1", '¹'),
    ("ordm", 'º'),
    ("raquo", '»'),
    ("frac14", '¼'),
    ("frac12", '½'),
    ("frac34", '¾'),
    ("iquest", '¿'),
    ("Agrave", 'À'),
    ("Aacute", 'Á'),
    ("Acirc", 'Â'),
    ("Atilde", 'Ã'),
    ("Auml", 'Ä'),
    ("Aring", 'Å'),
    ("AElig", 'Æ'),
    ("Ccedil", 'Ç'),
    ("Egrave", 'È'),
    ("Eacute", 'É'),
    ("Ecirc", 'Ê'),
    ("Euml", 'Ë'),
    ("Igrave", 'Ì'),
    ("Iacute", 'Í'),
    ("Icirc", 'Î'),
    ("Iuml", 'Ï'),
    ("ETH", 'Ð'),
    ("Ntilde", 'Ñ'),
    ("Ograve", 'Ò'),
    ("Oacute", 'Ó'),
    ("Ocirc", 'Ô'),
    ("Otilde", 'Õ'),
    ("Ouml", 'Ö'),
    ("times", '×'),
    ("Oslash", 'Ø'),
    ("Ugrave", 'Ù'),
    ("Uacute", 'Ú'),
    ("Ucirc", 'Û'),
    ("Uuml", 'Ü'),
    ("Yacute", 'Ý'),
    ("THORN", 'Þ'),
    ("szlig", 'ß'),
    ("agrave", 'à'),
    ("aacute", 'á'),
    ("acirc", 'â'),
    ("atilde", 'ã'),
    ("auml", 'ä'),
    ("aring", 'å'),
    ("aelig", 'æ'),
    ("ccedil", 'ç'),
    ("egrave", 'è'),
    ("eacute", 'é'),
    ("ecirc", 'ê'),
    ("euml", 'ë'),
    ("igrave", 'ì'),
    ("iacute", 'í'),
    ("icirc", 'î'),
    ("iuml", 'ï'),
    ("eth", 'ð'),
    ("ntilde", 'ñ'),
    ("ograve", 'ò'),
    ("oacute", 'ó'),
    ("ocirc", 'ô'),
    ("otilde", 'õ'),
    ("ouml", 'ö'),
    ("divide", '÷'),
    ("oslash", 'ø'),
    ("ugrave", 'ù'),
    ("uacute", 'ú'),
    ("ucirc", 'û'),
    ("uuml", 'ü'),
    ("yacute", 'ý'),
    ("thorn", 'þ'),
    ("yuml", 'ÿ'),
    ("OElig", 'Œ'),
    ("oelig", 'œ'),
    ("Scaron", 'Š'),
    ("scaron", 'š'),
    ("Yuml", 'Ÿ'),
    ("fnof", 'ƒ'),
    ("circ", 'ˆ'),
    ("tilde", '˜'),
    ("Alpha", 'Α'),
    ("Beta", 'Β'),
    ("Gamma", 'Γ'),
    ("Delta", 'Δ'),
    ("Theta", 'Θ'),
    ("Lambda", 'Λ'),
    ("Pi", 'Π'),
    ("Sigma", 'Σ'),
    ("Phi", 'Φ'),
    ("Psi", 'Ψ'),
    ("Omega", 'Ω'),
    ("alpha", 'α'),
    ("beta", 'β'),
    ("gamma", 'γ'),
    ("delta", 'δ'),
    ("epsilon", 'ε'),
    ("theta", 'θ'),
    ("lambda", 'λ'),
    ("mu", 'μ'),
    ("pi", 'π'),
    ("sigma", 'σ'),
    ("tau", 'τ'),
    ("phi", 'φ'),
    ("psi", 'ψ'),
    ("omega", 'ω'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("thinsp", '\u{2009}'),
    ("zwnj", '\u{200c}'),
    ("zwj", '\u{200d}'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("sbquo", '‚'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("bdquo", '„'),
    ("dagger", '†'),
    ("Dagger", '‡'),
    ("bull", '•'),
    ("hellip", '…'),
    ("permil", '‰'),
    ("prime", '′'),
    ("Prime", '″'),
    ("lsaquo", '‹'),
    ("rsaquo", '›'),
    ("euro", '€'),
    ("trade", '™'),
    ("larr", '←'),
    ("uarr", '↑'),
    ("rarr", '→'),
    ("darr", '↓'),
    ("harr", '↔'),
    ("forall", '∀'),
    ("part", '∂'),
    ("exist", '∃'),
    ("empty", '∅'),
    ("nabla", '∇'),
    ("isin", '∈'),
    ("notin", '∉'),
    ("prod", '∏'),
    ("sum", '∑'),
    ("minus", '−'),
    ("radic", '√'),
    ("infin", '∞'),
    ("and", '∧'),
    ("or", '∨'),
    ("cap", '∩'),
    ("cup", '∪'),
    ("int", '∫'),
    ("asymp", '≈'),
    ("ne", '≠'),
    ("equiv", '≡'),
    ("le", '≤'),
    ("ge", '≥'),
    ("loz", '◊'),
    ("spades", '♠'),
    ("clubs", '♣'),
    ("hearts", '♥'),
    ("diams", '♦'),
];

fn named_char(name: &str) -> Option<char> {
    NAMED.iter().find(|(n, _)| *n == name).map(|&(_, c)| c)
}

fn char_name(c: char) -> Option<&'static str> {
    NAMED.iter().find(|&&(_, ch)| ch == c).map(|&(n, _)| n)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityMode {
    #[default]
    Encode,
    Decode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlEntitiesInput {
    pub text: String,
    pub mode: EntityMode,
    pub encode_non_ascii: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HtmlEntitiesOutput {
    pub output: String,
}

pub struct HtmlEntitiesTool;

impl Tool for HtmlEntitiesTool {
    const SLUG: &'static str = "html-entities";
    const STORAGE_KEY: &'static str = "htmlEntitiesConverter";
    const TITLE: &'static str = "HTML Entities Converter";
    const DESCRIPTION: &'static str = "Escape text for HTML or turn entities back into characters.";

    type Input = HtmlEntitiesInput;
    type Output = HtmlEntitiesOutput;

    fn run(input: &HtmlEntitiesInput) -> Result<HtmlEntitiesOutput, ToolError> {
        let output = match input.mode {
            EntityMode::Encode => encode(&input.text, input.encode_non_ascii),
            EntityMode::Decode => decode(&input.text).into_owned(),
        };
        Ok(HtmlEntitiesOutput { output })
    }
}

/// Escape markup characters, and optionally everything outside ASCII.
pub fn encode(text: &str, non_ascii: bool) -> String {
    let escaped = escape(text);
    if !non_ascii || escaped.is_ascii() {
        return escaped.into_owned();
    }

    let mut out = String::with_capacity(escaped.len() + 16);
    for c in escaped.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(name) = char_name(c) {
            let _ = write!(out, "&{name};");
        } else {
            let _ = write!(out, "&#x{:X};", u32::from(c));
        }
    }
    out
}

/// Replace known entity references; anything unrecognized stays as written.
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_RE.replace_all(text, |caps: &Captures<'_>| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named_char(name.as_str()))
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, mode: EntityMode, encode_non_ascii: bool) -> String {
        HtmlEntitiesTool::run(&HtmlEntitiesInput {
            text: text.to_string(),
            mode,
            encode_non_ascii,
        })
        .unwrap()
        .output
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            run(r#"<a href="x">Tom & 'Jerry'</a>"#, EntityMode::Encode, false),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(run("café", EntityMode::Encode, false), "café");
    }

    #[test]
    fn test_encode_non_ascii() {
        assert_eq!(run("café © 2024", EntityMode::Encode, true), "caf&eacute; &copy; 2024");
        assert_eq!(run("日本", EntityMode::Encode, true), "&#x65E5;&#x672C;");
        assert_eq!(run("😀", EntityMode::Encode, true), "&#x1F600;");
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            run("&lt;p&gt;caf&eacute; &amp; &#169; &#x1F600;&lt;/p&gt;", EntityMode::Decode, false),
            "<p>café & © 😀</p>"
        );
        assert_eq!(run("&apos;&quot;&nbsp;", EntityMode::Decode, false), "'\"\u{a0}");
    }

    #[test]
    fn test_decode_leaves_unknown() {
        assert_eq!(
            run("&bogus; & &#xZZ; &#1114112; &amp", EntityMode::Decode, false),
            "&bogus; & &#xZZ; &#1114112; &amp"
        );
    }

    #[test]
    fn test_encode_then_decode() {
        let text = "<b>\"Ünïcödé\" & ∑ — ok</b>";
        assert_eq!(decode(&encode(text, true)), text);
        assert_eq!(decode(&encode(text, false)), text);
    }

    #[test]
    fn test_table_names_unique() {
        let mut names: Vec<_> = NAMED.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NAMED.len());
    }
}
