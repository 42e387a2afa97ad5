//! Scalar substitution of `TOKEN` and `TOKEN_<CASE>` occurrences.
//!
//! All tokens of a dictionary are compiled into one alternation, longest
//! name first, and the text is scanned once. Inserted values are never
//! rescanned, so a value containing a token name is emitted verbatim.

use regex::{Captures, Regex};

use crate::case::CaseTransform;
use crate::tokens::ReplacementDictionary;

/// Compiled matcher for a fixed set of token names.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    pattern: Option<Regex>,
}

impl TokenMatcher {
    pub fn new<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&str> = tokens.into_iter().filter(|t| !t.is_empty()).collect();
        if names.is_empty() {
            return Self { pattern: None };
        }
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        let alternation = names.iter().map(|n| regex::escape(n)).collect::<Vec<_>>().join("|");
        let suffixes = CaseTransform::ALL.iter().map(|c| c.suffix()).collect::<Vec<_>>().join("|");
        let source = format!("({})(?:_({}))?", alternation, suffixes);

        // Escaped literals and fixed suffixes always form a valid pattern.
        let pattern = Regex::new(&source).ok();
        Self { pattern }
    }

    pub fn for_dictionary(dictionary: &ReplacementDictionary) -> Self {
        Self::new(dictionary.tokens())
    }

    /// Replace every matched token with its (optionally case-transformed)
    /// value from `dictionary`. Tokens the dictionary lacks stay as written.
    pub fn replace(&self, text: &str, dictionary: &ReplacementDictionary) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| {
                let whole = &caps[0];
                let Some(value) = dictionary.get(&caps[1]) else {
                    return whole.to_string();
                };
                match caps.get(2).and_then(|m| CaseTransform::from_suffix(m.as_str())) {
                    Some(case) => case.apply(value),
                    None => value.to_string(),
                }
            })
            .into_owned()
    }
}

/// One-shot substitution of `dictionary` into `text`.
pub fn substitute(text: &str, dictionary: &ReplacementDictionary) -> String {
    TokenMatcher::for_dictionary(dictionary).replace(text, dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{color_dictionary, document_dictionary};
    use crate::model::ColorData;

    fn dict(pairs: &[(&str, &str)]) -> ReplacementDictionary {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_no_tokens_is_identity() {
        let text = "const x = { a: 1 };\n{#icon}{/icon}";
        assert_eq!(substitute(text, &dict(&[("NAME", "home")])), text);
    }

    #[test]
    fn test_empty_dictionary_is_identity() {
        assert_eq!(substitute("NAME", &ReplacementDictionary::new()), "NAME");
    }

    #[test]
    fn test_global_replacement() {
        let out = substitute("NAME and NAME", &dict(&[("NAME", "home")]));
        assert_eq!(out, "home and home");
    }

    #[test]
    fn test_case_suffix() {
        let d = dict(&[("NAME", "arrow left")]);
        assert_eq!(substitute("faNAME_PASCAL", &d), "faArrowLeft");
        assert_eq!(substitute("NAME_CONSTANT = 1", &d), "ARROW_LEFT = 1");
        assert_eq!(substitute("NAME_KEBAB.svg", &d), "arrow-left.svg");
    }

    #[test]
    fn test_unknown_suffix_is_literal() {
        let d = dict(&[("NAME", "home")]);
        assert_eq!(substitute("NAME_SHOUT", &d), "home_SHOUT");
        assert_eq!(substitute("NAME_camel", &d), "home_camel");
    }

    #[test]
    fn test_longest_token_wins_regardless_of_order() {
        // Subset registered first on purpose.
        let d = dict(&[("RGB_HEX", "AABBCC"), ("RGBA_HEX", "AABBCCDD"), ("ARGB_HEX", "DDAABBCC")]);
        assert_eq!(substitute("RGBA_HEX", &d), "AABBCCDD");
        assert_eq!(substitute("#ARGB_HEX", &d), "#DDAABBCC");
        assert_eq!(substitute("RGB_HEX", &d), "AABBCC");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let d = dict(&[("DOC_NAME", "NAME"), ("NAME", "home")]);
        assert_eq!(substitute("DOC_NAME/NAME", &d), "NAME/home");
    }

    #[test]
    fn test_document_tokens_beat_item_name() {
        let color = ColorData { name: "red".to_string(), r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
        let d = document_dictionary("Palette").merged(&color_dictionary(&color, 0));
        assert_eq!(substitute("DOC_NAME.NAME_UPPER = #RGB_HEX", &d), "Palette.RED = #FF0000");
    }
}
