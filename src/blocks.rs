//! Block regions (`{#tag <separator>}...{/tag}`) and flat repetition.

use regex::Regex;

use crate::substitute::TokenMatcher;
use crate::tokens::ReplacementDictionary;

/// A piece of template text at one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Region(Region),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub tag: String,
    /// Literal text between the tag name and `}`; empty when absent.
    pub separator: String,
    /// Unparsed body between the opening and closing tags.
    pub body: String,
}

/// Split `text` into literal text and regions for any of `tags`.
///
/// Matching is non-nested: a region ends at the first `{/tag}` after its
/// opener. An opener without a closer stays in the surrounding text.
pub fn parse_regions(text: &str, tags: &[&str]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let Some(opener) = opener_pattern(tags) else {
        push_text(&mut segments, text);
        return segments;
    };

    let mut literal_start = 0;
    let mut search_from = 0;
    while let Some(caps) = opener.captures_at(text, search_from) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let closer = format!("{{/{}}}", tag.as_str());
        let Some(close_offset) = text[whole.end()..].find(&closer) else {
            search_from = whole.end();
            continue;
        };
        let body_end = whole.end() + close_offset;

        push_text(&mut segments, &text[literal_start..whole.start()]);
        segments.push(Segment::Region(Region {
            tag: tag.as_str().to_string(),
            separator: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            body: text[whole.end()..body_end].to_string(),
        }));

        literal_start = body_end + closer.len();
        search_from = literal_start;
    }
    push_text(&mut segments, &text[literal_start..]);
    segments
}

/// Regions with `tag` found by [`parse_regions`], in template order.
pub fn find_regions(text: &str, tag: &str) -> Vec<Region> {
    parse_regions(text, &[tag])
        .into_iter()
        .filter_map(|s| match s {
            Segment::Region(region) => Some(region),
            Segment::Text(_) => None,
        })
        .collect()
}

fn opener_pattern(tags: &[&str]) -> Option<Regex> {
    if tags.is_empty() {
        return None;
    }
    let names = tags.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"\{{#({})(?:\s([^}}\n]*))?\}}", names)).ok()
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Join rendered sibling lines: `separator` after every line but the last,
/// one newline between lines.
pub fn join_lines(lines: Vec<String>, separator: &str) -> String {
    let last = lines.len().saturating_sub(1);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, mut line)| {
            if !separator.is_empty() && i != last {
                line.push_str(separator);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render `template` once per item, each with that item's dictionary.
pub fn repeat<T, F>(template: &str, separator: &str, items: &[T], dictionary_fn: F) -> String
where
    F: Fn(&T, usize) -> ReplacementDictionary,
{
    let dictionaries: Vec<_> = items.iter().enumerate().map(|(i, item)| dictionary_fn(item, i)).collect();
    let Some(first) = dictionaries.first() else {
        return String::new();
    };
    let matcher = TokenMatcher::for_dictionary(first);
    let lines = dictionaries.iter().map(|d| matcher.replace(template, d)).collect();
    join_lines(lines, separator)
}

/// Expand every `{#tag}` region of `text` over `items`; text outside the
/// regions is returned untouched.
pub fn expand_block<T, F>(text: &str, tag: &str, items: &[T], dictionary_fn: F) -> String
where
    F: Fn(&T, usize) -> ReplacementDictionary,
{
    parse_regions(text, &[tag])
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => text,
            Segment::Region(region) => repeat(&region.body, &region.separator, items, &dictionary_fn),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::NAME;

    fn named(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn by_name(name: &String, _: usize) -> ReplacementDictionary {
        [(NAME, name.as_str())].into_iter().collect()
    }

    #[test]
    fn test_parse_regions_with_separator() {
        let segments = parse_regions("[\n{#icon ,}NAME{/icon}\n]", &["icon"]);
        assert_eq!(
            segments,
            vec![
                Segment::Text("[\n".to_string()),
                Segment::Region(Region {
                    tag: "icon".to_string(),
                    separator: ",".to_string(),
                    body: "NAME".to_string(),
                }),
                Segment::Text("\n]".to_string()),
            ]
        );
    }

    #[test]
    fn test_unclosed_opener_stays_literal() {
        let text = "{#icon}NAME";
        assert_eq!(parse_regions(text, &["icon"]), vec![Segment::Text(text.to_string())]);
    }

    #[test]
    fn test_similar_tag_is_not_a_region() {
        let text = "{#iconic}x{/iconic}";
        assert_eq!(parse_regions(text, &["icon"]), vec![Segment::Text(text.to_string())]);
    }

    #[test]
    fn test_expand_with_separator() {
        let out = expand_block("{#icon ,}NAME_UPPER{/icon}", "icon", &named(&["a", "b", "c"]), by_name);
        assert_eq!(out, "A,\nB,\nC");
    }

    #[test]
    fn test_expand_zero_items_removes_tags() {
        let out = expand_block("<{#icon}NAME{/icon}>", "icon", &named(&[]), by_name);
        assert_eq!(out, "<>");
    }

    #[test]
    fn test_independent_blocks_of_same_tag() {
        let out = expand_block("{#icon}A:NAME{/icon}|{#icon ;}B:NAME{/icon}", "icon", &named(&["x", "y"]), by_name);
        assert_eq!(out, "A:x\nA:y|B:x;\nB:y");
    }

    #[test]
    fn test_multiline_body() {
        let out = expand_block("{#icon}\n  NAME\n{/icon}", "icon", &named(&["x"]), by_name);
        assert_eq!(out, "\n  x\n");
    }

    #[test]
    fn test_no_block_leaves_text() {
        let text = "nothing to expand NAME";
        assert_eq!(expand_block(text, "icon", &named(&["x"]), by_name), text);
    }

    #[test]
    fn test_join_lines_single_item_has_no_separator() {
        assert_eq!(join_lines(named(&["only"]), ","), "only");
        assert_eq!(join_lines(Vec::new(), ","), "");
    }
}
