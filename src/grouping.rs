//! Folder/style grouping for the `{#color}` block.
//!
//! Items are grouped once into a typed tree by their `/`-separated names and
//! rendered by matching on [`Node`]; the `RECURSE` marker only exists inside
//! the `{#child}` wrapper text, which is split around it up front.

use std::cell::OnceCell;

use crate::blocks::{join_lines, parse_regions, repeat, Segment};
use crate::error::TemplateError;
use crate::substitute::TokenMatcher;
use crate::tokens::{folder_dictionary, ReplacementDictionary, NAME, RECURSE};

pub const FLAT_TAG: &str = "flat";
pub const FOLDER_TAG: &str = "folder";
pub const STYLE_TAG: &str = "style";
pub const CHILD_TAG: &str = "child";

/// Grouped item tree; folders exist only while rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T> {
    Leaf {
        /// Last path segment of the item's name.
        name: String,
        /// Position of the item in the original flat list.
        index: usize,
        item: T,
    },
    Folder { name: String, children: Vec<Node<T>> },
}

impl<T> Node<T> {
    pub fn name(&self) -> &str {
        match self {
            Node::Leaf { name, .. } | Node::Folder { name, .. } => name,
        }
    }
}

/// Split a name on `/`, ignoring whitespace around each slash.
pub fn path_segments(name: &str) -> Vec<String> {
    name.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Group items into a folder tree. Siblings keep first-appearance order.
pub fn group_by_path<T: Clone>(items: &[T], name_of: impl Fn(&T) -> &str) -> Vec<Node<T>> {
    let mut roots = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let mut segments = path_segments(name_of(item));
        let leaf_name = segments.pop().unwrap_or_default();
        let leaf = Node::Leaf { name: leaf_name, index, item: item.clone() };
        insert(&mut roots, segments.into_iter(), leaf);
    }
    roots
}

fn insert<T>(level: &mut Vec<Node<T>>, mut folders: std::vec::IntoIter<String>, leaf: Node<T>) {
    let Some(folder) = folders.next() else {
        level.push(leaf);
        return;
    };
    let existing = level.iter_mut().find_map(|node| match node {
        Node::Folder { name, children } if *name == folder => Some(children),
        _ => None,
    });
    match existing {
        Some(children) => insert(children, folders, leaf),
        None => {
            let mut children = Vec::new();
            insert(&mut children, folders, leaf);
            level.push(Node::Folder { name: folder, children });
        }
    }
}

/// Sub-layout chosen inside a `{#color}` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorLayout {
    Flat { template: String, separator: String },
    Nested { folder: FolderTemplate, style: String },
}

impl ColorLayout {
    /// Pick the layout from a `{#color}` body.
    pub fn parse(body: &str) -> Result<Self, TemplateError> {
        let mut flat = None;
        let mut folder = None;
        let mut style = None;
        for segment in parse_regions(body, &[FLAT_TAG, FOLDER_TAG, STYLE_TAG]) {
            let Segment::Region(region) = segment else { continue };
            let slot = match region.tag.as_str() {
                FLAT_TAG => &mut flat,
                FOLDER_TAG => &mut folder,
                _ => &mut style,
            };
            slot.get_or_insert(region);
        }

        match (flat, folder, style) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(TemplateError::ConflictingColorLayout),
            (Some(flat), None, None) => Ok(ColorLayout::Flat {
                template: flat.body,
                separator: flat.separator,
            }),
            (None, Some(folder), Some(style)) => Ok(ColorLayout::Nested {
                folder: FolderTemplate::parse(&folder.body)?,
                style: style.body,
            }),
            (None, Some(_), None) => Err(TemplateError::IncompleteColorLayout {
                present: FOLDER_TAG,
                missing: STYLE_TAG,
            }),
            (None, None, Some(_)) => Err(TemplateError::IncompleteColorLayout {
                present: STYLE_TAG,
                missing: FOLDER_TAG,
            }),
            (None, None, None) => Err(TemplateError::MissingColorLayout),
        }
    }
}

/// A `{#folder}` body split around its `{#child}` wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTemplate {
    parts: Vec<FolderPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FolderPart {
    Text(String),
    Children { separator: String, wrapper: Vec<String> },
}

impl FolderTemplate {
    pub fn parse(body: &str) -> Result<Self, TemplateError> {
        let parts: Vec<_> = parse_regions(body, &[CHILD_TAG])
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => FolderPart::Text(text),
                Segment::Region(region) => FolderPart::Children {
                    separator: region.separator,
                    wrapper: region.body.split(RECURSE).map(str::to_string).collect(),
                },
            })
            .collect();

        if !parts.iter().any(|p| matches!(p, FolderPart::Children { .. })) {
            return Err(TemplateError::MissingChildRegion);
        }
        Ok(Self { parts })
    }
}

/// Renders a grouped tree against a layout.
///
/// `dictionary_fn` builds a leaf's dictionary from the item, its original
/// index and its display name; `base` is merged underneath every
/// dictionary (document tokens). Matchers are compiled once per render:
/// one for folders, one for leaves (from the first leaf dictionary).
pub struct TreeRenderer<'a, T, F> {
    folder: &'a FolderTemplate,
    style: &'a str,
    base: &'a ReplacementDictionary,
    dictionary_fn: F,
    folder_matcher: TokenMatcher,
    leaf_matcher: OnceCell<TokenMatcher>,
    _item: std::marker::PhantomData<fn(&T)>,
}

impl<'a, T, F> TreeRenderer<'a, T, F>
where
    F: Fn(&T, usize, &str) -> ReplacementDictionary,
{
    pub fn new(folder: &'a FolderTemplate, style: &'a str, base: &'a ReplacementDictionary, dictionary_fn: F) -> Self {
        let folder_matcher = TokenMatcher::for_dictionary(&base.merged(&folder_dictionary("")));
        Self {
            folder,
            style,
            base,
            dictionary_fn,
            folder_matcher,
            leaf_matcher: OnceCell::new(),
            _item: std::marker::PhantomData,
        }
    }

    /// Render sibling nodes joined by `separator`.
    pub fn render_siblings(&self, nodes: &[Node<T>], separator: &str) -> String {
        join_lines(nodes.iter().map(|n| self.render_node(n)).collect(), separator)
    }

    pub fn render_node(&self, node: &Node<T>) -> String {
        let dictionary = self.dictionary(node);
        let matcher = self.matcher(node, &dictionary);
        match node {
            Node::Leaf { .. } => matcher.replace(self.style, &dictionary),
            Node::Folder { children, .. } => self
                .folder
                .parts
                .iter()
                .map(|part| match part {
                    FolderPart::Text(text) => matcher.replace(text, &dictionary),
                    FolderPart::Children { separator, wrapper } => {
                        let lines = children.iter().map(|child| self.wrap_child(child, wrapper)).collect();
                        join_lines(lines, separator)
                    }
                })
                .collect(),
        }
    }

    fn wrap_child(&self, child: &Node<T>, wrapper: &[String]) -> String {
        let dictionary = self.dictionary(child);
        let matcher = self.matcher(child, &dictionary);
        let content = self.render_node(child);
        wrapper
            .iter()
            .map(|piece| matcher.replace(piece, &dictionary))
            .collect::<Vec<_>>()
            .join(&content)
    }

    fn matcher(&self, node: &Node<T>, dictionary: &ReplacementDictionary) -> &TokenMatcher {
        match node {
            Node::Leaf { .. } => self.leaf_matcher.get_or_init(|| TokenMatcher::for_dictionary(dictionary)),
            Node::Folder { .. } => &self.folder_matcher,
        }
    }

    fn dictionary(&self, node: &Node<T>) -> ReplacementDictionary {
        let own = match node {
            Node::Leaf { name, index, item } => (self.dictionary_fn)(item, *index, name),
            Node::Folder { name, .. } => folder_dictionary(name),
        };
        self.base.merged(&own)
    }
}

/// Render a `{#color}` block body over `items`.
///
/// The flat layout repeats its template over every item with the full
/// name; the nested layout groups by path first. `separator` is the
/// enclosing block's separator, used between top-level siblings and as the
/// flat fallback when `{#flat}` carries none.
pub fn render_grouped<T, F>(
    body: &str,
    separator: &str,
    items: &[T],
    name_of: impl Fn(&T) -> &str,
    base: &ReplacementDictionary,
    dictionary_fn: F,
) -> Result<String, TemplateError>
where
    T: Clone,
    F: Fn(&T, usize, &str) -> ReplacementDictionary,
{
    match ColorLayout::parse(body)? {
        ColorLayout::Flat { template, separator: own } => {
            let separator = if own.is_empty() { separator } else { own.as_str() };
            Ok(repeat(&template, separator, items, |item, i| {
                base.merged(&dictionary_fn(item, i, name_of(item).trim()))
            }))
        }
        ColorLayout::Nested { folder, style } => {
            let tree = group_by_path(items, &name_of);
            let renderer = TreeRenderer::new(&folder, &style, base, dictionary_fn);
            Ok(renderer.render_siblings(&tree, separator))
        }
    }
}

/// Override `NAME` in a leaf dictionary with its display name.
pub fn with_display_name(mut dictionary: ReplacementDictionary, name: &str) -> ReplacementDictionary {
    dictionary.insert(NAME, name);
    dictionary
}

/// True when `body` holds a `{#child}` wrapper without the recursion marker.
pub fn child_without_recursion(body: &str) -> bool {
    parse_regions(body, &[CHILD_TAG]).iter().any(|segment| match segment {
        Segment::Region(region) => !region.body.contains(RECURSE),
        Segment::Text(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::document_dictionary;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    fn leaf_dictionary(_: &Item, index: usize, name: &str) -> ReplacementDictionary {
        [(NAME.to_string(), name.to_string()), ("INDEX".to_string(), index.to_string())]
            .into_iter()
            .collect()
    }

    fn render(body: &str, separator: &str, items: &[Item]) -> Result<String, TemplateError> {
        render_grouped(body, separator, items, |i| i.0, &ReplacementDictionary::new(), leaf_dictionary)
    }

    #[test]
    fn test_path_segments_trim_around_slashes() {
        assert_eq!(path_segments(" a / b/c "), vec!["a", "b", "c"]);
        assert_eq!(path_segments("a//b"), vec!["a", "b"]);
        assert_eq!(path_segments("solo"), vec!["solo"]);
    }

    #[test]
    fn test_group_by_path() {
        let items = [Item("a/b/Icon1"), Item("a/b/Icon2"), Item("Icon3")];
        let tree = group_by_path(&items, |i| i.0);
        assert_eq!(
            tree,
            vec![
                Node::Folder {
                    name: "a".to_string(),
                    children: vec![Node::Folder {
                        name: "b".to_string(),
                        children: vec![
                            Node::Leaf { name: "Icon1".to_string(), index: 0, item: Item("a/b/Icon1") },
                            Node::Leaf { name: "Icon2".to_string(), index: 1, item: Item("a/b/Icon2") },
                        ],
                    }],
                },
                Node::Leaf { name: "Icon3".to_string(), index: 2, item: Item("Icon3") },
            ]
        );
    }

    #[test]
    fn test_group_keeps_first_appearance_order() {
        let items = [Item("a/x"), Item("y"), Item("a/z")];
        let names: Vec<_> = group_by_path(&items, |i| i.0).iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["a", "y"]);
    }

    #[test]
    fn test_interleaved_paths_reuse_folders() {
        let items = [Item("a/b/x"), Item("c/y"), Item("a/z"), Item("a/b/w")];
        let tree = group_by_path(&items, |i| i.0);
        let Node::Folder { name, children } = &tree[0] else {
            panic!("expected folder, got {:?}", tree[0]);
        };
        assert_eq!(name, "a");
        assert_eq!(tree.len(), 2);
        let names: Vec<_> = children.iter().map(Node::name).collect();
        assert_eq!(names, vec!["b", "z"]);
        let Node::Folder { children: inner, .. } = &children[0] else {
            panic!("expected folder b");
        };
        let leaves: Vec<_> = inner.iter().map(Node::name).collect();
        assert_eq!(leaves, vec!["x", "w"]);
    }

    #[test]
    fn test_many_leaves_share_matchers() {
        let items: Vec<_> = ["p/a", "p/b", "q/c", "q/r/d", "e"].into_iter().map(Item).collect();
        let out = render(
            "{#folder}NAME({#child ;}RECURSE{/child}){/folder}{#style}NAME=INDEX{/style}",
            ",",
            &items,
        )
        .unwrap();
        assert_eq!(out, "p(a=0;\nb=1),\nq(c=2;\nr(d=3)),\ne=4");
    }

    #[test]
    fn test_nested_render() {
        let body = "{#folder}NAME: [{#child ,}RECURSE{/child}]{/folder}{#style}NAME#INDEX{/style}";
        let items = [Item("a/b/Icon1"), Item("a/b/Icon2"), Item("Icon3")];
        let out = render(body, ";", &items).unwrap();
        assert_eq!(out, "a: [b: [Icon1#0,\nIcon2#1]];\nIcon3#2");
    }

    #[test]
    fn test_child_wrapper_uses_child_name() {
        let body = "{#folder}{#child}NAME=RECURSE{/child}{/folder}{#style}v{/style}";
        let out = render(body, "", &[Item("g/one"), Item("g/two")]).unwrap();
        assert_eq!(out, "one=v\ntwo=v");
    }

    #[test]
    fn test_folder_name_does_not_rewrite_children() {
        let body = "{#folder}<NAME>{#child}RECURSE{/child}{/folder}{#style}NAME{/style}";
        let out = render(body, "", &[Item("outer/NAME")]).unwrap();
        assert_eq!(out, "<outer>NAME");
    }

    #[test]
    fn test_flat_layout_ignores_hierarchy() {
        let body = "ignored {#flat}NAME{/flat}";
        let out = render(body, ",", &[Item("a / b"), Item("c")]).unwrap();
        assert_eq!(out, "a / b,\nc");
    }

    #[test]
    fn test_flat_separator_overrides_block_separator() {
        let out = render("{#flat |}NAME{/flat}", ",", &[Item("a"), Item("b")]).unwrap();
        assert_eq!(out, "a|\nb");
    }

    #[test]
    fn test_flat_with_folder_is_rejected() {
        let body = "{#flat}NAME{/flat}{#folder}{#child}RECURSE{/child}{/folder}";
        assert!(matches!(render(body, "", &[Item("a")]), Err(TemplateError::ConflictingColorLayout)));
    }

    #[test]
    fn test_flat_with_style_is_rejected() {
        let body = "{#flat}NAME{/flat}{#style}NAME{/style}";
        assert!(matches!(render(body, "", &[]), Err(TemplateError::ConflictingColorLayout)));
    }

    #[test]
    fn test_folder_without_style_is_rejected() {
        let body = "{#folder}{#child}RECURSE{/child}{/folder}";
        assert!(matches!(
            render(body, "", &[]),
            Err(TemplateError::IncompleteColorLayout { present: "folder", missing: "style" })
        ));
    }

    #[test]
    fn test_style_without_folder_is_rejected() {
        assert!(matches!(
            render("{#style}NAME{/style}", "", &[]),
            Err(TemplateError::IncompleteColorLayout { present: "style", missing: "folder" })
        ));
    }

    #[test]
    fn test_missing_layout_is_rejected() {
        assert!(matches!(render("NAME", "", &[]), Err(TemplateError::MissingColorLayout)));
    }

    #[test]
    fn test_folder_without_child_is_rejected() {
        let body = "{#folder}NAME{/folder}{#style}NAME{/style}";
        assert!(matches!(render(body, "", &[]), Err(TemplateError::MissingChildRegion)));
    }

    #[test]
    fn test_base_tokens_reach_every_level() {
        let body = "{#folder}DOC_NAME/NAME{#child}RECURSE{/child}{/folder}{#style}:DOC_NAME.NAME{/style}";
        let base = document_dictionary("Kit");
        let out = render_grouped(body, "", &[Item("f/x")], |i| i.0, &base, leaf_dictionary).unwrap();
        assert_eq!(out, "Kit/f:Kit.x");
    }

    #[test]
    fn test_child_without_recursion() {
        assert!(child_without_recursion("{#child}NAME{/child}"));
        assert!(!child_without_recursion("{#child}[RECURSE]{/child}"));
        assert!(!child_without_recursion("no child here"));
    }
}
