//! Top-level template: document tokens, `{#icon}` and `{#color}` blocks.
//!
//! The template is split into regions once and every piece is rendered
//! against its own dictionary, merged over the document dictionary.

use crate::blocks::{parse_regions, repeat, Segment};
use crate::error::TemplateError;
use crate::grouping::{render_grouped, with_display_name};
use crate::model::{ColorData, IconData};
use crate::substitute::TokenMatcher;
use crate::tokens::{color_dictionary, document_dictionary, icon_dictionary, ReplacementDictionary};

pub const ICON_TAG: &str = "icon";
pub const COLOR_TAG: &str = "color";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        Self { segments: parse_regions(text, &[ICON_TAG, COLOR_TAG]) }
    }

    pub fn render(
        &self,
        document: &ReplacementDictionary,
        icons: &[IconData],
        colors: &[ColorData],
    ) -> Result<String, TemplateError> {
        let matcher = TokenMatcher::for_dictionary(document);
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(&matcher.replace(text, document)),
                Segment::Region(region) if region.tag == ICON_TAG => {
                    out.push_str(&repeat(&region.body, &region.separator, icons, |icon, i| {
                        document.merged(&icon_dictionary(icon, i))
                    }));
                }
                Segment::Region(region) => {
                    let rendered = render_grouped(
                        &region.body,
                        &region.separator,
                        colors,
                        |color| color.name.as_str(),
                        document,
                        |color, i, name| with_display_name(color_dictionary(color, i), name),
                    )?;
                    out.push_str(&rendered);
                }
            }
        }
        Ok(out)
    }
}

/// Render `template` for one document. Icon path data is used as given.
pub fn render_template(
    template: &str,
    document_name: &str,
    icons: &[IconData],
    colors: &[ColorData],
) -> Result<String, TemplateError> {
    Template::parse(template).render(&document_dictionary(document_name), icons, colors)
}
