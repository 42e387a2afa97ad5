//! Icon naming and de-duplication rules applied to extracted frames.

use regex::Regex;

use crate::model::IconData;

fn prefix_pattern(frame_prefix: &str) -> Option<Regex> {
    Regex::new(&format!(r"^\s*{}\s*/\s*", regex::escape(frame_prefix.trim()))).ok()
}

/// Icon name for a frame, or `None` when the frame is not an icon frame.
///
/// Variant keys (`size=`, `style=` ...) are dropped and the
/// `<prefix> /` marker is stripped.
pub fn icon_name(raw: &str, frame_prefix: &str) -> Option<String> {
    let prefix = prefix_pattern(frame_prefix)?;
    if !prefix.is_match(raw) {
        return None;
    }
    let variant_keys = Regex::new(r"\b\S+?=").ok()?;
    let without_keys = variant_keys.replace_all(raw.trim(), "");
    Some(prefix.replace(&without_keys, "").trim().to_string())
}

/// Name, filter and de-duplicate frames given in document order.
///
/// The first frame with a given name wins; the surviving list is then
/// reversed, so the last unique frame in the document comes first.
pub fn collect_icons(frames: impl IntoIterator<Item = IconData>, frame_prefix: &str) -> Vec<IconData> {
    let mut icons: Vec<IconData> = Vec::new();
    for mut frame in frames {
        let Some(name) = icon_name(&frame.name, frame_prefix) else {
            continue;
        };
        if icons.iter().any(|existing| existing.name == name) {
            continue;
        }
        frame.name = name;
        icons.push(frame);
    }
    icons.reverse();
    icons
}
