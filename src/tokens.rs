//! Replacement dictionaries for documents, icons, colors and folders.
//!
//! A token whose name contains another token's name is always registered
//! before it (`FULL_NAME` before `NAME`, `ARGB_HEX` before `RGB_HEX`).

use serde::Serialize;

use crate::model::{ColorData, IconData};
use crate::PLUGIN_NAME;

pub const DOC_NAME: &str = "DOC_NAME";
pub const PLUGIN_NAME_TOKEN: &str = "PLUGIN_NAME";

pub const NAME: &str = "NAME";
pub const FULL_NAME: &str = "FULL_NAME";
pub const WIDTH: &str = "WIDTH";
pub const HEIGHT: &str = "HEIGHT";
pub const LEFT: &str = "LEFT";
pub const TOP: &str = "TOP";
pub const PATH_DATA: &str = "PATH_DATA";
pub const HUNDREDS_INDEX: &str = "HUNDREDS_INDEX";
pub const INDEX: &str = "INDEX";

pub const RGBA_CSS: &str = "RGBA_CSS";
pub const RGBA_HEX: &str = "RGBA_HEX";
pub const ARGB_HEX: &str = "ARGB_HEX";
pub const RGB_HEX: &str = "RGB_HEX";

/// Marks where a child's rendering goes inside a `{#child}` wrapper.
pub const RECURSE: &str = "RECURSE";

/// Ordered token -> value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementDictionary {
    entries: Vec<(String, String)>,
}

impl ReplacementDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Overwriting keeps the original position.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` followed by the entries of `other` that `self` lacks.
    pub fn merged(&self, other: &ReplacementDictionary) -> ReplacementDictionary {
        let mut merged = self.clone();
        for (token, value) in &other.entries {
            if merged.get(token).is_none() {
                merged.entries.push((token.clone(), value.clone()));
            }
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

pub fn document_dictionary(document_name: &str) -> ReplacementDictionary {
    [(DOC_NAME, document_name), (PLUGIN_NAME_TOKEN, PLUGIN_NAME)]
        .into_iter()
        .collect()
}

pub fn icon_dictionary(icon: &IconData, index: usize) -> ReplacementDictionary {
    let mut dict = ReplacementDictionary::new();
    dict.insert(NAME, icon.name.trim());
    dict.insert(WIDTH, format_number(icon.width));
    dict.insert(HEIGHT, format_number(icon.height));
    dict.insert(LEFT, format_number(icon.offset_x));
    // Sourced from the horizontal offset, matching every shipped template.
    dict.insert(TOP, format_number(icon.offset_x));
    dict.insert(PATH_DATA, icon.data.as_str());
    dict.insert(HUNDREDS_INDEX, format!("{:03}", index));
    dict.insert(INDEX, index.to_string());
    dict
}

pub fn color_dictionary(color: &ColorData, index: usize) -> ReplacementDictionary {
    let name = color.name.trim();
    let (r, g, b, a) = (channel_256(color.r), channel_256(color.g), channel_256(color.b), channel_256(color.a));

    let mut dict = ReplacementDictionary::new();
    dict.insert(FULL_NAME, name);
    dict.insert(NAME, name);
    dict.insert(RGBA_CSS, format!("rgba({}, {}, {}, {})", r, g, b, format_number(clamp01(color.a))));
    dict.insert(RGBA_HEX, format!("{:02X}{:02X}{:02X}{:02X}", r, g, b, a));
    dict.insert(ARGB_HEX, format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b));
    dict.insert(RGB_HEX, format!("{:02X}{:02X}{:02X}", r, g, b));
    for (channel, value) in [("R", color.r), ("G", color.g), ("B", color.b)] {
        dict.insert(format!("{}_01", channel), format_number(clamp01(value)));
        dict.insert(format!("{}_256", channel), channel_256(value).to_string());
        dict.insert(format!("{}_HEX", channel), format!("{:02X}", channel_256(value)));
    }
    dict.insert("A_01", format_number(clamp01(color.a)));
    dict.insert("A_HEX", format!("{:02X}", a));
    dict.insert(INDEX, index.to_string());
    dict
}

pub fn folder_dictionary(name: &str) -> ReplacementDictionary {
    [(NAME, name)].into_iter().collect()
}

fn clamp01(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn channel_256(value: f64) -> u8 {
    (clamp01(value) * 255.0).round() as u8
}

/// Shortest decimal form; integral values print without a fraction.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_superset_first(dict: &ReplacementDictionary) {
        let tokens: Vec<_> = dict.tokens().collect();
        for (i, earlier) in tokens.iter().enumerate() {
            for later in &tokens[i + 1..] {
                assert!(
                    !later.contains(earlier),
                    "{} is registered after {}, which it contains",
                    later,
                    earlier
                );
            }
        }
    }

    fn sample_icon() -> IconData {
        IconData {
            name: "  arrow left ".to_string(),
            width: 24.0,
            height: 24.5,
            offset_x: 2.0,
            offset_y: 3.0,
            data: "M0 0H24V24H0Z".to_string(),
        }
    }

    #[test]
    fn test_icon_dictionary_values() {
        let dict = icon_dictionary(&sample_icon(), 7);
        assert_eq!(dict.get(NAME), Some("arrow left"));
        assert_eq!(dict.get(WIDTH), Some("24"));
        assert_eq!(dict.get(HEIGHT), Some("24.5"));
        assert_eq!(dict.get(PATH_DATA), Some("M0 0H24V24H0Z"));
        assert_eq!(dict.get(INDEX), Some("7"));
        assert_eq!(dict.get(HUNDREDS_INDEX), Some("007"));
    }

    #[test]
    fn test_icon_top_reads_horizontal_offset() {
        // TOP mirrors LEFT; offset_y is never consulted.
        let dict = icon_dictionary(&sample_icon(), 0);
        assert_eq!(dict.get(LEFT), Some("2"));
        assert_eq!(dict.get(TOP), Some("2"));
    }

    #[test]
    fn test_color_dictionary_values() {
        let color = ColorData { name: "Brand / Primary".to_string(), r: 1.0, g: 0.5, b: 0.0, a: 0.5 };
        let dict = color_dictionary(&color, 3);
        assert_eq!(dict.get(FULL_NAME), Some("Brand / Primary"));
        assert_eq!(dict.get("R_01"), Some("1"));
        assert_eq!(dict.get("G_01"), Some("0.5"));
        assert_eq!(dict.get("G_256"), Some("128"));
        assert_eq!(dict.get("G_HEX"), Some("80"));
        assert_eq!(dict.get("B_HEX"), Some("00"));
        assert_eq!(dict.get("A_HEX"), Some("80"));
        assert_eq!(dict.get(RGBA_CSS), Some("rgba(255, 128, 0, 0.5)"));
        assert_eq!(dict.get(RGBA_HEX), Some("FF800080"));
        assert_eq!(dict.get(ARGB_HEX), Some("80FF8000"));
        assert_eq!(dict.get(RGB_HEX), Some("FF8000"));
        assert_eq!(dict.get(INDEX), Some("3"));
    }

    #[test]
    fn test_channels_are_clamped() {
        let color = ColorData { name: "x".to_string(), r: 1.4, g: -0.2, b: f64::NAN, a: 1.0 };
        let dict = color_dictionary(&color, 0);
        assert_eq!(dict.get(RGB_HEX), Some("FF0000"));
    }

    #[test]
    fn test_builders_register_supersets_first() {
        assert_superset_first(&document_dictionary("Doc"));
        assert_superset_first(&icon_dictionary(&sample_icon(), 0));
        let color = ColorData { name: "c".to_string(), r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
        assert_superset_first(&color_dictionary(&color, 0));
        assert_superset_first(&document_dictionary("Doc").merged(&icon_dictionary(&sample_icon(), 0)));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut dict: ReplacementDictionary = [("A", "1"), ("B", "2")].into_iter().collect();
        dict.insert("A", "3");
        assert_eq!(dict.iter().collect::<Vec<_>>(), vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(24.0), "24");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.5), "-3.5");
    }
}
