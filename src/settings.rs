//! Persisted plugin settings.

use serde::{Deserialize, Serialize};

use crate::formats::{Format, DEFAULT_FORMAT_ID};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    /// Base name of the generated file, without extension.
    #[serde(default = "default_file_name")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub sizing: Sizing,
    #[serde(default = "default_frame_prefix")]
    pub frame_prefix: String,
    #[serde(default = "default_format_id")]
    pub selected_format_id: String,
    #[serde(default)]
    pub custom_formats: Vec<Format>,
}

fn default_file_name() -> Option<String> { Some("icons".to_string()) }
fn default_frame_prefix() -> String { "icon".to_string() }
fn default_format_id() -> String { DEFAULT_FORMAT_ID.to_string() }

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            sizing: Sizing::default(),
            frame_prefix: default_frame_prefix(),
            selected_format_id: default_format_id(),
            custom_formats: Vec::new(),
        }
    }
}

impl PluginSettings {
    /// Repair a stale format selection.
    ///
    /// A `$`-prefixed id is kept as-is; any other id must name one of the
    /// custom formats, otherwise the default built-in is selected.
    pub fn normalized(mut self) -> Self {
        let id = self.selected_format_id.trim();
        let known = !id.is_empty()
            && (id.starts_with('$') || self.custom_formats.iter().any(|f| f.id == id));
        if !known {
            self.selected_format_id = default_format_id();
        }
        self
    }

    /// `<file name or "Icons">.<extension>`
    pub fn output_file_name(&self, extension: &str) -> String {
        let base = self.file_name.as_deref().unwrap_or("Icons");
        format!("{}.{}", base, extension)
    }
}

/// Which box icon coordinates are relative to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    /// Path data is placed at its offset inside the frame.
    #[default]
    Frame,
    /// Path data stays relative to its own bounds.
    Contents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings: PluginSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PluginSettings::default());
        assert_eq!(settings.frame_prefix, "icon");
        assert_eq!(settings.sizing, Sizing::Frame);
        assert_eq!(settings.selected_format_id, "$1");
    }

    #[test]
    fn test_camel_case_fields() {
        let settings: PluginSettings = serde_json::from_str(
            r#"{"fileName": "glyphs", "sizing": "contents", "framePrefix": "ic", "selectedFormatId": "$3"}"#,
        )
        .unwrap();
        assert_eq!(settings.file_name.as_deref(), Some("glyphs"));
        assert_eq!(settings.sizing, Sizing::Contents);
        assert_eq!(settings.frame_prefix, "ic");
        assert_eq!(settings.selected_format_id, "$3");
    }

    #[test]
    fn test_normalized_falls_back_for_unknown_custom_id() {
        let settings = PluginSettings { selected_format_id: "gone".to_string(), ..Default::default() };
        assert_eq!(settings.normalized().selected_format_id, "$1");
    }

    #[test]
    fn test_normalized_keeps_known_ids() {
        let custom = Format::custom("Mine", "txt", "NAME");
        let id = custom.id.clone();
        let settings = PluginSettings {
            selected_format_id: id.clone(),
            custom_formats: vec![custom],
            ..Default::default()
        };
        assert_eq!(settings.normalized().selected_format_id, id);

        let builtin = PluginSettings { selected_format_id: "$4".to_string(), ..Default::default() };
        assert_eq!(builtin.normalized().selected_format_id, "$4");
    }

    #[test]
    fn test_output_file_name() {
        let mut settings = PluginSettings::default();
        assert_eq!(settings.output_file_name("js"), "icons.js");
        settings.file_name = None;
        assert_eq!(settings.output_file_name("json"), "Icons.json");
    }
}
