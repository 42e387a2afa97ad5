//! Entities handed over by the extraction side.

use serde::{Deserialize, Serialize};

use crate::extract::collect_icons;
use crate::settings::PluginSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconData {
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    /// Compound path data in SVG path syntax.
    pub data: String,
}

/// One solid paint style. Channels are fractions in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorData {
    pub name: String,
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 { 1.0 }

/// Snapshot of everything one generation needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    #[serde(default)]
    pub settings: PluginSettings,
    pub document_name: String,
    #[serde(default)]
    pub icons: Vec<IconData>,
    #[serde(default)]
    pub colors: Vec<ColorData>,
}

impl ExportData {
    /// Snapshot built from raw frames, in document order.
    ///
    /// Frames are filtered, named and de-duplicated with the settings'
    /// frame prefix.
    pub fn from_frames(
        settings: PluginSettings,
        document_name: impl Into<String>,
        frames: Vec<IconData>,
        colors: Vec<ColorData>,
    ) -> Self {
        let icons = collect_icons(frames, &settings.frame_prefix);
        Self { settings, document_name: document_name.into(), icons, colors }
    }
}
