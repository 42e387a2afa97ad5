//! Format Registry - built-in and custom output formats

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

pub type FormatId = String;

pub const DEFAULT_FORMAT_ID: &str = "$1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub id: FormatId,
    pub name: String,
    pub extension: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom: bool,
}

impl Format {
    /// A new user format with a generated id.
    pub fn custom(name: impl Into<String>, extension: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            extension: extension.into(),
            template: template.into(),
            custom: true,
        }
    }

    fn builtin(id: &str, name: &str, extension: &str, template: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
            template: template.to_string(),
            custom: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Format not found: {0}")]
    NotFound(String),

    #[error("Built-in format {0} cannot be modified")]
    BuiltInImmutable(String),

    #[error("Failed to read formats: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format file: {0}")]
    Parse(#[from] serde_json::Error),
}

const FONT_AWESOME_JS: &str = r#"// generated from "DOC_NAME" using the "PLUGIN_NAME" plugin
{#icon}export const faNAME_PASCAL = { prefix: "fas", iconName: "NAME", icon: [WIDTH, HEIGHT, [], "eHUNDREDS_INDEX", "PATH_DATA"]}{/icon}
"#;

const SIMPLE_JS: &str = r#"// generated from "DOC_NAME" using the "PLUGIN_NAME" plugin
{#icon}export const NAME_CAMEL = {l: LEFT, t: TOP, w: WIDTH, h: HEIGHT, title: "NAME", d: "PATH_DATA"};{/icon}
"#;

const SIMPLE_JSON: &str = r#"{
{#icon ,}  "NAME_CAMEL": {"l": LEFT, "t": TOP, "w": WIDTH, "h": HEIGHT, "title": "NAME", "d": "PATH_DATA"}{/icon}
}
"#;

const SVG_IN_JSX: &str = r#"// generated from "DOC_NAME" using the PLUGIN_NAME plugin
{#icon}export const iconNAME_PASCAL = <svg class="Icon" width="WIDTH" height="HEIGHT" viewBox="LEFT TOP WIDTH HEIGHT"><title>NAME_PASCAL</title><path d="PATH_DATA" fill="currentcolor"/></svg>{/icon}
"#;

/// The immutable formats shipped with the engine.
pub fn builtin_formats() -> Vec<Format> {
    vec![
        Format::builtin("$1", "Font Awesome JS Library", "js", FONT_AWESOME_JS),
        Format::builtin("$2", "Simple JavaScript", "js", SIMPLE_JS),
        Format::builtin("$3", "Simple JSON", "json", SIMPLE_JSON),
        Format::builtin("$4", "SVG in JSX", "jsx", SVG_IN_JSX),
    ]
}

/// Format registry - built-ins first, then custom formats in insertion order
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    builtins: Vec<Format>,
    custom: Vec<Format>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self { builtins: Vec::new(), custom: Vec::new() }
    }

    pub fn with_builtins() -> Self {
        Self { builtins: builtin_formats(), custom: Vec::new() }
    }

    /// Built-ins plus every `*.json` format file in `dir`.
    ///
    /// Files that fail to read or parse are skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self, FormatError> {
        let mut registry = Self::with_builtins();
        if dir.exists() {
            let mut paths: Vec<_> = fs::read_dir(dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().map_or(false, |e| e == "json"))
                .collect();
            paths.sort();

            for path in paths {
                match fs::read_to_string(&path)
                    .map_err(FormatError::from)
                    .and_then(|content| serde_json::from_str::<Format>(&content).map_err(FormatError::from))
                {
                    Ok(format) => registry.register_custom(format),
                    Err(e) => warn!("Skipping format file {}: {}", path.display(), e),
                }
            }
        }
        debug!("Loaded {} formats", registry.list().len());
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&Format> {
        self.builtins.iter().chain(&self.custom).find(|f| f.id == id)
    }

    pub fn list(&self) -> Vec<&Format> {
        self.builtins.iter().chain(&self.custom).collect()
    }

    /// Add a custom format, replacing any custom format with the same id.
    /// Built-in ids are reserved; a clashing format gets a fresh id.
    pub fn register_custom(&mut self, mut format: Format) {
        format.custom = true;
        if format.id.is_empty() || self.is_builtin(&format.id) {
            format.id = Uuid::new_v4().to_string();
        }
        match self.custom.iter_mut().find(|f| f.id == format.id) {
            Some(existing) => *existing = format,
            None => self.custom.push(format),
        }
    }

    pub fn extend_custom(&mut self, formats: impl IntoIterator<Item = Format>) {
        for format in formats {
            self.register_custom(format);
        }
    }

    pub fn update_custom(&mut self, format: Format) -> Result<(), FormatError> {
        if self.is_builtin(&format.id) {
            return Err(FormatError::BuiltInImmutable(format.id));
        }
        let existing = self
            .custom
            .iter_mut()
            .find(|f| f.id == format.id)
            .ok_or_else(|| FormatError::NotFound(format.id.clone()))?;
        *existing = Format { custom: true, ..format };
        Ok(())
    }

    pub fn remove_custom(&mut self, id: &str) -> Result<Format, FormatError> {
        if self.is_builtin(id) {
            return Err(FormatError::BuiltInImmutable(id.to_string()));
        }
        let position = self
            .custom
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| FormatError::NotFound(id.to_string()))?;
        Ok(self.custom.remove(position))
    }

    fn is_builtin(&self, id: &str) -> bool {
        self.builtins.iter().any(|f| f.id == id)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
