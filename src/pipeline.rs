//! Export Pipeline - Single Entry Point
//!
//! CRITICAL: generation MUST validate the format internally. No bypass.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::{GeometryError, TemplateError};
use crate::formats::{Format, FormatRegistry};
use crate::geometry::{CanonicalWinding, PathNormalizer};
use crate::model::{ExportData, IconData};
use crate::settings::Sizing;
use crate::template::Template;
use crate::tokens::document_dictionary;
use crate::validation::{ValidationResult, Validator};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Format not found: {0}")]
    FormatNotFound(String),

    #[error("Template invalid: {0}")]
    TemplateInvalid(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Icon {icon:?} has unusable path data: {source}")]
    Geometry {
        icon: String,
        #[source]
        source: GeometryError,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub file_name: String,
    pub file_text: String,
}

/// The export pipeline - single entry point for all generation
pub struct ExportPipeline {
    registry: FormatRegistry,
    validator: Validator,
    normalizer: Box<dyn PathNormalizer>,
}

impl ExportPipeline {
    pub fn new(registry: FormatRegistry) -> Self {
        Self {
            registry,
            validator: Validator::new(),
            normalizer: Box::new(CanonicalWinding),
        }
    }

    pub fn with_normalizer(mut self, normalizer: impl PathNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// List all available formats
    pub fn list_formats(&self) -> Vec<&Format> {
        self.registry.list()
    }

    pub fn get_format(&self, id: &str) -> Option<&Format> {
        self.registry.get(id)
    }

    /// Validate a format's template
    ///
    /// This is the ONLY validation entry point.
    pub fn validate_format(&self, format: &Format) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(format)
    }

    /// Generate the file for the format selected in the export settings.
    ///
    /// Custom formats carried in the settings are layered over the
    /// registry for this call only; they win over a loaded custom format
    /// with the same id.
    pub fn generate(&self, data: &ExportData) -> Result<GeneratedFile, GenerateError> {
        let settings = data.settings.clone().normalized();
        let id = settings.selected_format_id.as_str();

        let mut registry = self.registry.clone();
        registry.extend_custom(settings.custom_formats.iter().cloned());
        let format = registry
            .get(id)
            .ok_or_else(|| GenerateError::FormatNotFound(id.to_string()))?;
        self.generate_with(data, format)
    }

    /// Generate with an explicit format (preview and editing).
    ///
    /// CRITICAL: This ALWAYS calls validate_format internally.
    pub fn generate_with(&self, data: &ExportData, format: &Format) -> Result<GeneratedFile, GenerateError> {
        // MANDATORY: Validation is always called.
        let validation = self.validate_format(format);
        if validation.has_errors() {
            let messages: Vec<_> = validation.errors().map(|v| format!("{}: {}", v.rule, v.message)).collect();
            return Err(GenerateError::TemplateInvalid(messages.join("; ")));
        }

        let icons = self.normalize_icons(&data.icons, data.settings.sizing)?;
        debug!(
            format = %format.id,
            icons = icons.len(),
            colors = data.colors.len(),
            "Rendering template"
        );

        let document = document_dictionary(&data.document_name);
        let file_text = Template::parse(&format.template).render(&document, &icons, &data.colors)?;
        let file_name = data.settings.output_file_name(&format.extension);

        debug!(file_name = %file_name, bytes = file_text.len(), "Generated file");
        Ok(GeneratedFile { file_name, file_text })
    }

    /// Working copies of the icons with canonical path data.
    fn normalize_icons(&self, icons: &[IconData], sizing: Sizing) -> Result<Vec<IconData>, GenerateError> {
        icons
            .iter()
            .map(|icon| {
                let translate = match sizing {
                    Sizing::Frame => Some((icon.offset_x, icon.offset_y)),
                    Sizing::Contents => None,
                };
                let data = self
                    .normalizer
                    .normalize(&icon.data, translate)
                    .map_err(|source| GenerateError::Geometry { icon: icon.name.clone(), source })?;
                Ok(IconData { data, ..icon.clone() })
            })
            .collect()
    }

    /// Generate and serialize as `{"fileName", "fileText"}`.
    pub fn generate_json(&self, data: &ExportData) -> Result<String, GenerateError> {
        let file = self.generate(data)?;
        Ok(serde_json::to_string(&file)?)
    }
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(FormatRegistry::default())
    }
}
