//! IconForge Core - Template-Driven Export Engine
//!
//! # The Five Rules (Non-Negotiable)
//! 1. Templates Are The Only User Artifact
//! 2. Longest Token Wins
//! 3. Structure Errors Abort, Missing Tokens Do Not
//! 4. Every Generation Starts From A Fresh Snapshot
//! 5. Generation Always Validates

pub mod case;
pub mod tokens;
pub mod substitute;
pub mod blocks;
pub mod grouping;
pub mod template;
pub mod geometry;
pub mod error;
pub mod model;
pub mod settings;
pub mod formats;
pub mod extract;
pub mod validation;
pub mod pipeline;

pub use case::CaseTransform;
pub use tokens::ReplacementDictionary;
pub use substitute::{substitute, TokenMatcher};
pub use blocks::expand_block;
pub use grouping::{group_by_path, Node};
pub use template::{render_template, Template};
pub use geometry::{CanonicalWinding, Passthrough, PathNormalizer};
pub use error::{GeometryError, TemplateError};
pub use model::{ColorData, ExportData, IconData};
pub use settings::{PluginSettings, Sizing};
pub use formats::{Format, FormatError, FormatRegistry};
pub use extract::collect_icons;
pub use validation::{ValidationResult, ValidationViolation, Validator, ViolationSeverity};
pub use pipeline::{ExportPipeline, GenerateError, GeneratedFile};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Product name substituted for `PLUGIN_NAME`.
pub const PLUGIN_NAME: &str = "IconForge";
