//! Error types shared across the engine.

use thiserror::Error;

/// Structural template errors. Generation aborts; nothing partial is
/// returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("{{#flat}} cannot be combined with {{#folder}} or {{#style}} in a color block")]
    ConflictingColorLayout,

    #[error("{{#{present}}} requires a matching {{#{missing}}} in the same color block")]
    IncompleteColorLayout {
        present: &'static str,
        missing: &'static str,
    },

    #[error("color block needs either {{#flat}} or both {{#folder}} and {{#style}}")]
    MissingColorLayout,

    #[error("{{#folder}} needs a {{#child}}...RECURSE...{{/child}} region")]
    MissingChildRegion,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Invalid path data: {reason}")]
    InvalidPathData { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_tags() {
        let err = TemplateError::IncompleteColorLayout { present: "folder", missing: "style" };
        assert_eq!(err.to_string(), "{#folder} requires a matching {#style} in the same color block");
        assert!(TemplateError::ConflictingColorLayout.to_string().contains("{#flat}"));
    }
}
