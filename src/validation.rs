//! Validation System - Rule/Policy Separation
//!
//! Rules inspect a format's template and produce structured violations.
//! Errors block generation; warnings are reported alongside the output.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::blocks::{find_regions, parse_regions, Segment};
use crate::case::CaseTransform;
use crate::formats::Format;
use crate::grouping::{child_without_recursion, ColorLayout, FOLDER_TAG};
use crate::template::{COLOR_TAG, ICON_TAG};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub format_id: String,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, template: &str) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// Every `{#color}` block must pick exactly one layout.
pub struct ColorLayoutRule;

impl ValidationRule for ColorLayoutRule {
    fn name(&self) -> &'static str { "color_layout" }

    fn validate(&self, template: &str) -> Vec<ValidationViolation> {
        find_regions(template, COLOR_TAG)
            .iter()
            .filter_map(|region| ColorLayout::parse(&region.body).err())
            .map(|err| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: err.to_string(),
                remediation: vec![
                    "Use {#flat}...{/flat} for a plain list".to_string(),
                    "Or pair {#folder}...{/folder} with {#style}...{/style} for grouped output".to_string(),
                ],
            })
            .collect()
    }
}

/// A `{#child}` wrapper without `RECURSE` drops the nested content.
pub struct ChildRecursionRule;

impl ValidationRule for ChildRecursionRule {
    fn name(&self) -> &'static str { "child_recursion" }

    fn validate(&self, template: &str) -> Vec<ValidationViolation> {
        find_regions(template, COLOR_TAG)
            .iter()
            .flat_map(|color| find_regions(&color.body, FOLDER_TAG))
            .filter(|folder| child_without_recursion(&folder.body))
            .map(|_| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: "{#child} wrapper has no RECURSE marker; nested content is omitted".to_string(),
                remediation: vec!["Place RECURSE where each child's output belongs".to_string()],
            })
            .collect()
    }
}

/// Openers without a matching closer are emitted verbatim.
pub struct UnclosedBlockRule;

impl ValidationRule for UnclosedBlockRule {
    fn name(&self) -> &'static str { "unclosed_block" }

    fn validate(&self, template: &str) -> Vec<ValidationViolation> {
        let leftover: String = parse_regions(template, &[ICON_TAG, COLOR_TAG])
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text),
                Segment::Region(_) => None,
            })
            .collect();

        [ICON_TAG, COLOR_TAG]
            .into_iter()
            .filter(|tag| {
                Regex::new(&format!(r"\{{#{}(?:\s[^}}\n]*)?\}}", tag))
                    .map_or(false, |opener| opener.is_match(&leftover))
            })
            .map(|tag| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("{{#{}}} has no matching {{/{}}} and will not be expanded", tag, tag),
                remediation: vec![format!("Close the block with {{/{}}}", tag)],
            })
            .collect()
    }
}

/// `TOKEN_<X>` where `X` is not one of the case suffixes.
pub struct CaseSuffixRule {
    pattern: Option<Regex>,
}

const KNOWN_TOKENS: &[&str] = &[
    "DOC_NAME", "PLUGIN_NAME", "FULL_NAME", "NAME", "WIDTH", "HEIGHT", "LEFT", "TOP", "PATH_DATA", "INDEX",
];

impl CaseSuffixRule {
    pub fn new() -> Self {
        let tokens = KNOWN_TOKENS.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        Self { pattern: Regex::new(&format!(r"\b(?:{})_([A-Z]+)\b", tokens)).ok() }
    }
}

impl Default for CaseSuffixRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRule for CaseSuffixRule {
    fn name(&self) -> &'static str { "case_suffix" }

    fn validate(&self, template: &str) -> Vec<ValidationViolation> {
        let Some(pattern) = &self.pattern else {
            return vec![];
        };
        let mut unknown: Vec<String> = pattern
            .captures_iter(template)
            .filter(|caps| CaseTransform::from_suffix(&caps[1]).is_none())
            .map(|caps| caps[0].to_string())
            .collect();
        unknown.sort();
        unknown.dedup();

        unknown
            .into_iter()
            .map(|written| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("{} does not end in a known case suffix", written),
                remediation: vec![format!(
                    "Use one of: {}",
                    CaseTransform::ALL.iter().map(|c| c.suffix()).collect::<Vec<_>>().join(", ")
                )],
            })
            .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ColorLayoutRule),
                Box::new(ChildRecursionRule),
                Box::new(UnclosedBlockRule),
                Box::new(CaseSuffixRule::new()),
            ],
        }
    }

    pub fn validate(&self, format: &Format) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(&format.template))
            .collect();

        // Warnings never block
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations, format_id: format.id.clone() }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
