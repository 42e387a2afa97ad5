//! Case transforms selectable through a `TOKEN_<CASE>` suffix.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase, ToTitleCase,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseTransform {
    /// myIconName
    Camel,
    /// MyIconName
    Pascal,
    /// my_icon_name
    Snake,
    /// MY_ICON_NAME
    Constant,
    /// my-icon-name
    Kebab,
    /// MY ICON NAME
    Upper,
    /// my icon name
    Lower,
    /// My Icon Name
    Title,
}

impl CaseTransform {
    pub const ALL: [CaseTransform; 8] = [
        CaseTransform::Camel,
        CaseTransform::Pascal,
        CaseTransform::Snake,
        CaseTransform::Constant,
        CaseTransform::Kebab,
        CaseTransform::Upper,
        CaseTransform::Lower,
        CaseTransform::Title,
    ];

    /// The suffix written after `TOKEN_` in a template.
    pub fn suffix(&self) -> &'static str {
        match self {
            CaseTransform::Camel => "CAMEL",
            CaseTransform::Pascal => "PASCAL",
            CaseTransform::Snake => "SNAKE",
            CaseTransform::Constant => "CONSTANT",
            CaseTransform::Kebab => "KEBAB",
            CaseTransform::Upper => "UPPER",
            CaseTransform::Lower => "LOWER",
            CaseTransform::Title => "TITLE",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.suffix() == suffix)
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            CaseTransform::Camel => input.to_lower_camel_case(),
            CaseTransform::Pascal => input.to_pascal_case(),
            CaseTransform::Snake => input.to_snake_case(),
            CaseTransform::Constant => input.to_shouty_snake_case(),
            CaseTransform::Kebab => input.to_kebab_case(),
            CaseTransform::Upper => input.to_uppercase(),
            CaseTransform::Lower => input.to_lowercase(),
            CaseTransform::Title => input.to_title_case(),
        }
    }
}
