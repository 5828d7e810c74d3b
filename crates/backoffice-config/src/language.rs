// UI language preference.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Supported console languages. Anything else falls back to English.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    En,
    Ru,
    Uz,
}

impl Language {
    /// Resolve a language tag such as `ru`, `ru-RU`, or `uz_UZ.UTF-8`.
    pub fn resolve(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .trim();
        primary.parse().unwrap_or_default()
    }

    /// The language's name for itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Русский",
            Self::Uz => "O'zbekcha",
        }
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::resolve(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn resolves_regional_tags() {
        assert_eq!(Language::resolve("ru-RU"), Language::Ru);
        assert_eq!(Language::resolve("uz_UZ.UTF-8"), Language::Uz);
        assert_eq!(Language::resolve("EN"), Language::En);
    }

    #[test]
    fn unknown_falls_back_to_english() {
        assert_eq!(Language::resolve("de"), Language::En);
        assert_eq!(Language::resolve(""), Language::En);
    }

    #[test]
    fn three_languages_supported() {
        let codes: Vec<String> = Language::iter().map(|l| l.to_string()).collect();
        assert_eq!(codes, vec!["en", "ru", "uz"]);
    }
}
