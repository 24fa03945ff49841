//! Language lookup used to phrase instructions to the reasoning service.

use risk_lens_risk_models::LanguageCode;

/// Key for the English name of a language (e.g. `"Hindi"`), which is what
/// the reasoning service is told to answer in.
pub const LANGUAGE_NAME_KEY: &str = "language_name";

/// Key for the language's own name (e.g. `"हिन्दी"`).
pub const NATIVE_NAME_KEY: &str = "native_name";

/// A pure `(language, key) -> display string` lookup table.
pub trait Localizer: Send + Sync {
    /// Returns the string for `key` in `language`, if the table has one.
    fn lookup(&self, language: LanguageCode, key: &str) -> Option<String>;
}

/// Lookup table backed by the built-in language list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocalizer;

impl Localizer for StaticLocalizer {
    fn lookup(&self, language: LanguageCode, key: &str) -> Option<String> {
        let entry = language.language();
        match key {
            LANGUAGE_NAME_KEY => Some(entry.label.to_string()),
            NATIVE_NAME_KEY => Some(entry.native.to_string()),
            _ => None,
        }
    }
}

/// Name of the language to put in a "respond in ..." directive.
///
/// Falls back to English when the table has no entry.
#[must_use]
pub fn directive_language(localizer: &dyn Localizer, language: LanguageCode) -> String {
    localizer
        .lookup(language, LANGUAGE_NAME_KEY)
        .unwrap_or_else(|| "English".to_string())
}
