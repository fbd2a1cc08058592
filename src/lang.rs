//! Language classification for extracted text
//!
//! Text blocks that are not in the configured target language are dropped
//! from the crawl output. Classification never fails: undetectable or
//! too-short input is simply treated as "not the target language".

use whatlang::Lang;

/// Classifies text against a single target language
#[derive(Debug, Clone, Copy)]
pub struct LanguageFilter {
    target: Lang,
}

impl LanguageFilter {
    /// Creates a filter for the given ISO 639-3 language code (e.g. "eng")
    ///
    /// Returns None if the code is not a known language.
    pub fn from_code(code: &str) -> Option<Self> {
        Lang::from_code(code).map(|target| Self { target })
    }

    /// Returns true if the text is detected as the target language
    ///
    /// Detection on empty, very short, or ambiguous input returns false
    /// rather than erroring.
    pub fn is_target(&self, text: &str) -> bool {
        whatlang::detect(text)
            .map(|info| info.lang() == self.target)
            .unwrap_or(false)
    }
}
