use std::fmt;

/// Languages the OCR service is asked to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    UzbekLatin,
    UzbekCyrillic,
    Russian,
    Korean,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::UzbekLatin,
        Language::UzbekCyrillic,
        Language::Russian,
        Language::Korean,
    ];

    /// Machine code sent in the `language` form field.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::UzbekLatin => "uzb",
            Language::UzbekCyrillic => "uzb_cyrl",
            Language::Russian => "rus",
            Language::Korean => "kor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::UzbekLatin => "Uzbek (Latin)",
            Language::UzbekCyrillic => "Uzbek (Cyrillic)",
            Language::Russian => "Russian",
            Language::Korean => "Korean",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

/// User-editable extraction settings.
///
/// `persist = None` means "not set" and is never sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub language: Language,
    pub persist: Option<bool>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            language: Language::English,
            persist: Some(false),
        }
    }
}
