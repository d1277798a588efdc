//! Request shape validation and normalization
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Search-style limits (300 chars, no markup characters)
//! - 1.0.0: Text and language code checks for translation

use super::error::ValidationError;

/// Longest accepted language or locale code
pub const MAX_LANG_CODE_LEN: usize = 10;

/// Characters rejected in search queries
const MARKUP_CHARS: &[char] = &['<', '>', '{', '}', '[', ']'];

/// Raw request as received from a command or message handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    /// Primary text: the text to translate or the search query
    pub text: String,
    /// Target language code, or the caller's locale for lookups
    pub lang: String,
}

impl GateRequest {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
        }
    }
}

/// Validated request handed to the upstream
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedRequest {
    /// Trimmed primary text
    pub text: String,
    /// Trimmed, lower-cased language code
    pub lang: String,
}

/// Size and content ceilings for the primary text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    pub max_chars: usize,
    pub max_bytes: Option<usize>,
    pub reject_markup: bool,
}

impl TextLimits {
    /// Translation text sent from Discord, leaving room in the embed
    pub const DISCORD_TRANSLATION: TextLimits = TextLimits {
        max_chars: 4000,
        max_bytes: Some(8000),
        reject_markup: false,
    };

    /// Encyclopedia search queries
    pub const SEARCH: TextLimits = TextLimits {
        max_chars: 300,
        max_bytes: None,
        reject_markup: true,
    };
}

/// Check the primary text and language code, returning their normalized forms.
pub fn validate(request: &GateRequest, limits: &TextLimits) -> Result<NormalizedRequest, ValidationError> {
    validate_text(&request.text, limits)?;
    let lang = validate_lang_code(&request.lang)?;
    Ok(NormalizedRequest {
        text: request.text.trim().to_string(),
        lang,
    })
}

pub fn validate_text(text: &str, limits: &TextLimits) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let chars = text.chars().count();
    if chars > limits.max_chars {
        return Err(ValidationError::TextTooLong {
            max_chars: limits.max_chars,
        });
    }

    if let Some(max_bytes) = limits.max_bytes {
        if text.len() > max_bytes {
            return Err(ValidationError::TextTooLarge { max_bytes });
        }
    }

    if limits.reject_markup && text.contains(MARKUP_CHARS) {
        return Err(ValidationError::MarkupCharacters);
    }

    Ok(())
}

/// Validate a language code and return it trimmed and lower-cased.
pub fn validate_lang_code(code: &str) -> Result<String, ValidationError> {
    if code.trim().is_empty() {
        return Err(ValidationError::EmptyLangCode);
    }
    if code.chars().count() > MAX_LANG_CODE_LEN {
        return Err(ValidationError::LangCodeTooLong {
            max_len: MAX_LANG_CODE_LEN,
        });
    }

    let code = code.trim().to_lowercase();
    let valid = code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ValidationError::LangCodeCharacters);
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_at_limit_accepted() {
        let limits = TextLimits::DISCORD_TRANSLATION;
        assert!(validate_text(&"a".repeat(4000), &limits).is_ok());
        assert_eq!(
            validate_text(&"a".repeat(4001), &limits),
            Err(ValidationError::TextTooLong { max_chars: 4000 })
        );
    }

    #[test]
    fn test_byte_ceiling_counts_utf8() {
        // 3000 chars of a 3-byte character: under the char limit, over the byte limit
        let text = "語".repeat(3000);
        assert_eq!(
            validate_text(&text, &TextLimits::DISCORD_TRANSLATION),
            Err(ValidationError::TextTooLarge { max_bytes: 8000 })
        );
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        let limits = TextLimits::DISCORD_TRANSLATION;
        assert_eq!(validate_text("", &limits), Err(ValidationError::EmptyText));
        assert_eq!(validate_text(" \n\t ", &limits), Err(ValidationError::EmptyText));
    }

    #[test]
    fn test_search_rejects_markup() {
        let limits = TextLimits::SEARCH;
        assert!(validate_text("Rust (programming language)", &limits).is_ok());
        for query in ["<script>", "{{template}}", "[[link]]"] {
            assert_eq!(
                validate_text(query, &limits),
                Err(ValidationError::MarkupCharacters)
            );
        }
        assert!(validate_text(&"q".repeat(301), &limits).is_err());
    }

    #[test]
    fn test_lang_code_normalized() {
        assert_eq!(validate_lang_code("en-US"), Ok("en-us".to_string()));
        assert_eq!(validate_lang_code("  FR "), Ok("fr".to_string()));
        assert_eq!(validate_lang_code("zh_TW"), Ok("zh_tw".to_string()));
    }

    #[test]
    fn test_lang_code_rejections() {
        assert_eq!(validate_lang_code("../etc"), Err(ValidationError::LangCodeCharacters));
        assert_eq!(validate_lang_code("   "), Err(ValidationError::EmptyLangCode));
        assert_eq!(
            validate_lang_code("abcdefghijk"),
            Err(ValidationError::LangCodeTooLong { max_len: 10 })
        );
        assert!(validate_lang_code("abcdefghij").is_ok());
    }

    #[test]
    fn test_validate_normalizes_request() {
        let request = GateRequest::new("  Hello world ", "FR");
        let normalized = validate(&request, &TextLimits::DISCORD_TRANSLATION).unwrap();
        assert_eq!(normalized.text, "Hello world");
        assert_eq!(normalized.lang, "fr");
    }
}
