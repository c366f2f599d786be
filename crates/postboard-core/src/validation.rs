//! Shape checks for submitted post and comment text.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidateLength, ValidationError};

pub use validator::ValidationErrors;

const TEXT_FIELD: &str = "text";

/// Length bounds for post and comment text, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRules {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_chars: 300,
        }
    }
}

impl TextRules {
    /// Check the `text` field.
    pub fn check(&self, text: &str) -> Result<(), ValidationErrors> {
        let error = if text.trim().is_empty() {
            ValidationError::new("required").with_message(Cow::Borrowed("Text field is required"))
        } else if !text.validate_length(
            Some(self.min_chars as u64),
            Some(self.max_chars as u64),
            None,
        ) {
            ValidationError::new("length").with_message(Cow::Owned(format!(
                "Post must be between {} and {} characters",
                self.min_chars, self.max_chars
            )))
        } else {
            return Ok(());
        };

        let mut errors = ValidationErrors::new();
        errors.add(TEXT_FIELD, error);
        Err(errors)
    }
}

/// One message per field, the error code standing in when no message is set.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), |m| m.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(rules: &TextRules, text: &str) -> Option<String> {
        let errors = rules.check(text).err()?;
        field_messages(&errors).remove("text")
    }

    #[test]
    fn test_missing_text() {
        assert_eq!(
            text_message(&TextRules::default(), "   ").as_deref(),
            Some("Text field is required")
        );
    }

    #[test]
    fn test_length_bounds() {
        let rules = TextRules {
            min_chars: 3,
            max_chars: 5,
        };
        assert!(rules.check("abc").is_ok());
        assert!(rules.check("abcde").is_ok());
        assert!(rules.check("ab").is_err());
        assert_eq!(
            text_message(&rules, "abcdef").as_deref(),
            Some("Post must be between 3 and 5 characters")
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let rules = TextRules {
            min_chars: 1,
            max_chars: 3,
        };
        assert!(rules.check("äöü").is_ok());
    }

    #[test]
    fn test_field_messages_falls_back_to_code() {
        let mut errors = ValidationErrors::new();
        errors.add("text", ValidationError::new("length"));

        assert_eq!(field_messages(&errors).get("text").map(String::as_str), Some("length"));
    }
}
