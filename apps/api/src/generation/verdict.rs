//! Verdict parsing — turns the judge model's free-text reply into a verdict.
//!
//! The judge is asked for either the bare word "valid" or "invalid." plus a
//! `Refined version: ...` line. Nothing enforces that format on the model side,
//! so parsing sits behind `VerdictParser` and can be swapped or tested alone.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_VALID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^[\s"'*`]*valid\b"#).expect("valid regex"));
static RE_REFINED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)refined version:[ \t]*\r?\n?(.+)$").expect("valid regex"));

const QUOTE_CHARS: &[char] = &['"', '\'', '`', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// The draft passed the rubric as-is.
    Valid,
    /// The draft failed; the judge supplied a replacement.
    Invalid(String),
    /// Neither an acceptance nor a usable replacement.
    Unusable,
}

pub trait VerdictParser: Send + Sync {
    fn parse(&self, reply: &str) -> ValidationVerdict;
}

/// Default parser: accepts on a leading "valid" token (case-insensitive, whole
/// word, so "invalid" and "validated" do not count), otherwise looks for a
/// `Refined version:` line.
pub struct RubricVerdictParser;

impl VerdictParser for RubricVerdictParser {
    fn parse(&self, reply: &str) -> ValidationVerdict {
        if RE_VALID.is_match(reply) {
            return ValidationVerdict::Valid;
        }

        match extract_refined(reply) {
            Some(refined) => ValidationVerdict::Invalid(refined),
            None => ValidationVerdict::Unusable,
        }
    }
}

/// Returns the payload of the first `Refined version:` line, trimmed.
pub fn extract_refined(reply: &str) -> Option<String> {
    RE_REFINED
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|payload| !payload.is_empty())
        .map(str::to_string)
}

/// Removes surrounding whitespace and quote characters (ASCII and typographic).
pub fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(QUOTE_CHARS).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(reply: &str) -> ValidationVerdict {
        RubricVerdictParser.parse(reply)
    }

    #[test]
    fn test_leading_valid_accepts_regardless_of_trailing_content() {
        assert_eq!(parse("valid"), ValidationVerdict::Valid);
        assert_eq!(parse("VALID"), ValidationVerdict::Valid);
        assert_eq!(
            parse("Valid. Nice question, though it could be shorter."),
            ValidationVerdict::Valid
        );
        assert_eq!(parse("  \"valid\"\n"), ValidationVerdict::Valid);
        assert_eq!(parse("**Valid**"), ValidationVerdict::Valid);
    }

    #[test]
    fn test_invalid_is_not_mistaken_for_valid() {
        assert_eq!(parse("invalid"), ValidationVerdict::Unusable);
        assert_eq!(parse("validated by the rubric"), ValidationVerdict::Unusable);
        assert_eq!(parse("The question is valid"), ValidationVerdict::Unusable);
    }

    #[test]
    fn test_refined_version_is_extracted_verbatim_minus_whitespace() {
        assert_eq!(
            parse("invalid. Refined version: What taught you the most about trust?"),
            ValidationVerdict::Invalid("What taught you the most about trust?".to_string())
        );
        assert_eq!(
            parse("invalid.\nrefined VERSION:    Who made you feel at home?   \nThanks"),
            ValidationVerdict::Invalid("Who made you feel at home?".to_string())
        );
    }

    #[test]
    fn test_refined_payload_on_next_line() {
        assert_eq!(
            parse("invalid.\nRefined version:\nWhat made you smile today?"),
            ValidationVerdict::Invalid("What made you smile today?".to_string())
        );
        assert_eq!(
            parse("invalid.\r\nRefined version:\r\nWhat made you smile today?\r\n"),
            ValidationVerdict::Invalid("What made you smile today?".to_string())
        );
    }

    #[test]
    fn test_empty_refined_payload_is_unusable() {
        assert_eq!(parse("invalid. Refined version:   "), ValidationVerdict::Unusable);
        assert_eq!(parse("I cannot judge this."), ValidationVerdict::Unusable);
        assert_eq!(parse(""), ValidationVerdict::Unusable);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"What made you laugh?\""), "What made you laugh?");
        assert_eq!(strip_quotes("  \u{201C}Where next?\u{201D} "), "Where next?");
        assert_eq!(strip_quotes("'Who taught you to cook?'"), "Who taught you to cook?");
        assert_eq!(strip_quotes("What's new with you?"), "What's new with you?");
    }
}
