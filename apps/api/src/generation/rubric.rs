//! Local rubric check run on every question before it leaves the server.
//!
//! The judge's "valid" is not trusted alone: pronoun rules are re-checked
//! mechanically. The word limit stays advisory because the model only
//! approximates it; overshoots are reported, not rejected.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words a question may run over its sampled limit before it is flagged.
pub const WORD_LIMIT_TOLERANCE: usize = 3;

// "I" is case-sensitive; the rest ignore case.
static RE_FIRST_PERSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(I|(?i:me|my|mine|myself|we|us|our|ours|ourselves))\b").expect("valid regex")
});
static RE_SECOND_PERSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(you|your|yours|yourself|yourselves)\b").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubricReport {
    pub first_person: Vec<String>,
    pub has_second_person: bool,
    pub word_count: usize,
    pub within_word_limit: bool,
}

impl RubricReport {
    /// Hard rules only. Word count is advisory.
    pub fn passed(&self) -> bool {
        self.first_person.is_empty() && self.has_second_person
    }

    /// One-line reason for a failed check, for logs and error messages.
    pub fn describe_failure(&self) -> String {
        let mut reasons = Vec::new();
        if !self.first_person.is_empty() {
            reasons.push(format!(
                "uses first-person pronouns ({})",
                self.first_person.join(", ")
            ));
        }
        if !self.has_second_person {
            reasons.push("does not address the reader as 'you'".to_string());
        }
        reasons.join("; ")
    }
}

pub fn check_rubric(question: &str, word_limit: usize) -> RubricReport {
    let word_count = question.split_whitespace().count();

    RubricReport {
        first_person: RE_FIRST_PERSON
            .find_iter(question)
            .map(|m| m.as_str())
            .filter(|word| !is_acronym(word))
            .map(str::to_string)
            .collect(),
        has_second_person: RE_SECOND_PERSON.is_match(question),
        word_count,
        within_word_limit: word_count <= word_limit + WORD_LIMIT_TOLERANCE,
    }
}

/// "US", "ME" and the like name places, not the speaker.
fn is_acronym(word: &str) -> bool {
    word.len() > 1 && word.chars().all(|c| c.is_ascii_uppercase())
}
