//! Prompt Builder — samples one `GenerationRequest` from the static catalogs
//! and renders the drafting instruction.
//!
//! Every field is drawn uniformly and independently, except that the subtheme
//! and starter come from the chosen theme and the example from the chosen
//! perspective. Sampling takes the RNG by reference so tests can seed it.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::generation::catalog::{examples_for, MODIFIERS, PERSPECTIVES, THEMES};
use crate::generation::prompts::QUESTION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{LANGUAGE_RULES, PLAIN_TEXT_ONLY};

/// Inclusive range the per-request word limit is drawn from.
pub const WORD_LIMIT_RANGE: RangeInclusive<usize> = 10..=15;

/// One sampled set of prompt parameters. Immutable once sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub theme: &'static str,
    pub subtheme: &'static str,
    pub perspective: &'static str,
    pub starter: &'static str,
    pub modifier: &'static str,
    pub word_limit: usize,
    pub example: &'static str,
}

/// The metadata echoed back to the client alongside a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionMetadata {
    pub theme: &'static str,
    pub subtheme: &'static str,
    pub perspective: &'static str,
    pub modifier: &'static str,
}

impl GenerationRequest {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let theme = pick(THEMES, rng);
        let perspective = *pick(PERSPECTIVES, rng);

        Self {
            theme: theme.name,
            subtheme: *pick(theme.subthemes, rng),
            perspective,
            starter: *pick(theme.starters, rng),
            modifier: *pick(MODIFIERS, rng),
            word_limit: rng.gen_range(WORD_LIMIT_RANGE),
            example: *pick(examples_for(perspective), rng),
        }
    }

    /// Renders the drafting instruction sent to the completion API.
    pub fn render_prompt(&self) -> String {
        QUESTION_PROMPT_TEMPLATE
            .replace("{theme}", self.theme)
            .replace("{subtheme}", self.subtheme)
            .replace("{perspective}", self.perspective)
            .replace("{starter}", self.starter)
            .replace("{modifier}", self.modifier)
            .replace("{word_limit}", &self.word_limit.to_string())
            .replace("{language_rules}", LANGUAGE_RULES)
            .replace("{example}", self.example)
            .replace("{plain_text_only}", PLAIN_TEXT_ONLY)
    }

    pub fn metadata(&self) -> QuestionMetadata {
        QuestionMetadata {
            theme: self.theme,
            subtheme: self.subtheme,
            perspective: self.perspective,
            modifier: self.modifier,
        }
    }
}

/// A question taken straight from the curated examples, used when the
/// completion API is unreachable and the fallback is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackQuestion {
    pub question: &'static str,
    pub request: GenerationRequest,
}

/// Samples a fresh request and serves its example question verbatim.
pub fn fallback_question<R: Rng + ?Sized>(rng: &mut R) -> FallbackQuestion {
    let request = GenerationRequest::sample(rng);
    FallbackQuestion {
        question: request.example,
        request,
    }
}

/// Samples with the thread-local RNG. The RNG never outlives this call, so
/// callers can hold the result across `.await` points.
pub fn sample_request() -> GenerationRequest {
    GenerationRequest::sample(&mut rand::thread_rng())
}

pub fn sample_fallback() -> FallbackQuestion {
    fallback_question(&mut rand::thread_rng())
}

// Catalog tables are non-empty (checked by catalog tests).
fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_sampled_fields_are_consistent_with_catalogs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let request = GenerationRequest::sample(&mut rng);
            let entry = THEMES
                .iter()
                .find(|t| t.name == request.theme)
                .expect("theme comes from catalog");
            assert!(entry.subthemes.contains(&request.subtheme));
            assert!(entry.starters.contains(&request.starter));
            assert!(PERSPECTIVES.contains(&request.perspective));
            assert!(MODIFIERS.contains(&request.modifier));
            assert!(examples_for(request.perspective).contains(&request.example));
            assert!(WORD_LIMIT_RANGE.contains(&request.word_limit));
        }
    }

    #[test]
    fn test_sampling_covers_the_word_limit_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<usize> = (0..500)
            .map(|_| GenerationRequest::sample(&mut rng).word_limit)
            .collect();
        let expected: HashSet<usize> = WORD_LIMIT_RANGE.collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_same_seed_gives_same_request() {
        let a = GenerationRequest::sample(&mut StdRng::seed_from_u64(3));
        let b = GenerationRequest::sample(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_prompt_fills_every_placeholder() {
        let request = GenerationRequest::sample(&mut StdRng::seed_from_u64(11));
        let prompt = request.render_prompt();

        assert!(!prompt.contains('{'), "unfilled placeholder in: {prompt}");
        assert!(prompt.contains(request.theme));
        assert!(prompt.contains(request.subtheme));
        assert!(prompt.contains(request.perspective));
        assert!(prompt.contains(request.modifier));
        assert!(prompt.contains(request.example));
        assert!(prompt.contains(&format!("under {} words", request.word_limit)));
        assert!(prompt.ends_with(PLAIN_TEXT_ONLY));
    }

    #[test]
    fn test_metadata_mirrors_request() {
        let request = GenerationRequest::sample(&mut StdRng::seed_from_u64(5));
        let metadata = request.metadata();
        assert_eq!(metadata.theme, request.theme);
        assert_eq!(metadata.subtheme, request.subtheme);
        assert_eq!(metadata.perspective, request.perspective);
        assert_eq!(metadata.modifier, request.modifier);
    }

    #[test]
    fn test_fallback_serves_a_curated_example() {
        let mut rng = StdRng::seed_from_u64(9);
        let fallback = fallback_question(&mut rng);
        assert!(examples_for(fallback.request.perspective).contains(&fallback.question));
    }
}
