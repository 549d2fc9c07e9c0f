//! Question Generation — orchestrates draft → judge → refine.
//!
//! Flow: Drafting (sample request → completion under deadline, fixed backoff
//!       between attempts) → Validating (judge reply → accept, or swap in the
//!       refined draft and judge again) → Accepted | Failed.
//!
//! A judge-approved question that fails the local rubric goes back to
//! Drafting while drafting attempts remain.
//!
//! Every transition is decided by one of the guard functions below so the
//! budget and backoff rules can be tested without a network.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generation::prompt_builder::{
    sample_fallback, sample_request, GenerationRequest, QuestionMetadata,
};
use crate::generation::prompts::VALIDATION_PROMPT_TEMPLATE;
use crate::generation::rubric::check_rubric;
use crate::generation::verdict::{strip_quotes, ValidationVerdict, VerdictParser};
use crate::llm_client::prompts::LANGUAGE_RULES;
use crate::llm_client::{CompletionClient, LlmError};

/// Drafting calls per request, first attempt included.
pub const MAX_DRAFT_ATTEMPTS: u32 = 3;
/// Judge calls per request, refinements and failed calls included.
pub const MAX_VALIDATION_ATTEMPTS: u32 = 3;
/// Fixed wait after a failed drafting call. Does not grow.
pub const DRAFT_BACKOFF: Duration = Duration::from_secs(1);
/// Fixed wait after a failed judge call.
pub const VALIDATION_BACKOFF: Duration = Duration::from_secs(1);
/// Deadline each completion call is raced against.
pub const CALL_DEADLINE: Duration = Duration::from_secs(8);

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// Drafted by the model and accepted by the judge.
    Model,
    /// Curated example served after every drafting attempt failed.
    Fallback,
}

/// A question ready to return to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuestion {
    pub question: String,
    pub metadata: QuestionMetadata,
    pub source: QuestionSource,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credential or request-shape problem. Retrying cannot help.
    #[error("completion client rejected the call: {0}")]
    Fatal(LlmError),

    #[error("drafting failed after {attempts} attempts: {last_error}")]
    DraftingExhausted { attempts: u32, last_error: String },

    #[error("validation failed after {attempts} attempts: {reason}")]
    ValidationExhausted { attempts: u32, reason: String },

    #[error("question failed the rubric: {0}")]
    RubricViolation(String),
}

impl GenerationError {
    /// Stable code surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Fatal(LlmError::Config) => "CONFIG_ERROR",
            _ => "GENERATION_FAILED",
        }
    }
}

#[derive(Debug)]
enum GenerationState {
    Drafting {
        attempt: u32,
        last_error: Option<LlmError>,
    },
    Validating {
        request: GenerationRequest,
        draft: String,
        attempt: u32,
        /// Drafting attempt that produced this draft.
        draft_attempt: u32,
    },
    Accepted(GeneratedQuestion),
    Failed(GenerationError),
}

// ────────────────────────────────────────────────────────────────────────────
// Transition guards
// ────────────────────────────────────────────────────────────────────────────

fn can_draft(attempt: u32) -> bool {
    attempt < MAX_DRAFT_ATTEMPTS
}

fn can_validate(attempt: u32) -> bool {
    attempt < MAX_VALIDATION_ATTEMPTS
}

/// Delay to wait before `next_attempt`, or `None` when the budget is spent
/// and the state machine is about to leave the phase anyway.
fn backoff_before(next_attempt: u32, budget: u32, delay: Duration) -> Option<Duration> {
    (next_attempt > 0 && next_attempt < budget).then_some(delay)
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Owns the completion client and verdict parser; shared across requests.
pub struct QuestionGenerator {
    client: Arc<dyn CompletionClient>,
    parser: Arc<dyn VerdictParser>,
    fallback_enabled: bool,
}

impl QuestionGenerator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        parser: Arc<dyn VerdictParser>,
        fallback_enabled: bool,
    ) -> Self {
        Self {
            client,
            parser,
            fallback_enabled,
        }
    }

    /// Runs the state machine to completion for one request.
    pub async fn generate(&self) -> Result<GeneratedQuestion, GenerationError> {
        let mut state = GenerationState::Drafting {
            attempt: 0,
            last_error: None,
        };

        loop {
            state = match state {
                GenerationState::Drafting {
                    attempt,
                    last_error,
                } => self.draft(attempt, last_error).await,
                GenerationState::Validating {
                    request,
                    draft,
                    attempt,
                    draft_attempt,
                } => self.validate(request, draft, attempt, draft_attempt).await,
                GenerationState::Accepted(question) => return Ok(question),
                GenerationState::Failed(error) => return Err(error),
            };
        }
    }

    async fn draft(&self, attempt: u32, last_error: Option<LlmError>) -> GenerationState {
        if !can_draft(attempt) {
            return self.drafting_exhausted(attempt, last_error);
        }

        let request = sample_request();
        debug!(
            "Drafting attempt {}/{}: theme={}, subtheme={}, perspective={}, modifier={}",
            attempt + 1,
            MAX_DRAFT_ATTEMPTS,
            request.theme,
            request.subtheme,
            request.perspective,
            request.modifier
        );

        match self.complete_with_deadline(&request.render_prompt()).await {
            Ok(draft) => {
                info!("Draft obtained on attempt {}", attempt + 1);
                GenerationState::Validating {
                    request,
                    draft,
                    attempt: 0,
                    draft_attempt: attempt,
                }
            }
            Err(e) if !e.is_retryable() => GenerationState::Failed(GenerationError::Fatal(e)),
            Err(e) => {
                warn!(
                    "Drafting attempt {}/{} failed: {}",
                    attempt + 1,
                    MAX_DRAFT_ATTEMPTS,
                    e
                );
                if let Some(delay) = backoff_before(attempt + 1, MAX_DRAFT_ATTEMPTS, DRAFT_BACKOFF)
                {
                    tokio::time::sleep(delay).await;
                }
                GenerationState::Drafting {
                    attempt: attempt + 1,
                    last_error: Some(e),
                }
            }
        }
    }

    fn drafting_exhausted(&self, attempts: u32, last_error: Option<LlmError>) -> GenerationState {
        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt was made".to_string());

        if !self.fallback_enabled {
            return GenerationState::Failed(GenerationError::DraftingExhausted {
                attempts,
                last_error,
            });
        }

        warn!("All {attempts} drafting attempts failed ({last_error}), serving local fallback");
        let fallback = sample_fallback();
        let report = check_rubric(fallback.question, fallback.request.word_limit);
        if !report.passed() {
            return GenerationState::Failed(GenerationError::RubricViolation(
                report.describe_failure(),
            ));
        }

        GenerationState::Accepted(GeneratedQuestion {
            question: fallback.question.to_string(),
            metadata: fallback.request.metadata(),
            source: QuestionSource::Fallback,
        })
    }

    async fn validate(
        &self,
        request: GenerationRequest,
        draft: String,
        attempt: u32,
        draft_attempt: u32,
    ) -> GenerationState {
        if !can_validate(attempt) {
            return GenerationState::Failed(GenerationError::ValidationExhausted {
                attempts: attempt,
                reason: "judge never accepted a draft".to_string(),
            });
        }

        let prompt = render_validation_prompt(&draft, request.word_limit);

        let reply = match self.complete_with_deadline(&prompt).await {
            Ok(reply) => reply,
            Err(e) if !e.is_retryable() => {
                return GenerationState::Failed(GenerationError::Fatal(e));
            }
            Err(e) => {
                warn!(
                    "Judge call {}/{} failed: {}",
                    attempt + 1,
                    MAX_VALIDATION_ATTEMPTS,
                    e
                );
                if let Some(delay) =
                    backoff_before(attempt + 1, MAX_VALIDATION_ATTEMPTS, VALIDATION_BACKOFF)
                {
                    tokio::time::sleep(delay).await;
                }
                return GenerationState::Validating {
                    request,
                    draft,
                    attempt: attempt + 1,
                    draft_attempt,
                };
            }
        };

        match self.parser.parse(&reply) {
            ValidationVerdict::Valid => accept(request, &draft, draft_attempt),
            ValidationVerdict::Invalid(refined) => {
                info!(
                    "Judge refined draft on attempt {}/{}",
                    attempt + 1,
                    MAX_VALIDATION_ATTEMPTS
                );
                GenerationState::Validating {
                    request,
                    draft: refined,
                    attempt: attempt + 1,
                    draft_attempt,
                }
            }
            ValidationVerdict::Unusable => {
                warn!(
                    "Judge reply had no verdict: {:?}",
                    reply.chars().take(80).collect::<String>()
                );
                GenerationState::Failed(GenerationError::ValidationExhausted {
                    attempts: attempt + 1,
                    reason: "judge reply carried neither a verdict nor a refined version"
                        .to_string(),
                })
            }
        }
    }

    async fn complete_with_deadline(&self, prompt: &str) -> Result<String, LlmError> {
        tokio::time::timeout(CALL_DEADLINE, self.client.complete(prompt))
            .await
            .map_err(|_| LlmError::Timeout(CALL_DEADLINE))?
    }
}

fn accept(request: GenerationRequest, draft: &str, draft_attempt: u32) -> GenerationState {
    let question = strip_quotes(draft);
    if question.is_empty() {
        return GenerationState::Failed(GenerationError::RubricViolation(
            "question is empty".to_string(),
        ));
    }

    let report = check_rubric(question, request.word_limit);
    if !report.passed() {
        let reason = report.describe_failure();
        if can_draft(draft_attempt + 1) {
            warn!("Accepted draft failed local rubric ({reason}), drafting again");
            return GenerationState::Drafting {
                attempt: draft_attempt + 1,
                last_error: None,
            };
        }
        warn!("Accepted draft failed local rubric: {reason}");
        return GenerationState::Failed(GenerationError::RubricViolation(reason));
    }
    if !report.within_word_limit {
        warn!(
            "Accepted question runs {} words against a limit of {}",
            report.word_count, request.word_limit
        );
    }

    GenerationState::Accepted(GeneratedQuestion {
        question: question.to_string(),
        metadata: request.metadata(),
        source: QuestionSource::Model,
    })
}

fn render_validation_prompt(draft: &str, word_limit: usize) -> String {
    VALIDATION_PROMPT_TEMPLATE
        .replace("{draft}", strip_quotes(draft))
        .replace("{word_limit}", &word_limit.to_string())
        .replace("{language_rules}", LANGUAGE_RULES)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
