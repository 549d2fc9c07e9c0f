// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Appended to every prompt whose reply is shown to the user verbatim.
pub const PLAIN_TEXT_ONLY: &str = "Only respond with the question itself. No additional text.";

/// Language rules shared by the drafting and judging prompts.
pub const LANGUAGE_RULES: &str = "\
- Use correct grammar
- Use British English spelling rules
- Address the reader in the second person (you, your)
- Never use first-person pronouns (I, me, my, we, us, our)";
