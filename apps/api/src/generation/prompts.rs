// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Drafting prompt template.
/// Replace: {theme}, {subtheme}, {perspective}, {starter}, {modifier},
///          {word_limit}, {language_rules}, {example}, {plain_text_only}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate a single, natural conversation starter about {theme} (specifically {subtheme}) from the perspective of {perspective}. The tone should feel {modifier}. The question should:

MUST FOLLOW:
- Sound like something a friend would naturally ask
- Be simple and clear (under {word_limit} words)
- Ask about ONE specific thing
- Open with or be shaped by the phrase "{starter}"
{language_rules}
- Be easy to understand immediately
- Encourage sharing a story or experience

AVOID:
- Abstract or philosophical questions
- Anything that sounds therapeutic or clinical
- Complex emotional terms
- Multiple questions or compound questions

Here's an example of a good, natural question:
{example}

{plain_text_only}"#;

/// Judge prompt template. Replace: {draft}, {word_limit}, {language_rules}
///
/// The reply format is load-bearing: `RubricVerdictParser` keys on a leading
/// "valid" token and on a "Refined version:" line.
pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"You are reviewing a conversation starter before it is shown to someone.

Question: "{draft}"

Check it against these rules:
- Exactly one question, about ONE specific thing
- Under {word_limit} words
{language_rules}
- Sounds like a friend asking, not a therapist or an interviewer
- Invites a story or experience, not a yes/no answer

If the question meets every rule, reply with the single word: valid

Otherwise reply with "invalid." followed by a corrected question on its own line in exactly this format:
Refined version: <the corrected question>

Do not add any other commentary."#;
