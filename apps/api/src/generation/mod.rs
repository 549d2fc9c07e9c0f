// Question Generation Engine
// Implements: catalog sampling, prompt rendering, draft → judge → refine orchestration.
// All LLM calls go through llm_client — no direct Groq calls here.

pub mod catalog;
pub mod generator;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
pub mod rubric;
pub mod verdict;
