// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// Closing instruction for prompts whose response is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return ONLY the JSON object, no markdown code fences, no extra text.";
