//! Prompt assembly: instruction + knowledge excerpt + retrieved passages
//! + question, with per-field character limits.

use konsult_core::types::{Passage, PromptPayload};

/// Per-field truncation limits, in characters. These bound what is sent to
/// the completion provider regardless of knowledge base size.
#[derive(Debug, Clone, Copy)]
pub struct PromptLimits {
    pub instruction_max: usize,
    pub knowledge_max: usize,
    pub context_max: usize,
}

/// Truncate to at most `max` characters at a char boundary.
/// Safe for Cyrillic/CJK multi-byte text.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

/// Build the completion payload, or `None` when there is no grounding at
/// all (nothing retrieved and no fallback excerpt) — the caller then
/// short-circuits with the refusal reply and never pays for a completion
/// the product would have to disown anyway.
pub fn assemble(
    instruction: &str,
    knowledge_excerpt: &str,
    retrieved: &[Passage],
    question: &str,
    limits: PromptLimits,
) -> Option<PromptPayload> {
    if retrieved.is_empty() && knowledge_excerpt.is_empty() {
        return None;
    }

    // Join in ranked order first, then truncate the joined result.
    let joined: String = retrieved
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let retrieved_block = truncate_chars(&joined, limits.context_max);
    let excerpt = truncate_chars(knowledge_excerpt, limits.knowledge_max);

    let context_text = match (excerpt.is_empty(), retrieved_block.is_empty()) {
        (false, false) => format!("{excerpt}\n{retrieved_block}"),
        (true, _) => retrieved_block.to_string(),
        (_, true) => excerpt.to_string(),
    };

    Some(PromptPayload {
        system_instruction: truncate_chars(instruction, limits.instruction_max).to_string(),
        context_text,
        user_question: question.to_string(),
    })
}
