//! Context window optimization: keep the newest messages that fit a budget.

use crate::context::context_budget::ContextBudget;
use crate::discussion::message::Message;

/// Coarse token estimate: one token per four characters, rounded up.
///
/// Language-agnostic and tokenizer-free. It over- or under-counts real
/// tokens depending on script, which is acceptable for budgeting.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Summed estimate for a run of messages
pub fn estimated_size(messages: &[Message]) -> usize {
    messages.iter().map(|m| estimate_tokens(m.content())).sum()
}

/// Longest suffix of `transcript` whose estimated size fits `budget`.
///
/// Walks newest to oldest and stops at the first message that would overflow;
/// older messages are dropped whole, never partially truncated. The result
/// keeps the original order.
pub fn trim(transcript: &[Message], budget: ContextBudget) -> &[Message] {
    let mut used = 0usize;
    let mut start = transcript.len();

    for (idx, message) in transcript.iter().enumerate().rev() {
        let cost = estimate_tokens(message.content());
        match used.checked_add(cost) {
            Some(total) if total <= budget.max_tokens() => {
                used = total;
                start = idx;
            }
            _ => break,
        }
    }

    &transcript[start..]
}
