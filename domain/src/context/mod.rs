//! Context assembly for model requests.
//!
//! - [`context_budget::ContextBudget`]: estimated-token budget per request
//! - [`window::trim`]: newest-first suffix that fits the budget
//! - [`formatter::format_transcript`]: model-visible transcript text

pub mod context_budget;
pub mod formatter;
pub mod window;

pub use context_budget::ContextBudget;
pub use formatter::format_transcript;
pub use window::{estimate_tokens, estimated_size, trim};
