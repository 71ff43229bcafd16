//! Prompt domain
//!
//! Templates for the facilitator, the experts, and the casting step.

mod template;

pub use template::PromptTemplate;
