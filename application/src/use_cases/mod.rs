//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod auto_play;
pub mod cast_experts;
pub mod orchestrator;
pub mod recovery;

#[cfg(test)]
pub(crate) mod test_support;
