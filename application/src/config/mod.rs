//! Application-level configuration.
//!
//! - [`DiscussionParams`]: per-turn request shaping and autoplay pacing

pub mod discussion_params;

pub use discussion_params::DiscussionParams;
