//! Discussion subdomain: who talks, what was said, and where the session stands.
//!
//! - [`speaker::Speaker`]: participants and the round-robin transition function
//! - [`message::Message`]: append-only transcript entries
//! - [`session::SessionState`]: lifecycle state machine and transcript owner
//! - [`whisper::find_pending`]: which human interjection to act on
//! - [`conclusion::detect_conclusion`]: end-of-discussion marker handling

pub mod archive;
pub mod conclusion;
pub mod language;
pub mod message;
pub mod persona;
pub mod session;
pub mod speaker;
pub mod whisper;
