//! Rendering of sessions for the terminal and for export

pub mod console;
pub mod export;
