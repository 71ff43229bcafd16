//! Session archive adapters

mod json_archive;

pub use json_archive::JsonFileArchive;
