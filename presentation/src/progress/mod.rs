//! Progress reporting while a model is answering

pub mod reporter;
