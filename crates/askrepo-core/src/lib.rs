//! Configuration and the question-answering engine.

pub mod answer;
pub mod config;
pub mod fallback;

pub use answer::AnswerEngine;
pub use config::Config;
