//! Quiz session logic for the capitals service.

pub mod quiz;

pub use quiz::{AnswerCheck, GameError, Location, NextQuestion, Quiz};
