//! User interface module for terminal output.

pub mod display;

pub use display::{ExplanationView, ResultDisplay};
