//! rusty-explain - explain shell commands and assess their risk
//!
//! This library provides the core functionality for rusty-explain, including:
//! - Tokenizing and structurally parsing command lines
//! - A weighted risk model and an independent danger-pattern matcher
//! - Offline explanations from a built-in command reference
//! - AI explanations through an OpenAI-compatible API
//! - Clipboard capture and terminal rendering
//!
//! # Example
//!
//! ```
//! use rusty_explain::i18n::Language;
//! use rusty_explain::parser::CommandParser;
//! use rusty_explain::risk::{RiskAssessor, RiskLevel};
//!
//! let parsed = CommandParser::new().parse("rm -rf /tmp/test");
//! let assessment = RiskAssessor::new(Language::En).assess(&parsed);
//!
//! assert_eq!(parsed.command, "rm");
//! assert_eq!(assessment.level, RiskLevel::Medium);
//! ```

pub mod ai;
pub mod app;
pub mod capture;
pub mod config;
pub mod explainer;
pub mod i18n;
pub mod parser;
pub mod risk;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::App;
pub use config::Config;
pub use explainer::{CommandExplainer, CommandExplanation};
pub use i18n::Language;
pub use parser::{CommandParser, ParsedCommand, PatternMatchResult, PatternMatcher};
pub use risk::{RiskAssessment, RiskAssessor, RiskLevel};
