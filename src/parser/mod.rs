//! Command-line analysis: tokenizing, structural parsing and danger patterns.

pub mod command;
pub mod patterns;
pub mod tokenizer;

pub use command::{
    CommandParser, CommandToken, ExtractedArgs, ParsedCommand, TokenKind, UNKNOWN_TYPE,
};
pub use patterns::{CommandCategory, PatternMatchResult, PatternMatcher};
pub use tokenizer::tokenize;
