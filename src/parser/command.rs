//! Command line parsing into a structured [`ParsedCommand`].
//!
//! Parsing never fails: empty input, unbalanced quotes and unknown programs
//! all produce a well-formed (possibly empty) result.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::tokenizer::tokenize;

/// Command type reported when no entry of the type table matches.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Tokens that are treated as shell operators rather than words.
const OPERATORS: &[&str] = &["|", ">", ">>", "<", "&&", "||", ";"];

/// Shell builtins and core text utilities.
const SHELL_COMMANDS: &[&str] = &[
    "ls", "cd", "pwd", "clear", "exit", "history", "echo", "cat", "grep", "find", "sed", "awk",
    "sort", "uniq", "wc", "head", "tail",
];

/// Ordered command type table. First match wins, so a name must come before
/// any shorter name that is a prefix of it (`apt-get` before `apt`).
const COMMAND_TYPE_PATTERNS: &[(&str, &str)] = &[
    ("git", r"^\s*git\s"),
    ("npm", r"^\s*npm\s"),
    ("yarn", r"^\s*yarn\s"),
    ("pnpm", r"^\s*pnpm\s"),
    ("pip3", r"^\s*pip3\s+"),
    ("pip", r"^\s*pip\s+"),
    ("python3", r"^\s*python3\s+"),
    ("python", r"^\s*python\s+"),
    ("node", r"^\s*node\s"),
    ("docker-compose", r"^\s*docker-compose\s|^\s*docker\s+compose\s"),
    ("docker", r"^\s*docker\s"),
    ("kubectl", r"^\s*kubectl\s"),
    ("cargo", r"^\s*cargo\s"),
    ("go", r"^\s*go\s"),
    ("make", r"^\s*make\s"),
    ("cmake", r"^\s*cmake\s"),
    ("apt-get", r"^\s*apt-get\s"),
    ("apt", r"^\s*apt\s"),
    ("yum", r"^\s*yum\s"),
    ("dnf", r"^\s*dnf\s"),
    ("curl", r"^\s*curl\s"),
    ("wget", r"^\s*wget\s"),
    ("tar", r"^\s*tar\s"),
    ("zip", r"^\s*zip\s"),
    ("unzip", r"^\s*unzip\s"),
    ("chmod", r"^\s*chmod\s"),
    ("chown", r"^\s*chown\s"),
    ("ls", r"^\s*ls\s+|^ls$"),
    ("cd", r"^\s*cd\s+|^cd$"),
    ("cp", r"^\s*cp\s"),
    ("mv", r"^\s*mv\s"),
    ("rmdir", r"^\s*rmdir\s"),
    ("rm", r"^\s*rm\s"),
    ("mkdir", r"^\s*mkdir\s"),
    ("cat", r"^\s*cat\s"),
    ("grep", r"^\s*grep\s"),
    ("find", r"^\s*find\s"),
    ("sed", r"^\s*sed\s"),
    ("awk", r"^\s*awk\s"),
    ("touch", r"^\s*touch\s"),
    ("ln", r"^\s*ln\s"),
    ("sudo", r"^\s*sudo\s"),
];

static COMMAND_TYPES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    COMMAND_TYPE_PATTERNS
        .iter()
        .filter_map(|&(name, pattern)| match Regex::new(pattern) {
            Ok(re) => Some((name, re)),
            Err(e) => {
                tracing::error!(name, pattern, "invalid command type pattern: {}", e);
                None
            }
        })
        .collect()
});

/// How a single word of the command line was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Starts with `-` or `--`.
    Option,
    /// One of `| > >> < && || ;`.
    Operator,
    /// Anything else: program name, subcommand, path, value.
    Argument,
}

/// One word of the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandToken {
    pub value: String,
    pub kind: TokenKind,
    pub raw: String,
}

impl CommandToken {
    pub fn new(value: impl Into<String>, kind: TokenKind, raw: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind,
            raw: raw.into(),
        }
    }

    fn classify(word: String) -> Self {
        let kind = if word.starts_with('-') {
            TokenKind::Option
        } else if OPERATORS.contains(&word.as_str()) {
            TokenKind::Operator
        } else {
            TokenKind::Argument
        };
        Self {
            raw: word.clone(),
            value: word,
            kind,
        }
    }
}

/// Structured view of a command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    /// Trimmed input.
    pub original: String,
    /// Entry of the command type table, or `"unknown"`.
    pub command_type: String,
    /// Program name: the first non-option word. Empty when there is none.
    pub command: String,
    pub subcommand: Option<String>,
    /// Every option in input order, duplicates kept.
    pub options: Vec<String>,
    pub arguments: Vec<String>,
    pub tokens: Vec<CommandToken>,
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self {
            original: String::new(),
            command_type: UNKNOWN_TYPE.to_string(),
            command: String::new(),
            subcommand: None,
            options: Vec::new(),
            arguments: Vec::new(),
            tokens: Vec::new(),
        }
    }
}

impl ParsedCommand {
    /// Program name followed by the subcommand, if any.
    pub fn full_command(&self) -> String {
        match &self.subcommand {
            Some(sub) => format!("{} {}", self.command, sub),
            None => self.command.clone(),
        }
    }

    /// Check whether an option was given.
    ///
    /// Matches `opt` itself or `opt` without its leading dashes. A single
    /// letter short flag such as `-r` also matches a clustered short option
    /// like `-rf`.
    pub fn has_option(&self, opt: &str) -> bool {
        let bare = opt.trim_start_matches('-');
        let short_flag = short_flag_letter(opt);

        self.options.iter().any(|o| {
            if o == opt || o == bare {
                return true;
            }
            match (short_flag, o.strip_prefix('-')) {
                (Some(letter), Some(cluster)) if !cluster.starts_with('-') => {
                    cluster.contains(letter)
                }
                _ => false,
            }
        })
    }

    /// True if any of `opts` was given, see [`ParsedCommand::has_option`].
    pub fn has_any_option(&self, opts: &[&str]) -> bool {
        opts.iter().any(|opt| self.has_option(opt))
    }

    pub fn argument_at(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// `Some('r')` for `-r`, `None` for long options and anything longer.
fn short_flag_letter(opt: &str) -> Option<char> {
    let rest = opt.strip_prefix('-')?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter != '-' => Some(letter),
        _ => None,
    }
}

/// Options and arguments of a command, without the token list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedArgs {
    pub command: String,
    pub subcommand: Option<String>,
    pub options: Vec<String>,
    pub arguments: Vec<String>,
}

/// Stateless command line parser. All tables are process-wide statics, so
/// a parser is free to construct and safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    /// Names of every entry in the command type table, in match order.
    pub fn known_types() -> impl Iterator<Item = &'static str> {
        COMMAND_TYPE_PATTERNS.iter().map(|&(name, _)| name)
    }

    pub fn parse(&self, input: &str) -> ParsedCommand {
        let original = input.trim();
        let mut parsed = ParsedCommand {
            original: original.to_string(),
            ..ParsedCommand::default()
        };

        if original.is_empty() {
            return parsed;
        }

        parsed.command_type = self.identify_type(original).to_string();

        for word in tokenize(original) {
            let token = CommandToken::classify(word);
            if token.kind == TokenKind::Option {
                parsed.options.push(token.value.clone());
            }
            parsed.tokens.push(token);
        }

        extract_command_and_subcommand(&mut parsed);

        tracing::trace!(
            command = %parsed.command,
            command_type = %parsed.command_type,
            subcommand = ?parsed.subcommand,
            "parsed command"
        );
        parsed
    }

    /// Classify a command line by matching its start against the type table.
    ///
    /// A leading `sudo ` is looked through, so `sudo git push` is `git`.
    pub fn identify_type(&self, command: &str) -> &'static str {
        let mut command = command.trim();
        while let Some(rest) = command.strip_prefix("sudo ") {
            command = rest.trim();
        }

        COMMAND_TYPES
            .iter()
            .find(|(_, re)| re.is_match(command))
            .map(|&(name, _)| name)
            .unwrap_or(UNKNOWN_TYPE)
    }

    pub fn extract_args(&self, command: &str) -> ExtractedArgs {
        let parsed = self.parse(command);
        ExtractedArgs {
            command: parsed.command,
            subcommand: parsed.subcommand,
            options: parsed.options,
            arguments: parsed.arguments,
        }
    }

    /// True if the command classifies as a shell builtin or core text utility.
    pub fn is_shell_command(&self, command: &str) -> bool {
        SHELL_COMMANDS.contains(&self.identify_type(command))
    }
}

/// Fill `command`, `subcommand` and `arguments` from the argument tokens.
///
/// Words that precede the subcommand (paths, repeats of the program name)
/// are dropped once a subcommand is found: `ls /tmp foo` keeps only `foo`.
/// When no subcommand exists, every word after the program name is kept.
fn extract_command_and_subcommand(parsed: &mut ParsedCommand) {
    let mut words = parsed
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Argument)
        .map(|t| t.value.as_str());

    let Some(command) = words.next() else {
        return;
    };

    let mut subcommand: Option<&str> = None;
    let mut pending = Vec::new();
    let mut arguments = Vec::new();

    for word in words {
        if subcommand.is_some() {
            arguments.push(word.to_string());
        } else if is_subcommand_candidate(word, command) {
            subcommand = Some(word);
            arguments.push(word.to_string());
        } else {
            pending.push(word.to_string());
        }
    }

    match subcommand {
        Some(sub) => {
            if !pending.is_empty() {
                tracing::trace!(dropped = ?pending, "words before subcommand discarded");
            }
            parsed.subcommand = Some(sub.to_string());
            parsed.arguments = arguments;
        }
        None => parsed.arguments = pending,
    }
    parsed.command = command.to_string();
}

fn is_subcommand_candidate(word: &str, command: &str) -> bool {
    !word.is_empty() && word != command && !word.starts_with('/') && !word.starts_with('-')
}
