//! Command line entry point for rusty-explain.
//!
//! Loads configuration, sets up file logging and dispatches to one of the
//! run modes: explain a single command, interactive prompt, or clipboard
//! polling.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use rusty_explain::app::App;
use rusty_explain::config::Config;
use rusty_explain::i18n::Language;
use rusty_explain::utils::logger;

#[derive(Parser, Debug)]
#[command(name = "rusty-explain")]
#[command(version, about = "Explain shell commands and assess how risky they are")]
struct Cli {
    /// Command to explain. Without one, interactive mode starts.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Explain commands copied to the clipboard
    #[arg(long)]
    clipboard: bool,

    /// Read commands from a prompt
    #[arg(short, long)]
    interactive: bool,

    /// Write debug logs
    #[arg(short, long)]
    verbose: bool,

    /// Output language (zh or en), overrides the config file
    #[arg(short, long)]
    lang: Option<String>,

    /// Never call the AI service; use the built-in command reference
    #[arg(long)]
    offline: bool,

    /// Print the offline analysis of COMMAND as JSON
    #[arg(long, requires = "command")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init_logging(if cli.verbose {
        logger::VERBOSE_LEVEL
    } else {
        logger::DEFAULT_LEVEL
    });

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(lang) = cli.lang.as_deref() {
        config.display.language = Language::from_tag(lang);
    }

    let app = App::new(&config, cli.offline);
    let command = cli.command.join(" ");

    if cli.json {
        println!("{}", app.analysis_json(&command)?);
        return Ok(());
    }

    app.announce_mode()?;

    if cli.clipboard {
        app.run_clipboard().await
    } else if cli.interactive || command.trim().is_empty() {
        app.run_interactive().await
    } else {
        app.explain_command(&command).await
    }
}
