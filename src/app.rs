//! Application state and run modes.
//!
//! [`App`] wires the parser, risk models and explainers together and drives
//! the three ways of using the tool: one command from the command line, an
//! interactive prompt, and clipboard polling.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::ai::{AiExplainer, ExplainContext};
use crate::capture::{CaptureOutcome, ClipboardCapturer, ClipboardSource};
use crate::config::Config;
use crate::explainer::{CommandExplainer, CommandExplanation};
use crate::i18n::Language;
use crate::parser::{CommandParser, ParsedCommand, PatternMatchResult, PatternMatcher};
use crate::risk::{RiskAssessment, RiskAssessor};
use crate::ui::{ExplanationView, ResultDisplay};

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];
const MIN_POLL_INTERVAL_MS: u64 = 100;
/// Characters of clipboard text echoed in notices.
const NOTICE_PREVIEW_CHARS: usize = 50;

/// Offline analysis of one command line.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub parsed: ParsedCommand,
    pub assessment: RiskAssessment,
    pub patterns: PatternMatchResult,
    pub explanation: CommandExplanation,
}

pub struct App {
    parser: CommandParser,
    assessor: RiskAssessor,
    matcher: PatternMatcher,
    explainer: CommandExplainer,
    ai: AiExplainer,
    display: ResultDisplay,
    poll_interval: Duration,
    /// Skip the AI service even when a key is configured.
    offline: bool,
}

impl App {
    pub fn new(config: &Config, offline: bool) -> Self {
        let language = config.display.language;
        Self {
            parser: CommandParser::new(),
            assessor: RiskAssessor::new(language),
            matcher: PatternMatcher::new(language),
            explainer: CommandExplainer::new(language),
            ai: AiExplainer::new(&config.ai, language),
            display: ResultDisplay::new(&config.display),
            poll_interval: Duration::from_millis(
                config.capture.poll_interval_ms.max(MIN_POLL_INTERVAL_MS),
            ),
            offline,
        }
    }

    fn language(&self) -> Language {
        self.display.language()
    }

    fn t<'a>(&self, zh: &'a str, en: &'a str) -> &'a str {
        self.language().pick(zh, en)
    }

    fn uses_ai(&self) -> bool {
        !self.offline && self.ai.is_available()
    }

    fn say(&self, text: &str) -> Result<()> {
        self.display.print(text).context("Failed to write to stdout")
    }

    /// Parse, assess, pattern-match and statically explain `command`.
    pub fn analyze(&self, command: &str) -> Analysis {
        let parsed = self.parser.parse(command);
        let assessment = self.assessor.assess(&parsed);
        let patterns = self.matcher.matches(command);
        let explanation = self.explainer.explain(&parsed, Some(&assessment));
        Analysis {
            parsed,
            assessment,
            patterns,
            explanation,
        }
    }

    pub fn analysis_json(&self, command: &str) -> Result<String> {
        serde_json::to_string_pretty(&self.analyze(command)).context("Failed to serialize analysis")
    }

    /// Full rendered report for `command`, using the AI service when it is
    /// reachable and the static explainer otherwise.
    pub async fn render_command(&self, command: &str) -> String {
        let analysis = self.analyze(command);
        let patterns = self.display.render_patterns(&analysis.patterns);

        let body = if self.uses_ai() {
            let ctx = ExplainContext::current()
                .with_command_type(analysis.parsed.command_type.clone())
                .with_risk_level(analysis.assessment.level);
            let explanation = self.ai.explain(command, &ctx).await;
            if explanation.is_fallback() {
                debug!(source = ?explanation.source, "AI explanation fell back");
            }
            self.display.render_explanation(
                command,
                ExplanationView::from(&explanation),
                Some(&analysis.assessment),
            )
        } else {
            self.display.render_explanation(
                command,
                ExplanationView::from(&analysis.explanation),
                Some(&analysis.assessment),
            )
        };

        if patterns.is_empty() {
            body
        } else {
            format!("{body}\n{patterns}\n")
        }
    }

    pub async fn explain_command(&self, command: &str) -> Result<()> {
        let command = command.trim();
        if command.is_empty() {
            return self.say(&self.display.render_error(self.t("命令为空", "Empty command")));
        }

        info!(command, "explaining command");
        if self.uses_ai() {
            self.say(&self.display.render_dim(self.t(
                "⏳ 正在调用 AI 解释命令...",
                "⏳ Asking the AI to explain the command...",
            )))?;
        }
        let report = self.render_command(command).await;
        self.say(&report)
    }

    /// Warn once at startup when no AI service can be used.
    pub fn announce_mode(&self) -> Result<()> {
        if self.offline {
            return self.say(&self.display.render_info(self.t(
                "离线模式：使用内置命令库解释",
                "Offline mode: using the built-in command reference",
            )));
        }
        if !self.ai.is_available() {
            return self.say(&self.display.render_warning(self.t(
                "⚠️  AI 服务不可用，请检查 API_KEY 配置。将使用内置命令库解释。",
                "⚠️  AI service unavailable, check the API_KEY setting. Falling back to the built-in command reference.",
            )));
        }
        Ok(())
    }

    /// Read commands from stdin until `quit`, `exit`, `q` or end of input.
    pub async fn run_interactive(&self) -> Result<()> {
        self.say(&format!(
            "{} - {}",
            self.display.render_title("rusty-explain"),
            self.t("交互模式", "interactive mode")
        ))?;
        self.say(self.t(
            "输入命令进行解释，输入 'quit' 或 'exit' 退出\n",
            "Type a command to explain it, 'quit' or 'exit' to leave\n",
        ))?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"$ ").await?;
            stdout.flush().await?;

            let line = tokio::select! {
                line = lines.next_line() => line.context("Failed to read from stdin")?,
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    self.say("")?;
                    self.say(&self.display.render_info(self.t(
                        "使用 'quit' 或 'exit' 退出",
                        "Use 'quit' or 'exit' to leave",
                    )))?;
                    continue;
                }
            };

            let Some(line) = line else {
                break;
            };
            let command = line.trim();

            if is_quit_word(command) {
                self.say(&self.display.render_info(self.t("再见！", "Goodbye!")))?;
                break;
            }
            if command.is_empty() {
                continue;
            }

            if let Err(e) = self.explain_command(command).await {
                error!(error = %e, "failed to explain command");
                self.say(&self.display.render_error(&format!("{e:#}")))?;
            }
        }

        Ok(())
    }

    /// Poll the system clipboard and explain each new command until Ctrl-C.
    pub async fn run_clipboard(&self) -> Result<()> {
        let capturer = match ClipboardCapturer::system() {
            Ok(capturer) => capturer,
            Err(e) => {
                error!(error = %e, "clipboard unavailable");
                return self.say(&self.display.render_error(&format!(
                    "{}: {e}",
                    self.t("无法访问剪贴板", "Cannot access the clipboard")
                )));
            }
        };
        self.poll_clipboard(capturer).await
    }

    async fn poll_clipboard<S: ClipboardSource>(&self, mut capturer: ClipboardCapturer<S>) -> Result<()> {
        self.say(&format!(
            "{} - {}",
            self.display.render_title("rusty-explain"),
            self.t("剪贴板监听模式", "clipboard mode")
        ))?;
        self.say(&self.display.render_success(self.t(
            "复制命令即可获得解释，按 Ctrl+C 退出",
            "Copy a command to have it explained, press Ctrl+C to stop",
        )))?;

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_notice: Option<String> = None;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    self.say("")?;
                    self.say(&self.display.render_info(self.t("停止监听...", "Stopped listening...")))?;
                    return Ok(());
                }
            }

            match capturer.capture() {
                CaptureOutcome::Captured(event) => {
                    last_notice = None;
                    debug!(source = event.source, at = %event.timestamp, "captured command");
                    self.say(&self.display.render_dim(self.t("\n>>> 捕获到命令", "\n>>> Captured command")))?;
                    if let Err(e) = self.explain_command(&event.content).await {
                        error!(error = %e, "failed to explain captured command");
                        self.say(&self.display.render_error(&format!("{e:#}")))?;
                    }
                }
                CaptureOutcome::NotCommand(text) => {
                    if last_notice.as_deref() != Some(text.as_str()) {
                        self.say(&self.display.render_dim(&format!(
                            "ℹ️  {}: {}",
                            self.t("剪贴板内容不像命令", "Clipboard content does not look like a command"),
                            preview(&text)
                        )))?;
                        last_notice = Some(text);
                    }
                }
                CaptureOutcome::Duplicate(_) | CaptureOutcome::Empty => {}
            }
        }
    }
}

fn is_quit_word(input: &str) -> bool {
    QUIT_WORDS.contains(&input.to_lowercase().as_str())
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(NOTICE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
