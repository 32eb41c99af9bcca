//! Terminal rendering of explanations and risk panels.
//!
//! Everything renders to a `String` first so output can be tested without a
//! terminal; [`ResultDisplay::print`] writes the result to stdout.

use std::io::{self, IsTerminal, Write};

use crossterm::style::{Color, Stylize};
use textwrap::core::display_width;

use crate::ai::AiExplanation;
use crate::config::DisplayConfig;
use crate::explainer::CommandExplanation;
use crate::i18n::Language;
use crate::parser::PatternMatchResult;
use crate::risk::{RiskAssessment, RiskLevel};

const MIN_WIDTH: usize = 40;

/// Borrowed view over either explanation type.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationView<'a> {
    pub summary: &'a str,
    pub description: &'a str,
    pub purpose: &'a str,
    pub parameters: &'a [String],
    pub examples: &'a [String],
    pub warnings: &'a [String],
    pub alternatives: &'a [String],
}

impl<'a> From<&'a CommandExplanation> for ExplanationView<'a> {
    fn from(e: &'a CommandExplanation) -> Self {
        Self {
            summary: &e.summary,
            description: &e.description,
            purpose: &e.purpose,
            parameters: &e.parameters,
            examples: &e.examples,
            warnings: &e.warnings,
            alternatives: &e.alternatives,
        }
    }
}

impl<'a> From<&'a AiExplanation> for ExplanationView<'a> {
    fn from(e: &'a AiExplanation) -> Self {
        Self {
            summary: &e.summary,
            description: &e.description,
            purpose: &e.purpose,
            parameters: &e.parameters,
            examples: &e.examples,
            warnings: &e.warnings,
            alternatives: &e.alternatives,
        }
    }
}

pub fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::DarkYellow,
        RiskLevel::Critical => Color::Red,
    }
}

pub fn level_emoji(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "✅",
        RiskLevel::Medium => "⚠️",
        RiskLevel::High => "🔶",
        RiskLevel::Critical => "🛑",
    }
}

#[derive(Debug, Clone)]
pub struct ResultDisplay {
    language: Language,
    show_emoji: bool,
    width: usize,
    color: bool,
}

impl ResultDisplay {
    /// Colors are enabled only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn new(config: &DisplayConfig) -> Self {
        let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::with_color(config, color)
    }

    pub fn with_color(config: &DisplayConfig, color: bool) -> Self {
        Self {
            language: config.language,
            show_emoji: config.show_emoji,
            width: config.width.max(MIN_WIDTH),
            color,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn t<'a>(&self, zh: &'a str, en: &'a str) -> &'a str {
        self.language.pick(zh, en)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }

    /// Wrap `text` to the display width, indenting every line.
    fn wrap(&self, text: &str, indent: &str) -> Vec<String> {
        let options = textwrap::Options::new(self.width)
            .initial_indent(indent)
            .subsequent_indent(indent);
        text.lines()
            .flat_map(|line| textwrap::wrap(line, &options))
            .map(|line| line.into_owned())
            .collect()
    }

    /// A rounded box around `lines`. Padding is computed on the unstyled
    /// text so wide characters line up.
    fn panel(&self, title: &str, lines: &[String], color: Color) -> String {
        let inner = self.width.saturating_sub(4);
        let wrapped: Vec<String> = lines
            .iter()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    textwrap::wrap(line, inner)
                        .into_iter()
                        .map(|l| l.into_owned())
                        .collect()
                }
            })
            .collect();

        let title = format!(" {title} ");
        let fill = (self.width - 2).saturating_sub(display_width(&title) + 1);
        let mut out = vec![self.paint(&format!("╭─{}{}╮", title, "─".repeat(fill)), color)];
        for line in wrapped {
            let pad = inner.saturating_sub(display_width(&line));
            out.push(format!(
                "{} {}{} {}",
                self.paint("│", color),
                line,
                " ".repeat(pad),
                self.paint("│", color)
            ));
        }
        out.push(self.paint(&format!("╰{}╯", "─".repeat(self.width - 2)), color));
        out.join("\n")
    }

    fn push_list(&self, out: &mut Vec<String>, title: &str, items: &[String], color: Option<Color>) {
        if items.is_empty() {
            return;
        }
        out.push(self.bold(&format!("{title}:")));
        for item in items {
            for line in self.wrap(item, "  • ") {
                out.push(match color {
                    Some(c) => self.paint(&line, c),
                    None => line,
                });
            }
        }
        out.push(String::new());
    }

    fn push_text(&self, out: &mut Vec<String>, title: &str, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        out.push(self.bold(&format!("{title}:")));
        out.extend(self.wrap(text, "  "));
        out.push(String::new());
    }

    /// Command header, explanation sections and, if given, the risk panel.
    pub fn render_explanation(
        &self,
        command: &str,
        explanation: ExplanationView<'_>,
        assessment: Option<&RiskAssessment>,
    ) -> String {
        let mut out = vec![
            String::new(),
            self.paint(&self.bold(self.t("命令解释", "Command Explanation")), Color::Cyan),
            String::new(),
            self.panel(self.t("命令", "Command"), &[command.to_string()], Color::Yellow),
            String::new(),
        ];

        self.push_text(&mut out, self.t("概要", "Summary"), explanation.summary);
        self.push_text(&mut out, self.t("详细说明", "Description"), explanation.description);
        self.push_text(&mut out, self.t("用途", "Purpose"), explanation.purpose);
        self.push_list(&mut out, self.t("参数说明", "Parameters"), explanation.parameters, None);

        if !explanation.examples.is_empty() {
            out.push(self.bold(&format!("{}:", self.t("示例", "Examples"))));
            for example in explanation.examples {
                out.push(format!("  {} {}", self.dim("$"), self.paint(example, Color::Green)));
            }
            out.push(String::new());
        }

        self.push_list(
            &mut out,
            self.t("注意事项", "Warnings"),
            explanation.warnings,
            Some(Color::Yellow),
        );
        self.push_list(
            &mut out,
            self.t("替代方案", "Alternatives"),
            explanation.alternatives,
            Some(Color::Cyan),
        );

        if let Some(assessment) = assessment {
            out.push(self.render_risk(assessment));
            out.push(String::new());
        }

        out.join("\n")
    }

    fn level_line(&self, level: RiskLevel) -> String {
        let name = level.display_name(self.language);
        if self.show_emoji {
            format!("{} {}", level_emoji(level), name)
        } else {
            name.to_string()
        }
    }

    pub fn render_risk(&self, assessment: &RiskAssessment) -> String {
        let mut lines = vec![
            self.level_line(assessment.level),
            format!("{}: {:.1}/100", self.t("评分", "Score"), assessment.score),
        ];

        if !assessment.factors.is_empty() {
            lines.push(String::new());
            lines.push(format!("{}:", self.t("风险因素", "Risk Factors")));
            for factor in &assessment.factors {
                lines.push(format!(
                    "  • {} ({}: {:.1})",
                    factor.description,
                    self.t("权重", "weight"),
                    factor.weight
                ));
            }
        }

        if !assessment.recommendation.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "{}: {}",
                self.t("建议", "Recommendation"),
                assessment.recommendation
            ));
        }

        self.panel(
            self.t("风险评估", "Risk Assessment"),
            &lines,
            level_color(assessment.level),
        )
    }

    /// Danger patterns found in the raw text. Empty when nothing matched.
    pub fn render_patterns(&self, result: &PatternMatchResult) -> String {
        if result.risk_factors.is_empty() {
            return String::new();
        }
        let title = format!(
            "{} ({})",
            self.t("危险模式", "Danger Patterns"),
            result.risk_level.display_name(self.language)
        );
        self.panel(&title, &result.risk_factors, level_color(result.risk_level))
    }

    pub fn render_error(&self, message: &str) -> String {
        self.panel(
            self.t("错误", "Error"),
            &[self.paint(message, Color::Red)],
            Color::Red,
        )
    }

    pub fn render_info(&self, message: &str) -> String {
        format!("{} {}", self.paint("ℹ", Color::Blue), message)
    }

    pub fn render_success(&self, message: &str) -> String {
        format!("{} {}", self.paint("✓", Color::Green), message)
    }

    pub fn render_warning(&self, message: &str) -> String {
        self.paint(message, Color::Yellow)
    }

    pub fn render_dim(&self, message: &str) -> String {
        self.dim(message)
    }

    pub fn render_title(&self, title: &str) -> String {
        self.paint(&self.bold(title), Color::Cyan)
    }

    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::explainer::CommandExplainer;
    use crate::parser::{CommandParser, PatternMatcher};
    use crate::risk::RiskAssessor;

    fn display(language: Language) -> ResultDisplay {
        let config = DisplayConfig {
            language,
            show_emoji: false,
            width: 60,
        };
        ResultDisplay::with_color(&config, false)
    }

    fn assessed(cmd: &str, lang: Language) -> (CommandExplanation, RiskAssessment) {
        let parsed = CommandParser::new().parse(cmd);
        let assessment = RiskAssessor::new(lang).assess(&parsed);
        let explanation = CommandExplainer::new(lang).explain(&parsed, Some(&assessment));
        (explanation, assessment)
    }

    #[test]
    fn test_render_explanation_sections() {
        let (explanation, assessment) = assessed("rm -rf /tmp/test", Language::En);
        let text = display(Language::En).render_explanation(
            "rm -rf /tmp/test",
            (&explanation).into(),
            Some(&assessment),
        );
        assert!(text.contains("Command Explanation"));
        assert!(text.contains("│ rm -rf /tmp/test"));
        assert!(text.contains("Summary:\n  Execute rm - Remove files or directories"));
        assert!(text.contains("Examples:\n  $ rm file.txt  # Remove a file"));
        assert!(text.contains("  • Deletion is irreversible!"));
        assert!(text.contains("Medium Risk"));
        assert!(text.contains("Score: 71.4/100"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_panel_lines_have_equal_width() {
        let (_, assessment) = assessed("rm -rf /tmp/test", Language::Zh);
        let panel = display(Language::Zh).render_risk(&assessment);
        for line in panel.lines() {
            assert_eq!(display_width(line), 60, "line: {line}");
        }
        assert!(panel.contains("风险评估"));
        assert!(panel.contains("权重: 0.9"));
    }

    #[test]
    fn test_emoji_toggle() {
        let (_, assessment) = assessed("ls", Language::En);
        let config = DisplayConfig {
            language: Language::En,
            show_emoji: true,
            width: 60,
        };
        let panel = ResultDisplay::with_color(&config, false).render_risk(&assessment);
        assert!(panel.contains("✅ Low Risk"));
    }

    #[test]
    fn test_colors_add_escape_codes() {
        let config = DisplayConfig::default();
        let colored = ResultDisplay::with_color(&config, true);
        assert!(colored.render_error("boom").contains('\u{1b}'));
    }

    #[test]
    fn test_render_patterns() {
        let ui = display(Language::En);
        let result = PatternMatcher::new(Language::En).matches("sudo rm -rf /");
        let text = ui.render_patterns(&result);
        assert!(text.contains("Danger Patterns (Critical)"));
        assert!(text.contains("Contains a critical destructive pattern"));

        let result = PatternMatcher::new(Language::En).matches("echo hi");
        assert!(ui.render_patterns(&result).is_empty());
    }

    #[test]
    fn test_narrow_width_is_clamped() {
        let config = DisplayConfig {
            width: 5,
            ..DisplayConfig::default()
        };
        let ui = ResultDisplay::with_color(&config, false);
        let panel = ui.render_error("x");
        assert!(panel.lines().all(|l| display_width(l) == MIN_WIDTH));
    }
}
