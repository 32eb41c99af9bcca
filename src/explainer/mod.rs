//! Offline command explanations built from the reference database.

pub mod database;

use serde::Serialize;

use crate::i18n::Language;
use crate::parser::{CommandParser, ParsedCommand};
use crate::risk::{RiskAssessment, RiskAssessor, RiskLevel};

use database::{CommandInfo, OptionDoc};

const RULE_WIDTH: usize = 60;

/// Factor weights above this are repeated as warnings.
const FACTOR_WARNING_WEIGHT: f64 = 0.7;

/// Human readable explanation of one command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandExplanation {
    pub summary: String,
    pub description: String,
    pub purpose: String,
    pub parameters: Vec<String>,
    pub examples: Vec<String>,
    pub warnings: Vec<String>,
    pub alternatives: Vec<String>,
    pub language: Language,
}

/// Summary plus risk headline, as returned by [`CommandExplainer::quick_explain`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickExplanation {
    pub summary: String,
    pub purpose: String,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub recommendation: String,
}

/// Entry data resolved for one program name, either from the database or
/// the generic fallback.
struct ResolvedInfo<'a> {
    description: String,
    purpose: String,
    entry: Option<&'a CommandInfo>,
    warnings: Vec<String>,
    alternatives: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExplainer {
    language: Language,
}

impl CommandExplainer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn explain(
        &self,
        parsed: &ParsedCommand,
        assessment: Option<&RiskAssessment>,
    ) -> CommandExplanation {
        let info = self.resolve(&parsed.command);
        let lang = self.language;

        let summary = format!(
            "{} {} - {}",
            lang.pick("执行", "Execute"),
            parsed.full_command(),
            info.description
        );

        let examples = match info.entry {
            Some(entry) if !entry.examples.is_empty() => {
                entry.examples.iter().map(|e| e.get(lang).to_string()).collect()
            }
            _ => vec![format!(
                "{} --help # {}",
                parsed.command,
                lang.pick("查看帮助", "View help")
            )],
        };

        let mut warnings = info.warnings;
        if let Some(assessment) = assessment {
            if assessment.level >= RiskLevel::High {
                warnings.push(
                    lang.pick(
                        "此命令可能造成数据丢失或系统损坏！",
                        "This command may cause data loss or system damage!",
                    )
                    .to_string(),
                );
            }
            warnings.extend(
                assessment
                    .factors
                    .iter()
                    .filter(|f| f.weight > FACTOR_WARNING_WEIGHT)
                    .map(|f| f.description.clone()),
            );
        }

        let alternatives = if info.alternatives.is_empty() {
            vec![
                lang.pick(
                    "先在测试环境验证命令",
                    "Test the command in a safe environment first",
                )
                .to_string(),
            ]
        } else {
            info.alternatives
        };

        CommandExplanation {
            summary,
            parameters: self.parameters(parsed, info.entry),
            description: info.description,
            purpose: info.purpose,
            examples,
            warnings,
            alternatives,
            language: lang,
        }
    }

    /// Render an explanation as a plain-text report.
    pub fn format_report(
        &self,
        explanation: &CommandExplanation,
        assessment: Option<&RiskAssessment>,
    ) -> String {
        let lang = self.language;
        let rule = "=".repeat(RULE_WIDTH);
        let mut lines = vec![
            rule.clone(),
            format!(
                "{}: {}",
                lang.pick("命令解释", "Command Explanation"),
                explanation.summary
            ),
            rule,
            String::new(),
        ];

        if !explanation.purpose.is_empty() {
            lines.push(explanation.purpose.clone());
            lines.push(String::new());
        }

        if !explanation.description.is_empty() {
            lines.push(lang.pick("说明:", "Description:").to_string());
            lines.extend(explanation.description.lines().map(|l| format!("  {l}")));
            lines.push(String::new());
        }

        push_section(&mut lines, lang.pick("参数:", "Parameters:"), &explanation.parameters);

        if let Some(assessment) = assessment {
            lines.push(format!(
                "{}: {}",
                lang.pick("风险等级", "Risk Level"),
                assessment.level.display_name(lang)
            ));
            lines.push(String::new());
        }

        push_section(&mut lines, lang.pick("警告:", "Warnings:"), &explanation.warnings);
        push_section(&mut lines, lang.pick("示例:", "Examples:"), &explanation.examples);
        push_section(
            &mut lines,
            lang.pick("替代方案:", "Alternatives:"),
            &explanation.alternatives,
        );

        lines.join("\n")
    }

    /// Parse, assess and explain a raw command line.
    pub fn quick_explain(&self, command: &str) -> QuickExplanation {
        let parsed = CommandParser::new().parse(command);
        let assessment = RiskAssessor::new(self.language).assess(&parsed);
        let explanation = self.explain(&parsed, Some(&assessment));

        QuickExplanation {
            summary: explanation.summary,
            purpose: explanation.purpose,
            risk_level: assessment.level,
            risk_score: assessment.score,
            recommendation: assessment.recommendation,
        }
    }

    fn resolve(&self, command: &str) -> ResolvedInfo<'static> {
        let lang = self.language;
        match database::lookup(command) {
            Some(entry) => ResolvedInfo {
                description: entry.description.get(lang).to_string(),
                purpose: entry.purpose.get(lang).to_string(),
                entry: Some(entry),
                warnings: entry.warnings.iter().map(|w| w.get(lang).to_string()).collect(),
                alternatives: entry
                    .alternatives
                    .iter()
                    .map(|a| a.get(lang).to_string())
                    .collect(),
            },
            None => {
                tracing::debug!(command, "no reference entry, using generic explanation");
                ResolvedInfo {
                    description: format!(
                        "{}: {}",
                        lang.pick("这是一个外部命令或自定义脚本", "External command or script"),
                        command
                    ),
                    purpose: lang
                        .pick(
                            "执行特定的系统操作或程序",
                            "Execute specific system operations or programs",
                        )
                        .to_string(),
                    entry: None,
                    warnings: vec![
                        lang.pick(
                            "请确保了解该命令的具体用途",
                            "Make sure you understand the command",
                        )
                        .to_string(),
                    ],
                    alternatives: vec![format!(
                        "{} --help {}",
                        command,
                        lang.pick("查看所有选项", "to view all options")
                    )],
                }
            }
        }
    }

    fn parameters(&self, parsed: &ParsedCommand, entry: Option<&CommandInfo>) -> Vec<String> {
        let lang = self.language;
        let mut params = Vec::new();

        for option in &parsed.options {
            let docs = documented_flags(option, entry);
            if docs.is_empty() {
                params.push(format!("{}: {}", option, lang.pick("选项", "Option")));
            } else {
                params.extend(
                    docs.into_iter()
                        .map(|doc| format!("-{} (--{}): {}", doc.short, doc.long, doc.desc.get(lang))),
                );
            }
        }

        params.extend(
            parsed
                .arguments
                .iter()
                .filter(|arg| !arg.starts_with('-'))
                .map(|arg| format!("<{}>: {}", arg, lang.pick("参数", "Parameter"))),
        );

        params
    }
}

/// Reference docs for an option word. `-rf` expands to `-r` and `-f`; the
/// result is empty if any part is undocumented.
fn documented_flags<'a>(option: &str, entry: Option<&'a CommandInfo>) -> Vec<&'a OptionDoc> {
    let Some(entry) = entry else {
        return Vec::new();
    };

    if let Some(long) = option.strip_prefix("--") {
        let name = long.split('=').next().unwrap_or(long);
        return entry.option(name).into_iter().collect();
    }

    let Some(cluster) = option.strip_prefix('-') else {
        return Vec::new();
    };
    let docs: Option<Vec<_>> = cluster
        .chars()
        .map(|c| entry.option(c.encode_utf8(&mut [0; 4])))
        .collect();
    docs.unwrap_or_default()
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(title.to_string());
    lines.extend(items.iter().map(|item| format!("  {item}")));
    lines.push(String::new());
}
