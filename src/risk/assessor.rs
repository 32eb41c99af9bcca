//! Factor detection and scoring.

use serde::Serialize;

use crate::i18n::Language;
use crate::parser::{CommandParser, ParsedCommand};

use super::{RiskAssessment, RiskFactor, RiskFactorKind, RiskLevel};

/// Scales the summed factor contributions onto the 0-100 range.
const SCORE_SCALE: f64 = 30.0;

const DELETE_COMMANDS: &[&str] = &["rm", "rmdir", "del", "erase"];
const MODIFY_COMMANDS: &[&str] = &[
    "chmod", "chown", "mv", "cp", "mkdir", "ln", "apt", "apt-get", "yum", "dnf", "pacman",
];
const NETWORK_COMMANDS: &[&str] = &["curl", "wget", "git", "ssh", "scp", "rsync", "npm", "pip"];
const ELEVATED_MARKERS: &[&str] = &["sudo", "--sudo", "-S", "--admin", "--privileged"];
const IRREVERSIBLE_OPTIONS: &[&str] = &["--force", "-f", "--purge", "--delete"];
const BATCH_OPTIONS: &[&str] = &["-r", "-R", "--recursive", "-f", "--force"];
const SENSITIVE_PATHS: &[&str] = &[
    "/",
    "/root",
    "/home",
    "/etc",
    "/usr",
    "/var",
    r"C:\",
    r"C:\Windows",
    r"C:\Program Files",
];

/// Condensed assessment for callers that only hold a command string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickAssessment {
    pub level: RiskLevel,
    pub score: f64,
    pub recommendation: String,
    pub factors: Vec<QuickFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickFactor {
    pub name: RiskFactorKind,
    pub description: String,
}

/// Scores parsed commands. Holds nothing but the output language.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessor {
    language: Language,
}

impl RiskAssessor {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn assess(&self, parsed: &ParsedCommand) -> RiskAssessment {
        let factors = self.detect_factors(parsed);

        let score = if factors.is_empty() {
            0.0
        } else {
            let total: f64 = factors.iter().map(RiskFactor::contribution).sum();
            (total * SCORE_SCALE).min(RiskAssessment::MAX_SCORE)
        };
        let level = RiskLevel::from_score(score);
        let recommendation = self.recommendation(level).to_string();
        let detailed_analysis = self.detailed_analysis(score, &factors, &recommendation);

        tracing::debug!(
            command = %parsed.command,
            score,
            %level,
            factors = factors.len(),
            "assessed command risk"
        );

        RiskAssessment {
            level,
            score,
            factors,
            recommendation,
            detailed_analysis,
        }
    }

    pub fn risk_level(&self, parsed: &ParsedCommand) -> RiskLevel {
        self.assess(parsed).level
    }

    pub fn risk_factors(&self, parsed: &ParsedCommand) -> Vec<RiskFactor> {
        self.detect_factors(parsed)
    }

    /// Parse and assess in one step.
    pub fn quick_assess(&self, command: &str) -> QuickAssessment {
        let parsed = CommandParser::new().parse(command);
        let assessment = self.assess(&parsed);
        QuickAssessment {
            level: assessment.level,
            score: assessment.score,
            recommendation: assessment.recommendation,
            factors: assessment
                .factors
                .into_iter()
                .map(|f| QuickFactor {
                    name: f.name,
                    description: f.description,
                })
                .collect(),
        }
    }

    pub fn format_risk_report(&self, assessment: &RiskAssessment) -> String {
        let label = self.language.pick("风险等级", "Risk Level");
        format!(
            "{}: {}\n{}",
            label,
            assessment.level.display_name(self.language),
            assessment.detailed_analysis
        )
    }

    pub fn recommendation(&self, level: RiskLevel) -> &'static str {
        let lang = self.language;
        match level {
            RiskLevel::Low => lang.pick(
                "此命令是只读操作，可以安全执行。",
                "This is a read-only operation, safe to execute.",
            ),
            RiskLevel::Medium => lang.pick(
                "此命令会修改文件或系统，建议先检查参数。",
                "This command modifies files or system, review parameters first.",
            ),
            RiskLevel::High => lang.pick(
                "此命令存在较高风险，请仔细确认后再执行。",
                "This command has significant risk, confirm carefully before execution.",
            ),
            RiskLevel::Critical => lang.pick(
                "此命令可能导致严重后果，强烈建议不要执行！",
                "This command may cause serious damage, do NOT execute!",
            ),
        }
    }

    fn detailed_analysis(&self, score: f64, factors: &[RiskFactor], recommendation: &str) -> String {
        let lang = self.language;
        let factor_lines = if factors.is_empty() {
            format!("  {}", lang.pick("无", "None"))
        } else {
            factors
                .iter()
                .map(|f| format!("  - {}", f.description))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "{}: {:.1}/100\n{}:\n{}\n{}: {}",
            lang.pick("风险分数", "Risk Score"),
            score,
            lang.pick("风险因素", "Risk Factors"),
            factor_lines,
            lang.pick("建议", "Recommendation"),
            recommendation
        )
    }

    fn detect_factors(&self, parsed: &ParsedCommand) -> Vec<RiskFactor> {
        let lang = self.language;
        let command = parsed.command.as_str();
        let raw = parsed.original.as_str();
        let mut factors = Vec::new();

        if DELETE_COMMANDS.contains(&command) {
            let weight = if raw.contains("-rf") || parsed.has_option("-r") {
                0.9
            } else {
                0.6
            };
            factors.push(RiskFactor::new(RiskFactorKind::FileDeletion, lang, weight));
        }

        if MODIFY_COMMANDS.contains(&command) {
            factors.push(RiskFactor::new(RiskFactorKind::SystemModification, lang, 0.7));
        }

        let fetches_url = parsed
            .arguments
            .iter()
            .any(|arg| arg.starts_with("http://") || arg.starts_with("https://"));
        if NETWORK_COMMANDS.contains(&command) || fetches_url {
            factors.push(RiskFactor::new(RiskFactorKind::NetworkOperation, lang, 0.3));
        }

        if ELEVATED_MARKERS.iter().any(|m| raw.contains(m)) {
            factors.push(RiskFactor::new(RiskFactorKind::ElevatedPrivileges, lang, 0.6));
        }

        if command == "rm" || parsed.has_any_option(IRREVERSIBLE_OPTIONS) {
            factors.push(RiskFactor::new(RiskFactorKind::Irreversible, lang, 0.9));
        }

        if parsed.has_any_option(BATCH_OPTIONS) {
            factors.push(RiskFactor::new(RiskFactorKind::BatchOperation, lang, 0.7));
        }

        if SENSITIVE_PATHS.iter().any(|p| raw.contains(p)) {
            factors.push(RiskFactor::new(RiskFactorKind::SensitivePath, lang, 0.6));
        }

        factors
    }
}
