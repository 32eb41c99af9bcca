//! Weighted risk model for parsed commands.
//!
//! The assessor derives independent [`RiskFactor`]s from a
//! [`ParsedCommand`](crate::parser::ParsedCommand), folds them into a 0-100
//! score and maps the score onto a [`RiskLevel`].

mod assessor;

use std::fmt;

use serde::Serialize;

use crate::i18n::Language;

pub use assessor::{QuickAssessment, QuickFactor, RiskAssessor};

/// Ordered severity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Lower score bound of each level above `Low`.
    pub const MEDIUM_THRESHOLD: f64 = 50.0;
    pub const HIGH_THRESHOLD: f64 = 75.0;
    pub const CRITICAL_THRESHOLD: f64 = 90.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if score >= Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Parse `low`/`medium`/`high`/`critical`, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    pub fn display_name(self, language: Language) -> &'static str {
        match self {
            RiskLevel::Low => language.pick("低风险", "Low Risk"),
            RiskLevel::Medium => language.pick("中风险", "Medium Risk"),
            RiskLevel::High => language.pick("高风险", "High Risk"),
            RiskLevel::Critical => language.pick("危险", "Critical"),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of condition that contributes to the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    FileDeletion,
    SystemModification,
    NetworkOperation,
    ElevatedPrivileges,
    Irreversible,
    BatchOperation,
    SensitivePath,
}

impl RiskFactorKind {
    pub const ALL: [RiskFactorKind; 7] = [
        RiskFactorKind::FileDeletion,
        RiskFactorKind::SystemModification,
        RiskFactorKind::NetworkOperation,
        RiskFactorKind::ElevatedPrivileges,
        RiskFactorKind::Irreversible,
        RiskFactorKind::BatchOperation,
        RiskFactorKind::SensitivePath,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskFactorKind::FileDeletion => "file_deletion",
            RiskFactorKind::SystemModification => "system_modification",
            RiskFactorKind::NetworkOperation => "network_operation",
            RiskFactorKind::ElevatedPrivileges => "elevated_privileges",
            RiskFactorKind::Irreversible => "irreversible",
            RiskFactorKind::BatchOperation => "batch_operation",
            RiskFactorKind::SensitivePath => "sensitive_path",
        }
    }

    /// Category severity. Multiplied with the per-instance weight of a factor.
    pub fn table_weight(self) -> f64 {
        match self {
            RiskFactorKind::FileDeletion => 0.8,
            RiskFactorKind::SystemModification => 0.7,
            RiskFactorKind::NetworkOperation => 0.3,
            RiskFactorKind::ElevatedPrivileges => 0.6,
            RiskFactorKind::Irreversible => 0.9,
            RiskFactorKind::BatchOperation => 0.7,
            RiskFactorKind::SensitivePath => 0.6,
        }
    }

    pub fn description(self, language: Language) -> &'static str {
        match self {
            RiskFactorKind::FileDeletion => {
                language.pick("包含文件删除操作", "Deletes files or directories")
            }
            RiskFactorKind::SystemModification => language.pick(
                "修改系统配置或权限",
                "Modifies system configuration or permissions",
            ),
            RiskFactorKind::NetworkOperation => language.pick(
                "涉及网络操作，可能下载外部资源",
                "Uses the network and may fetch external resources",
            ),
            RiskFactorKind::ElevatedPrivileges => {
                language.pick("使用管理员权限执行", "Runs with elevated privileges")
            }
            RiskFactorKind::Irreversible => language.pick(
                "操作不可逆或难以恢复",
                "Irreversible or hard to undo",
            ),
            RiskFactorKind::BatchOperation => {
                language.pick("影响多个文件或对象", "Affects many files or objects")
            }
            RiskFactorKind::SensitivePath => {
                language.pick("涉及系统敏感路径", "Touches a sensitive system path")
            }
        }
    }
}

impl fmt::Display for RiskFactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected condition with its instance weight in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub name: RiskFactorKind,
    pub description: String,
    pub weight: f64,
}

impl RiskFactor {
    pub fn new(name: RiskFactorKind, language: Language, weight: f64) -> Self {
        Self {
            name,
            description: name.description(language).to_string(),
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Contribution of this factor before scaling to the 0-100 range.
    pub fn contribution(&self) -> f64 {
        self.weight * self.name.table_weight()
    }
}

/// Result of [`RiskAssessor::assess`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// In `[0, 100]`.
    pub score: f64,
    pub factors: Vec<RiskFactor>,
    pub recommendation: String,
    pub detailed_analysis: String,
}

impl RiskAssessment {
    pub const MAX_SCORE: f64 = 100.0;

    pub fn has_factor(&self, kind: RiskFactorKind) -> bool {
        self.factors.iter().any(|f| f.name == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(49.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(74.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(90.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(RiskLevel::Low.max(RiskLevel::Medium), RiskLevel::Medium);
    }

    #[test]
    fn test_level_names() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical] {
            assert_eq!(RiskLevel::from_name(level.as_str()), Some(level));
        }
        assert_eq!(RiskLevel::from_name("CRITICAL"), Some(RiskLevel::Critical));
        assert_eq!(RiskLevel::from_name("severe"), None);
        assert_eq!(RiskLevel::High.display_name(Language::En), "High Risk");
        assert_eq!(RiskLevel::High.display_name(Language::Zh), "高风险");
    }

    #[test]
    fn test_factor_weight_is_clamped() {
        let factor = RiskFactor::new(RiskFactorKind::Irreversible, Language::En, 1.5);
        assert_eq!(factor.weight, 1.0);
        assert!((factor.contribution() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&RiskFactorKind::ElevatedPrivileges).unwrap_or_default();
        assert_eq!(json, "\"elevated_privileges\"");
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap_or_default();
        assert_eq!(json, "\"critical\"");
    }
}
