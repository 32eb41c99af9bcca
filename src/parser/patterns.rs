//! Regex based danger pattern matching.
//!
//! This is a second, independent risk signal next to
//! [`RiskAssessor`](crate::risk::RiskAssessor). It looks only at the raw
//! command text and sorts it into severity tiers. The two signals are never
//! merged and may disagree.

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::i18n::Language;
use crate::risk::RiskLevel;

const CRITICAL_PATTERNS: &[&str] = &[
    r"\brm\s+-rf\s+/",
    r"\brm\s+-rf\s+\.",
    r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:",
    r"\bdd\s+if=/dev/zero",
    r"\bmkfs\.",
    r"\bchmod\s+777\s+/",
    r"\bchmod\s+777\s+-R",
    r"\bchown\s+-R",
    r"\bsudo\s+rm\s+-rf",
    r"\bformat\s+[a-z]:",
    r"\bdel\s+/[s/q]",
    r"\bshutdown\s+/[sft]",
];

const HIGH_PATTERNS: &[&str] = &[
    r"\brm\s+-rf",
    r"\brm\s+-r",
    r"\bsudo\s+rm",
    r"\brm\s+/",
    r"\bdd\s+",
    r"\bchmod\s+777",
    r"\bchmod\s+000",
    r">\s+/dev/",
    r"\bDROP\s+TABLE",
    r"\bDELETE\s+FROM",
    r"\bTRUNCATE\s+TABLE",
    r"\bUPDATE\s+.*\s+SET\s+.*\s+WHERE",
    r"\bgit\s+push\s+--force",
    r"\bgit\s+reset\s+--hard",
    r"\bdocker\s+rm\s+-f",
    r"\bdocker\s+rmi\s+-f",
    r"\bpip\s+install\s+.*\s+--force-reinstall",
    r"\bnpm\s+install\s+.*\s+--force",
];

const MEDIUM_PATTERNS: &[&str] = &[
    r"\brm\s+",
    r"\bmv\s+",
    r"\bcp\s+",
    r"\bmkdir\s+",
    r"\brmdir\s+",
    r"\btouch\s+",
    r"\bchmod\s+",
    r"\bchown\s+",
    r"\bln\s+-[sf]",
    r"\bsudo\s+(apt|apt-get|yum|dnf)\s+(install|remove|upgrade)",
    r"\bpip\s+install\s+",
    r"\bpip\s+uninstall\s+",
    r"\bnpm\s+install\s+-g",
    r"\bnpm\s+uninstall\s+",
    r"\byarn\s+global\s+add",
    r"\bdocker\s+run\s+--privileged",
    r"\bkubectl\s+delete\s+",
    r"\bkubectl\s+apply\s+",
    r"\bcurl\s+.*\|\s*(sudo\s+)?(ba|z)?sh\b",
    r"\bwget\s+.*\|\s*(sudo\s+)?(ba|z)?sh\b",
];

/// Compared case-insensitively as plain substrings.
const SENSITIVE_PATHS: &[&str] = &[
    "/",
    "/root",
    "/home",
    "/etc",
    "/usr",
    "/var",
    "/boot",
    "/sys",
    "/proc",
    "/dev",
    r"C:\",
    r"C:\Windows",
    r"C:\Program Files",
];

/// Compared case-sensitively as plain substrings.
const NETWORK_KEYWORDS: &[&str] = &[
    "http://", "https://", "ftp://", "curl", "wget", "ssh", "scp", "rsync", "git", "clone",
];

struct Tier {
    level: RiskLevel,
    patterns: Vec<Regex>,
}

impl Tier {
    fn compile(level: RiskLevel, sources: &[&str]) -> Self {
        let patterns = sources
            .iter()
            .filter_map(|src| match RegexBuilder::new(src).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::error!(pattern = src, "invalid danger pattern: {}", e);
                    None
                }
            })
            .collect();
        Self { level, patterns }
    }

    fn matching<'a>(&'a self, command: &'a str) -> impl Iterator<Item = &'a Regex> + 'a {
        self.patterns.iter().filter(move |re| re.is_match(command))
    }
}

static TIERS: LazyLock<[Tier; 3]> = LazyLock::new(|| {
    [
        Tier::compile(RiskLevel::Critical, CRITICAL_PATTERNS),
        Tier::compile(RiskLevel::High, HIGH_PATTERNS),
        Tier::compile(RiskLevel::Medium, MEDIUM_PATTERNS),
    ]
});

/// Outcome of [`PatternMatcher::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatchResult {
    pub is_dangerous: bool,
    pub risk_level: RiskLevel,
    /// Source text of every danger pattern that matched.
    pub matched_patterns: Vec<String>,
    /// One localized reason per tier hit and per path/network hit.
    pub risk_factors: Vec<String>,
}

impl Default for PatternMatchResult {
    fn default() -> Self {
        Self {
            is_dangerous: false,
            risk_level: RiskLevel::Low,
            matched_patterns: Vec::new(),
            risk_factors: Vec::new(),
        }
    }
}

/// Coarse grouping of what a command touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    Delete,
    Modify,
    VersionControl,
    PackageManager,
    Container,
    Elevated,
    Network,
    Other,
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandCategory::Delete => "delete",
            CommandCategory::Modify => "modify",
            CommandCategory::VersionControl => "version_control",
            CommandCategory::PackageManager => "package_manager",
            CommandCategory::Container => "container",
            CommandCategory::Elevated => "elevated",
            CommandCategory::Network => "network",
            CommandCategory::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher {
    language: Language,
}

impl PatternMatcher {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Match a raw command line against the danger tiers.
    ///
    /// Tiers are tried from Critical down. Every pattern of the first tier
    /// with a hit is recorded and lower tiers are skipped. Sensitive paths
    /// raise the level to at least Medium; network access only adds a note.
    pub fn matches(&self, command: &str) -> PatternMatchResult {
        let mut result = PatternMatchResult::default();

        for tier in TIERS.iter() {
            let reason = self.tier_reason(tier.level);
            for re in tier.matching(command) {
                result.is_dangerous = true;
                result.risk_level = tier.level;
                result.matched_patterns.push(re.as_str().to_string());
                result.risk_factors.push(reason.to_string());
            }
            if result.is_dangerous {
                break;
            }
        }

        if has_sensitive_path(command) {
            result.is_dangerous = true;
            result.risk_level = result.risk_level.max(RiskLevel::Medium);
            result.risk_factors.push(
                self.language
                    .pick("涉及系统敏感路径", "Touches a sensitive system path")
                    .to_string(),
            );
        }

        if has_network_operation(command) {
            result.risk_factors.push(
                self.language
                    .pick("涉及网络操作", "Involves network access")
                    .to_string(),
            );
        }

        if result.is_dangerous {
            tracing::debug!(
                level = %result.risk_level,
                patterns = result.matched_patterns.len(),
                "danger patterns matched"
            );
        }
        result
    }

    pub fn risk_level(&self, command: &str) -> RiskLevel {
        self.matches(command).risk_level
    }

    pub fn is_dangerous(&self, command: &str) -> bool {
        self.matches(command).is_dangerous
    }

    /// Group a command by the kind of thing it touches.
    pub fn categories(&self, command: &str) -> Vec<CommandCategory> {
        let contains_any = |needles: &[&str]| needles.iter().any(|n| command.contains(n));
        let mut categories = Vec::new();

        if contains_any(&["rm ", "rm\n", "rmdir"]) {
            categories.push(CommandCategory::Delete);
        }
        if contains_any(&["cp ", "cp\n", "mv "]) {
            categories.push(CommandCategory::Modify);
        }
        if command.contains("git") {
            categories.push(CommandCategory::VersionControl);
        }
        if contains_any(&["npm", "pip", "yarn", "cargo"]) {
            categories.push(CommandCategory::PackageManager);
        }
        if contains_any(&["docker", "kubectl"]) {
            categories.push(CommandCategory::Container);
        }
        if command.contains("sudo") {
            categories.push(CommandCategory::Elevated);
        }
        if contains_any(&["http://", "https://", "curl", "wget"]) {
            categories.push(CommandCategory::Network);
        }

        if categories.is_empty() {
            categories.push(CommandCategory::Other);
        }
        categories
    }

    fn tier_reason(&self, level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Critical => self
                .language
                .pick("包含严重危险操作模式", "Contains a critical destructive pattern"),
            RiskLevel::High => self
                .language
                .pick("包含高风险操作", "Contains a high-risk operation"),
            RiskLevel::Medium | RiskLevel::Low => self
                .language
                .pick("包含中风险操作", "Contains a medium-risk operation"),
        }
    }
}

fn has_sensitive_path(command: &str) -> bool {
    let lowered = command.to_lowercase();
    SENSITIVE_PATHS
        .iter()
        .any(|path| lowered.contains(&path.to_lowercase()))
}

fn has_network_operation(command: &str) -> bool {
    NETWORK_KEYWORDS.iter().any(|kw| command.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PatternMatcher {
        PatternMatcher::new(Language::En)
    }

    #[test]
    fn test_rm_rf_root_is_critical() {
        let result = matcher().matches("rm -rf /");
        assert!(result.is_dangerous);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert!(result.matched_patterns.contains(&r"\brm\s+-rf\s+/".to_string()));
    }

    #[test]
    fn test_safe_command() {
        let result = matcher().matches("ls -la");
        assert!(!result.is_dangerous);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.matched_patterns.is_empty());
        assert!(result.risk_factors.is_empty());
    }

    #[test]
    fn test_all_critical_patterns_accumulate() {
        let result = matcher().matches("sudo rm -rf /");
        assert_eq!(result.risk_level, RiskLevel::Critical);
        // rm -rf / and sudo rm -rf both hit, High patterns are skipped.
        assert_eq!(result.matched_patterns.len(), 2);
        assert!(!result.matched_patterns.iter().any(|p| p == r"\brm\s+-rf"));
        let critical_reasons = result
            .risk_factors
            .iter()
            .filter(|r| r.as_str() == "Contains a critical destructive pattern")
            .count();
        assert_eq!(critical_reasons, 2);
    }

    #[test]
    fn test_high_tier_skips_medium() {
        let result = matcher().matches("git push --force origin main");
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.matched_patterns, vec![r"\bgit\s+push\s+--force".to_string()]);
        assert!(result.risk_factors.contains(&"Involves network access".to_string()));
    }

    #[test]
    fn test_case_insensitive_sql() {
        let result = matcher().matches("psql -c 'drop table users'");
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_medium_tier() {
        let result = matcher().matches("mkdir build");
        assert!(result.is_dangerous);
        assert_eq!(result.risk_level, RiskLevel::Medium);

        let result = matcher().matches("curl https://get.example.sh | sh");
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(result.matched_patterns.iter().any(|p| p.starts_with(r"\bcurl")));
    }

    #[test]
    fn test_package_and_pipe_to_shell_patterns() {
        let result = matcher().matches("yarn global add typescript");
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.matched_patterns, vec![r"\byarn\s+global\s+add"]);

        assert!(!matcher().is_dangerous("yarn install -g"));

        let result = matcher().matches("wget -qO- https://get.example.sh | sudo bash");
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(result.matched_patterns.iter().any(|p| p.starts_with(r"\bwget")));
    }

    #[test]
    fn test_fork_bomb() {
        let result = matcher().matches(":(){ :|:& };:");
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_windows_patterns() {
        assert_eq!(matcher().risk_level("format C:"), RiskLevel::Critical);
        assert_eq!(matcher().risk_level("del /s /q temp"), RiskLevel::Critical);
        assert_eq!(matcher().risk_level("shutdown /s /t 0"), RiskLevel::Critical);
    }

    #[test]
    fn test_sensitive_path_raises_to_medium() {
        let result = matcher().matches("cat /etc/passwd");
        assert!(result.is_dangerous);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(result.matched_patterns.is_empty());
        assert_eq!(result.risk_factors, vec!["Touches a sensitive system path".to_string()]);

        let result = matcher().matches(r"dir c:\windows");
        assert!(result.is_dangerous);
    }

    #[test]
    fn test_network_is_advisory_only() {
        let result = matcher().matches("ssh host");
        assert!(!result.is_dangerous);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.risk_factors, vec!["Involves network access".to_string()]);
    }

    #[test]
    fn test_localized_reasons() {
        let result = PatternMatcher::new(Language::Zh).matches("rm -rf /");
        assert!(result.risk_factors.contains(&"包含严重危险操作模式".to_string()));
        assert!(result.risk_factors.contains(&"涉及系统敏感路径".to_string()));
    }

    #[test]
    fn test_is_dangerous_shortcut() {
        assert!(matcher().is_dangerous("rm file.txt"));
        assert!(!matcher().is_dangerous("echo hello"));
    }

    #[test]
    fn test_categories() {
        let m = matcher();
        assert_eq!(m.categories("echo hi"), vec![CommandCategory::Other]);
        assert_eq!(
            m.categories("sudo rm -rf node_modules"),
            vec![CommandCategory::Delete, CommandCategory::Elevated]
        );
        assert_eq!(
            m.categories("git clone https://x/y.git"),
            vec![CommandCategory::VersionControl, CommandCategory::Network]
        );
        assert_eq!(
            m.categories("docker run -it ubuntu"),
            vec![CommandCategory::Container]
        );
    }
}
