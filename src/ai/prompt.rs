//! Prompt building for AI explanations.
//!
//! The system prompt fixes the JSON contract the response parser expects;
//! the user prompt carries the command and whatever local context is known.

use crate::i18n::Language;
use crate::risk::RiskLevel;

const SYSTEM_PROMPT_ZH: &str = r#"你是一个专业的命令行（CLI）命令解释专家。你的任务是分析命令并给出清晰的解释和风险评估。

输出格式要求：
1. 必须使用 JSON 格式输出
2. JSON 必须包含以下字段：
   - summary: 命令的一行摘要（不超过50字）
   - description: 详细说明（分点列出主要功能）
   - purpose: 命令的用途（一句话）
   - parameters: 参数说明列表
   - examples: 常见用法示例列表
   - warnings: 警告信息列表
   - alternatives: 替代方案列表
   - risk_level: 风险等级（low/medium/high/critical）
   - risk_score: 风险分数（0-100）
   - recommendation: 执行建议

风险等级定义：
- low: 只读操作，安全执行
- medium: 修改文件或系统，建议检查参数
- high: 较高风险，请仔细确认
- critical: 危险，强烈建议不要执行

注意事项：
- 只输出 JSON，不要包含其他文字
- 解释要简洁明了
- 必须包含风险评估
- 遇到未知命令时，说明这是外部命令或脚本"#;

const SYSTEM_PROMPT_EN: &str = r#"You are an expert in command-line (CLI) command interpretation. Your task is to analyze commands and provide clear explanations with risk assessment.

Output format requirements:
1. Must use JSON format
2. JSON must contain the following fields:
   - summary: One-line summary (max 50 characters)
   - description: Detailed explanation (list key features)
   - purpose: Purpose of the command (one sentence)
   - parameters: Parameter descriptions list
   - examples: Common usage examples list
   - warnings: Warning messages list
   - alternatives: Alternative solutions list
   - risk_level: Risk level (low/medium/high/critical)
   - risk_score: Risk score (0-100)
   - recommendation: Execution recommendation

Risk level definitions:
- low: Read-only operation, safe to execute
- medium: Modifies files or system, review parameters
- high: Significant risk, confirm carefully
- critical: Dangerous, strongly advise against execution

Notes:
- Output only JSON, no additional text
- Keep explanations concise and clear
- Must include risk assessment
- For unknown commands, note it's an external command or script"#;

/// Optional local facts appended to the user prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplainContext {
    pub command_type: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub current_dir: Option<String>,
    pub os_type: Option<String>,
}

impl ExplainContext {
    /// Context describing the running process: working directory and OS.
    pub fn current() -> Self {
        Self {
            current_dir: std::env::current_dir()
                .ok()
                .map(|p| p.display().to_string()),
            os_type: Some(std::env::consts::OS.to_string()),
            ..Self::default()
        }
    }

    pub fn with_command_type(mut self, command_type: impl Into<String>) -> Self {
        self.command_type = Some(command_type.into());
        self
    }

    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = Some(level);
        self
    }
}

pub fn system_prompt(language: Language) -> &'static str {
    language.pick(SYSTEM_PROMPT_ZH, SYSTEM_PROMPT_EN)
}

/// Build the user message for a command explanation request.
pub fn build_user_prompt(command: &str, ctx: &ExplainContext, language: Language) -> String {
    let mut prompt = match language {
        Language::Zh => format!(
            "请分析以下命令：\n\n命令：{command}\n\n请提供：\n\
             1. 命令的功能说明\n\
             2. 参数和选项的详细解释\n\
             3. 实际使用示例\n\
             4. 潜在的风险和注意事项\n\
             5. 风险等级评估"
        ),
        Language::En => format!(
            "Please analyze the following command:\n\nCommand: {command}\n\nPlease provide:\n\
             1. Command functionality explanation\n\
             2. Detailed explanation of parameters and options\n\
             3. Practical usage examples\n\
             4. Potential risks and warnings\n\
             5. Risk level assessment"
        ),
    };

    let mut push = |zh: &str, en: &str, value: &str| {
        prompt.push_str(&format!("\n\n{}{}", language.pick(zh, en), value));
    };

    if let Some(kind) = ctx.command_type.as_deref().filter(|k| !k.is_empty()) {
        push("命令类型：", "Command type: ", kind);
    }
    if let Some(level) = ctx.risk_level {
        push("本地风险评估：", "Local risk assessment: ", level.as_str());
    }
    if let Some(dir) = ctx.current_dir.as_deref().filter(|d| !d.is_empty()) {
        push("当前目录：", "Current directory: ", dir);
    }
    if let Some(os) = ctx.os_type.as_deref().filter(|o| !o.is_empty()) {
        push("操作系统：", "Operating system: ", os);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_contract() {
        for lang in [Language::Zh, Language::En] {
            let prompt = system_prompt(lang);
            for field in [
                "summary",
                "description",
                "purpose",
                "parameters",
                "examples",
                "warnings",
                "alternatives",
                "risk_level",
                "risk_score",
                "recommendation",
            ] {
                assert!(prompt.contains(field), "{lang} prompt missing {field}");
            }
        }
    }

    #[test]
    fn test_build_user_prompt_basic() {
        let prompt = build_user_prompt("ls -la", &ExplainContext::default(), Language::En);
        assert!(prompt.contains("Command: ls -la"));
        assert!(prompt.ends_with("5. Risk level assessment"));
        assert!(!prompt.contains("Current directory"));
    }

    #[test]
    fn test_build_user_prompt_with_context() {
        let ctx = ExplainContext {
            current_dir: Some("/home/user/projects".to_string()),
            os_type: Some("linux".to_string()),
            ..ExplainContext::default()
        }
        .with_command_type("rm")
        .with_risk_level(RiskLevel::High);

        let prompt = build_user_prompt("rm -rf build", &ctx, Language::En);
        assert!(prompt.contains("\n\nCommand type: rm"));
        assert!(prompt.contains("\n\nLocal risk assessment: high"));
        assert!(prompt.contains("\n\nCurrent directory: /home/user/projects"));
        assert!(prompt.ends_with("\n\nOperating system: linux"));

        let zh = build_user_prompt("rm -rf build", &ctx, Language::Zh);
        assert!(zh.contains("命令：rm -rf build"));
        assert!(zh.contains("当前目录：/home/user/projects"));
    }

    #[test]
    fn test_empty_context_values_are_skipped() {
        let ctx = ExplainContext {
            current_dir: Some(String::new()),
            ..ExplainContext::default()
        };
        let prompt = build_user_prompt("pwd", &ctx, Language::En);
        assert!(!prompt.contains("Current directory"));
    }

    #[test]
    fn test_current_context() {
        let ctx = ExplainContext::current();
        assert_eq!(ctx.os_type.as_deref(), Some(std::env::consts::OS));
        assert!(ctx.command_type.is_none());
    }
}
