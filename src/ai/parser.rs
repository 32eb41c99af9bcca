//! Parser module for processing AI responses.
//!
//! Models are asked for bare JSON but often wrap it in a markdown code
//! block or surround it with prose. [`extract_json`] strips that wrapping
//! and [`parse_explanation`] turns the payload into an [`AiExplanation`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::i18n::Language;
use crate::risk::RiskLevel;

/// Characters of the command echoed into a mock summary.
const MOCK_SUMMARY_CHARS: usize = 30;

/// Where an [`AiExplanation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplanationSource {
    #[default]
    Model,
    /// Model answered but the payload was not valid JSON.
    Degraded,
    /// No model was reached.
    Mock,
}

/// Structured explanation as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiExplanation {
    pub summary: String,
    #[serde(deserialize_with = "text_or_lines")]
    pub description: String,
    pub purpose: String,
    pub parameters: Vec<String>,
    pub examples: Vec<String>,
    pub warnings: Vec<String>,
    pub alternatives: Vec<String>,
    pub risk_level: String,
    pub risk_score: f64,
    pub recommendation: String,
    #[serde(skip)]
    pub raw_response: String,
    #[serde(skip)]
    pub source: ExplanationSource,
}

impl Default for AiExplanation {
    fn default() -> Self {
        Self {
            summary: String::new(),
            description: String::new(),
            purpose: String::new(),
            parameters: Vec::new(),
            examples: Vec::new(),
            warnings: Vec::new(),
            alternatives: Vec::new(),
            risk_level: RiskLevel::Low.as_str().to_string(),
            risk_score: 0.0,
            recommendation: String::new(),
            raw_response: String::new(),
            source: ExplanationSource::Model,
        }
    }
}

impl AiExplanation {
    /// The model's risk level, if it is one of the four known names.
    pub fn level(&self) -> Option<RiskLevel> {
        RiskLevel::from_name(&self.risk_level)
    }

    pub fn is_fallback(&self) -> bool {
        self.source != ExplanationSource::Model
    }
}

/// Accept `description` either as a string or as a list of lines.
fn text_or_lines<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrLines {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match TextOrLines::deserialize(deserializer)? {
        TextOrLines::Text(text) => text,
        TextOrLines::Lines(lines) => lines.join("\n"),
    })
}

/// Pull the JSON payload out of a model response.
///
/// Tries a ```` ```json ```` block, then any fenced block, then the span from
/// the first `{` to the last `}`. Falls back to the whole text.
pub fn extract_json(text: &str) -> &str {
    if let Some(inner) = fenced(text, "```json") {
        return inner;
    }
    if let Some(inner) = fenced(text, "```") {
        return inner;
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return &text[start..=end];
        }
    }
    text
}

/// Text between the first `open` marker and the last closing fence.
fn fenced<'a>(text: &'a str, open: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let end = text.rfind("```")?;
    (end > start).then(|| text[start..end].trim())
}

/// Parse a raw model response. Never fails: a payload that is not valid
/// JSON yields a localized "parse failed" explanation.
pub fn parse_explanation(response: &str, language: Language) -> AiExplanation {
    let payload = extract_json(response);
    match serde_json::from_str::<AiExplanation>(payload) {
        Ok(mut explanation) => {
            explanation.raw_response = response.to_string();
            explanation
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to parse AI response as JSON");
            degraded_explanation(response, language)
        }
    }
}

fn degraded_explanation(response: &str, language: Language) -> AiExplanation {
    let lang = language;
    AiExplanation {
        summary: lang.pick("解析失败", "Parse failed").to_string(),
        description: lang
            .pick("AI 返回了无效的 JSON 格式", "The AI returned invalid JSON")
            .to_string(),
        purpose: lang.pick("请检查 AI 响应", "Check the AI response").to_string(),
        warnings: vec![lang.pick("AI 响应解析失败", "Failed to parse the AI response").to_string()],
        recommendation: lang
            .pick("请重试或检查 AI 配置", "Retry or check the AI configuration")
            .to_string(),
        raw_response: response.to_string(),
        source: ExplanationSource::Degraded,
        ..AiExplanation::default()
    }
}

/// Placeholder explanation used when no model can be reached.
pub fn mock_explanation(command: &str, language: Language) -> AiExplanation {
    let lang = language;
    let head: String = command.chars().take(MOCK_SUMMARY_CHARS).collect();

    AiExplanation {
        summary: format!("{} {}...", lang.pick("执行", "Execute"), head),
        description: lang
            .pick(
                "这是一个命令行命令，需要根据具体参数进行解释。",
                "This is a command-line command that requires interpretation based on specific parameters.",
            )
            .to_string(),
        purpose: lang.pick("执行系统命令", "Execute system command").to_string(),
        examples: vec![format!("{command} --help")],
        warnings: vec![
            lang.pick(
                "AI 服务当前不可用，建议配置 AI API 或使用本地模型",
                "AI service currently unavailable, consider configuring AI API or using local models",
            )
            .to_string(),
            lang.pick(
                "请确保了解该命令的作用后再执行",
                "Make sure you understand the command before execution",
            )
            .to_string(),
        ],
        alternatives: vec![
            lang.pick("man 命令名  # 查看手册", "man command_name  # View manual")
                .to_string(),
            lang.pick("命令名 --help  # 查看帮助", "command_name --help  # View help")
                .to_string(),
        ],
        risk_score: 10.0,
        recommendation: lang
            .pick("请先查阅相关文档了解命令作用", "Please consult documentation first")
            .to_string(),
        source: ExplanationSource::Mock,
        ..AiExplanation::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"summary": "List files", "description": "Lists files", "purpose": "Inspect", "parameters": ["-l: long"], "examples": [], "warnings": [], "alternatives": [], "risk_level": "low", "risk_score": 5, "recommendation": "Safe"}"#;

    #[test]
    fn test_extract_json_fenced() {
        let response = format!("Here you go:\n```json\n{PAYLOAD}\n```\nDone.");
        assert_eq!(extract_json(&response), PAYLOAD);

        let response = format!("```\n{PAYLOAD}\n```");
        assert_eq!(extract_json(&response), PAYLOAD);
    }

    #[test]
    fn test_extract_json_braces() {
        let response = format!("Sure! {PAYLOAD} Hope that helps.");
        assert_eq!(extract_json(&response), PAYLOAD);
        assert_eq!(extract_json("no json here"), "no json here");
        assert_eq!(extract_json("} backwards {"), "} backwards {");
    }

    #[test]
    fn test_parse_explanation() {
        let response = format!("```json\n{PAYLOAD}\n```");
        let explanation = parse_explanation(&response, Language::En);
        assert_eq!(explanation.summary, "List files");
        assert_eq!(explanation.parameters, vec!["-l: long"]);
        assert_eq!(explanation.level(), Some(RiskLevel::Low));
        assert_eq!(explanation.risk_score, 5.0);
        assert_eq!(explanation.raw_response, response);
        assert!(!explanation.is_fallback());
    }

    #[test]
    fn test_missing_fields_default() {
        let explanation = parse_explanation(r#"{"summary": "x", "risk_level": "CRITICAL"}"#, Language::En);
        assert_eq!(explanation.summary, "x");
        assert!(explanation.examples.is_empty());
        assert_eq!(explanation.level(), Some(RiskLevel::Critical));

        let explanation = parse_explanation(r#"{"summary": "x"}"#, Language::En);
        assert_eq!(explanation.level(), Some(RiskLevel::Low));
    }

    #[test]
    fn test_description_as_list() {
        let explanation =
            parse_explanation(r#"{"description": ["one", "two"]}"#, Language::En);
        assert_eq!(explanation.description, "one\ntwo");
    }

    #[test]
    fn test_invalid_json_degrades() {
        let explanation = parse_explanation("I cannot help with that.", Language::Zh);
        assert_eq!(explanation.summary, "解析失败");
        assert_eq!(explanation.warnings, vec!["AI 响应解析失败"]);
        assert_eq!(explanation.risk_score, 0.0);
        assert_eq!(explanation.source, ExplanationSource::Degraded);
        assert_eq!(explanation.raw_response, "I cannot help with that.");
    }

    #[test]
    fn test_mock_explanation() {
        let explanation = mock_explanation("rm -rf node_modules", Language::En);
        assert_eq!(explanation.summary, "Execute rm -rf node_modules...");
        assert_eq!(explanation.examples, vec!["rm -rf node_modules --help"]);
        assert_eq!(explanation.risk_score, 10.0);
        assert_eq!(explanation.level(), Some(RiskLevel::Low));
        assert!(explanation.is_fallback());

        let long = "x".repeat(50);
        let explanation = mock_explanation(&long, Language::Zh);
        assert_eq!(explanation.summary, format!("执行 {}...", "x".repeat(30)));
    }
}
