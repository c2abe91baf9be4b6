//! Story 题目的请求内容与响应解析
//!
//! 只做结构解析，不做字段级补全：缺字段或类型不对就是解析失败。

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::models::question::{Arithmetic, Question, QuestionId};
use crate::models::subject::Subject;

/// 系统消息
pub const STORY_SYSTEM_MESSAGE: &str = "You write playful quiz questions for 5-year-old children. \
     Every question has exactly 3 short answer options and exactly one of them is correct. \
     Reply with a single JSON object and nothing else.";

/// 各科目的出题指令
pub fn instruction(subject: Subject) -> &'static str {
    match subject {
        Subject::Math => "Create a fun, very short (1 sentence) math story problem for a 5-year-old using simple addition or subtraction (results under 15).",
        Subject::English => "Create a simple English question for a 5-year-old (spelling, rhyming, or vocabulary). Keep it fun and short.",
        Subject::Science => "Create a simple Science question for a 5-year-old (animals, plants, weather, or nature). Keep it fun and short.",
    }
}

/// 结构化输出 schema
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "prompt": { "type": "string", "description": "The question to ask." },
            "narrative": { "type": "string", "description": "A short context or story (optional)." },
            "answer": { "type": "string", "description": "The correct answer." },
            "options": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 3,
                "maxItems": 3,
                "description": "Array of 3 options including the answer."
            },
            "visualHint": {
                "type": "string",
                "description": "A visual keyword (e.g., apple, cat, sun, star, fish)."
            },
            "arithmetic": {
                "type": ["object", "null"],
                "description": "Only for Math questions.",
                "properties": {
                    "num1": { "type": "integer" },
                    "num2": { "type": "integer" },
                    "operator": { "type": "string", "enum": ["+", "-"] }
                },
                "required": ["num1", "num2", "operator"]
            }
        },
        "required": ["prompt", "answer", "options", "visualHint"]
    })
}

/// 构建发给模型的用户消息：指令 + schema
pub fn build_user_message(subject: Subject) -> String {
    let schema = serde_json::to_string_pretty(&output_schema()).unwrap_or_default();
    format!(
        "{}\n\nReturn strictly valid JSON that matches this JSON schema:\n{}",
        instruction(subject),
        schema
    )
}

/// 模型返回的原始结构
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPayload {
    pub prompt: String,
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub answer: String,
    #[serde(deserialize_with = "texts_or_numbers")]
    pub options: Vec<String>,
    pub visual_hint: String,
    #[serde(default)]
    pub arithmetic: Option<Arithmetic>,
}

impl StoryPayload {
    /// 盖上新 ID 和请求的科目
    pub fn into_question(self, subject: Subject) -> Question {
        Question {
            id: QuestionId::fresh(),
            subject,
            prompt: self.prompt,
            narrative: self.narrative.filter(|s| !s.trim().is_empty()),
            answer: self.answer,
            options: self.options,
            visual_hint: Some(self.visual_hint),
            arithmetic: self.arithmetic,
        }
    }
}

/// 解析模型响应；允许外层包一层 Markdown 代码块
pub fn parse_payload(raw: &str) -> Result<StoryPayload, serde_json::Error> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body)
}

fn strip_code_fence(raw: &str) -> &str {
    let re = match Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$") {
        Ok(re) => re,
        Err(_) => return raw.trim(),
    };
    match re.captures(raw).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => raw.trim(),
    }
}

// 答案和选项允许是字符串或整数，统一转为文本
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        text_or_number(deserializer).map(Text)
    }
}

fn texts_or_numbers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Text> = Vec::deserialize(deserializer)?;
    Ok(items.into_iter().map(|t| t.0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Operator;

    const MATH_JSON: &str = r#"{
        "prompt": "How many apples does Mia have now?",
        "narrative": "Mia has 3 apples and finds 2 more.",
        "answer": "5",
        "options": ["4", "5", "6"],
        "visualHint": "apple",
        "arithmetic": { "num1": 3, "num2": 2, "operator": "+" }
    }"#;

    #[test]
    fn test_parse_full_payload() {
        let payload = parse_payload(MATH_JSON).unwrap();
        assert_eq!(payload.answer, "5");
        assert_eq!(payload.visual_hint, "apple");
        assert_eq!(
            payload.arithmetic,
            Some(Arithmetic {
                num1: 3,
                num2: 2,
                operator: Operator::Plus
            })
        );

        let q = payload.into_question(Subject::Math);
        assert_eq!(q.subject, Subject::Math);
        assert_eq!(q.narrative.as_deref(), Some("Mia has 3 apples and finds 2 more."));
        assert_eq!(q.validate(), Ok(()));
    }

    #[test]
    fn test_numbers_become_text() {
        let payload = parse_payload(
            r#"{"prompt":"What is 2 + 2?","answer":4,"options":[3,4,"5"],"visualHint":"star"}"#,
        )
        .unwrap();
        assert_eq!(payload.answer, "4");
        assert_eq!(payload.options, vec!["3", "4", "5"]);
        assert!(payload.arithmetic.is_none());
    }

    #[test]
    fn test_missing_answer_is_error() {
        let err = parse_payload(
            r#"{"prompt":"Which animal can fly?","options":["Bird","Dog","Fish"],"visualHint":"bird"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("answer"));
    }

    #[test]
    fn test_bad_operator_is_error() {
        let raw = MATH_JSON.replace(r#""operator": "+""#, r#""operator": "*""#);
        assert!(parse_payload(&raw).is_err());
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = format!("```json\n{}\n```", MATH_JSON);
        assert!(parse_payload(&fenced).is_ok());
        assert!(parse_payload("```\nnot json\n```").is_err());
        assert!(parse_payload("").is_err());
    }

    #[test]
    fn test_user_message_carries_schema() {
        let msg = build_user_message(Subject::Math);
        assert!(msg.contains("results under 15"));
        assert!(msg.contains("\"visualHint\""));
        assert!(msg.contains("\"required\""));
    }
}
