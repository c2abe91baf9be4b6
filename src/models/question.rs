use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::QuestionError;
use crate::models::subject::Subject;

/// 每道题的选项数量
pub const OPTION_COUNT: usize = 3;
/// 算式操作数上限（含）
pub const MAX_OPERAND: i64 = 20;

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// 题目 ID
///
/// 按创建时间排序：先比较毫秒时间戳，再比较进程内递增序号，
/// 同一毫秒内创建的题目也不会重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId {
    created_ms: i64,
    seq: u64,
}

impl QuestionId {
    /// 生成一个新的 ID
    pub fn fresh() -> Self {
        Self {
            created_ms: chrono::Utc::now().timestamp_millis(),
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.created_ms, self.seq)
    }
}

impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 算式运算符（只有加减）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 数学题的结构化操作数，供展示层画图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Arithmetic {
    pub num1: i64,
    pub num2: i64,
    pub operator: Operator,
}

impl Arithmetic {
    /// 计算结果；溢出时返回 None
    pub fn result(&self) -> Option<i64> {
        match self.operator {
            Operator::Plus => self.num1.checked_add(self.num2),
            Operator::Minus => self.num1.checked_sub(self.num2),
        }
    }
}

/// 标准化后的题目
///
/// 程序生成和 AI 生成两条路径都产出这个结构，展示层只需要处理一种形状。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub subject: Subject,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    pub answer: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arithmetic: Option<Arithmetic>,
}

impl Question {
    /// 判断提交的答案是否正确
    ///
    /// 忽略大小写的文本比较，数字答案按十进制字符串比较。
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.to_lowercase() == self.answer.to_lowercase()
    }

    /// 按选项下标判断（越界视为错误）
    pub fn option_is_correct(&self, index: usize) -> bool {
        self.options
            .get(index)
            .map(|opt| self.is_correct(opt))
            .unwrap_or(false)
    }

    /// 念给孩子听的文本：有故事时先念故事
    pub fn spoken_text(&self) -> String {
        match &self.narrative {
            Some(story) => format!("{}. {}", story, self.prompt),
            None => self.prompt.clone(),
        }
    }

    /// 校验题目约束
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount(self.options.len()));
        }

        let mut seen = HashSet::new();
        for opt in &self.options {
            if !seen.insert(opt.to_lowercase()) {
                return Err(QuestionError::DuplicateOption(opt.clone()));
            }
        }

        let matches = self.options.iter().filter(|o| self.is_correct(o)).count();
        if matches != 1 {
            return Err(QuestionError::AnswerMatchCount(matches));
        }

        if let Some(arith) = &self.arithmetic {
            if self.subject != Subject::Math {
                return Err(QuestionError::ArithmeticNotAllowed(self.subject));
            }
            for n in [arith.num1, arith.num2] {
                if !(0..=MAX_OPERAND).contains(&n) {
                    return Err(QuestionError::OperandOutOfRange(n));
                }
            }
            if arith.operator == Operator::Minus && arith.num1 < arith.num2 {
                return Err(QuestionError::NegativeSubtraction {
                    num1: arith.num1,
                    num2: arith.num2,
                });
            }
            // 图示算式必须和答案一致
            let result = arith.result().map(|r| r.to_string()).unwrap_or_default();
            if !self.is_correct(&result) {
                return Err(QuestionError::ArithmeticMismatch {
                    result,
                    answer: self.answer.clone(),
                });
            }
        }

        Ok(())
    }
}
