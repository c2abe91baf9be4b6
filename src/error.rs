use thiserror::Error;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 键值存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读取失败
    #[error("读取存储文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入失败
    #[error("写入存储文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 存储内容不是合法 JSON 对象
    #[error("存储文件格式错误 ({path}): {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 内存存储的锁被毒化
    #[error("存储锁不可用")]
    Poisoned,
}

/// 题目约束违规
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("题干为空")]
    EmptyPrompt,
    #[error("答案为空")]
    EmptyAnswer,
    #[error("选项数量应为 3，实际为 {0}")]
    WrongOptionCount(usize),
    #[error("选项重复: {0}")]
    DuplicateOption(String),
    #[error("选项中与答案匹配的数量应为 1，实际为 {0}")]
    AnswerMatchCount(usize),
    #[error("减法被减数 {num1} 小于减数 {num2}")]
    NegativeSubtraction { num1: i64, num2: i64 },
    #[error("算式操作数超出范围 0..=20: {0}")]
    OperandOutOfRange(i64),
    #[error("算式结果 {result} 与答案 {answer} 不一致")]
    ArithmeticMismatch { result: String, answer: String },
    #[error("{0} 题目不应包含算式")]
    ArithmeticNotAllowed(crate::models::subject::Subject),
}
