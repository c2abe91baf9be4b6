use serde::{Deserialize, Serialize};

/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Subject {
    /// 数学
    Math,
    /// 英语
    English,
    /// 科学
    Science,
}

impl Subject {
    /// 所有科目（菜单顺序）
    pub const ALL: [Subject; 3] = [Subject::Math, Subject::English, Subject::Science];

    /// 获取标准代码（与序列化格式一致）
    pub fn code(self) -> &'static str {
        match self {
            Subject::Math => "MATH",
            Subject::English => "ENGLISH",
            Subject::Science => "SCIENCE",
        }
    }

    /// 菜单上显示的名称
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Math => "Math World",
            Subject::English => "English Fun",
            Subject::Science => "Science Lab",
        }
    }

    /// 菜单副标题
    pub fn tagline(self) -> &'static str {
        match self {
            Subject::Math => "Numbers & Counting",
            Subject::English => "Words & Letters",
            Subject::Science => "Nature & World",
        }
    }

    /// 尝试从字符串解析科目（精确匹配，忽略大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MATH" | "M" => Some(Subject::Math),
            "ENGLISH" | "E" => Some(Subject::English),
            "SCIENCE" | "S" => Some(Subject::Science),
            _ => None,
        }
    }

    /// 智能查找科目（支持菜单序号和模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        if let Some(subject) = Self::from_str(s) {
            return Some(subject);
        }

        let s_lower = s.trim().to_lowercase();
        match s_lower.as_str() {
            "1" => return Some(Subject::Math),
            "2" => return Some(Subject::English),
            "3" => return Some(Subject::Science),
            _ => {}
        }

        if s_lower.contains("math") || s_lower.contains("number") {
            return Some(Subject::Math);
        }
        if s_lower.contains("english") || s_lower.contains("word") || s_lower.contains("letter") {
            return Some(Subject::English);
        }
        if s_lower.contains("science") || s_lower.contains("nature") {
            return Some(Subject::Science);
        }

        None
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 游戏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameMode {
    /// 离线程序生成题目
    Classic,
    /// AI 生成带故事的题目，失败时回退到 Classic
    Story,
}

impl GameMode {
    pub fn display_name(self) -> &'static str {
        match self {
            GameMode::Classic => "Quick Practice",
            GameMode::Story => "Story Adventure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" | "c" | "1" | "quick" => Some(GameMode::Classic),
            "story" | "s" | "2" => Some(GameMode::Story),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Classic => write!(f, "CLASSIC"),
            GameMode::Story => write!(f, "STORY"),
        }
    }
}
