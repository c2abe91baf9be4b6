//! # Little Learners
//!
//! 面向低龄儿童的三选一答题游戏（数学 / 英语 / 科学）
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 模型与基础设施层（Models / Infrastructure）
//! - `models/` - 题目、科目、题库、图示
//! - `infrastructure/` - 键值存储与累计总分
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ClassicGenerator` - 程序出题（数学随机 + 英语/科学题库）
//! - `StoryService` - AI 故事出题，失败分类返回
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionFlow` - 出题流程（Story 失败 → Classic 兜底）
//! - `GameSession` - 会话状态（当前题目、得分、连对、票据）
//!
//! ### ④ 应用层（App）
//! - `app` - 终端菜单与答题循环
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, StartOptions};
pub use config::Config;
pub use error::{ConfigError, QuestionError, StoreError};
pub use infrastructure::{FileStore, KeyValueStore, MemoryStore, ScoreBook};
pub use models::{GameMode, Question, Subject};
pub use services::{ClassicGenerator, StoryOutcome, StoryService};
pub use workflow::{AnswerFeedback, ContentSource, GameSession, QuestionFlow};
