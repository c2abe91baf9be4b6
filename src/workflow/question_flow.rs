//! 出题流程 - 流程层
//!
//! 核心职责：定义"要一道题"的完整流程
//!
//! 流程顺序：
//! 1. Classic：直接程序出题
//! 2. Story：AI 出题 → 任何失败都回退到程序出题

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::question::Question;
use crate::models::subject::{GameMode, Subject};
use crate::services::{
    ClassicGenerator, OpenAiStoryBackend, StoryBackend, StoryOutcome, StoryService,
};

/// 题目来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// 程序生成（Classic 模式）
    Classic,
    /// AI 生成
    Story,
    /// Story 失败后回退到程序生成，附带失败类别
    Fallback(&'static str),
}

/// 出题流程
///
/// - 决定何时调用 AI、何时兜底
/// - 对调用方永远返回一道合法题目，不返回错误
pub struct QuestionFlow<B = OpenAiStoryBackend> {
    classic: ClassicGenerator,
    story: StoryService<B>,
}

impl QuestionFlow<OpenAiStoryBackend> {
    pub fn new(config: &Config) -> Self {
        Self {
            classic: ClassicGenerator::new(),
            story: StoryService::new(config),
        }
    }
}

impl<B: StoryBackend> QuestionFlow<B> {
    pub fn from_parts(classic: ClassicGenerator, story: StoryService<B>) -> Self {
        Self { classic, story }
    }

    /// 按科目和模式出一道题
    pub async fn get_question(&mut self, subject: Subject, mode: GameMode) -> Question {
        self.get_question_with_source(subject, mode).await.0
    }

    /// 出题并返回题目来源
    pub async fn get_question_with_source(
        &mut self,
        subject: Subject,
        mode: GameMode,
    ) -> (Question, ContentSource) {
        if mode == GameMode::Classic {
            return (self.classic.generate(subject), ContentSource::Classic);
        }

        // ========== Story：先试 AI ==========
        let outcome = self.story.fetch(subject).await;
        let kind = outcome.kind();
        match outcome {
            StoryOutcome::Ready(question) => (question, ContentSource::Story),
            StoryOutcome::Unavailable => {
                debug!("Story 不可用，使用 Classic 题目");
                (self.classic.generate(subject), ContentSource::Fallback(kind))
            }
            StoryOutcome::Malformed(reason) | StoryOutcome::Transport(reason) => {
                warn!("⚠️ Story 出题失败 ({}): {}，回退到 Classic", kind, reason);
                let question = self.classic.generate(subject);
                info!("✓ 已使用 Classic 题目兜底");
                (question, ContentSource::Fallback(kind))
            }
        }
    }
}
