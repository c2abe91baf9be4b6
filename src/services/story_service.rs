//! Story 出题服务 - 业务能力层
//!
//! 只负责"向生成式服务要一道题"，不关心回退流程。
//! 所有可预期的失败都收敛成 `StoryOutcome`，不会以错误的形式抛给调用方。

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::question::Question;
use crate::models::subject::Subject;
use crate::services::story_backend::{OpenAiStoryBackend, StoryBackend, StoryRequest};
use crate::services::story_payload::parse_payload;
use crate::utils::logging::truncate_text;

/// 一次 Story 出题的结果
#[derive(Debug, Clone, PartialEq)]
pub enum StoryOutcome {
    /// 拿到合法题目
    Ready(Question),
    /// 未配置 API Key
    Unavailable,
    /// 响应无法解析或不满足题目约束
    Malformed(String),
    /// 网络错误、接口错误或超时
    Transport(String),
}

impl StoryOutcome {
    pub fn into_question(self) -> Option<Question> {
        match self {
            StoryOutcome::Ready(q) => Some(q),
            _ => None,
        }
    }

    /// 用于日志的简短类别名
    pub fn kind(&self) -> &'static str {
        match self {
            StoryOutcome::Ready(_) => "ready",
            StoryOutcome::Unavailable => "unavailable",
            StoryOutcome::Malformed(_) => "malformed",
            StoryOutcome::Transport(_) => "transport",
        }
    }
}

/// Story 出题服务
///
/// 职责：
/// - 检查是否配置了凭据
/// - 每次调用只发一次请求，带超时
/// - 解析并校验响应，合法才返回题目
pub struct StoryService<B = OpenAiStoryBackend> {
    backend: B,
    has_credentials: bool,
    timeout: Duration,
}

impl StoryService<OpenAiStoryBackend> {
    pub fn new(config: &Config) -> Self {
        Self {
            backend: OpenAiStoryBackend::new(config),
            has_credentials: config.has_llm_credentials(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }
}

impl<B: StoryBackend> StoryService<B> {
    pub fn with_backend(backend: B, has_credentials: bool, timeout: Duration) -> Self {
        Self {
            backend,
            has_credentials,
            timeout,
        }
    }

    /// 为指定科目请求一道 Story 题目
    pub async fn fetch(&self, subject: Subject) -> StoryOutcome {
        if !self.has_credentials {
            info!("未配置 API Key，跳过 Story 生成");
            return StoryOutcome::Unavailable;
        }

        let request = StoryRequest::for_subject(subject);

        let raw = match tokio::time::timeout(self.timeout, self.backend.complete(&request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!("⚠️ Story 请求失败: {}", e);
                return StoryOutcome::Transport(e.to_string());
            }
            Err(_) => {
                warn!("⚠️ Story 请求超时 ({:?})", self.timeout);
                return StoryOutcome::Transport(format!("请求超时 ({:?})", self.timeout));
            }
        };

        debug!("Story 原始响应: {}", truncate_text(&raw, 200));

        let payload = match parse_payload(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("⚠️ Story 响应无法解析: {}", e);
                return StoryOutcome::Malformed(e.to_string());
            }
        };

        let question = payload.into_question(subject);
        if let Err(e) = question.validate() {
            warn!("⚠️ Story 题目不满足约束: {}", e);
            return StoryOutcome::Malformed(e.to_string());
        }

        info!("✓ Story 题目已生成: {}", truncate_text(&question.prompt, 60));
        StoryOutcome::Ready(question)
    }
}
