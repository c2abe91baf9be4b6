//! 生成式文本服务后端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（默认走 Gemini 的 OpenAI 兼容端点）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::subject::Subject;
use crate::services::story_payload::{build_user_message, STORY_SYSTEM_MESSAGE};

/// 一次出题请求
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRequest {
    pub subject: Subject,
    pub system_message: String,
    pub user_message: String,
}

impl StoryRequest {
    pub fn for_subject(subject: Subject) -> Self {
        Self {
            subject,
            system_message: STORY_SYSTEM_MESSAGE.to_string(),
            user_message: build_user_message(subject),
        }
    }
}

/// 文本生成后端
///
/// 返回模型的原始文本，解析和校验由 `StoryService` 负责。
#[async_trait]
pub trait StoryBackend: Send + Sync {
    async fn complete(&self, request: &StoryRequest) -> Result<String>;
}

/// OpenAI 兼容接口的后端
pub struct OpenAiStoryBackend {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiStoryBackend {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.llm_api_key.clone().unwrap_or_default())
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }
}

#[async_trait]
impl StoryBackend for OpenAiStoryBackend {
    async fn complete(&self, request: &StoryRequest) -> Result<String> {
        debug!(
            "调用 LLM API，模型: {}，科目: {}",
            self.model_name, request.subject
        );

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_message.as_str())
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_message.as_str())
            .build()?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.9)
            .max_tokens(512u32)
            .build()?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}
