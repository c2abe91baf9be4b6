use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    /// 未配置时 Story 模式直接回退到 Classic
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次生成请求的超时（秒）
    pub llm_timeout_secs: u64,
    // --- 本地存储 ---
    /// 总分存储文件
    pub score_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            llm_timeout_secs: 8,
            score_file: "little_learners_score.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 仅从环境变量加载（未设置的项使用默认值）
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.overlay_env())
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config.normalized())
    }

    /// 是否配置了可用的 API Key
    pub fn has_llm_credentials(&self) -> bool {
        self.llm_api_key.is_some()
    }

    fn overlay_env(self) -> Self {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// 用查找函数覆盖配置；空白值视为未设置，保留原值
    fn overlay<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let default = self;
        Self {
            llm_api_key: var("LLM_API_KEY")
                .or_else(|| var("API_KEY"))
                .or(default.llm_api_key),
            llm_api_base_url: var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: var("LLM_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.llm_timeout_secs),
            score_file: var("SCORE_FILE").unwrap_or(default.score_file),
            verbose_logging: var("VERBOSE_LOGGING")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.verbose_logging),
        }
        .normalized()
    }

    /// 空白的 API Key 视为未配置
    fn normalized(mut self) -> Self {
        self.llm_api_key = self
            .llm_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_has_no_credentials() {
        let config = Config::default();
        assert!(!config.has_llm_credentials());
        assert_eq!(config.llm_timeout_secs, 8);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            llm_model_name = "gemini-2.0-flash"
            llm_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.llm_model_name, "gemini-2.0-flash");
        assert_eq!(config.llm_timeout_secs, 5);
        assert_eq!(config.score_file, Config::default().score_file);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = Config::from_toml_str(r#"llm_api_key = "   ""#).unwrap();
        assert!(!config.has_llm_credentials());

        let config = Config::from_toml_str(r#"llm_api_key = "abc""#).unwrap();
        assert_eq!(config.llm_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_env_keeps_file_key() {
        let file = Config::from_toml_str(r#"llm_api_key = "from-file""#).unwrap();
        let env: HashMap<&str, &str> = [("LLM_API_KEY", ""), ("LLM_MODEL_NAME", "  ")].into();

        let config = file.overlay(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.llm_api_key.as_deref(), Some("from-file"));
        assert_eq!(config.llm_model_name, Config::default().llm_model_name);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = Config::from_toml_str(r#"llm_api_key = "from-file""#).unwrap();
        let env: HashMap<&str, &str> = [("API_KEY", "from-env"), ("LLM_TIMEOUT_SECS", "3")].into();

        let config = file.overlay(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.llm_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.llm_timeout_secs, 3);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_toml_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
