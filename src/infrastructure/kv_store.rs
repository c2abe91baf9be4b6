//! 键值存储 - 基础设施层
//!
//! 只暴露 get / set 能力，总分的读写规则在 `ScoreBook` 里。

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;

/// 键值存储接口
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// JSON 文件存储（整个文件是一个字符串到字符串的对象）
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::ReadFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // 文件损坏时直接覆盖，保证下一次还能写进去
        let mut map = self.read_map().unwrap_or_else(|e| {
            warn!("⚠️ 存储文件无法解析，将重新写入: {}", e);
            Map::new()
        });
        map.insert(key.to_string(), Value::String(value.to_string()));

        let content = Value::Object(map).to_string();
        fs::write(&self.path, content).map_err(|source| StoreError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!("写入存储 {} = {}", key, value);
        Ok(())
    }
}

/// 内存存储（测试和无持久化场景使用）
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
