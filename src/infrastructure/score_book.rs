//! 总分读写
//!
//! 总分以十进制字符串存放在固定的键下，启动时读一次，每次变化时写回。

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::infrastructure::kv_store::KeyValueStore;

/// 总分存储键
pub const TOTAL_SCORE_KEY: &str = "littleLearnersTotalScore";

/// 总分账本
#[derive(Clone)]
pub struct ScoreBook {
    store: Arc<dyn KeyValueStore>,
}

impl ScoreBook {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 读取总分；缺失、损坏或读取失败都按 0 处理
    pub fn load(&self) -> u64 {
        match self.store.get(TOTAL_SCORE_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!("⚠️ 总分数据无效 '{}'，按 0 处理", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!("⚠️ 读取总分失败，按 0 处理: {}", e);
                0
            }
        }
    }

    /// 写入总分
    pub fn save(&self, total: u64) -> Result<(), StoreError> {
        debug!("保存总分: {}", total);
        self.store.set(TOTAL_SCORE_KEY, &total.to_string())
    }
}
