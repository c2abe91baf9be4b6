//! 基础设施层：只持有存储资源，只暴露读写能力

pub mod kv_store;
pub mod score_book;

pub use kv_store::{FileStore, KeyValueStore, MemoryStore};
pub use score_book::{ScoreBook, TOTAL_SCORE_KEY};
