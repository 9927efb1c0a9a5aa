//! KeyValueStore port - ドキュメント単位の永続化
//!
//! エンジンはコレクション全体を 1 つの JSON ドキュメントとして読み書きします。
//! 部分更新・行ロックはありません（read-modify-write, last-writer-wins）。
//!
//! # 実装
//! - **InMemoryKeyValueStore**: テスト・デモ用（`impls::inmem_kv`）

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("read failed for key={key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("write rejected for key={key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// KeyValueStore は whole-document の get/set のみを提供
///
/// # 設計原則
/// - `get` は存在しないキーに対して `Ok(None)` を返す
/// - `set` が失敗した場合、ストアの内容は変わらない
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    async fn set(&self, key: &str, document: serde_json::Value) -> Result<(), StoreError>;
}
