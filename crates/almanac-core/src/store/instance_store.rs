//! InstanceStore - インスタンスコレクションの永続化
//!
//! # 学習ポイント
//! - read-modify-write を 1 つのメソッド（`modify`）に閉じ込める
//! - 変更に失敗したら何も書かない

use std::sync::Arc;

use crate::domain::TaskInstance;
use crate::error::AlmanacError;
use crate::ports::KeyValueStore;

use super::rule_store::encode;

/// InstanceStore is the single source of truth for lifecycle state.
///
/// Design:
/// - The whole collection is one document: load it, change it in memory,
///   write it back. No partial writes.
/// - A failed write leaves the stored document as it was; the in-memory
///   copy is dropped with the error.
/// - Single writer assumed: two interleaved cycles are last-writer-wins.
#[derive(Clone)]
pub struct InstanceStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl InstanceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> Result<Vec<TaskInstance>, AlmanacError> {
        match self.kv.get(&self.key).await? {
            None => Ok(Vec::new()),
            Some(document) => {
                serde_json::from_value(document).map_err(|e| AlmanacError::CorruptDocument {
                    key: self.key.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    pub async fn save(&self, instances: &[TaskInstance]) -> Result<(), AlmanacError> {
        let document = encode(&self.key, &instances)?;
        self.kv.set(&self.key, document).await?;
        Ok(())
    }

    /// One read-modify-write cycle.
    ///
    /// `change` runs against the loaded collection; if it fails nothing is
    /// written.
    pub async fn modify<T, F>(&self, change: F) -> Result<T, AlmanacError>
    where
        F: FnOnce(&mut Vec<TaskInstance>) -> Result<T, AlmanacError> + Send,
        T: Send,
    {
        let mut instances = self.load().await?;
        let output = change(&mut instances)?;
        self.save(&instances).await?;
        Ok(output)
    }
}
