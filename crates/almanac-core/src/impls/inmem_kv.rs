//! InMemoryKeyValueStore - テスト・デモ用のドキュメントストア
//!
//! # 学習ポイント
//! - tokio::sync::Mutex による排他制御
//! - 書き込み失敗の注入（PersistenceFailure のテスト用）

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ports::{KeyValueStore, StoreError};

/// InMemoryKeyValueStore は HashMap<String, Value> でドキュメントを保持
///
/// # 使用例
/// ```ignore
/// let store = InMemoryKeyValueStore::new();
/// store.set("calendarInstances", serde_json::json!([])).await?;
/// ```
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    documents: Mutex<HashMap<String, serde_json::Value>>,
    reject_writes: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `set` fails with `WriteRejected` and changes nothing.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let documents = self.documents.lock().await;
        Ok(documents.get(key).cloned())
    }

    async fn set(&self, key: &str, document: serde_json::Value) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        let mut documents = self.documents.lock().await;
        documents.insert(key.to_string(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_replaces_whole_document() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", json!([1, 2, 3])).await.unwrap();
        store.set("k", json!([4])).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!([4])));
    }

    #[tokio::test]
    async fn rejected_write_leaves_document_untouched() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", json!(["before"])).await.unwrap();

        store.reject_writes(true);
        let err = store.set("k", json!(["after"])).await.unwrap_err();
        assert!(matches!(err, StoreError::WriteRejected { .. }));
        assert_eq!(store.get("k").await.unwrap(), Some(json!(["before"])));

        store.reject_writes(false);
        store.set("k", json!(["after"])).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(["after"])));
    }
}
