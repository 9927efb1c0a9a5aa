//! InMemoryArchive - 完了履歴のインメモリ実装
//!
//! 共有アーカイブと同じ規則で受け付けます：
//! - `text` と `moduleType` は必須
//! - エントリごとに ULID ベースの id を払い出す（時刻部分は Clock から）

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::domain::ArchiveRecord;
use crate::ports::{ArchiveError, ArchiveSink, Clock};

/// One entry of the permanent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedTask {
    pub id: String,
    pub original_id: String,
    pub text: String,
    pub project_id: Option<String>,
    pub module_type: String,
    pub original_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
}

pub struct InMemoryArchive {
    entries: Mutex<Vec<ArchivedTask>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryArchive {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub async fn entries(&self) -> Vec<ArchivedTask> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    fn next_id(&self, at: DateTime<Utc>) -> String {
        let timestamp_ms = at.timestamp_millis().max(0) as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        format!("archive-{ulid}")
    }
}

#[async_trait]
impl ArchiveSink for InMemoryArchive {
    async fn archive(&self, record: ArchiveRecord) -> Result<(), ArchiveError> {
        if record.text.trim().is_empty() {
            return Err(ArchiveError::MissingField("text"));
        }
        if record.module_type.trim().is_empty() {
            return Err(ArchiveError::MissingField("moduleType"));
        }

        let archived_at = self.clock.now();
        let entry = ArchivedTask {
            id: self.next_id(archived_at),
            original_id: record.id,
            text: record.text,
            project_id: record.project_id,
            module_type: record.module_type,
            original_date: record.date,
            created_at: record.created_at,
            archived_at,
        };
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
