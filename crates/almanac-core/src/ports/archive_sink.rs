//! ArchiveSink port - 完了履歴の送信先
//!
//! 完了したインスタンスの要約を、モジュール横断の履歴に渡します。
//! エンジンにとっては fire-and-forget で、失敗はログに残すだけです。
//!
//! # 実装
//! - **InMemoryArchive**: テスト・デモ用
//! - **NoopArchive**: 何もしない（履歴が不要な構成向け）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ArchiveRecord;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("field {0} is required for archiving")]
    MissingField(&'static str),

    #[error("archive rejected the record: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait ArchiveSink: Send + Sync {
    async fn archive(&self, record: ArchiveRecord) -> Result<(), ArchiveError>;
}
