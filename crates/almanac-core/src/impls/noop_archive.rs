//! NoopArchive - 何もしない ArchiveSink

use async_trait::async_trait;

use crate::domain::ArchiveRecord;
use crate::ports::{ArchiveError, ArchiveSink};

/// Accepts and discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopArchive;

#[async_trait]
impl ArchiveSink for NoopArchive {
    async fn archive(&self, _record: ArchiveRecord) -> Result<(), ArchiveError> {
        Ok(())
    }
}
