//! LifecycleController - complete / reschedule / skip
//!
//! # 設計原則
//! - 1 操作につき read-modify-write は 1 回
//! - pending 以外のインスタンスへの遷移は InvalidTransition
//! - アーカイブは二次的な副作用（失敗しても完了は取り消さない）

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{ArchiveRecord, InstanceId, SkipReason, TaskInstance};
use crate::error::AlmanacError;
use crate::ports::{ArchiveSink, Clock};
use crate::store::InstanceStore;

/// Applies lifecycle transitions, one read-modify-write per call.
///
/// Design intent:
/// - The instance store is changed first; archival is a secondary effect.
/// - An archive failure is logged and never undoes a completion.
pub struct LifecycleController {
    instances: InstanceStore,
    archive: Arc<dyn ArchiveSink>,
    clock: Arc<dyn Clock>,
}

impl LifecycleController {
    pub fn new(
        instances: InstanceStore,
        archive: Arc<dyn ArchiveSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            instances,
            archive,
            clock,
        }
    }

    /// Mark a pending instance completed and hand it to the archive.
    pub async fn complete(&self, id: &InstanceId) -> Result<TaskInstance, AlmanacError> {
        let now = self.clock.now();
        let completed = self
            .instances
            .modify(|instances| {
                let index = locate(instances, id)?;
                instances[index].mark_completed(now)?;
                Ok(instances[index].clone())
            })
            .await?;
        info!(instance_id = %id, name = %completed.name, "instance completed");

        let record = ArchiveRecord::for_completion(&completed, now);
        if let Err(e) = self.archive.archive(record).await {
            warn!(instance_id = %id, error = %e, "archival failed; completion kept");
        }
        Ok(completed)
    }

    /// Move a pending instance to `new_date`.
    ///
    /// The source is skipped with reason `rescheduled` and a pending copy is
    /// appended on `new_date`, both in the same write. Returns the copy.
    pub async fn reschedule(
        &self,
        id: &InstanceId,
        new_date: NaiveDate,
    ) -> Result<TaskInstance, AlmanacError> {
        let now = self.clock.now();
        let copy = self
            .instances
            .modify(|instances| {
                let index = locate(instances, id)?;
                let source = &instances[index];
                source.ensure_pending()?;

                let copy_id =
                    unused_reschedule_id(instances, source, new_date, now.timestamp_millis());
                let copy = source.rescheduled_copy(copy_id, new_date, now);
                instances[index].mark_skipped(now, Some(SkipReason::Rescheduled))?;
                instances.push(copy.clone());
                Ok(copy)
            })
            .await?;
        info!(
            instance_id = %id,
            new_instance_id = %copy.id,
            from = ?copy.original_date,
            to = %new_date,
            "instance rescheduled"
        );
        Ok(copy)
    }

    /// Mark a pending instance skipped. Nothing is archived.
    pub async fn skip(&self, id: &InstanceId) -> Result<TaskInstance, AlmanacError> {
        let now = self.clock.now();
        let skipped = self
            .instances
            .modify(|instances| {
                let index = locate(instances, id)?;
                instances[index].mark_skipped(now, None)?;
                Ok(instances[index].clone())
            })
            .await?;
        info!(instance_id = %id, "instance skipped");
        Ok(skipped)
    }
}

/// Index of the instance with `id`.
///
/// A date regenerated after a skip shares its id with the skipped instance;
/// the pending one wins so it stays reachable.
fn locate(instances: &[TaskInstance], id: &InstanceId) -> Result<usize, AlmanacError> {
    instances
        .iter()
        .position(|i| &i.id == id && i.is_pending())
        .or_else(|| instances.iter().position(|i| &i.id == id))
        .ok_or_else(|| AlmanacError::NotFound(id.clone()))
}

/// Reschedule id stamped with `stamp_ms`, bumped until no instance uses it.
fn unused_reschedule_id(
    instances: &[TaskInstance],
    source: &TaskInstance,
    new_date: NaiveDate,
    mut stamp_ms: i64,
) -> InstanceId {
    loop {
        let candidate = InstanceId::for_reschedule(&source.rule_id, new_date, stamp_ms);
        if !instances.iter().any(|i| i.id == candidate) {
            return candidate;
        }
        stamp_ms += 1;
    }
}
