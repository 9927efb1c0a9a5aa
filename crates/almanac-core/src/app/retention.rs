//! Retention - 古い完了済み・スキップ済みインスタンスの削除
//!
//! # 設計原則
//! - pending は決して削除しない
//! - 削除対象がなければ書き込まない

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{TaskInstance, calendar};
use crate::error::AlmanacError;
use crate::ports::Clock;
use crate::store::InstanceStore;

/// Is `instance` finished and dated before `cutoff`?
///
/// Pending instances never expire.
pub fn is_expired(instance: &TaskInstance, cutoff: NaiveDate) -> bool {
    instance.status.is_terminal() && instance.date < cutoff
}

pub struct Retention {
    instances: InstanceStore,
    clock: Arc<dyn Clock>,
}

impl Retention {
    pub fn new(instances: InstanceStore, clock: Arc<dyn Clock>) -> Self {
        Self { instances, clock }
    }

    /// Remove completed/skipped instances dated before `today - max_age_days`.
    ///
    /// Returns how many were removed. Writes only when something was removed.
    pub async fn cleanup(&self, max_age_days: u32) -> Result<usize, AlmanacError> {
        let cutoff = calendar::days_before(self.clock.today(), max_age_days);
        let mut instances = self.instances.load().await?;

        let before = instances.len();
        instances.retain(|instance| !is_expired(instance, cutoff));
        let removed = before - instances.len();

        if removed > 0 {
            self.instances.save(&instances).await?;
            info!(removed, %cutoff, remaining = instances.len(), "old instances cleaned up");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceStatus, Recurrence, RecurrenceRule};
    use crate::impls::InMemoryKeyValueStore;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn inst(name: &str, date: NaiveDate, status: InstanceStatus) -> TaskInstance {
        let rule = RecurrenceRule::new(name, name, Recurrence::MonthlyDate { date: 1 });
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut i = TaskInstance::generated(&rule, date, at);
        match status {
            InstanceStatus::Pending => {}
            InstanceStatus::Completed => i.mark_completed(at).unwrap(),
            InstanceStatus::Skipped => i.mark_skipped(at, None).unwrap(),
        }
        i
    }

    async fn retention_with(instances: &[TaskInstance]) -> (InstanceStore, Retention) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = InstanceStore::new(kv, "calendarInstances");
        store.save(instances).await.unwrap();
        let retention = Retention::new(store.clone(), Arc::new(FixedClock::on(today())));
        (store, retention)
    }

    #[rstest]
    #[case::at_boundary(30, false)]
    #[case::one_past_boundary(31, true)]
    #[case::recent(5, false)]
    fn completed_expiry_boundary(#[case] age_days: u32, #[case] expired: bool) {
        let cutoff = calendar::days_before(today(), 30);
        let i = inst("x", calendar::days_before(today(), age_days), InstanceStatus::Completed);
        assert_eq!(is_expired(&i, cutoff), expired);
    }

    #[tokio::test]
    async fn cleanup_removes_only_old_finished_instances() {
        let max_age = 30;
        let boundary = calendar::days_before(today(), max_age);
        let past = calendar::days_before(today(), max_age + 1);
        let ancient = calendar::days_before(today(), 400);

        let (store, retention) = retention_with(&[
            inst("kept-boundary", boundary, InstanceStatus::Completed),
            inst("gone-completed", past, InstanceStatus::Completed),
            inst("gone-skipped", past, InstanceStatus::Skipped),
            inst("kept-pending", ancient, InstanceStatus::Pending),
        ])
        .await;

        let removed = retention.cleanup(max_age).await.unwrap();

        assert_eq!(removed, 2);
        let names: Vec<_> = store.load().await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["kept-boundary", "kept-pending"]);
    }

    #[tokio::test]
    async fn nothing_to_remove_skips_the_write() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = InstanceStore::new(kv.clone(), "calendarInstances");
        store.save(&[inst("a", today(), InstanceStatus::Completed)]).await.unwrap();
        let retention = Retention::new(store.clone(), Arc::new(FixedClock::on(today())));

        // 書き込みが発生すれば失敗する
        kv.reject_writes(true);
        assert_eq!(retention.cleanup(90).await.unwrap(), 0);
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
