//! QueryService - インスタンスコレクションの読み取り専用ビュー
//!
//! 自由関数は読み込んだコレクションに対する純粋な射影です。
//! [`QueryService`] はコレクションを読み込んでそれらを適用します。

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{InstanceStatus, TaskInstance, calendar};
use crate::error::AlmanacError;
use crate::ports::Clock;
use crate::store::InstanceStore;

/// A pending instance past its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueInstance {
    #[serde(flatten)]
    pub instance: TaskInstance,
    pub overdue_days: i64,
}

/// Aggregate counts for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_today: usize,
}

/// Pending instances due on `date`.
pub fn pending_on(instances: &[TaskInstance], date: NaiveDate) -> Vec<TaskInstance> {
    instances
        .iter()
        .filter(|i| i.is_pending() && i.date == date)
        .cloned()
        .collect()
}

/// Pending instances dated strictly before `reference`, with their lag in days.
pub fn overdue_as_of(instances: &[TaskInstance], reference: NaiveDate) -> Vec<OverdueInstance> {
    instances
        .iter()
        .filter(|i| i.is_pending() && i.date < reference)
        .map(|i| OverdueInstance {
            instance: i.clone(),
            overdue_days: calendar::days_between(i.date, reference),
        })
        .collect()
}

/// Instances of any status with `start <= date <= end`.
pub fn within(instances: &[TaskInstance], start: NaiveDate, end: NaiveDate) -> Vec<TaskInstance> {
    instances
        .iter()
        .filter(|i| start <= i.date && i.date <= end)
        .cloned()
        .collect()
}

/// Counts in a single pass.
pub fn stats_as_of(instances: &[TaskInstance], today: NaiveDate) -> InstanceStats {
    let mut stats = InstanceStats::default();
    for instance in instances {
        stats.total += 1;
        match instance.status {
            InstanceStatus::Pending => {
                stats.pending += 1;
                if instance.date < today {
                    stats.overdue += 1;
                } else if instance.date == today {
                    stats.due_today += 1;
                }
            }
            InstanceStatus::Completed => stats.completed += 1,
            InstanceStatus::Skipped => {}
        }
    }
    stats
}

pub struct QueryService {
    instances: InstanceStore,
    clock: Arc<dyn Clock>,
}

impl QueryService {
    pub fn new(instances: InstanceStore, clock: Arc<dyn Clock>) -> Self {
        Self { instances, clock }
    }

    /// The whole collection, in stored order.
    pub async fn all(&self) -> Result<Vec<TaskInstance>, AlmanacError> {
        self.instances.load().await
    }

    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<TaskInstance>, AlmanacError> {
        Ok(pending_on(&self.instances.load().await?, date))
    }

    /// Overdue as of `reference`, or as of today when `None`.
    pub async fn overdue(
        &self,
        reference: Option<NaiveDate>,
    ) -> Result<Vec<OverdueInstance>, AlmanacError> {
        let reference = reference.unwrap_or_else(|| self.clock.today());
        Ok(overdue_as_of(&self.instances.load().await?, reference))
    }

    pub async fn in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TaskInstance>, AlmanacError> {
        Ok(within(&self.instances.load().await?, start, end))
    }

    pub async fn stats(&self) -> Result<InstanceStats, AlmanacError> {
        Ok(stats_as_of(&self.instances.load().await?, self.clock.today()))
    }
}
