//! Task instances and their lifecycle.
//!
//! # 状態遷移
//! - Pending -> Completed
//! - Pending -> Skipped
//!
//! Pending に戻る遷移はありません。reschedule は元のインスタンスを
//! skipped にして、新しい日付に pending のコピーを作ります
//! （元のインスタンスの日付は動かさない）。

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{InstanceId, RuleId};
use super::recurrence::Recurrence;
use super::rule::RecurrenceRule;
use crate::error::AlmanacError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Pending,
    Completed,
    Skipped,
}

impl InstanceStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, InstanceStatus::Completed | InstanceStatus::Skipped)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceStatus::Pending => "pending",
            InstanceStatus::Completed => "completed",
            InstanceStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Superseded by a copy on another date.
    Rescheduled,
}

/// A dated occurrence of a rule.
///
/// Design:
/// - This is the single source of truth for lifecycle state.
/// - Rule fields are snapshotted at generation time; later rule edits do not
///   rewrite existing instances.
/// - State transitions happen through methods, not field writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    pub id: InstanceId,
    pub rule_id: RuleId,
    pub name: String,
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Snapshot of the rule's descriptor; undecodable snapshots load as `Unknown`.
    #[serde(default, deserialize_with = "crate::domain::recurrence::snapshot::deserialize")]
    pub recurrence: Recurrence,

    pub status: InstanceStatus,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<SkipReason>,

    /// Only on rescheduled copies: the date this copy was moved from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rescheduled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_at: Option<DateTime<Utc>>,
}

impl TaskInstance {
    /// A fresh pending occurrence of `rule` on `date`.
    pub fn generated(rule: &RecurrenceRule, date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            id: InstanceId::for_occurrence(&rule.id, date),
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            date,
            time: rule.time.clone(),
            project: rule.project.clone(),
            description: rule.description.clone(),
            recurrence: rule.recurrence.clone(),
            status: InstanceStatus::Pending,
            created_at,
            completed_at: None,
            skipped_at: None,
            skipped_reason: None,
            original_date: None,
            rescheduled: false,
            rescheduled_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InstanceStatus::Pending
    }

    /// Does this instance block generating `(rule_id, date)` again?
    ///
    /// Skipped instances never block.
    pub fn occupies(&self, rule_id: &RuleId, date: NaiveDate) -> bool {
        self.status != InstanceStatus::Skipped && &self.rule_id == rule_id && self.date == date
    }

    pub fn ensure_pending(&self) -> Result<(), AlmanacError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(AlmanacError::InvalidTransition {
                id: self.id.clone(),
                status: self.status,
            })
        }
    }

    /// Mark as completed.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> Result<(), AlmanacError> {
        self.ensure_pending()?;
        self.status = InstanceStatus::Completed;
        self.completed_at = Some(at);
        Ok(())
    }

    /// Mark as skipped.
    pub fn mark_skipped(
        &mut self,
        at: DateTime<Utc>,
        reason: Option<SkipReason>,
    ) -> Result<(), AlmanacError> {
        self.ensure_pending()?;
        self.status = InstanceStatus::Skipped;
        self.skipped_at = Some(at);
        self.skipped_reason = reason;
        Ok(())
    }

    /// A pending copy of this instance moved to `new_date`.
    ///
    /// Does not touch `self`; the caller skips the source.
    pub fn rescheduled_copy(&self, id: InstanceId, new_date: NaiveDate, at: DateTime<Utc>) -> Self {
        Self {
            id,
            date: new_date,
            original_date: Some(self.date),
            rescheduled: true,
            rescheduled_at: Some(at),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rule() -> RecurrenceRule {
        RecurrenceRule::new("r1", "Water plants", Recurrence::Weekly { day_of_week: 1 })
            .with_project("home")
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn generated_instance_snapshots_rule() {
        let inst = TaskInstance::generated(&rule(), date(4), at());
        assert_eq!(inst.id.as_str(), "r1_2024-03-04");
        assert_eq!(inst.name, "Water plants");
        assert_eq!(inst.project.as_deref(), Some("home"));
        assert_eq!(inst.status, InstanceStatus::Pending);
        assert!(!inst.rescheduled);
    }

    #[test]
    fn complete_is_one_way() {
        let mut inst = TaskInstance::generated(&rule(), date(4), at());
        inst.mark_completed(at()).unwrap();
        assert_eq!(inst.status, InstanceStatus::Completed);
        assert_eq!(inst.completed_at, Some(at()));

        let err = inst.mark_skipped(at(), None).unwrap_err();
        assert!(matches!(
            err,
            AlmanacError::InvalidTransition { status: InstanceStatus::Completed, .. }
        ));
        assert_eq!(inst.status, InstanceStatus::Completed);
    }

    #[test]
    fn skipped_cannot_be_completed() {
        let mut inst = TaskInstance::generated(&rule(), date(4), at());
        inst.mark_skipped(at(), None).unwrap();
        assert!(inst.mark_completed(at()).is_err());
        assert_eq!(inst.status, InstanceStatus::Skipped);
        assert!(inst.status.is_terminal());
    }

    #[test]
    fn skipped_instances_do_not_occupy_their_date() {
        let mut inst = TaskInstance::generated(&rule(), date(4), at());
        assert!(inst.occupies(&RuleId::new("r1"), date(4)));
        assert!(!inst.occupies(&RuleId::new("r1"), date(11)));
        assert!(!inst.occupies(&RuleId::new("r2"), date(4)));

        inst.mark_skipped(at(), None).unwrap();
        assert!(!inst.occupies(&RuleId::new("r1"), date(4)));
    }

    #[test]
    fn rescheduled_copy_keeps_source_intact() {
        let source = TaskInstance::generated(&rule(), date(4), at());
        let copy = source.rescheduled_copy(InstanceId::new("r1_2024-03-06_rescheduled_1"), date(6), at());

        assert_eq!(copy.date, date(6));
        assert_eq!(copy.original_date, Some(date(4)));
        assert!(copy.rescheduled);
        assert_eq!(copy.status, InstanceStatus::Pending);
        assert_eq!(copy.rule_id, source.rule_id);
        assert_eq!(source.date, date(4));
        assert_eq!(source.status, InstanceStatus::Pending);
    }

    #[test]
    fn undecodable_snapshot_loads_as_unknown() {
        let stored = serde_json::json!({
            "id": "b_2024-03-04", "ruleId": "b", "name": "Legacy",
            "date": "2024-03-04", "status": "pending",
            "createdAt": "2024-03-01T00:00:00Z",
            "recurrence": { "type": "interval_days", "startDate": "2024-01-01", "interval": "45" }
        });

        let inst: TaskInstance = serde_json::from_value(stored).unwrap();

        assert_eq!(inst.recurrence, Recurrence::Unknown);
        assert!(inst.is_pending());
    }

    #[test]
    fn missing_snapshot_loads_as_unknown() {
        let stored = serde_json::json!({
            "id": "b_2024-03-04", "ruleId": "b", "name": "Legacy",
            "date": "2024-03-04", "status": "completed",
            "createdAt": "2024-03-01T00:00:00Z"
        });

        let inst: TaskInstance = serde_json::from_value(stored).unwrap();

        assert_eq!(inst.recurrence, Recurrence::Unknown);
    }

    #[test]
    fn stored_shape_is_camel_case() {
        let inst = TaskInstance::generated(&rule(), date(4), at());
        let v = serde_json::to_value(&inst).unwrap();
        assert_eq!(v["ruleId"], "r1");
        assert_eq!(v["date"], "2024-03-04");
        assert_eq!(v["status"], "pending");
        assert!(v.get("rescheduled").is_none());
        assert!(v.get("originalDate").is_none());
    }
}
