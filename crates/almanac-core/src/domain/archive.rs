//! ArchiveRecord - 完了時にアーカイブへ渡すレコード

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::instance::TaskInstance;

/// Module tag identifying this engine in the shared archive.
pub const CALENDAR_MODULE: &str = "calendar-recurring";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    /// Id of the completed instance.
    pub id: String,
    pub text: String,
    pub module_type: String,
    pub project_id: Option<String>,
    /// The date the instance was due.
    pub date: NaiveDate,
    /// When the instance was completed.
    pub created_at: DateTime<Utc>,
}

impl ArchiveRecord {
    pub fn for_completion(instance: &TaskInstance, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: instance.id.to_string(),
            text: instance.name.clone(),
            module_type: CALENDAR_MODULE.to_string(),
            project_id: instance.project.clone(),
            date: instance.date,
            created_at: completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recurrence, RecurrenceRule};
    use chrono::TimeZone;

    #[test]
    fn completion_record_carries_instance_summary() {
        let rule = RecurrenceRule::new("r1", "Pay rent", Recurrence::MonthlyDate { date: 1 })
            .with_project("home");
        let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let done = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        let inst = TaskInstance::generated(&rule, due, done);

        let record = ArchiveRecord::for_completion(&inst, done);
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["id"], "r1_2024-03-01");
        assert_eq!(v["text"], "Pay rent");
        assert_eq!(v["moduleType"], "calendar-recurring");
        assert_eq!(v["projectId"], "home");
        assert_eq!(v["date"], "2024-03-01");
    }
}
