//! Recurrence rules.
//!
//! ルールは編集する側が所有し、エンジンは読むだけです。

use serde::{Deserialize, Serialize};

use super::ids::RuleId;
use super::recurrence::Recurrence;

/// A named, toggleable recurrence descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub id: RuleId,

    /// Display label copied onto every generated instance.
    pub name: String,

    /// Inactive rules generate nothing. Missing means inactive.
    #[serde(default)]
    pub active: bool,

    pub recurrence: Recurrence,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional time-of-day label ("09:30"); carried, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl RecurrenceRule {
    /// An active rule with no optional fields.
    pub fn new(id: impl Into<RuleId>, name: impl Into<String>, recurrence: Recurrence) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            recurrence,
            project: None,
            description: None,
            time: None,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}
