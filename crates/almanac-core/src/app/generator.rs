//! InstanceGenerator - アクティブなルールを日付ウィンドウ上に展開する
//!
//! # フロー
//! 1. RuleStore からアクティブなルールを読む
//! 2. ウィンドウの各日について `matches` を評価する
//! 3. 既存（skipped 以外）と重複しない候補だけを追加して 1 回で書き込む

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::{RecurrenceRule, TaskInstance, calendar, matches};
use crate::error::AlmanacError;
use crate::ports::Clock;
use crate::store::{InstanceStore, RuleStore};

/// Result of one generation pass.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Instances appended by this pass.
    pub added: usize,

    /// The full collection after the merge.
    pub instances: Vec<TaskInstance>,
}

/// Plan the instances a window would add to `existing`.
///
/// Walks the `days_ahead` days beginning with `start` (half-open, the day
/// `start + days_ahead` is excluded), one day at a time, for every active rule. A candidate is dropped when a non-skipped instance for the same
/// `(rule, date)` already exists, either stored or planned earlier in this
/// pass. Skipped instances never block.
pub fn plan_instances(
    rules: &[RecurrenceRule],
    existing: &[TaskInstance],
    start: NaiveDate,
    days_ahead: u32,
    created_at: DateTime<Utc>,
) -> Vec<TaskInstance> {
    let mut planned: Vec<TaskInstance> = Vec::new();

    for rule in rules.iter().filter(|rule| rule.active) {
        let mut matched = 0usize;
        for date in calendar::window(start, days_ahead) {
            if !matches(date, &rule.recurrence) {
                continue;
            }
            matched += 1;

            let taken = existing
                .iter()
                .chain(planned.iter())
                .any(|instance| instance.occupies(&rule.id, date));
            if !taken {
                planned.push(TaskInstance::generated(rule, date, created_at));
            }
        }
        debug!(rule_id = %rule.id, kind = rule.recurrence.kind(), matched, "rule expanded");
    }

    planned
}

pub struct InstanceGenerator {
    rules: RuleStore,
    instances: InstanceStore,
    clock: Arc<dyn Clock>,
}

impl InstanceGenerator {
    pub fn new(rules: RuleStore, instances: InstanceStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            rules,
            instances,
            clock,
        }
    }

    /// Generate from the stored rules and persist the merge in one write.
    ///
    /// The window is half-open (see [`calendar::window`]): day
    /// `start + days_ahead` is excluded. With no active rule nothing is written.
    pub async fn generate(
        &self,
        start: NaiveDate,
        days_ahead: u32,
    ) -> Result<Generation, AlmanacError> {
        let rules = self.rules.active().await?;
        if rules.is_empty() {
            info!("no active rules; nothing to generate");
            let instances = self.instances.load().await?;
            return Ok(Generation {
                added: 0,
                instances,
            });
        }

        let created_at = self.clock.now();
        let generation = self
            .instances
            .modify(|instances| {
                let planned = plan_instances(&rules, instances, start, days_ahead, created_at);
                let added = planned.len();
                instances.extend(planned);
                Ok(Generation {
                    added,
                    instances: instances.clone(),
                })
            })
            .await?;

        info!(
            rules = rules.len(),
            %start,
            days_ahead,
            added = generation.added,
            total = generation.instances.len(),
            "instances generated"
        );
        Ok(generation)
    }
}
