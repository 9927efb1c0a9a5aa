//! CalendarEngine - 同じ store / clock を共有するコンポーネントのまとめ役

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::AlmanacError;
use crate::ports::Clock;
use crate::store::RuleStore;

use super::builder::EngineBuilder;
use super::generator::{Generation, InstanceGenerator};
use super::lifecycle::LifecycleController;
use super::query::QueryService;
use super::retention::Retention;

/// Built by [`EngineBuilder`].
pub struct CalendarEngine {
    pub(super) config: EngineConfig,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) rules: RuleStore,
    pub(super) generator: InstanceGenerator,
    pub(super) lifecycle: LifecycleController,
    pub(super) queries: QueryService,
    pub(super) retention: Retention,
}

impl CalendarEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn generator(&self) -> &InstanceGenerator {
        &self.generator
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn queries(&self) -> &QueryService {
        &self.queries
    }

    pub fn retention(&self) -> &Retention {
        &self.retention
    }

    /// Generate from today over the configured window.
    pub async fn generate_upcoming(&self) -> Result<Generation, AlmanacError> {
        self.generator
            .generate(self.clock.today(), self.config.days_ahead)
            .await
    }

    /// Cleanup with the configured retention.
    pub async fn cleanup_expired(&self) -> Result<usize, AlmanacError> {
        self.retention.cleanup(self.config.retention_days).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceId, InstanceStatus, Recurrence, RecurrenceRule, SkipReason};
    use crate::impls::{InMemoryArchive, InMemoryKeyValueStore};
    use crate::ports::{FixedClock, KeyValueStore};
    use chrono::NaiveDate;
    use serde_json::json;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn engine_on(
        today: NaiveDate,
        config: EngineConfig,
    ) -> (Arc<InMemoryKeyValueStore>, Arc<InMemoryArchive>, CalendarEngine) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::on(today));
        let archive = Arc::new(InMemoryArchive::new(clock.clone()));
        let engine = CalendarEngine::builder()
            .store(kv.clone())
            .archive(archive.clone())
            .clock(clock)
            .config(config)
            .build()
            .unwrap();
        (kv, archive, engine)
    }

    #[tokio::test]
    async fn weekly_rule_end_to_end() {
        let (kv, archive, engine) = engine_on(d(3, 4), EngineConfig::default());
        kv.set(
            "recurringEvents",
            json!([{ "id": "r1", "name": "Team sync", "active": true,
                     "recurrence": { "type": "weekly", "dayOfWeek": 1 } }]),
        )
        .await
        .unwrap();

        let generation = engine.generator().generate(d(3, 4), 14).await.unwrap();
        assert_eq!(generation.added, 2);
        let dates: Vec<_> = generation.instances.iter().map(|i| i.date).collect();
        assert_eq!(dates, vec![d(3, 4), d(3, 11)]);
        assert!(generation.instances.iter().all(|i| i.status == InstanceStatus::Pending));

        // complete one, reschedule the other
        engine
            .lifecycle()
            .complete(&InstanceId::new("r1_2024-03-04"))
            .await
            .unwrap();
        let moved = engine
            .lifecycle()
            .reschedule(&InstanceId::new("r1_2024-03-11"), d(3, 13))
            .await
            .unwrap();
        assert_eq!(archive.len().await, 1);

        let all = engine.queries().all().await.unwrap();
        assert_eq!(all.len(), 3);
        let source = all.iter().find(|i| i.date == d(3, 11)).unwrap();
        assert_eq!(source.skipped_reason, Some(SkipReason::Rescheduled));
        assert_eq!(engine.queries().by_date(d(3, 13)).await.unwrap(), vec![moved]);

        // regenerating the same window re-creates the rescheduled-away date
        let again = engine.generator().generate(d(3, 4), 14).await.unwrap();
        assert_eq!(again.added, 1);
        assert_eq!(engine.queries().by_date(d(3, 11)).await.unwrap().len(), 1);

        let stats = engine.queries().stats().await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
    }

    #[tokio::test]
    async fn generate_upcoming_uses_config_window() {
        let config = EngineConfig {
            days_ahead: 7,
            ..EngineConfig::default()
        };
        let (_, _, engine) = engine_on(d(3, 4), config);
        engine
            .rules()
            .save(&[RecurrenceRule::new("daily-ish", "Stretch", Recurrence::IntervalDays {
                start_date: d(3, 1),
                interval: 1,
            })])
            .await
            .unwrap();

        let generation = engine.generate_upcoming().await.unwrap();

        assert_eq!(generation.added, 7);
        assert_eq!(generation.instances.first().map(|i| i.date), Some(d(3, 4)));
        assert_eq!(generation.instances.last().map(|i| i.date), Some(d(3, 10)));
    }

    #[tokio::test]
    async fn cleanup_expired_uses_config_retention() {
        let config = EngineConfig {
            retention_days: 10,
            ..EngineConfig::default()
        };
        let (_, _, engine) = engine_on(d(3, 31), config);
        engine
            .rules()
            .save(&[RecurrenceRule::new("r", "x", Recurrence::MonthlyDate { date: 1 })])
            .await
            .unwrap();
        engine.generator().generate(d(3, 1), 1).await.unwrap();
        engine.lifecycle().skip(&InstanceId::new("r_2024-03-01")).await.unwrap();

        assert_eq!(engine.cleanup_expired().await.unwrap(), 1);
        assert!(engine.queries().all().await.unwrap().is_empty());
    }
}
