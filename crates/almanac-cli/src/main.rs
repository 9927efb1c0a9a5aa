use std::sync::Arc;

use almanac_core::domain::{Recurrence, RecurrenceRule};
use almanac_core::impls::{InMemoryArchive, InMemoryKeyValueStore};
use almanac_core::ports::{Clock, SystemClock};
use almanac_core::{CalendarEngine, EngineConfig};
use chrono::{Datelike, Days};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    // (A) store / archive / clock を用意してエンジンを組み立てる
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(InMemoryKeyValueStore::new());
    let archive = Arc::new(InMemoryArchive::new(clock.clone()));
    let engine = CalendarEngine::builder()
        .store(store)
        .archive(archive.clone())
        .clock(clock.clone())
        .config(EngineConfig::from_env())
        .build()?;

    // (B) ルールを投入（本来はルール編集側の責務）
    let today = clock.today();
    engine
        .rules()
        .save(&[
            RecurrenceRule::new("rent", "Pay rent", Recurrence::MonthlyDate { date: 1 })
                .with_project("home"),
            RecurrenceRule::new("sync", "Team sync", Recurrence::Weekly {
                day_of_week: today.weekday().num_days_from_sunday(),
            })
            .with_time("10:00"),
            RecurrenceRule::new("filter", "Change water filter", Recurrence::IntervalDays {
                start_date: today,
                interval: 45,
            }),
            RecurrenceRule::new("taxes", "Quarterly taxes", Recurrence::Quarterly { date: 15 }),
        ])
        .await?;

    // (C) 生成
    let generation = engine.generate_upcoming().await?;
    tracing::info!(
        added = generation.added,
        total = generation.instances.len(),
        "generated upcoming instances"
    );

    // (D) 今日の分を完了、次の分を翌日へ移動
    let due_today = engine.queries().by_date(today).await?;
    for instance in &due_today {
        engine.lifecycle().complete(&instance.id).await?;
    }
    if let Some(next) = engine
        .queries()
        .all()
        .await?
        .into_iter()
        .find(|i| i.is_pending() && i.date > today)
    {
        let new_date = next.date.checked_add_days(Days::new(1)).unwrap_or(next.date);
        engine.lifecycle().reschedule(&next.id, new_date).await?;
    }

    // (E) ビューを表示
    println!("stats: {}", serde_json::to_string_pretty(&engine.queries().stats().await?)?);
    println!("overdue: {}", serde_json::to_string_pretty(&engine.queries().overdue(None).await?)?);
    println!("archive: {}", serde_json::to_string_pretty(&archive.entries().await)?);
    let removed = engine.cleanup_expired().await?;
    tracing::info!(removed, "retention cleanup finished");

    Ok(())
}
