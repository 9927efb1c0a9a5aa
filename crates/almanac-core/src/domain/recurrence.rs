//! Recurrence descriptors and the occurrence matcher.
//!
//! 記述子は 5 種類の閉じた集合です。
//!
//! # 学習ポイント
//! - `#[serde(tag = "type")]` による内部タグ付き enum
//! - `#[serde(other)]` で未知の種類を [`Recurrence::Unknown`] に落とす
//!   （マッチしないだけで、他のルールの生成は止めない）
//! - `matches` は全域関数：壊れた記述子は false を返すだけ

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::calendar;

/// First month of each quarter, 0-indexed (Jan, Apr, Jul, Oct).
pub const QUARTER_START_MONTHS: [u32; 4] = [0, 3, 6, 9];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Every month on day-of-month `date`.
    MonthlyDate { date: u32 },

    /// Every week on `day_of_week` (0 = Sunday .. 6 = Saturday).
    Weekly {
        #[serde(rename = "dayOfWeek")]
        day_of_week: u32,
    },

    /// Every `interval` days counted from `start_date`.
    IntervalDays {
        #[serde(rename = "startDate", with = "calendar::lenient_date")]
        start_date: NaiveDate,
        interval: u32,
    },

    /// On day `date` of the first month of each quarter.
    Quarterly { date: u32 },

    /// Every year on the day and month of `date`; its year is ignored.
    Yearly {
        #[serde(with = "calendar::lenient_date")]
        date: NaiveDate,
    },

    /// A kind this build does not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Why a descriptor can never produce an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecurrence {
    #[error("unknown recurrence kind")]
    UnknownKind,

    #[error("day of month {0} is outside 1..=31")]
    DayOfMonthOutOfRange(u32),

    #[error("day of week {0} is outside 0..=6")]
    WeekdayOutOfRange(u32),

    #[error("interval must be at least one day")]
    ZeroInterval,
}

impl Recurrence {
    pub fn kind(&self) -> &'static str {
        match self {
            Recurrence::MonthlyDate { .. } => "monthly_date",
            Recurrence::Weekly { .. } => "weekly",
            Recurrence::IntervalDays { .. } => "interval_days",
            Recurrence::Quarterly { .. } => "quarterly",
            Recurrence::Yearly { .. } => "yearly",
            Recurrence::Unknown => "unknown",
        }
    }

    /// Report descriptors that are structurally valid but can never match.
    ///
    /// The matcher does not depend on this; it is for diagnostics when rules
    /// are loaded.
    pub fn validate(&self) -> Result<(), MalformedRecurrence> {
        match *self {
            Recurrence::MonthlyDate { date } | Recurrence::Quarterly { date }
                if !(1..=31).contains(&date) =>
            {
                Err(MalformedRecurrence::DayOfMonthOutOfRange(date))
            }
            Recurrence::Weekly { day_of_week } if day_of_week > 6 => {
                Err(MalformedRecurrence::WeekdayOutOfRange(day_of_week))
            }
            Recurrence::IntervalDays { interval: 0, .. } => Err(MalformedRecurrence::ZeroInterval),
            Recurrence::Unknown => Err(MalformedRecurrence::UnknownKind),
            _ => Ok(()),
        }
    }
}

/// Serde adapter for the snapshot stored on instances.
///
/// The engine never reads a snapshot back, so one it cannot decode becomes
/// [`Recurrence::Unknown`] instead of failing the whole collection.
pub mod snapshot {
    use serde::{Deserialize, Deserializer};

    use super::Recurrence;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Recurrence, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(raw).unwrap_or_default())
    }
}

/// Is `date` an occurrence of `recurrence`?
///
/// Pure and total: malformed descriptors simply never match.
pub fn matches(date: NaiveDate, recurrence: &Recurrence) -> bool {
    match *recurrence {
        Recurrence::MonthlyDate { date: day } => date.day() == day,
        Recurrence::Weekly { day_of_week } => date.weekday().num_days_from_sunday() == day_of_week,
        Recurrence::IntervalDays {
            start_date,
            interval,
        } => {
            if interval == 0 {
                return false;
            }
            let offset = calendar::days_between(start_date, date);
            offset >= 0 && offset % i64::from(interval) == 0
        }
        Recurrence::Quarterly { date: day } => {
            QUARTER_START_MONTHS.contains(&date.month0()) && date.day() == day
        }
        Recurrence::Yearly { date: reference } => {
            date.day() == reference.day() && date.month() == reference.month()
        }
        Recurrence::Unknown => false,
    }
}
