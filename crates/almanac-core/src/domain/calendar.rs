//! Calendar-day arithmetic.
//!
//! エンジン内の日付比較はすべてこのモジュールを通します。
//! インスタンス・ルール・クエリが同じ「日」の単位で一致するためです。
//!
//! # 設計原則
//! - 時刻（time-of-day）とタイムゾーンは見ない
//! - 日付のワイヤ形式は `YYYY-MM-DD`
//! - 古いクライアントが書いたタイムスタンプ付きの日付も受け付ける

use chrono::{Days, NaiveDate};

/// Wire format for calendar dates (`2024-03-04`).
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Whole days from `from` to `to`. Negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// `date - days`, clamped to the earliest representable date.
pub fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// `days_ahead` consecutive days beginning with `start`.
///
/// Half-open: `[start, start + days_ahead)`. Day `start + days_ahead` itself
/// is excluded, so a 14-day window from a Monday holds exactly two Mondays.
pub fn window(start: NaiveDate, days_ahead: u32) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take(days_ahead as usize)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parse `YYYY-MM-DD`, also accepting a full timestamp and keeping only its
/// date part (`2024-05-12T08:00:00Z` -> 2024-05-12).
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(head, ISO_FORMAT).ok()
}

/// Serde adapter for descriptor dates written by older clients, which may
/// carry a time component.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(super::ISO_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {raw}")))
    }
}
