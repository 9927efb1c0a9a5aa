//! Domain identifiers (strongly-typed string IDs).
//!
//! # ID の決め方
//! - **RuleId**: ルールの所有者が決める（エンジンは生成しない）
//! - **InstanceId**: `<rule>_<date>` で決定的に導出する
//!   （同じ発生日は常に同じ id になる）
//! - ワイヤ上はどちらもただの文字列
//!
//! ## Phantom Type パターン
//! `Id<T>` で共通実装を持ちつつ、マーカー型 `T` によって
//! `RuleId` を `InstanceId` の位置に渡すとコンパイルエラーになります。

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

use super::calendar;

/// Marker trait for the kinds of id.
pub trait IdMarker: Send + Sync + 'static {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Rule のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {}

impl IdMarker for Rule {}

/// Instance のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instance {}

impl IdMarker for Instance {}

/// Identifier of a recurrence rule.
pub type RuleId = Id<Rule>;

/// Identifier of a dated task instance.
pub type InstanceId = Id<Instance>;

impl InstanceId {
    /// `<rule>_<date>`: the id of a freshly generated occurrence.
    pub fn for_occurrence(rule_id: &RuleId, date: NaiveDate) -> Self {
        Self::new(format!("{}_{}", rule_id, calendar::format_iso(date)))
    }

    /// `<rule>_<date>_rescheduled_<millis>`: the id of a rescheduled copy.
    pub fn for_reschedule(rule_id: &RuleId, date: NaiveDate, stamp_ms: i64) -> Self {
        Self::new(format!(
            "{}_{}_rescheduled_{}",
            rule_id,
            calendar::format_iso(date),
            stamp_ms
        ))
    }
}
