//! EngineConfig - エンジンの設定
//!
//! すべてのフィールドにデフォルトがあるので、空のドキュメントや
//! 空の環境変数からでも動く設定になります。
//!
//! # 環境変数
//! - `ALMANAC_NAMESPACE`
//! - `ALMANAC_DAYS_AHEAD`
//! - `ALMANAC_RETENTION_DAYS`

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_DAYS_AHEAD: u32 = 60;
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

pub const RULES_KEY: &str = "recurringEvents";
pub const INSTANCES_KEY: &str = "calendarInstances";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix shared with the rest of the system's storage keys.
    pub namespace: String,

    /// Generation window length in days after the start date.
    pub days_ahead: u32,

    /// Completed/skipped instances older than this are removed by cleanup.
    pub retention_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            days_ahead: DEFAULT_DAYS_AHEAD,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl EngineConfig {
    /// Read `ALMANAC_NAMESPACE`, `ALMANAC_DAYS_AHEAD`, `ALMANAC_RETENTION_DAYS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            namespace: lookup("ALMANAC_NAMESPACE").unwrap_or(defaults.namespace),
            days_ahead: parse_days(&lookup, "ALMANAC_DAYS_AHEAD", defaults.days_ahead),
            retention_days: parse_days(&lookup, "ALMANAC_RETENTION_DAYS", defaults.retention_days),
        }
    }

    pub fn rules_key(&self) -> String {
        format!("{}{}", self.namespace, RULES_KEY)
    }

    pub fn instances_key(&self) -> String {
        format!("{}{}", self.namespace, INSTANCES_KEY)
    }
}

fn parse_days(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32) -> u32 {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, default, "not a day count; using default");
            default
        }),
    }
}
