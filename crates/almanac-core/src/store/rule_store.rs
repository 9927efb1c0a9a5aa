//! RuleStore - ルールコレクションのローダー
//!
//! # 設計原則
//! - 要素単位でデコードする（1 件の不正なルールで全体を止めない）
//! - デコードできない要素は warn ログを出して捨てる

use std::sync::Arc;

use tracing::warn;

use crate::domain::RecurrenceRule;
use crate::error::AlmanacError;
use crate::ports::KeyValueStore;

/// Reads the rule collection document.
///
/// Decoding is per element: a rule that cannot be decoded is logged and
/// dropped so the remaining rules still generate.
#[derive(Clone)]
pub struct RuleStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl RuleStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> Result<Vec<RecurrenceRule>, AlmanacError> {
        let Some(document) = self.kv.get(&self.key).await? else {
            return Ok(Vec::new());
        };
        let serde_json::Value::Array(items) = document else {
            return Err(AlmanacError::CorruptDocument {
                key: self.key.clone(),
                reason: "expected an array of rules".to_string(),
            });
        };

        let mut rules = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<RecurrenceRule>(item) {
                Ok(rule) => {
                    if let Err(problem) = rule.recurrence.validate() {
                        warn!(rule_id = %rule.id, %problem, "rule can never match");
                    }
                    rules.push(rule);
                }
                Err(e) => warn!(index, error = %e, "skipping undecodable rule"),
            }
        }
        Ok(rules)
    }

    /// Active rules only, in stored order.
    pub async fn active(&self) -> Result<Vec<RecurrenceRule>, AlmanacError> {
        let mut rules = self.load().await?;
        rules.retain(|rule| rule.active);
        Ok(rules)
    }

    /// Replace the whole collection. Used by the owner of the rules, never by
    /// the engine itself.
    pub async fn save(&self, rules: &[RecurrenceRule]) -> Result<(), AlmanacError> {
        let document = encode(&self.key, rules)?;
        self.kv.set(&self.key, document).await?;
        Ok(())
    }
}

pub(crate) fn encode<T: serde::Serialize + ?Sized>(
    key: &str,
    value: &T,
) -> Result<serde_json::Value, AlmanacError> {
    serde_json::to_value(value).map_err(|e| AlmanacError::CorruptDocument {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
