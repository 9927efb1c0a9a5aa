//! EngineBuilder - エンジンの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - ports を Arc<dyn ...> として注入

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::impls::NoopArchive;
use crate::ports::{ArchiveSink, Clock, KeyValueStore, SystemClock};
use crate::store::{InstanceStore, RuleStore};

use super::engine::CalendarEngine;
use super::generator::InstanceGenerator;
use super::lifecycle::LifecycleController;
use super::query::QueryService;
use super::retention::Retention;

/// EngineBuilder はエンジンを構築
///
/// # 使用例
/// ```ignore
/// let engine = EngineBuilder::new()
///     .store(Arc::new(InMemoryKeyValueStore::new()))
///     .archive(archive)
///     .config(EngineConfig::from_env())
///     .build()?;
/// ```
///
/// # デフォルト
/// - archive: NoopArchive
/// - clock: SystemClock
/// - config: EngineConfig::default()
pub struct EngineBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    archive: Option<Arc<dyn ArchiveSink>>,
    clock: Option<Arc<dyn Clock>>,
}

/// BuildError はエンジン構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No key-value store was supplied. Call store(..) before build().")]
    MissingStore,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            store: None,
            archive: None,
            clock: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn archive(mut self, archive: Arc<dyn ArchiveSink>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 全コンポーネントを同じ store / clock で組み立てる
    pub fn build(self) -> Result<CalendarEngine, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let archive = self.archive.unwrap_or_else(|| Arc::new(NoopArchive));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let rules = RuleStore::new(store.clone(), self.config.rules_key());
        let instances = InstanceStore::new(store, self.config.instances_key());

        Ok(CalendarEngine {
            generator: InstanceGenerator::new(rules.clone(), instances.clone(), clock.clone()),
            lifecycle: LifecycleController::new(instances.clone(), archive, clock.clone()),
            queries: QueryService::new(instances.clone(), clock.clone()),
            retention: Retention::new(instances, clock.clone()),
            rules,
            clock,
            config: self.config,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryKeyValueStore;

    #[test]
    fn test_build_success() {
        let engine = EngineBuilder::new()
            .store(Arc::new(InMemoryKeyValueStore::new()))
            .build();
        assert!(engine.is_ok());
    }

    #[test]
    fn test_build_missing_store() {
        let engine = EngineBuilder::new().config(EngineConfig::default()).build();
        assert!(matches!(engine, Err(BuildError::MissingStore)));
    }

    #[test]
    fn test_build_uses_namespaced_keys() {
        let engine = EngineBuilder::new()
            .store(Arc::new(InMemoryKeyValueStore::new()))
            .config(EngineConfig {
                namespace: "tm_".to_string(),
                ..EngineConfig::default()
            })
            .build()
            .unwrap();
        assert_eq!(engine.rules().key(), "tm_recurringEvents");
    }
}
