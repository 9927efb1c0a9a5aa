//! almanac-core
//!
//! Recurrence-based task instance generation and lifecycle engine.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, calendar, recurrence, rule, instance, archive）
//! - **ports**: 抽象化レイヤー（KeyValueStore, ArchiveSink, Clock）
//! - **store**: KeyValueStore 上のコレクション（RuleStore, InstanceStore）
//! - **app**: アプリケーションロジック（builder, generator, lifecycle, query, retention）
//! - **impls**: 実装（InMemoryKeyValueStore, InMemoryArchive など開発用）
//! - **config**: EngineConfig
//! - **error**: AlmanacError

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod store;

pub use app::{CalendarEngine, EngineBuilder};
pub use config::EngineConfig;
pub use error::AlmanacError;
