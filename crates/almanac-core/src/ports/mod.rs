//! Ports - 抽象化レイヤー
//!
//! このモジュールはエンジンが依存する外部コラボレーターの「ポート」を定義します。
//! 各 trait は能力（capability）単位で切り出してあり、グローバルな
//! オブジェクトに直接触れることはありません。
//!
//! # 設計原則
//! - インスタンスコレクションは KeyValueStore 上の 1 ドキュメントが正本
//! - アーカイブは ArchiveSink 経由の二次的な副作用
//! - 時刻は Clock から取得（テストで固定できる）

pub mod archive_sink;
pub mod clock;
pub mod kv_store;

// 主要な trait を再エクスポート
pub use self::archive_sink::{ArchiveError, ArchiveSink};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::kv_store::{KeyValueStore, StoreError};
