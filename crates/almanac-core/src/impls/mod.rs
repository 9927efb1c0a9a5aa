//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryKeyValueStore**: インメモリのドキュメントストア
//! - **InMemoryArchive**: インメモリの完了履歴
//! - **NoopArchive**: 何もしない ArchiveSink
//!
//! ブラウザストレージなど本番用の実装はこのクレートの外に置きます。

pub mod inmem_archive;
pub mod inmem_kv;
pub mod noop_archive;

// 主要な型を再エクスポート
pub use self::inmem_archive::{ArchivedTask, InMemoryArchive};
pub use self::inmem_kv::InMemoryKeyValueStore;
pub use self::noop_archive::NoopArchive;
