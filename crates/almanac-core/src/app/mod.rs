//! App - アプリケーション層
//!
//! ports と store を組み合わせてエンジンの操作を実装します。
//!
//! # 主要コンポーネント
//! - **EngineBuilder / CalendarEngine**: ワイヤリング
//! - **InstanceGenerator**: ルール → 日付つきインスタンス
//! - **LifecycleController**: complete / reschedule / skip
//! - **QueryService**: 読み取り専用のビュー
//! - **Retention**: 古い完了済みインスタンスの削除

pub mod builder;
pub mod engine;
pub mod generator;
pub mod lifecycle;
pub mod query;
pub mod retention;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, EngineBuilder};
pub use self::engine::CalendarEngine;
pub use self::generator::{Generation, InstanceGenerator, plan_instances};
pub use self::lifecycle::LifecycleController;
pub use self::query::{InstanceStats, OverdueInstance, QueryService};
pub use self::retention::Retention;
