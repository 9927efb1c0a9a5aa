//! Store - KeyValueStore 上のコレクション
//!
//! # 含まれるもの
//! - **RuleStore**: ルールコレクションの読み書き
//! - **InstanceStore**: インスタンスコレクション（ライフサイクル状態の正本）

mod instance_store;
mod rule_store;

pub use instance_store::InstanceStore;
pub use rule_store::RuleStore;
