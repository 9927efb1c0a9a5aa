//! Domain - ドメインモデル
//!
//! ids / calendar / recurrence / rule / instance / archive を定義します。
//!
//! # 設計原則
//! - 純粋なデータと純粋な関数のみ（ストレージ・時計には触れない）
//! - 状態遷移はメソッド経由（フィールドを直接書き換えない）

pub mod archive;
pub mod calendar;
pub mod ids;
pub mod instance;
pub mod recurrence;
pub mod rule;

pub use archive::{ArchiveRecord, CALENDAR_MODULE};
pub use ids::{InstanceId, RuleId};
pub use instance::{InstanceStatus, SkipReason, TaskInstance};
pub use recurrence::{MalformedRecurrence, Recurrence, matches};
pub use rule::RecurrenceRule;
