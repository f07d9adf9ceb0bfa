//! 自适应恢复策略
//!
//! 表格型 Q 学习：从 (状态, 动作, 回报, 下一状态) 反馈中学习恢复策略，
//! epsilon-greedy 给出动作建议。随机源显式注入、可设种子。

mod engine;

pub use engine::{Hyperparameters, PolicyEngine, PolicySnapshot};

/// 默认恢复状态集（场景族构建时使用）
pub const DEFAULT_RECOVERY_STATES: [&str; 5] =
    ["idle", "connecting", "scraping", "error", "success"];

/// 默认恢复动作集
pub const DEFAULT_RECOVERY_ACTIONS: [&str; 5] =
    ["continue", "retry", "skip", "escalate", "terminate"];
