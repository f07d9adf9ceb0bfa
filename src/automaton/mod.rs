//! 采集 Agent 状态机
//!
//! 固定迁移表的有限自动机：校验并记录 Agent 的运行状态迁移，
//! 统计 (from, to) 迁移模式供编排器与报告协作方使用。

mod machine;
mod state;

pub use machine::{StateMachine, TransitionReport, TransitionStat, TransitionSummary};
pub use state::AgentState;
