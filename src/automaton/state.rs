//! Agent 运行状态定义
//!
//! 迁移表写成对枚举的穷举 match，非法状态在编译期即不存在，
//! 不用运行时字典查表。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 采集 Agent 的运行状态（闭合集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Idle,
    Connecting,
    Authenticated,
    Scraping,
    Processing,
    Error,
    Recovery,
    Completed,
}

impl AgentState {
    /// 当前状态允许迁移到的目标集合；表中没有死端，Completed -> Idle 允许重启
    pub fn allowed_transitions(self) -> &'static [AgentState] {
        use AgentState::*;
        match self {
            Idle => &[Connecting],
            Connecting => &[Authenticated, Error],
            Authenticated => &[Scraping, Error],
            Scraping => &[Processing, Error, Completed],
            Processing => &[Scraping, Completed, Error],
            Error => &[Recovery, Idle],
            Recovery => &[Connecting, Idle],
            Completed => &[Idle],
        }
    }

    /// 报告/快照中使用的小写名称
    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Idle => "idle",
            AgentState::Connecting => "connecting",
            AgentState::Authenticated => "authenticated",
            AgentState::Scraping => "scraping",
            AgentState::Processing => "processing",
            AgentState::Error => "error",
            AgentState::Recovery => "recovery",
            AgentState::Completed => "completed",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_state_dead_ends() {
        use AgentState::*;
        for state in [
            Idle,
            Connecting,
            Authenticated,
            Scraping,
            Processing,
            Error,
            Recovery,
            Completed,
        ] {
            assert!(
                !state.allowed_transitions().is_empty(),
                "state {state} must not dead-end"
            );
        }
    }

    #[test]
    fn test_lowercase_serialization() {
        let json = serde_json::to_string(&AgentState::Authenticated).unwrap();
        assert_eq!(json, "\"authenticated\"");
    }
}
