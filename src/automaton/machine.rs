//! 状态机实例：迁移校验、历史记录与模式统计
//!
//! 历史与计数由单个实例独占，生命周期随实例；重置只能通过新建实例。
//! 单线程使用，多线程共享需调用方自行加锁。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::automaton::state::AgentState;

/// 采集 Agent 状态机，初始状态 Idle
#[derive(Debug)]
pub struct StateMachine {
    current: AgentState,
    /// 访问过的状态序列（只追加），含初始 Idle
    history: Vec<AgentState>,
    /// (from, to) -> 观测次数
    transition_counts: BTreeMap<(AgentState, AgentState), u64>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: AgentState::Idle,
            history: vec![AgentState::Idle],
            transition_counts: BTreeMap::new(),
        }
    }

    pub fn current_state(&self) -> AgentState {
        self.current
    }

    pub fn history(&self) -> &[AgentState] {
        &self.history
    }

    /// 尝试迁移；目标不在当前状态的允许集合内时返回 false 且状态不变。
    /// 不抛错误，调用方按返回值自行路由到 Error / Recovery。
    pub fn transition_to(&mut self, target: AgentState) -> bool {
        if !self.current.allowed_transitions().contains(&target) {
            tracing::warn!("Invalid transition from {} to {}", self.current, target);
            return false;
        }

        let from = self.current;
        self.current = target;
        self.history.push(target);
        *self.transition_counts.entry((from, target)).or_insert(0) += 1;

        tracing::debug!("State transition: {} -> {}", from, target);
        true
    }

    /// 当前状态的允许迁移目标（迁移表无死端，永不为空）
    pub fn get_valid_transitions(&self) -> &'static [AgentState] {
        self.current.allowed_transitions()
    }

    /// 迁移模式统计；零迁移时返回空报告（序列化为 `{}`），不做除零
    pub fn analyze_transition_patterns(&self) -> TransitionReport {
        let total: u64 = self.transition_counts.values().sum();
        if total == 0 {
            return TransitionReport::default();
        }

        let mut patterns = BTreeMap::new();
        for ((from, to), count) in &self.transition_counts {
            patterns.insert(
                format!("{}->{}", from, to),
                TransitionStat {
                    count: *count,
                    probability: *count as f64 / total as f64,
                },
            );
        }

        let error_count: u64 = self
            .transition_counts
            .iter()
            .filter(|((_, to), _)| *to == AgentState::Error)
            .map(|(_, count)| count)
            .sum();

        // 并列时取迭代序中先出现的键；跨实现不保证稳定
        let most_common_path = patterns
            .iter()
            .fold(None::<(&String, u64)>, |best, (key, stat)| match best {
                Some((_, count)) if stat.count <= count => best,
                _ => Some((key, stat.count)),
            })
            .map(|(key, _)| key.clone())
            .unwrap_or_default();

        TransitionReport {
            patterns,
            analysis: Some(TransitionSummary {
                total_transitions: total,
                error_rate: error_count as f64 / total as f64,
                most_common_path,
            }),
        }
    }
}

/// 迁移模式报告：`"from->to"` 键平铺在顶层，与 `analysis` 汇总并列
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransitionReport {
    #[serde(flatten)]
    pub patterns: BTreeMap<String, TransitionStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TransitionSummary>,
}

/// 单个 (from, to) 对的观测统计
#[derive(Debug, Clone, Serialize)]
pub struct TransitionStat {
    pub count: u64,
    pub probability: f64,
}

/// 汇总：总迁移数、落入 Error 的比例、最高频迁移
#[derive(Debug, Clone, Serialize)]
pub struct TransitionSummary {
    pub total_transitions: u64,
    pub error_rate: f64,
    pub most_common_path: String,
}
