//! Q 学习引擎
//!
//! 状态/动作集在构造时固定；Q 表稠密存储（|S| x |A|），
//! 只通过 `update` 变更，按需 `export_snapshot` 导出，无隐式自动保存。

use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Q 学习超参数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// 学习率 α
    pub learning_rate: f64,
    /// 折扣因子 γ
    pub discount_factor: f64,
    /// 探索率 ε
    pub epsilon: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 0.1,
        }
    }
}

/// 表格型 Q 学习策略引擎（单实例单线程使用）
#[derive(Debug)]
pub struct PolicyEngine {
    states: Vec<String>,
    actions: Vec<String>,
    q_table: Vec<Vec<f64>>,
    state_index: HashMap<String, usize>,
    action_index: HashMap<String, usize>,
    hyper: Hyperparameters,
    rng: StdRng,
}

impl PolicyEngine {
    /// 创建引擎，Q 表全零初始化；随机源取系统熵
    pub fn new(
        states: Vec<String>,
        actions: Vec<String>,
        hyper: Hyperparameters,
    ) -> Self {
        Self::with_rng(states, actions, hyper, StdRng::from_entropy())
    }

    /// 指定种子的可复现构造（测试与可复现实验用）
    pub fn with_seed(
        states: Vec<String>,
        actions: Vec<String>,
        hyper: Hyperparameters,
        seed: u64,
    ) -> Self {
        Self::with_rng(states, actions, hyper, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        states: Vec<String>,
        actions: Vec<String>,
        hyper: Hyperparameters,
        rng: StdRng,
    ) -> Self {
        debug_assert!(!states.is_empty(), "states must not be empty");
        debug_assert!(!actions.is_empty(), "actions must not be empty");

        let state_index = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let action_index = actions
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();
        let q_table = vec![vec![0.0; actions.len()]; states.len()];

        Self {
            states,
            actions,
            q_table,
            state_index,
            action_index,
            hyper,
            rng,
        }
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyper
    }

    /// 未注册的状态名回退到索引 0（刻意的宽松处理，可能掩盖调用方拼写错误，故记日志）
    fn state_idx(&self, state: &str) -> usize {
        match self.state_index.get(state) {
            Some(idx) => *idx,
            None => {
                tracing::warn!("Unknown policy state '{}', falling back to index 0", state);
                0
            }
        }
    }

    /// 未注册的动作名回退到索引 0，同上
    fn action_idx(&self, action: &str) -> usize {
        match self.action_index.get(action) {
            Some(idx) => *idx,
            None => {
                tracing::warn!("Unknown policy action '{}', falling back to index 0", action);
                0
            }
        }
    }

    /// Q 学习更新：Q[s,a] += α (reward + γ max_a' Q[s',a'] - Q[s,a])
    pub fn update(&mut self, state: &str, action: &str, reward: f64, next_state: &str) {
        let s = self.state_idx(state);
        let a = self.action_idx(action);
        let ns = self.state_idx(next_state);

        let max_next_q = self.q_table[ns]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let current = self.q_table[s][a];
        self.q_table[s][a] = current
            + self.hyper.learning_rate
                * (reward + self.hyper.discount_factor * max_next_q - current);
    }

    /// epsilon-greedy 选动作：概率 ε 均匀探索，否则取首个最大 Q 值的动作
    pub fn select_action(&mut self, state: &str) -> &str {
        if self.rng.gen::<f64>() < self.hyper.epsilon {
            let idx = self.rng.gen_range(0..self.actions.len());
            return &self.actions[idx];
        }
        self.greedy_action(state)
    }

    /// 贪心动作（ε = 0 路径）：首个最大 Q 值，并列取最小动作索引
    pub fn greedy_action(&self, state: &str) -> &str {
        let s = self.state_idx(state);
        let row = &self.q_table[s];
        let mut best = 0usize;
        for (idx, q) in row.iter().enumerate().skip(1) {
            if *q > row[best] {
                best = idx;
            }
        }
        &self.actions[best]
    }

    /// 每个状态的贪心动作投影，只读不改 Q 表
    pub fn greedy_policy(&self) -> BTreeMap<String, String> {
        self.states
            .iter()
            .map(|state| (state.clone(), self.greedy_action(state).to_string()))
            .collect()
    }

    /// 读取单个 Q 值（未注册名称同样回退索引 0）
    pub fn q_value(&self, state: &str, action: &str) -> f64 {
        self.q_table[self.state_idx(state)][self.action_idx(action)]
    }

    /// 导出快照；落盘由调用方负责
    pub fn export_snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            states: self.states.clone(),
            actions: self.actions.clone(),
            q_table: self.q_table.clone(),
            hyperparameters: self.hyper,
        }
    }
}

/// 策略模型快照：`{states, actions, q_table, hyperparameters}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub states: Vec<String>,
    pub actions: Vec<String>,
    pub q_table: Vec<Vec<f64>>,
    pub hyperparameters: Hyperparameters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DEFAULT_RECOVERY_ACTIONS, DEFAULT_RECOVERY_STATES};

    fn default_engine(hyper: Hyperparameters) -> PolicyEngine {
        PolicyEngine::with_seed(
            DEFAULT_RECOVERY_STATES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_RECOVERY_ACTIONS.iter().map(|a| a.to_string()).collect(),
            hyper,
            42,
        )
    }

    #[test]
    fn test_update_from_zero_table() {
        let mut engine = default_engine(Hyperparameters::default());
        engine.update("error", "retry", 10.0, "connecting");
        // 全零表 + 全零后继：新值 = α * reward
        assert!((engine.q_value("error", "retry") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_uses_discounted_next_max() {
        let mut engine = default_engine(Hyperparameters::default());
        engine.update("connecting", "retry", 10.0, "error");
        engine.update("error", "escalate", 5.0, "idle");
        // Q[error, escalate] = 0.5；再更新 connecting 时要带上 γ * 0.5
        engine.update("connecting", "retry", 10.0, "error");
        let expected = 1.0 + 0.1 * (10.0 + 0.9 * 0.5 - 1.0);
        assert!((engine.q_value("connecting", "retry") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_names_fall_back_to_index_zero() {
        let mut engine = default_engine(Hyperparameters::default());
        engine.update("no-such-state", "no-such-action", 10.0, "idle");
        // 回退到 (0, 0) = (idle, continue)
        assert!((engine.q_value("idle", "continue") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_selection_is_deterministic() {
        let mut hyper = Hyperparameters::default();
        hyper.epsilon = 0.0;
        let mut engine = default_engine(hyper);
        engine.update("error", "escalate", 10.0, "idle");

        for _ in 0..20 {
            assert_eq!(engine.select_action("error"), "escalate");
        }
    }

    #[test]
    fn test_greedy_tie_breaks_to_lowest_index() {
        let mut hyper = Hyperparameters::default();
        hyper.epsilon = 0.0;
        let mut engine = default_engine(hyper);
        // 全零并列，取动作 0
        assert_eq!(engine.select_action("error"), "continue");
    }

    #[test]
    fn test_exploration_is_reproducible_with_seed() {
        let mut hyper = Hyperparameters::default();
        hyper.epsilon = 1.0;
        let picks_a: Vec<String> = {
            let mut engine = default_engine(hyper);
            (0..10).map(|_| engine.select_action("error").to_string()).collect()
        };
        let picks_b: Vec<String> = {
            let mut engine = default_engine(hyper);
            (0..10).map(|_| engine.select_action("error").to_string()).collect()
        };
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_greedy_policy_covers_all_states() {
        let mut engine = default_engine(Hyperparameters::default());
        engine.update("error", "retry", 10.0, "idle");
        let policy = engine.greedy_policy();
        assert_eq!(policy.len(), DEFAULT_RECOVERY_STATES.len());
        assert_eq!(policy["error"], "retry");
        assert_eq!(policy["idle"], "continue");
    }

    #[test]
    fn test_snapshot_shape() {
        let engine = default_engine(Hyperparameters::default());
        let snapshot = engine.export_snapshot();
        assert_eq!(snapshot.states.len(), 5);
        assert_eq!(snapshot.actions.len(), 5);
        assert_eq!(snapshot.q_table.len(), 5);
        assert!(snapshot.q_table.iter().all(|row| row.len() == 5));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("states").is_some());
        assert!(json.get("actions").is_some());
        assert!(json.get("q_table").is_some());
        assert_eq!(
            json["hyperparameters"]["learning_rate"].as_f64().unwrap(),
            0.1
        );
    }
}
