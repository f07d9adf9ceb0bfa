//! 编排器构建器

use crate::automaton::StateMachine;
use crate::config::AppConfig;
use crate::core::orchestrator::Orchestrator;
use crate::policy::{
    Hyperparameters, PolicyEngine, DEFAULT_RECOVERY_ACTIONS, DEFAULT_RECOVERY_STATES,
};

/// 按配置装配编排器；未设置的项取默认恢复词表与默认超参数
///
/// ```
/// use forager::CoreBuilder;
///
/// let mut core = CoreBuilder::new().seed(42).build();
/// core.record_feedback("error", "retry", 10.0, "connecting");
/// ```
#[derive(Debug, Default)]
pub struct CoreBuilder {
    config: Option<AppConfig>,
    states: Option<Vec<String>>,
    actions: Option<Vec<String>>,
    seed: Option<u64>,
    without_policy: bool,
}

impl CoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定配置（不设则取 `AppConfig::default()`）
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 自定义恢复状态集，覆盖默认词表
    pub fn recovery_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    /// 自定义恢复动作集，覆盖默认词表
    pub fn recovery_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    /// 固定随机种子（优先于配置中的 policy.seed）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 不挂策略引擎：报告省略 policy_analysis，反馈调用成为空操作
    pub fn without_policy(mut self) -> Self {
        self.without_policy = true;
        self
    }

    pub fn build(self) -> Orchestrator {
        let config = self.config.unwrap_or_default();

        let policy = if self.without_policy {
            None
        } else {
            let states = self.states.unwrap_or_else(|| {
                DEFAULT_RECOVERY_STATES.iter().map(|s| s.to_string()).collect()
            });
            let actions = self.actions.unwrap_or_else(|| {
                DEFAULT_RECOVERY_ACTIONS.iter().map(|a| a.to_string()).collect()
            });
            let hyper = Hyperparameters {
                learning_rate: config.policy.learning_rate,
                discount_factor: config.policy.discount_factor,
                epsilon: config.policy.epsilon,
            };
            let engine = match self.seed.or(config.policy.seed) {
                Some(seed) => PolicyEngine::with_seed(states, actions, hyper, seed),
                None => PolicyEngine::new(states, actions, hyper),
            };
            Some(engine)
        };

        tracing::debug!(
            with_policy = policy.is_some(),
            bottleneck_percentile = config.graph.bottleneck_percentile,
            "Orchestrator assembled"
        );

        Orchestrator::assemble(config, StateMachine::new(), policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::Scenario;

    #[test]
    fn test_default_build_has_policy() {
        let mut core = CoreBuilder::new().build();
        let report = core.analyze(&Scenario::default());
        assert!(report.policy_analysis.is_some());
    }

    #[test]
    fn test_without_policy_omits_analysis() {
        let mut core = CoreBuilder::new().without_policy().build();
        // 无策略引擎时反馈是空操作，不 panic
        core.record_feedback("error", "retry", 1.0, "idle");
        let report = core.analyze(&Scenario::default());
        assert!(report.policy_analysis.is_none());
        assert!(core.recommend_action("error").is_none());
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut core = CoreBuilder::new()
            .recovery_states(["ok", "bad"])
            .recovery_actions(["wait", "abort"])
            .seed(1)
            .build();
        for _ in 0..3 {
            core.record_feedback("bad", "abort", 5.0, "ok");
        }
        let engine = core.policy_engine().unwrap();
        assert!(engine.q_value("bad", "abort") > 0.0);
        assert_eq!(engine.greedy_action("bad"), "abort");
    }

    #[test]
    fn test_config_hyperparameters_flow_through() {
        let mut cfg = AppConfig::default();
        cfg.policy.learning_rate = 0.5;
        let mut core = CoreBuilder::new().config(cfg).seed(3).build();
        core.record_feedback("error", "retry", 10.0, "idle");
        // α = 0.5，单步更新后 Q = 5.0
        let engine = core.policy_engine().unwrap();
        assert!((engine.q_value("error", "retry") - 5.0).abs() < 1e-12);
    }
}
