//! 场景编排器
//!
//! 组合依赖图、状态机、内容分析与恢复策略：对一个场景产出遍历序、
//! 瓶颈、复杂度均值与阈值规则建议。图按场景重建；状态机与策略引擎
//! 跨场景持有（反馈回路持续学习）。组件间显式传引用，不设全局注册表。

use crate::analysis::complexity_score;
use crate::automaton::StateMachine;
use crate::config::AppConfig;
use crate::core::scenario::{
    GraphAnalysis, InformationAnalysis, PolicyAnalysis, Scenario, ScenarioReport, SnapshotBundle,
    TaskSpec,
};
use crate::graph::{DependencyGraph, TaskNode, TraversalStrategy};
use crate::policy::PolicyEngine;

/// 决策核心编排器（单实例单线程；每个 worker 各持一个实例）
pub struct Orchestrator {
    config: AppConfig,
    graph: DependencyGraph,
    machine: StateMachine,
    policy: Option<PolicyEngine>,
}

impl Orchestrator {
    pub(crate) fn assemble(
        config: AppConfig,
        machine: StateMachine,
        policy: Option<PolicyEngine>,
    ) -> Self {
        Self {
            config,
            graph: DependencyGraph::new(),
            machine,
            policy,
        }
    }

    /// 分析一个场景；输入相同则输出相同（恢复建议取贪心投影，不触发探索）
    pub fn analyze(&mut self, scenario: &Scenario) -> ScenarioReport {
        let graph_analysis = if scenario.urls.is_empty() {
            None
        } else {
            Some(self.analyze_tasks(&scenario.urls))
        };

        let information_analysis = if scenario.content_samples.is_empty() {
            None
        } else {
            Some(analyze_samples(&scenario.content_samples))
        };

        let policy_analysis = self.policy.as_ref().map(|policy| PolicyAnalysis {
            recommended_recovery_action: policy.greedy_action("error").to_string(),
        });

        let recommendations =
            self.derive_recommendations(graph_analysis.as_ref(), information_analysis.as_ref());

        tracing::info!(
            tasks = scenario.urls.len(),
            samples = scenario.content_samples.len(),
            recommendations = recommendations.len(),
            "Scenario analysis complete"
        );

        ScenarioReport {
            report_id: format!("scn_{}", uuid::Uuid::new_v4()),
            generated_at: chrono::Utc::now().timestamp_millis(),
            graph_analysis,
            information_analysis,
            automaton_analysis: self.machine.analyze_transition_patterns(),
            policy_analysis,
            recommendations,
        }
    }

    /// 注册任务、接线声明的依赖（先决 -> 依赖方），计算遍历序与瓶颈
    fn analyze_tasks(&mut self, specs: &[TaskSpec]) -> GraphAnalysis {
        self.graph = DependencyGraph::new();

        for spec in specs {
            let mut node = TaskNode::new(spec.id.clone(), spec.url.clone())
                .with_priority(spec.priority)
                .with_content_type(spec.content_type.clone());
            node.dependencies = spec.dependencies.iter().cloned().collect();
            node.metadata = spec.metadata.clone();
            self.graph.add_node(node);
        }
        for spec in specs {
            for prerequisite in &spec.dependencies {
                self.graph.add_dependency_default(prerequisite, &spec.id);
            }
        }

        GraphAnalysis {
            optimal_order: self.graph.order_by(TraversalStrategy::Dependency),
            bottlenecks: self
                .graph
                .detect_bottlenecks(self.config.graph.bottleneck_percentile),
        }
    }

    /// 阈值规则推导建议
    fn derive_recommendations(
        &self,
        graph: Option<&GraphAnalysis>,
        information: Option<&InformationAnalysis>,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if graph.map_or(false, |g| !g.bottlenecks.is_empty()) {
            recommendations.push("Implement parallel processing for bottleneck nodes".to_string());
        }

        if let Some(info) = information {
            if info.avg_entropy > self.config.analysis.entropy_alert_threshold {
                recommendations
                    .push("High content entropy detected - implement content filtering".to_string());
            }
            if info.avg_complexity > self.config.analysis.complexity_alert_threshold {
                recommendations.push(
                    "Complex content structure - use advanced parsing strategies".to_string(),
                );
            }
        }

        recommendations
    }

    /// 反馈回路：把 (状态, 动作, 回报, 下一状态) 喂给策略引擎
    pub fn record_feedback(&mut self, state: &str, action: &str, reward: f64, next_state: &str) {
        if let Some(policy) = self.policy.as_mut() {
            policy.update(state, action, reward, next_state);
        }
    }

    /// epsilon-greedy 推荐恢复动作（带探索，非确定性路径）
    pub fn recommend_action(&mut self, state: &str) -> Option<&str> {
        self.policy.as_mut().map(|policy| policy.select_action(state))
    }

    /// 状态机只归属本实例；上层通过该引用驱动迁移
    pub fn state_machine(&mut self) -> &mut StateMachine {
        &mut self.machine
    }

    pub fn policy_engine(&self) -> Option<&PolicyEngine> {
        self.policy.as_ref()
    }

    /// 打包导出三类快照（纯内存，落盘由调用方负责）
    pub fn export_snapshots(&self) -> SnapshotBundle {
        SnapshotBundle {
            graph: self.graph.export_snapshot(),
            transitions: self.machine.analyze_transition_patterns(),
            policy: self.policy.as_ref().map(|p| p.export_snapshot()),
        }
    }
}

/// 逐样本复杂度指标与均值
fn analyze_samples(samples: &[String]) -> InformationAnalysis {
    let content_metrics: Vec<_> = samples.iter().map(|s| complexity_score(s)).collect();
    let count = content_metrics.len() as f64;
    InformationAnalysis {
        avg_entropy: content_metrics.iter().map(|m| m.entropy).sum::<f64>() / count,
        avg_complexity: content_metrics.iter().map(|m| m.composite).sum::<f64>() / count,
        content_metrics,
    }
}
