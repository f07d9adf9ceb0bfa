//! 场景输入与分析报告类型
//!
//! 边界契约是纯结构化数据（JSON 兼容）：场景输入、分析报告、三类快照。

use serde::{Deserialize, Serialize};

use crate::analysis::ComplexityMetrics;
use crate::automaton::TransitionReport;
use crate::graph::{GraphSnapshot, TaskId};
use crate::policy::PolicySnapshot;

/// 一批采集任务与内容样本组成的分析场景
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    /// 待调度的资源描述符
    #[serde(default)]
    pub urls: Vec<TaskSpec>,
    /// 待分析的原始文本样本
    #[serde(default)]
    pub content_samples: Vec<String>,
}

/// 场景中的单个资源描述符
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSpec {
    pub id: TaskId,
    #[serde(default)]
    pub url: String,
    /// 内容类型标签，缺省 "unknown"
    #[serde(default = "default_content_type", rename = "type")]
    pub content_type: String,
    #[serde(default = "default_priority")]
    pub priority: f64,
    /// 先决任务标识列表
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

fn default_content_type() -> String {
    "unknown".to_string()
}

fn default_priority() -> f64 {
    1.0
}

/// `analyze` 的聚合结果；输入相同则结果相同（恢复建议走贪心投影，不含探索随机性）
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// 报告标识，形如 scn_<uuid>
    pub report_id: String,
    /// 生成时间（Unix 毫秒）
    pub generated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_analysis: Option<GraphAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_analysis: Option<InformationAnalysis>,
    pub automaton_analysis: TransitionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_analysis: Option<PolicyAnalysis>,
    pub recommendations: Vec<String>,
}

/// 图分析结果：dependency 策略遍历序 + 瓶颈节点
#[derive(Debug, Clone, Serialize)]
pub struct GraphAnalysis {
    pub optimal_order: Vec<TaskId>,
    pub bottlenecks: Vec<TaskId>,
}

/// 内容分析结果：逐样本指标与均值
#[derive(Debug, Clone, Serialize)]
pub struct InformationAnalysis {
    pub avg_entropy: f64,
    pub avg_complexity: f64,
    pub content_metrics: Vec<ComplexityMetrics>,
}

/// 策略分析结果：error 状态下的贪心恢复动作
#[derive(Debug, Clone, Serialize)]
pub struct PolicyAnalysis {
    pub recommended_recovery_action: String,
}

/// 三类快照打包导出；落盘由调用方负责
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotBundle {
    pub graph: GraphSnapshot,
    pub transitions: TransitionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicySnapshot>,
}
