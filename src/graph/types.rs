//! 依赖图类型定义
//!
//! 定义任务节点、遍历策略、快照与图错误类型

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TaskId = String;

/// 采集任务节点
///
/// `dependencies` 是节点级的依赖标记集合，随 `add_dependency` 增量维护；
/// 边本身（含权重）由图结构单独记录，两者可以不一致（见 `DependencyGraph::add_dependency`）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskNode {
    /// 图内唯一标识
    pub id: TaskId,
    /// 资源定位符
    #[serde(default)]
    pub url: String,
    /// 内容类型标签
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// 调度优先级，越大越靠前
    #[serde(default = "default_priority")]
    pub priority: f64,
    /// 依赖的任务标识集合
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,
    /// 开放式元数据
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

fn default_content_type() -> String {
    "unknown".to_string()
}

fn default_priority() -> f64 {
    1.0
}

impl TaskNode {
    /// 创建节点，内容类型与优先级取默认值
    pub fn new(id: impl Into<TaskId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            content_type: default_content_type(),
            priority: default_priority(),
            dependencies: BTreeSet::new(),
            metadata: serde_json::Map::new(),
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// 设置内容类型
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// 遍历策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalStrategy {
    /// 拓扑排序，先决任务在前；有环时回退确定性 DFS
    Dependency,
    /// 优先级降序，同优先级按标识升序
    Priority,
    /// 深度优先前序
    Dfs,
    /// 广度优先层序
    Bfs,
}

impl TraversalStrategy {
    /// 解析策略名；未知名称立即失败，不做任何回退
    pub fn parse(name: &str) -> Result<Self, GraphError> {
        match name {
            "dependency" => Ok(Self::Dependency),
            "priority" => Ok(Self::Priority),
            "dfs" => Ok(Self::Dfs),
            "bfs" => Ok(Self::Bfs),
            other => Err(GraphError::UnknownStrategy(other.to_string())),
        }
    }
}

/// 图错误类型
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown traversal strategy: {0}")]
    UnknownStrategy(String),
}

/// 图快照：全部节点与带权边，纯内存结构，落盘由调用方负责
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<TaskNode>,
    pub edges: Vec<EdgeSnapshot>,
}

/// 快照中的有向边：source 为先决任务，target 为依赖它的任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: TaskId,
    pub target: TaskId,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_strategies() {
        assert_eq!(
            TraversalStrategy::parse("dependency").unwrap(),
            TraversalStrategy::Dependency
        );
        assert_eq!(
            TraversalStrategy::parse("priority").unwrap(),
            TraversalStrategy::Priority
        );
        assert_eq!(TraversalStrategy::parse("dfs").unwrap(), TraversalStrategy::Dfs);
        assert_eq!(TraversalStrategy::parse("bfs").unwrap(), TraversalStrategy::Bfs);
    }

    #[test]
    fn test_parse_unknown_strategy_fails() {
        let err = TraversalStrategy::parse("random").unwrap_err();
        assert!(matches!(err, GraphError::UnknownStrategy(_)));
        assert!(err.to_string().contains("random"));
    }

    #[test]
    fn test_task_node_defaults() {
        let node = TaskNode::new("n1", "https://example.com");
        assert_eq!(node.content_type, "unknown");
        assert_eq!(node.priority, 1.0);
        assert!(node.dependencies.is_empty());
    }
}
