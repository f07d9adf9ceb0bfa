//! 任务依赖图
//!
//! 有向图建模采集任务间的先决关系：遍历排序（拓扑 / 优先级 / DFS / BFS）、
//! 介数中心性瓶颈检测、供报告协作方使用的快照导出。

mod centrality;
mod engine;
mod types;

pub use engine::DependencyGraph;
pub use types::{EdgeSnapshot, GraphError, GraphSnapshot, TaskId, TaskNode, TraversalStrategy};
