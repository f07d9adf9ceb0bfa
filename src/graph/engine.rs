//! 依赖图引擎
//!
//! 使用节点表与带权边表实现：四种遍历排序、快照导出。
//! 遍历结果始终是已注册节点标识的一个排列；引用未注册节点的边
//! 在遍历中被忽略，但会原样保留在快照里。

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::graph::types::*;

/// 任务依赖图（每个场景重建一个实例，不做跨场景复用）
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// 节点表：标识 -> 节点；BTreeMap 保证字典序遍历
    nodes: BTreeMap<TaskId, TaskNode>,
    /// 边表：(先决任务, 依赖任务) -> 权重，重复插入覆盖权重
    edges: BTreeMap<(TaskId, TaskId), f64>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册节点；同名节点直接覆盖（场景重建时调用方会重复注册刷新后的描述符）
    pub fn add_node(&mut self, node: TaskNode) {
        tracing::debug!("Added node {} to dependency graph", node.id);
        self.nodes.insert(node.id.clone(), node);
    }

    /// 插入有向边：source 为先决任务，target 为依赖它的任务，重复插入覆盖权重
    ///
    /// 注意不对称行为：边无条件记录进边表，
    /// 但节点级 `dependencies` 集合只在 `source` 已注册时更新；
    /// 不会为未注册的标识隐式创建节点。
    pub fn add_dependency(&mut self, source: &str, target: &str, weight: f64) {
        self.edges
            .insert((source.to_string(), target.to_string()), weight);
        if let Some(node) = self.nodes.get_mut(source) {
            node.dependencies.insert(target.to_string());
        }
    }

    /// 权重取默认值 1.0 的便捷形式
    pub fn add_dependency_default(&mut self, source: &str, target: &str) {
        self.add_dependency(source, target, 1.0);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_node(&self, id: &str) -> Option<&TaskNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.nodes.keys()
    }

    /// 按策略名排序；未知策略返回 `GraphError::UnknownStrategy`
    pub fn traversal_order(&self, strategy: &str) -> Result<Vec<TaskId>, GraphError> {
        Ok(self.order_by(TraversalStrategy::parse(strategy)?))
    }

    /// 按已解析的策略排序，总是返回全部已注册节点的一个排列
    pub fn order_by(&self, strategy: TraversalStrategy) -> Vec<TaskId> {
        match strategy {
            TraversalStrategy::Dependency => self.dependency_order(),
            TraversalStrategy::Priority => self.priority_order(),
            TraversalStrategy::Dfs => self.dfs_order(),
            TraversalStrategy::Bfs => self.bfs_order(),
        }
    }

    /// 邻接表：仅包含两端都已注册的边，邻居按字典序
    pub(crate) fn adjacency(&self) -> BTreeMap<&TaskId, Vec<&TaskId>> {
        let mut adjacency: BTreeMap<&TaskId, Vec<&TaskId>> = BTreeMap::new();
        for id in self.nodes.keys() {
            adjacency.insert(id, Vec::new());
        }
        for (source, target) in self.edges.keys() {
            if let (Some(source_key), Some(target_key)) =
                (self.nodes.get_key_value(source), self.nodes.get_key_value(target))
            {
                if let Some(neighbors) = adjacency.get_mut(source_key.0) {
                    neighbors.push(target_key.0);
                }
            }
        }
        adjacency
    }

    /// Kahn 拓扑排序；就绪集合用 BTreeSet 维护，同层任务按字典序出队。
    /// 检测到环时不报错，回退到确定性 DFS 前序遍历。
    fn dependency_order(&self) -> Vec<TaskId> {
        let adjacency = self.adjacency();
        let mut in_degree: BTreeMap<&TaskId, usize> =
            self.nodes.keys().map(|id| (id, 0)).collect();
        for targets in adjacency.values() {
            for target in targets {
                if let Some(degree) = in_degree.get_mut(*target) {
                    *degree += 1;
                }
            }
        }

        let mut ready: BTreeSet<&TaskId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order: Vec<TaskId> = Vec::with_capacity(self.nodes.len());

        while let Some(id) = ready.iter().next().copied() {
            ready.remove(id);
            order.push(id.clone());
            if let Some(targets) = adjacency.get(id) {
                for target in targets {
                    if let Some(degree) = in_degree.get_mut(*target) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.insert(*target);
                        }
                    }
                }
            }
        }

        if order.len() < self.nodes.len() {
            tracing::warn!("Circular dependencies detected, falling back to DFS traversal");
            return self.dfs_order();
        }
        order
    }

    /// 优先级降序，同优先级按标识升序保证确定性
    fn priority_order(&self) -> Vec<TaskId> {
        let mut ids: Vec<&TaskNode> = self.nodes.values().collect();
        ids.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        ids.into_iter().map(|node| node.id.clone()).collect()
    }

    /// DFS 前序；根取字典序最小的未访问节点，非连通时依次重启直至覆盖全部节点
    fn dfs_order(&self) -> Vec<TaskId> {
        let adjacency = self.adjacency();
        let mut visited: BTreeSet<&TaskId> = BTreeSet::new();
        let mut order: Vec<TaskId> = Vec::with_capacity(self.nodes.len());

        for root in self.nodes.keys() {
            if visited.contains(root) {
                continue;
            }
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                order.push(id.clone());
                if let Some(neighbors) = adjacency.get(id) {
                    // 栈是后进先出，倒序压栈让邻居按字典序出栈
                    for neighbor in neighbors.iter().rev() {
                        if !visited.contains(*neighbor) {
                            stack.push(*neighbor);
                        }
                    }
                }
            }
        }
        order
    }

    /// BFS 层序；根与重启规则同 DFS
    fn bfs_order(&self) -> Vec<TaskId> {
        let adjacency = self.adjacency();
        let mut visited: BTreeSet<&TaskId> = BTreeSet::new();
        let mut order: Vec<TaskId> = Vec::with_capacity(self.nodes.len());

        for root in self.nodes.keys() {
            if visited.contains(root) {
                continue;
            }
            visited.insert(root);
            let mut queue = VecDeque::from([root]);
            while let Some(id) = queue.pop_front() {
                order.push(id.clone());
                if let Some(neighbors) = adjacency.get(id) {
                    for neighbor in neighbors {
                        if visited.insert(*neighbor) {
                            queue.push_back(*neighbor);
                        }
                    }
                }
            }
        }
        order
    }

    /// 导出快照：全部节点与原始边表（含引用未注册节点的边），纯内存无副作用
    pub fn export_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self
                .edges
                .iter()
                .map(|((source, target), weight)| EdgeSnapshot {
                    source: source.clone(),
                    target: target.clone(),
                    weight: *weight,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[&str]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for id in ids {
            graph.add_node(TaskNode::new(*id, format!("https://example.com/{id}")));
        }
        graph
    }

    #[test]
    fn test_dependency_order_respects_prerequisites() {
        let mut graph = graph_with(&["fetch", "parse", "store", "index"]);
        graph.add_dependency_default("fetch", "parse");
        graph.add_dependency_default("parse", "store");
        graph.add_dependency_default("parse", "index");

        let order = graph.traversal_order("dependency").unwrap();
        assert_eq!(order.len(), 4);
        let pos = |id: &str| order.iter().position(|x| x == id).unwrap();
        assert!(pos("fetch") < pos("parse"));
        assert!(pos("parse") < pos("store"));
        assert!(pos("parse") < pos("index"));
    }

    #[test]
    fn test_dependency_order_cycle_falls_back_to_dfs() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_dependency_default("a", "b");
        graph.add_dependency_default("b", "c");
        graph.add_dependency_default("c", "a");

        let order = graph.traversal_order("dependency").unwrap();
        // 有环也不报错，仍返回全部节点的一个排列
        assert_eq!(order.len(), 3);
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["a", "b", "c"]);
        // 确定性根：字典序最小的 a
        assert_eq!(order[0], "a");
    }

    #[test]
    fn test_priority_order_descending_with_id_ties() {
        let mut graph = DependencyGraph::new();
        graph.add_node(TaskNode::new("b", "").with_priority(0.5));
        graph.add_node(TaskNode::new("a", "").with_priority(0.5));
        graph.add_node(TaskNode::new("c", "").with_priority(2.0));

        let order = graph.traversal_order("priority").unwrap();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_dfs_covers_disconnected_components() {
        let mut graph = graph_with(&["a", "b", "x", "y"]);
        graph.add_dependency_default("a", "b");
        graph.add_dependency_default("x", "y");

        let order = graph.traversal_order("dfs").unwrap();
        assert_eq!(order, vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_bfs_level_order() {
        let mut graph = graph_with(&["root", "left", "right", "leaf"]);
        graph.add_dependency_default("root", "left");
        graph.add_dependency_default("root", "right");
        graph.add_dependency_default("left", "leaf");

        let order = graph.traversal_order("bfs").unwrap();
        assert_eq!(order, vec!["root", "left", "right", "leaf"]);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let graph = graph_with(&["a"]);
        assert!(graph.traversal_order("topological").is_err());
    }

    #[test]
    fn test_add_node_overwrites_duplicate() {
        let mut graph = DependencyGraph::new();
        graph.add_node(TaskNode::new("a", "v1"));
        graph.add_node(TaskNode::new("a", "v2"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get_node("a").unwrap().url, "v2");
    }

    #[test]
    fn test_dependency_on_unregistered_source_keeps_edge_only() {
        let mut graph = graph_with(&["b"]);
        graph.add_dependency("ghost", "b", 2.0);

        // 边进入快照，但没有节点被隐式创建
        let snapshot = graph.export_snapshot();
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.edges.len(), 1);
        // 遍历仍只覆盖已注册节点
        assert_eq!(graph.traversal_order("dependency").unwrap(), vec!["b"]);
    }

    #[test]
    fn test_readding_edge_overwrites_weight() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_dependency("a", "b", 1.0);
        graph.add_dependency("a", "b", 3.5);

        let snapshot = graph.export_snapshot();
        assert_eq!(snapshot.edges.len(), 1);
        assert_eq!(snapshot.edges[0].weight, 3.5);
    }

    #[test]
    fn test_empty_graph_orders_are_empty() {
        let graph = DependencyGraph::new();
        for strategy in ["dependency", "priority", "dfs", "bfs"] {
            assert!(graph.traversal_order(strategy).unwrap().is_empty());
        }
    }
}
