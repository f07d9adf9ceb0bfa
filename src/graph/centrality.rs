//! 瓶颈检测：有向图介数中心性
//!
//! Brandes 单源累积算法（无权最短路），按 (n-1)(n-2) 归一化；
//! 阈值取中心性分布的指定百分位数（线性插值），达到阈值的节点视为瓶颈。

use std::collections::{BTreeMap, VecDeque};

use crate::graph::engine::DependencyGraph;
use crate::graph::types::TaskId;

impl DependencyGraph {
    /// 返回中心性达到指定百分位阈值的节点标识（字典序）
    ///
    /// 阈值处的并列值计入结果；中心性为 0 的节点不视为瓶颈
    /// （不在任何最短路上的节点谈不上瓶颈，否则无边图里所有节点都会在 0.0 处并列）。
    /// 空图返回空结果，不报错。
    pub fn detect_bottlenecks(&self, percentile: f64) -> Vec<TaskId> {
        let centrality = self.betweenness_centrality();
        if centrality.is_empty() {
            return Vec::new();
        }

        let mut values: Vec<f64> = centrality.values().copied().collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let threshold = percentile_linear(&values, percentile);

        centrality
            .into_iter()
            .filter(|(_, c)| *c >= threshold && *c > 0.0)
            .map(|(id, _)| id)
            .collect()
    }

    /// 全节点介数中心性；仅统计两端都已注册的边
    pub fn betweenness_centrality(&self) -> BTreeMap<TaskId, f64> {
        let adjacency = self.adjacency();
        let ids: Vec<&TaskId> = self.node_ids().collect();
        let n = ids.len();
        let index: BTreeMap<&TaskId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut centrality = vec![0.0_f64; n];

        for &source in &ids {
            // BFS 阶段：最短路计数 sigma 与前驱表
            let s = index[source];
            let mut sigma = vec![0.0_f64; n];
            let mut dist = vec![-1_i64; n];
            let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut stack: Vec<usize> = Vec::with_capacity(n);

            sigma[s] = 1.0;
            dist[s] = 0;
            let mut queue = VecDeque::from([s]);
            while let Some(v) = queue.pop_front() {
                stack.push(v);
                if let Some(neighbors) = adjacency.get(ids[v]) {
                    for neighbor in neighbors {
                        let w = index[*neighbor];
                        if dist[w] < 0 {
                            dist[w] = dist[v] + 1;
                            queue.push_back(w);
                        }
                        if dist[w] == dist[v] + 1 {
                            sigma[w] += sigma[v];
                            predecessors[w].push(v);
                        }
                    }
                }
            }

            // 反向累积阶段
            let mut delta = vec![0.0_f64; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }

        // 有向图归一化：1 / ((n-1)(n-2))
        if n > 2 {
            let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
            for value in centrality.iter_mut() {
                *value *= scale;
            }
        }

        ids.into_iter()
            .zip(centrality)
            .map(|(id, c)| (id.clone(), c))
            .collect()
    }
}

/// 升序序列的线性插值百分位数（numpy 定义：rank = p/100 * (len-1)）
fn percentile_linear(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = percentile.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let fraction = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}
