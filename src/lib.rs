//! Forager - 自动化多资源采集系统的决策核心
//!
//! 模块划分：
//! - **analysis**: 内容复杂度分析（香农熵、二元组互信息近似、综合评分）
//! - **automaton**: 采集 Agent 状态机（固定迁移表、历史记录、模式统计）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 编排器、场景输入/报告类型、构建器
//! - **graph**: 任务依赖图（遍历排序、瓶颈检测、快照导出）
//! - **observability**: 日志初始化（tracing + EnvFilter）
//! - **policy**: 自适应恢复策略（表格型 Q 学习 + epsilon-greedy）

pub mod analysis;
pub mod automaton;
pub mod config;
pub mod core;
pub mod graph;
pub mod observability;
pub mod policy;

pub use crate::core::{CoreBuilder, Orchestrator, Scenario, ScenarioReport};
