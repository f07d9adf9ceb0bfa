//! 核心编排层：场景输入/报告类型、编排器、构建器

pub mod builder;
pub mod orchestrator;
pub mod scenario;

pub use builder::CoreBuilder;
pub use orchestrator::Orchestrator;
pub use scenario::{
    GraphAnalysis, InformationAnalysis, PolicyAnalysis, Scenario, ScenarioReport, SnapshotBundle,
    TaskSpec,
};
