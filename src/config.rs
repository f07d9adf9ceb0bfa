//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `FORAGER__*` 覆盖（双下划线表示嵌套，如 `FORAGER__POLICY__EPSILON=0.2`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub graph: GraphSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub policy: PolicySection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph: GraphSection::default(),
            analysis: AnalysisSection::default(),
            policy: PolicySection::default(),
        }
    }
}

/// [graph] 段：瓶颈检测参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    /// 介数中心性阈值对应的百分位数
    pub bottleneck_percentile: f64,
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            bottleneck_percentile: 80.0,
        }
    }
}

/// [analysis] 段：内容复杂度告警阈值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// 平均熵超过该值（bit）时建议内容过滤
    pub entropy_alert_threshold: f64,
    /// 平均综合复杂度超过该值时建议高级解析策略
    pub complexity_alert_threshold: f64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            entropy_alert_threshold: 7.0,
            complexity_alert_threshold: 0.8,
        }
    }
}

/// [policy] 段：Q 学习超参数与随机种子
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
    /// 设定后 epsilon-greedy 探索可复现；不设则每次运行随机
    pub seed: Option<u64>,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 0.1,
            seed: None,
        }
    }
}

/// 从 config 目录加载配置，环境变量 FORAGER__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 FORAGER__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("FORAGER")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 重新从磁盘与环境变量加载配置（调用方可在运行时决定是否用新配置重建编排器）
pub fn reload_config() -> Result<AppConfig, config::ConfigError> {
    load_config(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.graph.bottleneck_percentile, 80.0);
        assert_eq!(cfg.analysis.entropy_alert_threshold, 7.0);
        assert_eq!(cfg.analysis.complexity_alert_threshold, 0.8);
        assert_eq!(cfg.policy.learning_rate, 0.1);
        assert_eq!(cfg.policy.discount_factor, 0.9);
        assert_eq!(cfg.policy.epsilon, 0.1);
        assert!(cfg.policy.seed.is_none());
    }
}
