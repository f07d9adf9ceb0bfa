//! Forager - 采集决策核心
//!
//! 入口：初始化日志、加载配置、读场景 JSON、打印分析报告。

use anyhow::Context;
use forager::{config::load_config, CoreBuilder, Scenario};

fn main() -> anyhow::Result<()> {
    forager::observability::init();

    let config = match load_config(None) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            forager::config::AppConfig::default()
        }
    };

    // 第一个参数为场景 JSON 路径；缺省时分析空场景
    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read scenario file: {}", path))?;
            serde_json::from_str::<Scenario>(&raw)
                .with_context(|| format!("Invalid scenario JSON: {}", path))?
        }
        None => Scenario::default(),
    };

    let mut core = CoreBuilder::new().config(config).build();
    let report = core.analyze(&scenario);

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    // 第二个参数为快照输出路径，省略则不落盘
    if let Some(path) = std::env::args().nth(2) {
        let bundle = core.export_snapshots();
        let raw = serde_json::to_string_pretty(&bundle).context("Failed to serialize snapshots")?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write snapshot file: {}", path))?;
        tracing::info!("Snapshot bundle written to {}", path);
    }
    Ok(())
}
