//! 运行配置
//!
//! 可选的 JSON 配置文件，命令行参数优先。单位重量表不可配置。

use crate::cli::Cli;
use anyhow::{Context, Result};
use metraj_core::host::ReadyPolicy;
use metraj_core::source::RetrievalMode;
use metraj_file::{ReportFormat, REPORT_STEM};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mode: RetrievalMode,
    pub format: ReportFormat,
    /// 报表文件名（不含扩展名）
    pub output_stem: String,
    /// 打开图纸的最大尝试次数
    pub ready_attempts: u32,
    /// 两次尝试之间的等待（毫秒）
    pub ready_interval_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        let policy = ReadyPolicy::default();
        Self {
            mode: RetrievalMode::default(),
            format: ReportFormat::default(),
            output_stem: REPORT_STEM.to_string(),
            ready_attempts: policy.attempts,
            ready_interval_ms: policy.interval.as_millis() as u64,
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// 命令行参数覆盖配置文件
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
    }

    pub fn ready_policy(&self) -> ReadyPolicy {
        ReadyPolicy {
            attempts: self.ready_attempts,
            interval: Duration::from_millis(self.ready_interval_ms),
        }
    }
}
