//! 宿主程序接口
//!
//! 宿主负责打开图纸并提供实体来源。宿主可能暂时无法响应（文件被占用、
//! 程序尚在启动），此时使用有界轮询等待，而不是依赖异常重试。

use crate::source::EntitySource;
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// 宿主错误
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Drawing not found: {0}")]
    NotFound(PathBuf),

    #[error("Host not ready after {attempts} attempts: {reason}")]
    SourceUnavailable { attempts: u32, reason: String },

    #[error("Failed to open drawing: {0}")]
    Open(String),
}

/// 打开图纸的宿主
pub trait DrawingHost {
    type Document: EntitySource;

    /// 打开图纸，返回可遍历的文档
    fn open(&self, path: &Path) -> Result<Self::Document, HostError>;
}

/// 就绪轮询策略
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyPolicy {
    /// 最大尝试次数（至少 1 次）
    pub attempts: u32,
    /// 两次尝试之间的等待时间
    pub interval: Duration,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_secs(2),
        }
    }
}

/// 单次探测结果
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness<T> {
    Ready(T),
    /// 尚未就绪，附带原因
    NotReady(String),
}

/// 轮询直到宿主就绪
///
/// `probe` 接收当前尝试序号（从 1 开始）：
/// - `Ok(Readiness::Ready(v))`: 返回 `v`
/// - `Ok(Readiness::NotReady(_))`: 等待后重试
/// - `Err(e)`: 致命错误，立即返回 [`HostError::Open`]
pub fn poll_until_ready<T, E, F>(policy: &ReadyPolicy, mut probe: F) -> Result<T, HostError>
where
    F: FnMut(u32) -> Result<Readiness<T>, E>,
    E: fmt::Display,
{
    let attempts = policy.attempts.max(1);
    let mut reason = String::new();

    for attempt in 1..=attempts {
        match probe(attempt) {
            Ok(Readiness::Ready(value)) => return Ok(value),
            Ok(Readiness::NotReady(why)) => {
                tracing::info!("Host not ready yet ({}/{}): {}", attempt, attempts, why);
                reason = why;
                if attempt < attempts {
                    thread::sleep(policy.interval);
                }
            }
            Err(e) => return Err(HostError::Open(e.to_string())),
        }
    }

    Err(HostError::SourceUnavailable { attempts, reason })
}
