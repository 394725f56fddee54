//! 图纸实体来源
//!
//! 宿主程序的文档以只读实体序列的形式暴露给核心。
//! 提供两种取字方式：
//! - 平铺模式：直接遍历模型空间中的单行/多行文字
//! - 块模式：遍历块参照，取出块定义内的单行/多行文字

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// 单行文字
    SimpleText,
    /// 多行文字
    MultilineText,
    /// 块参照
    BlockReference,
    /// 其他实体（忽略）
    Other,
}

impl EntityKind {
    /// 是否为文字实体
    pub fn is_text(&self) -> bool {
        matches!(self, EntityKind::SimpleText | EntityKind::MultilineText)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::SimpleText => "simple-text",
            EntityKind::MultilineText => "multiline-text",
            EntityKind::BlockReference => "block-reference",
            EntityKind::Other => "other",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 图纸实体的只读视图
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingEntity {
    pub kind: EntityKind,
    /// 宿主程序中的原始类型名（如 `TEXT`、`INSERT`）
    pub type_name: String,
    /// 文字内容；没有文字访问器的实体为 `None`
    pub text: Option<String>,
    /// 块参照引用的块名
    pub block_name: Option<String>,
}

impl DrawingEntity {
    pub fn simple_text(text: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::SimpleText,
            type_name: "TEXT".to_string(),
            text: Some(text.into()),
            block_name: None,
        }
    }

    pub fn multiline_text(text: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::MultilineText,
            type_name: "MTEXT".to_string(),
            text: Some(text.into()),
            block_name: None,
        }
    }

    pub fn block_reference(block_name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::BlockReference,
            type_name: "INSERT".to_string(),
            text: None,
            block_name: Some(block_name.into()),
        }
    }

    pub fn other(type_name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Other,
            type_name: type_name.into(),
            text: None,
            block_name: None,
        }
    }
}

/// 实体来源
///
/// 由宿主适配层实现，核心只做只读遍历。
pub trait EntitySource {
    /// 模型空间中的全部实体（按图纸顺序）
    fn model_space(&self) -> Vec<DrawingEntity>;

    /// 指定块定义内的实体；块不存在时返回空列表
    fn block_entities(&self, block_name: &str) -> Vec<DrawingEntity>;
}

/// 取字方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// 模型空间中的文字
    #[default]
    Flat,
    /// 块参照内的文字
    Block,
}

/// 无法识别的取字方式
#[derive(Debug, Clone, Error)]
#[error("Unknown retrieval mode '{0}', expected 'flat' or 'block'")]
pub struct UnknownModeError(pub String);

impl FromStr for RetrievalMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(RetrievalMode::Flat),
            "block" => Ok(RetrievalMode::Block),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalMode::Flat => f.write_str("flat"),
            RetrievalMode::Block => f.write_str("block"),
        }
    }
}

/// 文字所在的块参照（仅用于追溯，不参与重量计算）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOrigin {
    pub name: String,
    /// 该块参照在模型空间块参照中的序号（从 0 开始）
    pub occurrence: usize,
}

/// 待解析的文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
    pub origin: Option<BlockOrigin>,
}

impl AsRef<str> for TextItem {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// 按取字方式收集文字
///
/// 文字去除首尾空白；没有文字内容的实体直接跳过。
pub fn collect_text_items<S>(source: &S, mode: RetrievalMode) -> Vec<TextItem>
where
    S: EntitySource + ?Sized,
{
    match mode {
        RetrievalMode::Flat => collect_flat(source),
        RetrievalMode::Block => collect_from_blocks(source),
    }
}

fn collect_flat<S: EntitySource + ?Sized>(source: &S) -> Vec<TextItem> {
    source
        .model_space()
        .into_iter()
        .filter(|entity| entity.kind.is_text())
        .filter_map(|entity| entity.text)
        .map(|text| TextItem {
            text: text.trim().to_string(),
            origin: None,
        })
        .collect()
}

fn collect_from_blocks<S: EntitySource + ?Sized>(source: &S) -> Vec<TextItem> {
    let mut items = Vec::new();

    let references = source
        .model_space()
        .into_iter()
        .filter(|entity| entity.kind == EntityKind::BlockReference);

    for (occurrence, reference) in references.enumerate() {
        let Some(block_name) = reference.block_name else {
            continue;
        };
        tracing::debug!("Found block reference: {}", block_name);

        for nested in source.block_entities(&block_name) {
            if !nested.kind.is_text() {
                continue;
            }
            let Some(text) = nested.text else {
                continue;
            };
            let text = text.trim().to_string();
            tracing::debug!("Text in block {} (#{}): {}", block_name, occurrence, text);

            items.push(TextItem {
                text,
                origin: Some(BlockOrigin {
                    name: block_name.clone(),
                    occurrence,
                }),
            });
        }
    }

    items
}
