//! DXF图纸读取
//!
//! 以DXF文件作为宿主程序：打开图纸，把模型空间和块定义中的实体
//! 转换为核心的只读实体视图。

use metraj_core::host::{poll_until_ready, DrawingHost, HostError, ReadyPolicy, Readiness};
use metraj_core::source::{DrawingEntity, EntitySource};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 已打开的DXF图纸
pub struct DxfDocument {
    drawing: dxf::Drawing,
}

impl DxfDocument {
    /// 包装内存中的图纸
    pub fn from_drawing(drawing: dxf::Drawing) -> Self {
        Self { drawing }
    }
}

impl EntitySource for DxfDocument {
    fn model_space(&self) -> Vec<DrawingEntity> {
        self.drawing.entities().map(convert_dxf_entity).collect()
    }

    fn block_entities(&self, block_name: &str) -> Vec<DrawingEntity> {
        self.drawing
            .blocks()
            .find(|block| block.name == block_name)
            .map(|block| block.entities.iter().map(convert_dxf_entity).collect())
            .unwrap_or_default()
    }
}

/// 以DXF文件为图纸来源的宿主
#[derive(Debug, Clone, Default)]
pub struct DxfHost {
    policy: ReadyPolicy,
}

impl DxfHost {
    pub fn new(policy: ReadyPolicy) -> Self {
        Self { policy }
    }
}

impl DrawingHost for DxfHost {
    type Document = DxfDocument;

    /// 打开图纸
    ///
    /// 文件无法读取（如仍被CAD程序占用）时按策略重试；
    /// DXF内容解析失败直接返回错误。
    fn open(&self, path: &Path) -> Result<DxfDocument, HostError> {
        if !path.exists() {
            return Err(HostError::NotFound(path.to_path_buf()));
        }

        let drawing = poll_until_ready(&self.policy, |_| match File::open(path) {
            Ok(file) => {
                let mut reader = BufReader::new(file);
                dxf::Drawing::load(&mut reader)
                    .map(Readiness::Ready)
                    .map_err(|e| e.to_string())
            }
            Err(e) => Ok(Readiness::NotReady(e.to_string())),
        })?;

        tracing::info!("Opened drawing: {}", path.display());

        Ok(DxfDocument { drawing })
    }
}

/// 将DXF实体转换为实体视图
fn convert_dxf_entity(entity: &dxf::entities::Entity) -> DrawingEntity {
    use dxf::entities::EntityType;

    match &entity.specific {
        EntityType::Text(text) => DrawingEntity::simple_text(decode_unicode_escapes(&text.value)),
        EntityType::MText(mtext) => DrawingEntity::multiline_text(mtext_content(mtext)),
        EntityType::Insert(insert) => DrawingEntity::block_reference(insert.name.clone()),
        EntityType::Line(_) => DrawingEntity::other("LINE"),
        EntityType::Circle(_) => DrawingEntity::other("CIRCLE"),
        EntityType::Arc(_) => DrawingEntity::other("ARC"),
        EntityType::LwPolyline(_) => DrawingEntity::other("LWPOLYLINE"),
        EntityType::Polyline(_) => DrawingEntity::other("POLYLINE"),
        EntityType::ModelPoint(_) => DrawingEntity::other("POINT"),
        EntityType::RotatedDimension(_)
        | EntityType::RadialDimension(_)
        | EntityType::DiameterDimension(_) => DrawingEntity::other("DIMENSION"),
        _ => DrawingEntity::other("OTHER"),
    }
}

/// 多行文字内容：扩展段（组码3）在前，主文字（组码1）在后
fn mtext_content(mtext: &dxf::entities::MText) -> String {
    let mut content = mtext.extended_text.concat();
    content.push_str(&mtext.text);
    // MText 格式代码只处理段落换行
    decode_unicode_escapes(&content.replace("\\P", "\n"))
}

/// 解码 `\U+03A6` 形式的字符转义（R2004及更早版本的非ASCII字符）
fn decode_unicode_escapes(text: &str) -> String {
    if !text.contains("\\U+") {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("\\U+") {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 3..];
        let decoded = after
            .get(..4)
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                result.push(c);
                rest = &after[4..];
            }
            None => {
                result.push_str(&rest[pos..pos + 3]);
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
