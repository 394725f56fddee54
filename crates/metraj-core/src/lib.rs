//! Metraj 核心：钢筋标注解析与重量汇总
//!
//! 从图纸文字中提取钢筋标注（数量、直径、长度），按单位重量表计算重量。
//!
//! # 数据流
//!
//! ```text
//! EntitySource ──► TextItem ──► parse_annotation ──► Aggregator ──► AggregationResult
//! ```
//!
//! - `source`: 图纸实体的只读视图，支持平铺模式和块模式两种取字方式
//! - `annotation`: 标注解析器，如 `2x3Φ12/200 l=450`
//! - `aggregate`: 查表计算单根/总重量
//! - `host`: 宿主程序（图纸来源）的打开接口与有界轮询
//!
//! # 示例
//!
//! ```rust
//! use metraj_core::prelude::*;
//!
//! let aggregator = Aggregator::default();
//! let result = aggregator.aggregate(["2x3Φ12/200 l=450", "Kolon detayı"]);
//!
//! assert_eq!(result.len(), 1);
//! assert!((result.total_weight_kg() - 23.976).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod annotation;
pub mod host;
pub mod source;
pub mod weights;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::aggregate::{AggregationResult, AggregationWarning, Aggregator, RebarLineItem};
    pub use crate::annotation::{parse_annotation, ParsedAnnotation, DIAMETER_MARKER};
    pub use crate::host::{poll_until_ready, DrawingHost, HostError, ReadyPolicy, Readiness};
    pub use crate::source::{
        collect_text_items, BlockOrigin, DrawingEntity, EntityKind, EntitySource, RetrievalMode,
        TextItem,
    };
    pub use crate::weights::UnitWeightTable;
}
