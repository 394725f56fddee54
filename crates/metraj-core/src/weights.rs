//! 钢筋单位重量表
//!
//! 直径（mm）到单位重量（kg/m）的固定映射，作为不可变配置注入汇总器。

use std::collections::BTreeMap;

/// 标准钢筋直径与单位重量
const STANDARD_WEIGHTS: [(u32, f64); 9] = [
    (8, 0.395),
    (10, 0.617),
    (12, 0.888),
    (14, 1.210),
    (16, 1.580),
    (18, 2.000),
    (20, 2.470),
    (25, 3.850),
    (32, 6.310),
];

/// 单位重量表
///
/// 创建后只读。查询未登记的直径返回 `None`，与登记为 0 的条目可以区分。
#[derive(Debug, Clone, PartialEq)]
pub struct UnitWeightTable {
    weights: BTreeMap<u32, f64>,
}

impl UnitWeightTable {
    /// 标准表：8, 10, 12, 14, 16, 18, 20, 25, 32 mm
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_WEIGHTS)
    }

    /// 从 (直径, 单位重量) 列表构建
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            weights: entries.into_iter().collect(),
        }
    }

    /// 查询登记的单位重量（可能为 0）
    pub fn get(&self, diameter_mm: u32) -> Option<f64> {
        self.weights.get(&diameter_mm).copied()
    }

    /// 查询可用于计算的单位重量
    ///
    /// 未登记或登记为 0 的直径都视为无法解析。
    pub fn resolve(&self, diameter_mm: u32) -> Option<f64> {
        self.get(diameter_mm).filter(|w| *w > 0.0)
    }

    /// 所有登记的直径（升序）
    pub fn diameters(&self) -> impl Iterator<Item = u32> + '_ {
        self.weights.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for UnitWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}
