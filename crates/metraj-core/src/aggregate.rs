//! 钢筋重量汇总
//!
//! 逐条解析文字、查表并计算重量，按输入顺序生成明细行和总重。
//! 无法解析的文字直接跳过；直径不在重量表中的标注被丢弃并记录警告。

use crate::annotation::ParsedAnnotation;
use crate::weights::UnitWeightTable;
use std::collections::BTreeMap;
use std::fmt;

/// 钢筋明细行（创建后不再修改）
#[derive(Debug, Clone, PartialEq)]
pub struct RebarLineItem {
    pub count: u32,
    pub diameter_mm: u32,
    pub length_m: f64,
    pub unit_weight_kg_per_m: f64,
    /// count × length_m × unit_weight_kg_per_m
    pub total_weight_kg: f64,
}

impl RebarLineItem {
    fn new(annotation: &ParsedAnnotation, unit_weight_kg_per_m: f64) -> Self {
        Self {
            count: annotation.count,
            diameter_mm: annotation.diameter_mm,
            length_m: annotation.length_m,
            unit_weight_kg_per_m,
            total_weight_kg: f64::from(annotation.count)
                * annotation.length_m
                * unit_weight_kg_per_m,
        }
    }
}

/// 汇总过程中的可恢复问题
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationWarning {
    /// 直径没有对应的单位重量，标注已丢弃
    UnresolvedDiameter { text: String, diameter_mm: u32 },
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationWarning::UnresolvedDiameter { text, diameter_mm } => write!(
                f,
                "No unit weight defined for diameter {} mm (text: {:?})",
                diameter_mm, text
            ),
        }
    }
}

/// 汇总结果
///
/// 明细顺序与输入顺序一致；总重始终等于各明细重量之和。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    items: Vec<RebarLineItem>,
    total_weight_kg: f64,
    warnings: Vec<AggregationWarning>,
}

impl AggregationResult {
    fn new(items: Vec<RebarLineItem>, warnings: Vec<AggregationWarning>) -> Self {
        let total_weight_kg = items.iter().map(|item| item.total_weight_kg).sum();
        Self {
            items,
            total_weight_kg,
            warnings,
        }
    }

    pub fn items(&self) -> &[RebarLineItem] {
        &self.items
    }

    /// 总重（kg）
    pub fn total_weight_kg(&self) -> f64 {
        self.total_weight_kg
    }

    pub fn warnings(&self) -> &[AggregationWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 没有任何明细。这是正常结果，由调用方决定是否跳过报表
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按直径分组的重量小计（直径升序）
    pub fn by_diameter(&self) -> Vec<(u32, f64)> {
        let mut groups: BTreeMap<u32, f64> = BTreeMap::new();
        for item in &self.items {
            *groups.entry(item.diameter_mm).or_default() += item.total_weight_kg;
        }
        groups.into_iter().collect()
    }
}

/// 重量汇总器
///
/// 不持有可变状态，同一输入多次调用结果完全相同。
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    weights: UnitWeightTable,
}

impl Aggregator {
    /// 使用指定重量表创建
    pub fn new(weights: UnitWeightTable) -> Self {
        Self { weights }
    }

    /// 汇总一组文字
    pub fn aggregate<I, S>(&self, texts: I) -> AggregationResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items = Vec::new();
        let mut warnings = Vec::new();

        for text in texts {
            let text = text.as_ref();
            tracing::debug!("Analysing text: {}", text);

            let Some(annotation) = ParsedAnnotation::parse(text) else {
                continue;
            };

            match self.weights.resolve(annotation.diameter_mm) {
                Some(unit_weight) => items.push(RebarLineItem::new(&annotation, unit_weight)),
                None => {
                    let warning = AggregationWarning::UnresolvedDiameter {
                        text: text.to_string(),
                        diameter_mm: annotation.diameter_mm,
                    };
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        AggregationResult::new(items, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_product_count_scenario() {
        let result = Aggregator::default().aggregate(["2x3Φ12/200 l=450"]);
        assert_eq!(result.len(), 1);

        let item = &result.items()[0];
        assert_eq!(item.count, 6);
        assert_eq!(item.diameter_mm, 12);
        assert_eq!(item.length_m, 4.5);
        assert_eq!(item.unit_weight_kg_per_m, 0.888);
        assert!((item.total_weight_kg - 23.976).abs() < EPSILON);
        assert!((result.total_weight_kg() - 23.976).abs() < EPSILON);
    }

    #[test]
    fn test_default_count_scenario() {
        let result = Aggregator::default().aggregate(["Φ25 l=600"]);
        assert_eq!(result.len(), 1);
        assert!((result.total_weight_kg() - 23.10).abs() < EPSILON);
    }

    #[test]
    fn test_unresolved_diameter_is_dropped() {
        let result = Aggregator::default().aggregate(["Φ40 l=300", "Φ25 l=600"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.items()[0].diameter_mm, 25);
        assert_eq!(
            result.warnings(),
            &[AggregationWarning::UnresolvedDiameter {
                text: "Φ40 l=300".to_string(),
                diameter_mm: 40,
            }]
        );
        assert!((result.total_weight_kg() - 23.10).abs() < EPSILON);
    }

    #[test]
    fn test_zero_weight_entry_is_unresolved() {
        let aggregator = Aggregator::new(UnitWeightTable::from_entries([(12, 0.0)]));
        let result = aggregator.aggregate(["Φ12 l=300"]);
        assert!(result.is_empty());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_zero_length_produces_no_item() {
        let result = Aggregator::default().aggregate(["Φ12 l=0", "Φ25 l=600"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.items()[0].diameter_mm, 25);
        assert!(result.warnings().is_empty());
        assert!((result.total_weight_kg() - 23.10).abs() < EPSILON);
    }

    #[test]
    fn test_zero_diameter_is_unresolved() {
        let result = Aggregator::default().aggregate(["Φ0 l=100"]);
        assert!(result.is_empty());
        assert_eq!(
            result.warnings(),
            &[AggregationWarning::UnresolvedDiameter {
                text: "Φ0 l=100".to_string(),
                diameter_mm: 0,
            }]
        );
    }

    #[test]
    fn test_non_annotation_is_skipped() {
        let result = Aggregator::default().aggregate(["Kolon detayı"]);
        assert!(result.is_empty());
        assert!(result.warnings().is_empty());
        assert_eq!(result.total_weight_kg(), 0.0);
    }

    #[test]
    fn test_empty_input() {
        let result = Aggregator::default().aggregate(Vec::<String>::new());
        assert!(result.is_empty());
        assert_eq!(result.total_weight_kg(), 0.0);
        assert_eq!(result, AggregationResult::default());
    }

    #[test]
    fn test_zero_count_is_accepted() {
        let result = Aggregator::default().aggregate(["0x5Φ12 l=300"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.items()[0].count, 0);
        assert_eq!(result.total_weight_kg(), 0.0);
    }

    #[test]
    fn test_order_and_idempotence() {
        let texts = vec![
            "4Φ16 l=500".to_string(),
            "Döşeme".to_string(),
            "Φ8/150 l=220".to_string(),
            "2x2Φ20 l=1000".to_string(),
        ];
        let aggregator = Aggregator::default();
        let first = aggregator.aggregate(&texts);
        let second = aggregator.aggregate(&texts);

        assert_eq!(first, second);
        let diameters: Vec<u32> = first.items().iter().map(|i| i.diameter_mm).collect();
        assert_eq!(diameters, vec![16, 8, 20]);
    }

    #[test]
    fn test_total_equals_sum_of_items() {
        let texts = [
            "4Φ16 l=500",
            "Φ40 l=300",
            "3x7Φ10/200 l=315",
            "12Φ32 l=1190",
            "Φ14 l=95",
        ];
        let result = Aggregator::default().aggregate(texts);
        let expected: f64 = result
            .items()
            .iter()
            .map(|i| f64::from(i.count) * i.length_m * i.unit_weight_kg_per_m)
            .sum();
        assert_eq!(result.len(), 4);
        assert!((result.total_weight_kg() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_by_diameter() {
        let result = Aggregator::default().aggregate(["Φ12 l=100", "Φ8 l=100", "Φ12 l=100"]);
        let groups = result.by_diameter();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 8);
        assert!((groups[0].1 - 0.395).abs() < EPSILON);
        assert_eq!(groups[1].0, 12);
        assert!((groups[1].1 - 1.776).abs() < EPSILON);
    }
}
