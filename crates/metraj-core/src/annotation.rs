//! 钢筋标注解析器
//!
//! 支持的标注格式（直径符号 `Φ` 不区分大小写）：
//! - 仅直径和长度: `Φ25 l=600`
//! - 数量: `24Φ12 l=450`
//! - 数量乘积: `2x3Φ12 l=450` (数量 = 2 × 3)
//! - 带间距: `2x3Φ12/200 l=450` (间距 `/200` 被忽略)
//!
//! 长度以厘米书写，解析结果换算为米；长度为 0 视为不匹配（数量 0 仍接受）。
//! 只提取字符串中第一个匹配的标注。

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// 直径符号
pub const DIAMETER_MARKER: char = 'Φ';

/// 数量（可选）+ Φ + 直径 + 可选间距 + 空白 + `l=` + 长度(cm)
static CALLOUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+x[0-9]+|[0-9]+)?Φ([0-9]+)(?:/[0-9]+)?\s+l=([0-9]+)")
        .expect("callout pattern is a valid regex")
});

/// 解析后的钢筋标注
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAnnotation {
    /// 根数（未标注时为 1）
    pub count: u32,
    /// 直径（mm）
    pub diameter_mm: u32,
    /// 单根长度（m）
    pub length_m: f64,
}

impl ParsedAnnotation {
    /// 从文本中解析第一个钢筋标注
    ///
    /// 没有匹配时返回 `None`，表示这不是钢筋标注，而不是错误。
    pub fn parse(text: &str) -> Option<Self> {
        let captures = CALLOUT_PATTERN.captures(text)?;

        let count = match captures.get(1) {
            Some(expr) => parse_count(expr.as_str())?,
            None => 1,
        };
        let diameter_mm = captures[2].parse::<u32>().ok()?;
        let length_cm = captures[3].parse::<u32>().ok().filter(|cm| *cm > 0)?;

        Some(Self {
            count,
            diameter_mm,
            length_m: f64::from(length_cm) / 100.0,
        })
    }

    /// 单根长度（cm），即标注中 `l=` 后的原始数值
    pub fn length_cm(&self) -> u32 {
        (self.length_m * 100.0).round() as u32
    }
}

/// 最简规范形式，如 `6Φ12 l=450`
impl fmt::Display for ParsedAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} l={}",
            self.count,
            DIAMETER_MARKER,
            self.diameter_mm,
            self.length_cm()
        )
    }
}

/// 解析文本中的钢筋标注，见 [`ParsedAnnotation::parse`]
pub fn parse_annotation(text: &str) -> Option<ParsedAnnotation> {
    ParsedAnnotation::parse(text)
}

/// 数量表达式：`24` 或 `2x3`
///
/// 数值溢出视为不匹配。
fn parse_count(expr: &str) -> Option<u32> {
    match expr.split_once(['x', 'X']) {
        Some((left, right)) => {
            let left = left.parse::<u32>().ok()?;
            let right = right.parse::<u32>().ok()?;
            left.checked_mul(right)
        }
        None => expr.parse::<u32>().ok(),
    }
}
