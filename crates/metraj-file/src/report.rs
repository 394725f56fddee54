//! 钢筋用量表输出
//!
//! 表头：Count | Diameter (mm) | Length (m) | Unit Weight (kg/m) | Total Weight (kg)
//!
//! 明细行之后追加一行合计：Count 列为 `Total`，Total Weight 列为总重，其余留空。
//! 输出文件默认放在图纸所在目录，文件名为 `donati_metraj`。

use crate::error::FileError;
use metraj_core::aggregate::AggregationResult;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 默认报表文件名（不含扩展名）
pub const REPORT_STEM: &str = "donati_metraj";

/// 工作表名称
const SHEET_NAME: &str = "Donati Metraj";

/// 合计行标签
const TOTAL_LABEL: &str = "Total";

const COLUMNS: [&str; 5] = [
    "Count",
    "Diameter (mm)",
    "Length (m)",
    "Unit Weight (kg/m)",
    "Total Weight (kg)",
];

/// 报表格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }

    /// 报表文件名，如 `donati_metraj.xlsx`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }

    /// 创建对应格式的报表输出
    pub fn sink(&self, path: PathBuf) -> Box<dyn ReportSink> {
        match self {
            ReportFormat::Xlsx => Box::new(XlsxReport::new(path)),
            ReportFormat::Csv => Box::new(CsvReport::new(path)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("Unknown report format '{}', expected 'xlsx' or 'csv'", other)),
        }
    }
}

/// 报表路径：图纸所在目录 + 文件名
pub fn report_path(drawing_path: &Path, stem: &str, format: ReportFormat) -> PathBuf {
    let dir = drawing_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format.file_name(stem))
}

/// 报表输出
pub trait ReportSink {
    /// 写入汇总结果；空结果返回 [`FileError::EmptyReport`]
    fn write(&mut self, result: &AggregationResult) -> Result<(), FileError>;

    /// 输出文件路径
    fn path(&self) -> &Path;
}

/// Excel 报表
pub struct XlsxReport {
    path: PathBuf,
}

impl XlsxReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for XlsxReport {
    fn write(&mut self, result: &AggregationResult) -> Result<(), FileError> {
        if result.is_empty() {
            return Err(FileError::EmptyReport);
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let weight_format = Format::new().set_num_format("0.000");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
        }

        for (index, item) in result.items().iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_number(row, 0, item.count)?;
            worksheet.write_number(row, 1, item.diameter_mm)?;
            worksheet.write_number(row, 2, item.length_m)?;
            worksheet.write_number_with_format(row, 3, item.unit_weight_kg_per_m, &weight_format)?;
            worksheet.write_number_with_format(row, 4, item.total_weight_kg, &weight_format)?;
        }

        let total_row = result.len() as u32 + 1;
        worksheet.write_string_with_format(total_row, 0, TOTAL_LABEL, &header_format)?;
        worksheet.write_number_with_format(total_row, 4, result.total_weight_kg(), &weight_format)?;

        workbook.save(&self.path)?;

        tracing::info!(
            "Saved {} line items to {}",
            result.len(),
            self.path.display()
        );
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// CSV 行；合计行除 Count 和 Total Weight 外留空
#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Count")]
    count: String,
    #[serde(rename = "Diameter (mm)")]
    diameter_mm: Option<u32>,
    #[serde(rename = "Length (m)")]
    length_m: Option<f64>,
    #[serde(rename = "Unit Weight (kg/m)")]
    unit_weight_kg_per_m: Option<f64>,
    #[serde(rename = "Total Weight (kg)")]
    total_weight_kg: f64,
}

/// CSV 报表
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for CsvReport {
    fn write(&mut self, result: &AggregationResult) -> Result<(), FileError> {
        if result.is_empty() {
            return Err(FileError::EmptyReport);
        }

        let mut writer = csv::Writer::from_path(&self.path)?;

        for item in result.items() {
            writer.serialize(CsvRow {
                count: item.count.to_string(),
                diameter_mm: Some(item.diameter_mm),
                length_m: Some(item.length_m),
                unit_weight_kg_per_m: Some(item.unit_weight_kg_per_m),
                total_weight_kg: item.total_weight_kg,
            })?;
        }

        writer.serialize(CsvRow {
            count: TOTAL_LABEL.to_string(),
            diameter_mm: None,
            length_m: None,
            unit_weight_kg_per_m: None,
            total_weight_kg: result.total_weight_kg(),
        })?;
        writer.flush()?;

        tracing::info!(
            "Saved {} line items to {}",
            result.len(),
            self.path.display()
        );
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
