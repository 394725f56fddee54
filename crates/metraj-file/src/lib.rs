//! Metraj 文件处理
//!
//! 支持：
//! - `.dxf` 图纸读取（作为宿主程序的实体来源）
//! - `.xlsx` / `.csv` 钢筋用量表输出

pub mod dxf_io;
pub mod error;
pub mod report;

pub use dxf_io::{DxfDocument, DxfHost};
pub use error::FileError;
pub use report::{report_path, CsvReport, ReportFormat, ReportSink, XlsxReport, REPORT_STEM};
