//! 命令行参数

use clap::Parser;
use metraj_core::source::RetrievalMode;
use metraj_file::ReportFormat;
use std::path::PathBuf;

/// 从DXF图纸中提取钢筋标注并生成用量表
#[derive(Debug, Parser)]
#[command(name = "metraj", version, about)]
pub struct Cli {
    /// DXF图纸路径；省略时弹出文件选择框
    pub drawing: Option<PathBuf>,

    /// 取字方式：flat（模型空间文字）或 block（块参照内文字）
    #[arg(long)]
    pub mode: Option<RetrievalMode>,

    /// 报表格式：xlsx 或 csv
    #[arg(long)]
    pub format: Option<ReportFormat>,

    /// 报表输出目录（默认为图纸所在目录）
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// JSON 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 列出模型空间中的所有实体
    #[arg(long)]
    pub list_entities: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}
