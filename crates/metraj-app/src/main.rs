//! Metraj 主程序入口
//! 选择图纸，统计钢筋标注重量，输出用量表

mod cli;
mod config;
mod run;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use config::RunConfig;
use metraj_file::DxfHost;
use run::{RunOutcome, RunRequest};

/// 文件选择框 - 选择图纸
#[cfg(feature = "dialog")]
fn pick_drawing() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("DXF Files", &["dxf"])
        .add_filter("All Files", &["*"])
        .set_title("Select DXF drawing")
        .pick_file()
}

#[cfg(not(feature = "dialog"))]
fn pick_drawing() -> Option<PathBuf> {
    tracing::warn!("No drawing given and file dialog support is disabled");
    None
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(FmtSubscriber::builder().with_max_level(level).finish())?;

    info!("Starting Metraj...");

    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    config.apply_cli(&cli);

    let Some(drawing) = cli.drawing.clone().or_else(pick_drawing) else {
        info!("No file selected. Operation cancelled.");
        return Ok(());
    };

    let host = DxfHost::new(config.ready_policy());
    let request = RunRequest {
        drawing: &drawing,
        config: &config,
        output_dir: cli.output_dir.as_deref(),
        list_entities: cli.list_entities,
    };

    match run::run(&host, &request)? {
        RunOutcome::Written(path) => info!("Rebar report saved to {}", path.display()),
        RunOutcome::Empty => info!("Nothing to report"),
        RunOutcome::HostUnavailable => info!("Drawing could not be opened, no report written"),
    }

    Ok(())
}
