//! 一次完整的用量计算：打开图纸 → 收集文字 → 汇总 → 输出报表

use crate::config::RunConfig;
use anyhow::{Context, Result};
use metraj_core::aggregate::Aggregator;
use metraj_core::host::DrawingHost;
use metraj_core::source::{collect_text_items, EntitySource};
use metraj_file::report_path;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// 运行结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 报表已写入
    Written(PathBuf),
    /// 没有可汇总的钢筋标注，未生成报表
    Empty,
    /// 宿主无法打开图纸
    HostUnavailable,
}

/// 运行参数
pub struct RunRequest<'a> {
    pub drawing: &'a Path,
    pub config: &'a RunConfig,
    pub output_dir: Option<&'a Path>,
    pub list_entities: bool,
}

pub fn run<H: DrawingHost>(host: &H, request: &RunRequest<'_>) -> Result<RunOutcome> {
    let config = request.config;

    let document = match host.open(request.drawing) {
        Ok(document) => document,
        Err(e) => {
            error!("{}", e);
            return Ok(RunOutcome::HostUnavailable);
        }
    };

    if request.list_entities {
        list_model_space(&document);
    }

    let items = collect_text_items(&document, config.mode);
    info!("Collected {} text items ({} mode)", items.len(), config.mode);

    let result = Aggregator::default().aggregate(&items);
    if !result.warnings().is_empty() {
        info!(
            "Skipped {} annotations with unresolved diameters",
            result.warnings().len()
        );
    }
    if result.is_empty() {
        info!("No rebar data found to analyse");
        return Ok(RunOutcome::Empty);
    }

    for (diameter_mm, weight_kg) in result.by_diameter() {
        info!("Φ{}: {:.2} kg", diameter_mm, weight_kg);
    }
    info!("Total rebar weight: {:.2} kg", result.total_weight_kg());

    let path = match request.output_dir {
        Some(dir) => dir.join(config.format.file_name(&config.output_stem)),
        None => report_path(request.drawing, &config.output_stem, config.format),
    };

    let mut sink = config.format.sink(path.clone());
    sink.write(&result)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    Ok(RunOutcome::Written(path))
}

/// 列出模型空间实体，按类型统计
fn list_model_space<S: EntitySource + ?Sized>(source: &S) {
    let entities = source.model_space();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    info!("Model space entities:");
    for entity in &entities {
        info!("Entity: {} ({})", entity.type_name, entity.kind);
        *counts.entry(entity.type_name.as_str()).or_default() += 1;
    }
    for (type_name, count) in counts {
        info!("{}: {}", type_name, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metraj_core::host::HostError;
    use metraj_core::source::DrawingEntity;
    use metraj_file::{DxfHost, ReportFormat};

    struct MemoryDocument {
        model: Vec<DrawingEntity>,
    }

    impl EntitySource for MemoryDocument {
        fn model_space(&self) -> Vec<DrawingEntity> {
            self.model.clone()
        }

        fn block_entities(&self, block_name: &str) -> Vec<DrawingEntity> {
            if block_name == "DETAY" {
                vec![DrawingEntity::simple_text("Φ25 l=600")]
            } else {
                Vec::new()
            }
        }
    }

    struct MemoryHost {
        model: Vec<DrawingEntity>,
    }

    impl DrawingHost for MemoryHost {
        type Document = MemoryDocument;

        fn open(&self, _path: &Path) -> Result<MemoryDocument, HostError> {
            Ok(MemoryDocument {
                model: self.model.clone(),
            })
        }
    }

    fn csv_config() -> RunConfig {
        RunConfig {
            format: ReportFormat::Csv,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let host = MemoryHost {
            model: vec![
                DrawingEntity::simple_text("2x3Φ12/200 l=450"),
                DrawingEntity::other("LINE"),
                DrawingEntity::block_reference("DETAY"),
            ],
        };
        let config = csv_config();
        let request = RunRequest {
            drawing: Path::new("plan.dxf"),
            config: &config,
            output_dir: Some(dir.path()),
            list_entities: true,
        };

        let outcome = run(&host, &request).unwrap();
        let expected = dir.path().join("donati_metraj.csv");
        assert_eq!(outcome, RunOutcome::Written(expected.clone()));

        let content = std::fs::read_to_string(&expected).unwrap();
        assert!(content.starts_with("Count,Diameter (mm)"));
        assert!(content.contains("Total,,,,"));
    }

    #[test]
    fn test_run_block_mode() {
        let dir = tempfile::tempdir().unwrap();
        let host = MemoryHost {
            model: vec![
                DrawingEntity::simple_text("2x3Φ12/200 l=450"),
                DrawingEntity::block_reference("DETAY"),
            ],
        };
        let config = RunConfig {
            mode: metraj_core::source::RetrievalMode::Block,
            ..csv_config()
        };
        let request = RunRequest {
            drawing: Path::new("plan.dxf"),
            config: &config,
            output_dir: Some(dir.path()),
            list_entities: false,
        };

        run(&host, &request).unwrap();
        let content = std::fs::read_to_string(dir.path().join("donati_metraj.csv")).unwrap();
        // 块模式只读取块内文字
        assert!(content.contains("\n1,25,"));
        assert!(!content.contains("\n6,12,"));
    }

    #[test]
    fn test_run_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let host = MemoryHost {
            model: vec![DrawingEntity::simple_text("Kolon detayı")],
        };
        let config = csv_config();
        let request = RunRequest {
            drawing: Path::new("plan.dxf"),
            config: &config,
            output_dir: Some(dir.path()),
            list_entities: false,
        };

        assert_eq!(run(&host, &request).unwrap(), RunOutcome::Empty);
        assert!(!dir.path().join("donati_metraj.csv").exists());
    }

    #[test]
    fn test_run_missing_drawing() {
        let config = RunConfig::default();
        let request = RunRequest {
            drawing: Path::new("/nonexistent/plan.dxf"),
            config: &config,
            output_dir: None,
            list_entities: false,
        };

        let outcome = run(&DxfHost::new(config.ready_policy()), &request).unwrap();
        assert_eq!(outcome, RunOutcome::HostUnavailable);
    }
}
