use std::path::PathBuf;
use tracing::{debug, info};
use validator::Validate;

use crate::analyzers::DatasetSummary;
use crate::cli::args::{Cli, Commands, ExportFormat};
use crate::config::{AppConfig, ConfigLoader};
use crate::dashboard::build_layout;
use crate::error::Result;
use crate::models::Dataset;
use crate::processors::{DatasetLoader, LoadReport};
use crate::server::{AppState, DashboardServer};
use crate::utils::generate_default_export_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvExporter, ParquetWriter};

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ConfigLoader::new()
        .with_file(cli.config.as_deref())
        .with_env()
        .build()?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Serve {
            data,
            bind,
            assets,
            workers,
        } => {
            apply_data_override(&mut config, data);
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            if let Some(assets) = assets {
                config.server.assets_dir = assets;
            }
            if let Some(workers) = workers {
                config.data.max_workers = workers;
            }
            config.validate()?;

            let load_config = config.clone();
            let (dataset, report) =
                tokio::task::spawn_blocking(move || load_dataset(&load_config, quiet)).await??;
            info!(
                "Dataset ready: {} events retained, {} dropped",
                report.rows_retained,
                report.dropped_rows()
            );

            let state = AppState::new(dataset, &config.layout)?;
            DashboardServer::new(state, &config.server.assets_dir)
                .serve(&config.server.bind_addr)
                .await?;
        }

        Commands::Validate { data } => {
            apply_data_override(&mut config, data);
            let (dataset, report) = load_dataset(&config, quiet)?;

            println!("\n{}", report.generate_summary());
            println!("Validation complete: {} events usable", dataset.len());
        }

        Commands::Info { data, sample } => {
            apply_data_override(&mut config, data);
            let (dataset, _report) = load_dataset(&config, quiet)?;
            let summary = DatasetSummary::from_dataset(&dataset)?;

            println!("\n{}", summary.detailed_summary());

            if sample > 0 {
                println!("Sample Records (showing {} records):", sample.min(dataset.len()));
                for (i, record) in dataset.iter().take(sample).enumerate() {
                    println!(
                        "{}. {} M{} depth {} km at ({:.3}, {:.3}) - {} [{}]",
                        i + 1,
                        record.time.format("%Y-%m-%d %H:%M:%S"),
                        optional(record.mag, 1),
                        optional(record.depth, 1),
                        record.latitude,
                        record.longitude,
                        record.region,
                        record.magnitude_category
                    );
                }
            }
        }

        Commands::Layout { data } => {
            apply_data_override(&mut config, data);
            let (dataset, _report) = load_dataset(&config, quiet)?;
            let summary = DatasetSummary::from_dataset(&dataset)?;
            let layout = build_layout(&summary, &config.layout);

            println!("{}", serde_json::to_string_pretty(&layout)?);
        }

        Commands::Export {
            data,
            output,
            format,
            compression,
            chunk_size,
        } => {
            apply_data_override(&mut config, data);
            let output =
                output.unwrap_or_else(|| generate_default_export_filename(format.extension()));
            let (dataset, _report) = load_dataset(&config, quiet)?;

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            match format {
                ExportFormat::Parquet => {
                    let writer = ParquetWriter::new().with_compression(&compression)?;
                    let progress =
                        ProgressReporter::new(dataset.len() as u64, "Writing Parquet...", quiet);
                    writer.write_events(dataset.records(), &output, chunk_size, Some(&progress))?;
                    progress.finish_with_message("Export complete");

                    let file_info = writer.get_file_info(&output)?;
                    println!("\n{}", file_info.summary());
                }
                ExportFormat::Csv => {
                    CsvExporter::new().write_file(dataset.records(), &output)?;
                }
            }

            println!("Exported {} events to {}", dataset.len(), output.display());
        }
    }

    Ok(())
}

fn apply_data_override(config: &mut AppConfig, data: Option<PathBuf>) {
    if let Some(path) = data {
        debug!("Dataset path from command line: {}", path.display());
        config.data.path = Some(path);
    }
}

/// Blocking load with a spinner on interactive runs.
fn load_dataset(config: &AppConfig, quiet: bool) -> Result<(Dataset, LoadReport)> {
    let path = config.data_path()?;
    info!("Loading earthquake events from {}", path.display());

    let progress = ProgressReporter::new_spinner("Loading dataset...", quiet);
    let loader = DatasetLoader::new(config.data.max_workers)
        .with_mmap(config.data.use_mmap)
        .with_encoding(&config.data.encoding);

    match loader.load(path, Some(&progress)) {
        Ok(loaded) => Ok(loaded),
        Err(e) => {
            progress.finish_and_clear();
            Err(e)
        }
    }
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "n/a".to_string())
}
