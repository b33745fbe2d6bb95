mod application;
mod domain;
mod infrastructure;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use application::config::CropConfig;
use application::crop_service::{BatchReport, CropService};
use infrastructure::cli::CliArgs;
use infrastructure::image_codec::ImageCrateCodec;

fn main() -> ExitCode {
    // RUST_LOG でレベル指定、未指定なら info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config: CropConfig = CliArgs::parse().into();
    finish(run(&config))
}

fn run(config: &CropConfig) -> anyhow::Result<BatchReport> {
    let service = CropService::new(Arc::new(ImageCrateCodec::new()));
    service.crop_images(config).context("failed to crop images")
}

/// Logs the outcome. Per-file failures still exit zero.
fn finish(result: anyhow::Result<BatchReport>) -> ExitCode {
    match result {
        Ok(report) => {
            for line in report.failure_lines() {
                warn!("skipped {}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
