use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use super::config::CropConfig;
use super::error::ApplicationError;

use crate::domain::crop::crop_bottom;
use crate::domain::image_codec_trait::ImageCodec;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::file_storage::{build_image_path, output_file_name, LocalFileStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Decode,
    Encode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub file_name: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Outcome of a batch run that got past the directory checks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// One line per failed file, in processing order.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| {
                let stage = match f.stage {
                    FailureStage::Decode => "decode",
                    FailureStage::Encode => "encode",
                };
                format!("{} ({}): {}", f.file_name, stage, f.message)
            })
            .collect()
    }

    fn record_failure(&mut self, file_name: String, stage: FailureStage, error: &InfrastructureError) {
        self.failed += 1;
        self.failures.push(FileFailure { file_name, stage, message: error.to_string() });
    }
}

pub struct CropService {
    codec: Arc<dyn ImageCodec + Send + Sync>, // トレイトオブジェクトとして保持
    storage: LocalFileStorage,
}

impl CropService {
    pub fn new(codec: Arc<dyn ImageCodec + Send + Sync>) -> Self {
        Self { codec, storage: LocalFileStorage::new() }
    }

    /// Crops every file directly inside `config.input_dir` into `config.output_dir`.
    ///
    /// Only directory-level errors are fatal. A file that fails to decode or
    /// encode is logged, counted and skipped.
    pub fn crop_images(&self, config: &CropConfig) -> Result<BatchReport, ApplicationError> {
        self.storage.ensure_dir(&config.output_dir)?;
        let entries = self.storage.list_files(&config.input_dir)?;

        let mut report = BatchReport::default();
        for entry in entries {
            let name = entry.display_name();
            let output_path = build_image_path(&config.output_dir, output_file_name(&entry.name));

            match self.crop_file(&entry.path, &output_path, config.cut_pixels) {
                Ok(()) => {
                    info!("processed: {}", name);
                    report.succeeded += 1;
                }
                Err((_, e)) if e.is_fatal() => return Err(e.into()),
                Err((stage, e)) => {
                    match stage {
                        FailureStage::Decode => warn!("failed to decode {}: {}", name, e),
                        FailureStage::Encode => warn!("failed to save {}: {}", name, e),
                    }
                    report.record_failure(name, stage, &e);
                }
            }
        }

        info!("completed: {} succeeded, {} failed", report.succeeded, report.failed);
        Ok(report)
    }

    fn crop_file(
        &self,
        input_path: &Path,
        output_path: &Path,
        cut_pixels: i64,
    ) -> Result<(), (FailureStage, InfrastructureError)> {
        let (image, format) = self.codec.decode(input_path).map_err(|e| (FailureStage::Decode, e))?;
        let cropped = crop_bottom(&image, cut_pixels);
        self.codec
            .encode(output_path, &cropped, format)
            .map_err(|e| (FailureStage::Encode, e))
    }
}
