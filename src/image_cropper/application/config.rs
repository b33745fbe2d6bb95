use std::path::PathBuf;

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct CropConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Rows removed from the bottom of each image. Non-positive means unchanged.
    pub cut_pixels: i64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./tmp/images/input"),
            output_dir: PathBuf::from("./tmp/images/output"),
            cut_pixels: 60,
        }
    }
}
