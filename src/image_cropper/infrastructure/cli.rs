use crate::application::config::CropConfig;
use clap::Parser;
use std::path::PathBuf;

/// Removes a fixed number of pixel rows from the bottom of every JPEG and PNG
/// in a directory.
#[derive(Parser, Debug)]
#[command(name = "image_cropper")]
#[command(version)]
pub struct CliArgs {
    /// input directory path
    #[arg(long, value_name = "DIR", default_value = "./tmp/images/input")]
    pub input: PathBuf,

    /// output directory path
    #[arg(long, value_name = "DIR", default_value = "./tmp/images/output")]
    pub output: PathBuf,

    /// pixels to cut from bottom
    #[arg(long, value_name = "PX", default_value_t = 60, allow_negative_numbers = true)]
    pub cut: i64,
}

impl From<CliArgs> for CropConfig {
    fn from(args: CliArgs) -> Self {
        CropConfig {
            input_dir: args.input,
            output_dir: args.output,
            cut_pixels: args.cut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let config: CropConfig = CliArgs::try_parse_from(["image_cropper"]).unwrap().into();
        assert_eq!(config, CropConfig::default());
        assert_eq!(config.input_dir, PathBuf::from("./tmp/images/input"));
        assert_eq!(config.output_dir, PathBuf::from("./tmp/images/output"));
        assert_eq!(config.cut_pixels, 60);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "image_cropper", "--input", "in", "--output", "out", "--cut", "25",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("in"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.cut, 25);
    }

    #[test]
    fn test_negative_cut_is_accepted() {
        let args = CliArgs::try_parse_from(["image_cropper", "--cut", "-10"]).unwrap();
        assert_eq!(args.cut, -10);
    }

    #[test]
    fn test_non_numeric_cut_is_rejected() {
        assert!(CliArgs::try_parse_from(["image_cropper", "--cut", "lots"]).is_err());
    }
}
