pub mod cli;
pub mod error;
pub mod file_storage;
pub mod image_codec;
