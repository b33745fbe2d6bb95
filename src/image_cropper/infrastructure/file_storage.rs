use super::error::InfrastructureError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// A regular (non-directory) entry of the input directory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: OsString,
    pub path: PathBuf,
}

impl FileEntry {
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

pub struct LocalFileStorage;

impl LocalFileStorage {
    pub fn new() -> Self {
        Self
    }

    /// Creates `dir` and any missing parents.
    pub fn ensure_dir(&self, dir: &Path) -> Result<(), InfrastructureError> {
        fs::create_dir_all(dir).map_err(|e| InfrastructureError::directory(dir, e))
    }

    /// Non-directory entries of `dir` sorted by name. Subdirectories are skipped, not walked.
    pub fn list_files(&self, dir: &Path) -> Result<Vec<FileEntry>, InfrastructureError> {
        let read_dir = fs::read_dir(dir).map_err(|e| InfrastructureError::directory(dir, e))?;

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| InfrastructureError::directory(dir, e))?;
            // シンボリックリンクは辿らない
            let file_type = entry.file_type().map_err(|e| InfrastructureError::directory(entry.path(), e))?;
            if file_type.is_dir() {
                continue;
            }
            files.push(FileEntry { name: entry.file_name(), path: entry.path() });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

impl Default for LocalFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_image_path(dir: &Path, file_name: impl AsRef<Path>) -> PathBuf {
    dir.join(file_name)
}

/// `cropped_` + original name, so outputs keep their extension.
pub fn output_file_name(name: &OsString) -> OsString {
    let mut out = OsString::from("cropped_");
    out.push(name);
    out
}
