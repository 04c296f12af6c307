use std::fs;
use std::path::Path;

use crate::error::{ImageError, Result};

/// Read file contents.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| ImageError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write file contents. Parent directories must already exist.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|e| ImageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
