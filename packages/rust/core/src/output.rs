//! Artifact writing.

use std::path::Path;

use termdoc_shared::{Result, TermdocError};

/// Write `content` to `path` via a sibling temp file and a rename, creating
/// parent directories as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TermdocError::io(parent, e))?;
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = std::path::PathBuf::from(temp);

    std::fs::write(&temp, content).map_err(|e| TermdocError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| TermdocError::io(path, e))?;
    Ok(())
}
