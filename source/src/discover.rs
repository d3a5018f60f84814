//! Instance file discovery.

use std::path::{Path, PathBuf};

use rdf2pg_graph::{Error, Result};
use tracing::debug;
use walkdir::WalkDir;

/// Extension of instance files picked up from directories.
pub const INSTANCE_EXTENSION: &str = "nt";

/// Expands `inputs` into the list of instance files to read.
///
/// A file input is kept as given, whatever its extension. A directory input
/// is walked recursively in file-name order and contributes its `*.nt`
/// files. The result preserves input order and drops repeated paths.
///
/// # Errors
///
/// Returns [`Error::Io`] if an input does not exist or a directory cannot be
/// traversed.
pub fn discover_instances(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = Vec::new();
    for input in inputs {
        let meta = std::fs::metadata(input).map_err(|e| Error::io(input, e))?;
        if meta.is_dir() {
            let before = found.len();
            collect_dir(input, &mut found)?;
            debug!(dir = %input.display(), files = found.len() - before, "walked instance directory");
        } else if !found.contains(input) {
            found.push(input.clone());
        }
    }
    Ok(found)
}

fn collect_dir(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            Error::io(path, source)
        })?;
        let path = entry.path();
        let is_instance = entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(INSTANCE_EXTENSION);
        if is_instance && !found.iter().any(|p| p == path) {
            found.push(path.to_path_buf());
        }
    }
    Ok(())
}
