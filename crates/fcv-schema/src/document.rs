//! Reading candidate documents from disk.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::DocumentError;

/// Read a document's raw bytes.
///
/// A missing file maps to [`DocumentError::NotFound`]; any other I/O failure
/// maps to [`DocumentError::Read`]. The path is reported exactly as given.
pub fn read_document(path: &Path) -> Result<Vec<u8>, DocumentError> {
    std::fs::read(path).map_err(|e| {
        let path = path.display().to_string();
        match e.kind() {
            ErrorKind::NotFound => DocumentError::NotFound { path },
            _ => DocumentError::Read {
                path,
                reason: e.to_string(),
            },
        }
    })
}
