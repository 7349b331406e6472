//! JSON array files shared by every file-backed source.

use crate::application::error::InfrastructureError;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;

/// Reads a JSON array of rows.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns `InfrastructureError::Io` if the file exists but cannot be read and
/// `InfrastructureError::Serialization` if it is not an array of `T`.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, InfrastructureError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(InfrastructureError::io(format!("{}: {e}", path.display()))),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| InfrastructureError::serialization(format!("{}: {e}", path.display())))
}
