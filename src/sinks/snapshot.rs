use std::path::Path;

use crate::domain::Snapshot;
use crate::error::{AppError, AppResult, SinkError};

/// Serializes the snapshot as pretty JSON and replaces `path`.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> AppResult<()> {
    let payload = serde_json::to_vec_pretty(snapshot)
        .map_err(|err| AppError::sink(SinkError::SerializeSnapshot { source: err }))?;
    tokio::fs::write(path, payload).await.map_err(|err| {
        AppError::sink(SinkError::WriteSnapshot {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    tracing::debug!("Snapshot written to {}", path.display());
    Ok(())
}

/// Loads a snapshot previously written by [`write_snapshot`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot.
pub async fn read_snapshot(path: &Path) -> AppResult<Snapshot> {
    let payload = tokio::fs::read(path).await.map_err(|err| {
        AppError::sink(SinkError::ReadSnapshot {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    serde_json::from_slice(&payload).map_err(|err| {
        AppError::sink(SinkError::ParseSnapshot {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
