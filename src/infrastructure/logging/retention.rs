//! Removal of log files older than the configured retention.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;

use super::logger::LOG_FILE_NAME;

/// Delete rolled log files in `log_dir` last modified more than
/// `retention_days` ago. Returns the number of files removed.
pub async fn purge_expired_logs(log_dir: impl AsRef<Path>, retention_days: u32) -> Result<usize> {
    let log_dir = log_dir.as_ref();
    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
    let mut deleted = 0;

    let mut entries = tokio::fs::read_dir(log_dir)
        .await
        .context("failed to read log directory")?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .context("failed to read directory entry")?
    {
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_NAME));
        if !is_log {
            continue;
        }

        let modified: DateTime<Utc> = tokio::fs::metadata(&path)
            .await
            .context("failed to get file metadata")?
            .modified()
            .context("failed to get file modification time")?
            .into();

        if modified < cutoff {
            tokio::fs::remove_file(&path)
                .await
                .context("failed to delete old log file")?;
            tracing::debug!(path = %path.display(), "deleted expired log file");
            deleted += 1;
        }
    }

    Ok(deleted)
}
