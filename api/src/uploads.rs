use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// URL path under which saved uploads are served.
pub const URL_PREFIX: &str = "/uploads";

/// Fresh names to try before giving up on a crowded directory.
const MAX_NAME_ATTEMPTS: usize = 4;

#[derive(Debug)]
pub struct SavedUpload {
    pub path: PathBuf,
    /// Relative URL, e.g. `/uploads/1700000000000-0badf00d-me.png`.
    pub url: String,
}

/// `<unix-millis>-<tag>-<name>`, with the client's name reduced to a safe
/// basename.
pub fn stored_file_name(original: &str, now: DateTime<Utc>, tag: u32) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let mut name: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.trim_matches('.').is_empty() {
        name = "upload".to_string();
    }
    format!("{}-{:08x}-{}", now.timestamp_millis(), tag, name)
}

/// Write an upload under a name no other upload holds. Existing files are
/// never truncated.
pub async fn save(dir: &Path, original_name: &str, bytes: &[u8]) -> std::io::Result<SavedUpload> {
    tokio::fs::create_dir_all(dir).await?;

    let mut attempts = 0;
    let (file_name, path, file) = loop {
        let file_name = stored_file_name(original_name, Utc::now(), OsRng.next_u32());
        let path = dir.join(&file_name);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => break (file_name, path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && attempts + 1 < MAX_NAME_ATTEMPTS => {
                attempts += 1;
            }
            Err(e) => return Err(e),
        }
    };

    write_or_remove(file, &path, bytes).await?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "saved upload");

    Ok(SavedUpload {
        path,
        url: format!("{}/{}", URL_PREFIX, file_name),
    })
}

/// A failed write must not leave a truncated file behind.
async fn write_or_remove<W>(mut writer: W, path: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove partial upload");
        }
        return Err(e);
    }
    Ok(())
}

/// Best-effort removal of an upload whose account was never created.
pub async fn discard(upload: &SavedUpload) {
    if let Err(e) = tokio::fs::remove_file(&upload.path).await {
        tracing::warn!(path = %upload.path.display(), error = %e, "failed to remove orphaned upload");
    }
}
