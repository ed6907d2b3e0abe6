use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::append::AppendLayout;
use crate::error::{AppendError, Result};

/// Append movie data to `target` following `layout`
///
/// The whole sequence is assembled first and written with one call on a
/// single append-mode handle. A failed write is reported as-is; the file is
/// not truncated back.
pub async fn append_movie_data(target: &Path, payload: &[u8], layout: &AppendLayout) -> Result<()> {
    let bytes = layout.encode(payload)?;

    match tokio::fs::metadata(target).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_a_file(target)),
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_a_file(target)),
        Err(e) => return Err(e.into()),
    }

    debug!(
        "Appending {} bytes ({} movie bytes, layout {}) to {:?}",
        bytes.len(),
        payload.len(),
        layout,
        target
    );

    let mut file = OpenOptions::new().append(true).open(target).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Parse `format` and append; an unknown tag fails before `target` is touched
pub async fn append_with_format(target: &Path, payload: &[u8], format: &str) -> Result<()> {
    let layout = AppendLayout::parse(format)?;
    append_movie_data(target, payload, &layout).await
}

fn not_a_file(path: &Path) -> crate::error::ProjectorError {
    AppendError::NotAFile { path: path.display().to_string() }.into()
}
