use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    archive::Archive,
    config::ProjectorConfig,
    error::Result,
    util::trim_extension,
};

/// Core trait that all projector variants must implement
///
/// A variant supplies the three write phases; [`write_projector`] runs them
/// in order. The provided methods are shared helpers built on
/// [`Projector::settings`].
///
/// [`write_projector`]: crate::pipeline::write_projector
#[async_trait]
pub trait Projector: Send + Sync {
    /// Returns the unique name of this variant
    fn name(&self) -> &str;

    /// Returns a human-readable description of this variant
    fn description(&self) -> &str;

    /// Player and movie inputs
    fn settings(&self) -> &ProjectorConfig;

    /// Extension of the written projector, e.g. `.app`; empty for none
    fn extension(&self) -> &str {
        ""
    }

    /// Extract or copy the player into `output`, named after `name`
    async fn write_player(&self, output: &Path, name: &str) -> Result<()>;

    /// Patch the written player in place
    async fn modify_player(&self, output: &Path, name: &str) -> Result<()>;

    /// Embed the movie into the written player
    async fn write_movie(&self, output: &Path, name: &str) -> Result<()>;

    /// Projector name with the variant extension trimmed, ignoring case
    fn name_without_extension<'a>(&self, name: &'a str) -> &'a str {
        trim_extension(name, self.extension())
    }

    /// File name of the written projector, with the variant extension
    fn projector_file_name(&self, name: &str) -> String {
        format!("{}{}", self.name_without_extension(name), self.extension())
    }

    /// Configured player path, or [`PlayerNotSet`](crate::ProjectorError::PlayerNotSet)
    fn player_path(&self) -> Result<&Path> {
        self.settings().player_path()
    }

    /// Open the configured player as an archive
    async fn open_player_archive(&self) -> Result<Archive> {
        let settings = self.settings();
        let player = settings.player_path()?;
        Archive::open(player, settings.tool_override_path.as_deref()).await
    }

    /// Movie bytes from data or file, `None` if neither is configured
    async fn movie_data(&self) -> Result<Option<Vec<u8>>> {
        self.settings().movie_source().resolve().await
    }
}

/// Write `data` to `path` if there is any data
///
/// Nothing happens when `data` is `None`. Otherwise an existing file at
/// `path` is removed first when `remove` is set.
pub async fn maybe_write_file(data: Option<&[u8]>, path: &Path, remove: bool) -> Result<()> {
    let Some(data) = data else {
        debug!("No data to write to {:?}", path);
        return Ok(());
    };

    if remove {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("Removed existing {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    tokio::fs::write(path, data).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_maybe_write_none_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movie.swf");
        std::fs::write(&path, b"old").unwrap();

        maybe_write_file(None, &path, true).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"old");

        let missing = dir.path().join("missing.swf");
        maybe_write_file(None, &missing, false).await.unwrap();
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn test_maybe_write_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movie.swf");
        std::fs::write(&path, b"a much longer old movie").unwrap();

        maybe_write_file(Some(&b"new"[..]), &path, true).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");

        let fresh = dir.path().join("fresh.swf");
        maybe_write_file(Some(&b"fresh"[..]), &fresh, true).await.unwrap();
        assert_eq!(std::fs::read(&fresh).unwrap(), b"fresh");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remove_breaks_hard_link() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("original.swf");
        let linked = dir.path().join("movie.swf");
        std::fs::write(&original, b"shared").unwrap();
        std::fs::hard_link(&original, &linked).unwrap();

        maybe_write_file(Some(&b"mine"[..]), &linked, true).await.unwrap();
        assert_eq!(std::fs::read(&original).unwrap(), b"shared");
        assert_eq!(std::fs::read(&linked).unwrap(), b"mine");
    }
}
