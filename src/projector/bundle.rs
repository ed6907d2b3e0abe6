use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    archive::ArchiveKind,
    config::ProjectorConfig,
    error::{ArchiveError, Result},
    projector::{maybe_write_file, Projector},
    util::{copy_tree, has_suffix_ignore_case, run_blocking, walk_error},
};

const BUNDLE_EXTENSION: &str = ".app";

/// Application-bundle projector with the movie stored as a resource file
pub struct BundleProjector {
    settings: ProjectorConfig,
    movie_name: String,
}

impl BundleProjector {
    pub fn new(settings: ProjectorConfig) -> Self {
        Self {
            settings,
            movie_name: "movie.swf".to_string(),
        }
    }

    /// File name of the movie inside `Contents/Resources`
    pub fn with_movie_name<S: Into<String>>(mut self, movie_name: S) -> Self {
        self.movie_name = movie_name.into();
        self
    }

    /// Path of the written bundle
    pub fn bundle_path(&self, output: &Path, name: &str) -> PathBuf {
        output.join(self.projector_file_name(name))
    }

    pub fn resources_path(&self, output: &Path, name: &str) -> PathBuf {
        self.bundle_path(output, name).join("Contents").join("Resources")
    }

    pub fn movie_path(&self, output: &Path, name: &str) -> PathBuf {
        self.resources_path(output, name).join(&self.movie_name)
    }
}

#[async_trait]
impl Projector for BundleProjector {
    fn name(&self) -> &str {
        "bundle"
    }

    fn description(&self) -> &str {
        "Application bundle player with the movie written into Contents/Resources"
    }

    fn settings(&self) -> &ProjectorConfig {
        &self.settings
    }

    fn extension(&self) -> &str {
        BUNDLE_EXTENSION
    }

    async fn write_player(&self, output: &Path, name: &str) -> Result<()> {
        let archive = self.open_player_archive().await?;
        let target = self.bundle_path(output, name);
        let copy_target = target.clone();

        let source = if archive.kind() == ArchiveKind::Directory && is_bundle_name(archive.path()) {
            // The player is the bundle itself
            let source = archive.path().to_path_buf();
            let copy_source = source.clone();
            run_blocking(move || copy_tree(&copy_source, &copy_target)).await?;
            source
        } else {
            let staging = tempfile::Builder::new().prefix("projector-bundle-").tempdir()?;
            archive.extract_to(staging.path()).await?;

            let root = staging.path().to_path_buf();
            run_blocking(move || {
                let source = find_bundle(&root)?;
                copy_tree(&source, &copy_target)?;
                Ok(source)
            })
            .await?
        };

        info!("   Bundle: {:?}", source.file_name().unwrap_or_default());
        tokio::fs::create_dir_all(self.resources_path(output, name)).await?;
        debug!("Wrote bundle to {:?}", target);
        Ok(())
    }

    async fn modify_player(&self, output: &Path, name: &str) -> Result<()> {
        debug!("No binary patches for {:?}", self.bundle_path(output, name));
        Ok(())
    }

    async fn write_movie(&self, output: &Path, name: &str) -> Result<()> {
        let movie = self.movie_data().await?;
        let path = self.movie_path(output, name);
        maybe_write_file(movie.as_deref(), &path, true).await?;
        if let Some(movie) = movie {
            info!("   Wrote {} movie bytes to {:?}", movie.len(), path);
        }
        Ok(())
    }
}

fn is_bundle_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| has_suffix_ignore_case(&name.to_string_lossy(), BUNDLE_EXTENSION))
}

/// The shallowest `*.app` directory below `root`
fn find_bundle(root: &Path) -> Result<PathBuf> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_type().is_dir());

    let mut best: Option<walkdir::DirEntry> = None;
    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if !is_bundle_name(entry.path()) {
            continue;
        }
        if best.as_ref().map_or(true, |current| entry.depth() < current.depth()) {
            best = Some(entry);
        }
    }

    best.map(|entry| entry.into_path())
        .ok_or_else(|| ArchiveError::EntryNotFound { name: format!("*{}", BUNDLE_EXTENSION) }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectorError;
    use std::fs;
    use tempfile::tempdir;

    fn make_player_dir(root: &Path) -> PathBuf {
        let player = root.join("player");
        let bundle = player.join("Flash Player.app/Contents");
        fs::create_dir_all(bundle.join("MacOS")).unwrap();
        fs::create_dir_all(bundle.join("Resources")).unwrap();
        fs::write(bundle.join("MacOS/Flash Player"), b"macho").unwrap();
        fs::write(bundle.join("Resources/movie.swf"), b"placeholder").unwrap();
        player
    }

    #[tokio::test]
    async fn test_bundle_from_directory() {
        let dir = tempdir().unwrap();
        let player = make_player_dir(dir.path());
        let output = dir.path().join("out");

        let projector = BundleProjector::new(ProjectorConfig {
            player: Some(player),
            movie_data: Some(b"FWS movie".to_vec()),
            ..Default::default()
        });

        projector.write_player(&output, "Game").await.unwrap();
        projector.modify_player(&output, "Game").await.unwrap();
        projector.write_movie(&output, "Game").await.unwrap();

        assert_eq!(fs::read(output.join("Game.app/Contents/MacOS/Flash Player")).unwrap(), b"macho");
        assert_eq!(fs::read(output.join("Game.app/Contents/Resources/movie.swf")).unwrap(), b"FWS movie");
    }

    #[tokio::test]
    async fn test_bundle_without_movie_keeps_resources() {
        let dir = tempdir().unwrap();
        let player = make_player_dir(dir.path());
        let output = dir.path().join("out");

        let projector = BundleProjector::new(ProjectorConfig {
            player: Some(player),
            ..Default::default()
        });
        projector.write_player(&output, "Game.APP").await.unwrap();
        projector.write_movie(&output, "Game.APP").await.unwrap();

        assert_eq!(
            fs::read(output.join("Game.app/Contents/Resources/movie.swf")).unwrap(),
            b"placeholder"
        );
    }

    #[tokio::test]
    async fn test_player_is_the_bundle() {
        let dir = tempdir().unwrap();
        let player = make_player_dir(dir.path()).join("Flash Player.app");
        let output = dir.path().join("out");

        let projector = BundleProjector::new(ProjectorConfig {
            player: Some(player),
            movie_data: Some(b"FWS movie".to_vec()),
            ..Default::default()
        });
        projector.write_player(&output, "Game").await.unwrap();
        projector.write_movie(&output, "Game").await.unwrap();

        assert_eq!(fs::read(output.join("Game.app/Contents/MacOS/Flash Player")).unwrap(), b"macho");
        assert_eq!(fs::read(output.join("Game.app/Contents/Resources/movie.swf")).unwrap(), b"FWS movie");
    }

    #[test]
    fn test_find_bundle_reports_walk_errors() {
        let dir = tempdir().unwrap();
        let err = find_bundle(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, ProjectorError::Io(_)));
    }

    #[tokio::test]
    async fn test_missing_bundle() {
        let dir = tempdir().unwrap();
        let player = dir.path().join("player");
        fs::create_dir_all(&player).unwrap();
        fs::write(player.join("readme.txt"), b"no bundle").unwrap();

        let projector = BundleProjector::new(ProjectorConfig {
            player: Some(player),
            ..Default::default()
        });
        let err = projector.write_player(&dir.path().join("out"), "Game").await.unwrap_err();
        assert!(matches!(err, ProjectorError::Archive(ArchiveError::EntryNotFound { .. })));
    }
}
