use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    append::{append_movie_data, AppendLayout},
    archive::ArchiveKind,
    config::ProjectorConfig,
    error::{ArchiveError, Result},
    projector::Projector,
    util::{run_blocking, walk_error},
};

/// Single-executable projector with the movie appended to the player
///
/// The player may be a bare executable, which is copied as-is, or any
/// supported archive holding one.
pub struct AppendProjector {
    settings: ProjectorConfig,
    layout: AppendLayout,
    player_entry: Option<String>,
    extension: String,
}

impl AppendProjector {
    pub fn new(settings: ProjectorConfig, layout: AppendLayout) -> Self {
        Self {
            settings,
            layout,
            player_entry: None,
            extension: String::new(),
        }
    }

    /// File name of the executable to pick out of an archive
    pub fn with_player_entry<S: Into<String>>(mut self, entry: S) -> Self {
        self.player_entry = Some(entry.into());
        self
    }

    /// Extension of the written executable, e.g. `.exe`
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn layout(&self) -> &AppendLayout {
        &self.layout
    }

    /// Path of the written executable
    pub fn projector_path(&self, output: &Path, name: &str) -> PathBuf {
        output.join(self.projector_file_name(name))
    }

    /// A regular file without an archive extension; anything else goes through [`Archive::open`]
    ///
    /// [`Archive::open`]: crate::archive::Archive::open
    async fn is_bare_executable(&self, player: &Path) -> bool {
        match tokio::fs::metadata(player).await {
            Ok(meta) => meta.is_file() && ArchiveKind::from_file_name(player).is_none(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Projector for AppendProjector {
    fn name(&self) -> &str {
        "append"
    }

    fn description(&self) -> &str {
        "Single executable player with the movie appended after a marker and size trailer"
    }

    fn settings(&self) -> &ProjectorConfig {
        &self.settings
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    async fn write_player(&self, output: &Path, name: &str) -> Result<()> {
        let player = self.player_path()?;
        let target = self.projector_path(output, name);
        tokio::fs::create_dir_all(output).await?;

        if self.is_bare_executable(player).await {
            debug!("Copying bare player {:?} to {:?}", player, target);
            tokio::fs::copy(player, &target).await?;
            return Ok(());
        }

        let archive = self.open_player_archive().await?;
        let staging = tempfile::Builder::new().prefix("projector-player-").tempdir()?;
        archive.extract_to(staging.path()).await?;

        let root = staging.path().to_path_buf();
        let entry = self.player_entry.clone();
        let source = run_blocking(move || find_player_entry(&root, entry.as_deref())).await?;

        info!("   Player entry: {:?}", source.strip_prefix(staging.path()).unwrap_or(&source));
        tokio::fs::copy(&source, &target).await?;
        Ok(())
    }

    async fn modify_player(&self, output: &Path, name: &str) -> Result<()> {
        debug!("No binary patches for {:?}", self.projector_path(output, name));
        Ok(())
    }

    async fn write_movie(&self, output: &Path, name: &str) -> Result<()> {
        let Some(movie) = self.movie_data().await? else {
            debug!("No movie configured, leaving player untouched");
            return Ok(());
        };

        let target = self.projector_path(output, name);
        append_movie_data(&target, &movie, &self.layout).await?;
        info!("   Appended {} movie bytes with layout {}", movie.len(), self.layout);
        Ok(())
    }
}

/// Locate the player executable below `root`
///
/// With a name, exactly one file must match it ignoring case; without one,
/// the tree must hold exactly one file.
fn find_player_entry(root: &Path, name: Option<&str>) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let wanted = match name {
            Some(name) => entry.file_name().to_string_lossy().eq_ignore_ascii_case(name),
            None => true,
        };
        if wanted {
            matches.push(entry.into_path());
        }
    }

    let label = name.unwrap_or("<only file>").to_string();
    match matches.len() {
        0 => Err(ArchiveError::EntryNotFound { name: label }.into()),
        1 => Ok(matches.remove(0)),
        count => Err(ArchiveError::AmbiguousEntry { name: label, count }.into()),
    }
}
