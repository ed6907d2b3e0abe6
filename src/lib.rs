//! # Projector Builder
//!
//! Assemble self-contained projectors by embedding a movie into a pre-built player.
//!
//! The player ships as a bare executable, a directory, or an archive (zip,
//! tar, tar.gz, or a macOS disk image). A projector variant extracts it,
//! optionally patches it, and embeds the movie, usually by appending it to
//! the executable behind a marker and size trailer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use projector_builder::{
//!     config::Config,
//!     pipeline::write_projector,
//!     projector::ProjectorRegistry,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.projector.player = Some("flash_player_sa_linux.x86_64.tar.gz".into());
//! config.projector.movie_file = Some("movie.swf".into());
//! config.variant.player_entry = Some("flashplayer".into());
//!
//! let projector = ProjectorRegistry::new().create(&config)?;
//! write_projector(projector.as_ref(), Path::new("out"), "application").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`archive`] - Player container resolution and extraction
//! - [`data`] - Value-or-file data resolution
//! - [`append`] - Movie data appender and layout descriptors
//! - [`projector`] - The variant trait, built-in variants and registry
//! - [`pipeline`] - Phase sequencing
//! - [`config`] - Configuration management
//!
//! ## Creating Custom Variants
//!
//! Implement the [`Projector`](projector::Projector) trait:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use async_trait::async_trait;
//! use projector_builder::{config::ProjectorConfig, projector::Projector, Result};
//!
//! struct MyProjector {
//!     settings: ProjectorConfig,
//! }
//!
//! #[async_trait]
//! impl Projector for MyProjector {
//!     fn name(&self) -> &str {
//!         "my_projector"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "My platform"
//!     }
//!
//!     fn settings(&self) -> &ProjectorConfig {
//!         &self.settings
//!     }
//!
//!     async fn write_player(&self, output: &Path, name: &str) -> Result<()> {
//!         let archive = self.open_player_archive().await?;
//!         archive.extract_to(output.join(name)).await
//!     }
//!
//!     async fn modify_player(&self, _output: &Path, _name: &str) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn write_movie(&self, _output: &Path, _name: &str) -> Result<()> {
//!         Ok(())
//!     }
//! }
//! ```

pub mod append;
pub mod archive;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod projector;
pub mod util;

// Re-export commonly used types for convenience
pub use crate::{
    append::{AppendLayout, MOVIE_APPEND_MARKER},
    config::Config,
    error::{ProjectorError, Result},
    pipeline::write_projector,
    projector::{Projector, ProjectorRegistry},
};
