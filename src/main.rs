use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use projector_builder::{
    append::AppendLayout,
    config::Config,
    pipeline::write_projector,
    projector::ProjectorRegistry,
};

#[derive(Parser)]
#[command(
    name = "projector",
    version,
    about = "Embed a movie into a player to build a standalone projector",
    long_about = "Projector extracts a pre-built player from a directory or archive (zip, tar, tar.gz, dmg) and embeds a movie into it following the player's binary layout."
)]
struct Cli {
    /// Player file, directory or archive
    #[arg(short, long)]
    player: Option<PathBuf>,

    /// Movie file to embed
    #[arg(short, long)]
    movie: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, required_unless_present = "list_variants")]
    output: Option<PathBuf>,

    /// Projector name
    #[arg(short, long, default_value = "application")]
    name: String,

    /// Projector variant (append, bundle)
    #[arg(long)]
    variant: Option<String>,

    /// Append layout tags, e.g. dms or dmsl
    #[arg(short, long)]
    layout: Option<AppendLayout>,

    /// Player executable to pick out of an archive
    #[arg(long)]
    player_entry: Option<String>,

    /// Path to hdiutil for disk image players
    #[arg(long)]
    hdiutil: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available variants and exit
    #[arg(long)]
    list_variants: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(player) = &self.player {
            config.projector.player = Some(player.clone());
        }
        if let Some(movie) = &self.movie {
            config.projector.movie_file = Some(movie.clone());
        }
        if let Some(hdiutil) = &self.hdiutil {
            config.projector.tool_override_path = Some(hdiutil.clone());
        }
        if let Some(variant) = &self.variant {
            config.variant.kind = variant.clone();
        }
        if let Some(layout) = &self.layout {
            config.variant.layout = layout.clone();
        }
        if let Some(entry) = &self.player_entry {
            config.variant.player_entry = Some(entry.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Projector v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    cli.apply(&mut config);
    config.validate()?;

    info!("Player: {:?}", config.projector.player);
    info!("Movie: {:?}", config.projector.movie_file);
    info!("Variant: {} (layout {})", config.variant.kind, config.variant.layout);

    let registry = ProjectorRegistry::new();
    if cli.list_variants {
        for (name, description) in registry.describe_variants(&config)? {
            println!("{:<10} {}", name, description);
        }
        return Ok(());
    }

    let Some(output) = &cli.output else {
        anyhow::bail!("--output is required");
    };
    let projector = registry
        .create(&config)
        .map_err(|e| anyhow::anyhow!("{} (available: {})", e.user_message(), registry.available_variants().join(", ")))?;

    if let Err(e) = write_projector(projector.as_ref(), output, &cli.name).await {
        anyhow::bail!(e.user_message());
    }

    info!("Projector saved to: {:?}", output);
    Ok(())
}
