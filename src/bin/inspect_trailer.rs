// Print the movie size recorded in a projector's append trailer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use projector_builder::AppendLayout;

#[derive(Parser)]
#[command(name = "inspect-trailer", version, about = "Read the movie size from a projector trailer")]
struct Cli {
    /// Projector executable
    file: PathBuf,

    /// Layout the projector was written with
    #[arg(default_value = "dms")]
    layout: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout = AppendLayout::parse(&cli.layout)?;

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("Could not read {}", cli.file.display()))?;

    match layout.payload_len_from_tail(&bytes) {
        Some(size) => {
            println!("📦 {}", cli.file.display());
            println!("   Layout: {}", layout);
            println!("   Trailer: {} bytes", layout.trailer_len());
            println!("   Movie size: {} bytes", size);
            Ok(())
        }
        None => anyhow::bail!("No {} trailer found at the end of {}", layout, cli.file.display()),
    }
}
