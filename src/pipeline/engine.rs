use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::{error::Result, projector::Projector};

/// The three write phases, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WritePlayer,
    ModifyPlayer,
    WriteMovie,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::WritePlayer, Phase::ModifyPlayer, Phase::WriteMovie];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::WritePlayer => "write player",
            Phase::ModifyPlayer => "modify player",
            Phase::WriteMovie => "write movie",
        };
        f.write_str(name)
    }
}

/// Write out a projector
///
/// Runs [`Phase::ALL`] in order against `projector` and stops at the first
/// failure. Earlier phases are not rolled back, so a failed call can leave a
/// partial projector in `output`; retry against a clean path.
///
/// # Arguments
///
/// * `projector` - The variant to run
/// * `output` - Directory the projector is written into
/// * `name` - Projector name, with or without the variant extension
pub async fn write_projector(projector: &dyn Projector, output: &Path, name: &str) -> Result<()> {
    info!("🎬 Writing {} projector '{}'", projector.name(), name);
    info!("   Variant: {}", projector.description());
    info!("   Output: {:?}", output);

    for (step, phase) in Phase::ALL.iter().enumerate() {
        info!("Step {}: {}...", step + 1, phase);

        let result = match phase {
            Phase::WritePlayer => projector.write_player(output, name).await,
            Phase::ModifyPlayer => projector.modify_player(output, name).await,
            Phase::WriteMovie => projector.write_movie(output, name).await,
        };

        if let Err(e) = result {
            warn!("Phase '{}' failed, projector in {:?} is incomplete: {}", phase, output, e);
            return Err(e);
        }
    }

    info!("🎉 Projector complete: {:?}", output.join(projector.projector_file_name(name)));
    Ok(())
}
