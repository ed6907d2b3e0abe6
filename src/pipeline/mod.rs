//! # Projector Pipeline
//!
//! Sequences the three write phases of a projector variant: write the
//! player, modify it, then embed the movie.

pub mod engine;

// Re-exports for convenience
pub use engine::{write_projector, Phase};
