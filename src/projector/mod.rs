//! # Projector Variants
//!
//! A variant knows how one platform's player is laid out: how to write the
//! player, how to patch it, and where the movie goes. Variants implement
//! [`Projector`] and are run by [`write_projector`](crate::pipeline::write_projector).
//!
//! ## Built-in Variants
//!
//! - **append**: single executable, movie appended after a marker and size trailer
//! - **bundle**: application bundle, movie written to `Contents/Resources`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use projector_builder::{config::Config, projector::ProjectorRegistry};
//!
//! let registry = ProjectorRegistry::new();
//! let projector = registry.create(&Config::default()).unwrap();
//! assert_eq!(projector.name(), "append");
//! ```

pub mod registry;
pub mod traits;

mod bundle;
mod executable;

pub use registry::ProjectorRegistry;
pub use traits::{maybe_write_file, Projector};

pub use bundle::BundleProjector;
pub use executable::AppendProjector;
