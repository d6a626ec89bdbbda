//! Temp artifact lifecycle and final output placement

pub mod artifacts;
pub mod writer;

pub use artifacts::{ArtifactKind, ArtifactManager, CleanupReport, TempArtifact};
pub use writer::move_file;
