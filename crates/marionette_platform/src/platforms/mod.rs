//! Platform implementations.

pub mod dry_run;
pub mod workspace;

pub use dry_run::DryRunPlatform;
pub use workspace::WorkspacePlatform;
