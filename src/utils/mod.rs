//! Utility modules for the build pipeline.

pub mod path;
pub mod plural;

pub use plural::plural_count;
