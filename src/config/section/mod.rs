//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitepack.toml`:
//!
//! | Module     | TOML Section   | Purpose                                   |
//! |------------|----------------|-------------------------------------------|
//! | `build`    | `[build]`      | Paths, exclusions, minify, obfuscate,     |
//! |            |                | guard and data staging                    |

pub mod build;

pub use build::{
    BuildSectionConfig, GuardConfig, NameSeed, ObfuscateConfig, RewriteMode, StageConfig,
};
