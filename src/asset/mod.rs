//! Asset transformation.
//!
//! - `kind` - extension-based dispatch
//! - `minify` - JS/HTML/CSS minifiers (pure functions)
//! - `obfuscate` - hashed script names and the per-run name map
//! - `rewrite` - HTML `src` attribute rewriting
//! - `process` - reading, transforming and writing one file

mod kind;
pub mod minify;
pub mod obfuscate;
mod process;
pub mod rewrite;

// Types
pub use kind::AssetKind;
pub use obfuscate::NameMap;

// Processing (side effects)
pub use process::{FileOutcome, TransformContext, process_file};
