//! Hashed file names for JavaScript outputs.
//!
//! A name is the first 8 hex chars of `blake3(original_name ‖ seed)` followed
//! by the original extension, e.g. `app.js` → `3f2a9c1e.js`.

use rustc_hash::FxHashMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of the hex token in an obfuscated name.
pub const TOKEN_LEN: usize = 8;

/// Original JavaScript file name → obfuscated file name, for one build run.
///
/// Keyed by base name, so two `app.js` files in different directories share
/// one entry and the later one wins.
#[derive(Debug, Default)]
pub struct NameMap {
    names: FxHashMap<String, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: impl Into<String>, obfuscated: impl Into<String>) {
        self.names.insert(original.into(), obfuscated.into());
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.names.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Compute the obfuscated name for `original` mixed with `seed`.
pub fn obfuscated_name(original: &str, seed: &[u8]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(original.as_bytes());
    hasher.update(seed);
    let token = hex::encode(&hasher.finalize().as_bytes()[..TOKEN_LEN / 2]);

    match Path::new(original).extension() {
        Some(ext) => format!("{token}.{}", ext.to_string_lossy()),
        None => token,
    }
}

/// Current wall-clock time in milliseconds, as decimal text.
pub fn timestamp_seed() -> Vec<u8> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
        .into_bytes()
}
