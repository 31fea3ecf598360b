//! Seed selection for per-file random work.

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// How a batch stage seeds the generator for each file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    /// Every file uses the base seed unchanged.
    #[default]
    Shared,
    /// Each file uses a seed derived from the base seed and its relative
    /// path, so results do not depend on processing order.
    PerFile,
}

impl SeedMode {
    /// Returns the seed to use for the file at `relative_path`.
    pub fn seed_for(&self, base: u64, relative_path: &Path) -> u64 {
        match self {
            SeedMode::Shared => base,
            SeedMode::PerFile => derive_seed(base, &path_key(relative_path)),
        }
    }
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedMode::Shared => f.write_str("shared"),
            SeedMode::PerFile => f.write_str("per-file"),
        }
    }
}

impl FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(SeedMode::Shared),
            "per-file" | "per_file" | "perfile" => Ok(SeedMode::PerFile),
            other => Err(format!("unknown seed mode {other:?} (expected shared or per-file)")),
        }
    }
}

/// Derives a sub-seed from `base` and a stable string key.
///
/// FNV-1a over the key, combined with the base seed and passed through the
/// SplitMix64 finalizer.
pub fn derive_seed(base: u64, key: &str) -> u64 {
    let mut h = FNV_OFFSET;
    for b in key.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }

    let mut z = base ^ h;
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Joins the normal components of a relative path with `/`.
///
/// Gives the same key for the same file on every platform.
pub fn path_key(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
