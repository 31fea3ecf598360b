//! Pipeline configuration.
//!
//! Configuration is read from YAML or JSON. Without an explicit path,
//! `~/.kwsprep/config.yaml` is used if it exists; otherwise built-in
//! defaults apply. Missing fields fall back to their defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kwsprep_audio::noise::{NoiseKind, NoiseSpec};
use kwsprep_corpus::{
    AugmentOptions, ScanOptions, SeedMode, SplitRatio, DEFAULT_AUDIO_EXTENSIONS,
    DEFAULT_POSITIVE_PREFIXES,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".kwsprep";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse config (tried YAML and JSON)")]
    ParseFailed,
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("cannot determine config path: no home directory")]
    NoHome,
}

/// Options shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Noise type for augmentation.
    pub noise_type: NoiseKind,
    /// Peak amplitude of the overlaid noise.
    pub noise_level: f64,
    /// Seed for noise synthesis, negative sampling and split shuffling.
    pub seed: u64,
    /// How augmentation derives per-file seeds.
    pub seed_mode: SeedMode,
    /// Filename prefixes marking keyword utterances.
    pub positive_prefixes: Vec<String>,
    /// Audio file extensions, without the dot.
    pub audio_extensions: Vec<String>,
    /// dev:test:train weights.
    pub split_ratio: [u32; 3],
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            noise_type: NoiseKind::White,
            noise_level: 0.02,
            seed: 42,
            seed_mode: SeedMode::Shared,
            positive_prefixes: DEFAULT_POSITIVE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            audio_extensions: DEFAULT_AUDIO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            split_ratio: [1, 1, 8],
        }
    }
}

impl PrepConfig {
    /// Checks every option, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.noise_spec()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.scan_options()?;
        self.split_ratio()?;
        Ok(())
    }

    pub fn noise_spec(&self) -> NoiseSpec {
        NoiseSpec::new(self.noise_type, self.noise_level, self.seed)
    }

    pub fn scan_options(&self) -> Result<ScanOptions, ConfigError> {
        ScanOptions::new(self.positive_prefixes.clone(), self.audio_extensions.clone())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn split_ratio(&self) -> Result<SplitRatio, ConfigError> {
        let [d, t, r] = self.split_ratio;
        SplitRatio::new(d, t, r).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn augment_options(&self) -> Result<AugmentOptions, ConfigError> {
        Ok(AugmentOptions {
            noise: self.noise_spec(),
            seed_mode: self.seed_mode,
            scan: self.scan_options()?,
        })
    }
}

/// A configuration together with the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PrepConfig,
    pub source: Option<PathBuf>,
}

/// Returns `~/.kwsprep/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(DEFAULT_CONFIG_FILE))
}

/// Loads configuration.
///
/// An explicit path must exist. Without one, the default path is used if
/// present, and built-in defaults otherwise.
pub fn load_config(custom_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = match custom_path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.is_file() => p,
            _ => {
                return Ok(LoadedConfig {
                    config: PrepConfig::default(),
                    source: None,
                });
            }
        },
    };

    let data = fs::read(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse_config(&data, &path)?;
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}

/// Parses configuration data based on file extension or content.
pub fn parse_config(data: &[u8], path: impl AsRef<Path>) -> Result<PrepConfig, ConfigError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => {
            // Try YAML first, then JSON
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            if let Ok(v) = serde_json::from_slice(data) {
                return Ok(v);
            }
            Err(ConfigError::ParseFailed)
        }
    }
}

/// Writes configuration to `path` as JSON or YAML by extension, creating
/// parent directories.
pub fn save_config(path: impl AsRef<Path>, config: &PrepConfig) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let content = if is_json {
        serde_json::to_string_pretty(config)?
    } else {
        serde_yaml::to_string(config)?
    };

    fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
