// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the data-set manifest inside a data directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Data-set manifest: names the table files making up one data set.
/// Relative file names resolve against the directory holding the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Free-form label of the data set.
    #[serde(default)]
    pub name: String,
    /// Continuous spectrum grid (axes, and inline values unless `spectra_npz` is set).
    #[serde(default = "default_spectra")]
    pub spectra: String,
    /// Optional NumPy archive holding one 4-D grid per species symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectra_npz: Option<String>,
    /// Vertical cutoff rigidity map.
    #[serde(default = "default_cutoff")]
    pub cutoff: String,
    /// Solar modulation time series.
    #[serde(default = "default_solar")]
    pub solar: String,
    /// Discrete spectral lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<String>,
    /// Angular distributions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular: Option<String>,
    /// Local-geometry (ground, aircraft) corrections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    /// Directory the manifest was read from.
    #[serde(skip)]
    pub root: PathBuf,
}

fn default_spectra() -> String {
    "spectra.json".to_string()
}
fn default_cutoff() -> String {
    "cutoff.json".to_string()
}
fn default_solar() -> String {
    "solar.json".to_string()
}

impl DataConfig {
    /// Load a manifest from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> crate::error::FluxResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&contents)?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Load `manifest.json` from a data directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> crate::error::FluxResult<Self> {
        Self::from_file(dir.as_ref().join(MANIFEST_FILE))
    }

    /// Resolve a table file name against the manifest directory.
    pub fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Process-wide data directory: `$ATMOFLUX_DATA`, else `./data`.
    pub fn data_dir() -> PathBuf {
        std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}
