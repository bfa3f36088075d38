// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Spectrum Grids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tabulated continuous spectra, angular distributions and local-geometry
//! corrections.
//!
//! Spectra are 4-D grids over (depth, cutoff, modulation, energy), one per
//! species, sharing the same axes. Values may be given inline in JSON or
//! as a NumPy `.npz` archive with one array per species symbol.

use crate::grid::locate_all;
use crate::particles::Particle;
use atmoflux_math::interp::{interp1d, Axis, AxisSpec, Extrapolation, TableGrid};
use atmoflux_types::constants::ISOTROPIC_PER_SR;
use atmoflux_types::error::{FluxError, FluxResult};
use atmoflux_types::state::{Environment, Shielding};
use ndarray::{ArrayD, IxDyn, OwnedRepr};
use ndarray_npy::NpzReader;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumAxes {
    pub depth: AxisSpec,
    pub cutoff: AxisSpec,
    pub modulation: AxisSpec,
    pub energy: AxisSpec,
}

/// Spectrum grid as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectraFile {
    /// Label of the differential-flux unit.
    #[serde(default)]
    pub unit: String,
    /// Interpolate values in log space (log-log for log axes).
    #[serde(default = "default_true")]
    pub log_values: bool,
    pub axes: SpectrumAxes,
    /// Row-major (depth, cutoff, modulation, energy) values per species symbol.
    #[serde(default)]
    pub species: BTreeMap<String, Vec<f64>>,
}

fn default_true() -> bool {
    true
}

/// Continuous-spectrum grid, the interpolation core of the flux engine.
#[derive(Debug, Clone)]
pub struct SpectrumGrid {
    unit: String,
    grids: HashMap<Particle, TableGrid>,
}

impl SpectrumGrid {
    /// Load from JSON, with species arrays optionally read from an `.npz`.
    pub fn load(path: impl AsRef<Path>, npz: Option<&Path>) -> FluxResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: SpectraFile = serde_json::from_str(&contents)?;
        let arrays = match npz {
            Some(npz) => read_species_npz(npz)?,
            None => HashMap::new(),
        };
        Self::from_file(file, arrays)
    }

    pub fn from_file(file: SpectraFile, arrays: HashMap<Particle, ArrayD<f64>>) -> FluxResult<Self> {
        let axes = vec![
            file.axes.depth.build("depth", Extrapolation::Clamp)?,
            file.axes.cutoff.build("cutoff", Extrapolation::Clamp)?,
            file.axes.modulation.build("modulation", Extrapolation::Clamp)?,
            file.axes.energy.build("energy", Extrapolation::Fail)?,
        ];
        let mut grids = HashMap::new();
        for (symbol, flat) in file.species {
            let particle = Particle::from_symbol(&symbol)?;
            let grid = TableGrid::from_flat(axes.clone(), flat, file.log_values)?;
            grids.insert(particle, grid);
        }
        for (particle, values) in arrays {
            if grids.contains_key(&particle) {
                return Err(FluxError::ConfigError(format!(
                    "spectrum for {particle} given both inline and in npz"
                )));
            }
            let grid = TableGrid::new(axes.clone(), values, file.log_values)?;
            grids.insert(particle, grid);
        }
        if grids.is_empty() {
            return Err(FluxError::ConfigError(
                "spectrum table holds no species".to_string(),
            ));
        }
        Ok(SpectrumGrid {
            unit: file.unit,
            grids,
        })
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Tabulated species, in catalogue order.
    pub fn species(&self) -> Vec<Particle> {
        let mut species: Vec<Particle> = self.grids.keys().copied().collect();
        species.sort();
        species
    }

    /// Differential flux of `particle` at `energy` [MeV].
    pub fn evaluate(&self, particle: Particle, env: &Environment, energy: f64) -> FluxResult<f64> {
        let grid = self.grids.get(&particle).ok_or_else(|| {
            FluxError::ConfigError(format!("no spectrum tabulated for {particle}"))
        })?;
        let brackets = locate_all(grid, &[env.depth, env.cutoff, env.modulation, energy])?;
        Ok(grid.interpolate_at(&brackets))
    }
}

/// Read one 4-D array per species symbol from an `.npz` archive.
pub fn read_species_npz(path: &Path) -> FluxResult<HashMap<Particle, ArrayD<f64>>> {
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file).map_err(|e| {
        FluxError::Npz(format!("Failed to open npz '{}': {e}", path.display()))
    })?;
    let names = npz
        .names()
        .map_err(|e| FluxError::Npz(format!("Failed to list npz '{}': {e}", path.display())))?;
    let mut arrays = HashMap::new();
    for name in names {
        let key = name.trim_end_matches(".npy");
        let particle = Particle::from_symbol(key)?;
        let values = npz
            .by_name::<OwnedRepr<f64>, IxDyn>(&format!("{key}.npy"))
            .or_else(|_| npz.by_name::<OwnedRepr<f64>, IxDyn>(key))
            .map_err(|e| FluxError::Npz(format!("Failed to read {key} from npz: {e}")))?;
        if values.ndim() != 4 {
            return Err(FluxError::Npz(format!(
                "array {key} has {} dimensions, expected 4",
                values.ndim()
            )));
        }
        arrays.insert(particle, values);
    }
    Ok(arrays)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngularAxes {
    pub depth: AxisSpec,
    pub energy: AxisSpec,
    pub cos_theta: AxisSpec,
}

/// Angular table as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngularFile {
    #[serde(default)]
    pub log_values: bool,
    pub axes: AngularAxes,
    /// Row-major (depth, energy, cos_theta) factors [1/sr] per species symbol.
    pub species: BTreeMap<String, Vec<f64>>,
}

/// Normalised angular distributions, per steradian.
#[derive(Debug, Clone)]
pub struct AngularTable {
    grids: HashMap<Particle, TableGrid>,
}

impl AngularTable {
    pub fn load(path: impl AsRef<Path>) -> FluxResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: AngularFile = serde_json::from_str(&contents)?;
        Self::from_file(file)
    }

    pub fn from_file(file: AngularFile) -> FluxResult<Self> {
        let axes = vec![
            file.axes.depth.build("depth", Extrapolation::Clamp)?,
            file.axes.energy.build("energy", Extrapolation::Clamp)?,
            file.axes.cos_theta.build("cos_theta", Extrapolation::Clamp)?,
        ];
        let mut grids = HashMap::new();
        for (symbol, flat) in file.species {
            let particle = Particle::from_symbol(&symbol)?;
            grids.insert(
                particle,
                TableGrid::from_flat(axes.clone(), flat, file.log_values)?,
            );
        }
        Ok(AngularTable { grids })
    }

    pub fn has(&self, particle: Particle) -> bool {
        self.grids.contains_key(&particle)
    }

    /// Angular factor [1/sr]; isotropic for species without data.
    pub fn factor(&self, particle: Particle, depth: f64, energy: f64, cos_theta: f64) -> FluxResult<f64> {
        match self.grids.get(&particle) {
            Some(grid) => {
                let brackets = locate_all(grid, &[depth, energy, cos_theta])?;
                Ok(grid.interpolate_at(&brackets))
            }
            None => Ok(ISOTROPIC_PER_SR),
        }
    }
}

/// Geometry correction table as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryFile {
    pub energy: AxisSpec,
    pub water_fraction: AxisSpec,
    /// Row-major (water_fraction, energy) factors over open ground.
    pub ground: Vec<f64>,
    /// Energy-dependent factors per preset name.
    #[serde(default)]
    pub presets: BTreeMap<String, Vec<f64>>,
}

/// Local-geometry correction for neutrons.
#[derive(Debug, Clone)]
pub struct GeometryCorrection {
    energy: Axis,
    ground: TableGrid,
    presets: Vec<(Shielding, Vec<f64>)>,
}

impl GeometryCorrection {
    pub fn load(path: impl AsRef<Path>) -> FluxResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: GeometryFile = serde_json::from_str(&contents)?;
        Self::from_file(file)
    }

    pub fn from_file(file: GeometryFile) -> FluxResult<Self> {
        let energy = file.energy.build("energy", Extrapolation::Clamp)?;
        let water = file
            .water_fraction
            .build("water_fraction", Extrapolation::Clamp)?;
        let ground = TableGrid::from_flat(vec![water, energy.clone()], file.ground, false)?;
        let mut presets = Vec::with_capacity(file.presets.len());
        for (name, factors) in file.presets {
            let preset = Shielding::from_preset(&name)
                .map_err(|_| FluxError::ConfigError(format!("unknown geometry preset '{name}'")))?;
            if factors.len() != energy.len() {
                return Err(FluxError::ConfigError(format!(
                    "preset '{name}' has {} factors, expected {}",
                    factors.len(),
                    energy.len()
                )));
            }
            presets.push((preset, factors));
        }
        Ok(GeometryCorrection {
            energy,
            ground,
            presets,
        })
    }

    /// Multiplicative correction; non-neutral-hadron species are unaffected.
    pub fn factor(&self, particle: Particle, shielding: Shielding, energy: f64) -> FluxResult<f64> {
        if particle != Particle::Neutron {
            return Ok(1.0);
        }
        match shielding {
            Shielding::Ground(w) => {
                let brackets = locate_all(&self.ground, &[w, energy])?;
                Ok(self.ground.interpolate_at(&brackets))
            }
            preset => match self.presets.iter().find(|(p, _)| *p == preset) {
                Some((_, factors)) => interp1d(&self.energy, factors, energy, false),
                None => {
                    debug!(geometry = ?preset, "no tabulated correction, using 1");
                    Ok(1.0)
                }
            },
        }
    }
}
