// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Spectral Lines
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete monoenergetic lines (e.g. the 511 keV annihilation line).
//!
//! A line is addressed by a symbolic token instead of an energy. Its
//! intensity is integrated over energy; an optional angular weight turns
//! it into a per-steradian intensity at a given zenith angle.

use crate::grid::{cos_theta, locate_all};
use crate::particles::{Particle, ParticleId};
use atmoflux_math::interp::{interp1d, Axis, AxisSpec, Extrapolation, Scale, TableGrid};
use atmoflux_types::error::{FluxError, FluxResult};
use atmoflux_types::state::Environment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Line intensity, constant or tabulated over the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntensitySpec {
    Constant(f64),
    Grid {
        depth: AxisSpec,
        cutoff: AxisSpec,
        modulation: AxisSpec,
        /// Row-major (depth, cutoff, modulation) values.
        values: Vec<f64>,
        #[serde(default)]
        log_values: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngularWeightSpec {
    pub cos_theta: Vec<f64>,
    /// Weight per steradian at each `cos_theta` node.
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSpec {
    pub particle: ParticleId,
    pub token: String,
    pub energy_mev: f64,
    pub intensity: IntensitySpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular: Option<AngularWeightSpec>,
}

/// Line table as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinesFile {
    pub lines: Vec<LineSpec>,
}

#[derive(Debug, Clone)]
enum Intensity {
    Constant(f64),
    Grid(TableGrid),
}

#[derive(Debug, Clone)]
pub struct SpectralLine {
    particle: Particle,
    token: String,
    energy_mev: f64,
    intensity: Intensity,
    angular: Option<(Axis, Vec<f64>)>,
}

impl SpectralLine {
    pub fn from_spec(spec: LineSpec) -> FluxResult<Self> {
        let particle = Particle::resolve(&spec.particle)?;
        if !(spec.energy_mev.is_finite() && spec.energy_mev > 0.0) {
            return Err(FluxError::ConfigError(format!(
                "line '{}' has an invalid energy {}",
                spec.token, spec.energy_mev
            )));
        }
        let intensity = match spec.intensity {
            IntensitySpec::Constant(value) => Intensity::Constant(value),
            IntensitySpec::Grid {
                depth,
                cutoff,
                modulation,
                values,
                log_values,
            } => {
                let axes = vec![
                    depth.build("depth", Extrapolation::Clamp)?,
                    cutoff.build("cutoff", Extrapolation::Clamp)?,
                    modulation.build("modulation", Extrapolation::Clamp)?,
                ];
                Intensity::Grid(TableGrid::from_flat(axes, values, log_values)?)
            }
        };
        let angular = match spec.angular {
            Some(a) => {
                let axis = Axis::new("cos_theta", a.cos_theta, Scale::Linear, Extrapolation::Clamp)?;
                if axis.len() != a.weights.len() {
                    return Err(FluxError::ConfigError(format!(
                        "line '{}' has {} angular nodes but {} weights",
                        spec.token,
                        axis.len(),
                        a.weights.len()
                    )));
                }
                Some((axis, a.weights))
            }
            None => None,
        };
        Ok(SpectralLine {
            particle,
            token: spec.token,
            energy_mev: spec.energy_mev,
            intensity,
            angular,
        })
    }

    pub fn particle(&self) -> Particle {
        self.particle
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn energy_mev(&self) -> f64 {
        self.energy_mev
    }

    pub fn has_angular(&self) -> bool {
        self.angular.is_some()
    }

    /// Energy-integrated intensity in the given environment.
    pub fn intensity(&self, env: &Environment) -> FluxResult<f64> {
        match &self.intensity {
            Intensity::Constant(value) => Ok(*value),
            Intensity::Grid(grid) => {
                let brackets = locate_all(grid, &[env.depth, env.cutoff, env.modulation])?;
                Ok(grid.interpolate_at(&brackets))
            }
        }
    }

    /// Angular weight per steradian at zenith angle `theta` [deg].
    /// Lines without angular data are isotropic.
    pub fn angular_weight(&self, theta: f64) -> FluxResult<f64> {
        let c = cos_theta(theta)?;
        match &self.angular {
            Some((axis, weights)) => interp1d(axis, weights, c, false),
            None => Ok(atmoflux_types::constants::ISOTROPIC_PER_SR),
        }
    }
}

/// Spectral-line table.
#[derive(Debug, Clone, Default)]
pub struct SpectralLineTable {
    lines: Vec<SpectralLine>,
}

impl SpectralLineTable {
    pub fn load(path: impl AsRef<Path>) -> FluxResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: LinesFile = serde_json::from_str(&contents)?;
        Self::from_file(file)
    }

    pub fn from_file(file: LinesFile) -> FluxResult<Self> {
        let mut lines: Vec<SpectralLine> = Vec::with_capacity(file.lines.len());
        for spec in file.lines {
            let line = SpectralLine::from_spec(spec)?;
            if lines
                .iter()
                .any(|l| l.particle == line.particle && l.token == line.token)
            {
                return Err(FluxError::ConfigError(format!(
                    "duplicate line '{}' for {}",
                    line.token, line.particle
                )));
            }
            lines.push(line);
        }
        Ok(SpectralLineTable { lines })
    }

    pub fn lines(&self) -> &[SpectralLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether `token` names a line of any species.
    pub fn is_token(&self, token: &str) -> bool {
        self.lines.iter().any(|l| l.token == token)
    }

    pub fn find(&self, particle: Particle, token: &str) -> FluxResult<&SpectralLine> {
        if let Some(line) = self
            .lines
            .iter()
            .find(|l| l.particle == particle && l.token == token)
        {
            return Ok(line);
        }
        let reason = if self.is_token(token) {
            format!("no such line for {particle}")
        } else {
            "unknown spectral line".to_string()
        };
        Err(FluxError::format("energy", token, reason))
    }

    /// Line flux: integrated intensity, or per-steradian intensity at
    /// zenith angle `theta` [deg] when given.
    pub fn line_flux(
        &self,
        particle: Particle,
        token: &str,
        theta: Option<f64>,
        env: &Environment,
    ) -> FluxResult<f64> {
        let line = self.find(particle, token)?;
        let intensity = line.intensity(env)?;
        match theta {
            None => Ok(intensity),
            Some(theta) => Ok(intensity * line.angular_weight(theta)?),
        }
    }
}
