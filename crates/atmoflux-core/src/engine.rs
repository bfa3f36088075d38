// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Flux Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scalar flux evaluation: one species, one energy, one direction.
//!
//! Numeric energies go through the continuous spectrum, optionally scaled
//! by the local-geometry correction and the angular distribution. Symbolic
//! energies name a spectral line and bypass the continuum entirely.

use crate::grid::cos_theta;
use crate::particles::Particle;
use crate::tables::Tables;
use atmoflux_types::constants::ISOTROPIC_PER_SR;
use atmoflux_types::error::FluxResult;
use atmoflux_types::state::{Environment, Shielding};
use std::fmt;

/// Kinetic energy [MeV] or the token of a spectral line.
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyValue {
    MeV(f64),
    Line(String),
}

impl From<f64> for EnergyValue {
    fn from(value: f64) -> Self {
        EnergyValue::MeV(value)
    }
}

impl From<&str> for EnergyValue {
    fn from(token: &str) -> Self {
        EnergyValue::Line(token.to_string())
    }
}

impl From<String> for EnergyValue {
    fn from(token: String) -> Self {
        EnergyValue::Line(token)
    }
}

impl fmt::Display for EnergyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyValue::MeV(e) => write!(f, "{e} MeV"),
            EnergyValue::Line(token) => write!(f, "{token}"),
        }
    }
}

/// Shape-agnostic evaluator over a table bundle.
#[derive(Debug, Clone, Copy)]
pub struct FluxEngine<'a> {
    tables: &'a Tables,
}

impl<'a> FluxEngine<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        FluxEngine { tables }
    }

    /// Differential flux at one point. `theta` [deg] selects the
    /// per-steradian flux in that direction; `None` gives the
    /// angle-integrated value.
    pub fn evaluate(
        &self,
        particle: Particle,
        env: &Environment,
        energy: &EnergyValue,
        theta: Option<f64>,
        shielding: Shielding,
    ) -> FluxResult<f64> {
        let energy = match energy {
            EnergyValue::Line(token) => {
                return self.tables.lines().line_flux(particle, token, theta, env)
            }
            EnergyValue::MeV(e) => *e,
        };
        let mut flux = self.tables.spectra().evaluate(particle, env, energy)?;
        if let Some(geometry) = self.tables.geometry() {
            flux *= geometry.factor(particle, shielding, energy)?;
        }
        if let Some(theta) = theta {
            flux *= self.angular_factor(particle, env.depth, energy, theta)?;
        }
        Ok(flux)
    }

    fn angular_factor(&self, particle: Particle, depth: f64, energy: f64, theta: f64) -> FluxResult<f64> {
        let cos = cos_theta(theta)?;
        match self.tables.angular() {
            Some(angular) => angular.factor(particle, depth, energy, cos),
            None => Ok(ISOTROPIC_PER_SR),
        }
    }
}
