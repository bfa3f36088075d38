// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Fluxmeter
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Observer-facing facade.
//!
//! A [`Fluxmeter`] holds an observation point (date, location, altitude,
//! geometry) and answers flux queries there. Derived quantities are
//! recomputed on every read; out-of-domain state is only reported when a
//! derived quantity or a flux is requested.

use crate::atmosphere::StandardAtmosphere;
use crate::broadcast::{FluxOutput, Plan, Samples};
use crate::engine::{EnergyValue, FluxEngine};
use crate::particles::{Particle, ParticleId};
use crate::tables::Tables;
use atmoflux_types::constants::DEFAULT_DATE;
use atmoflux_types::error::{FluxError, FluxResult};
use atmoflux_types::state::{Environment, Geometry};
use chrono::NaiveDate;
use std::sync::Arc;

/// Date given either as a calendar value or as an ISO 8601 string.
#[derive(Debug, Clone, PartialEq)]
pub enum DateArg {
    Date(NaiveDate),
    Iso(String),
}

impl From<NaiveDate> for DateArg {
    fn from(date: NaiveDate) -> Self {
        DateArg::Date(date)
    }
}

impl From<&str> for DateArg {
    fn from(s: &str) -> Self {
        DateArg::Iso(s.to_string())
    }
}

impl From<String> for DateArg {
    fn from(s: String) -> Self {
        DateArg::Iso(s)
    }
}

impl TryFrom<DateArg> for NaiveDate {
    type Error = FluxError;

    fn try_from(arg: DateArg) -> FluxResult<Self> {
        match arg {
            DateArg::Date(date) => Ok(date),
            DateArg::Iso(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| FluxError::format("date", s, e.to_string())),
        }
    }
}

fn default_date() -> NaiveDate {
    let (y, m, d) = DEFAULT_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Flux at an observation point.
#[derive(Debug, Clone)]
pub struct Fluxmeter {
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    geometry: Geometry,
    tables: Option<Arc<Tables>>,
}

impl Default for Fluxmeter {
    fn default() -> Self {
        Self::new()
    }
}

impl Fluxmeter {
    /// Observer at sea level, (0°, 0°), on 2000-01-01, using the
    /// process-wide tables.
    pub fn new() -> Self {
        Fluxmeter {
            date: default_date(),
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            geometry: Geometry::default(),
            tables: None,
        }
    }

    /// Observer bound to an explicit table bundle.
    pub fn with_tables(tables: Arc<Tables>) -> Self {
        Fluxmeter {
            tables: Some(tables),
            ..Self::new()
        }
    }

    pub fn with_date(mut self, date: impl Into<DateArg>) -> FluxResult<Self> {
        self.set_date(date)?;
        Ok(self)
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_geometry(mut self, geometry: impl Into<Geometry>) -> Self {
        self.geometry = geometry.into();
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Set the date; strings must be `YYYY-MM-DD`.
    pub fn set_date(&mut self, date: impl Into<DateArg>) -> FluxResult<()> {
        self.date = NaiveDate::try_from(date.into())?;
        Ok(())
    }

    /// Latitude [deg].
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = latitude;
    }

    /// Longitude [deg].
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn set_longitude(&mut self, longitude: f64) {
        self.longitude = longitude;
    }

    /// Altitude [cm].
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn set_altitude(&mut self, altitude: f64) {
        self.altitude = altitude;
    }

    /// Geometry in the form it was last set.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Preset names are checked at evaluation time.
    pub fn set_geometry(&mut self, geometry: impl Into<Geometry>) {
        self.geometry = geometry.into();
    }

    /// Table bundle in use, loading the process-wide one if needed.
    pub fn tables(&self) -> FluxResult<&Tables> {
        match &self.tables {
            Some(tables) => Ok(tables.as_ref()),
            None => Ok(Tables::global()?.as_ref()),
        }
    }

    /// Atmospheric depth [g/cm²] at the current altitude. Needs no table
    /// data.
    pub fn atmospheric_depth(&self) -> FluxResult<f64> {
        StandardAtmosphere::global().depth(self.altitude)
    }

    /// Vertical cutoff rigidity [MV] at the current location and date.
    pub fn cutoff_rigidity(&self) -> FluxResult<f64> {
        self.tables()?
            .cutoff()
            .cutoff(self.latitude, self.longitude, self.date)
    }

    /// Solar modulation at the current date.
    pub fn solar_modulation(&self) -> FluxResult<f64> {
        self.tables()?.solar().modulation(self.date)
    }

    pub fn environment(&self) -> FluxResult<Environment> {
        Ok(Environment {
            depth: self.atmospheric_depth()?,
            cutoff: self.cutoff_rigidity()?,
            modulation: self.solar_modulation()?,
        })
    }

    /// Differential flux of `particle` at `energy` [MeV or line token].
    ///
    /// Scalar arguments give a scalar. With sequences, `grid` selects the
    /// Cartesian product (shape: energy ++ theta) or a pairwise zip.
    pub fn flux(
        &self,
        particle: impl Into<ParticleId>,
        energy: impl Into<Samples<EnergyValue>>,
        theta: Option<Samples<f64>>,
        grid: bool,
    ) -> FluxResult<FluxOutput> {
        let mut request = self.request(particle, energy).grid(grid);
        request.theta = theta;
        request.evaluate()
    }

    /// Flux query with optional overrides.
    pub fn request(
        &self,
        particle: impl Into<ParticleId>,
        energy: impl Into<Samples<EnergyValue>>,
    ) -> FluxRequest<'_> {
        FluxRequest {
            meter: self,
            particle: particle.into(),
            energy: energy.into(),
            theta: None,
            grid: true,
            depth: None,
            cutoff: None,
            modulation: None,
        }
    }
}

/// Single flux query against a [`Fluxmeter`].
#[derive(Debug, Clone)]
pub struct FluxRequest<'m> {
    meter: &'m Fluxmeter,
    particle: ParticleId,
    energy: Samples<EnergyValue>,
    theta: Option<Samples<f64>>,
    grid: bool,
    depth: Option<f64>,
    cutoff: Option<f64>,
    modulation: Option<f64>,
}

impl<'m> FluxRequest<'m> {
    /// Zenith angle(s) [deg], θ ∈ [0, 180].
    pub fn theta(mut self, theta: impl Into<Samples<f64>>) -> Self {
        self.theta = Some(theta.into());
        self
    }

    pub fn grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Use this depth [g/cm²] instead of the one derived from altitude.
    pub fn atmospheric_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Use this cutoff [MV] instead of the one derived from location.
    pub fn cutoff_rigidity(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn solar_modulation(mut self, modulation: f64) -> Self {
        self.modulation = Some(modulation);
        self
    }

    fn environment(&self) -> FluxResult<Environment> {
        Ok(Environment {
            depth: match self.depth {
                Some(depth) => depth,
                None => self.meter.atmospheric_depth()?,
            },
            cutoff: match self.cutoff {
                Some(cutoff) => cutoff,
                None => self.meter.cutoff_rigidity()?,
            },
            modulation: match self.modulation {
                Some(modulation) => modulation,
                None => self.meter.solar_modulation()?,
            },
        })
    }

    pub fn evaluate(&self) -> FluxResult<FluxOutput> {
        let particle = Particle::resolve(&self.particle)?;
        let theta_len = self.theta.as_ref().and_then(Samples::len);
        let plan = Plan::new(&[self.energy.len(), theta_len], self.grid)?;
        let shielding = self.meter.geometry.resolve()?;
        let env = self.environment()?;
        let engine = FluxEngine::new(self.meter.tables()?);

        plan.evaluate(|idx| {
            let energy = sample(&self.energy, idx[0])?;
            let theta = match &self.theta {
                Some(theta) => Some(*sample(theta, idx[1])?),
                None => None,
            };
            engine.evaluate(particle, &env, energy, theta, shielding)
        })
    }
}

fn sample<T>(samples: &Samples<T>, index: usize) -> FluxResult<&T> {
    samples.get(index).ok_or(FluxError::ShapeMismatch {
        expected: index + 1,
        found: samples.len().unwrap_or(1),
    })
}
