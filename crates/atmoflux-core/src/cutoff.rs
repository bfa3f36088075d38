// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Cutoff Rigidity
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Vertical geomagnetic cutoff rigidity from a tabulated world map.
//!
//! The map is indexed by (epoch, latitude, longitude). Longitude is
//! periodic; epoch (decimal year) carries the secular drift and clamps
//! outside the tabulated epochs.

use crate::grid::locate_all;
use atmoflux_math::interp::{Axis, Extrapolation, Scale, TableGrid};
use atmoflux_types::error::{FluxError, FluxResult};
use chrono::{Datelike, NaiveDate};
use ndarray::{concatenate, s, Array3, Axis as NdAxis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Epoch assumed when a map does not list any.
const DEFAULT_EPOCH: f64 = 2000.0;

/// Cutoff map as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epochs: Option<Vec<f64>>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    /// Row-major (epoch, latitude, longitude) values [MV].
    pub rigidity_mv: Vec<f64>,
}

/// Cutoff-rigidity model.
#[derive(Debug, Clone)]
pub struct CutoffMap {
    grid: TableGrid,
    longitude0: f64,
}

impl CutoffMap {
    pub fn load(path: impl AsRef<Path>) -> FluxResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: CutoffFile = serde_json::from_str(&contents)?;
        Self::from_file(file)
    }

    pub fn from_file(file: CutoffFile) -> FluxResult<Self> {
        let epochs = file.epochs.unwrap_or_else(|| vec![DEFAULT_EPOCH]);
        Self::from_parts(epochs, file.latitude, file.longitude, file.rigidity_mv)
    }

    pub fn from_parts(
        epochs: Vec<f64>,
        latitude: Vec<f64>,
        longitude: Vec<f64>,
        rigidity_mv: Vec<f64>,
    ) -> FluxResult<Self> {
        if epochs.is_empty() || latitude.is_empty() || longitude.is_empty() {
            return Err(FluxError::ConfigError(
                "cutoff map needs at least one epoch, latitude and longitude".to_string(),
            ));
        }
        if latitude.iter().any(|x| !(-90.0..=90.0).contains(x)) {
            return Err(FluxError::ConfigError(
                "cutoff latitudes must lie in [-90, 90]".to_string(),
            ));
        }
        if longitude.iter().any(|x| !(0.0..360.0).contains(x)) {
            return Err(FluxError::ConfigError(
                "cutoff longitudes must lie in [0, 360)".to_string(),
            ));
        }
        if rigidity_mv.iter().any(|&r| r < 0.0) {
            return Err(FluxError::ConfigError(
                "cutoff rigidities must be non-negative".to_string(),
            ));
        }
        let shape = (epochs.len(), latitude.len(), longitude.len());
        let base = Array3::from_shape_vec(shape, rigidity_mv).map_err(|e| {
            FluxError::ConfigError(format!("invalid cutoff map for shape {shape:?}: {e}"))
        })?;

        // Close the longitude circle with a copy of the first column.
        let longitude0 = longitude.first().copied().unwrap_or(0.0);
        let mut wrapped_lon = longitude;
        wrapped_lon.push(longitude0 + 360.0);
        let values = concatenate(NdAxis(2), &[base.view(), base.slice(s![.., .., 0..1])])
            .map_err(|e| FluxError::ConfigError(format!("invalid cutoff map: {e}")))?;

        let axes = vec![
            Axis::new("epoch", epochs, Scale::Linear, Extrapolation::Clamp)?,
            Axis::new("latitude", latitude, Scale::Linear, Extrapolation::Clamp)?,
            Axis::new("longitude", wrapped_lon, Scale::Linear, Extrapolation::Fail)?,
        ];
        let grid = TableGrid::new(axes, values.into_dyn(), false)?;
        Ok(CutoffMap { grid, longitude0 })
    }

    /// Vertical cutoff rigidity [MV] at a location and date.
    pub fn cutoff(&self, latitude: f64, longitude: f64, date: NaiveDate) -> FluxResult<f64> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FluxError::domain("latitude", latitude, -90.0, 90.0));
        }
        if !longitude.is_finite() || !(-180.0..=360.0).contains(&longitude) {
            return Err(FluxError::domain("longitude", longitude, -180.0, 360.0));
        }
        let mut lon = longitude.rem_euclid(360.0);
        if lon < self.longitude0 {
            lon += 360.0;
        }
        let coords = [decimal_year(date), latitude, lon];
        let brackets = locate_all(&self.grid, &coords)?;
        Ok(self.grid.interpolate_at(&brackets))
    }

    /// Tabulated epochs (decimal years).
    pub fn epochs(&self) -> &[f64] {
        self.grid.axes()[0].nodes()
    }
}

/// Calendar date as a decimal year.
pub fn decimal_year(date: NaiveDate) -> f64 {
    let year = date.year();
    let days = if NaiveDate::from_ymd_opt(year, 12, 31).map_or(365, |d| d.ordinal()) == 366 {
        366.0
    } else {
        365.0
    };
    year as f64 + date.ordinal0() as f64 / days
}
