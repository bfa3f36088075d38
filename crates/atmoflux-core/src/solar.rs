// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Solar Modulation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Solar modulation from an empirical daily/monthly time series.

use crate::cutoff::decimal_year;
use atmoflux_math::interp::{interp1d, Axis, Extrapolation, Scale};
use atmoflux_types::error::{FluxError, FluxResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarSample {
    pub date: NaiveDate,
    pub value: f64,
}

/// Solar series as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarFile {
    /// Label of the modulation measure (e.g. "W-index", "phi [MV]").
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub extrapolation: Extrapolation,
    pub series: Vec<SolarSample>,
}

/// Solar-modulation model.
#[derive(Debug, Clone)]
pub struct SolarSeries {
    unit: String,
    first: NaiveDate,
    last: NaiveDate,
    days: Axis,
    values: Vec<f64>,
}

impl SolarSeries {
    pub fn load(path: impl AsRef<Path>) -> FluxResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: SolarFile = serde_json::from_str(&contents)?;
        Self::from_file(file)
    }

    pub fn from_file(file: SolarFile) -> FluxResult<Self> {
        let (first, last) = match (file.series.first(), file.series.last()) {
            (Some(a), Some(b)) => (a.date, b.date),
            _ => {
                return Err(FluxError::ConfigError(
                    "solar series is empty".to_string(),
                ))
            }
        };
        if file.series.iter().any(|s| !s.value.is_finite()) {
            return Err(FluxError::ConfigError(
                "solar series has non-finite values".to_string(),
            ));
        }
        let nodes = file
            .series
            .iter()
            .map(|s| s.date.num_days_from_ce() as f64)
            .collect();
        let days = Axis::new("date", nodes, Scale::Linear, file.extrapolation)?;
        let values = file.series.iter().map(|s| s.value).collect();
        Ok(SolarSeries {
            unit: file.unit,
            first,
            last,
            days,
            values,
        })
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Covered date range.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.first, self.last)
    }

    /// Modulation strength on a given date.
    pub fn modulation(&self, date: NaiveDate) -> FluxResult<f64> {
        let pinned = if date < self.first {
            Some(self.first)
        } else if date > self.last {
            Some(self.last)
        } else {
            None
        };
        let date = match (pinned, self.days.extrapolation()) {
            (None, _) => date,
            (Some(_), Extrapolation::Fail) => {
                return Err(FluxError::domain(
                    "date (decimal year)",
                    decimal_year(date),
                    decimal_year(self.first),
                    decimal_year(self.last),
                ))
            }
            (Some(boundary), Extrapolation::Clamp) => {
                warn!(%date, %boundary, "date outside the solar series, clamped");
                boundary
            }
        };
        interp1d(&self.days, &self.values, date.num_days_from_ce() as f64, false)
    }
}
