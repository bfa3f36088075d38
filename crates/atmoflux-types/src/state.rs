// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{FluxError, FluxResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local geometry around the observer, as set by the caller.
///
/// Either a number or the name of a preset. Numbers in [0, 1] are a
/// ground water fraction; the preset parameters select their preset; any
/// other finite number is kept as a bare geometry parameter. Nothing is
/// validated until [`Geometry::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Value(f64),
    Preset(String),
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::Value(0.0)
    }
}

impl From<f64> for Geometry {
    fn from(value: f64) -> Self {
        Geometry::Value(value)
    }
}

impl From<&str> for Geometry {
    fn from(value: &str) -> Self {
        Geometry::Preset(value.to_string())
    }
}

impl From<String> for Geometry {
    fn from(value: String) -> Self {
        Geometry::Preset(value)
    }
}

impl PartialEq<f64> for Geometry {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Geometry::Value(v) if v == other)
    }
}

impl PartialEq<&str> for Geometry {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Geometry::Preset(name) if name == other)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Value(v) => write!(f, "{v}"),
            Geometry::Preset(name) => f.write_str(name),
        }
    }
}

impl Geometry {
    /// Resolve to a validated shielding configuration.
    pub fn resolve(&self) -> FluxResult<Shielding> {
        match self {
            Geometry::Value(x) => Shielding::from_parameter(*x),
            Geometry::Preset(name) => Shielding::from_preset(name),
        }
    }
}

/// Resolved local geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shielding {
    /// Open field over ground with the given water fraction in [0, 1].
    Ground(f64),
    /// Fully absorbing surroundings.
    Blackhole,
    /// Inside an aircraft cabin.
    Cabin,
    /// Free atmosphere, no ground.
    NoGround,
    /// Aircraft cockpit.
    Pilot,
    /// Any other finite geometry parameter.
    Parameter(f64),
}

impl Shielding {
    /// Named presets, in canonical order.
    pub const PRESETS: [Shielding; 4] = [
        Shielding::Blackhole,
        Shielding::Cabin,
        Shielding::NoGround,
        Shielding::Pilot,
    ];

    /// Shielding for a numeric geometry parameter. Non-finite values are
    /// a domain error.
    pub fn from_parameter(x: f64) -> FluxResult<Self> {
        if !x.is_finite() {
            return Err(FluxError::domain("geometry", x, f64::MIN, f64::MAX));
        }
        if (0.0..=1.0).contains(&x) {
            return Ok(Shielding::Ground(x));
        }
        Ok(Self::PRESETS
            .into_iter()
            .find(|preset| preset.parameter() == x)
            .unwrap_or(Shielding::Parameter(x)))
    }

    pub fn from_preset(name: &str) -> FluxResult<Self> {
        match name {
            "blackhole" => Ok(Shielding::Blackhole),
            "cabin" => Ok(Shielding::Cabin),
            "no_ground" => Ok(Shielding::NoGround),
            "pilot" => Ok(Shielding::Pilot),
            _ => Err(FluxError::format(
                "geometry",
                name,
                "expected a number or one of blackhole, cabin, no_ground, pilot",
            )),
        }
    }

    /// Preset name, `None` for numeric geometries.
    pub fn preset_name(&self) -> Option<&'static str> {
        match self {
            Shielding::Ground(_) | Shielding::Parameter(_) => None,
            Shielding::Blackhole => Some("blackhole"),
            Shielding::Cabin => Some("cabin"),
            Shielding::NoGround => Some("no_ground"),
            Shielding::Pilot => Some("pilot"),
        }
    }

    /// Scalar geometry parameter used by the tabulated corrections.
    pub fn parameter(&self) -> f64 {
        match self {
            Shielding::Ground(x) | Shielding::Parameter(x) => *x,
            Shielding::Blackhole => 100.0,
            Shielding::Cabin => -11.0,
            Shielding::NoGround => 10.0,
            Shielding::Pilot => -1.0,
        }
    }
}

/// Derived environment of one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Atmospheric depth [g/cm²].
    pub depth: f64,
    /// Vertical cutoff rigidity [MV].
    pub cutoff: f64,
    /// Solar modulation, in the unit of the solar table.
    pub modulation: f64,
}
