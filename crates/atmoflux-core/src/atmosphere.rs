// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Atmosphere
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Atmospheric depth from altitude, US Standard Atmosphere 1976.
//!
//! Seven hydrostatic layers up to 84.852 km geopotential altitude, with an
//! isothermal continuation above. Depth is the overhead column mass,
//! i.e. pressure over standard gravity.

use atmoflux_types::constants::{
    ATMOSPHERE_BASE_CM, CM_TO_KM, EARTH_RADIUS_KM, G0, GMR, KG_M2_TO_G_CM2, P0_PA,
};
use atmoflux_types::error::{FluxError, FluxResult};
use once_cell::sync::Lazy;

static STANDARD: Lazy<StandardAtmosphere> = Lazy::new(StandardAtmosphere::new);

/// Sea-level temperature [K].
const T0_K: f64 = 288.15;

/// Layer base geopotential altitudes [km'] and lapse rates [K/km'].
/// The last entry is the top of the tabulated atmosphere.
const LAYERS: [(f64, f64); 8] = [
    (0.0, -6.5),
    (11.0, 0.0),
    (20.0, 1.0),
    (32.0, 2.8),
    (47.0, 0.0),
    (51.0, -2.8),
    (71.0, -2.0),
    (84.852, 0.0),
];

#[derive(Debug, Clone, Copy)]
struct Layer {
    base_km: f64,
    lapse: f64,
    base_temperature: f64,
    base_pressure: f64,
}

impl Layer {
    fn pressure(&self, h: f64) -> f64 {
        let dh = h - self.base_km;
        if self.lapse == 0.0 {
            self.base_pressure * (-GMR * dh / self.base_temperature).exp()
        } else {
            let t = self.base_temperature + self.lapse * dh;
            self.base_pressure * (self.base_temperature / t).powf(GMR / self.lapse)
        }
    }

    fn temperature(&self, h: f64) -> f64 {
        self.base_temperature + self.lapse * (h - self.base_km)
    }
}

/// Atmospheric-depth model.
#[derive(Debug, Clone)]
pub struct StandardAtmosphere {
    layers: Vec<Layer>,
}

impl Default for StandardAtmosphere {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardAtmosphere {
    pub fn new() -> Self {
        let mut layers = Vec::with_capacity(LAYERS.len());
        let mut temperature = T0_K;
        let mut pressure = P0_PA;
        for (i, &(base_km, lapse)) in LAYERS.iter().enumerate() {
            let layer = Layer {
                base_km,
                lapse,
                base_temperature: temperature,
                base_pressure: pressure,
            };
            layers.push(layer);
            if let Some(&(next_km, _)) = LAYERS.get(i + 1) {
                temperature = layer.temperature(next_km);
                pressure = layer.pressure(next_km);
            }
        }
        StandardAtmosphere { layers }
    }

    /// Shared model; the layer table is built once per process.
    pub fn global() -> &'static StandardAtmosphere {
        &STANDARD
    }

    /// Geopotential altitude [km'] from geometric altitude [km].
    pub fn geopotential_km(altitude_km: f64) -> f64 {
        EARTH_RADIUS_KM * altitude_km / (EARTH_RADIUS_KM + altitude_km)
    }

    fn layer(&self, h: f64) -> &Layer {
        self.layers
            .iter()
            .rev()
            .find(|layer| h >= layer.base_km)
            .unwrap_or(&self.layers[0])
    }

    fn check(&self, altitude_cm: f64) -> FluxResult<f64> {
        if altitude_cm.is_nan() || altitude_cm < ATMOSPHERE_BASE_CM {
            return Err(FluxError::domain(
                "altitude",
                altitude_cm,
                ATMOSPHERE_BASE_CM,
                f64::INFINITY,
            ));
        }
        Ok(Self::geopotential_km(altitude_cm * CM_TO_KM))
    }

    /// Static pressure [Pa] at a geometric altitude [cm].
    pub fn pressure(&self, altitude_cm: f64) -> FluxResult<f64> {
        if altitude_cm == f64::INFINITY {
            return Ok(0.0);
        }
        let h = self.check(altitude_cm)?;
        Ok(self.layer(h).pressure(h))
    }

    /// Temperature [K] at a geometric altitude [cm].
    pub fn temperature(&self, altitude_cm: f64) -> FluxResult<f64> {
        if altitude_cm == f64::INFINITY {
            return Ok(self.layers[self.layers.len() - 1].base_temperature);
        }
        let h = self.check(altitude_cm)?;
        Ok(self.layer(h).temperature(h))
    }

    /// Atmospheric depth [g/cm²] at a geometric altitude [cm].
    pub fn depth(&self, altitude_cm: f64) -> FluxResult<f64> {
        Ok(self.pressure(altitude_cm)? / G0 * KG_M2_TO_G_CM2)
    }
}
