// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Centimetre to kilometre.
pub const CM_TO_KM: f64 = 1e-5;

/// Gigavolt to megavolt.
pub const GV_TO_MV: f64 = 1e3;

/// Degree to radian.
pub const DEG: f64 = std::f64::consts::PI / 180.0;

/// Standard gravity (m/s²), US Standard Atmosphere 1976.
pub const G0: f64 = 9.80665;

/// Sea-level pressure (Pa), US Standard Atmosphere 1976.
pub const P0_PA: f64 = 101_325.0;

/// Pascal over g0 to g/cm² (kg/m² → g/cm²).
pub const KG_M2_TO_G_CM2: f64 = 0.1;

/// Hydrostatic constant g0·M0/R* (K/km), US Standard Atmosphere 1976.
pub const GMR: f64 = 34.163_195;

/// Effective Earth radius for geopotential altitude (km).
pub const EARTH_RADIUS_KM: f64 = 6356.766;

/// Lowest altitude covered by the atmosphere model (cm), i.e. -5 km.
pub const ATMOSPHERE_BASE_CM: f64 = -5e5;

/// Isotropic angular factor, per steradian.
pub const ISOTROPIC_PER_SR: f64 = 1.0 / (4.0 * std::f64::consts::PI);

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "ATMOFLUX_DATA";

/// Fallback data directory when the environment variable is unset.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default observation date (year, month, day).
pub const DEFAULT_DATE: (i32, u32, u32) = (2000, 1, 1);
