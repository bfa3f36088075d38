// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Grid Helpers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coordinate helpers shared by the table-backed models.

use atmoflux_math::interp::{Bracket, TableGrid};
use atmoflux_types::constants::DEG;
use atmoflux_types::error::{FluxError, FluxResult};
use tracing::debug;

/// Locate coordinates on a grid, tracing any clamped axis.
pub(crate) fn locate_all(grid: &TableGrid, coords: &[f64]) -> FluxResult<Vec<Bracket>> {
    let brackets = grid.brackets(coords)?;
    for ((axis, b), &x) in grid.axes().iter().zip(&brackets).zip(coords) {
        if let Some(pinned) = b.clamped {
            debug!(axis = axis.name(), requested = x, clamped = pinned, "clamped to table boundary");
        }
    }
    Ok(brackets)
}

/// Cosine of a zenith angle given in degrees, θ ∈ [0, 180].
pub(crate) fn cos_theta(theta: f64) -> FluxResult<f64> {
    if !theta.is_finite() || !(0.0..=180.0).contains(&theta) {
        return Err(FluxError::domain("theta", theta, 0.0, 180.0));
    }
    Ok((theta * DEG).cos())
}
