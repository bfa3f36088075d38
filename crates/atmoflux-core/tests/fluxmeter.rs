// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Fluxmeter Integration Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! End-to-end queries against the fixture data set in `tests/fixtures`.

use atmoflux_core::{FluxOutput, Fluxmeter, Samples, Tables};
use atmoflux_types::error::FluxError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn meter() -> Fluxmeter {
    let tables = Tables::load_dir(fixture_dir()).expect("fixture tables");
    Fluxmeter::with_tables(Arc::new(tables))
}

fn scalar(out: FluxOutput) -> f64 {
    out.as_scalar().expect("scalar result")
}

/// Hydrostatic 1976 column at 10 km [g/cm²].
const DEPTH_10_KM: f64 = 270.223755;
/// Tabulated reference profile at 10 km and its known gap to the model.
const REFERENCE_DEPTH_10_KM: f64 = 270.2145993;
const REFERENCE_OFFSET_10_KM: f64 = 0.009156;

fn assert_rel(actual: f64, expected: f64, tol: f64) {
    let rel = ((actual - expected) / expected).abs();
    assert!(rel < tol, "{actual} vs {expected} (rel {rel:.3e})");
}

#[test]
fn test_default_state() {
    let fm = meter();
    assert_eq!(fm.date(), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    assert_eq!(fm.latitude(), 0.0);
    assert_eq!(fm.longitude(), 0.0);
    assert_eq!(fm.altitude(), 0.0);
    assert_eq!(*fm.geometry(), 0.0);
}

#[test]
fn test_atmospheric_depth() {
    let mut fm = meter();
    assert!((fm.atmospheric_depth().unwrap() - 1033.227453).abs() < 1e-6);
    fm.set_altitude(1e6);
    let d = fm.atmospheric_depth().unwrap();
    assert!((d - DEPTH_10_KM).abs() < 1e-6, "d = {d}");
    assert!((d - REFERENCE_DEPTH_10_KM - REFERENCE_OFFSET_10_KM).abs() < 1e-6);
}

#[test]
fn test_cutoff_rigidity() {
    let mut fm = meter();
    assert!((fm.cutoff_rigidity().unwrap() - 13600.0).abs() < 1e-6);
    fm.set_latitude(45.0);
    assert!((fm.cutoff_rigidity().unwrap() - 4940.0).abs() < 1e-6);
    fm.set_latitude(-45.0);
    fm.set_longitude(-120.0);
    assert!((fm.cutoff_rigidity().unwrap() - 4940.0).abs() < 1e-6);
    fm.set_latitude(90.0);
    assert!(fm.cutoff_rigidity().unwrap().abs() < 1e-6);
}

#[test]
fn test_solar_modulation() {
    let mut fm = meter();
    assert!((fm.solar_modulation().unwrap() - 131.0).abs() < 1e-9);
    fm.set_date("1960-05-01").unwrap();
    assert_eq!(fm.solar_modulation().unwrap(), 20.0);
    fm.set_date("2030-05-01").unwrap();
    assert_eq!(fm.solar_modulation().unwrap(), 2.0);
}

#[test]
fn test_derived_values_are_not_cached() {
    let mut fm = meter();
    let sea = fm.atmospheric_depth().unwrap();
    assert_eq!(fm.atmospheric_depth().unwrap(), sea);
    fm.set_altitude(3e5);
    assert!(fm.atmospheric_depth().unwrap() < sea);
    let equator = fm.cutoff_rigidity().unwrap();
    assert_eq!(fm.cutoff_rigidity().unwrap(), equator);
    fm.set_latitude(30.0);
    assert!(fm.cutoff_rigidity().unwrap() < equator);
}

#[test]
fn test_lazy_domain_errors() {
    let mut fm = meter();
    fm.set_latitude(95.0);
    assert!(matches!(fm.cutoff_rigidity(), Err(FluxError::Domain { .. })));
    assert!(matches!(fm.flux("n", 1.0, None, true), Err(FluxError::Domain { .. })));
    fm.set_latitude(0.0);
    fm.set_altitude(-1e6);
    assert!(matches!(fm.atmospheric_depth(), Err(FluxError::Domain { .. })));
    fm.set_altitude(0.0);
    assert!(fm.flux("n", 1.0, None, true).is_ok());
}

#[test]
fn test_particle_equivalence() {
    let fm = meter();
    let pairs: [(&str, i32); 7] = [
        ("n", 2112),
        ("p", 2212),
        ("mu+", -13),
        ("mu-", 13),
        ("e+", -11),
        ("e-", 11),
        ("gamma", 22),
    ];
    for (symbol, code) in pairs {
        for energy in [0.01, 0.5, 3.0, 1000.0] {
            let by_symbol = scalar(fm.flux(symbol, energy, None, true).unwrap());
            let by_code = scalar(fm.flux(code, energy, None, true).unwrap());
            assert_eq!(by_symbol, by_code, "{symbol} at {energy} MeV");
            assert!(by_symbol > 0.0);
        }
        let a = fm.flux(symbol, 10.0, Some(45.0.into()), true).unwrap();
        let b = fm.flux(code, 10.0, Some(45.0.into()), true).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_unknown_particle() {
    let fm = meter();
    assert!(matches!(
        fm.flux("pion", 1.0, None, true),
        Err(FluxError::UnknownParticle(_))
    ));
    assert!(matches!(
        fm.flux(211, 1.0, None, true),
        Err(FluxError::UnknownParticle(_))
    ));
}

#[test]
fn test_grid_mode_shape() {
    let fm = meter();
    let out = fm
        .flux("n", vec![1.0, 10.0], Some(Samples::from(vec![30.0, 30.0])), true)
        .unwrap();
    assert_eq!(out.shape(), &[2, 2]);
    let a = out.as_array().unwrap();
    for i in 0..2 {
        assert_eq!(a[[i, 0]], a[[i, 1]]);
    }
    assert!(a[[0, 0]] > a[[1, 0]]);

    let out = fm
        .flux("n", vec![5.0, 5.0], Some(Samples::from(vec![0.0, 60.0, 120.0])), true)
        .unwrap();
    assert_eq!(out.shape(), &[2, 3]);
    let a = out.as_array().unwrap();
    for j in 0..3 {
        assert_eq!(a[[0, j]], a[[1, j]]);
    }
}

#[test]
fn test_grid_mode_single_sequence() {
    let fm = meter();
    let out = fm.flux("p", [0.1, 1.0, 10.0], None, true).unwrap();
    assert_eq!(out.shape(), &[3]);
    let a = out.into_array();
    let single = scalar(fm.flux("p", 1.0, None, true).unwrap());
    assert_eq!(a[[1]], single);
}

#[test]
fn test_pairwise_mode() {
    let fm = meter();
    let energies = vec![1.0, 10.0, 100.0];
    let thetas = vec![0.0, 30.0, 60.0];
    let out = fm
        .flux("mu-", energies.clone(), Some(thetas.clone().into()), false)
        .unwrap();
    assert_eq!(out.shape(), &[3]);
    let a = out.as_array().unwrap();
    for k in 0..3 {
        let single = scalar(
            fm.flux("mu-", energies[k], Some(thetas[k].into()), true)
                .unwrap(),
        );
        assert_eq!(a[[k]], single);
    }
}

#[test]
fn test_pairwise_shape_mismatch() {
    let fm = meter();
    let result = fm.flux(
        "n",
        vec![1.0, 10.0],
        Some(Samples::from(vec![0.0, 30.0, 60.0])),
        false,
    );
    assert!(matches!(
        result,
        Err(FluxError::ShapeMismatch {
            expected: 2,
            found: 3
        })
    ));
}

#[test]
fn test_annihilation_line() {
    let fm = meter();
    let total = scalar(fm.flux(22, "me", None, true).unwrap());
    assert!((total - 0.00550347).abs() < 1e-6, "total = {total}");
    let vertical = scalar(fm.flux(22, "me", Some(0.0.into()), true).unwrap());
    assert!((vertical - 0.00110993).abs() < 1e-6, "vertical = {vertical}");
    assert_ne!(total, vertical);
    assert_eq!(total, scalar(fm.flux("gamma", "me", None, true).unwrap()));
}

#[test]
fn test_line_tokens_in_sequences() {
    let fm = meter();
    let out = fm.flux(22, vec!["me", "me"], None, true).unwrap();
    let a = out.as_array().unwrap();
    assert!((a[[0]] - 0.00550347).abs() < 1e-6);
    assert_eq!(a[[0]], a[[1]]);
}

#[test]
fn test_line_token_errors() {
    let fm = meter();
    assert!(matches!(
        fm.flux("n", "me", None, true),
        Err(FluxError::Format { .. })
    ));
    assert!(matches!(
        fm.flux(22, "511keV", None, true),
        Err(FluxError::Format { .. })
    ));
}

#[test]
fn test_geometry_presets() {
    let mut fm = meter();
    let ground = scalar(fm.flux("n", 0.01, None, true).unwrap());
    fm.set_geometry("cabin");
    assert_eq!(*fm.geometry(), "cabin");
    let cabin = scalar(fm.flux("n", 0.01, None, true).unwrap());
    assert_rel(cabin / ground, 1.60 / 1.30, 1e-9);
    // Charged species are not corrected.
    let p_cabin = scalar(fm.flux("p", 0.01, None, true).unwrap());
    fm.set_geometry(0.0);
    assert_eq!(*fm.geometry(), 0.0);
    assert_eq!(p_cabin, scalar(fm.flux("p", 0.01, None, true).unwrap()));
}

#[test]
fn test_bad_geometry_fails_at_evaluation() {
    let mut fm = meter();
    fm.set_geometry("submarine");
    assert!(matches!(
        fm.flux("n", 1.0, None, true),
        Err(FluxError::Format { .. })
    ));
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        fm.set_geometry(bad);
        assert!(matches!(
            fm.flux("n", 1.0, None, true),
            Err(FluxError::Domain { .. })
        ));
    }
}

#[test]
fn test_every_preset_scales_neutrons() {
    let mut fm = meter();
    // Ground rows at w = 0, preset rows from tests/fixtures/geometry.json.
    let cases = [
        (0.01, 1.30, [("blackhole", 0.55), ("cabin", 1.60), ("no_ground", 1.00), ("pilot", 1.50)]),
        (1.0, 1.10, [("blackhole", 0.80), ("cabin", 1.25), ("no_ground", 1.00), ("pilot", 1.20)]),
    ];
    for (energy, ground_factor, presets) in cases {
        fm.set_geometry(0.0);
        let ground = scalar(fm.flux("n", energy, None, true).unwrap());
        for (name, factor) in presets {
            fm.set_geometry(name);
            let value = scalar(fm.flux("n", energy, None, true).unwrap());
            assert!(value > 0.0, "{name} at {energy} MeV");
            assert_rel(value / ground, factor / ground_factor, 1e-9);
        }
    }
}

#[test]
fn test_numeric_preset_parameters() {
    let mut fm = meter();
    for (value, name) in [(100.0, "blackhole"), (-11.0, "cabin"), (10.0, "no_ground"), (-1.0, "pilot")] {
        fm.set_geometry(name);
        let by_name = scalar(fm.flux("n", 0.01, None, true).unwrap());
        fm.set_geometry(value);
        assert_eq!(scalar(fm.flux("n", 0.01, None, true).unwrap()), by_name, "{value}");
    }
}

#[test]
fn test_geometry_parameter_outside_water_fraction() {
    let mut fm = meter();
    let ground = scalar(fm.flux("n", 0.01, None, true).unwrap());
    for value in [1.5, -3.0, 1e4] {
        fm.set_geometry(value);
        let value_flux = scalar(fm.flux("n", 0.01, None, true).unwrap());
        // No tabulated correction for a bare parameter.
        assert_rel(value_flux, ground / 1.30, 1e-9);
    }
    fm.set_geometry(1.5);
    let p = scalar(fm.flux("p", 0.01, None, true).unwrap());
    fm.set_geometry(0.0);
    assert_eq!(p, scalar(fm.flux("p", 0.01, None, true).unwrap()));
}

#[test]
fn test_energy_outside_table() {
    let fm = meter();
    assert!(matches!(
        fm.flux("n", 1e7, None, true),
        Err(FluxError::Domain { .. })
    ));
    assert!(fm.flux("n", -1.0, None, true).is_err());
}

#[test]
fn test_theta_domain() {
    let fm = meter();
    assert!(fm.flux("mu+", 1.0, Some(180.0.into()), true).is_ok());
    assert!(matches!(
        fm.flux("mu+", 1.0, Some((-1.0).into()), true),
        Err(FluxError::Domain { .. })
    ));
}

#[test]
fn test_muon_angular_distribution() {
    let fm = meter();
    let vertical = scalar(fm.flux("mu+", 1000.0, Some(0.0.into()), true).unwrap());
    let inclined = scalar(fm.flux("mu+", 1000.0, Some(60.0.into()), true).unwrap());
    let upward = scalar(fm.flux("mu+", 1000.0, Some(120.0.into()), true).unwrap());
    assert!(vertical > inclined);
    assert!(upward.abs() < 1e-15);
}

#[test]
fn test_request_overrides() {
    let fm = meter();
    let value = scalar(
        fm.request("n", 1.0)
            .atmospheric_depth(300.0)
            .cutoff_rigidity(0.0)
            .solar_modulation(0.0)
            .evaluate()
            .unwrap(),
    );
    // Spectrum node times the open-ground correction at 1 MeV.
    assert_rel(value, 1.533550e-01 * 1.10, 1e-6);

    // Overrides bypass the derived quantities.
    let mut polar = fm.clone();
    polar.set_latitude(120.0);
    assert!(polar.flux("n", 1.0, None, true).is_err());
    assert!(polar
        .request("n", 1.0)
        .cutoff_rigidity(0.0)
        .evaluate()
        .is_ok());
}

#[test]
fn test_request_defaults_match_flux() {
    let fm = meter();
    let a = fm.request("e-", [1.0, 2.0]).theta(10.0).evaluate().unwrap();
    let b = fm
        .flux("e-", [1.0, 2.0], Some(10.0.into()), true)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_flux_is_idempotent() {
    let fm = meter();
    let a = fm.flux("n", vec![0.1, 1.0, 10.0], None, true).unwrap();
    let b = fm.flux("n", vec![0.1, 1.0, 10.0], None, true).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_flux_decreases_with_depth() {
    let mut fm = meter();
    fm.set_altitude(1e6);
    let high = scalar(fm.flux("n", 1.0, None, true).unwrap());
    fm.set_altitude(0.0);
    let low = scalar(fm.flux("n", 1.0, None, true).unwrap());
    assert!(high > low);
}
