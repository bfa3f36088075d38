//! Interpolation primitives for AtmoFlux.

pub mod interp;
