//! Atmospheric cosmic-ray flux engine.
//!
//! Depth, cutoff rigidity and solar modulation models feed a tabulated
//! multi-axis spectrum; [`fluxmeter::Fluxmeter`] ties them to an observer.

pub mod atmosphere;
pub mod broadcast;
pub mod cutoff;
pub mod engine;
pub mod fluxmeter;
pub mod grid;
pub mod lines;
pub mod particles;
pub mod solar;
pub mod spectrum;
pub mod tables;

pub use broadcast::{FluxOutput, Samples};
pub use engine::{EnergyValue, FluxEngine};
pub use fluxmeter::{DateArg, FluxRequest, Fluxmeter};
pub use particles::{Particle, ParticleId};
pub use tables::Tables;

