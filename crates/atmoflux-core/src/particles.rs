// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Particles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Particle catalogue: resolves symbols and PDG codes to species.

use atmoflux_types::error::{FluxError, FluxResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Secondary cosmic-ray species. Nuclei are grouped by charge number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Particle {
    Neutron = 0,
    Proton = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Ne = 10,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Ar = 18,
    K = 19,
    Ca = 20,
    Sc = 21,
    Ti = 22,
    V = 23,
    Cr = 24,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    MuonPlus = 29,
    MuonMinus = 30,
    Electron = 31,
    Positron = 32,
    Photon = 33,
}

/// Angular-distribution family of a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngularGroup {
    Neutron,
    Proton,
    Helium,
    Muon,
    Electron,
    Photon,
    /// Heavier nuclei, no dedicated angular data.
    None,
}

/// Particle identifier as given by a caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticleId {
    Code(i32),
    Symbol(String),
}

impl From<i32> for ParticleId {
    fn from(value: i32) -> Self {
        ParticleId::Code(value)
    }
}

impl From<&str> for ParticleId {
    fn from(value: &str) -> Self {
        ParticleId::Symbol(value.to_string())
    }
}

impl From<String> for ParticleId {
    fn from(value: String) -> Self {
        ParticleId::Symbol(value)
    }
}

impl From<Particle> for ParticleId {
    fn from(value: Particle) -> Self {
        ParticleId::Code(value.code())
    }
}

/// Long-form names accepted next to the canonical symbols.
const ALIASES: [(&str, Particle); 9] = [
    ("neutron", Particle::Neutron),
    ("proton", Particle::Proton),
    ("alpha", Particle::He),
    ("muon+", Particle::MuonPlus),
    ("muon-", Particle::MuonMinus),
    ("electron", Particle::Electron),
    ("positron", Particle::Positron),
    ("photon", Particle::Photon),
    ("γ", Particle::Photon),
];

/// Most abundant isotope (Z, A) of each tabulated nucleus.
const NUCLEI: [(u32, u32); 27] = [
    (2, 4),
    (3, 7),
    (4, 9),
    (5, 11),
    (6, 12),
    (7, 14),
    (8, 16),
    (9, 19),
    (10, 20),
    (11, 23),
    (12, 24),
    (13, 27),
    (14, 28),
    (15, 31),
    (16, 32),
    (17, 35),
    (18, 40),
    (19, 39),
    (20, 40),
    (21, 45),
    (22, 48),
    (23, 51),
    (24, 52),
    (25, 55),
    (26, 56),
    (27, 59),
    (28, 58),
];

impl Particle {
    pub const ALL: [Particle; 34] = [
        Particle::Neutron,
        Particle::Proton,
        Particle::He,
        Particle::Li,
        Particle::Be,
        Particle::B,
        Particle::C,
        Particle::N,
        Particle::O,
        Particle::F,
        Particle::Ne,
        Particle::Na,
        Particle::Mg,
        Particle::Al,
        Particle::Si,
        Particle::P,
        Particle::S,
        Particle::Cl,
        Particle::Ar,
        Particle::K,
        Particle::Ca,
        Particle::Sc,
        Particle::Ti,
        Particle::V,
        Particle::Cr,
        Particle::Mn,
        Particle::Fe,
        Particle::Co,
        Particle::Ni,
        Particle::MuonPlus,
        Particle::MuonMinus,
        Particle::Electron,
        Particle::Positron,
        Particle::Photon,
    ];

    /// Resolve a symbol or numeric code.
    pub fn resolve(id: &ParticleId) -> FluxResult<Self> {
        match id {
            ParticleId::Code(code) => Self::from_code(*code),
            ParticleId::Symbol(symbol) => Self::from_symbol(symbol),
        }
    }

    pub fn from_symbol(symbol: &str) -> FluxResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.symbol() == symbol)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == symbol)
                    .map(|&(_, p)| p)
            })
            .ok_or_else(|| FluxError::UnknownParticle(format!("'{symbol}'")))
    }

    /// Resolve a PDG code. Nuclear codes `10LZZZAAAI` resolve by charge.
    pub fn from_code(code: i32) -> FluxResult<Self> {
        let particle = match code {
            -13 => Some(Particle::MuonPlus),
            -11 => Some(Particle::Positron),
            11 => Some(Particle::Electron),
            13 => Some(Particle::MuonMinus),
            22 => Some(Particle::Photon),
            2112 => Some(Particle::Neutron),
            2212 => Some(Particle::Proton),
            1_000_000_000.. => Self::from_nuclear_code(code as u32),
            _ => None,
        };
        particle.ok_or_else(|| FluxError::UnknownParticle(code.to_string()))
    }

    fn from_nuclear_code(code: u32) -> Option<Self> {
        let strangeness = (code / 10_000_000) % 10;
        let z = (code / 10_000) % 1000;
        let a = (code / 10) % 1000;
        if strangeness != 0 || z == 0 || a < z {
            return None;
        }
        match z {
            1 if a == 1 => Some(Particle::Proton),
            2..=28 => Some(Self::ALL[z as usize]),
            _ => None,
        }
    }

    /// Canonical symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Particle::Neutron => "n",
            Particle::Proton => "p",
            Particle::He => "He",
            Particle::Li => "Li",
            Particle::Be => "Be",
            Particle::B => "B",
            Particle::C => "C",
            Particle::N => "N",
            Particle::O => "O",
            Particle::F => "F",
            Particle::Ne => "Ne",
            Particle::Na => "Na",
            Particle::Mg => "Mg",
            Particle::Al => "Al",
            Particle::Si => "Si",
            Particle::P => "P",
            Particle::S => "S",
            Particle::Cl => "Cl",
            Particle::Ar => "Ar",
            Particle::K => "K",
            Particle::Ca => "Ca",
            Particle::Sc => "Sc",
            Particle::Ti => "Ti",
            Particle::V => "V",
            Particle::Cr => "Cr",
            Particle::Mn => "Mn",
            Particle::Fe => "Fe",
            Particle::Co => "Co",
            Particle::Ni => "Ni",
            Particle::MuonPlus => "mu+",
            Particle::MuonMinus => "mu-",
            Particle::Electron => "e-",
            Particle::Positron => "e+",
            Particle::Photon => "gamma",
        }
    }

    /// Canonical PDG code.
    pub fn code(&self) -> i32 {
        match self {
            Particle::Neutron => 2112,
            Particle::Proton => 2212,
            Particle::MuonPlus => -13,
            Particle::MuonMinus => 13,
            Particle::Electron => 11,
            Particle::Positron => -11,
            Particle::Photon => 22,
            nucleus => {
                let z = *nucleus as u32;
                let a = NUCLEI[(z - 2) as usize].1;
                (1_000_000_000 + z * 10_000 + a * 10) as i32
            }
        }
    }

    /// Charge number for nuclei (protons included), `None` otherwise.
    pub fn charge_number(&self) -> Option<u32> {
        match self {
            Particle::Proton => Some(1),
            Particle::Neutron
            | Particle::MuonPlus
            | Particle::MuonMinus
            | Particle::Electron
            | Particle::Positron
            | Particle::Photon => None,
            nucleus => Some(*nucleus as u32),
        }
    }

    pub fn angular_group(&self) -> AngularGroup {
        match self {
            Particle::Neutron => AngularGroup::Neutron,
            Particle::Proton => AngularGroup::Proton,
            Particle::He => AngularGroup::Helium,
            Particle::MuonPlus | Particle::MuonMinus => AngularGroup::Muon,
            Particle::Electron | Particle::Positron => AngularGroup::Electron,
            Particle::Photon => AngularGroup::Photon,
            _ => AngularGroup::None,
        }
    }
}

impl FromStr for Particle {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Particle::from_symbol(s)
    }
}

impl TryFrom<i32> for Particle {
    type Error = FluxError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Particle::from_code(value)
    }
}

impl TryFrom<&ParticleId> for Particle {
    type Error = FluxError;

    fn try_from(value: &ParticleId) -> Result<Self, Self::Error> {
        Particle::resolve(value)
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
