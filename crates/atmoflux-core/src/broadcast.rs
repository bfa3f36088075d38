// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Broadcast Planning
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scalar-or-sequence query arguments and the output shape they produce.
//!
//! The plan is computed before any evaluation: in grid mode the output
//! is the Cartesian product of all sequence arguments, in pairwise mode
//! every sequence must have the same length and is zipped.

use crate::engine::EnergyValue;
use atmoflux_types::error::{FluxError, FluxResult};
use ndarray::{ArrayD, IxDyn};

/// A query argument: one value, or an ordered sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples<T> {
    Scalar(T),
    Sequence(Vec<T>),
}

impl<T> Samples<T> {
    /// Sequence length, `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Samples::Scalar(_) => None,
            Samples::Sequence(v) => Some(v.len()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Samples::Scalar(_))
    }

    /// Value at `index`; a scalar broadcasts to every index.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            Samples::Scalar(v) => Some(v),
            Samples::Sequence(v) => v.get(index),
        }
    }
}

macro_rules! samples_from {
    ($target:ty: $($scalar:ty),+) => {
        $(
            impl From<$scalar> for Samples<$target> {
                fn from(value: $scalar) -> Self {
                    Samples::Scalar(value.into())
                }
            }

            impl From<Vec<$scalar>> for Samples<$target> {
                fn from(values: Vec<$scalar>) -> Self {
                    Samples::Sequence(values.into_iter().map(Into::into).collect())
                }
            }

            impl From<&[$scalar]> for Samples<$target> {
                fn from(values: &[$scalar]) -> Self {
                    Samples::Sequence(values.iter().cloned().map(Into::into).collect())
                }
            }

            impl<const N: usize> From<[$scalar; N]> for Samples<$target> {
                fn from(values: [$scalar; N]) -> Self {
                    Samples::Sequence(values.into_iter().map(Into::into).collect())
                }
            }
        )+
    };
}

samples_from!(f64: f64);
samples_from!(EnergyValue: f64, &str, String, EnergyValue);

impl From<ndarray::Array1<f64>> for Samples<f64> {
    fn from(values: ndarray::Array1<f64>) -> Self {
        Samples::Sequence(values.to_vec())
    }
}

impl From<ndarray::Array1<f64>> for Samples<EnergyValue> {
    fn from(values: ndarray::Array1<f64>) -> Self {
        Samples::Sequence(values.iter().map(|&e| EnergyValue::MeV(e)).collect())
    }
}

/// Result of a flux query.
#[derive(Debug, Clone, PartialEq)]
pub enum FluxOutput {
    Scalar(f64),
    Array(ArrayD<f64>),
}

impl FluxOutput {
    pub fn shape(&self) -> &[usize] {
        match self {
            FluxOutput::Scalar(_) => &[],
            FluxOutput::Array(a) => a.shape(),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FluxOutput::Scalar(v) => Some(*v),
            FluxOutput::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            FluxOutput::Scalar(_) => None,
            FluxOutput::Array(a) => Some(a),
        }
    }

    /// Array view of the result; a scalar becomes a 0-d array.
    pub fn into_array(self) -> ArrayD<f64> {
        match self {
            FluxOutput::Scalar(v) => ArrayD::from_elem(IxDyn(&[]), v),
            FluxOutput::Array(a) => a,
        }
    }
}

/// Evaluation plan for a set of arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    lens: Vec<Option<usize>>,
    shape: Vec<usize>,
    grid: bool,
}

impl Plan {
    /// Plan for arguments of the given lengths (`None` = scalar).
    pub fn new(lens: &[Option<usize>], grid: bool) -> FluxResult<Self> {
        let sequences: Vec<usize> = lens.iter().flatten().copied().collect();
        let shape = if grid {
            sequences
        } else {
            match sequences.split_first() {
                None => Vec::new(),
                Some((&first, rest)) => {
                    if let Some(&found) = rest.iter().find(|&&n| n != first) {
                        return Err(FluxError::ShapeMismatch {
                            expected: first,
                            found,
                        });
                    }
                    vec![first]
                }
            }
        };
        Ok(Plan {
            lens: lens.to_vec(),
            shape,
            grid,
        })
    }

    pub fn is_scalar(&self) -> bool {
        self.lens.iter().all(Option::is_none)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of scalar evaluations.
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Per-argument element indices of the `k`-th output (row-major).
    pub fn index(&self, k: usize) -> Vec<usize> {
        if !self.grid {
            return self.lens.iter().map(|len| len.map_or(0, |_| k)).collect();
        }
        let mut digits = vec![0usize; self.shape.len()];
        let mut rest = k;
        for (digit, &n) in digits.iter_mut().zip(&self.shape).rev() {
            if n > 0 {
                *digit = rest % n;
                rest /= n;
            }
        }
        let mut digits = digits.into_iter();
        self.lens
            .iter()
            .map(|len| match len {
                Some(_) => digits.next().unwrap_or(0),
                None => 0,
            })
            .collect()
    }

    /// Run `f` once per output element and assemble the result.
    pub fn evaluate<F>(&self, mut f: F) -> FluxResult<FluxOutput>
    where
        F: FnMut(&[usize]) -> FluxResult<f64>,
    {
        if self.is_scalar() {
            return Ok(FluxOutput::Scalar(f(&self.index(0))?));
        }
        let values = (0..self.size())
            .map(|k| f(&self.index(k)))
            .collect::<FluxResult<Vec<f64>>>()?;
        let array = ArrayD::from_shape_vec(IxDyn(&self.shape), values).map_err(|e| {
            FluxError::ConfigError(format!("invalid output shape {:?}: {e}", self.shape))
        })?;
        Ok(FluxOutput::Array(array))
    }
}
