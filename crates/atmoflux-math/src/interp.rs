//! Axis location and multilinear interpolation on tabulated grids.
//!
//! Every tabulated model (spectra, cutoff map, solar series, angular and
//! geometry corrections) is a set of monotonic axes plus a dense value
//! array. Axes interpolate either in `x` or in `ln x`, values either in
//! `y` or in `ln y`, giving linear, log-linear or log-log schemes.

use atmoflux_types::error::{FluxError, FluxResult};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::{Deserialize, Serialize};

/// Coordinate transform applied along an axis before interpolating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// Behaviour for queries outside the axis range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    /// Pin the query to the nearest boundary node.
    #[default]
    Clamp,
    /// Reject the query with a domain error.
    Fail,
}

/// Axis description as stored in data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisSpec {
    pub nodes: Vec<f64>,
    #[serde(default)]
    pub scale: Scale,
    /// When absent the owning table picks its per-axis default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrapolation: Option<Extrapolation>,
}

impl AxisSpec {
    pub fn build(&self, name: &str, default: Extrapolation) -> FluxResult<Axis> {
        Axis::new(
            name,
            self.nodes.clone(),
            self.scale,
            self.extrapolation.unwrap_or(default),
        )
    }
}

/// A strictly increasing set of breakpoints.
#[derive(Debug, Clone)]
pub struct Axis {
    name: String,
    nodes: Vec<f64>,
    coords: Vec<f64>,
    scale: Scale,
    extrapolation: Extrapolation,
}

/// Position of a query inside an axis: `index` is the lower node,
/// `weight` the fractional distance towards `index + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub index: usize,
    pub weight: f64,
    /// Boundary value the query was pinned to, if it was clamped.
    pub clamped: Option<f64>,
}

impl Axis {
    pub fn new(
        name: &str,
        nodes: Vec<f64>,
        scale: Scale,
        extrapolation: Extrapolation,
    ) -> FluxResult<Self> {
        if nodes.is_empty() {
            return Err(FluxError::ConfigError(format!("axis '{name}' has no nodes")));
        }
        if nodes.iter().any(|x| !x.is_finite()) {
            return Err(FluxError::ConfigError(format!(
                "axis '{name}' has non-finite nodes"
            )));
        }
        if nodes.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FluxError::ConfigError(format!(
                "axis '{name}' is not strictly increasing"
            )));
        }
        if scale == Scale::Log && nodes[0] <= 0.0 {
            return Err(FluxError::ConfigError(format!(
                "axis '{name}' is logarithmic but has non-positive nodes"
            )));
        }
        let coords = match scale {
            Scale::Linear => nodes.clone(),
            Scale::Log => nodes.iter().map(|x| x.ln()).collect(),
        };
        Ok(Axis {
            name: name.to_string(),
            nodes,
            coords,
            scale,
            extrapolation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.nodes[0]
    }

    pub fn max(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Locate `x` on the axis, applying the extrapolation policy.
    pub fn locate(&self, x: f64) -> FluxResult<Bracket> {
        if !x.is_finite() {
            return Err(FluxError::domain(self.name.as_str(), x, self.min(), self.max()));
        }
        let (x, clamped) = if x < self.min() || x > self.max() {
            match self.extrapolation {
                Extrapolation::Fail => {
                    return Err(FluxError::domain(
                        self.name.as_str(),
                        x,
                        self.min(),
                        self.max(),
                    ))
                }
                Extrapolation::Clamp => {
                    let pinned = x.clamp(self.min(), self.max());
                    (pinned, Some(pinned))
                }
            }
        } else {
            (x, None)
        };

        let n = self.coords.len();
        if n == 1 {
            return Ok(Bracket {
                index: 0,
                weight: 0.0,
                clamped,
            });
        }
        let t = match self.scale {
            Scale::Linear => x,
            Scale::Log => x.ln(),
        };
        let upper = self.coords.partition_point(|&c| c <= t);
        let index = upper.saturating_sub(1).min(n - 2);
        let c0 = self.coords[index];
        let c1 = self.coords[index + 1];
        let weight = ((t - c0) / (c1 - c0)).clamp(0.0, 1.0);
        Ok(Bracket {
            index,
            weight,
            clamped,
        })
    }
}

/// Multilinear interpolation of `values` at the given per-axis brackets.
///
/// With `log_values` the corners are combined in `ln y`; a corner that is
/// not strictly positive makes the cell fall back to linear values.
pub fn interpolate(values: &ArrayViewD<f64>, brackets: &[Bracket], log_values: bool) -> f64 {
    let n = brackets.len();
    debug_assert_eq!(values.ndim(), n);
    let mut corners: Vec<(f64, f64)> = Vec::with_capacity(1 << n);
    let mut idx = vec![0usize; n];
    for mask in 0..(1usize << n) {
        let mut w = 1.0;
        for (axis, b) in brackets.iter().enumerate() {
            if ((mask >> axis) & 1) == 1 {
                w *= b.weight;
                idx[axis] = b.index + 1;
            } else {
                w *= 1.0 - b.weight;
                idx[axis] = b.index;
            }
            if w == 0.0 {
                break;
            }
        }
        if w == 0.0 {
            continue;
        }
        corners.push((w, values[IxDyn(&idx)]));
    }

    if log_values && corners.iter().all(|&(_, v)| v > 0.0) {
        corners.iter().map(|&(w, v)| w * v.ln()).sum::<f64>().exp()
    } else {
        corners.iter().map(|&(w, v)| w * v).sum()
    }
}

/// One-dimensional interpolation of `values` tabulated on `axis`.
pub fn interp1d(axis: &Axis, values: &[f64], x: f64, log_values: bool) -> FluxResult<f64> {
    if values.len() != axis.len() {
        return Err(FluxError::ConfigError(format!(
            "axis '{}' has {} nodes but {} values",
            axis.name(),
            axis.len(),
            values.len()
        )));
    }
    let b = axis.locate(x)?;
    let v0 = values[b.index];
    if b.weight == 0.0 {
        return Ok(v0);
    }
    let v1 = values[b.index + 1];
    let value = if log_values && v0 > 0.0 && v1 > 0.0 {
        ((1.0 - b.weight) * v0.ln() + b.weight * v1.ln()).exp()
    } else {
        (1.0 - b.weight) * v0 + b.weight * v1
    };
    Ok(value)
}

/// Dense value grid over a set of axes.
#[derive(Debug, Clone)]
pub struct TableGrid {
    axes: Vec<Axis>,
    values: ArrayD<f64>,
    log_values: bool,
}

impl TableGrid {
    pub fn new(axes: Vec<Axis>, values: ArrayD<f64>, log_values: bool) -> FluxResult<Self> {
        let expected: Vec<usize> = axes.iter().map(Axis::len).collect();
        if values.shape() != expected.as_slice() {
            let names: Vec<&str> = axes.iter().map(Axis::name).collect();
            return Err(FluxError::ConfigError(format!(
                "invalid grid shape {:?}, expected {:?} for axes {:?}",
                values.shape(),
                expected,
                names
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FluxError::ConfigError(
                "grid contains non-finite values".to_string(),
            ));
        }
        Ok(TableGrid {
            axes,
            values,
            log_values,
        })
    }

    /// Build from a row-major flat vector.
    pub fn from_flat(axes: Vec<Axis>, flat: Vec<f64>, log_values: bool) -> FluxResult<Self> {
        let shape: Vec<usize> = axes.iter().map(Axis::len).collect();
        let values = ArrayD::from_shape_vec(IxDyn(&shape), flat).map_err(|e| {
            FluxError::ConfigError(format!("invalid grid data for shape {shape:?}: {e}"))
        })?;
        Self::new(axes, values, log_values)
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn log_values(&self) -> bool {
        self.log_values
    }

    /// Locate every coordinate on its axis.
    pub fn brackets(&self, coords: &[f64]) -> FluxResult<Vec<Bracket>> {
        if coords.len() != self.axes.len() {
            return Err(FluxError::ConfigError(format!(
                "expected {} coordinates, found {}",
                self.axes.len(),
                coords.len()
            )));
        }
        self.axes
            .iter()
            .zip(coords)
            .map(|(axis, &x)| axis.locate(x))
            .collect()
    }

    pub fn interpolate_at(&self, brackets: &[Bracket]) -> f64 {
        interpolate(&self.values.view(), brackets, self.log_values)
    }

    pub fn evaluate(&self, coords: &[f64]) -> FluxResult<f64> {
        let brackets = self.brackets(coords)?;
        Ok(self.interpolate_at(&brackets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(name: &str, nodes: &[f64]) -> Axis {
        Axis::new(name, nodes.to_vec(), Scale::Linear, Extrapolation::Clamp).unwrap()
    }

    #[test]
    fn test_locate_exact_node() {
        let axis = linear("x", &[0.0, 1.0, 2.0, 4.0]);
        let b = axis.locate(2.0).unwrap();
        assert_eq!(b.index, 2);
        assert_eq!(b.weight, 0.0);
        assert!(b.clamped.is_none());
    }

    #[test]
    fn test_locate_last_node() {
        let axis = linear("x", &[0.0, 1.0, 2.0]);
        let b = axis.locate(2.0).unwrap();
        assert_eq!(b.index, 1);
        assert!((b.weight - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_locate_clamps() {
        let axis = linear("x", &[1.0, 2.0]);
        let b = axis.locate(-3.0).unwrap();
        assert_eq!(b.index, 0);
        assert_eq!(b.weight, 0.0);
        assert_eq!(b.clamped, Some(1.0));
        let b = axis.locate(7.0).unwrap();
        assert_eq!(b.clamped, Some(2.0));
    }

    #[test]
    fn test_locate_fails() {
        let axis = Axis::new("energy", vec![1.0, 10.0], Scale::Log, Extrapolation::Fail).unwrap();
        match axis.locate(100.0) {
            Err(FluxError::Domain { quantity, min, max, .. }) => {
                assert_eq!(quantity, "energy");
                assert_eq!(min, 1.0);
                assert_eq!(max, 10.0);
            }
            other => panic!("expected domain error, got {other:?}"),
        }
        assert!(axis.locate(f64::NAN).is_err());
    }

    #[test]
    fn test_log_axis_weight() {
        let axis = Axis::new("e", vec![1.0, 100.0], Scale::Log, Extrapolation::Fail).unwrap();
        let b = axis.locate(10.0).unwrap();
        assert!((b.weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_axis_validation() {
        assert!(Axis::new("a", vec![], Scale::Linear, Extrapolation::Clamp).is_err());
        assert!(Axis::new("a", vec![1.0, 1.0], Scale::Linear, Extrapolation::Clamp).is_err());
        assert!(Axis::new("a", vec![0.0, 1.0], Scale::Log, Extrapolation::Clamp).is_err());
        assert!(Axis::new("a", vec![f64::NAN], Scale::Linear, Extrapolation::Clamp).is_err());
    }

    #[test]
    fn test_single_node_axis() {
        let axis = linear("m", &[5.0]);
        let b = axis.locate(5.0).unwrap();
        assert_eq!((b.index, b.weight), (0, 0.0));
        let grid = TableGrid::from_flat(vec![axis, linear("x", &[0.0, 1.0])], vec![2.0, 4.0], false)
            .unwrap();
        assert!((grid.evaluate(&[5.0, 0.5]).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_plane() {
        let ax = linear("x", &[0.0, 1.0, 2.0]);
        let ay = linear("y", &[0.0, 10.0]);
        let flat: Vec<f64> = [0.0, 1.0, 2.0]
            .iter()
            .flat_map(|&x| [0.0, 10.0].map(move |y| 2.0 * x + 0.5 * y))
            .collect();
        let grid = TableGrid::from_flat(vec![ax, ay], flat, false).unwrap();
        let v = grid.evaluate(&[1.25, 4.0]).unwrap();
        assert!((v - (2.5 + 2.0)).abs() < 1e-12, "v = {v}");
    }

    #[test]
    fn test_log_log_power_law() {
        let e = Axis::new("e", vec![1.0, 10.0, 100.0], Scale::Log, Extrapolation::Fail).unwrap();
        let flat: Vec<f64> = e.nodes().iter().map(|x| 3.0 * x.powf(-2.7)).collect();
        let grid = TableGrid::from_flat(vec![e], flat, true).unwrap();
        let v = grid.evaluate(&[31.6]).unwrap();
        let expected = 3.0 * 31.6_f64.powf(-2.7);
        assert!(((v - expected) / expected).abs() < 1e-12);
    }

    #[test]
    fn test_log_values_fall_back_on_zero() {
        let e = linear("e", &[0.0, 1.0]);
        let grid = TableGrid::from_flat(vec![e], vec![0.0, 2.0], true).unwrap();
        assert!((grid.evaluate(&[0.5]).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let result = TableGrid::from_flat(vec![linear("x", &[0.0, 1.0])], vec![1.0], false);
        assert!(matches!(result, Err(FluxError::ConfigError(_))));
    }

    #[test]
    fn test_interp1d() {
        let axis = linear("t", &[0.0, 10.0, 20.0]);
        let v = interp1d(&axis, &[0.0, 100.0, 50.0], 15.0, false).unwrap();
        assert!((v - 75.0).abs() < 1e-12);
        assert!(interp1d(&axis, &[0.0, 1.0], 5.0, false).is_err());
    }

    #[test]
    fn test_axis_spec_default_policy() {
        let spec: AxisSpec = serde_json::from_str(r#"{"nodes": [1, 2, 3], "scale": "log"}"#).unwrap();
        let axis = spec.build("energy", Extrapolation::Fail).unwrap();
        assert_eq!(axis.scale(), Scale::Log);
        assert_eq!(axis.extrapolation(), Extrapolation::Fail);
        let spec: AxisSpec =
            serde_json::from_str(r#"{"nodes": [1, 2], "extrapolation": "clamp"}"#).unwrap();
        let axis = spec.build("depth", Extrapolation::Fail).unwrap();
        assert_eq!(axis.extrapolation(), Extrapolation::Clamp);
    }
}
