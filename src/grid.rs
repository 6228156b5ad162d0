//! Uniform grid discretization of continuous observations
//!
//! Continuous observations are mapped onto a fixed-resolution grid so they
//! can key a dense action-value table. Every dimension is split into the
//! same number of equal-width bins between the per-dimension bounds the
//! environment advertises.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Uniform discretization grid over a bounded continuous observation space.
///
/// For each dimension `d`, the bin index is
/// `floor((obs[d] - low[d]) / bin_width[d])` with
/// `bin_width[d] = (high[d] - low[d]) / bins`. An observation exactly at
/// `high[d]` therefore maps to index `bins`, which is why tables keyed by
/// this grid carry `bins + 1` cells per dimension.
///
/// # Precondition
///
/// Observations must lie within the declared bounds; the grid does not
/// clamp. An observation above `high[d]` produces an index past the table
/// edge and aborts the training run when used as a table key. An observation
/// below `low[d]` saturates to index 0 (the float-to-`usize` cast cannot go
/// negative). Callers rely on the environment honouring its own advertised
/// bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateGrid {
    low: Vec<f64>,
    high: Vec<f64>,
    bin_width: Vec<f64>,
    bins: usize,
}

impl StateGrid {
    /// Create a grid with `bins` equal-width intervals per dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are empty or of mismatched length, if
    /// `bins` is zero, or if any `high[d]` is not strictly above `low[d]`.
    pub fn new(low: Vec<f64>, high: Vec<f64>, bins: usize) -> Result<Self> {
        if low.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "observation bounds are empty".to_string(),
            });
        }
        if low.len() != high.len() {
            return Err(Error::DimensionMismatch {
                expected: low.len(),
                actual: high.len(),
            });
        }
        if bins == 0 {
            return Err(Error::InvalidConfiguration {
                message: "bins must be at least 1".to_string(),
            });
        }
        for (d, (&lo, &hi)) in low.iter().zip(&high).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || hi <= lo {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "bounds [{lo}, {hi}] in dimension {d} must be finite with high above low"
                    ),
                });
            }
        }

        let bin_width = low
            .iter()
            .zip(&high)
            .map(|(&lo, &hi)| (hi - lo) / bins as f64)
            .collect();

        Ok(Self {
            low,
            high,
            bin_width,
            bins,
        })
    }

    /// Number of observation dimensions.
    pub fn dims(&self) -> usize {
        self.low.len()
    }

    /// Bin count per dimension.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Cells per dimension in a table keyed by this grid (`bins + 1`; the
    /// extra cell holds observations exactly at the high bound).
    pub fn cells_per_dim(&self) -> usize {
        self.bins + 1
    }

    /// Per-dimension low bounds.
    pub fn low(&self) -> &[f64] {
        &self.low
    }

    /// Per-dimension high bounds.
    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// Map an observation to its grid cell, one bin index per dimension.
    ///
    /// See the type-level precondition: out-of-bounds observations are not
    /// clamped.
    pub fn discretize(&self, observation: &[f64]) -> Vec<usize> {
        debug_assert_eq!(observation.len(), self.low.len());
        observation
            .iter()
            .zip(&self.low)
            .zip(&self.bin_width)
            .map(|((&x, &lo), &width)| ((x - lo) / width) as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2d() -> StateGrid {
        StateGrid::new(vec![-1.2, -0.07], vec![0.6, 0.07], 30).unwrap()
    }

    #[test]
    fn test_in_range_indices_stay_below_bins() {
        let grid = grid_2d();
        for &obs in &[[-1.2, -0.07], [-0.3, 0.0], [0.5999, 0.0699]] {
            let cell = grid.discretize(&obs);
            assert_eq!(cell.len(), 2);
            for &index in &cell {
                assert!(index <= grid.bins() - 1, "index {index} out of [0, bins-1]");
            }
        }
    }

    #[test]
    fn test_high_bound_maps_to_last_cell() {
        let grid = grid_2d();
        let cell = grid.discretize(&[0.6, 0.07]);
        assert_eq!(cell, vec![30, 30]);
        assert_eq!(grid.cells_per_dim(), 31);
    }

    #[test]
    fn test_low_bound_maps_to_first_cell() {
        let grid = grid_2d();
        assert_eq!(grid.discretize(&[-1.2, -0.07]), vec![0, 0]);
    }

    #[test]
    fn test_discretize_is_deterministic() {
        let grid = grid_2d();
        let obs = [-0.5, 0.01];
        assert_eq!(grid.discretize(&obs), grid.discretize(&obs));
    }

    #[test]
    fn test_above_high_is_not_clamped() {
        // Latent fragility preserved from the reference behavior: the index
        // is computed past the table edge rather than clamped.
        let grid = grid_2d();
        let cell = grid.discretize(&[0.7, 0.0]);
        assert!(cell[0] > grid.bins());
    }

    #[test]
    fn test_rejects_bad_bounds() {
        assert!(StateGrid::new(vec![], vec![], 10).is_err());
        assert!(StateGrid::new(vec![0.0], vec![1.0, 2.0], 10).is_err());
        assert!(StateGrid::new(vec![0.0], vec![1.0], 0).is_err());
        assert!(StateGrid::new(vec![1.0], vec![1.0], 10).is_err());
        assert!(StateGrid::new(vec![0.0], vec![f64::NAN], 10).is_err());
    }
}
