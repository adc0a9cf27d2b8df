//! K-nearest-neighbors imputation of missing feature values.
//!
//! [`KnnImputer::fit`] learns from a training matrix only and produces a
//! [`FittedKnnImputer`]; applying the fitted object to the test matrix
//! never re-fits, so no test-set information leaks into the imputation
//! statistics.
//!
//! Estimation policy per missing cell:
//! 1. Candidate donors are the fit rows where that column is observed.
//! 2. Distance to each donor is NaN-aware euclidean: squared differences
//!    over the mutually observed coordinates, scaled by
//!    `n_cols / n_observed`. Donors sharing no observed coordinate are
//!    excluded.
//! 3. The `k` nearest donors vote with uniform or inverse-distance
//!    weights ([`Weighting`]).
//! 4. With no eligible donor, the fit-time column mean is used.
//!
//! Columns with zero observed values at fit time cannot be imputed and
//! are dropped from the fitted object's output.

use crate::error::{PipelineError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Neighbor weighting scheme for the imputed estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Every neighbor contributes equally.
    Uniform,
    /// Neighbors are weighted by inverse distance; exact matches
    /// (distance zero) dominate.
    Distance,
}

/// Tunable imputation parameters, carried in the stage configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImputerParams {
    pub n_neighbors: usize,
    pub weights: Weighting,
}

impl Default for ImputerParams {
    fn default() -> Self {
        Self {
            n_neighbors: 3,
            weights: Weighting::Uniform,
        }
    }
}

/// Unfitted imputer: parameters only.
#[derive(Debug, Clone)]
pub struct KnnImputer {
    params: ImputerParams,
}

impl KnnImputer {
    pub fn new(params: ImputerParams) -> Self {
        Self { params }
    }

    /// Learn imputation state from the training features.
    ///
    /// # Errors
    /// Returns a schema error if `n_neighbors` is zero or the matrix has
    /// no rows.
    pub fn fit(&self, x: &Array2<f64>) -> Result<FittedKnnImputer> {
        if self.params.n_neighbors == 0 {
            return Err(PipelineError::Schema("n_neighbors must be at least 1".into()));
        }
        if x.nrows() == 0 {
            return Err(PipelineError::Schema(
                "cannot fit imputer on an empty matrix".into(),
            ));
        }

        let n_features_in = x.ncols();
        let mut kept = Vec::new();
        let mut col_means = Vec::new();
        for (j, col) in x.axis_iter(Axis(1)).enumerate() {
            let observed: Vec<f64> = col.iter().copied().filter(|v| !v.is_nan()).collect();
            if observed.is_empty() {
                continue;
            }
            kept.push(j);
            col_means.push(observed.iter().sum::<f64>() / observed.len() as f64);
        }

        let fit_data = x.select(Axis(1), &kept);
        Ok(FittedKnnImputer {
            params: self.params,
            fit_data,
            col_means,
            kept,
            n_features_in,
        })
    }
}

/// Imputation state learned from training features.
///
/// Serializable, so the fitted object can be persisted alongside the
/// transformed arrays and reloaded by a serving stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedKnnImputer {
    params: ImputerParams,
    /// Training matrix restricted to the kept columns.
    fit_data: Array2<f64>,
    /// Observed mean per kept column, the no-donor fallback.
    col_means: Vec<f64>,
    /// Indices into the fit input of columns with at least one observed
    /// value.
    kept: Vec<usize>,
    n_features_in: usize,
}

impl FittedKnnImputer {
    /// Column count the fitted object expects as input.
    pub fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    /// Column count of the transformed output (all-missing fit columns
    /// are dropped).
    pub fn n_features_out(&self) -> usize {
        self.kept.len()
    }

    /// Impute every missing cell of `x`.
    ///
    /// # Errors
    /// Returns a schema error if `x` does not have the column count seen
    /// at fit time.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features_in {
            return Err(PipelineError::Schema(format!(
                "imputer was fit on {} columns, got {}",
                self.n_features_in,
                x.ncols()
            )));
        }

        let mut out = x.select(Axis(1), &self.kept);
        for i in 0..out.nrows() {
            let query = out.row(i).to_owned();
            for j in 0..out.ncols() {
                if out[[i, j]].is_nan() {
                    out[[i, j]] = self.estimate(query.view(), j);
                }
            }
        }
        Ok(out)
    }

    /// Estimate one missing cell from the k nearest donors.
    fn estimate(&self, query: ArrayView1<'_, f64>, col: usize) -> f64 {
        let mut donors: Vec<(f64, f64)> = Vec::new();
        for row in self.fit_data.rows() {
            let value = row[col];
            if value.is_nan() {
                continue;
            }
            if let Some(dist) = nan_euclidean(query, row) {
                donors.push((dist, value));
            }
        }
        if donors.is_empty() {
            return self.col_means[col];
        }

        donors.sort_by(|a, b| a.0.total_cmp(&b.0));
        donors.truncate(self.params.n_neighbors);

        match self.params.weights {
            Weighting::Uniform => {
                donors.iter().map(|(_, v)| v).sum::<f64>() / donors.len() as f64
            }
            Weighting::Distance => {
                // Exact matches would get infinite weight; let them decide
                // alone instead.
                let exact: Vec<f64> = donors
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, v)| *v)
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().sum::<f64>() / exact.len() as f64;
                }
                let total: f64 = donors.iter().map(|(d, _)| 1.0 / d).sum();
                donors.iter().map(|(d, v)| v / d).sum::<f64>() / total
            }
        }
    }
}

/// Euclidean distance over mutually observed coordinates, scaled by the
/// fraction observed. `None` when the rows share no observed coordinate.
fn nan_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Option<f64> {
    let n_cols = a.len();
    let mut sum_sq = 0.0;
    let mut n_common = 0usize;
    for (x, y) in a.iter().zip(b.iter()) {
        if x.is_nan() || y.is_nan() {
            continue;
        }
        sum_sq += (x - y) * (x - y);
        n_common += 1;
    }
    if n_common == 0 {
        None
    } else {
        Some((sum_sq * n_cols as f64 / n_common as f64).sqrt())
    }
}
