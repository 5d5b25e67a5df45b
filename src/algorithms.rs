// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Brute-force k-nearest-neighbors classification.
//!
//! Distances are computed against every training row (no spatial index).
//! Per-test-row distance computation is parallelized with rayon; the result
//! is identical to a sequential pass.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;

use crate::errors::ModelError;

/// Distance metric for nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// L2 distance.
    Euclidean,
    /// L-infinity distance (maximum absolute coordinate difference).
    Chebyshev,
}

impl Metric {
    pub fn distance(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        match self {
            Metric::Euclidean => {
                let squared_sum = ndarray::Zip::from(a).and(b).fold(0.0, |acc, &a_i, &b_i| {
                    let diff = a_i - b_i;
                    acc + diff * diff
                });
                squared_sum.sqrt()
            }
            Metric::Chebyshev => ndarray::Zip::from(a)
                .and(b)
                .fold(0.0, |acc: f64, &a_i, &b_i| acc.max((a_i - b_i).abs())),
        }
    }
}

impl FromStr for Metric {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(Metric::Euclidean),
            "chebyshev" => Ok(Metric::Chebyshev),
            other => Err(ModelError::UnknownMetric(other.to_string())),
        }
    }
}

pub struct KNNBuilder {
    k: usize,
    metric: Metric,
}

impl KNNBuilder {
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn build(self) -> KNN {
        KNN { x_train: None, y_train: None, k: self.k, metric: self.metric }
    }
}

/// Brute-force KNN classifier. One instance lives for a single fit/predict
/// cycle; it owns copies of the training block.
pub struct KNN {
    x_train: Option<Array2<f64>>,
    y_train: Option<Array1<f64>>,
    k: usize,
    metric: Metric,
}

impl KNN {
    pub fn new() -> KNNBuilder {
        KNNBuilder { k: 3, metric: Metric::Euclidean }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.ncols() == 0 {
            return Err(ModelError::NoFeatures);
        }
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.shape()[0] != y.shape()[0] {
            return Err(ModelError::DimensionMismatch {
                expected: x.shape()[0],
                actual: y.shape()[0],
            });
        }
        if self.k == 0 || self.k > x.shape()[0] {
            return Err(ModelError::InvalidNeighborCount { k: self.k, n_train: x.shape()[0] });
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.clone());
        Ok(())
    }

    /// Predicts a label for every row of `x` by majority vote among the `k`
    /// nearest training rows.
    ///
    /// Ties in distance are broken by original training-row order (stable
    /// sort). A tie in vote count is broken by the label of the nearest
    /// neighbor among the tied classes.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let x_train = self.x_train.as_ref().ok_or(ModelError::NotFitted)?;
        let y_train = self.y_train.as_ref().ok_or(ModelError::NotFitted)?;

        if x.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.ncols() != x_train.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: x_train.ncols(),
                actual: x.ncols(),
            });
        }

        // Rows are independent; the indexed collect keeps output order
        // identical to a sequential pass.
        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| self.vote(&x.row(i), x_train, y_train))
            .collect();
        Ok(Array1::from_vec(predictions))
    }

    fn vote(&self, row: &ArrayView1<f64>, x_train: &Array2<f64>, y_train: &Array1<f64>) -> f64 {
        let mut neighbors: Vec<(usize, f64)> = x_train
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(j, train_row)| (j, self.metric.distance(&train_row, row)))
            .collect();
        // Stable sort: equal distances keep training-row order.
        neighbors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        neighbors.truncate(self.k);

        let mut class_counts: HashMap<u64, usize> = HashMap::new();
        for &(idx, _) in &neighbors {
            *class_counts.entry(y_train[idx].to_bits()).or_insert(0) += 1;
        }
        let max_count = class_counts.values().copied().max().unwrap_or(0);

        // The first neighbor in distance order whose class reached the
        // maximum vote count wins; this settles even-k vote ties.
        for &(idx, _) in &neighbors {
            if class_counts[&y_train[idx].to_bits()] == max_count {
                return y_train[idx];
            }
        }
        unreachable!("fit guarantees k >= 1")
    }

    /// Fraction of predictions that exactly equal the true labels, computed
    /// as one minus the mismatch rate.
    pub fn calculate_accuracy(&self, predictions: &Array1<f64>, y_test: &Array1<f64>) -> f64 {
        let mismatches = predictions
            .iter()
            .zip(y_test.iter())
            .filter(|(&pred, &true_label)| pred != true_label)
            .count();
        1.0 - mismatches as f64 / predictions.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn metric_parses_from_str() {
        assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("chebyshev".parse::<Metric>().unwrap(), Metric::Chebyshev);
        assert!(matches!("manhattan".parse::<Metric>(), Err(ModelError::UnknownMetric(_))));
    }

    #[test]
    fn euclidean_distance() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        let d = Metric::Euclidean.distance(&a.view(), &b.view());
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn chebyshev_distance() {
        let a = array![1.0, 7.0];
        let b = array![4.0, 6.0];
        let d = Metric::Chebyshev.distance(&a.view(), &b.view());
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn metrics_agree_on_symmetric_differences() {
        // All coordinate differences equal in both axes: the neighbor
        // ordering is the same under L2 and L-infinity.
        let x = array![[0.0, 0.0], [4.0, 4.0]];
        let y = array![0.0, 1.0];
        let x_test = array![[1.0, 1.0]];

        for metric in [Metric::Euclidean, Metric::Chebyshev] {
            let mut knn = KNN::new().k(1).metric(metric).build();
            knn.fit(&x, &y).unwrap();
            let predictions = knn.predict(&x_test).unwrap();
            assert_eq!(predictions[0], 0.0);
        }
    }

    #[test]
    fn metrics_disagree_when_one_axis_dominates() {
        // From the origin: (3, 0) is closer under L2 (3 < ~3.54) but
        // (2.5, 2.5) is closer under L-infinity (2.5 < 3).
        let x = array![[3.0, 0.0], [2.5, 2.5]];
        let y = array![0.0, 1.0];
        let x_test = array![[0.0, 0.0]];

        let mut euclid = KNN::new().k(1).metric(Metric::Euclidean).build();
        euclid.fit(&x, &y).unwrap();
        assert_eq!(euclid.predict(&x_test).unwrap()[0], 0.0);

        let mut cheby = KNN::new().k(1).metric(Metric::Chebyshev).build();
        cheby.fit(&x, &y).unwrap();
        assert_eq!(cheby.predict(&x_test).unwrap()[0], 1.0);
    }

    #[test]
    fn majority_vote() {
        let x = array![[0.0, 0.0], [0.5, 0.0], [10.0, 10.0]];
        let y = array![0.0, 0.0, 1.0];
        let mut knn = KNN::new().k(3).build();
        knn.fit(&x, &y).unwrap();
        let predictions = knn.predict(&array![[0.2, 0.0]]).unwrap();
        assert_eq!(predictions[0], 0.0);
    }

    #[test]
    fn vote_tie_broken_by_nearest_neighbor() {
        // k=2 with one vote per class; the closer neighbor's label wins.
        let x = array![[1.0, 0.0], [3.0, 0.0]];
        let y = array![1.0, 0.0];
        let mut knn = KNN::new().k(2).build();
        knn.fit(&x, &y).unwrap();
        let predictions = knn.predict(&array![[0.0, 0.0]]).unwrap();
        assert_eq!(predictions[0], 1.0);
    }

    #[test]
    fn distance_tie_broken_by_train_row_order() {
        // Both training rows are equidistant from the query; the stable
        // sort keeps row 0 first, so its label is the nearest.
        let x = array![[0.0, 0.0], [2.0, 0.0]];
        let y = array![0.0, 1.0];
        let mut knn = KNN::new().k(1).build();
        knn.fit(&x, &y).unwrap();
        let predictions = knn.predict(&array![[1.0, 0.0]]).unwrap();
        assert_eq!(predictions[0], 0.0);
    }

    #[test]
    fn fit_empty_input() {
        let mut knn = KNN::new().build();
        let x: Array2<f64> = Array2::zeros((0, 2));
        let y: Array1<f64> = Array1::zeros(0);
        assert!(matches!(knn.fit(&x, &y), Err(ModelError::EmptyInput)));
    }

    #[test]
    fn fit_no_features() {
        let mut knn = KNN::new().build();
        let x: Array2<f64> = Array2::zeros((2, 0));
        let y = array![0.0, 1.0];
        assert!(matches!(knn.fit(&x, &y), Err(ModelError::NoFeatures)));
    }

    #[test]
    fn fit_dimension_mismatch() {
        let mut knn = KNN::new().build();
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![0.0, 1.0, 0.0];
        assert!(matches!(
            knn.fit(&x, &y),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn fit_invalid_k() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![0.0, 1.0];

        let mut too_large = KNN::new().k(5).build();
        assert!(matches!(
            too_large.fit(&x, &y),
            Err(ModelError::InvalidNeighborCount { k: 5, n_train: 2 })
        ));

        let mut zero = KNN::new().k(0).build();
        assert!(matches!(
            zero.fit(&x, &y),
            Err(ModelError::InvalidNeighborCount { k: 0, n_train: 2 })
        ));
    }

    #[test]
    fn predict_not_fitted() {
        let knn = KNN::new().build();
        let x = array![[1.0, 2.0]];
        assert!(matches!(knn.predict(&x), Err(ModelError::NotFitted)));
    }

    #[test]
    fn predict_dimension_mismatch() {
        let mut knn = KNN::new().k(1).build();
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![0.0, 1.0];
        knn.fit(&x, &y).unwrap();
        let x_test = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            knn.predict(&x_test),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn accuracy_counts_exact_matches() {
        let knn = KNN::new().k(1).build();
        let predictions = array![0.0, 1.0, 1.0, 0.0];
        let truth = array![0.0, 1.0, 0.0, 0.0];
        let accuracy = knn.calculate_accuracy(&predictions, &truth);
        assert!((accuracy - 0.75).abs() < 1e-12);
    }
}
