//! Linear predictor over random features
//!
//! The prediction is a dense matrix-vector product `out = Wᵀ z`, where `W` is
//! the `n_features × output_dim` weight matrix and `z` the feature vector.
//! Flat parameter vectors hold `W` in row-major order, so entry `(i, j)`
//! lives at index `i * output_dim + j`.

use crate::core::{Predictor, PredictorFactory};
use crate::feature::{compute_feature, normalization};
use ndarray::linalg::general_mat_vec_mul;
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1, Zip};

/// View a flat row-major parameter vector as the `n_features × output_dim` weight matrix
///
/// # Panics
/// Panics if `parameters.len() != n_features * output_dim`
pub fn weight_view(
    parameters: &[f64],
    n_features: usize,
    output_dim: usize,
) -> ArrayView2<'_, f64> {
    assert_eq!(
        parameters.len(),
        n_features * output_dim,
        "sink: parameter size mismatch"
    );
    match ArrayView2::from_shape((n_features, output_dim), parameters) {
        Ok(view) => view,
        Err(e) => panic!("sink: parameter size mismatch: {e}"),
    }
}

/// Predict from an already computed feature vector
///
/// # Panics
/// Panics if `weights` is not `featurized.len() × output.len()`
pub fn predict_featurized(
    featurized: ArrayView1<'_, f64>,
    weights: ArrayView2<'_, f64>,
    mut output: ArrayViewMut1<'_, f64>,
) {
    assert_eq!(
        weights.dim(),
        (featurized.len(), output.len()),
        "Weight matrix must be n_features x output_dim"
    );
    output.fill(0.0);
    general_mat_vec_mul(1.0, &weights.t(), &featurized, 0.0, &mut output);
}

/// Full prediction: feature map then linear predictor, without allocating
///
/// # Panics
/// Panics if any dimension disagrees with the projection matrix
pub fn predict(
    input: ArrayView1<'_, f64>,
    projections: ArrayView2<'_, f64>,
    phases: ArrayView1<'_, f64>,
    weights: ArrayView2<'_, f64>,
    mut output: ArrayViewMut1<'_, f64>,
) {
    assert_eq!(
        input.len(),
        projections.ncols(),
        "Input length must equal the projection width"
    );
    assert_eq!(
        weights.dim(),
        (projections.nrows(), output.len()),
        "Weight matrix must be n_features x output_dim"
    );
    output.fill(0.0);
    let norm = normalization(projections.nrows());
    Zip::from(projections.rows())
        .and(phases)
        .and(weights.rows())
        .for_each(|projection, &phase, weight_row| {
            let z = compute_feature(input, projection, phase, norm);
            output.scaled_add(z, &weight_row);
        });
}

/// Read-only view of a sink's random structure and weights
///
/// Prediction needs no scratch memory, so a replica is just another copy of
/// the same borrowed view and replicas can run on any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct BatchPredictor<'a> {
    projections: ArrayView2<'a, f64>,
    phases: ArrayView1<'a, f64>,
    weights: ArrayView2<'a, f64>,
}

impl<'a> BatchPredictor<'a> {
    pub(crate) fn new(
        projections: ArrayView2<'a, f64>,
        phases: ArrayView1<'a, f64>,
        weights: ArrayView2<'a, f64>,
    ) -> Self {
        Self {
            projections,
            phases,
            weights,
        }
    }

    /// Predict one row of a batch
    pub fn predict_row(&self, input: ArrayView1<'_, f64>, output: ArrayViewMut1<'_, f64>) {
        predict(input, self.projections, self.phases, self.weights, output);
    }
}

impl PredictorFactory for BatchPredictor<'_> {
    type Predictor = Self;

    fn new_predictor(&self) -> Self {
        *self
    }
}

impl Predictor for BatchPredictor<'_> {
    fn predict(&self, input: &[f64], output: &mut [f64]) {
        self.predict_row(ArrayView1::from(input), ArrayViewMut1::from(output));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::featurize;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_predict_featurized() {
        // z = [1, 2], W = [[1, 0, -1], [0.5, 2, 1]]
        let weights = [1.0, 0.0, -1.0, 0.5, 2.0, 1.0];
        let mut output = Array1::from_elem(3, 9.0);
        predict_featurized(
            array![1.0, 2.0].view(),
            weight_view(&weights, 2, 3),
            output.view_mut(),
        );
        assert_eq!(output, array![2.0, 4.0, 1.0]);
    }

    #[test]
    fn test_full_and_featurized_paths_agree() {
        let projections = array![[0.3, -1.2], [2.0, 0.1], [-0.4, 0.9]];
        let phases = array![0.5, 4.0, 2.2];
        let weights = array![[1.0, -2.0], [0.5, 0.25], [3.0, -1.0]];
        let input = array![0.8, -0.3];

        let mut full = Array1::zeros(2);
        predict(
            input.view(),
            projections.view(),
            phases.view(),
            weights.view(),
            full.view_mut(),
        );

        let features = featurize(input.view(), projections.view(), phases.view());
        let mut featurized = Array1::zeros(2);
        predict_featurized(features.view(), weights.view(), featurized.view_mut());

        for (a, b) in full.iter().zip(&featurized) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_weight_view_is_row_major() {
        let params = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view = weight_view(&params, 3, 2);
        assert_eq!(view[[1, 0]], 3.0);
        assert_eq!(view[[2, 1]], 6.0);
    }

    #[test]
    #[should_panic(expected = "sink: parameter size mismatch")]
    fn test_weight_view_rejects_short_parameters() {
        weight_view(&[1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    #[should_panic(expected = "Weight matrix must be n_features x output_dim")]
    fn test_predict_featurized_rejects_mismatched_features() {
        let weights = array![[1.0], [2.0]];
        let mut output = Array1::zeros(1);
        predict_featurized(array![1.0, 2.0, 3.0].view(), weights.view(), output.view_mut());
    }

    #[test]
    fn test_replicas_predict_identically() {
        let projections = array![[1.0], [-0.5]];
        let phases = array![0.0, 1.0];
        let weights = array![[2.0], [3.0]];
        let factory = BatchPredictor::new(projections.view(), phases.view(), weights.view());

        let first = factory.new_predictor();
        let second = factory.new_predictor();
        let mut a = [0.0];
        let mut b = [0.0];
        first.predict(&[0.4], &mut a);
        second.predict(&[0.4], &mut b);
        assert_eq!(a, b);
    }
}
