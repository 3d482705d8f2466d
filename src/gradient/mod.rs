//! Loss gradient with respect to the sink weights
//!
//! The prediction is `pred_j = Σ_i z_i * W_ij`, so `∂pred_j / ∂W_ij = z_i`
//! and the chain rule gives `∂L / ∂W_ij = z_i * ∂L / ∂pred_j`: the outer
//! product of the feature vector and the prediction gradient. No numerical
//! differentiation is involved.

use crate::core::LossDeriver;
use crate::predictor::{predict_featurized, weight_view};
use ndarray::linalg::general_mat_mul;
use ndarray::{ArrayView1, ArrayViewMut1, ArrayViewMut2, Axis};

/// Loss deriver over a flat row-major weight vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkLossDeriver {
    n_features: usize,
    output_dim: usize,
}

impl SinkLossDeriver {
    pub fn new(n_features: usize, output_dim: usize) -> Self {
        Self {
            n_features,
            output_dim,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }
}

impl LossDeriver for SinkLossDeriver {
    fn predict(&self, parameters: &[f64], featurized: &[f64], pred_output: &mut [f64]) {
        let weights = weight_view(parameters, self.n_features, self.output_dim);
        predict_featurized(
            ArrayView1::from(featurized),
            weights,
            ArrayViewMut1::from(pred_output),
        );
    }

    fn deriv(
        &self,
        parameters: &[f64],
        featurized: &[f64],
        _pred_output: &[f64],
        dloss_dpred: &[f64],
        dloss_dweight: &mut [f64],
    ) {
        assert_eq!(
            parameters.len(),
            self.n_features * self.output_dim,
            "sink: parameter size mismatch"
        );
        assert_eq!(
            dloss_dweight.len(),
            parameters.len(),
            "sink: gradient size mismatch"
        );
        assert_eq!(
            featurized.len(),
            self.n_features,
            "sink: feature length mismatch"
        );
        assert_eq!(
            dloss_dpred.len(),
            self.output_dim,
            "sink: prediction gradient length mismatch"
        );
        let shape = (self.n_features, self.output_dim);
        let gradient = match ArrayViewMut2::from_shape(shape, dloss_dweight) {
            Ok(view) => view,
            Err(e) => panic!("sink: gradient size mismatch: {e}"),
        };
        outer_product_into(
            ArrayView1::from(featurized),
            ArrayView1::from(dloss_dpred),
            gradient,
        );
    }
}

/// `out[[i, j]] = features[i] * dloss_dpred[j]`
///
/// # Panics
/// Panics if `out` is not `features.len() × dloss_dpred.len()`
pub fn outer_product_into(
    features: ArrayView1<'_, f64>,
    dloss_dpred: ArrayView1<'_, f64>,
    mut out: ArrayViewMut2<'_, f64>,
) {
    assert_eq!(
        out.dim(),
        (features.len(), dloss_dpred.len()),
        "Gradient matrix must be n_features x output_dim"
    );
    let column = features.insert_axis(Axis(1));
    let row = dloss_dpred.insert_axis(Axis(0));
    out.fill(0.0);
    general_mat_mul(1.0, &column, &row, 0.0, &mut out);
}
