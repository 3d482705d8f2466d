//! Random Fourier feature map
//!
//! z_i(x) = sqrt(2 / D) * cos(w_i · x + b_i)
//!
//! where D is the number of features, w_i the i-th projection row and b_i a
//! phase drawn uniformly from [0, 2π). The inner product z(x) · z(y) is an
//! unbiased estimate of the kernel K(x, y) the projections were drawn for.

use ndarray::{Array1, ArrayView1, ArrayView2, ArrayViewMut1, Zip};

/// Normalization constant sqrt(2 / n_features)
pub fn normalization(n_features: usize) -> f64 {
    (2.0 / n_features as f64).sqrt()
}

/// Value of a single feature
pub fn compute_feature(
    input: ArrayView1<'_, f64>,
    projection: ArrayView1<'_, f64>,
    phase: f64,
    normalization: f64,
) -> f64 {
    normalization * (projection.dot(&input) + phase).cos()
}

/// Write the full feature vector of `input` into `features`
///
/// Panics if `input` does not have one entry per projection column, or if
/// `phases` and `features` do not have one entry per projection row.
pub fn featurize_into(
    input: ArrayView1<'_, f64>,
    projections: ArrayView2<'_, f64>,
    phases: ArrayView1<'_, f64>,
    features: ArrayViewMut1<'_, f64>,
) {
    assert_eq!(
        input.len(),
        projections.ncols(),
        "Input length must equal the projection width"
    );
    let norm = normalization(projections.nrows());
    Zip::from(features)
        .and(projections.rows())
        .and(phases)
        .for_each(|feature, projection, &phase| {
            *feature = compute_feature(input, projection, phase, norm);
        });
}

/// Allocating variant of [`featurize_into`]
pub fn featurize(
    input: ArrayView1<'_, f64>,
    projections: ArrayView2<'_, f64>,
    phases: ArrayView1<'_, f64>,
) -> Array1<f64> {
    let mut features = Array1::zeros(projections.nrows());
    featurize_into(input, projections, phases, features.view_mut());
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalization() {
        assert_abs_diff_eq!(normalization(2), 1.0);
        assert_abs_diff_eq!(normalization(8), 0.5);
    }

    #[test]
    fn test_compute_feature() {
        // dot = 1*2 + 1*(-1) = 1, cos(1 + π - 1) = -1
        let value = compute_feature(
            array![1.0, 1.0].view(),
            array![2.0, -1.0].view(),
            PI - 1.0,
            0.5,
        );
        assert_abs_diff_eq!(value, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_featurize_into() {
        let projections = array![[1.0], [0.0]];
        let phases = array![0.0, FRAC_PI_2];
        let mut features = Array1::from_elem(2, f64::NAN);
        featurize_into(
            array![0.0].view(),
            projections.view(),
            phases.view(),
            features.view_mut(),
        );
        assert_abs_diff_eq!(features[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(features[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_features_are_bounded() {
        let projections = array![[3.0, -1.0], [0.5, 2.0], [-7.0, 1.0], [0.0, 4.0]];
        let phases = array![0.1, 1.2, 2.3, 3.4];
        let features = featurize(array![0.7, -2.5].view(), projections.view(), phases.view());
        let bound = normalization(4);
        assert!(features.iter().all(|f| f.abs() <= bound + 1e-12));
    }

    #[test]
    fn test_zero_width_projections_keep_every_row() {
        // With no input columns every w_i · x is 0, so z_i = norm * cos(b_i).
        let projections = Array2::<f64>::zeros((3, 0));
        let phases = array![0.0, FRAC_PI_2, PI];
        let features = featurize(ArrayView1::from(&[][..]), projections.view(), phases.view());
        let norm = normalization(3);
        assert_eq!(features.len(), 3);
        assert_abs_diff_eq!(features[0], norm, epsilon = 1e-12);
        assert_abs_diff_eq!(features[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(features[2], -norm, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "Input length must equal the projection width")]
    fn test_featurize_rejects_wrong_input_length() {
        let projections = array![[1.0, 2.0]];
        featurize(array![1.0].view(), projections.view(), array![0.0].view());
    }
}
