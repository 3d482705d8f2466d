//! Traits a model implements so external drivers and trainers can use it
//!
//! The kitchen sink does not train or batch by itself. Training loops,
//! optimizers, loss functions and parallel batch drivers live elsewhere and
//! talk to the model through these interfaces.

use rand::RngCore;

/// A single-sample predictor that batch drivers replicate across workers
pub trait Predictor: Send + Sync {
    /// Write the prediction for `input` into `output`
    ///
    /// Callers guarantee `input.len() == input_dim` and
    /// `output.len() == output_dim`.
    fn predict(&self, input: &[f64], output: &mut [f64]);
}

/// Produces independent predictor replicas for a batch driver
pub trait PredictorFactory: Send + Sync {
    type Predictor: Predictor;

    /// Create a predictor that can run alongside any other replica
    fn new_predictor(&self) -> Self::Predictor;
}

/// Work-chunking hints for batch drivers
pub trait BatchShape {
    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    /// Number of rows one predictor replica should handle at a time
    fn grain_size(&self) -> usize;
}

/// Maps a raw input onto the feature space a trainer optimizes over
pub trait Featurizer: Send + Sync {
    /// Number of features written per input
    fn n_features(&self) -> usize;

    /// Write the features of `input` into `features`
    fn featurize(&self, input: &[f64], features: &mut [f64]);
}

/// Prediction and loss gradient over a flat parameter vector
///
/// All slices are caller-owned. `featurized` is the output of the matching
/// [`Featurizer`].
pub trait LossDeriver: Send + Sync {
    /// Predict from an already featurized input
    fn predict(&self, parameters: &[f64], featurized: &[f64], pred_output: &mut [f64]);

    /// Compute dLoss/dParameter given dLoss/dPrediction
    fn deriv(
        &self,
        parameters: &[f64],
        featurized: &[f64],
        pred_output: &[f64],
        dloss_dpred: &[f64],
        dloss_dweight: &mut [f64],
    );
}

/// Structural properties a trainer may exploit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Prediction is a linear function of the parameters
    pub linear: bool,
    /// Loss is convex in the parameters whenever the loss itself is convex
    pub convex: bool,
}

/// Flat parameter surface used by optimizers
pub trait Parameterized {
    fn num_parameters(&self) -> usize;

    /// Copy the parameters into `buffer`
    ///
    /// # Panics
    /// Panics if `buffer.len() != num_parameters()`
    fn parameters_into(&self, buffer: &mut [f64]);

    /// Copy the parameters into a freshly allocated vector
    fn parameters(&self) -> Vec<f64> {
        let mut buffer = vec![0.0; self.num_parameters()];
        self.parameters_into(&mut buffer);
        buffer
    }

    /// Overwrite all parameters
    ///
    /// # Panics
    /// Panics if `parameters.len() != num_parameters()`
    fn set_parameters(&mut self, parameters: &[f64]);

    /// Overwrite every parameter with a standard normal draw
    fn randomize_parameters(&mut self, rng: &mut dyn RngCore);

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }
}

/// Marker: predictions are linear in the parameters
pub trait LinearInParameters: Parameterized {}

/// Marker: a convex loss stays convex in the parameters
pub trait ConvexInParameters: Parameterized {}
