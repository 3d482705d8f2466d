//! The random kitchen sink model
//!
//! A [`Sink`] owns three blocks of state:
//!
//! - a projection matrix (`n_features × input_dim`) drawn once from the
//!   kernel's spectral distribution,
//! - a phase vector (`n_features`) drawn once uniformly from [0, 2π),
//! - a weight matrix (`n_features × output_dim`), the only trainable part.
//!
//! The projections and phases are frozen for the lifetime of the model.
//! Re-randomizing the basis means building a new sink.

use crate::core::{
    BatchShape, Capabilities, ConvexInParameters, Featurizer, LinearInParameters, Parameterized,
    PredictorFactory, Result, SinkError, DEFAULT_GRAIN_SIZE,
};
use crate::feature::{featurize, featurize_into};
use crate::gradient::SinkLossDeriver;
use crate::kernel::KernelSpec;
use crate::predictor::{self, weight_view, BatchPredictor};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayViewMut1, Axis, Data, Ix2};
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Kernel approximation model: random Fourier features followed by a linear map
///
/// Deserialization goes through [`Sink::from_parts`], so a decoded sink
/// satisfies the same shape invariants as a freshly built one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SinkParts<K>")]
pub struct Sink<K: KernelSpec> {
    kernel: K,
    n_features: usize,
    input_dim: usize,
    output_dim: usize,
    grain_size: usize,
    /// Row i is the projection direction of feature i
    projections: Array2<f64>,
    /// Indexed by feature, then output
    weights: Array2<f64>,
    phases: Array1<f64>,
}

/// Serialized form of a [`Sink`] before its shapes are checked
#[derive(Deserialize)]
struct SinkParts<K> {
    kernel: K,
    n_features: usize,
    input_dim: usize,
    output_dim: usize,
    grain_size: usize,
    projections: Array2<f64>,
    weights: Array2<f64>,
    phases: Array1<f64>,
}

impl<K: KernelSpec> TryFrom<SinkParts<K>> for Sink<K> {
    type Error = SinkError;

    fn try_from(parts: SinkParts<K>) -> Result<Self> {
        let SinkParts {
            kernel,
            n_features,
            input_dim,
            output_dim,
            grain_size,
            projections,
            weights,
            phases,
        } = parts;
        if grain_size == 0 {
            return Err(SinkError::InvalidParameter(
                "grain size must be positive".to_string(),
            ));
        }
        let sink = Self::from_parts(kernel, projections, phases, weights)?;
        if sink.n_features != n_features {
            return Err(SinkError::dimension("feature", n_features, sink.n_features));
        }
        if sink.input_dim != input_dim {
            return Err(SinkError::dimension("input", input_dim, sink.input_dim));
        }
        if sink.output_dim != output_dim {
            return Err(SinkError::dimension("output", output_dim, sink.output_dim));
        }
        Ok(sink.with_grain_size(grain_size))
    }
}

impl<K: KernelSpec> Sink<K> {
    /// Create a sink, drawing its random structure from `rng`
    ///
    /// Weights start at zero.
    ///
    /// # Panics
    /// Panics if `n_features` is zero
    pub fn new(
        n_features: usize,
        kernel: K,
        input_dim: usize,
        output_dim: usize,
        rng: &mut dyn RngCore,
    ) -> Self {
        assert!(n_features > 0, "Number of features must be positive");

        let mut projections = Array2::zeros((n_features, input_dim));
        kernel.generate(n_features, input_dim, &mut projections, rng);

        let phases = Array1::from_shape_fn(n_features, |_| rng.random::<f64>() * TAU);

        debug!(
            "Created {} kernel sink: {} features, input dim {}, output dim {}",
            kernel.name(),
            n_features,
            input_dim,
            output_dim
        );

        Self {
            kernel,
            n_features,
            input_dim,
            output_dim,
            grain_size: DEFAULT_GRAIN_SIZE,
            projections,
            weights: Array2::zeros((n_features, output_dim)),
            phases,
        }
    }

    /// Create a sink whose random structure is reproducible from `seed`
    pub fn with_seed(
        n_features: usize,
        kernel: K,
        input_dim: usize,
        output_dim: usize,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(n_features, kernel, input_dim, output_dim, &mut rng)
    }

    /// Rebuild a sink from known projections, phases and weights
    pub fn from_parts(
        kernel: K,
        projections: Array2<f64>,
        phases: Array1<f64>,
        weights: Array2<f64>,
    ) -> Result<Self> {
        let (n_features, input_dim) = projections.dim();
        if n_features == 0 {
            return Err(SinkError::InvalidParameter(
                "number of features must be positive".to_string(),
            ));
        }
        if phases.len() != n_features {
            return Err(SinkError::dimension("phase", n_features, phases.len()));
        }
        if weights.nrows() != n_features {
            return Err(SinkError::dimension("weight row", n_features, weights.nrows()));
        }

        Ok(Self {
            kernel,
            n_features,
            input_dim,
            output_dim: weights.ncols(),
            grain_size: DEFAULT_GRAIN_SIZE,
            projections,
            weights,
            phases,
        })
    }

    /// Override the batch chunking hint
    ///
    /// # Panics
    /// Panics if `grain_size` is zero
    pub fn with_grain_size(mut self, grain_size: usize) -> Self {
        assert!(grain_size > 0, "Grain size must be positive");
        self.grain_size = grain_size;
        self
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn grain_size(&self) -> usize {
        self.grain_size
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn projections(&self) -> &Array2<f64> {
        &self.projections
    }

    pub fn phases(&self) -> &Array1<f64> {
        &self.phases
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Predict the output for `input` into a new vector
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut output = vec![0.0; self.output_dim];
        self.predict_into(input, &mut output)?;
        Ok(output)
    }

    /// Predict the output for `input` into `output`
    ///
    /// Returns [`SinkError::DimensionMismatch`] when either slice has the
    /// wrong length; `output` is left untouched in that case.
    pub fn predict_into(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        if input.len() != self.input_dim {
            warn!(
                "Rejected input of length {}, expected {}",
                input.len(),
                self.input_dim
            );
            return Err(SinkError::dimension("input", self.input_dim, input.len()));
        }
        if output.len() != self.output_dim {
            warn!(
                "Rejected output buffer of length {}, expected {}",
                output.len(),
                self.output_dim
            );
            return Err(SinkError::dimension("output", self.output_dim, output.len()));
        }
        predictor::predict(
            ArrayView1::from(input),
            self.projections.view(),
            self.phases.view(),
            self.weights.view(),
            ArrayViewMut1::from(output),
        );
        Ok(())
    }

    /// Predict every row of `inputs`
    ///
    /// Rows are processed in chunks of `grain_size`, each chunk by its own
    /// predictor replica. Runs on the calling thread.
    pub fn predict_batch<S>(
        &self,
        inputs: &ArrayBase<S, Ix2>,
        outputs: Option<Array2<f64>>,
    ) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let (n_rows, input_cols) = inputs.dim();
        if input_cols != self.input_dim {
            return Err(SinkError::dimension("input", self.input_dim, input_cols));
        }
        let mut outputs = match outputs {
            Some(outputs) => {
                if outputs.ncols() != self.output_dim {
                    return Err(SinkError::dimension(
                        "output",
                        self.output_dim,
                        outputs.ncols(),
                    ));
                }
                if outputs.nrows() != n_rows {
                    return Err(SinkError::dimension("output row", n_rows, outputs.nrows()));
                }
                outputs
            }
            None => Array2::zeros((n_rows, self.output_dim)),
        };

        debug!(
            "Batch predicting {} rows with grain size {}",
            n_rows, self.grain_size
        );

        let factory = self.batch_predictor();
        for (input_chunk, mut output_chunk) in inputs
            .axis_chunks_iter(Axis(0), self.grain_size)
            .zip(outputs.axis_chunks_iter_mut(Axis(0), self.grain_size))
        {
            let replica = factory.new_predictor();
            for (input, output) in input_chunk.rows().into_iter().zip(output_chunk.rows_mut()) {
                replica.predict_row(input, output);
            }
        }

        Ok(outputs)
    }

    /// Replicable predictor view for external batch drivers
    pub fn batch_predictor(&self) -> BatchPredictor<'_> {
        BatchPredictor::new(
            self.projections.view(),
            self.phases.view(),
            self.weights.view(),
        )
    }

    /// Compute the feature vector of `input` into a new vector
    pub fn feature_vector(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(SinkError::dimension("input", self.input_dim, input.len()));
        }
        let features = featurize(
            ArrayView1::from(input),
            self.projections.view(),
            self.phases.view(),
        );
        Ok(features.to_vec())
    }

    /// Featurizer handed to trainers
    ///
    /// Featurizing touches no mutable state, so the sink itself serves.
    pub fn new_featurizer(&self) -> &impl Featurizer {
        self
    }

    /// Loss deriver handed to trainers
    pub fn new_loss_deriver(&self) -> SinkLossDeriver {
        SinkLossDeriver::new(self.n_features, self.output_dim)
    }

    /// Monte Carlo estimate of K(x, y): the inner product of the two feature vectors
    pub fn approximate_kernel(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        let zx = Array1::from(self.feature_vector(x)?);
        let zy = Array1::from(self.feature_vector(y)?);
        Ok(zx.dot(&zy))
    }
}

impl<K: KernelSpec> Featurizer for Sink<K> {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn featurize(&self, input: &[f64], features: &mut [f64]) {
        featurize_into(
            ArrayView1::from(input),
            self.projections.view(),
            self.phases.view(),
            ArrayViewMut1::from(features),
        );
    }
}

impl<K: KernelSpec> BatchShape for Sink<K> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn grain_size(&self) -> usize {
        self.grain_size
    }
}

impl<K: KernelSpec> Parameterized for Sink<K> {
    fn num_parameters(&self) -> usize {
        self.n_features * self.output_dim
    }

    fn parameters_into(&self, buffer: &mut [f64]) {
        assert_eq!(
            buffer.len(),
            self.num_parameters(),
            "sink: parameter size mismatch"
        );
        for (slot, &weight) in buffer.iter_mut().zip(self.weights.iter()) {
            *slot = weight;
        }
    }

    fn set_parameters(&mut self, parameters: &[f64]) {
        let incoming = weight_view(parameters, self.n_features, self.output_dim);
        self.weights.assign(&incoming);
    }

    fn randomize_parameters(&mut self, rng: &mut dyn RngCore) {
        self.weights = Array2::random_using(self.weights.raw_dim(), StandardNormal, rng);
        debug!("Randomized {} sink weights", self.num_parameters());
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            linear: true,
            convex: true,
        }
    }
}

impl<K: KernelSpec> LinearInParameters for Sink<K> {}

impl<K: KernelSpec> ConvexInParameters for Sink<K> {}
