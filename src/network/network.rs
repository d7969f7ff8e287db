use rand::Rng;

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::snapshot::NetworkSnapshot;

/// Learning rate every freshly constructed network starts with.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Fully-connected input → hidden → output network with sigmoid activations,
/// trained by per-sample stochastic gradient descent.
///
/// The four parameter matrices are owned exclusively by the network; only
/// `train` and `deserialize` mutate them. A single instance must not be
/// shared across threads without external synchronization.
pub struct Network {
    input_nodes: usize,
    hidden_nodes: usize,
    output_nodes: usize,
    weights_ih: Matrix, // hidden × input
    weights_ho: Matrix, // output × hidden
    bias_h: Matrix,     // hidden × 1
    bias_o: Matrix,     // output × 1
    learning_rate: f64,
}

impl Network {
    /// Builds a network with weights and biases uniform in [-1, 1).
    ///
    /// All three layer sizes must be positive.
    pub fn new(input_nodes: usize, hidden_nodes: usize, output_nodes: usize) -> Network {
        Network::with_rng(input_nodes, hidden_nodes, output_nodes, &mut rand::thread_rng())
    }

    /// Like `new`, but samples the initial parameters from the given RNG.
    /// Two networks built from identically-seeded RNGs start identical.
    pub fn with_rng<R: Rng + ?Sized>(
        input_nodes: usize,
        hidden_nodes: usize,
        output_nodes: usize,
        rng: &mut R,
    ) -> Network {
        assert!(
            input_nodes > 0 && hidden_nodes > 0 && output_nodes > 0,
            "layer sizes must be positive"
        );

        Network {
            input_nodes,
            hidden_nodes,
            output_nodes,
            weights_ih: Matrix::random(hidden_nodes, input_nodes, rng),
            weights_ho: Matrix::random(output_nodes, hidden_nodes, rng),
            bias_h: Matrix::random(hidden_nodes, 1, rng),
            bias_o: Matrix::random(output_nodes, 1, rng),
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    /// Rebuilds a network wholesale from a snapshot.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Network {
        let mut network = Network {
            input_nodes: snapshot.input_nodes,
            hidden_nodes: snapshot.hidden_nodes,
            output_nodes: snapshot.output_nodes,
            weights_ih: Matrix::zeros(1, 1),
            weights_ho: Matrix::zeros(1, 1),
            bias_h: Matrix::zeros(1, 1),
            bias_o: Matrix::zeros(1, 1),
            learning_rate: DEFAULT_LEARNING_RATE,
        };
        network.deserialize(snapshot);
        network
    }

    pub fn input_nodes(&self) -> usize {
        self.input_nodes
    }

    pub fn hidden_nodes(&self) -> usize {
        self.hidden_nodes
    }

    pub fn output_nodes(&self) -> usize {
        self.output_nodes
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Replaces the learning rate unconditionally. No range check; a
    /// non-positive rate is the caller's problem.
    pub fn set_learning_rate(&mut self, rate: f64) {
        self.learning_rate = rate;
    }

    /// Forward pass: hidden = σ(W_ih·x + b_h), output = σ(W_ho·hidden + b_o).
    /// Read-only with respect to the network.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input_len(input)?;
        let (_, output) = self.forward(&Matrix::from_vec(input))?;
        Ok(output.to_vec())
    }

    /// Performs exactly one stochastic-gradient step on this (input, target)
    /// pair, mutating all four parameter matrices in place.
    ///
    /// The hidden-layer error is computed from `weights_ho` *after* the
    /// output-layer update has been applied. Snapshots produced under this
    /// ordering replay bit-for-bit only if it is preserved, so it is part of
    /// the training contract; see DESIGN.md before changing it.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        self.check_input_len(input)?;
        if target.len() != self.output_nodes {
            return Err(Error::ShapeMismatch {
                expected_rows: self.output_nodes,
                expected_cols: 1,
                got_rows: target.len(),
                got_cols: 1,
            });
        }

        let input = Matrix::from_vec(input);
        let target = Matrix::from_vec(target);
        let (hidden, output) = self.forward(&input)?;

        let output_error = Matrix::sub(&target, &output)?;

        // δ_o = output ⊙ (1 − output) ⊙ error ⊙ lr
        let mut output_gradient = output.map(sigmoid_derivative);
        output_gradient.hadamard(&output_error)?;
        output_gradient.scale(self.learning_rate);

        let weights_ho_delta = Matrix::matmul(&output_gradient, &hidden.transpose())?;
        self.weights_ho.add_matrix(&weights_ho_delta)?;
        self.bias_o.add_matrix(&output_gradient)?;

        // Reads the already-updated weights_ho; see the doc comment above.
        let hidden_error = Matrix::matmul(&self.weights_ho.transpose(), &output_error)?;

        // δ_h = hidden ⊙ (1 − hidden) ⊙ hidden_error ⊙ lr
        let mut hidden_gradient = hidden.map(sigmoid_derivative);
        hidden_gradient.hadamard(&hidden_error)?;
        hidden_gradient.scale(self.learning_rate);

        let weights_ih_delta = Matrix::matmul(&hidden_gradient, &input.transpose())?;
        self.weights_ih.add_matrix(&weights_ih_delta)?;
        self.bias_h.add_matrix(&hidden_gradient)?;

        Ok(())
    }

    /// Deep, independent copy of the full trainable state. Safe to hand to
    /// another thread or hold for later comparison while training continues.
    pub fn serialize(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            input_nodes: self.input_nodes,
            hidden_nodes: self.hidden_nodes,
            output_nodes: self.output_nodes,
            weights_ih: self.weights_ih.data.clone(),
            weights_ho: self.weights_ho.data.clone(),
            bias_h: self.bias_h.data.clone(),
            bias_o: self.bias_o.data.clone(),
            learning_rate: self.learning_rate,
        }
    }

    /// Replaces topology, parameters and learning rate wholesale from a
    /// snapshot. No cross-shape validation happens here: a self-inconsistent
    /// snapshot surfaces as `ShapeMismatch`/`DimensionMismatch` at the first
    /// `predict`/`train` that touches the offending matrices.
    pub fn deserialize(&mut self, snapshot: NetworkSnapshot) {
        self.input_nodes = snapshot.input_nodes;
        self.hidden_nodes = snapshot.hidden_nodes;
        self.output_nodes = snapshot.output_nodes;
        self.weights_ih = Matrix::from_data(snapshot.weights_ih);
        self.weights_ho = Matrix::from_data(snapshot.weights_ho);
        self.bias_h = Matrix::from_data(snapshot.bias_h);
        self.bias_o = Matrix::from_data(snapshot.bias_o);
        self.learning_rate = snapshot.learning_rate;
    }

    /// Returns (hidden, output) activations as column vectors.
    fn forward(&self, input: &Matrix) -> Result<(Matrix, Matrix)> {
        let mut hidden = Matrix::matmul(&self.weights_ih, input)?;
        hidden.add_matrix(&self.bias_h)?;
        hidden.map_in_place(sigmoid);

        let mut output = Matrix::matmul(&self.weights_ho, &hidden)?;
        output.add_matrix(&self.bias_o)?;
        output.map_in_place(sigmoid);

        Ok((hidden, output))
    }

    fn check_input_len(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_nodes {
            return Err(Error::ShapeMismatch {
                expected_rows: self.input_nodes,
                expected_cols: 1,
                got_rows: input.len(),
                got_cols: 1,
            });
        }
        Ok(())
    }
}
