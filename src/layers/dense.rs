use rand::Rng;

use crate::{activation::activation::ActivationFunction, math::matrix::{Matrix, ShapeError}};

/// A fully connected layer: `a = f(x·W + b)`.
///
/// `weights` is `input_size x size` so a batch of row vectors multiplies
/// straight through; `biases` is `1 x size`.
#[derive(Debug, Clone)]
pub struct Dense {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
}

/// Parameter gradients for one layer plus the gradient flowing to its input.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Matrix,
    pub input: Matrix,
}

impl Dense {
    /// Glorot-uniform weights, zero biases.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Dense {
        Dense {
            weights: Matrix::glorot_uniform(input_size, size, rng),
            biases: Matrix::zeros(1, size),
            activator: activation,
        }
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Returns `(z, a)`: the pre-activation and the activation for a batch.
    pub fn forward(&self, input: &Matrix) -> Result<(Matrix, Matrix), ShapeError> {
        let z = input.matmul(&self.weights)?.add_row(&self.biases)?;
        let a = z.map(|x| self.activator.function(x));
        Ok((z, a))
    }

    /// Backpropagates `grad_a` (∂L/∂a for this layer's output batch).
    ///
    /// `z` must be the pre-activation produced by `forward` on `input`.
    pub fn backward(
        &self,
        grad_a: &Matrix,
        z: &Matrix,
        input: &Matrix,
    ) -> Result<Gradients, ShapeError> {
        // δ = ∂L/∂a ⊙ f'(z)
        let delta = grad_a.zip_map(z, |g, x| g * self.activator.derivative(x))?;
        Ok(Gradients {
            weights: input.transpose().matmul(&delta)?,
            biases: delta.sum_rows(),
            input: delta.matmul(&self.weights.transpose())?,
        })
    }
}
