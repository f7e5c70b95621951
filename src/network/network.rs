use rand::Rng;

use crate::{
    activation::activation::ActivationFunction,
    error::{NnError, Result},
    layers::dense::{Dense, Gradients},
    math::matrix::Matrix,
};

#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Dense>,
}

/// Intermediate values kept from a training forward pass.
///
/// `inputs[i]` is what layer `i` consumed and `pre_activations[i]` its `z`.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    pub inputs: Vec<Matrix>,
    pub pre_activations: Vec<Matrix>,
    pub output: Matrix,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new<R: Rng + ?Sized>(
        layer_specs: Vec<(usize, usize, ActivationFunction)>,
        rng: &mut R,
    ) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Dense::new(size, input_size, activation, &mut *rng))
            .collect();
        Network { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Dense::input_size)
    }

    /// Inference forward pass over a batch; leaves the network untouched.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.forward(&current)?.1;
        }
        Ok(current)
    }

    /// Forward pass that keeps every layer's input and `z` for `backward`.
    pub fn forward_trace(&self, input: &Matrix) -> Result<ForwardTrace> {
        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut current = input.clone();
        for layer in &self.layers {
            let (z, a) = layer.forward(&current)?;
            inputs.push(current);
            pre_activations.push(z);
            current = a;
        }
        Ok(ForwardTrace { inputs, pre_activations, output: current })
    }

    /// Backpropagates `grad_output` (∂L/∂output) through the traced pass.
    /// Returns per-layer gradients in layer order.
    pub fn backward(&self, trace: &ForwardTrace, grad_output: Matrix) -> Result<Vec<Gradients>> {
        let mut grads = Vec::with_capacity(self.layers.len());
        let mut grad_a = grad_output;
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let g = layer.backward(&grad_a, &trace.pre_activations[i], &trace.inputs[i])?;
            grad_a = g.input.clone();
            grads.push(g);
        }
        grads.reverse();
        Ok(grads)
    }

    /// Runs a single sample through the network.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_size() {
            return Err(NnError::InputWidth { expected: self.input_size(), actual: input.len() });
        }
        Ok(self.forward(&Matrix::row(input))?.data().to_vec())
    }
}
