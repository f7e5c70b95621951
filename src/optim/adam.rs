use crate::{
    error::Result,
    layers::dense::{Dense, Gradients},
    math::matrix::Matrix,
};

/// First and second moment estimates for one parameter matrix.
#[derive(Debug, Clone)]
struct Moments {
    m: Matrix,
    v: Matrix,
}

impl Moments {
    fn zeros_like(param: &Matrix) -> Moments {
        Moments {
            m: Matrix::zeros(param.rows, param.cols),
            v: Matrix::zeros(param.rows, param.cols),
        }
    }
}

/// Adam with bias-corrected step size.
///
/// Moment buffers are created lazily on the first `step`, one pair per
/// weight and bias matrix, so the same optimizer must keep stepping the same
/// layer stack.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    iterations: u64,
    moments: Vec<(Moments, Moments)>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            iterations: 0,
            moments: Vec::new(),
        }
    }

    /// Applies one update to every layer from its matching gradients.
    pub fn step(&mut self, layers: &mut [Dense], grads: &[Gradients]) -> Result<()> {
        if self.moments.len() != layers.len() {
            self.moments = layers.iter()
                .map(|l| (Moments::zeros_like(&l.weights), Moments::zeros_like(&l.biases)))
                .collect();
        }

        self.iterations += 1;
        let t = self.iterations as f64;
        let lr_t = self.learning_rate * (1.0 - self.beta2.powf(t)).sqrt() / (1.0 - self.beta1.powf(t));

        let betas = (self.beta1, self.beta2);
        for ((layer, grad), (mw, mb)) in layers.iter_mut().zip(grads).zip(self.moments.iter_mut()) {
            layer.weights = update(&layer.weights, &grad.weights, mw, betas, self.epsilon, lr_t)?;
            layer.biases = update(&layer.biases, &grad.biases, mb, betas, self.epsilon, lr_t)?;
        }
        Ok(())
    }
}

fn update(
    param: &Matrix,
    grad: &Matrix,
    moments: &mut Moments,
    (b1, b2): (f64, f64),
    eps: f64,
    lr_t: f64,
) -> Result<Matrix> {
    moments.m = moments.m.zip_map(grad, |m, g| b1 * m + (1.0 - b1) * g)?;
    moments.v = moments.v.zip_map(grad, |v, g| b2 * v + (1.0 - b2) * g * g)?;
    let step = moments.m.zip_map(&moments.v, |m, v| lr_t * m / (v.sqrt() + eps))?;
    Ok(param.zip_map(&step, |p, s| p - s)?)
}
