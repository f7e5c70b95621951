use crate::math::matrix::{Matrix, ShapeError};

/// Binary cross-entropy over a batch of sigmoid outputs.
pub struct BceLoss;

/// Predictions are clipped into `[EPS, 1 - EPS]` before taking logs.
pub const EPS: f64 = 1e-7;

fn clip(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

impl BceLoss {
    /// Scalar BCE: -mean(y·log(p) + (1-y)·log(1-p))
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64, ShapeError> {
        let n = predicted.data().len().max(1) as f64;
        let terms = predicted.zip_map(expected, |p, y| {
            let p = clip(p);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })?;
        Ok(terms.data().iter().sum::<f64>() / n)
    }

    /// ∂loss/∂p for every element: (p - y) / (p·(1 - p)) / n
    pub fn gradient(predicted: &Matrix, expected: &Matrix) -> Result<Matrix, ShapeError> {
        let n = predicted.data().len().max(1) as f64;
        predicted.zip_map(expected, |p, y| {
            let p = clip(p);
            (p - y) / (p * (1.0 - p)) / n
        })
    }
}
