use rand::Rng;

use crate::math::matrix::Matrix;

/// Random placeholder training data: uniform features, coin-flip labels.
///
/// The labels carry no relation to the features, so a network fitted on
/// this set learns nothing beyond its initial weights' neighbourhood.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// `samples x features`, each entry in `[0, 1)`.
    pub inputs: Matrix,
    /// `samples x 1`, each entry `0.0` or `1.0`.
    pub labels: Matrix,
}

impl SyntheticDataset {
    pub fn generate<R: Rng + ?Sized>(samples: usize, features: usize, rng: &mut R) -> SyntheticDataset {
        let mut inputs = Matrix::zeros(samples, features);
        let mut labels = Matrix::zeros(samples, 1);
        for r in 0..samples {
            for c in 0..features {
                inputs.set(r, c, rng.gen::<f64>());
            }
            labels.set(r, 0, f64::from(rng.gen_range(0u8..2)));
        }
        SyntheticDataset { inputs, labels }
    }
}
