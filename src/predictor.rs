use log::info;
use rand::Rng;

use crate::{
    activation::activation::ActivationFunction::{ReLU, Sigmoid},
    config::ModelConfig,
    data::synthetic::SyntheticDataset,
    error::{NnError, Result},
    network::network::Network,
    train::{epoch_stats::EpochStats, loop_fn::train_loop},
};

/// The placeholder scorer behind `POST /predict`.
///
/// Built and fitted once at startup, then only read. Holds a
/// `features -> 16 -> 8 -> 1` network (ReLU, ReLU, sigmoid) fitted on
/// random data, so its scores are stable within a process and meaningless
/// across restarts.
#[derive(Debug, Clone)]
pub struct Predictor {
    network: Network,
    history: Vec<EpochStats>,
}

impl Predictor {
    /// Builds and fits a predictor using the thread-local RNG.
    pub fn bootstrap(config: &ModelConfig) -> Result<Predictor> {
        Predictor::bootstrap_with_rng(config, &mut rand::thread_rng())
    }

    /// Builds and fits a predictor drawing weights, data and shuffles from `rng`.
    pub fn bootstrap_with_rng<R: Rng + ?Sized>(config: &ModelConfig, rng: &mut R) -> Result<Predictor> {
        config.validate()?;

        let mut network = Network::new(
            vec![
                (16, config.features, ReLU),
                (8, 16, ReLU),
                (1, 8, Sigmoid),
            ],
            rng,
        );
        let dataset = SyntheticDataset::generate(config.samples, config.features, rng);
        let history = train_loop(
            &mut network,
            &dataset.inputs,
            &dataset.labels,
            &config.train_config(),
            rng,
        )?;

        if let Some(last) = history.last() {
            info!(
                "fitted placeholder model on {} synthetic samples: loss={:.4} accuracy={:.4}",
                dataset.inputs.rows, last.loss, last.accuracy
            );
        }

        Ok(Predictor { network, history })
    }

    pub fn input_size(&self) -> usize {
        self.network.input_size()
    }

    /// Per-epoch stats from the startup fit.
    pub fn history(&self) -> &[EpochStats] {
        &self.history
    }

    /// Scores a single sample; the result is the sigmoid output in `[0, 1]`.
    ///
    /// Inputs large enough to overflow the forward pass yield `NonFinite`
    /// rather than a NaN score.
    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        let score = self.network.predict(input)?[0];
        if !score.is_finite() {
            return Err(NnError::NonFinite(score));
        }
        Ok(score)
    }
}
