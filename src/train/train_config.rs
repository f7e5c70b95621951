/// Hyperparameters for a `train_loop` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Reshuffle sample order at the start of every epoch.
    pub shuffle: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig { epochs, batch_size, learning_rate, shuffle: true }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(5, 32, 0.001)
    }
}
