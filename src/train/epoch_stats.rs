/// Per-epoch statistics produced by `train_loop`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean binary cross-entropy over every sample seen this epoch.
    pub loss: f64,
    /// Fraction of samples whose thresholded output (0.5) matched the label,
    /// measured on the fly during the epoch.
    pub accuracy: f64,
    pub elapsed_ms: u64,
}
