use std::time::Instant;

use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::error::{NnError, Result};
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::adam::Adam;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Fits `network` to `inputs`/`labels` with mini-batch Adam on binary
/// cross-entropy and returns one `EpochStats` per completed epoch.
///
/// `inputs` is `samples x features`, `labels` is `samples x outputs`.
/// `rng` drives the per-epoch shuffle.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &Matrix,
    labels: &Matrix,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    if inputs.rows == 0 {
        return Err(NnError::EmptyDataset);
    }
    if inputs.rows != labels.rows {
        return Err(NnError::LengthMismatch { inputs: inputs.rows, labels: labels.rows });
    }
    if config.batch_size == 0 {
        return Err(NnError::ZeroBatch);
    }

    let mut optimizer = Adam::new(config.learning_rate);
    let mut indices: Vec<usize> = (0..inputs.rows).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            indices.shuffle(rng);
        }

        let (loss, accuracy) = run_one_epoch(
            network,
            inputs,
            labels,
            &indices,
            config.batch_size,
            &mut optimizer,
        )?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            "epoch {}/{}: loss={:.4} accuracy={:.4} ({} ms)",
            stats.epoch, stats.total_epochs, stats.loss, stats.accuracy, stats.elapsed_ms
        );
        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over the data in `indices` order.
/// Returns (mean loss, accuracy), each weighted by batch size.
fn run_one_epoch(
    network: &mut Network,
    inputs: &Matrix,
    labels: &Matrix,
    indices: &[usize],
    batch_size: usize,
    optimizer: &mut Adam,
) -> Result<(f64, f64)> {
    let n = indices.len();
    let mut total_loss = 0.0;
    let mut correct = 0usize;

    for batch in indices.chunks(batch_size) {
        let x = inputs.select_rows(batch);
        let y = labels.select_rows(batch);

        let trace = network.forward_trace(&x)?;
        total_loss += BceLoss::loss(&trace.output, &y)? * batch.len() as f64;
        correct += count_correct(&trace.output, &y);

        let grad_output = BceLoss::gradient(&trace.output, &y)?;
        let grads = network.backward(&trace, grad_output)?;
        optimizer.step(&mut network.layers, &grads)?;
    }

    Ok((total_loss / n as f64, correct as f64 / n as f64))
}

/// Rows whose every output, thresholded at 0.5, equals the label.
fn count_correct(predicted: &Matrix, expected: &Matrix) -> usize {
    (0..predicted.rows)
        .filter(|&r| {
            predicted.row_slice(r).iter().zip(expected.row_slice(r))
                .all(|(p, y)| (if *p > 0.5 { 1.0 } else { 0.0 }) == *y)
        })
        .count()
}
