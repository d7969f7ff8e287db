use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;

use crate::error::Result;
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// One ordered pass over the dataset: one SGD step per (input, target) pair.
/// Returns the mean MSE measured on each sample's pre-update output.
///
/// # Panics
/// Panics if `inputs` is empty or the slice lengths differ.
pub fn train_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> Result<f64> {
    assert!(!inputs.is_empty(), "inputs must not be empty");
    assert_eq!(
        inputs.len(),
        targets.len(),
        "inputs and targets must have equal length"
    );

    let mut total_loss = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        let output = network.predict(input)?;
        total_loss += MseLoss::loss(&output, target);
        network.train(input, target)?;
    }
    Ok(total_loss / inputs.len() as f64)
}

/// Mean MSE over a dataset without touching the network.
pub fn evaluate(network: &Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
    assert_eq!(
        inputs.len(),
        targets.len(),
        "inputs and targets must have equal length"
    );

    if inputs.is_empty() {
        return Ok(0.0);
    }

    let mut total_loss = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        let output = network.predict(input)?;
        total_loss += MseLoss::loss(&output, target);
    }
    Ok(total_loss / inputs.len() as f64)
}

/// Trains `network` for `config.epochs` epochs and returns the mean training
/// loss of the last completed epoch. Sample order is reshuffled each epoch.
///
/// The loop breaks early if the `progress_tx` receiver has been dropped, or
/// if `config.stop_flag` is set to `true` from another thread.
///
/// # Panics
/// Panics if `inputs` is empty or the slice lengths differ.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    assert!(!inputs.is_empty(), "inputs must not be empty");
    assert_eq!(
        inputs.len(),
        targets.len(),
        "inputs and targets must have equal length"
    );

    let mut last_train_loss = 0.0;
    let mut indices: Vec<usize> = (0..inputs.len()).collect();

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();

        indices.shuffle(&mut rand::thread_rng());

        let mut total_loss = 0.0;
        for &idx in &indices {
            let output = network.predict(&inputs[idx])?;
            total_loss += MseLoss::loss(&output, &targets[idx]);
            network.train(&inputs[idx], &targets[idx])?;
        }
        let train_loss = total_loss / inputs.len() as f64;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                train_loss,
                elapsed_ms,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_train_loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn or_dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (
            vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
            ],
            vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]],
        )
    }

    #[test]
    fn epochs_reduce_loss_on_or() {
        let mut net = Network::with_rng(2, 4, 1, &mut StdRng::seed_from_u64(20));
        let (inputs, targets) = or_dataset();

        let initial = evaluate(&net, &inputs, &targets).unwrap();
        for _ in 0..5_000 {
            train_epoch(&mut net, &inputs, &targets).unwrap();
        }
        let trained = evaluate(&net, &inputs, &targets).unwrap();

        assert!(
            trained < initial,
            "loss did not drop: {initial} -> {trained}"
        );
        assert!(trained < 0.05, "final loss too high: {trained}");
    }

    #[test]
    fn train_loop_emits_one_stats_per_epoch() {
        let mut net = Network::with_rng(2, 3, 1, &mut StdRng::seed_from_u64(21));
        let (inputs, targets) = or_dataset();

        let (tx, rx) = mpsc::channel();
        let config = TrainConfig {
            epochs: 5,
            progress_tx: Some(tx),
            stop_flag: None,
        };

        train_loop(&mut net, &inputs, &targets, &config).unwrap();
        drop(config);

        let stats: Vec<_> = rx.iter().collect();
        assert_eq!(stats.len(), 5);
        assert_eq!(stats[0].epoch, 1);
        assert_eq!(stats[4].epoch, 5);
        assert!(stats.iter().all(|s| s.total_epochs == 5));
    }

    #[test]
    fn train_loop_honors_stop_flag() {
        let mut net = Network::with_rng(2, 3, 1, &mut StdRng::seed_from_u64(22));
        let (inputs, targets) = or_dataset();

        let flag = Arc::new(AtomicBool::new(true));
        let config = TrainConfig {
            epochs: 1_000_000,
            progress_tx: None,
            stop_flag: Some(flag),
        };

        let before = net.serialize();
        let loss = train_loop(&mut net, &inputs, &targets, &config).unwrap();

        // Pre-raised flag means no epoch ran at all.
        assert_eq!(loss, 0.0);
        assert_eq!(net.serialize(), before);
    }
}
