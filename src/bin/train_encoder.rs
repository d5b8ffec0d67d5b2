//! Command-line training harness.
//!
//! Reads one training string per line from a dataset file, builds an encoder
//! from an optional TOML configuration, then runs the configured number of
//! hill-climbing iterations, keeping every improving perturbation and
//! appending JSONL records for later analysis.
//!
//! Usage: `train_encoder <dataset-file> [config.toml] [log-file]`

use std::env;
use std::error::Error;
use std::fs;
use std::process;

use fuzzy_embed::{
    Dataset, Encoder, EncoderTrainer, TrainerConfig, TrainingLog, TrainingMode, TrainingRecord,
};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(dataset_path) = args.first() else {
        eprintln!("usage: train_encoder <dataset-file> [config.toml] [log-file]");
        process::exit(2);
    };

    let config = match args.get(1) {
        Some(path) => match TrainerConfig::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("train_encoder: failed to load {}: {}", path, err);
                process::exit(2);
            }
        },
        None => TrainerConfig::default(),
    };

    let log_path = args
        .get(2)
        .cloned()
        .or_else(|| config.training.log_path.clone());

    if let Err(err) = run(dataset_path, log_path.as_deref(), &config) {
        eprintln!("train_encoder: {}", err);
        process::exit(1);
    }
}

fn run(
    dataset_path: &str,
    log_path: Option<&str>,
    config: &TrainerConfig,
) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(dataset_path)?;
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(config.training.max_dataset_lines)
        .map(str::to_string)
        .collect();

    println!(
        "training on {} strings from {}",
        lines.len(),
        dataset_path
    );

    let mut encoder: Encoder = Encoder::with_seed(config.encoder.dim, config.encoder.seed);
    let layer_sizes = layer_ramp(
        encoder.nn_input_size(),
        encoder.nn_output_size(),
        &config.encoder.hidden_layers,
    );
    encoder.set_layer_sizes(&layer_sizes, true)?;

    let mut trainer = EncoderTrainer::with_dataset(encoder, Dataset::from_strings(lines))
        .with_seed(config.encoder.seed);

    let log = log_path.map(TrainingLog::new);

    for _ in 0..config.training.iterations {
        let result = match config.training.mode {
            TrainingMode::All => trainer.train_all()?,
            TrainingMode::Random => trainer.train_random(config.training.pairs_per_step)?,
        };

        let applied = trainer.apply_training_result(&result);
        trainer.record_cost(&result);

        let iteration = trainer.iteration();
        println!(
            "iteration {}: original {:.6} modified {:.6} applied {}",
            iteration, result.original_cost, result.modified_cost, applied
        );

        if let Some(log) = &log {
            if iteration % config.training.log_every as u64 == 0 {
                log.append(&TrainingRecord {
                    iteration,
                    original_cost: result.original_cost,
                    modified_cost: result.modified_cost,
                    applied,
                })?;
            }
        }
    }

    Ok(())
}

/// Layer widths for the encoder's network: the mandatory input and output
/// widths around either the configured hidden widths or, when none are
/// given, a linear ramp from the input width down to the output width.
fn layer_ramp(input: usize, output: usize, hidden: &[usize]) -> Vec<usize> {
    let mut sizes = vec![input];

    if hidden.is_empty() {
        const INTERIOR: usize = 4;
        for i in 1..INTERIOR {
            let width = input as f32 - (input as f32 - output as f32) * i as f32 / INTERIOR as f32;
            sizes.push((width as usize).max(1));
        }
    } else {
        sizes.extend_from_slice(hidden);
    }

    sizes.push(output);
    sizes
}
