//! # fuzzy-embed
//!
//! Fixed-dimension string embeddings whose Euclidean distances approximate a
//! classical fuzzy string-similarity score, trained without gradients.
//!
//! An [`Encoder`] folds a string into a vector of fixed dimension by
//! threading a hidden vector through a small feed-forward [`NeuralNetwork`],
//! one symbol at a time. An [`EncoderTrainer`] improves the network by blind
//! hill-climbing: perturb the parameters at random, measure whether embedding
//! distances track the [`SimilarityOracle`] scores any better, and keep the
//! perturbation only when they do. Every training step reverts the encoder
//! before returning; acceptance is always an explicit caller decision.
//!
//! ## Quick Start
//!
//! ```rust
//! use fuzzy_embed::{Encoder, EncoderTrainer};
//!
//! let mut encoder: Encoder = Encoder::with_seed(10, 42);
//! encoder.set_layer_sizes(&[18, 14, 10], true).unwrap();
//!
//! let mut trainer = EncoderTrainer::new(encoder);
//! trainer.extend_dataset(["airplane", "airport", "apple", "apricot"]);
//!
//! for _ in 0..10 {
//!     let result = trainer.train_random(8).unwrap();
//!     if trainer.apply_training_result(&result) {
//!         trainer.record_cost(&result);
//!     }
//! }
//! ```
//!
//! ## Core Modules
//!
//! - [`alphabet`] - Symbol decomposition and bit-vector encodings
//! - [`encoder`] - The recurrent string encoder
//! - [`network`] - The feed-forward unit and its opaque perturbations
//! - [`trainer`] - Hill-climbing training over string pairs
//! - [`dataset`] - Shared ordered training corpus
//! - [`similarity`] - String similarity oracles
//! - [`config`] - Harness configuration via TOML
//! - [`logging`] - JSON line-delimited training logs

pub mod alphabet;
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod logging;
pub mod network;
pub mod similarity;
pub mod trainer;

pub use alphabet::{Alphabet, ByteAlphabet, CharAlphabet, Utf16Alphabet};
pub use config::{ConfigError, EncoderConfig, TrainerConfig, TrainingConfig, TrainingMode};
pub use dataset::Dataset;
pub use encoder::{EncodeError, Encoder};
pub use logging::{LogError, TrainingLog, TrainingRecord};
pub use network::{NetworkDiff, NeuralNetwork};
pub use similarity::{IndelRatio, SimilarityOracle};
pub use trainer::{CostLogEntry, EncoderTrainer, TrainError, TrainingResult};
