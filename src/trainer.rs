//! Stochastic hill-climbing trainer for the recurrent encoder.
//!
//! Every training call follows one pattern: measure the cost under the
//! current parameters, draw a random perturbation from the network, apply
//! it, measure again, then revert unconditionally. The call itself never
//! changes the encoder; the caller inspects the returned [`TrainingResult`]
//! and keeps the change via
//! [`apply_training_result`](EncoderTrainer::apply_training_result) or
//! [`modify_encoder`](EncoderTrainer::modify_encoder).

use std::fmt::{self, Display};

use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, ByteAlphabet};
use crate::dataset::Dataset;
use crate::encoder::{EncodeError, Encoder};
use crate::network::NetworkDiff;
use crate::similarity::{IndelRatio, SimilarityOracle};

/// Training errors.
#[derive(Debug)]
pub enum TrainError {
    /// An empty pair list was passed to batch training.
    EmptyPairs,
    /// A dataset-driven call was made with no dataset set.
    MissingDataset,
    /// The dataset holds fewer than two entries.
    DatasetTooSmall { len: usize },
    /// Encoder configuration or evaluation failed.
    Encode(EncodeError),
}

impl Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::EmptyPairs => write!(f, "empty string pair list"),
            TrainError::MissingDataset => write!(f, "no dataset set"),
            TrainError::DatasetTooSmall { len } => {
                write!(f, "dataset too small: {} entries, need at least 2", len)
            }
            TrainError::Encode(err) => write!(f, "encoder error: {}", err),
        }
    }
}

impl std::error::Error for TrainError {}

impl From<EncodeError> for TrainError {
    fn from(value: EncodeError) -> Self {
        TrainError::Encode(value)
    }
}

/// Outcome of one perturb/evaluate/revert cycle.
///
/// `diff` is present only when the perturbation strictly reduced the cost.
/// The encoder itself is always left untouched by the training call that
/// produced this value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// The improving perturbation, if one was found.
    pub diff: Option<NetworkDiff>,
    /// Mean cost under the unperturbed parameters.
    pub original_cost: f32,
    /// Mean cost under the perturbed parameters.
    pub modified_cost: f32,
}

/// One caller-recorded cost measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostLogEntry {
    /// Iteration counter value at the time of recording.
    pub iteration: u64,
    pub original_cost: f32,
    pub modified_cost: f32,
}

/// Hill-climbing trainer owning an encoder and, optionally, a dataset.
///
/// # Example
///
/// ```rust
/// use fuzzy_embed::{Encoder, EncoderTrainer};
///
/// let mut encoder: Encoder = Encoder::with_seed(10, 42);
/// encoder.set_layer_sizes(&[18, 14, 10], true).unwrap();
///
/// let mut trainer = EncoderTrainer::new(encoder);
/// trainer.extend_dataset(["airplane", "airport", "apple", "apricot"]);
///
/// let result = trainer.train_random(8).unwrap();
/// if trainer.apply_training_result(&result) {
///     trainer.record_cost(&result);
/// }
/// ```
pub struct EncoderTrainer<A: Alphabet = ByteAlphabet, O: SimilarityOracle = IndelRatio> {
    encoder: Encoder<A>,
    dataset: Option<Dataset>,
    oracle: O,
    rng: ChaCha8Rng,
    iteration: u64,
    cost_log: Vec<CostLogEntry>,
}

impl<A: Alphabet> EncoderTrainer<A, IndelRatio> {
    /// Creates a trainer around `encoder` with the default indel oracle.
    pub fn new(encoder: Encoder<A>) -> Self {
        Self::with_oracle(encoder, IndelRatio)
    }

    /// Same as [`new`](EncoderTrainer::new), with a dataset attached.
    pub fn with_dataset(encoder: Encoder<A>, dataset: Dataset) -> Self {
        let mut trainer = Self::new(encoder);
        trainer.dataset = Some(dataset);
        trainer
    }
}

impl<A: Alphabet, O: SimilarityOracle> EncoderTrainer<A, O> {
    /// Creates a trainer with a custom similarity oracle.
    pub fn with_oracle(encoder: Encoder<A>, oracle: O) -> Self {
        Self {
            encoder,
            dataset: None,
            oracle,
            rng: ChaCha8Rng::seed_from_u64(42),
            iteration: 0,
            cost_log: Vec::new(),
        }
    }

    /// Reseeds the generator driving perturbations and pair sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// The owned encoder.
    pub fn encoder(&self) -> &Encoder<A> {
        &self.encoder
    }

    /// Mutable access to the owned encoder.
    pub fn encoder_mut(&mut self) -> &mut Encoder<A> {
        &mut self.encoder
    }

    /// Attaches a dataset handle.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
    }

    /// A handle to the trainer's dataset, created empty on first use.
    pub fn dataset(&mut self) -> Dataset {
        self.dataset.get_or_insert_with(Dataset::new).clone()
    }

    /// Appends one string, creating the dataset if absent.
    pub fn add_to_dataset(&mut self, string: impl Into<String>) {
        self.dataset().push(string);
    }

    /// Appends many strings, creating the dataset if absent.
    pub fn extend_dataset<I>(&mut self, strings: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.dataset().extend(strings);
    }

    /// Number of completed batch training iterations.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Disagreement between embedding distance and string similarity.
    ///
    /// `|dist(enc(s1), enc(s2)) / sqrt(dim) - similarity(s1, s2) / max|`,
    /// both terms normalized to `[0, 1]`.
    ///
    /// Note the asymmetry: the first term is a distance, the second a
    /// similarity, so two identical strings cost 1.0 rather than 0.0.
    /// Whether the second term ought to be `1 - similarity` is an open
    /// question (see DESIGN.md); the current form is deliberate and pinned
    /// by a regression test.
    pub fn cost(&mut self, s1: &str, s2: &str) -> Result<f32, TrainError> {
        let encoded_1 = self.encoder.encode(s1)?;
        let encoded_2 = self.encoder.encode(s2)?;
        let encoded_distance = euclidean(&encoded_1, &encoded_2) / self.encoder.output_norm_max();

        let similarity = self.oracle.similarity(s1, s2) / self.oracle.max_score();

        Ok((encoded_distance - similarity).abs())
    }

    /// Single-pair hill-climbing step.
    ///
    /// The encoder is always reverted before returning; keep the change with
    /// [`apply_training_result`](EncoderTrainer::apply_training_result).
    /// Does not advance the iteration counter.
    pub fn train_pair(&mut self, s1: &str, s2: &str) -> Result<TrainingResult, TrainError> {
        self.hill_climb_step(|trainer| trainer.cost(s1, s2))
    }

    /// Batch hill-climbing step over explicit string pairs.
    ///
    /// Measures the mean cost across all pairs before and after the
    /// perturbation. Fails on an empty pair list. Advances the iteration
    /// counter.
    pub fn train_pairs(&mut self, pairs: &[(String, String)]) -> Result<TrainingResult, TrainError> {
        if pairs.is_empty() {
            return Err(TrainError::EmptyPairs);
        }

        let result = self.hill_climb_step(|trainer| {
            let mut total = 0.0;
            for (s1, s2) in pairs {
                total += trainer.cost(s1, s2)?;
            }
            Ok(total / pairs.len() as f32)
        })?;

        self.iteration += 1;
        Ok(result)
    }

    /// Batch step over `iterations` randomly sampled dataset pairs.
    ///
    /// Indices are drawn uniformly with replacement; a draw where both
    /// indices coincide carries no signal and is silently skipped, reducing
    /// the effective batch size. Fails when no dataset is set or the dataset
    /// holds fewer than two entries.
    pub fn train_random(&mut self, iterations: usize) -> Result<TrainingResult, TrainError> {
        let dataset = self.dataset.clone().ok_or(TrainError::MissingDataset)?;
        let len = dataset.len();
        if len < 2 {
            return Err(TrainError::DatasetTooSmall { len });
        }

        let mut pairs = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            let index_1 = self.rng.gen_range(0..len);
            let index_2 = self.rng.gen_range(0..len);
            if index_1 == index_2 {
                continue;
            }

            let s1 = dataset.get(index_1).expect("dataset entries are never removed");
            let s2 = dataset.get(index_2).expect("dataset entries are never removed");
            pairs.push((s1, s2));
        }

        self.train_pairs(&pairs)
    }

    /// Batch step over every ordered pair of distinct dataset indices.
    ///
    /// Evaluates the mean cost over all `n * (n - 1)` comparisons before and
    /// after the perturbation. The pair list is never materialized; a nested
    /// index scan keeps the memory footprint flat for large datasets. Fails
    /// when no dataset is set, the dataset holds fewer than two entries, or
    /// the encoder has no configured topology. Advances the iteration
    /// counter.
    pub fn train_all(&mut self) -> Result<TrainingResult, TrainError> {
        let dataset = self.dataset.clone().ok_or(TrainError::MissingDataset)?;
        let len = dataset.len();
        if len < 2 {
            return Err(TrainError::DatasetTooSmall { len });
        }

        let result = self.hill_climb_step(|trainer| {
            let mut total = 0.0;
            for index_1 in 0..len {
                let s1 = dataset.get(index_1).expect("dataset entries are never removed");
                for index_2 in 0..len {
                    if index_1 == index_2 {
                        continue;
                    }
                    let s2 = dataset.get(index_2).expect("dataset entries are never removed");
                    total += trainer.cost(&s1, &s2)?;
                }
            }
            Ok(total / (len * (len - 1)) as f32)
        })?;

        self.iteration += 1;
        Ok(result)
    }

    /// Permanently applies `result`'s perturbation when it improved cost.
    ///
    /// Returns true only when `result` carries a diff and its modified cost
    /// is strictly below its original cost. Training calls only populate the
    /// diff under exactly that condition, so this is a defensive re-check
    /// rather than the primary decision.
    pub fn apply_training_result(&mut self, result: &TrainingResult) -> bool {
        match &result.diff {
            Some(diff) if result.modified_cost < result.original_cost => {
                self.modify_encoder(diff).is_ok()
            }
            _ => false,
        }
    }

    /// Applies a perturbation to the encoder permanently and unconditionally.
    ///
    /// Useful for force-accepting a result or replaying a logged diff.
    pub fn modify_encoder(&mut self, diff: &NetworkDiff) -> Result<(), TrainError> {
        self.encoder.network_mut()?.modify(diff);
        Ok(())
    }

    /// Appends a cost log entry for `result` at the current iteration count.
    ///
    /// The log is never written automatically; recording is the caller's
    /// decision, made from the returned [`TrainingResult`].
    pub fn record_cost(&mut self, result: &TrainingResult) {
        self.cost_log.push(CostLogEntry {
            iteration: self.iteration,
            original_cost: result.original_cost,
            modified_cost: result.modified_cost,
        });
    }

    /// The recorded cost log, oldest entry first.
    pub fn cost_log(&self) -> &[CostLogEntry] {
        &self.cost_log
    }

    /// Removes every cost log entry.
    pub fn clear_cost_log(&mut self) {
        self.cost_log.clear();
    }

    /// One perturb/evaluate/revert cycle around `measure`.
    ///
    /// The snapshot is restored before the perturbed measurement's result is
    /// unwrapped, so the revert holds on the error path too.
    fn hill_climb_step<F>(&mut self, mut measure: F) -> Result<TrainingResult, TrainError>
    where
        F: FnMut(&mut Self) -> Result<f32, TrainError>,
    {
        let original_cost = measure(self)?;

        let snapshot = self
            .encoder
            .network()
            .cloned()
            .ok_or(EncodeError::UnconfiguredNetwork)?;
        let diff = snapshot.random_diff(&mut self.rng);

        self.encoder.network_mut()?.modify(&diff);
        let modified = measure(self);
        self.encoder.restore_network(snapshot);
        let modified_cost = modified?;

        let diff = if modified_cost < original_cost {
            Some(diff)
        } else {
            None
        };

        Ok(TrainingResult {
            diff,
            original_cost,
            modified_cost,
        })
    }
}

fn euclidean(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    (a - b).mapv(|v| v * v).sum().sqrt()
}
