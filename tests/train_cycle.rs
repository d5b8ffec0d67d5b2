//! End-to-end training flow checks: encoder configuration, the full
//! perturb/evaluate/revert/apply cycle, and the documented failure modes.

use fuzzy_embed::{
    Dataset, EncodeError, Encoder, EncoderTrainer, TrainError, TrainingResult,
};

fn configured_encoder(seed: u64) -> Encoder {
    let mut encoder: Encoder = Encoder::with_seed(10, seed);
    encoder.set_layer_sizes(&[18, 10, 10], true).unwrap();
    encoder
}

#[test]
fn dimension_invariants_for_byte_strings() {
    let encoder: Encoder = Encoder::new(10);
    assert_eq!(encoder.nn_input_size(), 18);
    assert_eq!(encoder.nn_output_size(), 10);
}

#[test]
fn encode_after_configuration_is_bounded() {
    let mut encoder = configured_encoder(42);
    let result = encoder.encode("a").unwrap();

    assert_eq!(result.len(), 10);
    assert!(result.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn empty_pair_list_is_an_input_error() {
    let mut trainer = EncoderTrainer::new(configured_encoder(1));
    assert!(matches!(
        trainer.train_pairs(&[]),
        Err(TrainError::EmptyPairs)
    ));
}

#[test]
fn random_training_on_single_entry_dataset_fails() {
    let mut trainer = EncoderTrainer::new(configured_encoder(2));
    trainer.add_to_dataset("only");

    assert!(matches!(
        trainer.train_random(5),
        Err(TrainError::DatasetTooSmall { len: 1 })
    ));
}

#[test]
fn exhaustive_training_covers_both_ordered_pairs() {
    let dataset = Dataset::from_strings(vec!["ab".into(), "ac".into()]);
    let mut trainer = EncoderTrainer::with_dataset(configured_encoder(3), dataset);

    let forward = trainer.cost("ab", "ac").unwrap();
    let backward = trainer.cost("ac", "ab").unwrap();

    let result = trainer.train_all().unwrap();
    assert!((result.original_cost - (forward + backward) / 2.0).abs() < 1e-6);
}

#[test]
fn identical_strings_cost_exactly_one() {
    // Embedding distance 0 versus similarity 1: the cost formula keeps the
    // raw similarity term, so this pins the value at 1.0.
    let mut trainer = EncoderTrainer::new(configured_encoder(4));
    let cost = trainer.cost("same", "same").unwrap();
    assert!((cost - 1.0).abs() < 1e-6);
}

#[test]
fn training_without_topology_is_a_configuration_error() {
    let encoder: Encoder = Encoder::new(10);
    let mut trainer = EncoderTrainer::new(encoder);
    trainer.extend_dataset(["ab", "cd"]);

    assert!(matches!(
        trainer.train_all(),
        Err(TrainError::Encode(EncodeError::UnconfiguredNetwork))
    ));
}

#[test]
fn training_is_neutral_until_a_result_is_applied() {
    let mut trainer = EncoderTrainer::new(configured_encoder(5));
    trainer.extend_dataset(["airplane", "airport", "apple", "grape"]);

    let probe_before = trainer.encoder_mut().encode("probe").unwrap();

    trainer.train_pair("airplane", "grape").unwrap();
    trainer.train_random(8).unwrap();
    trainer.train_all().unwrap();

    let probe_after = trainer.encoder_mut().encode("probe").unwrap();
    assert_eq!(probe_before, probe_after);
}

#[test]
fn applying_an_improving_result_moves_the_encoder() {
    let mut trainer = EncoderTrainer::new(configured_encoder(6)).with_seed(6);
    let probe_before = trainer.encoder_mut().encode("probe").unwrap();

    // Hill-climb until a perturbation improves the pair cost; with random
    // diffs roughly half the draws improve, so this terminates fast.
    let mut improving: Option<TrainingResult> = None;
    for _ in 0..200 {
        let result = trainer.train_pair("abcd", "wxyz").unwrap();
        if result.diff.is_some() {
            improving = Some(result);
            break;
        }
    }
    let result = improving.expect("no improving perturbation in 200 draws");

    assert!(trainer.apply_training_result(&result));

    let probe_after = trainer.encoder_mut().encode("probe").unwrap();
    assert_ne!(probe_before, probe_after);
}

#[test]
fn cost_log_round_trips_through_training() {
    let mut trainer = EncoderTrainer::new(configured_encoder(7));
    trainer.extend_dataset(["ab", "ac", "ad", "ae"]);

    for _ in 0..3 {
        let result = trainer.train_random(8).unwrap();
        trainer.record_cost(&result);
    }

    let log = trainer.cost_log();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].iteration, 1);
    assert_eq!(log[2].iteration, 3);

    trainer.clear_cost_log();
    assert!(trainer.cost_log().is_empty());
}
