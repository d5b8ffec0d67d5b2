//! Fully-connected feed-forward network used as the encoder's recurrent unit.
//!
//! The network exposes exactly the three capabilities the trainer needs:
//! forward evaluation, drawing a random parameter perturbation, and applying
//! one in place. Construction is seed-deterministic; there is no ambient
//! randomness.

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Magnitude bound for random initial weights and biases.
const INIT_SCALE: f32 = 1.0;

/// Magnitude bound for one random perturbation step.
const DIFF_SCALE: f32 = 0.05;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layer {
    /// Shape (outputs, inputs).
    weights: Array2<f32>,
    biases: Array1<f32>,
}

impl Layer {
    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        let pre = self.weights.dot(input) + &self.biases;
        pre.mapv(sigmoid)
    }
}

/// Feed-forward network with a sigmoid activation at every layer.
///
/// Every output component lies in (0, 1), which the encoder's distance
/// normalization depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNetwork {
    layer_sizes: Vec<usize>,
    layers: Vec<Layer>,
}

impl NeuralNetwork {
    /// Creates a network with the given layer widths.
    ///
    /// With `randomize` set, weights and biases are drawn uniformly from
    /// `[-1, 1]` using a generator seeded by `seed`; otherwise they start at
    /// zero. The same widths and seed always produce the same parameters.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two layer widths are given.
    pub fn new(layer_sizes: &[usize], randomize: bool, seed: u64) -> Self {
        assert!(
            layer_sizes.len() >= 2,
            "network needs an input and an output layer"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layers = layer_sizes
            .windows(2)
            .map(|pair| {
                let (inputs, outputs) = (pair[0], pair[1]);
                if randomize {
                    Layer {
                        weights: Array2::from_shape_fn((outputs, inputs), |_| {
                            rng.gen_range(-INIT_SCALE..=INIT_SCALE)
                        }),
                        biases: Array1::from_shape_fn(outputs, |_| {
                            rng.gen_range(-INIT_SCALE..=INIT_SCALE)
                        }),
                    }
                } else {
                    Layer {
                        weights: Array2::zeros((outputs, inputs)),
                        biases: Array1::zeros(outputs),
                    }
                }
            })
            .collect();

        Self {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        }
    }

    /// The configured layer widths, input layer first.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Width of the input layer.
    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Forward evaluation. Deterministic given the current parameters.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not match the input layer width.
    pub fn compute(&self, input: &Array1<f32>) -> Array1<f32> {
        assert_eq!(
            input.len(),
            self.input_size(),
            "input width must match the first layer"
        );

        let mut activation = input.clone();
        for layer in &self.layers {
            activation = layer.forward(&activation);
        }
        activation
    }

    /// Draws a random perturbation shaped like this network's parameters.
    ///
    /// Every weight and bias receives an independent delta uniform in
    /// `[-0.05, 0.05]`. The diff is opaque to callers; it only round-trips
    /// through [`modify`](NeuralNetwork::modify) and serialization.
    pub fn random_diff<R: Rng>(&self, rng: &mut R) -> NetworkDiff {
        let deltas = self
            .layers
            .iter()
            .map(|layer| LayerDelta {
                weights: Array2::from_shape_fn(layer.weights.dim(), |_| {
                    rng.gen_range(-DIFF_SCALE..=DIFF_SCALE)
                }),
                biases: Array1::from_shape_fn(layer.biases.len(), |_| {
                    rng.gen_range(-DIFF_SCALE..=DIFF_SCALE)
                }),
            })
            .collect();

        NetworkDiff {
            layer_sizes: self.layer_sizes.clone(),
            deltas,
        }
    }

    /// Applies a perturbation in place.
    ///
    /// # Panics
    ///
    /// Panics if `diff` was drawn from a network with a different topology.
    pub fn modify(&mut self, diff: &NetworkDiff) {
        assert_eq!(
            diff.layer_sizes, self.layer_sizes,
            "diff topology must match the network"
        );

        for (layer, delta) in self.layers.iter_mut().zip(&diff.deltas) {
            layer.weights += &delta.weights;
            layer.biases += &delta.biases;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LayerDelta {
    weights: Array2<f32>,
    biases: Array1<f32>,
}

/// Opaque description of a random parameter perturbation.
///
/// Produced by [`NeuralNetwork::random_diff`] and consumed by
/// [`NeuralNetwork::modify`]. Callers pass it through without inspecting it;
/// it serializes for checkpoint and replay purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDiff {
    layer_sizes: Vec<usize>,
    deltas: Vec<LayerDelta>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_is_seed_deterministic() {
        let a = NeuralNetwork::new(&[4, 3, 2], true, 7);
        let b = NeuralNetwork::new(&[4, 3, 2], true, 7);

        let input = Array1::from_vec(vec![0.5, 0.1, 0.9, 0.0]);
        assert_eq!(a.compute(&input), b.compute(&input));
    }

    #[test]
    fn zero_init_maps_everything_to_half() {
        let net = NeuralNetwork::new(&[3, 2], false, 0);
        let output = net.compute(&Array1::from_vec(vec![1.0, 0.0, 1.0]));

        // sigmoid(0) = 0.5 for every component
        assert!(output.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn outputs_stay_in_unit_interval() {
        let net = NeuralNetwork::new(&[5, 8, 3], true, 11);
        let output = net.compute(&Array1::from_vec(vec![1.0, 1.0, 1.0, 1.0, 1.0]));

        assert_eq!(output.len(), 3);
        assert!(output.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn modify_changes_the_forward_pass() {
        let mut net = NeuralNetwork::new(&[4, 3], true, 3);
        let input = Array1::from_vec(vec![0.2, 0.4, 0.6, 0.8]);
        let before = net.compute(&input);

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let diff = net.random_diff(&mut rng);
        net.modify(&diff);

        assert_ne!(before, net.compute(&input));
    }

    #[test]
    #[should_panic(expected = "diff topology must match")]
    fn modify_rejects_foreign_topology() {
        let small = NeuralNetwork::new(&[2, 2], true, 1);
        let mut big = NeuralNetwork::new(&[4, 4], true, 1);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let diff = small.random_diff(&mut rng);
        big.modify(&diff);
    }

    #[test]
    fn diff_round_trips_through_json() {
        let net = NeuralNetwork::new(&[3, 2], true, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let diff = net.random_diff(&mut rng);

        let json = serde_json::to_string(&diff).unwrap();
        let restored: NetworkDiff = serde_json::from_str(&json).unwrap();

        let mut a = net.clone();
        let mut b = net;
        a.modify(&diff);
        b.modify(&restored);

        let input = Array1::from_vec(vec![0.1, 0.2, 0.3]);
        assert_eq!(a.compute(&input), b.compute(&input));
    }
}
