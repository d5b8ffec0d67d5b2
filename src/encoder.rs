//! Recurrent string encoder.
//!
//! Folds a variable-length string into a fixed-dimension vector by threading
//! a hidden vector through a feed-forward network once per symbol. The fixed
//! output size is what makes embedding distances comparable across strings
//! of different lengths.

use std::fmt::{self, Display};
use std::marker::PhantomData;

use ndarray::{s, Array1};

use crate::alphabet::{bit_vector, Alphabet, ByteAlphabet};
use crate::network::NeuralNetwork;

/// Encoder configuration and evaluation errors.
#[derive(Debug)]
pub enum EncodeError {
    /// The encoder's network has not been given a topology yet.
    UnconfiguredNetwork,
    /// Configured layer widths disagree with the encoder's input or output
    /// width.
    LayerSizeMismatch {
        expected_input: usize,
        expected_output: usize,
        first: usize,
        last: usize,
    },
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnconfiguredNetwork => {
                write!(f, "encoder network has no configured topology")
            }
            EncodeError::LayerSizeMismatch {
                expected_input,
                expected_output,
                first,
                last,
            } => write!(
                f,
                "layer widths {}..{} do not match encoder widths {}..{}",
                first, last, expected_input, expected_output
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Recurrent encoder over alphabet `A`.
///
/// Owns one network and one hidden vector of dimension `dim`. The hidden
/// vector is scratch state: it is zeroed at the start of every
/// [`encode`](Encoder::encode) call and must not be read between calls.
///
/// The output dimension is resolved once at construction and never changes
/// for the lifetime of the encoder.
///
/// # Example
///
/// ```rust
/// use fuzzy_embed::Encoder;
///
/// let mut encoder: Encoder = Encoder::new(10);
/// assert_eq!(encoder.nn_input_size(), 18);
/// assert_eq!(encoder.nn_output_size(), 10);
///
/// encoder.set_layer_sizes(&[18, 10, 10], true).unwrap();
/// let embedding = encoder.encode("airplane").unwrap();
/// assert_eq!(embedding.len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder<A: Alphabet = ByteAlphabet> {
    network: Option<NeuralNetwork>,
    state: Array1<f32>,
    dim: usize,
    seed: u64,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet> Encoder<A> {
    /// Creates an encoder producing vectors of dimension `dim`.
    ///
    /// The network starts unconfigured; give it a topology with
    /// [`set_layer_sizes`](Encoder::set_layer_sizes) or
    /// [`set_network`](Encoder::set_network) before encoding.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero.
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "encoding dimension must be positive");
        Self {
            network: None,
            state: Array1::zeros(dim),
            dim,
            seed: 42,
            _alphabet: PhantomData,
        }
    }

    /// Same as [`new`](Encoder::new), with the seed used for randomized
    /// topology rebuilds.
    pub fn with_seed(dim: usize, seed: u64) -> Self {
        let mut encoder = Self::new(dim);
        encoder.seed = seed;
        encoder
    }

    /// Encodes `text` into a vector of dimension `dim`.
    ///
    /// Resets the hidden state to zero, then folds every symbol of `text`
    /// left to right. Deterministic: the same text and the same network
    /// parameters always produce the same vector.
    pub fn encode(&mut self, text: &str) -> Result<Array1<f32>, EncodeError> {
        self.reset_state();
        for symbol in A::symbols(text) {
            self.encode_symbol(symbol)?;
        }
        Ok(self.state.clone())
    }

    /// Feeds one symbol through the network, replacing the hidden state.
    ///
    /// The network input is the symbol's bit vector followed by the current
    /// hidden vector.
    pub fn encode_symbol(&mut self, symbol: u32) -> Result<(), EncodeError> {
        let network = self
            .network
            .as_ref()
            .ok_or(EncodeError::UnconfiguredNetwork)?;

        let width = A::BIT_WIDTH;
        let bits = bit_vector(symbol, width);
        let mut input = Array1::zeros(width + self.dim);
        input.slice_mut(s![..width]).assign(&bits);
        input.slice_mut(s![width..]).assign(&self.state);

        self.state = network.compute(&input);
        Ok(())
    }

    /// Zeroes the hidden state.
    pub fn reset_state(&mut self) {
        self.state.fill(0.0);
    }

    /// Width the network must accept: symbol bits plus hidden dimension.
    pub fn nn_input_size(&self) -> usize {
        A::BIT_WIDTH + self.dim
    }

    /// Width the network must produce: the hidden dimension.
    pub fn nn_output_size(&self) -> usize {
        self.dim
    }

    /// The encoding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Largest possible Euclidean distance between two outputs, `sqrt(dim)`.
    ///
    /// Relies on the network bounding every output component to `[0, 1]`.
    pub fn output_norm_max(&self) -> f32 {
        (self.dim as f32).sqrt()
    }

    /// Rebuilds the network from scratch with the given layer widths.
    ///
    /// The first width must equal [`nn_input_size`](Encoder::nn_input_size)
    /// and the last [`nn_output_size`](Encoder::nn_output_size).
    pub fn set_layer_sizes(
        &mut self,
        layer_sizes: &[usize],
        randomize: bool,
    ) -> Result<(), EncodeError> {
        self.check_widths(layer_sizes)?;
        self.network = Some(NeuralNetwork::new(layer_sizes, randomize, self.seed));
        Ok(())
    }

    /// Replaces the network wholesale, validating its boundary widths.
    pub fn set_network(&mut self, network: NeuralNetwork) -> Result<(), EncodeError> {
        self.check_widths(network.layer_sizes())?;
        self.network = Some(network);
        Ok(())
    }

    /// The current network, if a topology has been configured.
    pub fn network(&self) -> Option<&NeuralNetwork> {
        self.network.as_ref()
    }

    pub(crate) fn network_mut(&mut self) -> Result<&mut NeuralNetwork, EncodeError> {
        self.network.as_mut().ok_or(EncodeError::UnconfiguredNetwork)
    }

    /// Restores a snapshot taken from this encoder, skipping width checks.
    pub(crate) fn restore_network(&mut self, network: NeuralNetwork) {
        self.network = Some(network);
    }

    fn check_widths(&self, layer_sizes: &[usize]) -> Result<(), EncodeError> {
        let first = layer_sizes.first().copied().unwrap_or(0);
        let last = layer_sizes.last().copied().unwrap_or(0);
        if first != self.nn_input_size() || last != self.nn_output_size() {
            return Err(EncodeError::LayerSizeMismatch {
                expected_input: self.nn_input_size(),
                expected_output: self.nn_output_size(),
                first,
                last,
            });
        }
        Ok(())
    }
}
