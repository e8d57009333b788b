//! Erasure coding implementations

/// Cauchy Reed-Solomon encoder, decoder and generator matrices
pub mod cauchy;
/// Core coding traits and error types
pub mod traits;

pub use cauchy::{decode, encode, FecDecoder, FecEncoder, GeneratorMatrix};
pub use traits::{Decoder, Encoder, FecError, FecErrorKind, Result};
