//! Systematic Cauchy Reed-Solomon coding

mod cache;
mod decoder;
mod encoder;
mod matrix;

pub use cache::{generator, MatrixCache};
pub use decoder::{decode, FecDecoder};
pub use encoder::{encode, FecEncoder};
pub use matrix::{GeneratorMatrix, Matrix};
