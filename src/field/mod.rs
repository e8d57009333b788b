//! Finite field arithmetic

/// GF(256) tables, element type and slice kernels
pub mod gf256;

pub use gf256::Gf256;
