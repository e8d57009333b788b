#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::needless_range_loop)]

pub mod coding;
pub mod config;
pub mod field;
pub mod storage;

pub use coding::{decode, encode, Decoder, Encoder, FecDecoder, FecEncoder, FecError, FecErrorKind};
pub use config::FecConfig;
pub use field::Gf256;
pub use storage::{ErasureSet, GroupAssembler, Shard};
