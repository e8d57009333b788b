//! Shard buffers and group bookkeeping

mod assembler;
mod erasure;
mod shard;

pub use assembler::GroupAssembler;
pub use erasure::ErasureSet;
pub use shard::Shard;
