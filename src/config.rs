//! Code parameters for one stream of FEC groups

use crate::coding::cauchy::{FecDecoder, FecEncoder, GeneratorMatrix};
use crate::coding::traits::{region_len, Result};
use crate::storage::GroupAssembler;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of every group in a stream: `k` data shards, `m` parity shards,
/// `shard_size` bytes each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FecConfig {
    /// Number of data shards (k)
    pub data_shards: usize,
    /// Number of parity shards (m)
    pub parity_shards: usize,
    /// Size of every shard in bytes
    pub shard_size: usize,
}

impl Default for FecConfig {
    fn default() -> Self {
        Self {
            data_shards: 6,
            parity_shards: 1,
            shard_size: 1400,
        }
    }
}

impl FecConfig {
    /// Create a configuration
    pub fn new(data_shards: usize, parity_shards: usize, shard_size: usize) -> Self {
        Self {
            data_shards,
            parity_shards,
            shard_size,
        }
    }

    /// Set the number of data shards
    pub fn with_data_shards(mut self, data_shards: usize) -> Self {
        self.data_shards = data_shards;
        self
    }

    /// Set the number of parity shards
    pub fn with_parity_shards(mut self, parity_shards: usize) -> Self {
        self.parity_shards = parity_shards;
        self
    }

    /// Set the shard size
    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = shard_size;
        self
    }

    /// Check `k >= 1`, `k + m <= 256` and that a group buffer fits in memory
    pub fn validate(&self) -> Result<()> {
        GeneratorMatrix::check_parameters(self.data_shards, self.parity_shards)?;
        region_len(self.total_shards(), self.shard_size)?;
        Ok(())
    }

    /// Shards per group (k + m)
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Bytes in a full group buffer
    pub fn group_len(&self) -> usize {
        self.total_shards() * self.shard_size
    }

    /// Bytes in the data region at the front of a group buffer
    pub fn data_len(&self) -> usize {
        self.data_shards * self.shard_size
    }

    /// Encoder for this shape
    pub fn encoder(&self) -> Result<FecEncoder> {
        FecEncoder::new(self.data_shards, self.parity_shards)
    }

    /// Decoder for this shape
    pub fn decoder(&self) -> Result<FecDecoder> {
        FecDecoder::new(self.data_shards, self.parity_shards)
    }

    /// Empty assembler for one group of this shape
    pub fn assembler(&self) -> Result<GroupAssembler> {
        GroupAssembler::new(*self)
    }
}
