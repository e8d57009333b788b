use super::erasure::ErasureSet;
use crate::coding::traits::{Decoder, FecError, Result};
use crate::config::FecConfig;
use tracing::{debug, trace};

/// Collects the shards of one group as they arrive.
///
/// Slots that never arrive stay zero-filled and become the erasure set handed
/// to the decoder. A payload shorter than the shard size is zero-padded.
#[derive(Debug, Clone)]
pub struct GroupAssembler {
    config: FecConfig,
    buffer: Vec<u8>,
    present: Vec<bool>,
}

impl GroupAssembler {
    /// Empty group for the given shape
    pub fn new(config: FecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            buffer: vec![0u8; config.group_len()],
            present: vec![false; config.total_shards()],
        })
    }

    /// Shape of this group
    pub fn config(&self) -> &FecConfig {
        &self.config
    }

    /// Store the payload of shard `index`. A repeated index overwrites the slot.
    pub fn insert(&mut self, index: usize, payload: &[u8]) -> Result<()> {
        let total = self.config.total_shards();
        if index >= total {
            return Err(FecError::InvalidIndex { index, total });
        }
        let size = self.config.shard_size;
        if payload.len() > size {
            return Err(FecError::ShardLength {
                index,
                len: payload.len(),
                expected: size,
            });
        }

        let slot = &mut self.buffer[index * size..(index + 1) * size];
        slot[..payload.len()].copy_from_slice(payload);
        slot[payload.len()..].fill(0);
        self.present[index] = true;
        trace!(index, len = payload.len(), "stored shard");
        Ok(())
    }

    /// Whether shard `index` has arrived
    pub fn contains(&self, index: usize) -> bool {
        self.present.get(index).copied().unwrap_or(false)
    }

    /// Number of shards received so far
    pub fn received(&self) -> usize {
        self.present.iter().filter(|p| **p).count()
    }

    /// Whether every shard has arrived
    pub fn is_complete(&self) -> bool {
        self.present.iter().all(|p| *p)
    }

    /// Whether enough shards arrived to rebuild the group
    pub fn can_recover(&self) -> bool {
        self.received() >= self.config.data_shards
    }

    /// Indices that have not arrived
    pub fn erasures(&self) -> ErasureSet {
        ErasureSet::from_present(&self.present)
    }

    /// Decode and return the full `(k + m) * size` group buffer
    pub fn finish<D: Decoder>(mut self, decoder: &D) -> Result<Vec<u8>> {
        if decoder.data_shards() != self.config.data_shards
            || decoder.parity_shards() != self.config.parity_shards
        {
            return Err(FecError::InvalidParameters {
                data_shards: decoder.data_shards(),
                parity_shards: decoder.parity_shards(),
            });
        }

        let erasures = self.erasures();
        debug!(
            received = self.received(),
            erased = erasures.len(),
            "finishing group"
        );
        decoder.decode_in_place(self.config.shard_size, &mut self.buffer, erasures.as_slice())?;
        Ok(self.buffer)
    }

    /// Decode and return only the data region, the first `k * size` bytes
    pub fn finish_data<D: Decoder>(self, decoder: &D) -> Result<Vec<u8>> {
        let data_len = self.config.data_len();
        let mut group = self.finish(decoder)?;
        group.truncate(data_len);
        Ok(group)
    }
}
