//! Cauchy Reed-Solomon encoder

use super::cache;
use super::matrix::GeneratorMatrix;
use crate::coding::traits::{region_len, Encoder, FecError, Result};
use crate::field::gf256;
use crate::storage::Shard;
use std::sync::Arc;
use tracing::debug;

/// Systematic encoder: data shards pass through, parity comes from the
/// generator's Cauchy rows
#[derive(Debug, Clone)]
pub struct FecEncoder {
    generator: Arc<GeneratorMatrix>,
}

impl FecEncoder {
    /// Encoder for `k` data and `m` parity shards, sharing the cached generator
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        Ok(Self {
            generator: cache::generator(data_shards, parity_shards)?,
        })
    }

    /// Encoder over an explicit generator
    pub fn with_generator(generator: Arc<GeneratorMatrix>) -> Self {
        Self { generator }
    }

    /// The generator matrix in use
    pub fn generator(&self) -> &GeneratorMatrix {
        &self.generator
    }

    /// Check shard count and common length, returning the shard size
    fn check_shards<T: AsRef<[u8]>>(&self, data: &[T]) -> Result<usize> {
        let k = self.generator.data_shards();
        if data.len() != k {
            return Err(FecError::ShardCount {
                expected: k,
                got: data.len(),
            });
        }

        let size = data[0].as_ref().len();
        if let Some((index, shard)) = data
            .iter()
            .enumerate()
            .find(|(_, s)| s.as_ref().len() != size)
        {
            return Err(FecError::ShardLength {
                index,
                len: shard.as_ref().len(),
                expected: size,
            });
        }
        Ok(size)
    }

    /// Write parity shard `parity` for the given data into `out`
    pub(crate) fn encode_parity_into<T: AsRef<[u8]>>(
        &self,
        parity: usize,
        data: &[T],
        out: &mut [u8],
    ) {
        out.fill(0);
        for (coeff, shard) in self.generator.parity_row(parity).iter().zip(data) {
            gf256::mul_add(coeff.to_byte(), shard.as_ref(), out);
        }
    }

    /// Encode a contiguous `k * size` data region into a full
    /// `(k + m) * size` group buffer: data followed by parity.
    pub fn encode_group(&self, data_region: &[u8], size: usize) -> Result<Vec<u8>> {
        let k = self.generator.data_shards();
        let m = self.generator.parity_shards();
        let data_len = region_len(k, size)?;
        if data_region.len() != data_len {
            return Err(FecError::BufferLength {
                len: data_region.len(),
                expected: data_len,
            });
        }

        let mut group = vec![0u8; region_len(k + m, size)?];
        group[..data_len].copy_from_slice(data_region);
        if size > 0 {
            let (data, parity) = group.split_at_mut(data_len);
            let shards: Vec<&[u8]> = data.chunks_exact(size).collect();
            for (j, out) in parity.chunks_exact_mut(size).enumerate() {
                self.encode_parity_into(j, &shards, out);
            }
        }

        debug!(k, m, size, "encoded group");
        Ok(group)
    }
}

impl Encoder for FecEncoder {
    fn data_shards(&self) -> usize {
        self.generator.data_shards()
    }

    fn parity_shards(&self) -> usize {
        self.generator.parity_shards()
    }

    fn encode<T: AsRef<[u8]>>(&self, data: &[T]) -> Result<Vec<Vec<u8>>> {
        let size = self.check_shards(data)?;
        let m = self.generator.parity_shards();

        let parity = (0..m)
            .map(|j| Shard::combine(self.generator.parity_row(j), data, size).into_inner())
            .collect();

        debug!(k = self.data_shards(), m, size, "encoded parity shards");
        Ok(parity)
    }
}

/// Produce the `m` parity shards for `k` equal-length data shards
pub fn encode<T: AsRef<[u8]>>(
    data_shards: usize,
    parity_shards: usize,
    data: &[T],
) -> Result<Vec<Vec<u8>>> {
    FecEncoder::new(data_shards, parity_shards)?.encode(data)
}
