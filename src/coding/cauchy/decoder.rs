//! Cauchy Reed-Solomon erasure decoder.
//!
//! Reconstructs every erased shard of a `(k + m) * size` group buffer from
//! any `k` survivors.

use super::cache;
use super::encoder::FecEncoder;
use super::matrix::GeneratorMatrix;
use crate::coding::traits::{region_len, Decoder, FecError, Result};
use crate::field::gf256;
use crate::storage::ErasureSet;
use std::sync::Arc;
use tracing::debug;

/// Erasure decoder over a shared generator matrix
#[derive(Debug, Clone)]
pub struct FecDecoder {
    generator: Arc<GeneratorMatrix>,
}

impl FecDecoder {
    /// Decoder for `k` data and `m` parity shards, sharing the cached generator
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        Ok(Self {
            generator: cache::generator(data_shards, parity_shards)?,
        })
    }

    /// Decoder over an explicit generator
    pub fn with_generator(generator: Arc<GeneratorMatrix>) -> Self {
        Self { generator }
    }

    /// The generator matrix in use
    pub fn generator(&self) -> &GeneratorMatrix {
        &self.generator
    }

    fn check_buffer(&self, size: usize, len: usize) -> Result<()> {
        let expected = region_len(self.generator.total_shards(), size)?;
        if len != expected {
            return Err(FecError::BufferLength { len, expected });
        }
        Ok(())
    }

    fn check_erasures(&self, erasures: &[usize]) -> Result<ErasureSet> {
        let set = ErasureSet::new(erasures, self.generator.total_shards())?;
        if set.len() > self.generator.parity_shards() {
            return Err(FecError::UnrecoverableErasure {
                erased: set.len(),
                parity: self.generator.parity_shards(),
            });
        }
        Ok(set)
    }

    /// Rebuild erased shards. All fallible work happens before `group` is
    /// written.
    fn reconstruct_group(&self, size: usize, group: &mut [u8], erased: &ErasureSet) -> Result<()> {
        let k = self.generator.data_shards();
        let m = self.generator.parity_shards();

        let lost_data: Vec<usize> = erased.iter().filter(|&i| i < k).collect();
        let lost_parity: Vec<usize> = erased.iter().filter(|&i| i >= k).collect();

        debug!(
            k,
            m,
            size,
            lost_data = lost_data.len(),
            lost_parity = lost_parity.len(),
            "decoding group"
        );

        if !lost_data.is_empty() {
            let survivors = erased
                .survivors(k)
                .ok_or(FecError::UnrecoverableErasure {
                    erased: erased.len(),
                    parity: m,
                })?;
            let inverse = self.generator.inverted_submatrix(&survivors)?;

            // Data shard e at offset t is row e of the inverse applied to the
            // survivor bytes at offset t.
            let recovered: Vec<Vec<u8>> = lost_data
                .iter()
                .map(|&e| {
                    let mut out = vec![0u8; size];
                    for (coeff, &s) in inverse.row(e).iter().zip(&survivors) {
                        gf256::mul_add(coeff.to_byte(), shard(group, size, s), &mut out);
                    }
                    out
                })
                .collect();

            for (&e, bytes) in lost_data.iter().zip(&recovered) {
                shard_mut(group, size, e).copy_from_slice(bytes);
            }
        }

        if !lost_parity.is_empty() {
            let encoder = FecEncoder::with_generator(Arc::clone(&self.generator));
            let (data, parity) = group.split_at_mut(k * size);
            let data_shards: Vec<&[u8]> = data.chunks_exact(size).collect();
            for &e in &lost_parity {
                let out = &mut parity[(e - k) * size..(e - k + 1) * size];
                encoder.encode_parity_into(e - k, &data_shards, out);
            }
        }

        Ok(())
    }

    /// Fill in the missing entries of an owned shard list.
    ///
    /// `shards` must hold `k + m` slots; present shards must share one length.
    pub fn reconstruct(&self, shards: &mut [Option<Vec<u8>>]) -> Result<()> {
        let total = self.generator.total_shards();
        if shards.len() != total {
            return Err(FecError::ShardCount {
                expected: total,
                got: shards.len(),
            });
        }

        let present: Vec<bool> = shards.iter().map(Option::is_some).collect();
        let erased = ErasureSet::from_present(&present);
        if erased.len() > self.generator.parity_shards() {
            return Err(FecError::UnrecoverableErasure {
                erased: erased.len(),
                parity: self.generator.parity_shards(),
            });
        }

        let size = shards.iter().flatten().map(Vec::len).next().unwrap_or(0);
        if let Some((index, bytes)) = shards
            .iter()
            .enumerate()
            .find_map(|(i, slot)| slot.as_ref().filter(|b| b.len() != size).map(|b| (i, b)))
        {
            return Err(FecError::ShardLength {
                index,
                len: bytes.len(),
                expected: size,
            });
        }
        if erased.is_empty() {
            return Ok(());
        }

        let mut group = vec![0u8; region_len(total, size)?];
        for (index, slot) in shards.iter().enumerate() {
            if let Some(bytes) = slot {
                shard_mut(&mut group, size, index).copy_from_slice(bytes);
            }
        }

        if size > 0 {
            self.reconstruct_group(size, &mut group, &erased)?;
        }

        for index in erased.iter() {
            shards[index] = Some(shard(&group, size, index).to_vec());
        }
        Ok(())
    }

    /// Whether the parity region of `group` matches its data region
    pub fn verify(&self, size: usize, group: &[u8]) -> Result<bool> {
        self.check_buffer(size, group.len())?;
        let k = self.generator.data_shards();
        let encoder = FecEncoder::with_generator(Arc::clone(&self.generator));
        let expected = encoder.encode_group(&group[..k * size], size)?;
        Ok(expected == group)
    }
}

impl Decoder for FecDecoder {
    fn data_shards(&self) -> usize {
        self.generator.data_shards()
    }

    fn parity_shards(&self) -> usize {
        self.generator.parity_shards()
    }

    fn decode_in_place(&self, size: usize, group: &mut [u8], erasures: &[usize]) -> Result<()> {
        self.check_buffer(size, group.len())?;
        let erased = self.check_erasures(erasures)?;
        if erased.is_empty() || size == 0 {
            return Ok(());
        }
        self.reconstruct_group(size, group, &erased)
    }
}

#[inline]
fn shard(group: &[u8], size: usize, index: usize) -> &[u8] {
    &group[index * size..(index + 1) * size]
}

#[inline]
fn shard_mut(group: &mut [u8], size: usize, index: usize) -> &mut [u8] {
    &mut group[index * size..(index + 1) * size]
}

/// Reconstruct a `(k + m) * size` group buffer with the given shards erased
pub fn decode(
    data_shards: usize,
    parity_shards: usize,
    size: usize,
    group: &[u8],
    erasures: &[usize],
) -> Result<Vec<u8>> {
    FecDecoder::new(data_shards, parity_shards)?.decode(size, group, erasures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::traits::FecErrorKind;

    fn sample_group(k: usize, m: usize, size: usize) -> Vec<u8> {
        let region: Vec<u8> = (0..k * size)
            .map(|i| (i as u8).wrapping_mul(151).wrapping_add(17))
            .collect();
        FecEncoder::new(k, m)
            .unwrap()
            .encode_group(&region, size)
            .unwrap()
    }

    fn erase(group: &[u8], size: usize, erasures: &[usize]) -> Vec<u8> {
        let mut out = group.to_vec();
        for &e in erasures {
            out[e * size..(e + 1) * size].fill(0);
        }
        out
    }

    #[test]
    fn test_decode_without_erasures_returns_input() {
        let group = sample_group(4, 2, 8);
        assert_eq!(decode(4, 2, 8, &group, &[]).unwrap(), group);

        // Placeholder bytes are passed through untouched when nothing is erased.
        let garbage = vec![0xeeu8; 48];
        assert_eq!(decode(4, 2, 8, &garbage, &[]).unwrap(), garbage);
    }

    #[test]
    fn test_decode_single_data_erasure() {
        let group = sample_group(6, 1, 32);
        let damaged = erase(&group, 32, &[3]);
        assert_ne!(damaged, group);
        assert_eq!(decode(6, 1, 32, &damaged, &[3]).unwrap(), group);
    }

    #[test]
    fn test_decode_parity_only_erasures() {
        let group = sample_group(5, 3, 16);
        let damaged = erase(&group, 16, &[5, 7]);
        assert_eq!(decode(5, 3, 16, &damaged, &[7, 5]).unwrap(), group);
    }

    #[test]
    fn test_decode_mixed_erasures_every_pattern() {
        let (k, m, size) = (4, 3, 10);
        let group = sample_group(k, m, size);
        let n = k + m;
        for a in 0..n {
            for b in (a + 1)..n {
                for c in (b + 1)..n {
                    let erasures = [c, a, b];
                    let damaged = erase(&group, size, &erasures);
                    let decoded = decode(k, m, size, &damaged, &erasures).unwrap();
                    assert_eq!(decoded, group, "erasures {erasures:?}");
                }
            }
        }
    }

    #[test]
    fn test_decode_wrong_buffer_length() {
        let err = decode(3, 1, 4, &[0u8; 15], &[0]).unwrap_err();
        assert_eq!(
            err,
            FecError::BufferLength {
                len: 15,
                expected: 16
            }
        );
        assert_eq!(err.kind(), FecErrorKind::InvalidInput);
    }

    #[test]
    fn test_decode_oversized_shard_size() {
        let err = decode(2, 1, usize::MAX / 2, &[], &[]).unwrap_err();
        assert_eq!(
            err,
            FecError::SizeOverflow {
                shards: 3,
                size: usize::MAX / 2
            }
        );
        assert_eq!(err.kind(), FecErrorKind::InvalidInput);

        // 2 * 2^63 wraps to zero; an empty buffer must still be rejected.
        let decoder = FecDecoder::new(1, 1).unwrap();
        let size = 1usize << (usize::BITS - 1);
        assert!(matches!(
            decoder.verify(size, &[]),
            Err(FecError::SizeOverflow { shards: 2, .. })
        ));
    }

    #[test]
    fn test_decode_index_out_of_range() {
        let group = sample_group(3, 2, 4);
        let err = decode(3, 2, 4, &group, &[5]).unwrap_err();
        assert_eq!(err, FecError::InvalidIndex { index: 5, total: 5 });
        assert_eq!(err.kind(), FecErrorKind::InvalidIndex);
    }

    #[test]
    fn test_decode_duplicate_index() {
        let group = sample_group(3, 2, 4);
        let err = decode(3, 2, 4, &group, &[1, 1]).unwrap_err();
        assert_eq!(err.kind(), FecErrorKind::InvalidIndex);
    }

    #[test]
    fn test_decode_too_many_erasures() {
        let group = sample_group(3, 2, 4);
        let err = decode(3, 2, 4, &group, &[0, 1, 4]).unwrap_err();
        assert_eq!(
            err,
            FecError::UnrecoverableErasure {
                erased: 3,
                parity: 2
            }
        );
        assert_eq!(err.kind(), FecErrorKind::UnrecoverableErasure);
    }

    #[test]
    fn test_index_checked_before_erasure_count() {
        let group = sample_group(3, 2, 4);
        let err = decode(3, 2, 4, &group, &[0, 1, 9]).unwrap_err();
        assert_eq!(err, FecError::InvalidIndex { index: 9, total: 5 });
        assert_eq!(err.kind(), FecErrorKind::InvalidIndex);
    }

    #[test]
    fn test_zero_parity_rejects_any_erasure() {
        let group = sample_group(3, 0, 4);
        assert!(matches!(
            decode(3, 0, 4, &group, &[0]),
            Err(FecError::UnrecoverableErasure { .. })
        ));
        assert_eq!(decode(3, 0, 4, &group, &[]).unwrap(), group);
    }

    #[test]
    fn test_failed_decode_leaves_buffer_untouched() {
        let decoder = FecDecoder::new(3, 1).unwrap();
        let mut group = vec![0x42u8; 16];
        let before = group.clone();
        assert!(decoder.decode_in_place(4, &mut group, &[0, 1]).is_err());
        assert_eq!(group, before);
    }

    #[test]
    fn test_decode_in_place() {
        let decoder = FecDecoder::new(4, 2).unwrap();
        let group = sample_group(4, 2, 12);
        let mut damaged = erase(&group, 12, &[0, 5]);
        decoder.decode_in_place(12, &mut damaged, &[0, 5]).unwrap();
        assert_eq!(damaged, group);
    }

    #[test]
    fn test_reconstruct_shard_list() {
        let (k, m, size) = (4, 2, 6);
        let group = sample_group(k, m, size);
        let original: Vec<Vec<u8>> = group.chunks(size).map(<[u8]>::to_vec).collect();

        let mut shards: Vec<Option<Vec<u8>>> = original.iter().cloned().map(Some).collect();
        shards[1] = None;
        shards[4] = None;

        let decoder = FecDecoder::new(k, m).unwrap();
        decoder.reconstruct(&mut shards).unwrap();
        let rebuilt: Vec<Vec<u8>> = shards.into_iter().map(Option::unwrap).collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_reconstruct_errors() {
        let decoder = FecDecoder::new(2, 1).unwrap();

        let mut short: Vec<Option<Vec<u8>>> = vec![Some(vec![1]), None];
        assert!(matches!(
            decoder.reconstruct(&mut short),
            Err(FecError::ShardCount { .. })
        ));

        let mut lossy: Vec<Option<Vec<u8>>> = vec![Some(vec![1]), None, None];
        assert!(matches!(
            decoder.reconstruct(&mut lossy),
            Err(FecError::UnrecoverableErasure { .. })
        ));

        let mut uneven: Vec<Option<Vec<u8>>> = vec![Some(vec![1, 2]), Some(vec![3]), None];
        assert!(matches!(
            decoder.reconstruct(&mut uneven),
            Err(FecError::ShardLength { index: 1, .. })
        ));

        // Nothing missing, but the lengths still disagree.
        let mut complete: Vec<Option<Vec<u8>>> =
            vec![Some(vec![1, 2]), Some(vec![3]), Some(vec![4])];
        assert_eq!(
            decoder.reconstruct(&mut complete),
            Err(FecError::ShardLength {
                index: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_verify() {
        let decoder = FecDecoder::new(3, 2).unwrap();
        let mut group = sample_group(3, 2, 8);
        assert!(decoder.verify(8, &group).unwrap());

        group[3] ^= 0x01;
        assert!(!decoder.verify(8, &group).unwrap());
        assert!(decoder.verify(8, &group[..39]).is_err());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let group = sample_group(5, 2, 20);
        let damaged = erase(&group, 20, &[2, 6]);
        let a = decode(5, 2, 20, &damaged, &[2, 6]).unwrap();
        let b = decode(5, 2, 20, &damaged, &[6, 2]).unwrap();
        assert_eq!(a, b);
    }
}
