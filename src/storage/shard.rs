use crate::field::{gf256, Gf256};
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// A shard is one fixed-size unit of a data/parity group
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Shard {
    data: Vec<u8>,
}

impl Shard {
    /// Create a shard of `size` zero bytes
    pub fn zero(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    /// Wrap existing bytes
    pub fn from_data(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Copy a slice into a new shard
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            data: slice.to_vec(),
        }
    }

    /// Size of the shard in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the shard holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the underlying data as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take the underlying bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Add another shard to this one (element-wise XOR)
    pub fn add_assign(&mut self, other: &[u8]) {
        debug_assert_eq!(self.data.len(), other.len());
        for (a, b) in self.data.iter_mut().zip(other) {
            *a ^= *b;
        }
    }

    /// `self += coeff * other`, byte by byte
    pub fn add_scaled(&mut self, coeff: Gf256, other: &[u8]) {
        gf256::mul_add(coeff.to_byte(), other, &mut self.data);
    }

    /// Scale this shard by a field element
    pub fn scale(&mut self, scalar: Gf256) {
        gf256::scale(scalar.to_byte(), &mut self.data);
    }

    /// Create a copy of this shard scaled by a field element
    pub fn scaled(&self, scalar: Gf256) -> Self {
        let mut result = self.clone();
        result.scale(scalar);
        result
    }

    /// Linear combination `Σ coeffs[i] * shards[i]`
    pub fn combine<T: AsRef<[u8]>>(coeffs: &[Gf256], shards: &[T], size: usize) -> Self {
        let mut out = Self::zero(size);
        for (coeff, shard) in coeffs.iter().zip(shards) {
            out.add_scaled(*coeff, shard.as_ref());
        }
        out
    }
}

impl Deref for Shard {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for Shard {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Index<usize> for Shard {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for Shard {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl From<Vec<u8>> for Shard {
    fn from(data: Vec<u8>) -> Self {
        Self::from_data(data)
    }
}

impl From<Shard> for Vec<u8> {
    fn from(shard: Shard) -> Self {
        shard.into_inner()
    }
}

impl AsRef<[u8]> for Shard {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for Shard {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
