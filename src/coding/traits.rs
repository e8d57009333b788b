use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = FecError> = std::result::Result<T, E>;

/// Error type for encoding and decoding operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FecError {
    #[error("invalid code parameters: k={data_shards}, m={parity_shards}")]
    InvalidParameters {
        data_shards: usize,
        parity_shards: usize,
    },

    #[error("expected {expected} shards, got {got}")]
    ShardCount { expected: usize, got: usize },

    #[error("shard {index} is {len} bytes, expected {expected}")]
    ShardLength {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("group buffer is {len} bytes, expected {expected}")]
    BufferLength { len: usize, expected: usize },

    #[error("{shards} shards of {size} bytes do not fit in memory")]
    SizeOverflow { shards: usize, size: usize },

    #[error("shard index {index} out of range for a group of {total}")]
    InvalidIndex { index: usize, total: usize },

    #[error("shard index {index} listed more than once")]
    DuplicateIndex { index: usize },

    #[error("{erased} shards erased but only {parity} parity shards available")]
    UnrecoverableErasure { erased: usize, parity: usize },

    #[error("singular matrix - generator rows are not independent")]
    SingularMatrix,

    #[error("cannot multiply a {left_rows}x{left_cols} matrix by a {right_rows}x{right_cols} matrix")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("attempted to invert zero in GF(256)")]
    ZeroInverse,
}

/// `shards * size` in bytes, or [`FecError::SizeOverflow`]
pub(crate) fn region_len(shards: usize, size: usize) -> Result<usize> {
    shards
        .checked_mul(size)
        .ok_or(FecError::SizeOverflow { shards, size })
}

/// Coarse classification of [`FecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FecErrorKind {
    /// Malformed shapes: parameters, shard counts, lengths. Caller-fixable.
    InvalidInput,
    /// An erasure index out of range or repeated.
    InvalidIndex,
    /// More shards missing than the redundancy covers.
    UnrecoverableErasure,
    /// Broken arithmetic invariant inside the engine. Always a defect.
    Internal,
}

impl FecError {
    /// Classify this error
    pub fn kind(&self) -> FecErrorKind {
        match self {
            FecError::InvalidParameters { .. }
            | FecError::ShardCount { .. }
            | FecError::ShardLength { .. }
            | FecError::BufferLength { .. }
            | FecError::SizeOverflow { .. } => FecErrorKind::InvalidInput,
            FecError::InvalidIndex { .. } | FecError::DuplicateIndex { .. } => {
                FecErrorKind::InvalidIndex
            }
            FecError::UnrecoverableErasure { .. } => FecErrorKind::UnrecoverableErasure,
            FecError::SingularMatrix
            | FecError::DimensionMismatch { .. }
            | FecError::ZeroInverse => FecErrorKind::Internal,
        }
    }
}

/// Trait for erasure encoders
pub trait Encoder {
    /// Number of data shards (k)
    fn data_shards(&self) -> usize;

    /// Number of parity shards (m)
    fn parity_shards(&self) -> usize;

    /// Produce the parity shards for exactly `k` equal-length data shards
    fn encode<T: AsRef<[u8]>>(&self, data: &[T]) -> Result<Vec<Vec<u8>>>;

    /// Total shards in a group
    fn total_shards(&self) -> usize {
        self.data_shards() + self.parity_shards()
    }
}

/// Trait for erasure decoders
pub trait Decoder {
    /// Number of data shards (k)
    fn data_shards(&self) -> usize;

    /// Number of parity shards (m)
    fn parity_shards(&self) -> usize;

    /// Rebuild the erased shards of a contiguous group buffer in place.
    ///
    /// On error the buffer is left untouched.
    fn decode_in_place(&self, size: usize, group: &mut [u8], erasures: &[usize]) -> Result<()>;

    /// Rebuild the erased shards of a group buffer into a new buffer
    fn decode(&self, size: usize, group: &[u8], erasures: &[usize]) -> Result<Vec<u8>> {
        let mut out = group.to_vec();
        self.decode_in_place(size, &mut out, erasures)?;
        Ok(out)
    }

    /// Total shards in a group
    fn total_shards(&self) -> usize {
        self.data_shards() + self.parity_shards()
    }
}
