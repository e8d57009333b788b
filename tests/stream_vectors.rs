//! Groups captured from a live remote-play video stream.
//!
//! Each packet carries a two byte header ahead of the FEC-protected payload.
//! The payload is the packet minus that header, zero-padded back to the shard
//! size, which is how the receiver lays out a group before decoding.

use shardfec::{decode, encode, Decoder, FecConfig, FecError};

const SHARD_SIZE: usize = 1400;
const HEADER_LEN: usize = 2;

struct Capture {
    k: usize,
    m: usize,
    erasures: &'static [usize],
    raw: &'static [u8],
}

const K6_M1: Capture = Capture {
    k: 6,
    m: 1,
    erasures: &[3],
    raw: include_bytes!("fixtures/group_k6_m1.bin"),
};

const K7_M2: Capture = Capture {
    k: 7,
    m: 2,
    erasures: &[1, 2],
    raw: include_bytes!("fixtures/group_k7_m2.bin"),
};

impl Capture {
    fn total(&self) -> usize {
        self.k + self.m
    }

    fn shards(&self) -> Vec<Vec<u8>> {
        (0..self.total())
            .map(|i| {
                let mut shard = self.raw[i * SHARD_SIZE + HEADER_LEN..(i + 1) * SHARD_SIZE].to_vec();
                shard.resize(SHARD_SIZE, 0);
                shard
            })
            .collect()
    }

    fn group(&self) -> Vec<u8> {
        self.shards().concat()
    }
}

fn erase(group: &[u8], erasures: &[usize]) -> Vec<u8> {
    let mut out = group.to_vec();
    for &e in erasures {
        out[e * SHARD_SIZE..(e + 1) * SHARD_SIZE].fill(0);
    }
    out
}

#[test]
fn test_capture_sizes() {
    assert_eq!(K6_M1.raw.len(), 9800);
    assert_eq!(K7_M2.raw.len(), 12600);
}

#[test]
fn test_decode_captured_groups() {
    for capture in [&K6_M1, &K7_M2] {
        let original = capture.group();
        let damaged = erase(&original, capture.erasures);
        assert_ne!(damaged, original);

        let decoded = decode(capture.k, capture.m, SHARD_SIZE, &damaged, capture.erasures).unwrap();
        assert_eq!(decoded, original, "k={} m={}", capture.k, capture.m);
    }
}

#[test]
fn test_every_single_erasure_k6_m1() {
    let original = K6_M1.group();
    for index in 0..K6_M1.total() {
        let damaged = erase(&original, &[index]);
        let decoded = decode(6, 1, SHARD_SIZE, &damaged, &[index]).unwrap();
        assert_eq!(decoded, original, "erased shard {index}");
    }
}

#[test]
fn test_every_erasure_pair_k7_m2() {
    let original = K7_M2.group();
    let n = K7_M2.total();
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            let damaged = erase(&original, &[a, b]);
            let decoded = decode(7, 2, SHARD_SIZE, &damaged, &[a, b]).unwrap();
            assert_eq!(decoded, original, "erased shards {a}, {b}");
        }
    }
}

#[test]
fn test_encoder_reproduces_captured_parity() {
    for capture in [&K6_M1, &K7_M2] {
        let shards = capture.shards();
        let parity = encode(capture.k, capture.m, &shards[..capture.k]).unwrap();
        assert_eq!(parity.as_slice(), &shards[capture.k..]);
    }
}

#[test]
fn test_captured_groups_verify() {
    for capture in [&K6_M1, &K7_M2] {
        let config = FecConfig::new(capture.k, capture.m, SHARD_SIZE);
        let decoder = config.decoder().unwrap();
        assert!(decoder.verify(SHARD_SIZE, &capture.group()).unwrap());
        assert_eq!(decoder.total_shards(), capture.total());
    }
}

#[test]
fn test_three_erasures_k7_m2_fail() {
    let original = K7_M2.group();
    let damaged = erase(&original, &[0, 4, 8]);
    assert_eq!(
        decode(7, 2, SHARD_SIZE, &damaged, &[0, 4, 8]),
        Err(FecError::UnrecoverableErasure {
            erased: 3,
            parity: 2
        })
    );
}

#[test]
fn test_assembler_with_captured_packets() {
    let config = FecConfig::new(7, 2, SHARD_SIZE);
    let mut assembler = config.assembler().unwrap();
    for (index, packet) in K7_M2.raw.chunks(SHARD_SIZE).enumerate() {
        if index == 0 || index == 5 {
            continue;
        }
        assembler.insert(index, &packet[HEADER_LEN..]).unwrap();
    }

    let data = assembler.finish_data(&config.decoder().unwrap()).unwrap();
    assert_eq!(data, K7_M2.group()[..config.data_len()]);
}
