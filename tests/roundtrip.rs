//! Randomized round trips over generated charsets and inputs.

use aces::MAX_CHUNK_SIZE;
use aces::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A charset of `len` distinct symbols mixing ASCII, CJK and emoji.
fn random_charset(rng: &mut StdRng, len: usize) -> Charset {
    let mut pool: Vec<char> = ('!'..='~')
        .chain('\u{4e00}'..='\u{4e7f}')
        .chain('\u{1f600}'..='\u{1f64f}')
        .collect();
    pool.shuffle(rng);
    pool.truncate(len);
    Charset::new(pool).unwrap()
}

fn random_bytes(rng: &mut StdRng, max_len: usize) -> Vec<u8> {
    let len = rng.random_range(0..=max_len);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

fn round_trip(coding: &Coding, data: &[u8]) {
    let encoded = encode(data, coding);
    let decoded = decode(&encoded, coding).unwrap();
    assert_eq!(
        decoded,
        data,
        "len {} base {} mode {:?}",
        data.len(),
        coding.charset().len(),
        coding.mode()
    );
}

#[test]
fn test_random_charsets_auto_mode() {
    let mut rng = StdRng::seed_from_u64(0xACE5);
    for _ in 0..200 {
        let len = rng.random_range(2..=256);
        let coding = Coding::new(random_charset(&mut rng, len)).unwrap();
        let data = random_bytes(&mut rng, 300);
        round_trip(&coding, &data);
    }
}

#[test]
fn test_random_chunk_sizes() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let len = rng.random_range(2..=200);
        let config = CodingConfig::default()
            .with_mode(CodingMode::Chunked)
            .with_chunk_size(rng.random_range(1..=MAX_CHUNK_SIZE))
            .with_buffer_size(rng.random_range(1..=4096));
        let coding = Coding::with_config(random_charset(&mut rng, len), &config).unwrap();
        let data = random_bytes(&mut rng, 500);
        round_trip(&coding, &data);
    }
}

#[test]
fn test_random_packed_buffer_sizes() {
    let mut rng = StdRng::seed_from_u64(42);
    for bits in 1..=8u32 {
        let charset = random_charset(&mut rng, 1 << bits);
        for _ in 0..20 {
            let config = CodingConfig::default().with_buffer_size(rng.random_range(1..=2048));
            let coding = Coding::with_config(charset.clone(), &config).unwrap();
            assert_eq!(coding.mode(), CodingMode::Packed);
            let data = random_bytes(&mut rng, 3000);
            round_trip(&coding, &data);
        }
    }
}

#[test]
fn test_random_static_mode() {
    let mut rng = StdRng::seed_from_u64(58);
    for _ in 0..50 {
        let len = rng.random_range(2..=100);
        let config = CodingConfig::default().with_mode(CodingMode::Static);
        let coding = Coding::with_config(random_charset(&mut rng, len), &config).unwrap();
        let mut data = random_bytes(&mut rng, 120);
        // leading zero bytes are the interesting case here
        let zeros = rng.random_range(0..4);
        data.splice(0..0, std::iter::repeat_n(0u8, zeros));
        round_trip(&coding, &data);
    }
}

#[test]
fn test_trickled_streams_match_in_memory() {
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl std::io::Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    let mut rng = StdRng::seed_from_u64(3);
    for len in [3usize, 8, 10, 64, 100] {
        let coding = Coding::new(random_charset(&mut rng, len)).unwrap();
        let data = random_bytes(&mut rng, 2000);
        let expected = encode(&data, &coding);

        let mut encoded = Vec::new();
        StreamingEncoder::new(&coding, &mut encoded)
            .encode(Trickle { data: &data, step: 3 })
            .unwrap();
        assert_eq!(String::from_utf8(encoded.clone()).unwrap(), expected);

        let mut decoded = Vec::new();
        StreamingDecoder::new(&coding, &mut decoded)
            .decode(Trickle {
                data: &encoded,
                step: 1,
            })
            .unwrap();
        assert_eq!(decoded, data);
    }
}
