// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Fuzz-style regression tests for term decoding.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::panic::{catch_unwind, AssertUnwindSafe};

use erlterm_codec::{decode_term, encode_term, fuzz_decode, Term};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn iterations() -> usize {
    std::env::var("ERLTERM_FUZZ_ITERS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(512)
}

#[test]
fn random_terms_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x7E51_u64);
    for _ in 0..iterations() {
        let term = random_term(&mut rng, 3);
        let encoded = encode_term(&term, true).expect("encode random term");
        assert_eq!(decode_term(&encoded).as_ref(), Ok(&term));
    }
}

#[test]
fn fuzz_decode_never_panics() {
    let mut rng = StdRng::seed_from_u64(0xC0DEC0DE_u64);
    for _ in 0..iterations() {
        let mut frame = encode_term(&random_term(&mut rng, 3), true).expect("encode random term");
        mutate_frame(&mut rng, &mut frame);
        let result = catch_unwind(AssertUnwindSafe(|| fuzz_decode(&frame)));
        assert!(result.is_ok(), "decoder panicked on mutated frame");
    }
}

#[test]
fn arbitrary_bytes_never_panic_the_decoder() {
    let mut rng = StdRng::seed_from_u64(0xBADC0FFE_u64);
    for _ in 0..iterations() {
        let bytes = random_bytes(&mut rng, 64);
        let result = catch_unwind(AssertUnwindSafe(|| fuzz_decode(&bytes)));
        assert!(result.is_ok(), "decoder panicked on arbitrary bytes");
    }
}

fn random_bytes<R: Rng>(rng: &mut R, max_len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; rng.random_range(0..max_len)];
    rng.fill_bytes(&mut bytes);
    bytes
}

fn mutate_frame<R: Rng>(rng: &mut R, frame: &mut Vec<u8>) {
    if frame.len() < 2 {
        return;
    }
    match rng.random_range(0..4) {
        0 => {
            let index = rng.random_range(0..frame.len());
            frame[index] ^= rng.random_range(1..=0xFF);
        }
        1 => {
            let new_len = rng.random_range(1..frame.len());
            frame.truncate(new_len);
        }
        2 => {
            let tail_len = rng.random_range(1..16);
            let mut tail = vec![0u8; tail_len];
            rng.fill_bytes(&mut tail);
            frame.extend_from_slice(&tail);
        }
        _ => {
            frame[1] = rng.random();
        }
    }
}

fn random_term<R: Rng>(rng: &mut R, depth: u8) -> Term {
    let pick = if depth == 0 {
        rng.random_range(0..5)
    } else {
        rng.random_range(0..8)
    };
    match pick {
        0 => Term::Atom(random_atom(rng, 8)),
        1 => Term::Integer(rng.random()),
        2 => Term::Float(rng.random::<f64>() * 1.0e6 - 5.0e5),
        3 => {
            let mut bytes = vec![0u8; rng.random_range(0..16)];
            rng.fill_bytes(&mut bytes);
            Term::Binary(bytes)
        }
        4 => Term::Nil,
        5 => Term::Tuple(
            (0..rng.random_range(0..4))
                .map(|_| random_term(rng, depth - 1))
                .collect(),
        ),
        6 => Term::List(
            (0..rng.random_range(0..4))
                .map(|_| random_term(rng, depth - 1))
                .collect(),
        ),
        _ => Term::Map(
            (0..rng.random_range(0..3))
                .map(|_| {
                    // Keys stay scalar and non-nil; the codec rejects Nil keys.
                    let key = if rng.random_bool(0.5) {
                        Term::Atom(random_atom(rng, 5))
                    } else {
                        Term::Integer(rng.random())
                    };
                    (key, random_term(rng, depth - 1))
                })
                .collect(),
        ),
    }
}

fn random_atom<R: Rng>(rng: &mut R, max_len: usize) -> String {
    let len = rng.random_range(0..=max_len);
    (0..len)
        .map(|_| {
            const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}
