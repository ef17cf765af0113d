// Author: Lukas Bower
// Purpose: Provide external term format types and codec primitives for host tools.
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![no_std]

//! External term format types and codec primitives for exchanging structured
//! values with a remote Erlang-style process over a pipe or socket. Transport
//! is the caller's concern; this crate only converts terms to bytes and back.

extern crate alloc;

#[cfg(test)]
extern crate std;

mod batch;
mod codec;
mod fuzz;
mod types;

pub use batch::StreamIter;
pub use codec::{decode_one, decode_term, encode_term, Codec};
pub use fuzz::fuzz_decode;
pub use types::*;
