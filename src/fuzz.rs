// Author: Lukas Bower
// Purpose: Provide a fuzz corpus harness for term decoding.

//! Fuzz corpus harnesses for term decoding.

use crate::codec::{decode_one, Codec};

/// Exercise decoder paths on arbitrary corpus bytes.
pub fn fuzz_decode(bytes: &[u8]) {
    let codec = Codec;
    let _ = codec.decode(bytes);
    let _ = decode_one(bytes);
}
