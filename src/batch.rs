// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide stream iterators over concatenated encoded terms.
// Author: Lukas Bower

//! Iterators over buffers carrying several encoded terms back-to-back.

use crate::codec::decode_one;
use crate::types::{CodecError, Term, VERSION_MAGIC};

/// Iterator over a buffer of concatenated header-prefixed terms, the shape a
/// pipe delivers when the remote side writes several terms in one burst.
///
/// The wire format carries no outer frame length, so each `next()` decodes a
/// full term to discover where the following one starts. Iteration ends at
/// the end of the buffer and stops after the first error.
#[derive(Debug, Clone)]
pub struct StreamIter<'a> {
    buffer: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> StreamIter<'a> {
    /// Create a new stream iterator over `buffer`.
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for StreamIter<'a> {
    type Item = Result<(Term, &'a [u8]), CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buffer.len() {
            return None;
        }
        let start = self.offset;
        let version = self.buffer[start];
        if version != VERSION_MAGIC {
            self.failed = true;
            return Some(Err(CodecError::InvalidVersion(version)));
        }
        match decode_one(&self.buffer[start + 1..]) {
            Ok((term, consumed)) => {
                let end = start + 1 + consumed;
                self.offset = end;
                Some(Ok((term, &self.buffer[start..end])))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
