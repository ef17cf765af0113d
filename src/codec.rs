// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Encode and decode external format terms without std dependencies.
// Author: Lukas Bower

//! Encode/decode routines for the external term format.

use alloc::string::String;
use alloc::vec::Vec;
use core::str;

use log::trace;

use crate::types::*;

/// Wire tags for the supported term variants.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermTag {
    Float = 70,
    SmallInteger = 97,
    Integer = 98,
    SmallTuple = 104,
    LargeTuple = 105,
    Nil = 106,
    List = 108,
    Binary = 109,
    Map = 116,
    Atom = 119,
}

impl TryFrom<u8> for TermTag {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use TermTag::*;
        Ok(match value {
            70 => Float,
            97 => SmallInteger,
            98 => Integer,
            104 => SmallTuple,
            105 => LargeTuple,
            106 => Nil,
            108 => List,
            109 => Binary,
            116 => Map,
            119 => Atom,
            other => return Err(CodecError::UnsupportedTag(other)),
        })
    }
}

/// Encode/decode helper shared by transports and tests.
pub struct Codec;

impl Codec {
    /// Encode a term into its wire representation.
    ///
    /// `include_header` emits the leading version marker and is only set by
    /// the outermost call; child terms are always encoded without it.
    pub fn encode(&self, term: &Term, include_header: bool) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Vec::new();
        if include_header {
            buffer.push(VERSION_MAGIC);
        }
        put_term(&mut buffer, term)?;
        trace!("encoded term into {} bytes", buffer.len());
        Ok(buffer)
    }

    /// Decode a complete header-prefixed term from `bytes`.
    ///
    /// Trailing bytes after the first complete term are ignored; callers that
    /// need the consumed length use [`decode_one`] on the header-less tail.
    pub fn decode(&self, bytes: &[u8]) -> Result<Term, CodecError> {
        trace!("decoding {} byte buffer", bytes.len());
        let Some((&version, rest)) = bytes.split_first() else {
            return Err(CodecError::EmptyInput);
        };
        if version != VERSION_MAGIC {
            return Err(CodecError::InvalidVersion(version));
        }
        let mut cursor = Cursor::new(rest);
        read_term(&mut cursor)
    }

    /// Decode one header-less term, reporting how many bytes it consumed.
    pub fn decode_one(&self, bytes: &[u8]) -> Result<(Term, usize), CodecError> {
        let mut cursor = Cursor::new(bytes);
        let term = read_term(&mut cursor)?;
        Ok((term, cursor.consumed()))
    }
}

/// Encode a term into its wire representation using the default codec.
pub fn encode_term(term: &Term, include_header: bool) -> Result<Vec<u8>, CodecError> {
    Codec.encode(term, include_header)
}

/// Decode a header-prefixed term from `bytes` using the default codec.
pub fn decode_term(bytes: &[u8]) -> Result<Term, CodecError> {
    Codec.decode(bytes)
}

/// Decode one header-less term and report the bytes consumed.
pub fn decode_one(bytes: &[u8]) -> Result<(Term, usize), CodecError> {
    Codec.decode_one(bytes)
}

fn put_term(buffer: &mut Vec<u8>, term: &Term) -> Result<(), CodecError> {
    match term {
        Term::Atom(name) => put_atom(buffer, name),
        Term::Integer(value) => {
            put_integer(buffer, *value);
            Ok(())
        }
        Term::Float(value) => {
            buffer.push(TermTag::Float as u8);
            buffer.extend_from_slice(&value.to_bits().to_be_bytes());
            Ok(())
        }
        Term::Tuple(elements) => put_tuple(buffer, elements),
        Term::List(elements) => {
            buffer.push(TermTag::List as u8);
            buffer.extend_from_slice(&(elements.len() as u32).to_be_bytes());
            for element in elements {
                put_term(buffer, element)?;
            }
            Ok(())
        }
        Term::Binary(bytes) => {
            buffer.push(TermTag::Binary as u8);
            buffer.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            buffer.extend_from_slice(bytes);
            Ok(())
        }
        Term::Map(pairs) => put_map(buffer, pairs),
        Term::Nil => {
            buffer.push(TermTag::Nil as u8);
            Ok(())
        }
    }
}

fn put_atom(buffer: &mut Vec<u8>, name: &str) -> Result<(), CodecError> {
    let bytes = name.as_bytes();
    if bytes.len() > MAX_ATOM_LEN {
        return Err(CodecError::AtomTooLong { len: bytes.len() });
    }
    buffer.push(TermTag::Atom as u8);
    buffer.push(bytes.len() as u8);
    buffer.extend_from_slice(bytes);
    Ok(())
}

fn put_integer(buffer: &mut Vec<u8>, value: i32) {
    if (0..=SMALL_INTEGER_MAX).contains(&value) {
        buffer.push(TermTag::SmallInteger as u8);
        buffer.push(value as u8);
    } else {
        buffer.push(TermTag::Integer as u8);
        buffer.extend_from_slice(&value.to_be_bytes());
    }
}

fn put_tuple(buffer: &mut Vec<u8>, elements: &[Term]) -> Result<(), CodecError> {
    if elements.len() <= SMALL_TUPLE_MAX_ARITY {
        buffer.push(TermTag::SmallTuple as u8);
        buffer.push(elements.len() as u8);
    } else {
        buffer.push(TermTag::LargeTuple as u8);
        buffer.extend_from_slice(&(elements.len() as u32).to_be_bytes());
    }
    for element in elements {
        put_term(buffer, element)?;
    }
    Ok(())
}

fn put_map(buffer: &mut Vec<u8>, pairs: &[(Term, Term)]) -> Result<(), CodecError> {
    buffer.push(TermTag::Map as u8);
    buffer.extend_from_slice(&(pairs.len() as u32).to_be_bytes());
    for (key, value) in pairs {
        if key.is_nil() {
            return Err(CodecError::NilMapKey);
        }
        put_term(buffer, key)?;
        put_term(buffer, value)?;
    }
    Ok(())
}

fn read_term(cursor: &mut Cursor<'_>) -> Result<Term, CodecError> {
    let tag = TermTag::try_from(read_u8(cursor, "term tag")?)?;
    match tag {
        TermTag::Atom => {
            let len = read_u8(cursor, "atom length")? as usize;
            let bytes = cursor
                .take(len)
                .ok_or(CodecError::InsufficientData { field: "atom text" })?;
            let text = str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
            Ok(Term::Atom(String::from(text)))
        }
        TermTag::SmallInteger => {
            let value = read_u8(cursor, "small integer value")?;
            Ok(Term::Integer(i32::from(value)))
        }
        TermTag::Integer => {
            let value = read_i32(cursor, "integer value")?;
            Ok(Term::Integer(value))
        }
        TermTag::Float => {
            let bits = read_u64(cursor, "float value")?;
            Ok(Term::Float(f64::from_bits(bits)))
        }
        TermTag::SmallTuple => {
            let arity = read_u8(cursor, "tuple arity")? as usize;
            read_tuple(cursor, arity)
        }
        TermTag::LargeTuple => {
            let arity = read_u32(cursor, "tuple arity")? as usize;
            read_tuple(cursor, arity)
        }
        TermTag::Nil => Ok(Term::Nil),
        TermTag::List => {
            let count = read_u32(cursor, "list length")? as usize;
            // The wire count is untrusted; reserve no more than the buffer
            // could still hold.
            let mut elements = Vec::with_capacity(count.min(cursor.remaining()));
            for _ in 0..count {
                elements.push(read_term(cursor)?);
            }
            Ok(Term::List(elements))
        }
        TermTag::Binary => {
            let len = read_u32(cursor, "binary length")? as usize;
            let bytes = cursor.take(len).ok_or(CodecError::InsufficientData {
                field: "binary payload",
            })?;
            Ok(Term::Binary(bytes.to_vec()))
        }
        TermTag::Map => {
            let count = read_u32(cursor, "map length")? as usize;
            let mut pairs = Vec::with_capacity(count.min(cursor.remaining()));
            for _ in 0..count {
                let key = read_term(cursor)?;
                // Checked on decode as well; the peer's encoder is not trusted.
                if key.is_nil() {
                    return Err(CodecError::NilMapKey);
                }
                let value = read_term(cursor)?;
                pairs.push((key, value));
            }
            Ok(Term::Map(pairs))
        }
    }
}

fn read_tuple(cursor: &mut Cursor<'_>, arity: usize) -> Result<Term, CodecError> {
    let mut elements = Vec::with_capacity(arity.min(cursor.remaining()));
    for _ in 0..arity {
        elements.push(read_term(cursor)?);
    }
    Ok(Term::Tuple(elements))
}

fn read_u8(cursor: &mut Cursor<'_>, field: &'static str) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| CodecError::InsufficientData { field })?;
    Ok(buf[0])
}

fn read_i32(cursor: &mut Cursor<'_>, field: &'static str) -> Result<i32, CodecError> {
    let mut buf = [0u8; 4];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| CodecError::InsufficientData { field })?;
    Ok(i32::from_be_bytes(buf))
}

fn read_u32(cursor: &mut Cursor<'_>, field: &'static str) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| CodecError::InsufficientData { field })?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u64(cursor: &mut Cursor<'_>, field: &'static str) -> Result<u64, CodecError> {
    let mut buf = [0u8; 8];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| CodecError::InsufficientData { field })?;
    Ok(u64::from_be_bytes(buf))
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn consumed(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn read_exact(&mut self, out: &mut [u8]) -> Result<(), ()> {
        let end = self.pos.saturating_add(out.len());
        if end > self.buf.len() {
            return Err(());
        }
        out.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end > self.buf.len() {
            return None;
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Some(slice)
    }
}
