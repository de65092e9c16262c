// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Consensus-encodable types.
//!
//! This is the narrow slice of `bitcoincash::consensus::encode` that the
//! operation codec needs: a pair of traits over `crate::io::{Read, Write}`
//! and the little-endian integer primitives `read_data_size` builds on.
//! It intentionally does not reimplement the rest of that module (`VarInt`,
//! `Vec<T>`/`String` framing, checksum helpers, …) — those exist to
//! serialize the surrounding `script`/`transaction`/`block` aggregate,
//! which is out of scope here (see `SPEC_FULL.md`).

use core::fmt;

use crate::io::{self, Read, Write};

/// Encoding or decoding error.
///
/// Every fallible [`Decodable`] implementation in this crate reports
/// through this single type; callers that only want `Operation`'s
/// simpler "valid or not" contract never see it (see `Operation::from_reader`).
#[derive(Debug)]
pub enum Error {
    /// A [`Read`]/[`Write`] call failed, including running out of bytes
    /// before a value was fully read.
    Io(io::Error),
    /// A 4-byte push-data length prefix requested more bytes than the
    /// caller's configured ceiling allows.
    OversizedPush {
        /// The length the prefix claimed.
        requested: u64,
        /// The ceiling the caller configured.
        max: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "I/O error: {}", e),
            Error::OversizedPush { requested, max } => write!(
                f,
                "push-data length {} exceeds configured maximum {}",
                requested, max
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::OversizedPush { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::Io(e) }
}

/// A type, part of the consensus-critical wire format, that can be
/// written to a [`Write`].
pub trait Encodable {
    /// Writes `self` to `writer`, returning the number of bytes written.
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize>;
}

/// A type, part of the consensus-critical wire format, that can be read
/// from a [`Read`].
pub trait Decodable: Sized {
    /// Reads a value of `Self` from `reader`.
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, Error>;
}

macro_rules! impl_int_encodable {
    ($ty:ident, $size:expr) => {
        impl Decodable for $ty {
            #[inline]
            fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, Error> {
                let mut buf = [0u8; $size];
                reader.read_exact(&mut buf).map_err(Error::Io)?;
                Ok($ty::from_le_bytes(buf))
            }
        }

        impl Encodable for $ty {
            #[inline]
            fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
                writer.write_all(&self.to_le_bytes())?;
                Ok($size)
            }
        }
    };
}

impl_int_encodable!(u8, 1);
impl_int_encodable!(u16, 2);
impl_int_encodable!(u32, 4);

/// Serializes an encodable object into a `Vec<u8>`.
pub fn serialize<T: Encodable + ?Sized>(data: &T) -> Vec<u8> {
    let mut encoder = Vec::new();
    data.consensus_encode(&mut encoder).expect("in-memory writers do not error");
    encoder
}

/// Deserializes an object from a byte slice, erroring if the slice is not
/// entirely consumed.
pub fn deserialize<T: Decodable>(data: &[u8]) -> Result<T, Error> {
    let (rv, consumed) = deserialize_partial(data)?;
    if consumed == data.len() {
        Ok(rv)
    } else {
        Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "data not consumed entirely",
        )))
    }
}

/// Deserializes part of a byte slice, returning the object and the number
/// of bytes it consumed.
pub fn deserialize_partial<T: Decodable>(data: &[u8]) -> Result<(T, usize), Error> {
    let mut reader = io::Cursor::new(data);
    let rv = T::consensus_decode(&mut reader)?;
    Ok((rv, reader.position() as usize))
}
