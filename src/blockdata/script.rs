// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! A single script operation.
//!
//! `bitcoincash::blockdata::script` carries a `Script` newtype over a byte
//! string plus an `Instructions` iterator that walks it one operation at a
//! time. This crate narrows that down to the iterator's item type alone:
//! [`Operation`], the in-memory form of one opcode plus (for push opcodes)
//! its payload, together with the wire codec and mnemonic text form. There
//! is no `Script` aggregate here — see `SPEC_FULL.md`'s non-goals.

use core::fmt;
use core::str::FromStr;

use hex::{DisplayHex, FromHex};

use crate::blockdata::opcodes::{self, Opcode};
use crate::consensus::encode::{Decodable, Encodable, Error as EncodeError};
use crate::io::{self, Read, Write};

/// Standardness ceiling on a single pushed element, inherited from the
/// reference client (`MAX_SCRIPT_ELEMENT_SIZE`). `Operation` itself never
/// enforces this — [`Operation::is_oversized`] just reports it — since
/// oversized-but-decodable operations are exactly the kind of thing a
/// caller auditing non-standard scripts wants to see rather than have
/// silently rejected.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Default ceiling [`Operation::from_reader`] places on a 4-byte
/// (`OP_PUSHDATA4`) length prefix, in bytes. This is *not* a consensus
/// rule: it exists purely so a reader fed adversarial or corrupt input
/// cannot be made to attempt a multi-gigabyte allocation from four bytes
/// of claimed length. Callers who need a different ceiling (or none —
/// pass `u32::MAX`) should use [`Operation::from_reader_with_limit`].
pub const DEFAULT_MAX_PUSH_LEN: u32 = 10_000_000;

/// Bit of an `active_forks` mask selecting BIP65: once set, `OP_NOP2`'s
/// mnemonic is `checklocktimeverify` rather than `nop2`.
pub const ACTIVE_FORK_CLTV: u32 = 0x1;
/// Bit of an `active_forks` mask selecting BIP112: once set, `OP_NOP3`'s
/// mnemonic is `checksequenceverify` rather than `nop3`.
pub const ACTIVE_FORK_CSV: u32 = 0x2;

/// Whether [`Operation::from_data`] should choose the shortest possible
/// encoding for the given payload (`Yes`) or always use the push-by-length
/// opcode matching the payload's exact length, even where a shorter
/// numeric-push opcode exists (`No`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Minimal {
    /// Fold `[]`, `[0x81]` and `[1..=16]` into their one-byte numeric-push
    /// opcodes instead of a push-by-length encoding.
    Yes,
    /// Always emit the push-by-length opcode that matches `data.len()`.
    No,
}

/// One script operation: either an ordinary opcode, or a push opcode
/// together with the bytes it pushes.
///
/// This is a tagged union rather than the `(code, data, valid)` triple a
/// straight port would produce, so that the representable states line up
/// with the meaningful ones: a non-push opcode or a numeric push can never
/// be constructed carrying a payload, and a corrupt read has no code or
/// data to be inconsistent with anything — it just `Invalid`.
///
/// Equality and ordering on `Operation` only ever look at `(code, data)`
/// (`Invalid`'s are `(0xff, [])`, the same view a decode failure would
/// have produced had it not failed) — see [`Operation::code`] and
/// [`Operation::data`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(actual_serde::Serialize, actual_serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub enum Operation {
    /// Could not be decoded: a short read, or (for the 4-byte prefix) a
    /// length past the caller's configured ceiling.
    Invalid,
    /// An opcode that carries no payload: every non-push opcode, plus the
    /// numeric pushes (`push_negative_1`, `push_0`, `push_positive_1..16`),
    /// which push a value but do not carry it as trailing bytes.
    Op(Opcode),
    /// A push-by-length or length-prefixed push opcode together with its
    /// payload. The payload's length need not match what a minimal
    /// encoding of it would choose — see [`Minimal`].
    Push(Opcode, Box<[u8]>),
}

impl Default for Operation {
    fn default() -> Self { Operation::Invalid }
}

impl Operation {
    /// Builds an operation directly from an opcode, with no payload.
    ///
    /// For an ordinary or numeric-push opcode this is always the
    /// meaningful construction. For a push-by-length or length-prefixed
    /// opcode it constructs a push of zero bytes — a legal (if unusual)
    /// wire encoding, e.g. `push_size_5` built this way round-trips as
    /// `[0x05]` with no trailing payload, not five zero bytes. Callers
    /// wanting an actual payload should use [`Operation::from_data`]
    /// instead.
    pub fn from_opcode(code: Opcode) -> Operation {
        Self::new(code, Vec::new())
    }

    /// Builds a push operation from a literal payload.
    ///
    /// With `minimal = Minimal::Yes`, folds the payload into a numeric
    /// push where one exists (`[]`, `[0x81]`, `[1..=16]`), otherwise picks
    /// the shortest push-by-length opcode for `data.len()`; this never
    /// fails. With `minimal = Minimal::No`, always uses the push-by-length
    /// opcode for the exact length, failing only if `data.len()` exceeds
    /// what any push opcode (even `OP_PUSHDATA4`) can address.
    pub fn from_data(data: Vec<u8>, minimal: Minimal) -> Option<Operation> {
        match minimal {
            Minimal::Yes => {
                let code = opcodes::opcode_from_data(&data);
                let data = if opcodes::is_numeric(code) { Vec::new() } else { data };
                Some(Self::new(code, data))
            }
            Minimal::No => opcodes::opcode_from_size(data.len()).map(|code| Self::new(code, data)),
        }
    }

    /// Reads one operation, collapsing any decode failure into
    /// `Operation::Invalid` rather than an `Err`. Uses
    /// [`DEFAULT_MAX_PUSH_LEN`] as the 4-byte push-length ceiling; use
    /// [`Operation::from_reader_with_limit`] to configure it.
    pub fn from_reader<R: Read>(reader: &mut R) -> Operation {
        Self::from_reader_with_limit(reader, DEFAULT_MAX_PUSH_LEN)
    }

    /// As [`Operation::from_reader`], but with an explicit ceiling on a
    /// 4-byte (`OP_PUSHDATA4`) length prefix. Pass `u32::MAX` to accept
    /// any length the prefix can express.
    pub fn from_reader_with_limit<R: Read>(reader: &mut R, max_push_len: u32) -> Operation {
        match Self::decode_with_limit(reader, max_push_len) {
            Ok(op) => op,
            Err(_) => Operation::Invalid,
        }
    }

    fn decode_with_limit<R: Read>(reader: &mut R, max_push_len: u32) -> Result<Operation, EncodeError> {
        let code = Opcode::from_u8(u8::consensus_decode(reader)?);
        let len = read_data_size(code, reader, max_push_len)?;
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data).map_err(EncodeError::from)?;
        Ok(Self::new(code, data))
    }

    /// Chooses `Op` or `Push` for `(code, data)` so that every code path
    /// above reaches the same representation for the same value: `data`
    /// only survives in the result when `code` is a push-by-length or
    /// length-prefixed opcode, which is also the only case where it can
    /// be non-empty by construction.
    fn new(code: Opcode, data: Vec<u8>) -> Operation {
        if opcodes::is_push(code) && !opcodes::is_numeric(code) {
            Operation::Push(code, data.into_boxed_slice())
        } else {
            debug_assert!(data.is_empty(), "numeric/non-push opcode built with a payload");
            Operation::Op(code)
        }
    }

    /// This operation's opcode. `Invalid` reports `OP_INVALIDOPCODE`
    /// (`0xff`), the same value a corrupt read's code byte would have
    /// been had the read not failed first.
    pub fn code(&self) -> Opcode {
        match *self {
            Operation::Invalid => opcodes::all::OP_INVALIDOPCODE,
            Operation::Op(code) => code,
            Operation::Push(code, _) => code,
        }
    }

    /// This operation's payload; empty for everything but `Push`.
    pub fn data(&self) -> &[u8] {
        match self {
            Operation::Push(_, data) => data,
            _ => &[],
        }
    }

    /// False only for `Operation::Invalid`.
    pub fn is_valid(&self) -> bool { !matches!(self, Operation::Invalid) }

    /// The number of bytes this operation occupies on the wire.
    pub fn serialized_size(&self) -> usize {
        1 + self.prefix_width() + self.data().len()
    }

    fn prefix_width(&self) -> usize {
        match self.code().to_u8() {
            0x4c => 1,
            0x4d => 2,
            0x4e => 4,
            _ => 0,
        }
    }

    /// True iff this operation places bytes on the stack.
    pub fn is_push(&self) -> bool { opcodes::is_push(self.code()) }
    /// True iff this operation counts against a script's opcode budget.
    pub fn is_counted(&self) -> bool { opcodes::is_counted(self.code()) }
    /// True iff this is one of the small-integer numeric pushes.
    pub fn is_numeric(&self) -> bool { opcodes::is_numeric(self.code()) }
    /// True iff this pushes one of the constants `1..=16`.
    pub fn is_positive(&self) -> bool { opcodes::is_positive(self.code()) }
    /// True iff this operation's opcode is historically or permanently
    /// disabled.
    pub fn is_disabled(&self) -> bool { opcodes::is_opcode_disabled(self.code()) }
    /// True iff this is one of the six control-flow conditional opcodes.
    pub fn is_conditional(&self) -> bool { opcodes::is_conditional(self.code()) }
    /// True iff this operation's payload exceeds [`MAX_SCRIPT_ELEMENT_SIZE`].
    /// Decodable and encodable regardless — this is a standardness
    /// observation, not a wire-format constraint.
    pub fn is_oversized(&self) -> bool { self.data().len() > MAX_SCRIPT_ELEMENT_SIZE }

    /// Renders this operation's mnemonic text form: a push's data as
    /// `[<lowercase hex>]`, everything else by name, applying the fork
    /// renames selected by `active_forks` (see [`ACTIVE_FORK_CLTV`],
    /// [`ACTIVE_FORK_CSV`]). An unnamed opcode (one of the gap bytes
    /// between `OP_CHECKDATASIGVERIFY` and `OP_INVALIDOPCODE`) renders as
    /// `reserved_0x..`.
    pub fn to_mnemonic(&self, active_forks: u32) -> String {
        match self {
            Operation::Invalid => format!("invalid_0x{:02x}", self.code().to_u8()),
            Operation::Push(_, data) => format!("[{}]", data.to_lower_hex_string()),
            Operation::Op(code) => match opcodes::mnemonic(*code, active_forks) {
                Some(name) => name.to_string(),
                None => format!("reserved_0x{:02x}", code.to_u8()),
            },
        }
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code() && self.data() == other.data()
    }
}

impl Eq for Operation {}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mnemonic(0))
    }
}

impl Encodable for Operation {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut len = self.code().to_u8().consensus_encode(writer)?;
        match self.prefix_width() {
            1 => len += (self.data().len() as u8).consensus_encode(writer)?,
            2 => len += (self.data().len() as u16).consensus_encode(writer)?,
            4 => len += (self.data().len() as u32).consensus_encode(writer)?,
            _ => {}
        }
        writer.write_all(self.data())?;
        len += self.data().len();
        Ok(len)
    }
}

impl Decodable for Operation {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self, EncodeError> {
        Self::decode_with_limit(reader, DEFAULT_MAX_PUSH_LEN)
    }
}

/// Reads the payload length that follows `code`'s opcode byte, per the
/// four-way split every push opcode falls into: direct length (the
/// opcode value itself, for `push_size_0..=push_size_75`), and a 1/2/4
/// byte little-endian prefix for `OP_PUSHDATA1/2/4`. Any other opcode
/// carries no payload at all.
fn read_data_size<R: Read>(code: Opcode, reader: &mut R, max_push_len: u32) -> Result<usize, EncodeError> {
    let byte = code.to_u8();
    if byte <= opcodes::PUSH_SIZE_MAX {
        return Ok(byte as usize);
    }
    match byte {
        0x4c => Ok(u8::consensus_decode(reader)? as usize),
        0x4d => Ok(u16::consensus_decode(reader)? as usize),
        0x4e => {
            let requested = u32::consensus_decode(reader)?;
            if requested > max_push_len {
                Err(EncodeError::OversizedPush { requested: requested as u64, max: max_push_len })
            } else {
                Ok(requested as usize)
            }
        }
        _ => Ok(0),
    }
}

/// Error parsing an [`Operation`] from its mnemonic text form.
#[derive(Debug)]
pub enum ParseOperationError {
    /// A `[...]` push token's interior was not valid hex.
    InvalidHex,
    /// A `[...]` push token's payload could not be expressed by any push
    /// opcode (longer than `2^32 - 1` bytes).
    PushTooLarge,
    /// The token did not match any opcode's mnemonic.
    UnknownMnemonic(String),
}

impl fmt::Display for ParseOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseOperationError::InvalidHex => write!(f, "invalid hex inside a `[...]` push token"),
            ParseOperationError::PushTooLarge => write!(f, "push token's payload is too large to encode"),
            ParseOperationError::UnknownMnemonic(token) => write!(f, "unknown operation mnemonic: {}", token),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseOperationError {}

impl FromStr for Operation {
    type Err = ParseOperationError;

    /// Parses a bracketed hex push token (`"[deadbeef]"`) or an opcode's
    /// fixed mnemonic (`"dup"`, `"1"`, `"checklocktimeverify"`, ...).
    /// A bracketed token always decodes with `Minimal::No`: the literal
    /// bytes the caller wrote are exactly the bytes pushed, never folded
    /// into a shorter numeric-push opcode behind their back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = s.strip_prefix('[').and_then(|body| body.strip_suffix(']')) {
            let data = Vec::<u8>::from_hex(inner).map_err(|_| ParseOperationError::InvalidHex)?;
            return Operation::from_data(data, Minimal::No).ok_or(ParseOperationError::PushTooLarge);
        }
        opcodes::opcode_from_mnemonic(s)
            .map(Operation::from_opcode)
            .ok_or_else(|| ParseOperationError::UnknownMnemonic(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::encode::{deserialize, serialize};

    fn op(byte: u8) -> Opcode { Opcode::from_u8(byte) }

    #[test]
    fn empty_push_round_trips_as_op_0() {
        let push = Operation::from_data(Vec::new(), Minimal::Yes).unwrap();
        assert_eq!(push, Operation::Op(opcodes::all::OP_0));
        assert_eq!(push.data(), &[] as &[u8]);
        assert_eq!(serialize(&push), vec![0x00]);
        let decoded: Operation = deserialize(&[0x00]).unwrap();
        assert_eq!(decoded, push);
    }

    #[test]
    fn small_numeric_push_folds_to_numeric_opcode() {
        let five = Operation::from_data(vec![5], Minimal::Yes).unwrap();
        assert_eq!(five, Operation::Op(op(0x55)));
        assert_eq!(serialize(&five), vec![0x55]);
    }

    #[test]
    fn direct_length_push_round_trips() {
        let data = vec![0xaa; 10];
        let push = Operation::from_data(data.clone(), Minimal::Yes).unwrap();
        assert_eq!(push, Operation::Push(op(10), data.clone().into_boxed_slice()));
        let mut wire = vec![10u8];
        wire.extend_from_slice(&data);
        assert_eq!(serialize(&push), wire);
        let decoded: Operation = deserialize(&wire).unwrap();
        assert_eq!(decoded, push);
    }

    #[test]
    fn one_byte_prefix_push_round_trips() {
        let data = vec![0xbb; 80];
        let push = Operation::from_data(data.clone(), Minimal::Yes).unwrap();
        assert_eq!(push.code(), opcodes::all::OP_PUSHDATA1);
        let mut wire = vec![0x4c, 80u8];
        wire.extend_from_slice(&data);
        assert_eq!(serialize(&push), wire);
        let decoded: Operation = deserialize(&wire).unwrap();
        assert_eq!(decoded, push);
    }

    #[test]
    fn non_minimal_encoding_round_trips_without_folding() {
        // A 1-byte payload, encoded deliberately non-minimally as
        // push_size_1 rather than the numeric opcode it could have used.
        let push = Operation::from_data(vec![5], Minimal::No).unwrap();
        assert_eq!(push, Operation::Push(op(1), Box::from([5u8])));
        assert_eq!(serialize(&push), vec![0x01, 0x05]);
    }

    #[test]
    fn zero_length_prefixed_push_preserves_prefix_on_round_trip() {
        // push_one_size with a zero-length payload: unusual, but legal,
        // and the point of keeping `code` and `data` independent in the
        // `Push` variant is that this round-trips byte for byte.
        let wire = [0x4c, 0x00];
        let decoded: Operation = deserialize(&wire).unwrap();
        assert_eq!(decoded, Operation::Push(opcodes::all::OP_PUSHDATA1, Box::from([])));
        assert_eq!(serialize(&decoded), wire);
    }

    #[test]
    fn non_push_single_byte_decodes_valid_with_empty_data() {
        // 0xab (OP_CODESEPARATOR) carries no payload: a lone byte is a
        // complete, valid operation with empty data, not a truncated read.
        let decoded = Operation::from_reader(&mut io::Cursor::new(&[0xab][..]));
        assert!(decoded.is_valid());
        assert_eq!(decoded.code(), op(0xab));
        assert_eq!(decoded.data(), &[] as &[u8]);
        assert!(!decoded.is_push());
    }

    #[test]
    fn short_read_is_invalid_not_a_panic() {
        assert_eq!(Operation::from_reader(&mut io::Cursor::new(&[0x4c][..])), Operation::Invalid);
        assert_eq!(Operation::from_reader(&mut io::Cursor::new(&[0x4c, 0x02, 0xaa][..])), Operation::Invalid);
        assert_eq!(Operation::from_reader(&mut io::Cursor::new(&[][..])), Operation::Invalid);
    }

    #[test]
    fn four_byte_prefix_over_limit_is_invalid() {
        let mut wire = vec![0x4e];
        wire.extend_from_slice(&100u32.to_le_bytes());
        let op = Operation::from_reader_with_limit(&mut io::Cursor::new(&wire[..]), 10);
        assert_eq!(op, Operation::Invalid);
    }

    #[test]
    fn four_byte_prefix_at_or_under_limit_is_accepted() {
        let mut wire = vec![0x4e];
        wire.extend_from_slice(&3u32.to_le_bytes());
        wire.extend_from_slice(&[1, 2, 3]);
        let op = Operation::from_reader_with_limit(&mut io::Cursor::new(&wire[..]), 3);
        assert_eq!(op, Operation::Push(opcodes::all::OP_PUSHDATA4, Box::from([1u8, 2, 3])));
    }

    #[test]
    fn invalid_compares_equal_to_op_invalidopcode() {
        let invalid = Operation::Invalid;
        let explicit = Operation::from_opcode(opcodes::all::OP_INVALIDOPCODE);
        assert_eq!(invalid, explicit);
    }

    #[test]
    fn reserved_80_is_an_ordinary_disabled_opcode_not_push_0() {
        let reserved = Operation::from_opcode(opcodes::all::OP_RESERVED);
        assert_ne!(reserved, Operation::Op(opcodes::all::OP_0));
        assert!(reserved.is_disabled());
        assert!(!reserved.is_numeric());
    }

    #[test]
    fn mnemonic_round_trip_ordinary_opcode() {
        let dup = Operation::from_opcode(opcodes::all::OP_DUP);
        assert_eq!(dup.to_mnemonic(0), "dup");
        assert_eq!("dup".parse::<Operation>().unwrap(), dup);
    }

    #[test]
    fn mnemonic_round_trip_push() {
        let push = Operation::from_data(vec![0xde, 0xad, 0xbe, 0xef], Minimal::No).unwrap();
        let text = push.to_mnemonic(0);
        assert_eq!(text, "[deadbeef]");
        assert_eq!(text.parse::<Operation>().unwrap(), push);
    }

    #[test]
    fn fork_gated_mnemonic_rendering() {
        let cltv = Operation::from_opcode(opcodes::all::OP_NOP2);
        assert_eq!(cltv.to_mnemonic(0), "nop2");
        assert_eq!(cltv.to_mnemonic(ACTIVE_FORK_CLTV), "checklocktimeverify");
        assert_eq!("checklocktimeverify".parse::<Operation>().unwrap(), cltv);
    }

    #[test]
    fn unnamed_opcode_renders_as_reserved() {
        let gap = Operation::from_opcode(op(0xbc));
        assert_eq!(gap.to_mnemonic(0), "reserved_0xbc");
    }

    #[test]
    fn oversized_push_is_reported_but_still_decodes() {
        let data = vec![0u8; MAX_SCRIPT_ELEMENT_SIZE + 1];
        let push = Operation::from_data(data, Minimal::No).unwrap();
        assert!(push.is_oversized());
        assert!(push.is_valid());
    }

    #[test]
    fn boundary_lengths_pick_expected_opcodes() {
        for (len, expected) in [
            (0usize, opcodes::all::OP_0),
            (75, op(75)),
            (76, opcodes::all::OP_PUSHDATA1),
            (255, opcodes::all::OP_PUSHDATA1),
            (256, opcodes::all::OP_PUSHDATA2),
            (65535, opcodes::all::OP_PUSHDATA2),
            (65536, opcodes::all::OP_PUSHDATA4),
        ] {
            let data = vec![0xab; len];
            let got = Operation::from_data(data, Minimal::No).unwrap();
            assert_eq!(got.code(), expected, "length {}", len);
        }
    }

    #[test]
    fn serialized_size_matches_encoded_length() {
        let push = Operation::from_data(vec![0xaa; 300], Minimal::No).unwrap();
        assert_eq!(push.serialized_size(), serialize(&push).len());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn operation_round_trips_through_bincode() {
        let push = Operation::from_data(vec![1, 2, 3], Minimal::Yes).unwrap();
        let encoded = bincode::serialize(&push).unwrap();
        let decoded: Operation = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, push);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn operation_round_trips_through_json() {
        let dup = Operation::from_opcode(opcodes::all::OP_DUP);
        let json = serde_json::to_string(&dup).unwrap();
        let decoded: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, dup);
    }
}
