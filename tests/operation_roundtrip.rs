// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Integration round-trip tests for `Operation`.
//!
//! Plays the same role the visible sample's `addr` message test plays for
//! the network-message layer: build a value, push it through the wire
//! codec by every path the public API offers (`serialize`/`deserialize`,
//! a `Read` stream, a mnemonic string), and check the result comes back
//! byte for byte equal, with `serialized_size` matching the bytes actually
//! produced.

use bitcoincash_script_op::blockdata::opcodes;
use bitcoincash_script_op::blockdata::script::{Minimal, Operation};
use bitcoincash_script_op::consensus::encode::{deserialize, serialize};
use bitcoincash_script_op::io::Cursor;

#[test]
fn default_operation_is_invalid() {
    let instance = Operation::default();
    assert!(!instance.is_valid());
}

#[test]
fn roundtrip_through_byte_slice() {
    let expected = Operation::from_data(
        vec![0x47, 0x81, 0x6a, 0x40, 0xbb, 0x92, 0xbd, 0xb4],
        Minimal::Yes,
    )
    .unwrap();

    let data = serialize(&expected);
    let result: Operation = deserialize(&data).unwrap();

    assert!(result.is_valid());
    assert_eq!(expected, result);
    assert_eq!(data.len(), result.serialized_size());
    assert_eq!(expected.serialized_size(), result.serialized_size());
}

#[test]
fn roundtrip_through_reader_stream() {
    let expected = Operation::from_data(vec![0xaa; 300], Minimal::Yes).unwrap();

    let data = serialize(&expected);
    let mut reader = Cursor::new(&data[..]);
    let result = Operation::from_reader(&mut reader);

    assert!(result.is_valid());
    assert_eq!(expected, result);
    assert_eq!(data.len(), result.serialized_size());
    assert_eq!(expected.serialized_size(), result.serialized_size());
}

#[test]
fn from_data_insufficient_bytes_is_invalid() {
    // `0x4c` (OP_PUSHDATA1) promises a following length byte that never
    // arrives.
    let mut reader = Cursor::new(&[0x4cu8][..]);
    let instance = Operation::from_reader(&mut reader);
    assert!(!instance.is_valid());
}

#[test]
fn every_non_push_opcode_roundtrips_byte_for_byte() {
    // Every byte outside the push range is a single-byte operation with
    // no payload; it must come back out exactly as it went in.
    for byte in (opcodes::PUSH_SIZE_MAX as u16 + 1)..=0xff {
        let data = vec![byte as u8];
        let op = Operation::from_reader(&mut Cursor::new(&data[..]));
        assert!(op.is_valid(), "byte 0x{:02x} failed to decode", byte);
        assert_eq!(serialize(&op), data, "byte 0x{:02x} round-trip mismatch", byte);
    }
}

#[test]
fn every_direct_length_push_roundtrips_byte_for_byte() {
    for len in 0u8..=opcodes::PUSH_SIZE_MAX {
        let mut data = vec![len];
        data.extend(std::iter::repeat(0xab).take(len as usize));
        let op = Operation::from_reader(&mut Cursor::new(&data[..]));
        assert!(op.is_valid(), "push_size_{} failed to decode", len);
        assert_eq!(serialize(&op), data, "push_size_{} round-trip mismatch", len);
        assert_eq!(op.serialized_size(), data.len());
    }
}

#[test]
fn mnemonic_roundtrip_across_a_representative_sample() {
    let samples = [
        Operation::from_opcode(opcodes::all::OP_DUP),
        Operation::from_opcode(opcodes::all::OP_CHECKSIG),
        Operation::from_opcode(opcodes::all::OP_EQUALVERIFY),
        Operation::from_data(vec![], Minimal::Yes).unwrap(),
        Operation::from_data(vec![7], Minimal::Yes).unwrap(),
        Operation::from_data(vec![0xde, 0xad, 0xbe, 0xef], Minimal::No).unwrap(),
    ];

    for op in samples {
        let text = op.to_mnemonic(0);
        let reparsed: Operation = text.parse().unwrap_or_else(|e| panic!("{}: {:?}", text, e));
        assert_eq!(reparsed, op, "mnemonic round-trip mismatch for {}", text);
    }
}

#[test]
fn non_minimal_push_reencodes_longer_than_a_minimal_decode_would() {
    // Constructing from raw bytes with `Minimal::No` keeps the exact
    // push-by-length opcode even where a shorter numeric-push opcode
    // exists; re-encoding must preserve that choice rather than silently
    // re-minimising it.
    let non_minimal = Operation::from_data(vec![0xaa], Minimal::No).unwrap();
    assert_eq!(serialize(&non_minimal), vec![0x01, 0xaa]);

    let decoded: Operation = deserialize(&[0x01, 0xaa]).unwrap();
    assert_eq!(decoded, non_minimal);
}
