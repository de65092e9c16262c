// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Bitcoin Cash script operation codec.
//!
//! This crate is the slice of [`bitcoincash`](https://gitlab.com/rust-bitcoincash/rust-bitcoincash/)'s
//! `blockdata::opcodes`/`blockdata::script` that classifies the 256 script
//! opcodes and reads/writes a single script operation — an opcode plus,
//! for push opcodes, the bytes it pushes. It does not implement `Script`
//! itself (a byte string plus an `Instructions` iterator over it), a
//! script interpreter, signature hashing, or anything transaction- or
//! network-message-shaped; see `SPEC_FULL.md` in the repository root for
//! the full boundary.
//!
//! ```rust
//! use bitcoincash_script_op::blockdata::opcodes;
//! use bitcoincash_script_op::blockdata::script::{Minimal, Operation};
//! use bitcoincash_script_op::consensus::encode::{deserialize, serialize};
//!
//! // A direct-length push round-trips byte for byte.
//! let push = Operation::from_data(vec![0xde, 0xad], Minimal::Yes).unwrap();
//! let wire = serialize(&push);
//! assert_eq!(wire, vec![0x02, 0xde, 0xad]);
//! assert_eq!(deserialize::<Operation>(&wire).unwrap(), push);
//!
//! // A small integer push folds into its one-byte numeric opcode.
//! let five = Operation::from_data(vec![5], Minimal::Yes).unwrap();
//! assert_eq!(five, Operation::Op(opcodes::all::OP_5));
//! assert_eq!(five.to_mnemonic(0), "5");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
// Experimental features we need.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// Coding conventions.
#![forbid(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
compile_error!("`std` is currently required; see DESIGN.md for why this crate does not offer a `no-std` feature");

pub mod blockdata;
pub mod consensus;
pub mod io;

pub use crate::blockdata::opcodes::Opcode;
pub use crate::blockdata::script::{Minimal, Operation};
pub use crate::consensus::encode::{deserialize, deserialize_partial, serialize, Decodable, Encodable};
