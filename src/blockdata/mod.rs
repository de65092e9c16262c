// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Blockdata.
//!
//! Mirrors `bitcoincash::blockdata`'s module split between `opcodes` (the
//! classifier) and `script` (the codec that uses it). The sibling
//! `transaction`/`block`/`token` modules that would normally live here are
//! out of scope for this crate.

pub mod opcodes;
pub mod script;
