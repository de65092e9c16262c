// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Consensus-critical encoding.
//!
//! This mirrors the shape of `bitcoincash::consensus`: a small,
//! independent module that defines *how bytes round-trip*, kept separate
//! from the types (`Opcode`, `Operation`) that use it. Everything a
//! consensus-critical type needs to serialize itself goes through the
//! [`Encodable`] / [`Decodable`] traits defined in [`encode`].

pub mod encode;

pub use self::encode::{deserialize, deserialize_partial, serialize, Decodable, Encodable, Error};
