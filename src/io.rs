// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! I/O abstraction.
//!
//! The teacher crate (`bitcoincash`) re-exports its own `Read`/`Write`
//! so that `no_std` builds can swap in `core2`'s equivalents. This crate
//! does not carry `no_std` support (see `DESIGN.md`), so the shim simply
//! re-exports `std::io`; it still exists as its own module so that every
//! other module reaches for `crate::io::{Read, Write}` rather than
//! `std::io` directly, keeping the indirection point the teacher's layout
//! put it at.

pub use std::io::{Cursor, Error, ErrorKind, Read, Result, Write};
