// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Opcodes.
//!
//! This module names the 256 one-byte values a Bitcoin script opcode can
//! take and classifies them. It mirrors `bitcoincash::blockdata::opcodes`
//! (the newtype `Opcode(u8)`, the `all` module of named constants) but is
//! scoped to the predicates `Operation` actually needs — there is no
//! `Class`/`Instruction` aggregate here, since iterating a full script is
//! out of scope (see `SPEC_FULL.md`).

use core::fmt;

/// An 8-bit tag identifying one of the 256 script primitives.
///
/// `Opcode` is a plain newtype over `u8`: every byte value is a valid
/// `Opcode` (there is no "parse error" at this layer — classification,
/// not validation, is this type's job).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(actual_serde::Serialize, actual_serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde", transparent))]
pub struct Opcode(u8);

impl Opcode {
    /// Builds an `Opcode` from its wire byte.
    #[inline]
    pub const fn from_u8(byte: u8) -> Opcode { Opcode(byte) }

    /// Returns the wire byte for this opcode.
    #[inline]
    pub const fn to_u8(self) -> u8 { self.0 }
}

impl From<u8> for Opcode {
    #[inline]
    fn from(byte: u8) -> Opcode { Opcode::from_u8(byte) }
}

impl From<Opcode> for u8 {
    #[inline]
    fn from(op: Opcode) -> u8 { op.to_u8() }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match name_of(*self) {
            Some(name) => write!(f, "OP_{}", name.to_ascii_uppercase()),
            None => write!(f, "OP_UNKNOWN(0x{:02x})", self.0),
        }
    }
}

/// Lower bound (inclusive) of `push_size_k` opcodes: `k` is the opcode's
/// own value and is also the number of payload bytes that follow.
pub const PUSH_SIZE_MIN: u8 = 0x00;
/// Upper bound (inclusive) of `push_size_k` opcodes.
pub const PUSH_SIZE_MAX: u8 = 0x4b;

macro_rules! define_opcodes {
    ($($(#[$attr:meta])* $name:ident, $value:expr, $mnemonic:expr;)*) => {
        /// Named opcode constants, one per row of the canonical Satoshi
        /// table (plus Bitcoin Cash's additions/re-activations).
        pub mod all {
            use super::Opcode;
            $(
                $(#[$attr])*
                pub const $name: Opcode = Opcode($value);
            )*
        }

        fn name_of(op: Opcode) -> Option<&'static str> {
            match op.0 {
                $($value => Some($mnemonic),)*
                _ => None,
            }
        }

        fn lookup_name(token: &str) -> Option<Opcode> {
            match token {
                $($mnemonic => Some(Opcode($value)),)*
                _ => None,
            }
        }
    };
}

// One row per named opcode. `push_size_1..=push_size_75` deliberately have
// no row here: they never have individual mnemonics, they always render as
// `[<hex>]` (see `blockdata::script::Operation::to_mnemonic`).
define_opcodes! {
    /// Pushes an empty array / the number zero (same wire value).
    OP_0, 0x00, "0";
    /// Reads the next byte as `N`; pushes the following `N` bytes.
    OP_PUSHDATA1, 0x4c, "pushdata1";
    /// Reads the next two bytes as `N`; pushes the following `N` bytes.
    OP_PUSHDATA2, 0x4d, "pushdata2";
    /// Reads the next four bytes as `N`; pushes the following `N` bytes.
    OP_PUSHDATA4, 0x4e, "pushdata4";
    /// Pushes the number -1.
    OP_1NEGATE, 0x4f, "-1";
    /// Historically reserved; fails the script if executed.
    OP_RESERVED, 0x50, "reserved";
    OP_1, 0x51, "1";
    OP_2, 0x52, "2";
    OP_3, 0x53, "3";
    OP_4, 0x54, "4";
    OP_5, 0x55, "5";
    OP_6, 0x56, "6";
    OP_7, 0x57, "7";
    OP_8, 0x58, "8";
    OP_9, 0x59, "9";
    OP_10, 0x5a, "10";
    OP_11, 0x5b, "11";
    OP_12, 0x5c, "12";
    OP_13, 0x5d, "13";
    OP_14, 0x5e, "14";
    OP_15, 0x5f, "15";
    OP_16, 0x60, "16";

    OP_NOP, 0x61, "nop";
    OP_VER, 0x62, "ver";
    OP_IF, 0x63, "if";
    OP_NOTIF, 0x64, "notif";
    OP_VERIF, 0x65, "verif";
    OP_VERNOTIF, 0x66, "vernotif";
    OP_ELSE, 0x67, "else";
    OP_ENDIF, 0x68, "endif";
    OP_VERIFY, 0x69, "verify";
    OP_RETURN, 0x6a, "return";

    OP_TOALTSTACK, 0x6b, "toaltstack";
    OP_FROMALTSTACK, 0x6c, "fromaltstack";
    OP_2DROP, 0x6d, "2drop";
    OP_2DUP, 0x6e, "2dup";
    OP_3DUP, 0x6f, "3dup";
    OP_2OVER, 0x70, "2over";
    OP_2ROT, 0x71, "2rot";
    OP_2SWAP, 0x72, "2swap";
    OP_IFDUP, 0x73, "ifdup";
    OP_DEPTH, 0x74, "depth";
    OP_DROP, 0x75, "drop";
    OP_DUP, 0x76, "dup";
    OP_NIP, 0x77, "nip";
    OP_OVER, 0x78, "over";
    OP_PICK, 0x79, "pick";
    OP_ROLL, 0x7a, "roll";
    OP_ROT, 0x7b, "rot";
    OP_SWAP, 0x7c, "swap";
    OP_TUCK, 0x7d, "tuck";

    /// Re-activated for Bitcoin Cash (2018 "monolith" upgrade).
    OP_CAT, 0x7e, "cat";
    /// Replaces legacy `OP_SUBSTR`, re-activated for Bitcoin Cash.
    OP_SPLIT, 0x7f, "split";
    /// Re-activated for Bitcoin Cash.
    OP_NUM2BIN, 0x80, "num2bin";
    /// Re-activated for Bitcoin Cash.
    OP_BIN2NUM, 0x81, "bin2num";
    OP_SIZE, 0x82, "size";

    /// Remains disabled even on Bitcoin Cash.
    OP_INVERT, 0x83, "invert";
    /// Re-activated for Bitcoin Cash.
    OP_AND, 0x84, "and";
    /// Re-activated for Bitcoin Cash.
    OP_OR, 0x85, "or";
    /// Re-activated for Bitcoin Cash.
    OP_XOR, 0x86, "xor";
    OP_EQUAL, 0x87, "equal";
    OP_EQUALVERIFY, 0x88, "equalverify";
    OP_RESERVED1, 0x89, "reserved1";
    OP_RESERVED2, 0x8a, "reserved2";

    OP_1ADD, 0x8b, "1add";
    OP_1SUB, 0x8c, "1sub";
    /// Remains disabled.
    OP_2MUL, 0x8d, "2mul";
    /// Remains disabled.
    OP_2DIV, 0x8e, "2div";
    OP_NEGATE, 0x8f, "negate";
    OP_ABS, 0x90, "abs";
    OP_NOT, 0x91, "not";
    OP_0NOTEQUAL, 0x92, "0notequal";

    OP_ADD, 0x93, "add";
    OP_SUB, 0x94, "sub";
    /// Remains disabled.
    OP_MUL, 0x95, "mul";
    /// Re-activated for Bitcoin Cash.
    OP_DIV, 0x96, "div";
    /// Re-activated for Bitcoin Cash.
    OP_MOD, 0x97, "mod";
    /// Remains disabled.
    OP_LSHIFT, 0x98, "lshift";
    /// Remains disabled.
    OP_RSHIFT, 0x99, "rshift";

    OP_BOOLAND, 0x9a, "booland";
    OP_BOOLOR, 0x9b, "boolor";
    OP_NUMEQUAL, 0x9c, "numequal";
    OP_NUMEQUALVERIFY, 0x9d, "numequalverify";
    OP_NUMNOTEQUAL, 0x9e, "numnotequal";
    OP_LESSTHAN, 0x9f, "lessthan";
    OP_GREATERTHAN, 0xa0, "greaterthan";
    OP_LESSTHANOREQUAL, 0xa1, "lessthanorequal";
    OP_GREATERTHANOREQUAL, 0xa2, "greaterthanorequal";
    OP_MIN, 0xa3, "min";
    OP_MAX, 0xa4, "max";

    OP_WITHIN, 0xa5, "within";

    OP_RIPEMD160, 0xa6, "ripemd160";
    OP_SHA1, 0xa7, "sha1";
    OP_SHA256, 0xa8, "sha256";
    OP_HASH160, 0xa9, "hash160";
    OP_HASH256, 0xaa, "hash256";
    OP_CODESEPARATOR, 0xab, "codeseparator";
    OP_CHECKSIG, 0xac, "checksig";
    OP_CHECKSIGVERIFY, 0xad, "checksigverify";
    OP_CHECKMULTISIG, 0xae, "checkmultisig";
    OP_CHECKMULTISIGVERIFY, 0xaf, "checkmultisigverify";

    OP_NOP1, 0xb0, "nop1";
    /// Renamed to `checklocktimeverify` once `ACTIVE_FORK_CLTV` is set
    /// in the `active_forks` bitmask passed to `to_mnemonic` (BIP65).
    OP_NOP2, 0xb1, "nop2";
    /// Renamed to `checksequenceverify` once `ACTIVE_FORK_CSV` is set
    /// (BIP112).
    OP_NOP3, 0xb2, "nop3";
    OP_NOP4, 0xb3, "nop4";
    OP_NOP5, 0xb4, "nop5";
    OP_NOP6, 0xb5, "nop6";
    OP_NOP7, 0xb6, "nop7";
    OP_NOP8, 0xb7, "nop8";
    OP_NOP9, 0xb8, "nop9";
    OP_NOP10, 0xb9, "nop10";

    /// Added for Bitcoin Cash (2019 upgrade).
    OP_CHECKDATASIG, 0xba, "checkdatasig";
    /// Added for Bitcoin Cash (2019 upgrade).
    OP_CHECKDATASIGVERIFY, 0xbb, "checkdatasigverify";

    /// Sentinel used as the default/invalid operation's opcode (`0xff`
    /// is not assigned to any script primitive).
    OP_INVALIDOPCODE, 0xff, "invalidopcode";
}

/// The CashTokens (CHIP-2022-02) wrapper-prefix byte, reserved at the
/// transaction-output level. This is *not* an executable script opcode —
/// it is named here only because `blockdata::token` needs the constant
/// and this module is the single source of truth for byte `0xef` — and is
/// deliberately excluded from every classifier predicate below.
pub const OP_SPECIAL_TOKEN_PREFIX: Opcode = Opcode(0xef);

/// Synonym for `all::OP_1NEGATE`, used as the spec's `push_negative_1` name.
const PUSH_NEGATIVE_1: u8 = 0x4f;
/// Synonym for `all::OP_1`.
const PUSH_POSITIVE_1: u8 = 0x51;
/// Synonym for `all::OP_16`.
const PUSH_POSITIVE_16: u8 = 0x60;

/// Opcodes treated as historically or permanently disabled: executing one
/// fails the script immediately. Bitcoin Cash re-activated several
/// historically-disabled opcodes (`cat`, `split`, `num2bin`, `bin2num`,
/// `and`, `or`, `xor`, `div`, `mod`); those are deliberately absent here.
fn is_disabled(op: Opcode) -> bool {
    use self::all::*;
    matches!(
        op,
        OP_RESERVED
            | OP_RESERVED1
            | OP_RESERVED2
            | OP_VER
            | OP_VERIF
            | OP_VERNOTIF
            | OP_2MUL
            | OP_2DIV
            | OP_MUL
            | OP_INVERT
            | OP_LSHIFT
            | OP_RSHIFT
    ) || op.0 > OP_CHECKDATASIGVERIFY.0
}

/// True iff `op` places bytes on the stack: a direct-length push, a
/// length-prefixed push, or a numeric push.
pub fn is_push(op: Opcode) -> bool {
    op.0 <= PUSH_SIZE_MAX
        || matches!(op.0, 0x4c..=0x4e)
        || is_numeric(op)
}

/// True iff `op` is a non-push opcode that counts against a script's
/// opcode budget.
pub fn is_counted(op: Opcode) -> bool { !is_push(op) && op.0 > PUSH_POSITIVE_16 }

/// True iff `op` is one of the small-integer push opcodes
/// (`push_negative_1`, `push_0`, `push_positive_1..16`).
pub fn is_numeric(op: Opcode) -> bool {
    op.0 == 0x00 || op.0 == PUSH_NEGATIVE_1 || matches!(op.0, PUSH_POSITIVE_1..=PUSH_POSITIVE_16)
}

/// True iff `op` pushes one of the constants 1..16.
pub fn is_positive(op: Opcode) -> bool { matches!(op.0, PUSH_POSITIVE_1..=PUSH_POSITIVE_16) }

/// True iff `op` is historically or permanently disabled.
pub fn is_opcode_disabled(op: Opcode) -> bool { is_disabled(op) }

/// True iff `op` is one of the six control-flow conditional opcodes.
pub fn is_conditional(op: Opcode) -> bool {
    use self::all::*;
    matches!(op, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF | OP_VERIF | OP_VERNOTIF)
}

/// Maps `1..=16` to the corresponding `push_positive_N` opcode; any other
/// input is out of range.
pub fn opcode_from_positive(value: u8) -> Option<Opcode> {
    if (1..=16).contains(&value) {
        Some(Opcode(PUSH_POSITIVE_1 + (value - 1)))
    } else {
        None
    }
}

/// Inverse of [`opcode_from_positive`].
pub fn opcode_to_positive(op: Opcode) -> Option<u8> {
    if is_positive(op) {
        Some(op.0 - PUSH_POSITIVE_1 + 1)
    } else {
        None
    }
}

/// Chooses the unique minimal push-by-length opcode for a payload of
/// length `n`, or `None` if no push opcode can express a length that
/// large (`n > 2^32 - 1`).
pub fn opcode_from_size(n: usize) -> Option<Opcode> {
    use self::all::*;
    if n <= PUSH_SIZE_MAX as usize {
        Some(Opcode(n as u8))
    } else if n <= 0xff {
        Some(OP_PUSHDATA1)
    } else if n <= 0xffff {
        Some(OP_PUSHDATA2)
    } else if n <= 0xffff_ffff {
        Some(OP_PUSHDATA4)
    } else {
        None
    }
}

/// Chooses the minimal opcode for a literal payload: a numeric push for
/// the handful of values that have one (empty, `0x81` for -1, `1..=16`
/// for the small positive integers), otherwise the shortest push-by-length
/// opcode that fits. This is the canonicalisation `Operation::from_data`
/// applies when asked for a minimal encoding; it always succeeds, falling
/// back to `OP_PUSHDATA4` for a payload too large for any push opcode to
/// address (not reachable with an in-memory `Vec` on any real target).
pub fn opcode_from_data(data: &[u8]) -> Opcode {
    use self::all::*;
    match data {
        [] => OP_0,
        [0x81] => Opcode(PUSH_NEGATIVE_1),
        [b] if (1..=16).contains(b) => opcode_from_positive(*b).expect("1..=16 in range"),
        _ => opcode_from_size(data.len()).unwrap_or(OP_PUSHDATA4),
    }
}

/// Renders `op`'s fixed mnemonic (not applicable to push-by-length
/// opcodes carrying a nonzero-length payload, which render from their
/// data instead — see `blockdata::script`), applying the two historical
/// rename forks this crate models.
pub fn mnemonic(op: Opcode, active_forks: u32) -> Option<&'static str> {
    use self::all::*;
    if op == OP_NOP2 && active_forks & super::script::ACTIVE_FORK_CLTV != 0 {
        return Some("checklocktimeverify");
    }
    if op == OP_NOP3 && active_forks & super::script::ACTIVE_FORK_CSV != 0 {
        return Some("checksequenceverify");
    }
    name_of(op)
}

/// Parses a fixed mnemonic token (inverse of [`mnemonic`]); bracketed hex
/// push tokens are handled by the caller, not here.
pub fn opcode_from_mnemonic(token: &str) -> Option<Opcode> {
    match token {
        "checklocktimeverify" => Some(all::OP_NOP2),
        "checksequenceverify" => Some(all::OP_NOP3),
        _ => lookup_name(token),
    }
}
