//! 256-bit machine word
//!
//! Every value the interpreter stores on the stack, in storage or in a
//! memory word is a [`Word`]. Arithmetic wraps modulo 2^256; the signed
//! operations interpret the same bits as two's complement.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::str::FromStr;

use primitive_types::{U256, U512};
use thiserror::Error;

use crate::{Address, H256};

/// Word parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// Input wider than 32 bytes
    #[error("value too long: {0} bytes (max 32)")]
    TooLong(usize),
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid decimal string
    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),
}

/// Unsigned 256-bit integer with wraparound arithmetic
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Word(U256);

impl Word {
    /// Size in bytes
    pub const BYTES: usize = 32;

    /// Zero
    pub const ZERO: Word = Word(U256([0; 4]));

    /// One
    pub const ONE: Word = Word(U256([1, 0, 0, 0]));

    /// 2^256 - 1, also -1 in two's complement
    pub const MAX: Word = Word(U256::MAX);

    /// Wrap a raw `U256`
    pub const fn from_u256(value: U256) -> Self {
        Word(value)
    }

    /// Get the raw `U256`
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Two's complement encoding of a signed integer
    pub fn from_i64(value: i64) -> Self {
        let magnitude = Word::from(value.unsigned_abs());
        if value < 0 {
            magnitude.wrapping_neg()
        } else {
            magnitude
        }
    }

    /// Big-endian 32-byte decoding
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Word(U256::from_big_endian(&bytes))
    }

    /// Big-endian decoding of up to 32 bytes, right-aligned
    pub fn from_be_slice(slice: &[u8]) -> Result<Self, WordError> {
        if slice.len() > Self::BYTES {
            return Err(WordError::TooLong(slice.len()));
        }
        Ok(Word(U256::from_big_endian(slice)))
    }

    /// Big-endian 32-byte encoding
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.0.to_big_endian(&mut bytes);
        bytes
    }

    /// Parse from hex string (with or without 0x prefix, odd length allowed)
    pub fn from_hex(s: &str) -> Result<Self, WordError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.is_empty() {
            return Ok(Word::ZERO);
        }
        let padded;
        let digits = if s.len() % 2 == 1 {
            padded = format!("0{}", s);
            padded.as_str()
        } else {
            s
        };
        let bytes = hex::decode(digits).map_err(|e| WordError::InvalidHex(e.to_string()))?;
        // Leading zero bytes do not count against the width.
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self::from_be_slice(&bytes[first..])
    }

    /// Parse from decimal string
    pub fn from_dec_str(s: &str) -> Result<Self, WordError> {
        U256::from_dec_str(s)
            .map(Word)
            .map_err(|e| WordError::InvalidDecimal(format!("{:?}", e)))
    }

    /// Low 32 bytes as a hash
    pub fn to_h256(&self) -> H256 {
        H256::from_bytes(self.to_be_bytes())
    }

    /// Low 20 bytes as an address
    pub fn to_address(&self) -> Address {
        let bytes = self.to_be_bytes();
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&bytes[12..]);
        Address::from_bytes(addr)
    }

    /// Value as `u64`, if it fits
    pub fn to_u64(&self) -> Option<u64> {
        if self.0.bits() <= 64 {
            Some(self.0.low_u64())
        } else {
            None
        }
    }

    /// Value as `usize`, if it fits
    pub fn to_usize(&self) -> Option<usize> {
        self.to_u64().and_then(|v| usize::try_from(v).ok())
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Bit at `index`, counted from the least significant bit
    pub fn bit(&self, index: usize) -> bool {
        index < 256 && self.0.bit(index)
    }

    /// Number of significant bytes (zero has length 0)
    pub fn byte_len(&self) -> usize {
        (self.0.bits() + 7) / 8
    }

    // ==================== Unsigned arithmetic ====================

    /// Addition modulo 2^256
    pub fn wrapping_add(self, rhs: Word) -> Word {
        Word(self.0.overflowing_add(rhs.0).0)
    }

    /// Subtraction modulo 2^256
    pub fn wrapping_sub(self, rhs: Word) -> Word {
        Word(self.0.overflowing_sub(rhs.0).0)
    }

    /// Multiplication modulo 2^256
    pub fn wrapping_mul(self, rhs: Word) -> Word {
        Word(self.0.overflowing_mul(rhs.0).0)
    }

    /// Integer division, zero when dividing by zero
    pub fn div_or_zero(self, rhs: Word) -> Word {
        Word(self.0.checked_div(rhs.0).unwrap_or_default())
    }

    /// Remainder, zero when dividing by zero
    pub fn rem_or_zero(self, rhs: Word) -> Word {
        Word(self.0.checked_rem(rhs.0).unwrap_or_default())
    }

    /// `(self + rhs) % modulus` without intermediate overflow
    pub fn add_mod(self, rhs: Word, modulus: Word) -> Word {
        if modulus.is_zero() {
            return Word::ZERO;
        }
        let sum = U512::from(self.0) + U512::from(rhs.0);
        narrow(sum % U512::from(modulus.0))
    }

    /// `(self * rhs) % modulus` without intermediate overflow
    pub fn mul_mod(self, rhs: Word, modulus: Word) -> Word {
        if modulus.is_zero() {
            return Word::ZERO;
        }
        let product = self.0.full_mul(rhs.0);
        narrow(product % U512::from(modulus.0))
    }

    /// Exponentiation modulo 2^256
    pub fn wrapping_pow(self, exponent: Word) -> Word {
        let mut result = U256::one();
        let mut base = self.0;
        let mut exp = exponent.0;

        while !exp.is_zero() {
            if exp.bit(0) {
                result = result.overflowing_mul(base).0;
            }
            base = base.overflowing_mul(base).0;
            exp >>= 1;
        }

        Word(result)
    }

    // ==================== Signed view ====================

    /// Sign bit set
    pub fn is_negative(&self) -> bool {
        self.0.bit(255)
    }

    /// Two's complement negation
    pub fn wrapping_neg(self) -> Word {
        Word((!self.0).overflowing_add(U256::one()).0)
    }

    /// Split into sign and magnitude
    pub fn to_signed(self) -> (bool, Word) {
        if self.is_negative() {
            (true, self.wrapping_neg())
        } else {
            (false, self)
        }
    }

    /// Join sign and magnitude
    pub fn from_signed(negative: bool, magnitude: Word) -> Word {
        if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        }
    }

    /// Signed division truncating toward zero, zero when dividing by zero.
    /// `MIN / -1` wraps to `MIN`.
    pub fn sdiv(self, rhs: Word) -> Word {
        if rhs.is_zero() {
            return Word::ZERO;
        }
        let (a_neg, a_abs) = self.to_signed();
        let (b_neg, b_abs) = rhs.to_signed();
        Word::from_signed(a_neg != b_neg, a_abs.div_or_zero(b_abs))
    }

    /// Signed remainder taking the sign of the dividend, zero when dividing by zero
    pub fn smod(self, rhs: Word) -> Word {
        if rhs.is_zero() {
            return Word::ZERO;
        }
        let (a_neg, a_abs) = self.to_signed();
        let (_, b_abs) = rhs.to_signed();
        Word::from_signed(a_neg, a_abs.rem_or_zero(b_abs))
    }

    /// Extend the sign bit of byte `byte_index` (0 = least significant) upward
    pub fn sign_extend(self, byte_index: Word) -> Word {
        let b = match byte_index.to_usize() {
            Some(b) if b < 31 => b,
            _ => return self,
        };
        let sign_bit = b * 8 + 7;
        let mask = (U256::one() << (sign_bit + 1)) - U256::one();
        if self.0.bit(sign_bit) {
            Word(self.0 | !mask)
        } else {
            Word(self.0 & mask)
        }
    }

    /// Signed less-than
    pub fn slt(&self, rhs: &Word) -> bool {
        self.signed_cmp(rhs) == Ordering::Less
    }

    /// Signed greater-than
    pub fn sgt(&self, rhs: &Word) -> bool {
        self.signed_cmp(rhs) == Ordering::Greater
    }

    /// Two's complement ordering
    pub fn signed_cmp(&self, rhs: &Word) -> Ordering {
        match (self.is_negative(), rhs.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.0.cmp(&rhs.0),
        }
    }

    // ==================== Bit operations ====================

    /// Byte `index` counted from the most significant end, zero past 31
    pub fn byte(self, index: Word) -> Word {
        match index.to_usize() {
            Some(i) if i < 32 => Word::from(u64::from(self.0.byte(31 - i))),
            _ => Word::ZERO,
        }
    }

    /// Logical left shift, zero for shifts of 256 or more
    pub fn shl(self, shift: Word) -> Word {
        match shift.to_usize() {
            Some(s) if s < 256 => Word(self.0 << s),
            _ => Word::ZERO,
        }
    }

    /// Logical right shift, zero for shifts of 256 or more
    pub fn shr(self, shift: Word) -> Word {
        match shift.to_usize() {
            Some(s) if s < 256 => Word(self.0 >> s),
            _ => Word::ZERO,
        }
    }

    /// Arithmetic right shift
    pub fn sar(self, shift: Word) -> Word {
        let negative = self.is_negative();
        match shift.to_usize() {
            Some(s) if s < 256 => {
                if negative {
                    Word(!((!self.0) >> s))
                } else {
                    Word(self.0 >> s)
                }
            }
            _ if negative => Word::MAX,
            _ => Word::ZERO,
        }
    }
}

fn narrow(value: U512) -> Word {
    // Callers only pass values already reduced below a 256-bit modulus.
    Word(U256::try_from(value).unwrap_or_default())
}

// ==================== Conversions ====================

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Word(U256::from(value))
    }
}

impl From<u128> for Word {
    fn from(value: u128) -> Self {
        Word(U256::from(value))
    }
}

impl From<usize> for Word {
    fn from(value: usize) -> Self {
        Word(U256::from(value))
    }
}

impl From<bool> for Word {
    fn from(value: bool) -> Self {
        if value {
            Word::ONE
        } else {
            Word::ZERO
        }
    }
}

impl From<U256> for Word {
    fn from(value: U256) -> Self {
        Word(value)
    }
}

impl From<Word> for U256 {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl From<H256> for Word {
    fn from(hash: H256) -> Self {
        Word::from_be_bytes(*hash.as_bytes())
    }
}

impl From<Word> for H256 {
    fn from(word: Word) -> Self {
        word.to_h256()
    }
}

impl From<Address> for Word {
    fn from(addr: Address) -> Self {
        Word(U256::from_big_endian(addr.as_bytes()))
    }
}

impl FromStr for Word {
    type Err = WordError;

    /// `0x`-prefixed input is hex, anything else decimal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            Word::from_hex(s)
        } else {
            Word::from_dec_str(s)
        }
    }
}

impl BitAnd for Word {
    type Output = Word;
    fn bitand(self, rhs: Word) -> Word {
        Word(self.0 & rhs.0)
    }
}

impl BitOr for Word {
    type Output = Word;
    fn bitor(self, rhs: Word) -> Word {
        Word(self.0 | rhs.0)
    }
}

impl BitXor for Word {
    type Output = Word;
    fn bitxor(self, rhs: Word) -> Word {
        Word(self.0 ^ rhs.0)
    }
}

impl Not for Word {
    type Output = Word;
    fn not(self) -> Word {
        Word(!self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{:x})", self.0)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Word {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&format!("0x{:x}", self.0))
        }
    }

    impl<'de> Deserialize<'de> for Word {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        }
    }
}
