//! 128-bit decimal in four-word layout
//!
//! The wire form of a decimal is four little-endian 32-bit words in the
//! order `lo, mid, hi, flags`:
//!
//! ```text
//! lo, mid, hi : 96-bit unsigned mantissa (lo is least significant)
//! flags       : bits 0-15  zero
//!               bits 16-23 scale (power of ten divisor, 0..=28)
//!               bits 24-30 zero
//!               bit  31    sign (1 = negative)
//! ```
//!
//! The value is `(-1)^sign * mantissa / 10^scale`. Equality is
//! representational: `1.0` (mantissa 10, scale 1) and `1` (mantissa 1,
//! scale 0) are different words and compare unequal.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest scale the layout allows
pub const MAX_SCALE: u32 = 28;

const SCALE_SHIFT: u32 = 16;
const SCALE_MASK: u32 = 0x00FF_0000;
const SIGN_MASK: u32 = 0x8000_0000;
const MANTISSA_LIMIT: u128 = 1 << 96;

/// Significant digits kept when converting from `f64`
const F64_DIGITS: i32 = 15;

/// A 128-bit decimal stored as its four raw words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Decimal128 {
    lo: u32,
    mid: u32,
    hi: u32,
    flags: u32,
}

impl Decimal128 {
    /// Zero with scale 0
    pub const ZERO: Decimal128 = Decimal128 {
        lo: 0,
        mid: 0,
        hi: 0,
        flags: 0,
    };

    /// Build from the four raw words, validating the flags word
    pub fn from_words(words: [u32; 4]) -> Result<Self> {
        let [lo, mid, hi, flags] = words;
        if flags & !(SCALE_MASK | SIGN_MASK) != 0 || (flags & SCALE_MASK) >> SCALE_SHIFT > MAX_SCALE
        {
            return Err(Error::InvalidDecimal(flags));
        }
        Ok(Decimal128 { lo, mid, hi, flags })
    }

    /// The four raw words in wire order
    pub fn words(&self) -> [u32; 4] {
        [self.lo, self.mid, self.hi, self.flags]
    }

    /// Build from sign, mantissa and scale
    pub fn from_parts(negative: bool, mantissa: u128, scale: u32) -> Result<Self> {
        if mantissa >= MANTISSA_LIMIT {
            return Err(Error::ValueOutOfRange(format!(
                "decimal mantissa {} exceeds 96 bits",
                mantissa
            )));
        }
        if scale > MAX_SCALE {
            return Err(Error::ValueOutOfRange(format!("decimal scale {}", scale)));
        }
        let mut flags = scale << SCALE_SHIFT;
        if negative {
            flags |= SIGN_MASK;
        }
        Ok(Decimal128 {
            lo: mantissa as u32,
            mid: (mantissa >> 32) as u32,
            hi: (mantissa >> 64) as u32,
            flags,
        })
    }

    /// 96-bit unsigned mantissa
    pub fn mantissa(&self) -> u128 {
        (self.lo as u128) | ((self.mid as u128) << 32) | ((self.hi as u128) << 64)
    }

    /// Power-of-ten divisor
    pub fn scale(&self) -> u32 {
        (self.flags & SCALE_MASK) >> SCALE_SHIFT
    }

    /// Sign bit
    pub fn is_negative(&self) -> bool {
        self.flags & SIGN_MASK != 0
    }

    /// True when the mantissa is zero (either sign, any scale)
    pub fn is_zero(&self) -> bool {
        self.mantissa() == 0
    }

    /// Exact conversion from a signed integer
    pub fn from_i64(value: i64) -> Self {
        Self::from_integer(value < 0, value.unsigned_abs() as u128)
    }

    /// Exact conversion from an unsigned integer
    pub fn from_u64(value: u64) -> Self {
        Self::from_integer(false, value as u128)
    }

    fn from_integer(negative: bool, magnitude: u128) -> Self {
        // 64-bit magnitudes always fit in 96 bits
        Decimal128 {
            lo: magnitude as u32,
            mid: (magnitude >> 32) as u32,
            hi: 0,
            flags: if negative { SIGN_MASK } else { 0 },
        }
    }

    /// Conversion from `f64`, rounded to 15 significant digits
    ///
    /// Returns `None` for NaN, infinities and magnitudes of 2^96 or more.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let magnitude = value.abs();
        if magnitude >= MANTISSA_LIMIT as f64 {
            return None;
        }
        if magnitude == 0.0 {
            return Some(Self::ZERO);
        }

        let int_digits = magnitude.log10().floor() as i32 + 1;
        let mut scale = (F64_DIGITS - int_digits).clamp(0, MAX_SCALE as i32) as u32;
        let mut mantissa = (magnitude * 10f64.powi(scale as i32)).round() as u128;
        while mantissa >= MANTISSA_LIMIT && scale > 0 {
            scale -= 1;
            mantissa = (magnitude * 10f64.powi(scale as i32)).round() as u128;
        }
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self::from_parts(value.is_sign_negative() && mantissa != 0, mantissa, scale).ok()
    }

    /// Nearest `f64`
    pub fn to_f64(&self) -> f64 {
        let magnitude = self.mantissa() as f64 / 10f64.powi(self.scale() as i32);
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Integer part, truncated toward zero
    pub fn trunc_to_i128(&self) -> i128 {
        let magnitude = (self.mantissa() / 10u128.pow(self.scale())) as i128;
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa().to_string();
        let scale = self.scale() as usize;
        let sign = if self.is_negative() && !self.is_zero() {
            "-"
        } else {
            ""
        };
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}
