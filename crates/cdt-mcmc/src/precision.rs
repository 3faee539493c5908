use std::cmp::Ordering;
use std::ops::{Add, Neg, Sub};

use cdt_core::errors::{CdtError, ErrorInfo};
use num_bigint::{BigInt, Sign};
use num_traits::{Float, Signed, ToPrimitive, Zero};

/// Extra fractional bits carried through `exp` so the final truncation is exact.
const GUARD_BITS: u32 = 64;

/// Arguments above this magnitude make `exp` overflow any useful width.
const MAX_EXP_ARGUMENT: i64 = 1 << 16;

/// Signed binary fixed-point number with `bits` fractional bits.
///
/// The value is `raw / 2^bits`. Addition, subtraction and integer scaling
/// are exact; division and `exp` truncate at the configured width.
#[derive(Debug, Clone)]
pub struct Fixed {
    raw: BigInt,
    bits: u32,
}

impl Fixed {
    /// Zero at the given width.
    pub fn zero(bits: u32) -> Self {
        Self {
            raw: BigInt::zero(),
            bits,
        }
    }

    /// One at the given width.
    pub fn one(bits: u32) -> Self {
        Self::from_integer(1, bits)
    }

    /// Lifts an integer exactly.
    pub fn from_integer(value: i64, bits: u32) -> Self {
        Self {
            raw: BigInt::from(value) << bits,
            bits,
        }
    }

    /// Lifts a finite `f64`; exact whenever its lowest set bit is at least `2^-bits`.
    pub fn from_f64(value: f64, bits: u32) -> Result<Self, CdtError> {
        if !value.is_finite() {
            return Err(CdtError::Precision(
                ErrorInfo::new("non-finite", "cannot lift a non-finite value")
                    .with_context("value", value.to_string()),
            ));
        }
        let (mantissa, exponent, sign) = value.integer_decode();
        let mut raw = BigInt::from(mantissa);
        let shift = i64::from(exponent) + i64::from(bits);
        if shift >= 0 {
            raw <<= shift as usize;
        } else {
            raw >>= shift.unsigned_abs() as usize;
        }
        if sign < 0 {
            raw = -raw;
        }
        Ok(Self { raw, bits })
    }

    /// `numerator / denominator`, truncated toward zero.
    pub fn ratio(numerator: u64, denominator: u64, bits: u32) -> Result<Self, CdtError> {
        if denominator == 0 {
            return Err(CdtError::Precision(
                ErrorInfo::new("division-by-zero", "ratio with zero denominator")
                    .with_context("numerator", numerator.to_string()),
            ));
        }
        let raw = (BigInt::from(numerator) << bits) / BigInt::from(denominator);
        Ok(Self { raw, bits })
    }

    /// Number of fractional bits.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns true for values below zero.
    pub fn is_negative(&self) -> bool {
        self.raw.is_negative()
    }

    /// Returns true for exactly zero.
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Exact product with an integer.
    pub fn mul_int(&self, factor: i64) -> Self {
        Self {
            raw: &self.raw * BigInt::from(factor),
            bits: self.bits,
        }
    }

    /// `e^self`, truncated to the width of `self`.
    ///
    /// The argument is halved until it is at most 1/2, the Taylor series is
    /// summed with guard bits, and the result is squared back up.
    pub fn exp(&self) -> Result<Self, CdtError> {
        let bits = self.bits;
        if self.raw > BigInt::from(MAX_EXP_ARGUMENT) << bits as usize {
            return Err(CdtError::Precision(
                ErrorInfo::new("exp-overflow", "exponent argument too large")
                    .with_context("argument", self.to_f64().to_string()),
            ));
        }
        // e^-bits < 2^-bits, so the result truncates to zero.
        if self.raw < BigInt::from(-i64::from(bits)) << bits as usize {
            return Ok(Self::zero(bits));
        }

        let halvings = (self.raw.bits() + 1).saturating_sub(u64::from(bits)) as u32;
        let work = bits + GUARD_BITS + halvings;
        // x / 2^halvings at `work` fractional bits.
        let reduced = &self.raw << GUARD_BITS as usize;
        let one = BigInt::from(1) << work as usize;

        let mut sum = one.clone();
        let mut term = one;
        let mut n: u32 = 1;
        loop {
            term = (&term * &reduced) >> work as usize;
            term /= BigInt::from(n);
            if term.is_zero() {
                break;
            }
            sum += &term;
            n += 1;
        }
        for _ in 0..halvings {
            sum = (&sum * &sum) >> work as usize;
        }
        Ok(Self {
            raw: sum >> (GUARD_BITS + halvings) as usize,
            bits,
        })
    }

    /// Converts to `f64`, rounding toward zero.
    pub fn to_f64(&self) -> f64 {
        let magnitude = self.raw.abs();
        let length = magnitude.bits();
        let dropped = length.saturating_sub(53);
        let Some(top) = (magnitude >> dropped as usize).to_u64() else {
            return 0.0;
        };
        let exponent = dropped as i64 - i64::from(self.bits);
        let value = scale_by_power_of_two(top as f64, exponent);
        match self.raw.sign() {
            Sign::Minus => -value,
            _ => value,
        }
    }

    fn rescaled(&self, bits: u32) -> Self {
        let raw = match bits.cmp(&self.bits) {
            Ordering::Equal => self.raw.clone(),
            Ordering::Greater => &self.raw << (bits - self.bits) as usize,
            Ordering::Less => &self.raw >> (self.bits - bits) as usize,
        };
        Self { raw, bits }
    }
}

fn scale_by_power_of_two(value: f64, exponent: i64) -> f64 {
    // Two steps keep each factor inside the normal range.
    let clamped = exponent.clamp(-2000, 2000) as i32;
    let half = clamped / 2;
    value * 2f64.powi(half) * 2f64.powi(clamped - half)
}

impl PartialEq for Fixed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fixed {}

impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fixed {
    fn cmp(&self, other: &Self) -> Ordering {
        let bits = self.bits.max(other.bits);
        self.rescaled(bits).raw.cmp(&other.rescaled(bits).raw)
    }
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        let rhs = rhs.rescaled(self.bits);
        Fixed {
            raw: self.raw + rhs.raw,
            bits: self.bits,
        }
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Fixed) -> Fixed {
        let rhs = rhs.rescaled(self.bits);
        Fixed {
            raw: self.raw - rhs.raw,
            bits: self.bits,
        }
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed {
            raw: -self.raw,
            bits: self.bits,
        }
    }
}
