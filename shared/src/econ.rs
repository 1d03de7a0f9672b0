// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

/// A quantity of the native coin, counted in `loop` (10^-18 ICX).
///
/// Kept as a new-type so raw integers (steps, heights) aren't mixed up with balances.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    loops: BigInt,
}

impl Amount {
    /// The logical number of decimal places of one ICX.
    pub const DECIMALS: usize = 18;

    /// Number of loops in one ICX.
    pub const PRECISION: u64 = 10u64.pow(Self::DECIMALS as u32);

    pub fn from_loop(loops: impl Into<BigInt>) -> Self {
        Self {
            loops: loops.into(),
        }
    }

    pub fn from_icx(icx: i64) -> Self {
        Self::from_loop((icx as i128) * (Self::PRECISION as i128))
    }

    pub fn loops(&self) -> &BigInt {
        &self.loops
    }

    pub fn is_positive(&self) -> bool {
        self.loops.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.loops.is_negative()
    }
}

impl Zero for Amount {
    #[inline]
    fn zero() -> Self {
        Self {
            loops: BigInt::zero(),
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.loops.is_zero()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.loops.cmp(&other.loops)
    }
}

impl From<u64> for Amount {
    fn from(loops: u64) -> Self {
        Self::from_loop(loops)
    }
}

impl From<BigInt> for Amount {
    fn from(loops: BigInt) -> Self {
        Self { loops }
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self)
    }
}

/// Displays the amount in whole ICX, always with a decimal point.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (q, r) = self.loops.div_rem(&BigInt::from(Self::PRECISION));
        let whole = q.abs().to_str_radix(10);
        let fraction = if r.is_zero() {
            "0".to_string()
        } else {
            let digits = r.abs().to_str_radix(10);
            let padded = "0".repeat(Self::DECIMALS - digits.len()) + digits.as_str();
            padded.trim_end_matches('0').to_string()
        };
        let body = whole + "." + fraction.as_str();
        f.pad_integral(!self.loops.is_negative(), "", &body)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount { loops: -self.loops }
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount {
            loops: -&self.loops,
        }
    }
}

macro_rules! impl_arith {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<Amount> for Amount {
            type Output = Amount;

            fn $method(self, other: Amount) -> Amount {
                Amount { loops: self.loops $op other.loops }
            }
        }

        impl<'b> $trait<&'b Amount> for Amount {
            type Output = Amount;

            fn $method(self, other: &'b Amount) -> Amount {
                Amount { loops: self.loops $op &other.loops }
            }
        }

        impl<'a, 'b> $trait<&'b Amount> for &'a Amount {
            type Output = Amount;

            fn $method(self, other: &'b Amount) -> Amount {
                Amount { loops: &self.loops $op &other.loops }
            }
        }
    };
}

impl_arith!(Add, add, +);
impl_arith!(Sub, sub, -);
