//! GF(2^8) arithmetic over the byte field `x^8 + x^4 + x^3 + x^2 + 1` (0x11D).

use crate::coding::traits::{FecError, Result};
use once_cell::sync::Lazy;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign};

/// Primitive polynomial generating the multiplicative group.
pub const PRIMITIVE_POLY: u16 = 0x11d;

/// Order of the multiplicative group.
const GROUP_ORDER: usize = 255;

struct Tables {
    /// Doubled so that `log[a] + log[b]` indexes without a modulo.
    exp: [u8; 2 * GROUP_ORDER],
    log: [u8; 256],
}

static TABLES: Lazy<Tables> = Lazy::new(|| {
    let mut exp = [0u8; 2 * GROUP_ORDER];
    let mut log = [0u8; 256];
    let mut x = 1u16;
    for i in 0..GROUP_ORDER {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
    }
    for i in GROUP_ORDER..2 * GROUP_ORDER {
        exp[i] = exp[i - GROUP_ORDER];
    }
    Tables { exp, log }
});

/// Field addition (and subtraction).
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = &*TABLES;
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// Multiplicative inverse. Zero has none.
#[inline]
pub fn inv(a: u8) -> Result<u8> {
    if a == 0 {
        return Err(FecError::ZeroInverse);
    }
    let t = &*TABLES;
    Ok(t.exp[(GROUP_ORDER - t.log[a as usize] as usize) % GROUP_ORDER])
}

/// Field division `a / b`.
#[inline]
pub fn div(a: u8, b: u8) -> Result<u8> {
    Ok(mul(a, inv(b)?))
}

/// `dst[t] ^= c * src[t]` for every offset `t`.
///
/// This is the byte-parallel kernel behind both encoding and the decoder's
/// per-offset solve. Offsets are independent of each other.
pub fn mul_add(c: u8, src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    match c {
        0 => {}
        1 => {
            for (d, s) in dst.iter_mut().zip(src) {
                *d ^= *s;
            }
        }
        _ => {
            let t = &*TABLES;
            let log_c = t.log[c as usize] as usize;
            for (d, &s) in dst.iter_mut().zip(src) {
                if s != 0 {
                    *d ^= t.exp[log_c + t.log[s as usize] as usize];
                }
            }
        }
    }
}

/// `buf[t] = c * buf[t]` for every offset `t`.
pub fn scale(c: u8, buf: &mut [u8]) {
    match c {
        0 => buf.fill(0),
        1 => {}
        _ => {
            let t = &*TABLES;
            let log_c = t.log[c as usize] as usize;
            for b in buf.iter_mut().filter(|b| **b != 0) {
                *b = t.exp[log_c + t.log[*b as usize] as usize];
            }
        }
    }
}

/// A single element of GF(256).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Gf256(pub u8);

impl Gf256 {
    /// Additive identity.
    pub const ZERO: Self = Self(0);
    /// Multiplicative identity.
    pub const ONE: Self = Self(1);

    /// Whether this is the additive identity.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiplicative inverse, `None` for zero.
    #[inline]
    pub fn invert(self) -> Option<Self> {
        inv(self.0).ok().map(Self)
    }

    /// The underlying byte.
    #[inline]
    pub fn to_byte(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Gf256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gf256({:#04x})", self.0)
    }
}

impl From<u8> for Gf256 {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Gf256> for u8 {
    fn from(value: Gf256) -> Self {
        value.0
    }
}

impl Add for Gf256 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(add(self.0, rhs.0))
    }
}

impl AddAssign for Gf256 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for Gf256 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(mul(self.0, rhs.0))
    }
}

impl MulAssign for Gf256 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        self.0 = mul(self.0, rhs.0);
    }
}

impl Div for Gf256 {
    type Output = Result<Self>;

    #[inline]
    fn div(self, rhs: Self) -> Result<Self> {
        div(self.0, rhs.0).map(Self)
    }
}
