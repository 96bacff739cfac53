//! Arithmetic in the prime field GF(2^255 - 19).
//!
//! An element is 16 little-endian limbs of 16 bits each, stored in `i64` so
//! that intermediate products and carries never overflow. Limbs are allowed
//! to drift outside `0..2^16` between operations; [`FieldElement::to_bytes`]
//! produces the canonical reduced form.
//!
//! All operations run over fixed-size arrays with no data-dependent branches
//! on element values and no heap allocation.

use std::ops::{Add, Mul, Neg, Sub};

/// p - 2, little-endian. Exponent for inversion (Fermat).
const P_MINUS_2: [u8; 32] = {
    let mut e = [0xffu8; 32];
    e[0] = 0xeb;
    e[31] = 0x7f;
    e
};

/// (p - 5) / 8 = 2^252 - 3, little-endian. Exponent for square roots.
const P_MINUS_5_OVER_8: [u8; 32] = {
    let mut e = [0xffu8; 32];
    e[0] = 0xfd;
    e[31] = 0x0f;
    e
};

#[derive(Clone, Copy, Debug)]
pub struct FieldElement(pub(crate) [i64; 16]);

impl FieldElement {
    pub const ZERO: Self = Self([0; 16]);
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Edwards curve constant d = -121665 / 121666.
    pub const EDWARDS_D: Self = Self([
        0x78a3, 0x1359, 0x4dca, 0x75eb, 0xd8ab, 0x4141, 0x0a4d, 0x0070, 0xe898, 0x7779, 0x4079,
        0x8cc7, 0xfe73, 0x2b6f, 0x6cee, 0x5203,
    ]);

    /// 2 * d.
    pub const EDWARDS_D2: Self = Self([
        0xf159, 0x26b2, 0x9b94, 0xebd6, 0xb156, 0x8283, 0x149a, 0x00e0, 0xd130, 0xeef3, 0x80f2,
        0x198e, 0xfce7, 0x56df, 0xd9dc, 0x2406,
    ]);

    /// A square root of -1.
    pub const SQRT_M1: Self = Self([
        0xa0b0, 0x4a0e, 0x1b27, 0xc4ee, 0xe478, 0xad2f, 0x1806, 0x2f43, 0xd7a7, 0x3dfb, 0x0099,
        0x2b4d, 0xdf0b, 0x4fc1, 0x2480, 0x2b83,
    ]);

    /// Affine x of the Ed25519 base point.
    pub const BASE_X: Self = Self([
        0xd51a, 0x8f25, 0x2d60, 0xc956, 0xa7b2, 0x9525, 0xc760, 0x692c, 0xdc5c, 0xfdd6, 0xe231,
        0xc0a4, 0x53fe, 0xcd6e, 0x36d3, 0x2169,
    ]);

    /// Affine y of the Ed25519 base point (4/5).
    pub const BASE_Y: Self = Self([
        0x6658, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666, 0x6666,
        0x6666, 0x6666, 0x6666, 0x6666, 0x6666,
    ]);

    pub fn from_u64(value: u64) -> Self {
        let mut limbs = [0i64; 16];
        for (i, limb) in limbs.iter_mut().take(4).enumerate() {
            *limb = ((value >> (16 * i)) & 0xffff) as i64;
        }
        Self(limbs)
    }

    /// Load 32 little-endian bytes. The top bit is ignored and values
    /// in `p..2^255` are accepted and reduced lazily.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0i64; 16];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = i64::from(bytes[2 * i]) + (i64::from(bytes[2 * i + 1]) << 8);
        }
        limbs[15] &= 0x7fff;
        Self(limbs)
    }

    /// Canonical 32-byte little-endian encoding, fully reduced mod p.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut t = self.0;
        carry(&mut t);
        carry(&mut t);
        carry(&mut t);

        // Subtract p twice, keeping the result whenever it does not borrow.
        let mut m = [0i64; 16];
        for _ in 0..2 {
            m[0] = t[0] - 0xffed;
            for i in 1..15 {
                m[i] = t[i] - 0xffff - ((m[i - 1] >> 16) & 1);
                m[i - 1] &= 0xffff;
            }
            m[15] = t[15] - 0x7fff - ((m[14] >> 16) & 1);
            let borrow = (m[15] >> 16) & 1;
            m[14] &= 0xffff;
            swap_limbs(&mut t, &mut m, 1 - borrow);
        }

        let mut out = [0u8; 32];
        for (i, limb) in t.iter().enumerate() {
            out[2 * i] = (limb & 0xff) as u8;
            out[2 * i + 1] = ((limb >> 8) & 0xff) as u8;
        }
        out
    }

    pub fn square(&self) -> Self {
        *self * *self
    }

    pub fn negate(&self) -> Self {
        Self::ZERO - *self
    }

    /// `self^exponent` for a little-endian exponent.
    ///
    /// The exponent is treated as public; only the base is secret.
    pub fn pow(&self, exponent: &[u8; 32]) -> Self {
        let mut acc = Self::ONE;
        for i in (0..256).rev() {
            acc = acc.square();
            if (exponent[i / 8] >> (i % 8)) & 1 == 1 {
                acc = acc * *self;
            }
        }
        acc
    }

    /// Multiplicative inverse, `self^(p-2)`. Zero maps to zero.
    pub fn invert(&self) -> Self {
        self.pow(&P_MINUS_2)
    }

    /// `self^((p-5)/8)`, the core of the square-root-of-ratio computation.
    pub fn pow_p58(&self) -> Self {
        self.pow(&P_MINUS_5_OVER_8)
    }

    /// Low bit of the canonical encoding ("sign" of x in point compression).
    pub fn is_negative(&self) -> bool {
        self.to_bytes()[0] & 1 == 1
    }

    pub fn is_zero(&self) -> bool {
        self.ct_eq(&Self::ZERO)
    }

    /// Equality of canonical encodings without an early exit.
    pub fn ct_eq(&self, other: &Self) -> bool {
        let a = self.to_bytes();
        let b = other.to_bytes();
        a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }

    /// Swap `a` and `b` when `choice == 1`; leave them when `choice == 0`.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: i64) {
        swap_limbs(&mut a.0, &mut b.0, choice);
    }
}

/// Propagate carries so every limb returns to `0..2^16`, folding the top
/// carry back into limb 0 with factor 38.
fn carry(limbs: &mut [i64; 16]) {
    for i in 0..16 {
        limbs[i] += 1 << 16;
        let c = limbs[i] >> 16;
        if i < 15 {
            limbs[i + 1] += c - 1;
        } else {
            limbs[0] += 38 * (c - 1);
        }
        limbs[i] -= c << 16;
    }
}

fn swap_limbs(a: &mut [i64; 16], b: &mut [i64; 16], choice: i64) {
    let mask = !(choice - 1);
    for i in 0..16 {
        let t = mask & (a[i] ^ b[i]);
        a[i] ^= t;
        b[i] ^= t;
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for FieldElement {}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = [0i64; 16];
        for (i, limb) in out.iter_mut().enumerate() {
            *limb = self.0[i] + rhs.0[i];
        }
        Self(out)
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = [0i64; 16];
        for (i, limb) in out.iter_mut().enumerate() {
            *limb = self.0[i] - rhs.0[i];
        }
        Self(out)
    }
}

/// Schoolbook product folded with 2^256 = 38 (mod p), then two carry passes.
impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut t = [0i64; 31];
        for i in 0..16 {
            for j in 0..16 {
                t[i + j] += self.0[i] * rhs.0[j];
            }
        }
        for i in 0..15 {
            t[i] += 38 * t[i + 16];
        }

        let mut out = [0i64; 16];
        out.copy_from_slice(&t[..16]);
        carry(&mut out);
        carry(&mut out);
        Self(out)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}
