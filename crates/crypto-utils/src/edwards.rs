//! Twisted Edwards curve -x^2 + y^2 = 1 + d x^2 y^2 over GF(2^255 - 19).
//!
//! Points are kept in extended coordinates (X : Y : Z : T) with x = X/Z,
//! y = Y/Z and xy = T/Z. The addition law is complete, so the same formula
//! handles doubling and the identity, and scalar multiplication is a fixed
//! 256-step ladder of conditional swaps.

use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::field::FieldElement;

#[derive(Clone, Copy, Debug)]
pub struct EdwardsPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    t: FieldElement,
}

impl EdwardsPoint {
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// The standard Ed25519 base point B.
    pub fn basepoint() -> Self {
        Self {
            x: FieldElement::BASE_X,
            y: FieldElement::BASE_Y,
            z: FieldElement::ONE,
            t: FieldElement::BASE_X * FieldElement::BASE_Y,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let a = (self.y - self.x) * (other.y - other.x);
        let b = (self.y + self.x) * (other.y + other.x);
        let c = self.t * other.t * FieldElement::EDWARDS_D2;
        let d = self.z * other.z;
        let d = d + d;

        let e = b - a;
        let f = d - c;
        let g = d + c;
        let h = b + a;

        Self {
            x: e * f,
            y: h * g,
            z: g * f,
            t: e * h,
        }
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: i64) {
        FieldElement::conditional_swap(&mut a.x, &mut b.x, choice);
        FieldElement::conditional_swap(&mut a.y, &mut b.y, choice);
        FieldElement::conditional_swap(&mut a.z, &mut b.z, choice);
        FieldElement::conditional_swap(&mut a.t, &mut b.t, choice);
    }

    /// `scalar * self` for a 32-byte little-endian scalar.
    ///
    /// Every bit costs one addition and one doubling regardless of its
    /// value.
    pub fn mul_scalar(&self, scalar: &[u8; 32]) -> Self {
        let mut acc = Self::IDENTITY;
        let mut addend = *self;
        for i in (0..256).rev() {
            let bit = i64::from((scalar[i / 8] >> (i % 8)) & 1);
            Self::conditional_swap(&mut acc, &mut addend, bit);
            addend = addend.add(&acc);
            acc = acc.double();
            Self::conditional_swap(&mut acc, &mut addend, bit);
        }
        acc
    }

    pub fn mul_base(scalar: &[u8; 32]) -> Self {
        Self::basepoint().mul_scalar(scalar)
    }

    /// 32-byte encoding: y with the parity of x in the top bit.
    pub fn compress(&self) -> [u8; 32] {
        let z_inv = self.z.invert();
        let x = self.x * z_inv;
        let y = self.y * z_inv;

        let mut out = y.to_bytes();
        out[31] ^= u8::from(x.is_negative()) << 7;
        out
    }

    /// Recover a point from its 32-byte encoding.
    ///
    /// Solves x^2 = (y^2 - 1) / (d y^2 + 1) with a single exponentiation:
    /// x = u v^3 (u v^7)^((p-5)/8), corrected by sqrt(-1) when needed.
    /// Returns `None` when the ratio has no square root, i.e. the bytes do
    /// not encode a curve point.
    pub fn decompress(bytes: &[u8; 32]) -> Option<Self> {
        let y = FieldElement::from_bytes(bytes);
        let sign = bytes[31] >> 7;

        let y2 = y.square();
        let u = y2 - FieldElement::ONE;
        let v = y2 * FieldElement::EDWARDS_D + FieldElement::ONE;

        let v3 = v.square() * v;
        let v7 = v3.square() * v;
        let mut x = (u * v7).pow_p58() * u * v3;

        if !(x.square() * v).ct_eq(&u) {
            x = x * FieldElement::SQRT_M1;
        }
        if !(x.square() * v).ct_eq(&u) {
            return None;
        }

        if u8::from(x.is_negative()) != sign {
            x = -x;
        }

        Some(Self {
            x,
            y,
            z: FieldElement::ONE,
            t: x * y,
        })
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &Self) -> bool {
        // x1/z1 == x2/z2 and y1/z1 == y2/z2, cross-multiplied.
        (self.x * other.z).ct_eq(&(other.x * self.z)) && (self.y * other.z).ct_eq(&(other.y * self.z))
    }
}

impl Eq for EdwardsPoint {}

/// Clamp the low half of a SHA-512 digest into an Ed25519 secret scalar.
pub fn clamp_scalar(digest: &[u8]) -> [u8; 32] {
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&digest[..32]);
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    scalar
}

/// Compute the 32-byte Ed25519 public key for a 32-byte secret seed.
pub fn derive_public_key(seed: &[u8; 32]) -> [u8; 32] {
    let mut digest: [u8; 64] = Sha512::digest(seed).into();
    let mut scalar = clamp_scalar(&digest);

    let public = EdwardsPoint::mul_base(&scalar).compress();

    digest.zeroize();
    scalar.zeroize();
    public
}

/// Whether 32 bytes decode to a point on the curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    EdwardsPoint::decompress(bytes).is_some()
}
