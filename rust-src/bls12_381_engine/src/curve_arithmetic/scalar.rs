//! The scalar field of BLS12-381, that is, integers modulo the order `r` of
//! the groups G1, G2 and GT.
use super::{
    arith::{add_mod, is_below, limbs_from_be_bytes, limbs_to_be_bytes, mont_mul, neg_mod, sub_mod},
    Field,
};
use rand::RngCore;
use std::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

/// r = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001
#[allow(clippy::unreadable_literal)]
pub(crate) const MODULUS: [u64; 4] = [
    0xffffffff00000001,
    0x53bda402fffe5bfe,
    0x3339d80809a1d805,
    0x73eda753299d7d48,
];

const INV: u64 = 0xfffffffeffffffff;

#[allow(clippy::unreadable_literal)]
const R: [u64; 4] = [
    0x00000001fffffffe,
    0x5884b7fa00034802,
    0x998c4fefecbc4ff5,
    0x1824b159acc5056f,
];

#[allow(clippy::unreadable_literal)]
const R2: [u64; 4] = [
    0xc999e990f3f29c6d,
    0x2b6cedcb87925c23,
    0x05d314967254398f,
    0x0748d9d99f59ff11,
];

#[allow(clippy::unreadable_literal)]
const R3: [u64; 4] = [
    0xc62c1807439b73af,
    0x1b3e0d188cf06990,
    0x73d13c71c7b5f418,
    0x6e2a5bb9c8db33e9,
];

#[allow(clippy::unreadable_literal)]
const R_MINUS_2: [u64; 4] = [
    0xfffffffeffffffff,
    0x53bda402fffe5bfe,
    0x3339d80809a1d805,
    0x73eda753299d7d48,
];

/// Element of the scalar field, stored in Montgomery form. Secret keys are
/// scalars, so the type can be zeroized.
#[derive(Copy, Clone)]
pub struct Scalar(pub(crate) [u64; 4]);

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes_be()))
    }
}

impl Default for Scalar {
    fn default() -> Self { Scalar::zero() }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) { self.0.zeroize() }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(Choice::from(1), |acc, (a, b)| acc & a.ct_eq(b))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl Eq for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 4];
        for (i, limb) in out.iter_mut().enumerate() {
            *limb = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Scalar(out)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self { Scalar::from_u64(v) }
}

impl Scalar {
    #[inline]
    pub const fn zero() -> Scalar { Scalar([0, 0, 0, 0]) }

    #[inline]
    pub const fn one() -> Scalar { Scalar(R) }

    pub fn from_u64(v: u64) -> Scalar { Scalar(mont_mul(&[v, 0, 0, 0], &R2, &MODULUS, INV)) }

    /// Convert canonical little-endian limbs. Fails unless the value is
    /// smaller than `r`.
    pub fn from_canonical_limbs(limbs: &[u64; 4]) -> CtOption<Scalar> {
        let in_range = Choice::from(is_below(limbs, &MODULUS));
        CtOption::new(Scalar(mont_mul(limbs, &R2, &MODULUS, INV)), in_range)
    }

    /// The canonical little-endian limbs, as consumed by scalar
    /// multiplication.
    pub fn to_canonical_limbs(&self) -> [u64; 4] { mont_mul(&self.0, &[1, 0, 0, 0], &MODULUS, INV) }

    /// Decode a canonical 32 byte big-endian integer.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> CtOption<Scalar> {
        let mut limbs = limbs_from_be_bytes::<4>(bytes);
        let s = Self::from_canonical_limbs(&limbs);
        limbs.zeroize();
        s
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let mut limbs = self.to_canonical_limbs();
        limbs_to_be_bytes(&limbs, &mut out);
        limbs.zeroize();
        out
    }

    /// Interpret 64 big-endian bytes as an integer and reduce it
    /// modulo `r`.
    pub fn from_bytes_wide_be(bytes: &[u8; 64]) -> Scalar {
        let mut hi_limbs = limbs_from_be_bytes::<4>(&bytes[..32]);
        let mut lo_limbs = limbs_from_be_bytes::<4>(&bytes[32..]);
        // hi * R^3 / R = (hi * 2^256) * R, the Montgomery form of the top half.
        let mut hi = Scalar(mont_mul(&hi_limbs, &R3, &MODULUS, INV));
        let mut lo = Scalar(mont_mul(&lo_limbs, &R2, &MODULUS, INV));
        let s = Scalar::add(&hi, &lo);
        hi_limbs.zeroize();
        lo_limbs.zeroize();
        hi.zeroize();
        lo.zeroize();
        s
    }

    /// Reduce an arbitrary big-endian byte string of at most 64 bytes. Longer
    /// inputs return `None`.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Option<Scalar> {
        if bytes.len() > 64 {
            return None;
        }
        let mut wide = [0u8; 64];
        wide[64 - bytes.len()..].copy_from_slice(bytes);
        let s = Self::from_bytes_wide_be(&wide);
        wide.zeroize();
        Some(s)
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Scalar {
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        let s = Self::from_bytes_wide_be(&bytes);
        bytes.zeroize();
        s
    }

    #[inline]
    pub fn is_zero(&self) -> Choice { self.ct_eq(&Scalar::zero()) }

    #[inline]
    pub fn add(&self, rhs: &Scalar) -> Scalar { Scalar(add_mod(&self.0, &rhs.0, &MODULUS)) }

    #[inline]
    pub fn sub(&self, rhs: &Scalar) -> Scalar { Scalar(sub_mod(&self.0, &rhs.0, &MODULUS)) }

    #[inline]
    pub fn neg(&self) -> Scalar { Scalar(neg_mod(&self.0, &MODULUS)) }

    #[inline]
    pub fn mul(&self, rhs: &Scalar) -> Scalar { Scalar(mont_mul(&self.0, &rhs.0, &MODULUS, INV)) }

    #[inline]
    pub fn square(&self) -> Scalar { self.mul(self) }

    #[inline]
    pub fn double(&self) -> Scalar { self.add(self) }

    pub fn pow_vartime(&self, exp: &[u64]) -> Scalar { <Self as Field>::pow_vartime(self, exp) }

    pub fn invert(&self) -> CtOption<Scalar> {
        CtOption::new(self.pow_vartime(&R_MINUS_2), !self.is_zero())
    }
}

impl_field_ops!(Scalar);

impl Field for Scalar {
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self { Scalar::random(rng) }

    fn zero() -> Self { Scalar::zero() }

    fn one() -> Self { Scalar::one() }

    fn is_zero(&self) -> Choice { Scalar::is_zero(self) }

    fn square(&self) -> Self { Scalar::square(self) }

    fn double(&self) -> Self { Scalar::double(self) }

    fn invert(&self) -> CtOption<Self> { Scalar::invert(self) }
}
