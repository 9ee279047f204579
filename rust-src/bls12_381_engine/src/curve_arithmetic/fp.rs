//! The base field `Fp` of BLS12-381, with elements stored in Montgomery form
//! as six little-endian 64-bit limbs.
use super::{
    arith::{add_mod, is_above, is_below, limbs_from_be_bytes, limbs_to_be_bytes, mont_mul, neg_mod, sub_mod},
    BaseField, Field,
};
use rand::RngCore;
use std::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// p = 0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab
#[allow(clippy::unreadable_literal)]
pub(crate) const MODULUS: [u64; 6] = [
    0xb9feffffffffaaab,
    0x1eabfffeb153ffff,
    0x6730d2a0f6b0f624,
    0x64774b84f38512bf,
    0x4b1ba7b6434bacd7,
    0x1a0111ea397fe69a,
];

/// -p^{-1} mod 2^64
const INV: u64 = 0x89f3fffcfffcfffd;

/// R = 2^384 mod p
#[allow(clippy::unreadable_literal)]
const R: [u64; 6] = [
    0x760900000002fffd,
    0xebf4000bc40c0002,
    0x5f48985753c758ba,
    0x77ce585370525745,
    0x5c071a97a256ec6d,
    0x15f65ec3fa80e493,
];

/// R^2 = 2^768 mod p
#[allow(clippy::unreadable_literal)]
const R2: [u64; 6] = [
    0xf4df1f341c341746,
    0x0a76e6a609d104f1,
    0x8de5476c4c95b6d5,
    0x67eb88a9939d83c0,
    0x9a793e85b519952d,
    0x11988fe592cae3aa,
];

// 2^256 in Montgomery form, used when reducing 64 byte strings.
#[allow(clippy::unreadable_literal)]
const TWO_TO_256: Fp = Fp([
    0x075b3cd7c5ce820f,
    0x3ec6ba621c3edb0b,
    0x168a13d82bff6bce,
    0x87663c4bf8c449d2,
    0x15f34c83ddc8d830,
    0x0f9628b49caa2e85,
]);

// 1/2 in Montgomery form.
#[allow(clippy::unreadable_literal)]
pub(crate) const HALF: Fp = Fp([
    0x1804000000015554,
    0x855000053ab00001,
    0x633cb57c253c276f,
    0x6e22d1ec31ebb502,
    0xd3916126f2d14ca2,
    0x17fbb8571a006596,
]);

// p - 2, the exponent for inversion by Fermat's little theorem.
#[allow(clippy::unreadable_literal)]
const P_MINUS_2: [u64; 6] = [
    0xb9feffffffffaaa9,
    0x1eabfffeb153ffff,
    0x6730d2a0f6b0f624,
    0x64774b84f38512bf,
    0x4b1ba7b6434bacd7,
    0x1a0111ea397fe69a,
];

// (p + 1) / 4, the exponent for square roots since p = 3 mod 4.
#[allow(clippy::unreadable_literal)]
const P_PLUS_1_DIV_4: [u64; 6] = [
    0xee7fbfffffffeaab,
    0x07aaffffac54ffff,
    0xd9cc34a83dac3d89,
    0xd91dd2e13ce144af,
    0x92c6e9ed90d2eb35,
    0x0680447a8e5ff9a6,
];

// (p - 1) / 2, the exponent of the Legendre symbol.
#[allow(clippy::unreadable_literal)]
pub(crate) const P_MINUS_1_DIV_2: [u64; 6] = [
    0xdcff7fffffffd555,
    0x0f55ffff58a9ffff,
    0xb39869507b587b12,
    0xb23ba5c279c2895f,
    0x258dd3db21a5d66b,
    0x0d0088f51cbff34d,
];

/// (p-3)/4 where p is the prime characteristic of the field.
#[allow(clippy::unreadable_literal)]
pub(crate) const P_MINUS_3_DIV_4: [u64; 6] = [
    0xee7fbfffffffeaaa,
    0x07aaffffac54ffff,
    0xd9cc34a83dac3d89,
    0xd91dd2e13ce144af,
    0x92c6e9ed90d2eb35,
    0x0680447a8e5ff9a6,
];

/// An element of the base field, kept in Montgomery form.
#[derive(Copy, Clone)]
pub struct Fp(pub(crate) [u64; 6]);

impl fmt::Debug for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl Default for Fp {
    fn default() -> Self { Fp::zero() }
}

impl ConstantTimeEq for Fp {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(Choice::from(1), |acc, (a, b)| acc & a.ct_eq(b))
    }
}

impl PartialEq for Fp {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl Eq for Fp {}

impl ConditionallySelectable for Fp {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 6];
        for (i, limb) in out.iter_mut().enumerate() {
            *limb = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Fp(out)
    }
}

impl Fp {
    /// The additive identity.
    #[inline]
    pub const fn zero() -> Fp { Fp([0, 0, 0, 0, 0, 0]) }

    /// The multiplicative identity.
    #[inline]
    pub const fn one() -> Fp { Fp(R) }

    /// Build an element from limbs that are already in Montgomery form.
    pub(crate) const fn from_raw_unchecked(v: [u64; 6]) -> Fp { Fp(v) }

    /// Convert a small integer into the field.
    pub fn from_u64(v: u64) -> Fp { Fp(mont_mul(&[v, 0, 0, 0, 0, 0], &R2, &MODULUS, INV)) }

    /// Convert canonical little-endian limbs into the field. Fails if the
    /// value is not smaller than the modulus.
    pub fn from_canonical_limbs(limbs: &[u64; 6]) -> CtOption<Fp> {
        let in_range = Choice::from(is_below(limbs, &MODULUS));
        CtOption::new(Fp(mont_mul(limbs, &R2, &MODULUS, INV)), in_range)
    }

    /// Like [Fp::from_canonical_limbs], for tables of constants known to be
    /// reduced.
    pub(crate) fn from_canonical_unchecked(limbs: &[u64; 6]) -> Fp {
        Fp(mont_mul(limbs, &R2, &MODULUS, INV))
    }

    /// The canonical little-endian limbs of the element.
    pub fn to_canonical_limbs(&self) -> [u64; 6] {
        mont_mul(&self.0, &[1, 0, 0, 0, 0, 0], &MODULUS, INV)
    }

    /// Decode a big-endian 48 byte string. Fails if the integer is not
    /// smaller than the modulus.
    pub fn from_bytes(bytes: &[u8; 48]) -> CtOption<Fp> {
        Self::from_canonical_limbs(&limbs_from_be_bytes::<6>(bytes))
    }

    /// Big-endian encoding of the canonical representative.
    pub fn to_bytes(&self) -> [u8; 48] {
        let mut out = [0u8; 48];
        limbs_to_be_bytes(&self.to_canonical_limbs(), &mut out);
        out
    }

    /// Interpret 64 big-endian bytes as an integer and reduce it modulo p.
    /// The input is split as `left * 2^256 + right`.
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Fp {
        let mut left = [0u64; 6];
        left[..4].copy_from_slice(&limbs_from_be_bytes::<4>(&bytes[..32]));
        let mut right = [0u64; 6];
        right[..4].copy_from_slice(&limbs_from_be_bytes::<4>(&bytes[32..]));
        // Both halves are below 2^256 < p, so they are already reduced.
        let left = Fp(mont_mul(&left, &R2, &MODULUS, INV));
        let right = Fp(mont_mul(&right, &R2, &MODULUS, INV));
        left.mul(&TWO_TO_256).add(&right)
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Fp {
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes_wide(&bytes)
    }

    #[inline]
    pub fn is_zero(&self) -> Choice { self.ct_eq(&Fp::zero()) }

    /// Whether the element is larger than `(p-1)/2` when read as an integer.
    pub fn lexicographically_largest(&self) -> Choice {
        Choice::from(is_above(&self.to_canonical_limbs(), &P_MINUS_1_DIV_2))
    }

    /// The parity of the canonical representative.
    pub fn sgn0(&self) -> Choice { Choice::from((self.to_canonical_limbs()[0] & 1) as u8) }

    #[inline]
    pub fn add(&self, rhs: &Fp) -> Fp { Fp(add_mod(&self.0, &rhs.0, &MODULUS)) }

    #[inline]
    pub fn sub(&self, rhs: &Fp) -> Fp { Fp(sub_mod(&self.0, &rhs.0, &MODULUS)) }

    #[inline]
    pub fn neg(&self) -> Fp { Fp(neg_mod(&self.0, &MODULUS)) }

    #[inline]
    pub fn mul(&self, rhs: &Fp) -> Fp { Fp(mont_mul(&self.0, &rhs.0, &MODULUS, INV)) }

    #[inline]
    pub fn square(&self) -> Fp { self.mul(self) }

    #[inline]
    pub fn double(&self) -> Fp { self.add(self) }

    /// Exponentiation by an exponent given in little-endian limbs. The running
    /// time depends on the exponent only.
    pub fn pow_vartime(&self, exp: &[u64]) -> Fp {
        let mut res = Fp::one();
        for e in exp.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }

    /// Inversion by Fermat's little theorem. The exponent is public, so this
    /// runs in constant time with respect to `self`.
    pub fn invert(&self) -> CtOption<Fp> {
        CtOption::new(self.pow_vartime(&P_MINUS_2), !self.is_zero())
    }

    /// Square root, if one exists. Since p = 3 mod 4 the candidate is
    /// `self^((p+1)/4)`.
    pub fn sqrt(&self) -> CtOption<Fp> {
        let candidate = self.pow_vartime(&P_PLUS_1_DIV_4);
        CtOption::new(candidate, candidate.square().ct_eq(self))
    }

    /// Whether the element is a square, zero included.
    pub fn is_square(&self) -> Choice {
        let legendre = self.pow_vartime(&P_MINUS_1_DIV_2);
        legendre.is_zero() | legendre.ct_eq(&Fp::one())
    }
}

impl_field_ops!(Fp);

impl Field for Fp {
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self { Fp::random(rng) }

    fn zero() -> Self { Fp::zero() }

    fn one() -> Self { Fp::one() }

    fn is_zero(&self) -> Choice { Fp::is_zero(self) }

    fn square(&self) -> Self { Fp::square(self) }

    fn double(&self) -> Self { Fp::double(self) }

    fn invert(&self) -> CtOption<Self> { Fp::invert(self) }
}

impl BaseField for Fp {
    const SIZE: usize = 48;

    fn from_u64(v: u64) -> Self { Fp::from_u64(v) }

    fn write_be(&self, out: &mut [u8]) { out.copy_from_slice(&self.to_bytes()) }

    fn read_be(bytes: &[u8]) -> CtOption<Self> {
        let mut buf = [0u8; 48];
        buf.copy_from_slice(bytes);
        Fp::from_bytes(&buf)
    }

    fn sqrt(&self) -> CtOption<Self> { Fp::sqrt(self) }

    fn lexicographically_largest(&self) -> Choice { Fp::lexicographically_largest(self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_montgomery_constants() {
        assert_eq!(Fp::one().to_canonical_limbs(), [1, 0, 0, 0, 0, 0]);
        assert_eq!(Fp::from_u64(4).to_canonical_limbs(), [4, 0, 0, 0, 0, 0]);
        assert_eq!(TWO_TO_256.to_canonical_limbs(), [0, 0, 0, 0, 1, 0]);
        assert_eq!(HALF.double(), Fp::one());
        // p - 1 is the largest canonical value
        let mut p_minus_1 = MODULUS;
        p_minus_1[0] -= 1;
        let minus_one = Fp::one().neg();
        assert_eq!(minus_one.to_canonical_limbs(), p_minus_1);
        assert!(bool::from(Fp::from_canonical_limbs(&MODULUS).is_none()));
    }

    #[test]
    fn test_field_laws() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..100 {
            let a = Fp::random(&mut rng);
            let b = Fp::random(&mut rng);
            let c = Fp::random(&mut rng);
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!((a - b) + b, a);
            assert_eq!(a + (-a), Fp::zero());
            assert_eq!(a.square(), a * a);
            assert_eq!(a.double(), a + a);
            if !bool::from(a.is_zero()) {
                assert_eq!(a * a.invert().unwrap(), Fp::one());
            }
        }
        assert!(bool::from(Fp::zero().invert().is_none()));
    }

    #[test]
    fn test_byte_encoding() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let a = Fp::random(&mut rng);
            assert_eq!(Fp::from_bytes(&a.to_bytes()).unwrap(), a);
        }
        let mut p_bytes = [0u8; 48];
        limbs_to_be_bytes(&MODULUS, &mut p_bytes);
        assert!(bool::from(Fp::from_bytes(&p_bytes).is_none()));
        assert!(bool::from(Fp::from_bytes(&[0xff; 48]).is_none()));
    }

    #[test]
    fn test_from_bytes_wide() {
        // 2^256 + 1 split as left = 1, right = 1
        let mut bytes = [0u8; 64];
        bytes[31] = 1;
        bytes[63] = 1;
        assert_eq!(Fp::from_bytes_wide(&bytes).to_canonical_limbs(), [1, 0, 0, 0, 1, 0]);
        // 2^512 - 1 reduced modulo p agrees with the slow computation
        let all_ones = Fp::from_bytes_wide(&[0xff; 64]);
        let two_to_256 = Fp::from_u64(1 << 32).pow_vartime(&[8]);
        let expected = two_to_256.square() - Fp::one();
        assert_eq!(all_ones, expected);
    }

    #[test]
    fn test_sqrt() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut squares = 0;
        for _ in 0..100 {
            let a = Fp::random(&mut rng);
            let s = a.square();
            let root = s.sqrt().unwrap();
            assert!(root == a || root == -a);
            assert!(bool::from(s.is_square()));
            if bool::from(a.is_square()) {
                squares += 1;
                assert!(bool::from(a.sqrt().is_some()));
            } else {
                assert!(bool::from(a.sqrt().is_none()));
            }
        }
        assert!(squares > 0 && squares < 100);
        // -1 is not a square since p = 3 mod 4
        assert!(bool::from((-Fp::one()).sqrt().is_none()));
    }

    #[test]
    fn test_lexicographic_order() {
        assert!(!bool::from(Fp::zero().lexicographically_largest()));
        assert!(!bool::from(Fp::one().lexicographically_largest()));
        assert!(bool::from((-Fp::one()).lexicographically_largest()));
        let half = Fp::from_canonical_limbs(&P_MINUS_1_DIV_2).unwrap();
        assert!(!bool::from(half.lexicographically_largest()));
        assert!(bool::from((half + Fp::one()).lexicographically_largest()));
        assert!(bool::from(Fp::one().sgn0()));
        assert!(!bool::from(Fp::from_u64(2).sgn0()));
    }
}
