//! Basic definitions of the field and curve abstractions, and their
//! implementation for BLS12-381: the base field tower, the groups G1 and G2,
//! the optimal ate pairing, hashing to the curve and multi-scalar
//! multiplication.

/// Implements the arithmetic operator traits for a type with inherent `add`,
/// `sub`, `mul` and `neg` methods taking their arguments by reference.
macro_rules! impl_field_ops {
    ($t:ident) => {
        impl<'a, 'b> ::std::ops::Add<&'b $t> for &'a $t {
            type Output = $t;

            #[inline]
            fn add(self, rhs: &'b $t) -> $t { $t::add(self, rhs) }
        }

        impl ::std::ops::Add<$t> for $t {
            type Output = $t;

            #[inline]
            fn add(self, rhs: $t) -> $t { $t::add(&self, &rhs) }
        }

        impl<'b> ::std::ops::Add<&'b $t> for $t {
            type Output = $t;

            #[inline]
            fn add(self, rhs: &'b $t) -> $t { $t::add(&self, rhs) }
        }

        impl<'a, 'b> ::std::ops::Sub<&'b $t> for &'a $t {
            type Output = $t;

            #[inline]
            fn sub(self, rhs: &'b $t) -> $t { $t::sub(self, rhs) }
        }

        impl ::std::ops::Sub<$t> for $t {
            type Output = $t;

            #[inline]
            fn sub(self, rhs: $t) -> $t { $t::sub(&self, &rhs) }
        }

        impl<'b> ::std::ops::Sub<&'b $t> for $t {
            type Output = $t;

            #[inline]
            fn sub(self, rhs: &'b $t) -> $t { $t::sub(&self, rhs) }
        }

        impl<'a, 'b> ::std::ops::Mul<&'b $t> for &'a $t {
            type Output = $t;

            #[inline]
            fn mul(self, rhs: &'b $t) -> $t { $t::mul(self, rhs) }
        }

        impl ::std::ops::Mul<$t> for $t {
            type Output = $t;

            #[inline]
            fn mul(self, rhs: $t) -> $t { $t::mul(&self, &rhs) }
        }

        impl<'b> ::std::ops::Mul<&'b $t> for $t {
            type Output = $t;

            #[inline]
            fn mul(self, rhs: &'b $t) -> $t { $t::mul(&self, rhs) }
        }

        impl<'a> ::std::ops::Neg for &'a $t {
            type Output = $t;

            #[inline]
            fn neg(self) -> $t { $t::neg(self) }
        }

        impl ::std::ops::Neg for $t {
            type Output = $t;

            #[inline]
            fn neg(self) -> $t { $t::neg(&self) }
        }

        impl ::std::ops::AddAssign<$t> for $t {
            #[inline]
            fn add_assign(&mut self, rhs: $t) { *self = $t::add(self, &rhs); }
        }

        impl<'b> ::std::ops::AddAssign<&'b $t> for $t {
            #[inline]
            fn add_assign(&mut self, rhs: &'b $t) { *self = $t::add(self, rhs); }
        }

        impl ::std::ops::SubAssign<$t> for $t {
            #[inline]
            fn sub_assign(&mut self, rhs: $t) { *self = $t::sub(self, &rhs); }
        }

        impl<'b> ::std::ops::SubAssign<&'b $t> for $t {
            #[inline]
            fn sub_assign(&mut self, rhs: &'b $t) { *self = $t::sub(self, rhs); }
        }

        impl ::std::ops::MulAssign<$t> for $t {
            #[inline]
            fn mul_assign(&mut self, rhs: $t) { *self = $t::mul(self, &rhs); }
        }

        impl<'b> ::std::ops::MulAssign<&'b $t> for $t {
            #[inline]
            fn mul_assign(&mut self, rhs: &'b $t) { *self = $t::mul(self, rhs); }
        }
    };
}

mod arith;
pub mod bls12_381_g1hash;
pub mod bls12_381_g2hash;
pub mod fp;
pub mod fp12;
pub mod fp2;
pub mod fp6;
pub mod g1;
pub mod g2;
pub mod hashing;
pub mod multiexp;
pub mod pairing;
pub mod point;
pub mod scalar;
mod window;

pub use fp::Fp;
pub use fp12::Fp12;
pub use fp2::Fp2;
pub use fp6::Fp6;
pub use g1::{G1Affine, G1Projective, G1};
pub use g2::{G2Affine, G2Projective, G2};
pub use multiexp::{batch_normalize, multiexp, multiexp_bits, multiexp_with_window, sum_points};
pub use pairing::{
    check_pairing_eq, final_exponentiation, miller_loop, miller_loop_n, multi_miller_loop, pairing,
    pairing_product_is_one,
};
pub use point::{Affine, Projective};
pub use scalar::Scalar;

use rand::RngCore;
use std::{
    fmt::Debug,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use thiserror::Error;

/// Reasons why a byte string does not decode to a valid group element.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveDecodingError {
    #[error("Expected {expected} bytes, got {actual}.")]
    WrongLength { expected: usize, actual: usize },
    #[error("The compression flag does not match the encoding length.")]
    WrongCompressionFlag,
    #[error("The point at infinity is not encoded canonically.")]
    InvalidInfinityEncoding,
    #[error("The sign flag is set in an uncompressed encoding.")]
    UnexpectedSignFlag,
    #[error("A coordinate is not a field element.")]
    NotInField,
    #[error("Not a point on the curve.")]
    NotOnCurve,
    #[error("The point is not in the prime order subgroup.")]
    NotInSubgroup,
}

/// This trait represents an element of a field. All operations run in time
/// independent of the values involved, except where a method says otherwise.
pub trait Field:
    Sized
    + Eq
    + Copy
    + Clone
    + Send
    + Sync
    + Debug
    + Default
    + ConditionallySelectable
    + ConstantTimeEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self> {
    /// Returns an element chosen uniformly at random using a user-provided RNG.
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    /// Returns the zero element of the field, the additive identity.
    fn zero() -> Self;

    /// Returns the one element of the field, the multiplicative identity.
    fn one() -> Self;

    fn is_zero(&self) -> Choice;

    #[must_use]
    fn square(&self) -> Self;

    #[must_use]
    fn double(&self) -> Self;

    /// Computes the multiplicative inverse of this element, if nonzero.
    fn invert(&self) -> CtOption<Self>;

    /// Exponentiates this element by a number represented with `u64` limbs,
    /// least significant digit first. This operation is variable time with
    /// respect to the exponent, but not with respect to `self`.
    #[must_use]
    fn pow_vartime<S: AsRef<[u64]>>(&self, exp: S) -> Self {
        let mut res = Self::one();
        for e in exp.as_ref().iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res *= self;
                }
            }
        }
        res
    }
}

/// A field over which one of the curves is defined. Adds the fixed size
/// big-endian encoding, square roots and the sign conventions used by point
/// compression.
pub trait BaseField: Field {
    /// Size in bytes of the encoding of one element.
    const SIZE: usize;

    fn from_u64(v: u64) -> Self;

    /// Writes the big-endian encoding into `out`, which must be exactly
    /// [BaseField::SIZE] bytes long.
    fn write_be(&self, out: &mut [u8]);

    /// Reads an element from exactly [BaseField::SIZE] bytes, rejecting
    /// values that are not reduced.
    fn read_be(bytes: &[u8]) -> CtOption<Self>;

    fn sqrt(&self) -> CtOption<Self>;

    /// Square roots of a batch of elements. Implementations may share work
    /// between the elements, but the result is the same as calling
    /// [BaseField::sqrt] on each element.
    fn sqrt_batch(values: &[Self]) -> Vec<CtOption<Self>> { values.iter().map(Self::sqrt).collect() }

    /// The sign used by point compression: whether the element is the larger
    /// of itself and its negation.
    fn lexicographically_largest(&self) -> Choice;
}

/// A curve of the form `y^2 = x^3 + b` together with its prime order subgroup.
/// This is implemented by the marker types [G1] and [G2], and everything the
/// generic point code in [point] needs to know about a particular curve goes
/// through this trait.
pub trait Curve: 'static + Copy + Clone + Debug + Send + Sync + PartialEq + Eq {
    /// The field the coordinates live in.
    type Base: BaseField;
    /// A human readable name, used in logs.
    const NAME: &'static str;
    /// Size in bytes of group elements when serialized in compressed form.
    const GROUP_ELEMENT_LENGTH: usize;
    /// Size in bytes of group elements when serialized without compression.
    const UNCOMPRESSED_LENGTH: usize;

    /// The constant `b` of the curve equation.
    fn b() -> Self::Base;
    /// `3 * b`, used by the complete addition formulas.
    fn b3() -> Self::Base;
    /// Chosen generator of the prime order subgroup.
    fn generator() -> Affine<Self>;
    /// Whether a point on the curve lies in the prime order subgroup. This is
    /// not constant time.
    fn is_torsion_free(p: &Projective<Self>) -> bool;
    /// Maps a point on the curve into the prime order subgroup.
    fn clear_cofactor(p: &Projective<Self>) -> Projective<Self>;
    /// The random oracle hash to the curve, with a domain separation tag.
    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Projective<Self>;
    /// The nonuniform encoding to the curve, with a domain separation tag.
    fn encode_to_curve(msg: &[u8], dst: &[u8]) -> Projective<Self>;
}

/// Inverts every nonzero element of the slice in place using Montgomery's
/// trick, at the cost of a single field inversion. Zero elements are left as
/// zero.
pub fn batch_invert<F: Field>(values: &mut [F]) {
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for v in values.iter() {
        prefix.push(acc);
        acc *= F::conditional_select(v, &F::one(), v.is_zero());
    }
    // acc is a product of nonzero elements, so it is invertible
    acc = acc.invert().unwrap_or(F::zero());
    for (v, p) in values.iter_mut().zip(prefix.into_iter()).rev() {
        let skip = v.is_zero();
        let inverse = acc * p;
        acc *= F::conditional_select(v, &F::one(), skip);
        *v = F::conditional_select(&inverse, &F::zero(), skip);
    }
}
