//! Points on the curves `y^2 = x^3 + b`, generic over the curve.
//!
//! [Projective] points use homogeneous coordinates `(X : Y : Z)` with
//! `x = X/Z` and `y = Y/Z`, and the complete addition formulas of
//! <https://eprint.iacr.org/2015/1060.pdf> (algorithms 7, 8 and 9), so there
//! are no exceptional cases and no branches on secret data. [Affine] points
//! are used for serialization and as pairing input.
use super::{
    window::{mul_fixed_window, WindowGroup},
    BaseField, Curve, CurveDecodingError, Field, Scalar,
};
use crate::parallel::ExecutionContext;
use rand::RngCore;
use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

const COMPRESSION_FLAG: u8 = 0x80;
const INFINITY_FLAG: u8 = 0x40;
const SIGN_FLAG: u8 = 0x20;
const FLAG_MASK: u8 = COMPRESSION_FLAG | INFINITY_FLAG | SIGN_FLAG;

/// Number of encodings decompressed together with one batched square root.
const DECOMPRESSION_SHARD: usize = 256;

/// A point in affine coordinates. The point at infinity is represented by a
/// flag, with the coordinates set to `(0, 1)`.
pub struct Affine<C: Curve> {
    pub(crate) x:        C::Base,
    pub(crate) y:        C::Base,
    pub(crate) infinity: Choice,
}

impl<C: Curve> Clone for Affine<C> {
    fn clone(&self) -> Self { *self }
}

impl<C: Curve> Copy for Affine<C> {}

impl<C: Curve> fmt::Debug for Affine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if bool::from(self.infinity) {
            write!(f, "{}(infinity)", C::NAME)
        } else {
            write!(f, "{}(x = {:?}, y = {:?})", C::NAME, self.x, self.y)
        }
    }
}

impl<C: Curve> Default for Affine<C> {
    fn default() -> Self { Self::identity() }
}

impl<C: Curve> ConstantTimeEq for Affine<C> {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.infinity & other.infinity)
            | (!self.infinity
                & !other.infinity
                & self.x.ct_eq(&other.x)
                & self.y.ct_eq(&other.y))
    }
}

impl<C: Curve> PartialEq for Affine<C> {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl<C: Curve> Eq for Affine<C> {}

impl<C: Curve> ConditionallySelectable for Affine<C> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Affine {
            x:        C::Base::conditional_select(&a.x, &b.x, choice),
            y:        C::Base::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

/// The x-coordinate part of a compressed encoding.
enum CompressedX<F> {
    Identity,
    Point { x: F, largest: bool },
}

impl<C: Curve> Affine<C> {
    pub fn identity() -> Self {
        Affine {
            x:        C::Base::zero(),
            y:        C::Base::one(),
            infinity: Choice::from(1),
        }
    }

    pub fn generator() -> Self { C::generator() }

    /// Build a point from coordinates without any checks. The result is only
    /// meaningful if the coordinates satisfy the curve equation.
    pub fn from_xy_unchecked(x: C::Base, y: C::Base) -> Self {
        Affine {
            x,
            y,
            infinity: Choice::from(0),
        }
    }

    pub fn x(&self) -> C::Base { self.x }

    pub fn y(&self) -> C::Base { self.y }

    pub fn is_identity(&self) -> Choice { self.infinity }

    pub fn is_on_curve(&self) -> Choice {
        (self.y.square() - curve_rhs::<C>(&self.x)).is_zero() | self.infinity
    }

    /// Whether the point is in the prime order subgroup. This is not constant
    /// time.
    pub fn is_torsion_free(&self) -> bool { C::is_torsion_free(&self.to_projective()) }

    pub fn to_projective(&self) -> Projective<C> { Projective::from(*self) }

    pub fn neg(&self) -> Self {
        Affine {
            x:        self.x,
            y:        C::Base::conditional_select(&self.y.neg(), &self.y, self.infinity),
            infinity: self.infinity,
        }
    }

    /// The compressed encoding: the big-endian x-coordinate with the flags in
    /// the top three bits of the first byte.
    pub fn to_compressed(&self) -> Vec<u8> {
        let mut out = vec![0u8; C::Base::SIZE];
        C::Base::conditional_select(&self.x, &C::Base::zero(), self.infinity).write_be(&mut out);
        out[0] |= COMPRESSION_FLAG;
        out[0] |= u8::conditional_select(&0, &INFINITY_FLAG, self.infinity);
        out[0] |= u8::conditional_select(
            &0,
            &SIGN_FLAG,
            !self.infinity & self.y.lexicographically_largest(),
        );
        out
    }

    /// The uncompressed encoding `x || y`, with only the infinity flag in use.
    pub fn to_uncompressed(&self) -> Vec<u8> {
        let size = C::Base::SIZE;
        let mut out = vec![0u8; 2 * size];
        let zero = C::Base::zero();
        C::Base::conditional_select(&self.x, &zero, self.infinity).write_be(&mut out[..size]);
        C::Base::conditional_select(&self.y, &zero, self.infinity).write_be(&mut out[size..]);
        out[0] |= u8::conditional_select(&0, &INFINITY_FLAG, self.infinity);
        out
    }

    /// Decode a compressed point and check that it lies on the curve, but not
    /// that it lies in the prime order subgroup.
    pub fn from_compressed_unchecked(bytes: &[u8]) -> Result<Self, CurveDecodingError> {
        match parse_compressed::<C>(bytes)? {
            CompressedX::Identity => Ok(Self::identity()),
            CompressedX::Point { x, largest } => {
                let y: Option<C::Base> = curve_rhs::<C>(&x).sqrt().into();
                let y = y.ok_or(CurveDecodingError::NotOnCurve)?;
                Ok(Self::with_sign(x, y, largest))
            }
        }
    }

    /// Decode a compressed point, checking subgroup membership.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self, CurveDecodingError> {
        Self::from_compressed_unchecked(bytes)?.subgroup_checked()
    }

    /// Decode an uncompressed point and check that it lies on the curve, but
    /// not that it lies in the prime order subgroup.
    pub fn from_uncompressed_unchecked(bytes: &[u8]) -> Result<Self, CurveDecodingError> {
        let size = C::Base::SIZE;
        if bytes.len() != 2 * size {
            return Err(CurveDecodingError::WrongLength {
                expected: C::UNCOMPRESSED_LENGTH,
                actual:   bytes.len(),
            });
        }
        let flags = bytes[0] & FLAG_MASK;
        if flags & COMPRESSION_FLAG != 0 {
            return Err(CurveDecodingError::WrongCompressionFlag);
        }
        if flags & SIGN_FLAG != 0 {
            return Err(CurveDecodingError::UnexpectedSignFlag);
        }
        if flags & INFINITY_FLAG != 0 {
            return if bytes[0] & !FLAG_MASK == 0 && bytes[1..].iter().all(|b| *b == 0) {
                Ok(Self::identity())
            } else {
                Err(CurveDecodingError::InvalidInfinityEncoding)
            };
        }
        let x: Option<C::Base> = C::Base::read_be(&bytes[..size]).into();
        let y: Option<C::Base> = C::Base::read_be(&bytes[size..]).into();
        match (x, y) {
            (Some(x), Some(y)) => {
                let p = Self::from_xy_unchecked(x, y);
                if bool::from(p.is_on_curve()) {
                    Ok(p)
                } else {
                    Err(CurveDecodingError::NotOnCurve)
                }
            }
            _ => Err(CurveDecodingError::NotInField),
        }
    }

    /// Decode an uncompressed point, checking subgroup membership.
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self, CurveDecodingError> {
        Self::from_uncompressed_unchecked(bytes)?.subgroup_checked()
    }

    /// Decode either encoding, chosen by the length of the input, with all
    /// checks.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CurveDecodingError> {
        if bytes.len() == C::GROUP_ELEMENT_LENGTH {
            Self::from_compressed(bytes)
        } else if bytes.len() == C::UNCOMPRESSED_LENGTH {
            Self::from_uncompressed(bytes)
        } else {
            Err(CurveDecodingError::WrongLength {
                expected: C::GROUP_ELEMENT_LENGTH,
                actual:   bytes.len(),
            })
        }
    }

    /// Decompress a list of encodings, sharing the square root computations
    /// within each shard. The result is the same as decompressing each
    /// encoding on its own, and the whole batch fails if any one encoding
    /// does. With `check_subgroup` every point is also checked for subgroup
    /// membership.
    pub fn batch_from_compressed<B: AsRef<[u8]> + Sync>(
        ctx: &ExecutionContext,
        inputs: &[B],
        check_subgroup: bool,
    ) -> Result<Vec<Self>, CurveDecodingError> {
        let shards = ctx.map_shards(inputs.len(), DECOMPRESSION_SHARD, |range| {
            Self::uncompress_shard(&inputs[range], check_subgroup)
        });
        let mut out = Vec::with_capacity(inputs.len());
        for shard in shards {
            out.extend(shard?);
        }
        Ok(out)
    }

    fn uncompress_shard<B: AsRef<[u8]>>(
        inputs: &[B],
        check_subgroup: bool,
    ) -> Result<Vec<Self>, CurveDecodingError> {
        let parsed = inputs
            .iter()
            .map(|b| parse_compressed::<C>(b.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let rhs: Vec<C::Base> = parsed
            .iter()
            .filter_map(|p| match p {
                CompressedX::Identity => None,
                CompressedX::Point { x, .. } => Some(curve_rhs::<C>(x)),
            })
            .collect();
        let mut roots = C::Base::sqrt_batch(&rhs).into_iter();
        let mut out = Vec::with_capacity(parsed.len());
        for p in parsed {
            let point = match p {
                CompressedX::Identity => Self::identity(),
                CompressedX::Point { x, largest } => {
                    let y: Option<C::Base> = roots.next().and_then(|r| r.into());
                    Self::with_sign(x, y.ok_or(CurveDecodingError::NotOnCurve)?, largest)
                }
            };
            if check_subgroup && !point.is_torsion_free() {
                return Err(CurveDecodingError::NotInSubgroup);
            }
            out.push(point);
        }
        Ok(out)
    }

    fn with_sign(x: C::Base, y: C::Base, largest: bool) -> Self {
        let y = if bool::from(y.lexicographically_largest()) == largest {
            y
        } else {
            y.neg()
        };
        Self::from_xy_unchecked(x, y)
    }

    fn subgroup_checked(self) -> Result<Self, CurveDecodingError> {
        if self.is_torsion_free() {
            Ok(self)
        } else {
            Err(CurveDecodingError::NotInSubgroup)
        }
    }
}

/// `x^3 + b`
fn curve_rhs<C: Curve>(x: &C::Base) -> C::Base { x.square() * x + C::b() }

fn parse_compressed<C: Curve>(bytes: &[u8]) -> Result<CompressedX<C::Base>, CurveDecodingError> {
    if bytes.len() != C::Base::SIZE {
        return Err(CurveDecodingError::WrongLength {
            expected: C::GROUP_ELEMENT_LENGTH,
            actual:   bytes.len(),
        });
    }
    let flags = bytes[0] & FLAG_MASK;
    if flags & COMPRESSION_FLAG == 0 {
        return Err(CurveDecodingError::WrongCompressionFlag);
    }
    if flags & INFINITY_FLAG != 0 {
        return if flags & SIGN_FLAG == 0
            && bytes[0] & !FLAG_MASK == 0
            && bytes[1..].iter().all(|b| *b == 0)
        {
            Ok(CompressedX::Identity)
        } else {
            Err(CurveDecodingError::InvalidInfinityEncoding)
        };
    }
    let mut buf = bytes.to_vec();
    buf[0] &= !FLAG_MASK;
    let x: Option<C::Base> = C::Base::read_be(&buf).into();
    Ok(CompressedX::Point {
        x:       x.ok_or(CurveDecodingError::NotInField)?,
        largest: flags & SIGN_FLAG != 0,
    })
}

/// A point in homogeneous projective coordinates.
pub struct Projective<C: Curve> {
    pub(crate) x: C::Base,
    pub(crate) y: C::Base,
    pub(crate) z: C::Base,
}

impl<C: Curve> Clone for Projective<C> {
    fn clone(&self) -> Self { *self }
}

impl<C: Curve> Copy for Projective<C> {}

impl<C: Curve> fmt::Debug for Projective<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(&self.to_affine(), f) }
}

impl<C: Curve> Default for Projective<C> {
    fn default() -> Self { Self::identity() }
}

impl<C: Curve> ConstantTimeEq for Projective<C> {
    /// Compares the points, not their representations.
    fn ct_eq(&self, other: &Self) -> Choice {
        let x1 = self.x * other.z;
        let x2 = other.x * self.z;
        let y1 = self.y * other.z;
        let y2 = other.y * self.z;
        let self_id = self.is_identity();
        let other_id = other.is_identity();
        (self_id & other_id) | (!self_id & !other_id & x1.ct_eq(&x2) & y1.ct_eq(&y2))
    }
}

impl<C: Curve> PartialEq for Projective<C> {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl<C: Curve> Eq for Projective<C> {}

impl<C: Curve> ConditionallySelectable for Projective<C> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Projective {
            x: C::Base::conditional_select(&a.x, &b.x, choice),
            y: C::Base::conditional_select(&a.y, &b.y, choice),
            z: C::Base::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl<C: Curve> From<Affine<C>> for Projective<C> {
    fn from(p: Affine<C>) -> Self {
        Projective {
            x: p.x,
            y: p.y,
            z: C::Base::conditional_select(&C::Base::one(), &C::Base::zero(), p.infinity),
        }
    }
}

impl<C: Curve> From<Projective<C>> for Affine<C> {
    fn from(p: Projective<C>) -> Self { p.to_affine() }
}

impl<C: Curve> Projective<C> {
    pub fn identity() -> Self {
        Projective {
            x: C::Base::zero(),
            y: C::Base::one(),
            z: C::Base::zero(),
        }
    }

    pub fn generator() -> Self { Self::from(C::generator()) }

    /// The point `(x / z^2, y / z^3)` given in Jacobian coordinates, as the
    /// isogeny maps produce them. A zero `z` gives the identity.
    pub(crate) fn from_jacobian(x: C::Base, y: C::Base, z: C::Base) -> Self {
        let p = Projective {
            x: x * z,
            y,
            z: z.square() * z,
        };
        Self::conditional_select(&p, &Self::identity(), z.is_zero())
    }

    /// A uniformly random element of the prime order subgroup.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self { Self::generator().mul(&Scalar::random(rng)) }

    pub fn is_identity(&self) -> Choice { self.z.is_zero() }

    /// Checks `Y^2 Z = X^3 + b Z^3`.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square() * self.z;
        let rhs = self.x.square() * self.x + self.z.square() * self.z * C::b();
        lhs.ct_eq(&rhs)
    }

    /// Whether the point is in the prime order subgroup. This is not constant
    /// time.
    pub fn is_torsion_free(&self) -> bool { C::is_torsion_free(self) }

    pub fn clear_cofactor(&self) -> Self { C::clear_cofactor(self) }

    /// Hash to the curve in the random oracle mode.
    pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Self { C::hash_to_curve(msg, dst) }

    /// The nonuniform encoding to the curve.
    pub fn encode_to_curve(msg: &[u8], dst: &[u8]) -> Self { C::encode_to_curve(msg, dst) }

    pub fn to_affine(&self) -> Affine<C> {
        let zinv = self.z.invert().unwrap_or(C::Base::zero());
        let p = Affine {
            x:        self.x * zinv,
            y:        self.y * zinv,
            infinity: Choice::from(0),
        };
        Affine::conditional_select(&p, &Affine::identity(), self.is_identity())
    }

    pub fn to_compressed(&self) -> Vec<u8> { self.to_affine().to_compressed() }

    pub fn neg(&self) -> Self {
        Projective {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    pub fn double(&self) -> Self {
        let b3 = C::b3();
        let t0 = self.y.square();
        let z3 = t0.double().double().double();
        let t1 = self.y * self.z;
        let t2 = self.z.square() * b3;
        let x3 = t2 * z3;
        let y3 = t0 + t2;
        let z3 = t1 * z3;
        let t1 = t2.double();
        let t2 = t1 + t2;
        let t0 = t0 - t2;
        let y3 = t0 * y3 + x3;
        let t1 = self.x * self.y;
        let x3 = (t0 * t1).double();

        let tmp = Projective {
            x: x3,
            y: y3,
            z: z3,
        };
        Self::conditional_select(&tmp, &Self::identity(), self.is_identity())
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let b3 = C::b3();
        let t0 = self.x * rhs.x;
        let t1 = self.y * rhs.y;
        let t2 = self.z * rhs.z;
        let t3 = (self.x + self.y) * (rhs.x + rhs.y) - (t0 + t1);
        let t4 = (self.y + self.z) * (rhs.y + rhs.z) - (t1 + t2);
        let y3 = (self.x + self.z) * (rhs.x + rhs.z) - (t0 + t2);
        let t0 = t0.double() + t0;
        let t2 = t2 * b3;
        let z3 = t1 + t2;
        let t1 = t1 - t2;
        let y3 = y3 * b3;
        let x3 = t3 * t1 - t4 * y3;
        let y3 = t1 * z3 + y3 * t0;
        let z3 = z3 * t4 + t0 * t3;

        Projective {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Addition of an affine point, which saves a few multiplications.
    pub fn add_mixed(&self, rhs: &Affine<C>) -> Self {
        let b3 = C::b3();
        let t0 = self.x * rhs.x;
        let t1 = self.y * rhs.y;
        let t3 = (rhs.x + rhs.y) * (self.x + self.y) - (t0 + t1);
        let t4 = rhs.y * self.z + self.y;
        let y3 = rhs.x * self.z + self.x;
        let t0 = t0.double() + t0;
        let t2 = self.z * b3;
        let z3 = t1 + t2;
        let t1 = t1 - t2;
        let y3 = y3 * b3;
        let x3 = t3 * t1 - t4 * y3;
        let y3 = t1 * z3 + y3 * t0;
        let z3 = z3 * t4 + t0 * t3;

        let tmp = Projective {
            x: x3,
            y: y3,
            z: z3,
        };
        Self::conditional_select(&tmp, self, rhs.infinity)
    }

    pub fn sub(&self, rhs: &Self) -> Self { self.add(&rhs.neg()) }

    /// Constant time multiplication by a scalar. The canonical limbs are
    /// erased afterwards, so the scalar may be secret.
    pub fn mul(&self, scalar: &Scalar) -> Self {
        let mut limbs = scalar.to_canonical_limbs();
        let p = self.mul_bits(&limbs, 256);
        limbs.zeroize();
        p
    }

    /// Constant time multiplication by the integer with little-endian limbs
    /// `limbs`, of which only the lowest `num_bits` bits are used. Shorter
    /// bit lengths make the multiplication proportionally faster, which is
    /// useful for the small random scalars of batch verification.
    pub fn mul_bits(&self, limbs: &[u64], num_bits: usize) -> Self { mul_fixed_window(self, limbs, num_bits) }

    pub fn mul_u64(&self, k: u64) -> Self { self.mul_bits(&[k], 64) }

    /// Double-and-add multiplication by a public integer. This is not
    /// constant time and must not be used with secret scalars.
    pub fn mul_vartime(&self, limbs: &[u64]) -> Self {
        let mut acc = Self::identity();
        let mut found_one = false;
        for limb in limbs.iter().rev() {
            for i in (0..64).rev() {
                let bit = (limb >> i) & 1 == 1;
                if found_one {
                    acc = acc.double();
                }
                if bit {
                    found_one = true;
                    acc = Projective::add(&acc, self);
                }
            }
        }
        acc
    }
}

impl<C: Curve> WindowGroup for Projective<C> {
    fn identity() -> Self { Projective::identity() }

    fn double(&self) -> Self { Projective::double(self) }

    fn add(&self, other: &Self) -> Self { Projective::add(self, other) }
}

impl<'a, 'b, C: Curve> Add<&'b Projective<C>> for &'a Projective<C> {
    type Output = Projective<C>;

    fn add(self, rhs: &'b Projective<C>) -> Projective<C> { Projective::add(self, rhs) }
}

impl<C: Curve> Add<Projective<C>> for Projective<C> {
    type Output = Projective<C>;

    fn add(self, rhs: Projective<C>) -> Projective<C> { Projective::add(&self, &rhs) }
}

impl<'b, C: Curve> Add<&'b Projective<C>> for Projective<C> {
    type Output = Projective<C>;

    fn add(self, rhs: &'b Projective<C>) -> Projective<C> { Projective::add(&self, rhs) }
}

impl<'b, C: Curve> Add<&'b Affine<C>> for Projective<C> {
    type Output = Projective<C>;

    fn add(self, rhs: &'b Affine<C>) -> Projective<C> { self.add_mixed(rhs) }
}

impl<'a, 'b, C: Curve> Sub<&'b Projective<C>> for &'a Projective<C> {
    type Output = Projective<C>;

    fn sub(self, rhs: &'b Projective<C>) -> Projective<C> { Projective::sub(self, rhs) }
}

impl<'b, C: Curve> Sub<&'b Projective<C>> for Projective<C> {
    type Output = Projective<C>;

    fn sub(self, rhs: &'b Projective<C>) -> Projective<C> { Projective::sub(&self, rhs) }
}

impl<C: Curve> Sub<Projective<C>> for Projective<C> {
    type Output = Projective<C>;

    fn sub(self, rhs: Projective<C>) -> Projective<C> { Projective::sub(&self, &rhs) }
}

impl<C: Curve> Neg for Projective<C> {
    type Output = Projective<C>;

    fn neg(self) -> Projective<C> { Projective::neg(&self) }
}

impl<C: Curve> Neg for Affine<C> {
    type Output = Affine<C>;

    fn neg(self) -> Affine<C> { Affine::neg(&self) }
}

impl<C: Curve> AddAssign<Projective<C>> for Projective<C> {
    fn add_assign(&mut self, rhs: Projective<C>) { *self = Projective::add(self, &rhs); }
}

impl<'b, C: Curve> AddAssign<&'b Projective<C>> for Projective<C> {
    fn add_assign(&mut self, rhs: &'b Projective<C>) { *self = Projective::add(self, rhs); }
}

impl<'b, C: Curve> AddAssign<&'b Affine<C>> for Projective<C> {
    fn add_assign(&mut self, rhs: &'b Affine<C>) { *self = self.add_mixed(rhs); }
}

impl<C: Curve> SubAssign<Projective<C>> for Projective<C> {
    fn sub_assign(&mut self, rhs: Projective<C>) { *self = Projective::sub(self, &rhs); }
}

impl<'a, 'b, C: Curve> Mul<&'b Scalar> for &'a Projective<C> {
    type Output = Projective<C>;

    fn mul(self, rhs: &'b Scalar) -> Projective<C> { Projective::mul(self, rhs) }
}

impl<'b, C: Curve> Mul<&'b Scalar> for Projective<C> {
    type Output = Projective<C>;

    fn mul(self, rhs: &'b Scalar) -> Projective<C> { Projective::mul(&self, rhs) }
}

impl<'b, C: Curve> Mul<&'b Scalar> for Affine<C> {
    type Output = Projective<C>;

    fn mul(self, rhs: &'b Scalar) -> Projective<C> { Projective::from(self).mul(rhs) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve_arithmetic::{Fp, G1Affine, G1Projective, G2Affine, G2Projective, G1, G2};
    use rand::{rngs::StdRng, thread_rng, SeedableRng};

    fn group_laws<C: Curve>(rng: &mut StdRng) {
        let id = Projective::<C>::identity();
        let g = Projective::<C>::generator();
        assert!(bool::from(g.is_on_curve()));
        assert!(bool::from(C::generator().is_on_curve()));
        assert_eq!(g.double(), g + g);
        assert_eq!(g + id, g);
        assert_eq!(id + g, g);
        assert_eq!(id.double(), id);
        assert_eq!(g - g, id);
        assert!(bool::from((g - g).is_identity()));
        for _ in 0..5 {
            let a = Projective::<C>::random(rng);
            let b = Projective::<C>::random(rng);
            let c = Projective::<C>::random(rng);
            assert_eq!(a + b, b + a);
            assert_eq!((a + b) + c, a + (b + c));
            assert_eq!(a + a, a.double());
            assert_eq!(a.add_mixed(&b.to_affine()), a + b);
            assert_eq!(a.add_mixed(&a.to_affine()), a.double());
            assert_eq!(a.add_mixed(&Affine::identity()), a);
            assert_eq!(id.add_mixed(&a.to_affine()), a);
            assert_eq!(a.add_mixed(&a.neg().to_affine()), id);
            assert!(bool::from((a + b).is_on_curve()));
        }
    }

    #[test]
    fn test_group_laws() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        group_laws::<G1>(&mut rng);
        group_laws::<G2>(&mut rng);
    }

    fn equality_independent_of_representation<C: Curve>(rng: &mut StdRng) {
        let a = Projective::<C>::random(rng);
        let lambda = C::Base::random(rng);
        let scaled = Projective::<C> {
            x: a.x * lambda,
            y: a.y * lambda,
            z: a.z * lambda,
        };
        assert_eq!(a, scaled);
        assert_eq!(a.to_affine(), scaled.to_affine());
        assert_ne!(a, a.neg());
        // the identity has many representations too
        let id = Projective::<C> {
            x: C::Base::zero(),
            y: lambda,
            z: C::Base::zero(),
        };
        assert_eq!(id, Projective::identity());
        assert_ne!(id, a);
    }

    #[test]
    fn test_equality() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        equality_independent_of_representation::<G1>(&mut rng);
        equality_independent_of_representation::<G2>(&mut rng);
    }

    fn scalar_multiplication<C: Curve>(rng: &mut StdRng) {
        let g = Projective::<C>::generator();
        let mut acc = Projective::<C>::identity();
        for k in 0..40u64 {
            assert_eq!(g.mul_u64(k), acc);
            assert_eq!(g.mul(&Scalar::from_u64(k)), acc);
            assert_eq!(g.mul_vartime(&[k]), acc);
            acc = acc + g;
        }
        for _ in 0..3 {
            let a = Scalar::random(rng);
            let b = Scalar::random(rng);
            assert_eq!(g.mul(&a) + g.mul(&b), g.mul(&(a + b)));
            assert_eq!(g.mul(&a).mul(&b), g.mul(&(a * b)));
            assert_eq!(g.mul(&a), g.mul_vartime(&a.to_canonical_limbs()));
            // short bit lengths read only the low limbs
            let limbs = a.to_canonical_limbs();
            assert_eq!(g.mul_bits(&limbs, 128), g.mul_vartime(&limbs[..2]));
            assert_eq!(g.mul_bits(&limbs, 32), g.mul_vartime(&[limbs[0] & 0xffff_ffff]));
        }
        // the group order annihilates the generator
        assert!(bool::from((g.mul(&-Scalar::one()) + &g).is_identity()));
    }

    #[test]
    fn test_scalar_multiplication() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        scalar_multiplication::<G1>(&mut rng);
        scalar_multiplication::<G2>(&mut rng);
    }

    fn operator_forms<C: Curve>(rng: &mut StdRng) {
        let a = Projective::<C>::random(rng);
        let b = Projective::<C>::random(rng);
        let sum = Projective::add(&a, &b);
        assert_eq!(a + &b, sum);
        assert_eq!(&a + &b, sum);
        assert_eq!(a + &b.to_affine(), sum);
        assert_eq!(sum - &b, a);
        assert_eq!(&sum - &b, a);
        let mut c = a;
        c += &b;
        c -= b;
        assert_eq!(c, a);
        // high zero limbs and a multi limb exponent
        let k = Scalar::random(rng).to_canonical_limbs();
        let padded = [k[0], k[1], k[2], k[3], 0, 0];
        assert_eq!(a.mul_vartime(&padded), a.mul_vartime(&k));
        assert_eq!(a.mul_vartime(&[0, 1]), a.mul_vartime(&[u64::MAX]) + &a);
        assert_eq!(a.mul_vartime(&[]), Projective::identity());
    }

    #[test]
    fn test_operator_forms() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        operator_forms::<G1>(&mut rng);
        operator_forms::<G2>(&mut rng);
    }

    fn encodings<C: Curve>(rng: &mut StdRng) {
        for _ in 0..10 {
            let p = Projective::<C>::random(rng).to_affine();
            let c = p.to_compressed();
            let u = p.to_uncompressed();
            assert_eq!(c.len(), C::GROUP_ELEMENT_LENGTH);
            assert_eq!(u.len(), C::UNCOMPRESSED_LENGTH);
            assert_eq!(c[0] & COMPRESSION_FLAG, COMPRESSION_FLAG);
            assert_eq!(u[0] & FLAG_MASK, 0);
            assert_eq!(Affine::<C>::from_bytes(&c), Ok(p));
            assert_eq!(Affine::<C>::from_bytes(&u), Ok(p));
            assert_eq!(Affine::<C>::from_bytes(&p.neg().to_compressed()), Ok(p.neg()));
            // flipping the sign flag gives the negated point
            let mut flipped = c.clone();
            flipped[0] ^= SIGN_FLAG;
            assert_eq!(Affine::<C>::from_compressed(&flipped), Ok(p.neg()));
        }
        let id = Affine::<C>::identity();
        let mut expected = vec![0u8; C::GROUP_ELEMENT_LENGTH];
        expected[0] = 0xc0;
        assert_eq!(id.to_compressed(), expected);
        let mut expected = vec![0u8; C::UNCOMPRESSED_LENGTH];
        expected[0] = 0x40;
        assert_eq!(id.to_uncompressed(), expected);
        assert_eq!(Affine::<C>::from_bytes(&id.to_compressed()), Ok(id));
        assert_eq!(Affine::<C>::from_bytes(&id.to_uncompressed()), Ok(id));
    }

    #[test]
    fn test_encodings() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        encodings::<G1>(&mut rng);
        encodings::<G2>(&mut rng);
    }

    fn malformed_encodings<C: Curve>() {
        let g = C::generator();
        let c = g.to_compressed();
        let u = g.to_uncompressed();

        assert_eq!(
            Affine::<C>::from_bytes(&c[1..]),
            Err(CurveDecodingError::WrongLength {
                expected: C::GROUP_ELEMENT_LENGTH,
                actual:   C::GROUP_ELEMENT_LENGTH - 1,
            })
        );
        let mut bad = c.clone();
        bad[0] &= !COMPRESSION_FLAG;
        assert_eq!(
            Affine::<C>::from_compressed(&bad),
            Err(CurveDecodingError::WrongCompressionFlag)
        );
        let mut bad = u.clone();
        bad[0] |= COMPRESSION_FLAG;
        assert_eq!(
            Affine::<C>::from_uncompressed(&bad),
            Err(CurveDecodingError::WrongCompressionFlag)
        );
        let mut bad = u.clone();
        bad[0] |= SIGN_FLAG;
        assert_eq!(
            Affine::<C>::from_uncompressed(&bad),
            Err(CurveDecodingError::UnexpectedSignFlag)
        );
        // infinity with leftover coordinate bits or a sign
        let mut bad = c.clone();
        bad[0] |= INFINITY_FLAG;
        assert_eq!(
            Affine::<C>::from_compressed(&bad),
            Err(CurveDecodingError::InvalidInfinityEncoding)
        );
        let mut bad = Affine::<C>::identity().to_compressed();
        bad[0] |= SIGN_FLAG;
        assert_eq!(
            Affine::<C>::from_compressed(&bad),
            Err(CurveDecodingError::InvalidInfinityEncoding)
        );
        // a coordinate that is not reduced
        let mut bad = vec![0xff; C::GROUP_ELEMENT_LENGTH];
        bad[0] = 0x9f;
        assert_eq!(
            Affine::<C>::from_compressed(&bad),
            Err(CurveDecodingError::NotInField)
        );
        // uncompressed point off the curve
        let mut bad = u.clone();
        let last = bad.len() - 1;
        bad[last] ^= 1;
        assert_eq!(
            Affine::<C>::from_uncompressed(&bad),
            Err(CurveDecodingError::NotOnCurve)
        );
    }

    #[test]
    fn test_malformed_encodings() {
        malformed_encodings::<G1>();
        malformed_encodings::<G2>();
    }

    #[test]
    fn test_x_not_on_curve() {
        // find the first x for which x^3 + 4 is not a square
        let mut x = Fp::zero();
        while bool::from(curve_rhs::<G1>(&x).is_square()) {
            x += Fp::one();
        }
        let mut bytes = G1Affine::from_xy_unchecked(x, Fp::one()).to_compressed();
        bytes[0] &= !SIGN_FLAG;
        assert_eq!(
            G1Affine::from_compressed(&bytes),
            Err(CurveDecodingError::NotOnCurve)
        );
    }

    fn batch_decompression<C: Curve>(rng: &mut StdRng) {
        let mut points: Vec<Affine<C>> = (0..300).map(|_| Projective::<C>::random(rng).to_affine()).collect();
        points[7] = Affine::identity();
        points[299] = Affine::identity();
        let encoded: Vec<Vec<u8>> = points.iter().map(|p| p.to_compressed()).collect();
        let seq = ExecutionContext::sequential();
        let par = ExecutionContext::new(3).unwrap();
        let expected: Vec<Affine<C>> = encoded
            .iter()
            .map(|e| Affine::<C>::from_compressed(e).unwrap())
            .collect();
        assert_eq!(expected, points);
        assert_eq!(Affine::<C>::batch_from_compressed(&seq, &encoded, true), Ok(points.clone()));
        assert_eq!(Affine::<C>::batch_from_compressed(&par, &encoded, false), Ok(points.clone()));
        let empty: Vec<Vec<u8>> = Vec::new();
        assert_eq!(Affine::<C>::batch_from_compressed(&seq, &empty, true), Ok(Vec::new()));

        // one malformed element fails the whole batch
        let mut bad = encoded.clone();
        bad[280][0] &= !COMPRESSION_FLAG;
        assert_eq!(
            Affine::<C>::batch_from_compressed(&par, &bad, true),
            Err(CurveDecodingError::WrongCompressionFlag)
        );
    }

    #[test]
    fn test_batch_decompression() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        batch_decompression::<G1>(&mut rng);
        batch_decompression::<G2>(&mut rng);
    }

    #[test]
    fn test_generator_encodings() {
        assert_eq!(
            hex::encode(G1Affine::generator().to_compressed()),
            "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb"
        );
        assert_eq!(
            hex::encode(G2Affine::generator().to_compressed()),
            "93e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8"
        );
        assert_eq!(
            G1Projective::generator().mul_u64(5).to_compressed(),
            hex::decode("b0e7791fb972fe014159aa33a98622da3cdc98ff707965e536d8636b5fcc5ac7a91a8c46e59a00dca575af0f18fb13dc").unwrap()
        );
        assert_eq!(G2Projective::generator().to_affine(), G2Affine::generator());
    }
}
