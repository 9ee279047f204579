//! The quadratic extension `Fp2 = Fp[u] / (u^2 + 1)`.
use super::{
    batch_invert,
    fp::{Fp, HALF},
    BaseField, Field,
};
use rand::RngCore;
use std::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// An element `c0 + c1 * u` of the quadratic extension.
#[derive(Copy, Clone, Default)]
pub struct Fp2 {
    pub c0: Fp,
    pub c1: Fp,
}

impl fmt::Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} + {:?}*u", self.c0, self.c1)
    }
}

impl ConstantTimeEq for Fp2 {
    fn ct_eq(&self, other: &Self) -> Choice { self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1) }
}

impl PartialEq for Fp2 {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl Eq for Fp2 {}

impl ConditionallySelectable for Fp2 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp2 {
            c0: Fp::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp::conditional_select(&a.c1, &b.c1, choice),
        }
    }
}

impl From<Fp> for Fp2 {
    fn from(c0: Fp) -> Self { Fp2 { c0, c1: Fp::zero() } }
}

impl Fp2 {
    #[inline]
    pub const fn zero() -> Fp2 {
        Fp2 {
            c0: Fp::zero(),
            c1: Fp::zero(),
        }
    }

    #[inline]
    pub const fn one() -> Fp2 {
        Fp2 {
            c0: Fp::one(),
            c1: Fp::zero(),
        }
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Fp2 {
        Fp2 {
            c0: Fp::random(rng),
            c1: Fp::random(rng),
        }
    }

    pub fn is_zero(&self) -> Choice { self.c0.is_zero() & self.c1.is_zero() }

    /// Decodes the big-endian encoding `c1 || c0`.
    pub fn from_bytes(bytes: &[u8; 96]) -> CtOption<Fp2> {
        let mut c1 = [0u8; 48];
        c1.copy_from_slice(&bytes[..48]);
        let mut c0 = [0u8; 48];
        c0.copy_from_slice(&bytes[48..]);
        let c1 = Fp::from_bytes(&c1);
        let c0 = Fp::from_bytes(&c0);
        c0.and_then(|c0| c1.map(|c1| Fp2 { c0, c1 }))
    }

    /// The big-endian encoding `c1 || c0`.
    pub fn to_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..48].copy_from_slice(&self.c1.to_bytes());
        out[48..].copy_from_slice(&self.c0.to_bytes());
        out
    }

    #[inline]
    pub fn add(&self, rhs: &Fp2) -> Fp2 {
        Fp2 {
            c0: self.c0.add(&rhs.c0),
            c1: self.c1.add(&rhs.c1),
        }
    }

    #[inline]
    pub fn sub(&self, rhs: &Fp2) -> Fp2 {
        Fp2 {
            c0: self.c0.sub(&rhs.c0),
            c1: self.c1.sub(&rhs.c1),
        }
    }

    #[inline]
    pub fn neg(&self) -> Fp2 {
        Fp2 {
            c0: self.c0.neg(),
            c1: self.c1.neg(),
        }
    }

    pub fn mul(&self, rhs: &Fp2) -> Fp2 {
        // Karatsuba: (a0 + a1 u)(b0 + b1 u) = a0 b0 - a1 b1 + ((a0 + a1)(b0 + b1) - a0 b0 - a1 b1) u
        let aa = self.c0.mul(&rhs.c0);
        let bb = self.c1.mul(&rhs.c1);
        let cross = self.c0.add(&self.c1).mul(&rhs.c0.add(&rhs.c1));
        Fp2 {
            c0: aa.sub(&bb),
            c1: cross.sub(&aa).sub(&bb),
        }
    }

    pub fn square(&self) -> Fp2 {
        // (a0 + a1 u)^2 = (a0 + a1)(a0 - a1) + 2 a0 a1 u
        let a = self.c0.add(&self.c1);
        let b = self.c0.sub(&self.c1);
        let c = self.c0.double();
        Fp2 {
            c0: a.mul(&b),
            c1: c.mul(&self.c1),
        }
    }

    #[inline]
    pub fn double(&self) -> Fp2 { self.add(self) }

    /// Multiplication by an element of the base field.
    pub fn mul_by_fp(&self, rhs: &Fp) -> Fp2 {
        Fp2 {
            c0: self.c0.mul(rhs),
            c1: self.c1.mul(rhs),
        }
    }

    /// Multiplication by the non-residue `u + 1` that defines the sextic
    /// extension on top of this field.
    pub fn mul_by_nonresidue(&self) -> Fp2 {
        Fp2 {
            c0: self.c0.sub(&self.c1),
            c1: self.c0.add(&self.c1),
        }
    }

    pub fn conjugate(&self) -> Fp2 {
        Fp2 {
            c0: self.c0,
            c1: self.c1.neg(),
        }
    }

    /// The p-power Frobenius endomorphism, which is conjugation.
    pub fn frobenius_map(&self) -> Fp2 { self.conjugate() }

    /// The norm `c0^2 + c1^2`, an element of the base field.
    pub fn norm(&self) -> Fp { self.c0.square().add(&self.c1.square()) }

    pub fn invert(&self) -> CtOption<Fp2> {
        // 1 / (a0 + a1 u) = (a0 - a1 u) / (a0^2 + a1^2)
        self.norm().invert().map(|t| Fp2 {
            c0: self.c0.mul(&t),
            c1: self.c1.mul(&t).neg(),
        })
    }

    pub fn pow_vartime(&self, exp: &[u64]) -> Fp2 { <Self as Field>::pow_vartime(self, exp) }

    /// Whether `c1` is lexicographically largest, or `c1` is zero and `c0` is.
    pub fn lexicographically_largest(&self) -> Choice {
        self.c1.lexicographically_largest()
            | (self.c1.is_zero() & self.c0.lexicographically_largest())
    }

    /// The function sgn0 given at https://tools.ietf.org/html/draft-irtf-cfrg-hash-to-curve-10#section-4.1
    pub fn sgn0(&self) -> Choice {
        let sign_0 = self.c0.sgn0();
        let zero_0 = self.c0.is_zero();
        let sign_1 = self.c1.sgn0();
        sign_0 | (zero_0 & sign_1)
    }

    /// An element is a square in `Fp2` if and only if its norm is a square in
    /// `Fp`.
    pub fn is_square(&self) -> Choice { self.norm().is_square() }

    /// Square root, if one exists. This branches on the value and must only
    /// be used on public data.
    pub fn sqrt(&self) -> CtOption<Fp2> {
        match sqrt_batch(std::slice::from_ref(self)).pop() {
            Some(root) => root,
            None => CtOption::new(Fp2::zero(), Choice::from(0)),
        }
    }
}

/// Progress of a square root computation with the norm method. The final step
/// needs `1 / (2 * x0)`, which is computed for all pending roots at once.
enum SqrtStep {
    Done(CtOption<Fp2>),
    Pending { x0: Fp, index: usize },
}

fn sqrt_start(a: &Fp2) -> SqrtStep {
    let none = CtOption::new(Fp2::zero(), Choice::from(0));
    if bool::from(a.c1.is_zero()) {
        // a = c0 is in the base field: its root is either sqrt(c0) or
        // sqrt(-c0) * u.
        let root = a.c0.sqrt();
        if bool::from(root.is_some()) {
            return SqrtStep::Done(root.map(Fp2::from));
        }
        return SqrtStep::Done(a.c0.neg().sqrt().map(|c1| Fp2 { c0: Fp::zero(), c1 }));
    }
    let n = match Option::<Fp>::from(a.norm().sqrt()) {
        Some(n) => n,
        None => return SqrtStep::Done(none),
    };
    for candidate in [a.c0.add(&n).mul(&HALF), a.c0.sub(&n).mul(&HALF)] {
        if let Some(x0) = Option::<Fp>::from(candidate.sqrt()) {
            if !bool::from(x0.is_zero()) {
                return SqrtStep::Pending { x0, index: 0 };
            }
        }
    }
    SqrtStep::Done(none)
}

/// Square roots of a batch of elements using the norm method, with a single
/// shared inversion.
pub(crate) fn sqrt_batch(values: &[Fp2]) -> Vec<CtOption<Fp2>> {
    let mut steps: Vec<SqrtStep> = values.iter().map(sqrt_start).collect();
    let mut denominators = Vec::new();
    for step in steps.iter_mut() {
        if let SqrtStep::Pending { x0, index } = step {
            *index = denominators.len();
            denominators.push(x0.double());
        }
    }
    batch_invert(&mut denominators);
    values
        .iter()
        .zip(steps)
        .map(|(a, step)| match step {
            SqrtStep::Done(root) => root,
            SqrtStep::Pending { x0, index } => {
                let root = Fp2 {
                    c0: x0,
                    c1: a.c1.mul(&denominators[index]),
                };
                CtOption::new(root, root.square().ct_eq(a))
            }
        })
        .collect()
}

impl_field_ops!(Fp2);

impl Field for Fp2 {
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self { Fp2::random(rng) }

    fn zero() -> Self { Fp2::zero() }

    fn one() -> Self { Fp2::one() }

    fn is_zero(&self) -> Choice { Fp2::is_zero(self) }

    fn square(&self) -> Self { Fp2::square(self) }

    fn double(&self) -> Self { Fp2::double(self) }

    fn invert(&self) -> CtOption<Self> { Fp2::invert(self) }
}

impl BaseField for Fp2 {
    const SIZE: usize = 96;

    fn from_u64(v: u64) -> Self { Fp2::from(Fp::from_u64(v)) }

    fn write_be(&self, out: &mut [u8]) { out.copy_from_slice(&self.to_bytes()) }

    fn read_be(bytes: &[u8]) -> CtOption<Self> {
        let mut buf = [0u8; 96];
        buf.copy_from_slice(bytes);
        Fp2::from_bytes(&buf)
    }

    fn sqrt(&self) -> CtOption<Self> { Fp2::sqrt(self) }

    fn sqrt_batch(values: &[Self]) -> Vec<CtOption<Self>> { sqrt_batch(values) }

    fn lexicographically_largest(&self) -> Choice { Fp2::lexicographically_largest(self) }
}
