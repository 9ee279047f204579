//! The degree twelve extension `Fp12 = Fp6[w] / (w^2 - v)`, which contains
//! the target group of the pairing.
use super::{fp::Fp, fp2::Fp2, fp6::Fp6, Field};
use rand::RngCore;
use std::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

// (u + 1)^((p - 1) / 6), the Frobenius coefficient of w.
#[allow(clippy::unreadable_literal)]
const FROBENIUS_COEFF_W: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x07089552b319d465,
        0xc6695f92b50a8313,
        0x97e83cccd117228f,
        0xa35baecab2dc29ee,
        0x1ce393ea5daace4d,
        0x08f2220fb0fb66eb,
    ]),
    c1: Fp::from_raw_unchecked([
        0xb2f66aad4ce5d646,
        0x5842a06bfc497cec,
        0xcf4895d42599d394,
        0xc11b9cba40a8e8d0,
        0x2e3813cbe5a0de89,
        0x110eefda88847faf,
    ]),
};

/// An element `c0 + c1 * w` of the degree twelve extension. Elements of the
/// target group of the pairing are written multiplicatively, with
/// [Fp12::one] as the identity.
#[derive(Copy, Clone, Default)]
pub struct Fp12 {
    pub c0: Fp6,
    pub c1: Fp6,
}

impl fmt::Debug for Fp12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} + ({:?})*w", self.c0, self.c1)
    }
}

impl ConstantTimeEq for Fp12 {
    fn ct_eq(&self, other: &Self) -> Choice { self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1) }
}

impl PartialEq for Fp12 {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl Eq for Fp12 {}

impl ConditionallySelectable for Fp12 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp12 {
            c0: Fp6::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp6::conditional_select(&a.c1, &b.c1, choice),
        }
    }
}

impl From<Fp6> for Fp12 {
    fn from(c0: Fp6) -> Self { Fp12 { c0, c1: Fp6::zero() } }
}

impl Fp12 {
    #[inline]
    pub const fn zero() -> Fp12 {
        Fp12 {
            c0: Fp6::zero(),
            c1: Fp6::zero(),
        }
    }

    #[inline]
    pub const fn one() -> Fp12 {
        Fp12 {
            c0: Fp6::one(),
            c1: Fp6::zero(),
        }
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Fp12 {
        Fp12 {
            c0: Fp6::random(rng),
            c1: Fp6::random(rng),
        }
    }

    pub fn is_zero(&self) -> Choice { self.c0.is_zero() & self.c1.is_zero() }

    /// Whether this is the identity of the target group.
    pub fn is_one(&self) -> Choice { self.ct_eq(&Fp12::one()) }

    #[inline]
    pub fn add(&self, rhs: &Fp12) -> Fp12 {
        Fp12 {
            c0: self.c0.add(&rhs.c0),
            c1: self.c1.add(&rhs.c1),
        }
    }

    #[inline]
    pub fn sub(&self, rhs: &Fp12) -> Fp12 {
        Fp12 {
            c0: self.c0.sub(&rhs.c0),
            c1: self.c1.sub(&rhs.c1),
        }
    }

    #[inline]
    pub fn neg(&self) -> Fp12 {
        Fp12 {
            c0: self.c0.neg(),
            c1: self.c1.neg(),
        }
    }

    pub fn mul(&self, rhs: &Fp12) -> Fp12 {
        let aa = self.c0.mul(&rhs.c0);
        let bb = self.c1.mul(&rhs.c1);
        let o = rhs.c0.add(&rhs.c1);
        let c1 = self.c1.add(&self.c0).mul(&o).sub(&aa).sub(&bb);
        let c0 = bb.mul_by_nonresidue().add(&aa);
        Fp12 { c0, c1 }
    }

    pub fn square(&self) -> Fp12 {
        let ab = self.c0.mul(&self.c1);
        let c0c1 = self.c0.add(&self.c1);
        let c0 = self.c1.mul_by_nonresidue().add(&self.c0);
        let c0 = c0.mul(&c0c1).sub(&ab).sub(&ab.mul_by_nonresidue());
        Fp12 {
            c0,
            c1: ab.double(),
        }
    }

    #[inline]
    pub fn double(&self) -> Fp12 { self.add(self) }

    /// Conjugation over `Fp6`. On the target group this is the inverse.
    pub fn conjugate(&self) -> Fp12 {
        Fp12 {
            c0: self.c0,
            c1: self.c1.neg(),
        }
    }

    /// Multiplication by the sparse element `c0 + c1 * v + c4 * v * w`, the
    /// shape of the line functions evaluated in the Miller loop.
    pub fn mul_by_014(&self, c0: &Fp2, c1: &Fp2, c4: &Fp2) -> Fp12 {
        let aa = self.c0.mul_by_01(c0, c1);
        let bb = self.c1.mul_by_1(c4);
        let o = c1.add(c4);
        let c1 = self.c1.add(&self.c0).mul_by_01(c0, &o).sub(&aa).sub(&bb);
        let c0 = bb.mul_by_nonresidue().add(&aa);
        Fp12 { c0, c1 }
    }

    /// The p-power Frobenius endomorphism.
    pub fn frobenius_map(&self) -> Fp12 {
        let c0 = self.c0.frobenius_map();
        let c1 = self.c1.frobenius_map();
        let c1 = Fp6 {
            c0: c1.c0.mul(&FROBENIUS_COEFF_W),
            c1: c1.c1.mul(&FROBENIUS_COEFF_W),
            c2: c1.c2.mul(&FROBENIUS_COEFF_W),
        };
        Fp12 { c0, c1 }
    }

    pub fn invert(&self) -> CtOption<Fp12> {
        self.c0
            .square()
            .sub(&self.c1.square().mul_by_nonresidue())
            .invert()
            .map(|t| Fp12 {
                c0: self.c0.mul(&t),
                c1: self.c1.mul(&t.neg()),
            })
    }

    pub fn pow_vartime(&self, exp: &[u64]) -> Fp12 { <Self as Field>::pow_vartime(self, exp) }

    /// Squaring of an element of the cyclotomic subgroup, which holds the
    /// result of the easy part of the final exponentiation. See
    /// <https://eprint.iacr.org/2009/565.pdf>. The result is wrong for
    /// elements outside the subgroup.
    pub(crate) fn cyclotomic_square(&self) -> Fp12 {
        let mut z0 = self.c0.c0;
        let mut z4 = self.c0.c1;
        let mut z3 = self.c0.c2;
        let mut z2 = self.c1.c0;
        let mut z1 = self.c1.c1;
        let mut z5 = self.c1.c2;

        let (t0, t1) = fp4_square(&z0, &z1);

        // For A
        z0 = t0.sub(&z0);
        z0 = z0.double().add(&t0);

        z1 = t1.add(&z1);
        z1 = z1.double().add(&t1);

        let (mut t0, t1) = fp4_square(&z2, &z3);
        let (t2, t3) = fp4_square(&z4, &z5);

        // For C
        z4 = t0.sub(&z4);
        z4 = z4.double().add(&t0);

        z5 = t1.add(&z5);
        z5 = z5.double().add(&t1);

        // For B
        t0 = t3.mul_by_nonresidue();
        z2 = t0.add(&z2);
        z2 = z2.double().add(&t0);

        z3 = t2.sub(&z3);
        z3 = z3.double().add(&t2);

        Fp12 {
            c0: Fp6 {
                c0: z0,
                c1: z4,
                c2: z3,
            },
            c1: Fp6 {
                c0: z2,
                c1: z1,
                c2: z5,
            },
        }
    }
}

/// Squaring in `Fp4 = Fp2[y] / (y^2 - (u + 1))`, returning both coefficients.
fn fp4_square(a: &Fp2, b: &Fp2) -> (Fp2, Fp2) {
    let t0 = a.square();
    let t1 = b.square();
    let c0 = t1.mul_by_nonresidue().add(&t0);
    let c1 = a.add(b).square().sub(&t0).sub(&t1);
    (c0, c1)
}

impl_field_ops!(Fp12);

impl Field for Fp12 {
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self { Fp12::random(rng) }

    fn zero() -> Self { Fp12::zero() }

    fn one() -> Self { Fp12::one() }

    fn is_zero(&self) -> Choice { Fp12::is_zero(self) }

    fn square(&self) -> Self { Fp12::square(self) }

    fn double(&self) -> Self { Fp12::double(self) }

    fn invert(&self) -> CtOption<Self> { Fp12::invert(self) }
}
