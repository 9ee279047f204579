//! The cubic extension `Fp6 = Fp2[v] / (v^3 - (u + 1))`.
use super::{fp::Fp, fp2::Fp2, Field};
use rand::RngCore;
use std::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

// (u + 1)^((p - 1) / 3), the Frobenius coefficient of v.
#[allow(clippy::unreadable_literal)]
const FROBENIUS_COEFF_C1: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
    ]),
    c1: Fp::from_raw_unchecked([
        0xcd03c9e48671f071,
        0x5dab22461fcda5d2,
        0x587042afd3851b95,
        0x8eb60ebe01bacb9e,
        0x03f97d6e83d050d2,
        0x18f0206554638741,
    ]),
};

// (u + 1)^((2p - 2) / 3), the Frobenius coefficient of v^2.
#[allow(clippy::unreadable_literal)]
const FROBENIUS_COEFF_C2: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x890dc9e4867545c3,
        0x2af322533285a5d5,
        0x50880866309b7e2c,
        0xa20d1b8c7e881024,
        0x14e4f04fe2db9068,
        0x14e56d3f1564853a,
    ]),
    c1: Fp::from_raw_unchecked([
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
    ]),
};

/// An element `c0 + c1 * v + c2 * v^2` of the cubic extension.
#[derive(Copy, Clone, Default)]
pub struct Fp6 {
    pub c0: Fp2,
    pub c1: Fp2,
    pub c2: Fp2,
}

impl fmt::Debug for Fp6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} + ({:?})*v + ({:?})*v^2", self.c0, self.c1, self.c2)
    }
}

impl ConstantTimeEq for Fp6 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1) & self.c2.ct_eq(&other.c2)
    }
}

impl PartialEq for Fp6 {
    fn eq(&self, other: &Self) -> bool { bool::from(self.ct_eq(other)) }
}

impl Eq for Fp6 {}

impl ConditionallySelectable for Fp6 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp6 {
            c0: Fp2::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp2::conditional_select(&a.c1, &b.c1, choice),
            c2: Fp2::conditional_select(&a.c2, &b.c2, choice),
        }
    }
}

impl From<Fp2> for Fp6 {
    fn from(c0: Fp2) -> Self {
        Fp6 {
            c0,
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }
}

impl Fp6 {
    #[inline]
    pub const fn zero() -> Fp6 {
        Fp6 {
            c0: Fp2::zero(),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }

    #[inline]
    pub const fn one() -> Fp6 {
        Fp6 {
            c0: Fp2::one(),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Fp6 {
        Fp6 {
            c0: Fp2::random(rng),
            c1: Fp2::random(rng),
            c2: Fp2::random(rng),
        }
    }

    pub fn is_zero(&self) -> Choice { self.c0.is_zero() & self.c1.is_zero() & self.c2.is_zero() }

    #[inline]
    pub fn add(&self, rhs: &Fp6) -> Fp6 {
        Fp6 {
            c0: self.c0.add(&rhs.c0),
            c1: self.c1.add(&rhs.c1),
            c2: self.c2.add(&rhs.c2),
        }
    }

    #[inline]
    pub fn sub(&self, rhs: &Fp6) -> Fp6 {
        Fp6 {
            c0: self.c0.sub(&rhs.c0),
            c1: self.c1.sub(&rhs.c1),
            c2: self.c2.sub(&rhs.c2),
        }
    }

    #[inline]
    pub fn neg(&self) -> Fp6 {
        Fp6 {
            c0: self.c0.neg(),
            c1: self.c1.neg(),
            c2: self.c2.neg(),
        }
    }

    pub fn mul(&self, rhs: &Fp6) -> Fp6 {
        let aa = self.c0.mul(&rhs.c0);
        let bb = self.c1.mul(&rhs.c1);
        let cc = self.c2.mul(&rhs.c2);

        let t1 = rhs.c1.add(&rhs.c2).mul(&self.c1.add(&self.c2));
        let t1 = t1.sub(&bb).sub(&cc).mul_by_nonresidue().add(&aa);

        let t3 = rhs.c0.add(&rhs.c2).mul(&self.c0.add(&self.c2));
        let t3 = t3.sub(&aa).add(&bb).sub(&cc);

        let t2 = rhs.c0.add(&rhs.c1).mul(&self.c0.add(&self.c1));
        let t2 = t2.sub(&aa).sub(&bb).add(&cc.mul_by_nonresidue());

        Fp6 {
            c0: t1,
            c1: t2,
            c2: t3,
        }
    }

    #[inline]
    pub fn square(&self) -> Fp6 { self.mul(self) }

    #[inline]
    pub fn double(&self) -> Fp6 { self.add(self) }

    /// Multiplication by `c1 * v`.
    pub fn mul_by_1(&self, c1: &Fp2) -> Fp6 {
        Fp6 {
            c0: self.c2.mul(c1).mul_by_nonresidue(),
            c1: self.c0.mul(c1),
            c2: self.c1.mul(c1),
        }
    }

    /// Multiplication by `c0 + c1 * v`.
    pub fn mul_by_01(&self, c0: &Fp2, c1: &Fp2) -> Fp6 {
        let a_a = self.c0.mul(c0);
        let b_b = self.c1.mul(c1);

        let t1 = self.c2.mul(c1).mul_by_nonresidue().add(&a_a);
        let t2 = c0.add(c1).mul(&self.c0.add(&self.c1)).sub(&a_a).sub(&b_b);
        let t3 = self.c2.mul(c0).add(&b_b);

        Fp6 {
            c0: t1,
            c1: t2,
            c2: t3,
        }
    }

    /// Multiplication by `v`, the non-residue of the degree twelve extension.
    pub fn mul_by_nonresidue(&self) -> Fp6 {
        Fp6 {
            c0: self.c2.mul_by_nonresidue(),
            c1: self.c0,
            c2: self.c1,
        }
    }

    /// The p-power Frobenius endomorphism.
    pub fn frobenius_map(&self) -> Fp6 {
        Fp6 {
            c0: self.c0.frobenius_map(),
            c1: self.c1.frobenius_map().mul(&FROBENIUS_COEFF_C1),
            c2: self.c2.frobenius_map().mul(&FROBENIUS_COEFF_C2),
        }
    }

    pub fn invert(&self) -> CtOption<Fp6> {
        let c0 = self.c0.square().sub(&self.c1.mul(&self.c2).mul_by_nonresidue());
        let c1 = self.c2.square().mul_by_nonresidue().sub(&self.c0.mul(&self.c1));
        let c2 = self.c1.square().sub(&self.c0.mul(&self.c2));

        let t = self.c1.mul(&c2).add(&self.c2.mul(&c1)).mul_by_nonresidue();
        let t = t.add(&self.c0.mul(&c0));

        t.invert().map(|t| Fp6 {
            c0: t.mul(&c0),
            c1: t.mul(&c1),
            c2: t.mul(&c2),
        })
    }
}

impl_field_ops!(Fp6);

impl Field for Fp6 {
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self { Fp6::random(rng) }

    fn zero() -> Self { Fp6::zero() }

    fn one() -> Self { Fp6::one() }

    fn is_zero(&self) -> Choice { Fp6::is_zero(self) }

    fn square(&self) -> Self { Fp6::square(self) }

    fn double(&self) -> Self { Fp6::double(self) }

    fn invert(&self) -> CtOption<Self> { Fp6::invert(self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_v_cubed_is_nonresidue() {
        let v = Fp6 {
            c0: Fp2::zero(),
            c1: Fp2::one(),
            c2: Fp2::zero(),
        };
        let xi = Fp2 {
            c0: Fp::one(),
            c1: Fp::one(),
        };
        assert_eq!(v * v * v, Fp6::from(xi));
    }

    #[test]
    fn test_sparse_multiplication() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..50 {
            let a = Fp6::random(&mut rng);
            let c0 = Fp2::random(&mut rng);
            let c1 = Fp2::random(&mut rng);
            let b01 = Fp6 {
                c0,
                c1,
                c2: Fp2::zero(),
            };
            let b1 = Fp6 {
                c0: Fp2::zero(),
                c1,
                c2: Fp2::zero(),
            };
            assert_eq!(a.mul_by_01(&c0, &c1), a * b01);
            assert_eq!(a.mul_by_1(&c1), a * b1);
            let v = Fp6 {
                c0: Fp2::zero(),
                c1: Fp2::one(),
                c2: Fp2::zero(),
            };
            assert_eq!(a.mul_by_nonresidue(), a * v);
        }
    }

    #[test]
    fn test_field_laws() {
        let mut rng = StdRng::seed_from_u64(66);
        for _ in 0..30 {
            let a = Fp6::random(&mut rng);
            let b = Fp6::random(&mut rng);
            let c = Fp6::random(&mut rng);
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * a.invert().unwrap(), Fp6::one());
        }
    }

    #[test]
    fn test_frobenius() {
        let mut rng = StdRng::seed_from_u64(606);
        for _ in 0..5 {
            let a = Fp6::random(&mut rng);
            // the Frobenius map agrees with raising to the power p
            assert_eq!(a.frobenius_map(), a.pow_vartime(super::super::fp::MODULUS));
            let mut b = a;
            for _ in 0..6 {
                b = b.frobenius_map();
            }
            assert_eq!(a, b);
        }
    }
}
