//! The optimal ate pairing `e: G1 x G2 -> GT` on BLS12-381.
//!
//! The Miller loop runs over the bits of the curve parameter `x` with the
//! point of G2 in homogeneous projective coordinates, and evaluates the line
//! functions at the point of G1 as sparse elements of [Fp12]. Several
//! pairings share one accumulator, so a product of `n` pairings costs `n`
//! Miller loops but only one run of squarings of the accumulator and one
//! final exponentiation.
use super::{fp12::Fp12, fp2::Fp2, G1Affine, G2Affine};
use crate::parallel::ExecutionContext;
use log::trace;

/// Absolute value of the curve parameter `x`, which is negative.
const BLS_X: u64 = 0xd201000000010000;

/// Number of pairs handled by one worker in [multi_miller_loop].
pub const MILLER_LOOP_SHARD: usize = 8;

/// Coefficients of a line function. Evaluated at `P` they give the sparse
/// element `c2 + (c1 * P.x) * v + (c0 * P.y) * v * w`.
#[derive(Clone, Copy)]
struct LineCoefficients {
    c0: Fp2,
    c1: Fp2,
    c2: Fp2,
}

/// The running multiple of the G2 point in homogeneous coordinates.
#[derive(Clone, Copy)]
struct MillerPoint {
    x: Fp2,
    y: Fp2,
    z: Fp2,
}

impl MillerPoint {
    fn from_affine(q: &G2Affine) -> Self {
        MillerPoint {
            x: q.x,
            y: q.y,
            z: Fp2::one(),
        }
    }
}

/// Double `r` and return the coefficients of the tangent line.
/// Adaptation of Algorithm 26, https://eprint.iacr.org/2010/354.pdf
fn doubling_step(r: &mut MillerPoint) -> LineCoefficients {
    let tmp0 = r.x.square();
    let tmp1 = r.y.square();
    let tmp2 = tmp1.square();
    let tmp3 = (tmp1 + r.x).square() - tmp0 - tmp2;
    let tmp3 = tmp3.double();
    let tmp4 = tmp0.double() + tmp0;
    let tmp6 = r.x + tmp4;
    let tmp5 = tmp4.square();
    let zsquared = r.z.square();
    r.x = tmp5 - tmp3 - tmp3;
    r.z = (r.z + r.y).square() - tmp1 - zsquared;
    r.y = (tmp3 - r.x) * tmp4;
    let tmp2 = tmp2.double().double().double();
    r.y -= tmp2;
    let tmp3 = (tmp4 * zsquared).double().neg();
    let tmp6 = tmp6.square() - tmp0 - tmp5;
    let tmp1 = tmp1.double().double();
    let tmp6 = tmp6 - tmp1;
    let tmp0 = (r.z * zsquared).double();

    LineCoefficients {
        c0: tmp0,
        c1: tmp3,
        c2: tmp6,
    }
}

/// Add `q` to `r` and return the coefficients of the line through them.
/// Adaptation of Algorithm 27, https://eprint.iacr.org/2010/354.pdf
fn addition_step(r: &mut MillerPoint, q: &G2Affine) -> LineCoefficients {
    let zsquared = r.z.square();
    let ysquared = q.y.square();
    let t0 = zsquared * q.x;
    let t1 = ((q.y + r.z).square() - ysquared - zsquared) * zsquared;
    let t2 = t0 - r.x;
    let t3 = t2.square();
    let t4 = t3.double().double();
    let t5 = t4 * t2;
    let t6 = t1 - r.y - r.y;
    let t9 = t6 * q.x;
    let t7 = t4 * r.x;
    r.x = t6.square() - t5 - t7 - t7;
    r.z = (r.z + t2).square() - zsquared - t3;
    let t10 = q.y + r.z;
    let t8 = (t7 - r.x) * t6;
    let t0 = (r.y * t5).double();
    r.y = t8 - t0;
    let t10 = t10.square() - ysquared - r.z.square();
    let t9 = t9.double() - t10;
    let t10 = r.z.double();
    let t1 = t6.neg().double();

    LineCoefficients {
        c0: t10,
        c1: t1,
        c2: t9,
    }
}

/// Multiply `f` by the line with coefficients `coeffs` evaluated at `p`.
fn ell(f: &Fp12, coeffs: &LineCoefficients, p: &G1Affine) -> Fp12 {
    let c0 = coeffs.c0.mul_by_fp(&p.y);
    let c1 = coeffs.c1.mul_by_fp(&p.x);
    f.mul_by_014(&coeffs.c2, &c1, &c0)
}

/// The product of the Miller loops of all the pairs, accumulated in one pass.
/// Pairs with the identity on either side contribute the factor one and are
/// skipped.
fn miller_loop_product<'a, I>(pairs: I) -> Fp12
where
    I: IntoIterator<Item = (&'a G1Affine, &'a G2Affine)>, {
    let terms: Vec<(&G1Affine, &G2Affine)> = pairs
        .into_iter()
        .filter(|(p, q)| !bool::from(p.is_identity() | q.is_identity()))
        .collect();
    let mut rs: Vec<MillerPoint> = terms.iter().map(|(_, q)| MillerPoint::from_affine(q)).collect();

    let mut f = Fp12::one();
    let mut found_one = false;
    for i in (0..64).rev() {
        let bit = ((BLS_X >> 1) >> i) & 1 == 1;
        if !found_one {
            found_one = bit;
            continue;
        }
        for (r, (p, _)) in rs.iter_mut().zip(terms.iter()) {
            f = ell(&f, &doubling_step(r), p);
        }
        if bit {
            for (r, (p, q)) in rs.iter_mut().zip(terms.iter()) {
                f = ell(&f, &addition_step(r, q), p);
            }
        }
        f = f.square();
    }
    for (r, (p, _)) in rs.iter_mut().zip(terms.iter()) {
        f = ell(&f, &doubling_step(r), p);
    }
    // x is negative
    f.conjugate()
}

/// The Miller loop of a single pair. The result is not yet in the target
/// group, see [final_exponentiation].
pub fn miller_loop(q: &G2Affine, p: &G1Affine) -> Fp12 { miller_loop_product([(p, q)]) }

/// The product of the Miller loops of `(qs[i], ps[i])`, computed with a
/// single shared accumulator. Returns `None` if the lists differ in length.
/// The empty product is [Fp12::one].
pub fn miller_loop_n(qs: &[G2Affine], ps: &[G1Affine]) -> Option<Fp12> {
    if qs.len() != ps.len() {
        return None;
    }
    Some(miller_loop_product(ps.iter().zip(qs.iter())))
}

/// The product of the Miller loops of all the pairs. The pairs are split
/// into shards of [MILLER_LOOP_SHARD] which run on the workers of `ctx`, and
/// the partial products are multiplied in shard order.
pub fn multi_miller_loop(ctx: &ExecutionContext, pairs: &[(G1Affine, G2Affine)]) -> Fp12 {
    trace!("Multi Miller loop over {} pairs.", pairs.len());
    ctx.map_shards(pairs.len(), MILLER_LOOP_SHARD, |range| {
        miller_loop_product(pairs[range].iter().map(|(p, q)| (p, q)))
    })
    .iter()
    .fold(Fp12::one(), |acc, f| acc * f)
}

/// `f^x` for `f` in the cyclotomic subgroup, where `x` is the (negative)
/// curve parameter.
fn cyclotomic_exp(f: &Fp12) -> Fp12 {
    let mut tmp = Fp12::one();
    let mut found_one = false;
    for i in (0..64).rev() {
        let bit = (BLS_X >> i) & 1 == 1;
        if found_one {
            tmp = tmp.cyclotomic_square();
        } else {
            found_one = bit;
        }
        if bit {
            tmp *= f;
        }
    }
    tmp.conjugate()
}

/// Raise the output of a Miller loop to the power `(p^12 - 1) / r` times a
/// fixed integer coprime to `r`. The hard part is the chain of
/// https://eprint.iacr.org/2020/875.pdf in terms of the curve parameter.
/// Returns `None` if `f` is zero, which no Miller loop of valid points
/// produces.
pub fn final_exponentiation(f: &Fp12) -> Option<Fp12> {
    let f_inv: Option<Fp12> = f.invert().into();
    // easy part: f^((p^6 - 1) * (p^2 + 1))
    let t1 = f.conjugate() * f_inv?;
    let t2 = t1.frobenius_map().frobenius_map() * t1;

    let t1 = t2.cyclotomic_square().conjugate();
    let t3 = cyclotomic_exp(&t2);
    let t4 = t3.cyclotomic_square();
    let t5 = t1 * t3;
    let t1 = cyclotomic_exp(&t5);
    let t0 = cyclotomic_exp(&t1);
    let t6 = cyclotomic_exp(&t0) * t4;
    let t4 = cyclotomic_exp(&t6);
    let t5 = t5.conjugate();
    let t4 = t4 * t5 * t2;
    let t5 = t2.conjugate();
    let t1 = (t1 * t2).frobenius_map().frobenius_map().frobenius_map();
    let t6 = (t6 * t5).frobenius_map();
    let t3 = (t3 * t0).frobenius_map().frobenius_map();
    let t3 = t3 * t1 * t6;
    Some(t3 * t4)
}

/// The pairing of `p` and `q`.
pub fn pairing(p: &G1Affine, q: &G2Affine) -> Fp12 {
    // the Miller loop of points on the curve is never zero
    final_exponentiation(&miller_loop(q, p)).unwrap_or_else(Fp12::zero)
}

/// Check whether the product of the pairings of all the pairs is one, with one
/// multi Miller loop and one final exponentiation.
pub fn pairing_product_is_one(ctx: &ExecutionContext, pairs: &[(G1Affine, G2Affine)]) -> bool {
    final_exponentiation(&multi_miller_loop(ctx, pairs)).map_or(false, |x| bool::from(x.is_one()))
}

/// Check `e(g1x, g2x) = e(g1y, g2y)` as `e(g1x, g2x) * e(-g1y, g2y) = 1`.
pub fn check_pairing_eq(g1x: &G1Affine, g2x: &G2Affine, g1y: &G1Affine, g2y: &G2Affine) -> bool {
    let f = miller_loop_product([(g1x, g2x), (&g1y.neg(), g2y)]);
    final_exponentiation(&f).map_or(false, |x| bool::from(x.is_one()))
}
