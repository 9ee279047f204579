//! Multi-scalar multiplication with the bucket method of Pippenger, and
//! batched conversion of points to affine form.
//!
//! The operations here split their input into shards of a fixed size, run
//! the shards on the workers of an [ExecutionContext], and add the partial
//! results in shard order. None of them are constant time, so they must only
//! be used with public scalars.
use super::{
    batch_invert,
    point::{Affine, Projective},
    Curve, Scalar,
};
use crate::parallel::ExecutionContext;
use log::trace;
use subtle::{Choice, ConditionallySelectable};

/// Number of terms handled by one worker in [multiexp].
pub const MULTIEXP_SHARD: usize = 512;
/// Number of points handled by one worker in [sum_points] and
/// [batch_normalize].
pub const BATCH_SHARD: usize = 1024;

/// Number of bits of the scalars that can be nonzero.
const SCALAR_BITS: usize = 255;
const MAX_WINDOW: usize = 16;

/// The window size for `n` terms. This number is based on the benchmark in
/// benches/multiexp_bench.rs
pub fn default_window_size(n: usize) -> usize {
    if n < 32 {
        3
    } else {
        let log2 = (usize::BITS - 1 - n.leading_zeros()) as usize;
        (log2 * 69 / 100 + 2).min(MAX_WINDOW)
    }
}

/// Compute `sum_i scalars[i] * points[i]`. Returns `None` if the two lists
/// differ in length. The empty sum is the identity.
pub fn multiexp<C: Curve>(
    ctx: &ExecutionContext,
    points: &[Affine<C>],
    scalars: &[Scalar],
) -> Option<Projective<C>> {
    multiexp_with_window(ctx, points, scalars, default_window_size(points.len()))
}

/// Same as [multiexp] for scalars below `2^num_bits`. Only the lowest
/// `num_bits` bits of each scalar are read, so short scalars, like the random
/// weights of batch verification, take proportionally fewer doublings.
pub fn multiexp_bits<C: Curve>(
    ctx: &ExecutionContext,
    points: &[Affine<C>],
    scalars: &[Scalar],
    num_bits: usize,
) -> Option<Projective<C>> {
    multiexp_inner(ctx, points, scalars, default_window_size(points.len()), num_bits)
}

/// Same as [multiexp] with an explicit window size, which is clamped to
/// `1..=16`. The result does not depend on the window size.
pub fn multiexp_with_window<C: Curve>(
    ctx: &ExecutionContext,
    points: &[Affine<C>],
    scalars: &[Scalar],
    window: usize,
) -> Option<Projective<C>> {
    multiexp_inner(ctx, points, scalars, window, SCALAR_BITS)
}

fn multiexp_inner<C: Curve>(
    ctx: &ExecutionContext,
    points: &[Affine<C>],
    scalars: &[Scalar],
    window: usize,
    num_bits: usize,
) -> Option<Projective<C>> {
    if points.len() != scalars.len() {
        return None;
    }
    let window = window.clamp(1, MAX_WINDOW);
    let num_bits = num_bits.min(SCALAR_BITS);
    trace!(
        "Multiexp of {} {} points of {} bits with window {}.",
        points.len(),
        C::NAME,
        num_bits,
        window
    );
    let limbs: Vec<[u64; 4]> = scalars.iter().map(Scalar::to_canonical_limbs).collect();
    let partial = ctx.map_shards(points.len(), MULTIEXP_SHARD, |range| {
        pippenger(&points[range.clone()], &limbs[range], window, num_bits)
    });
    Some(partial.iter().fold(Projective::identity(), |acc, p| acc.add(p)))
}

/// The `width` bits of `limbs` starting at bit `start`.
fn digit(limbs: &[u64; 4], start: usize, width: usize) -> usize {
    let limb = start / 64;
    let shift = start % 64;
    if limb >= limbs.len() {
        return 0;
    }
    let mut v = limbs[limb] >> shift;
    if shift + width > 64 && limb + 1 < limbs.len() {
        v |= limbs[limb + 1] << (64 - shift);
    }
    (v & ((1u64 << width) - 1)) as usize
}

fn pippenger<C: Curve>(points: &[Affine<C>], scalars: &[[u64; 4]], window: usize, num_bits: usize) -> Projective<C> {
    let num_windows = (num_bits + window - 1) / window;
    let mut buckets = vec![Projective::<C>::identity(); (1 << window) - 1];
    let mut acc = Projective::identity();
    for w in (0..num_windows).rev() {
        for _ in 0..window {
            acc = acc.double();
        }
        buckets.iter_mut().for_each(|b| *b = Projective::identity());
        let start = w * window;
        // the top window may reach past num_bits
        let width = window.min(num_bits - start);
        for (p, s) in points.iter().zip(scalars.iter()) {
            let d = digit(s, start, width);
            if d != 0 {
                buckets[d - 1] = buckets[d - 1].add_mixed(p);
            }
        }
        // sum_j j * buckets[j - 1] as a running sum from the top bucket down
        let mut running = Projective::identity();
        let mut sum = Projective::identity();
        for b in buckets.iter().rev() {
            running += b;
            sum += &running;
        }
        acc += sum;
    }
    acc
}

/// Sum a list of points. The empty sum is the identity.
pub fn sum_points<C: Curve>(ctx: &ExecutionContext, points: &[Affine<C>]) -> Projective<C> {
    ctx.map_shards(points.len(), BATCH_SHARD, |range| {
        points[range]
            .iter()
            .fold(Projective::identity(), |acc, p| acc.add_mixed(p))
    })
    .iter()
    .fold(Projective::identity(), |acc, p| acc.add(p))
}

/// Convert a list of points to affine form with one field inversion per
/// shard. The result is the same as calling
/// [to_affine](Projective::to_affine) on every point.
pub fn batch_normalize<C: Curve>(ctx: &ExecutionContext, points: &[Projective<C>]) -> Vec<Affine<C>> {
    ctx.map_shards(points.len(), BATCH_SHARD, |range| {
        let shard = &points[range];
        let mut zs: Vec<C::Base> = shard.iter().map(|p| p.z).collect();
        batch_invert(&mut zs);
        shard
            .iter()
            .zip(zs.iter())
            .map(|(p, zinv)| {
                let q = Affine {
                    x:        p.x * zinv,
                    y:        p.y * zinv,
                    infinity: Choice::from(0),
                };
                Affine::conditional_select(&q, &Affine::identity(), p.is_identity())
            })
            .collect::<Vec<_>>()
    })
    .into_iter()
    .flatten()
    .collect()
}
