//! Aggregation of keys and signatures, and the verification of aggregate
//! signatures.
use super::{
    errors::AggregateSigError,
    keys::{PublicKey, Signature},
    scheme::{hash_message, signature_term, HashMode, SignatureScheme},
};
use crate::{
    common::{serde_base16, Buffer, Deserial, ParseResult, ReadBytesExt, Serial},
    curve_arithmetic::{
        batch_normalize, multiexp_bits, pairing_product_is_one, sum_points, Affine, G1Affine, G2Affine,
        Projective, Scalar,
    },
    parallel::ExecutionContext,
};
use log::debug;
use rand::Rng;

/// Number of messages hashed by one worker.
pub const HASH_SHARD: usize = 16;

/// The running sum of a list of signatures.
pub struct AggregateSignature<S: SignatureScheme> {
    point: Projective<S::SigGroup>,
}

/// The running sum of a list of public keys.
pub struct AggregatePublicKey<S: SignatureScheme> {
    point: Projective<S::KeyGroup>,
}

/// Sum the points of a list, checking each one first unless `validated` is
/// set. The whole list is rejected if any point is.
fn checked_sum<C: crate::curve_arithmetic::Curve>(
    ctx: &ExecutionContext,
    points: &[Affine<C>],
    validated: bool,
) -> Result<Projective<C>, AggregateSigError> {
    if points.is_empty() {
        return Err(AggregateSigError::EmptyInput);
    }
    if !validated {
        let checks = ctx.map_shards(points.len(), HASH_SHARD, |range| {
            points[range].iter().all(|p| p.is_torsion_free())
        });
        if !checks.into_iter().all(|ok| ok) {
            debug!("Aggregation of {} {} points failed the subgroup check.", points.len(), C::NAME);
            return Err(AggregateSigError::NotInSubgroup);
        }
    }
    Ok(sum_points(ctx, points))
}

impl<S: SignatureScheme> AggregateSignature<S> {
    /// The empty aggregate. It is the identity of aggregation.
    pub fn empty() -> Self {
        AggregateSignature {
            point: Projective::identity(),
        }
    }

    pub fn from_signature(sig: &Signature<S>) -> Self {
        AggregateSignature {
            point: sig.point.to_projective(),
        }
    }

    /// Sum a nonempty list of signatures. Unless `validated` is set every
    /// signature is checked to be in the subgroup, and one failure fails the
    /// aggregation.
    pub fn aggregate(ctx: &ExecutionContext, sigs: &[Signature<S>], validated: bool) -> Result<Self, AggregateSigError> {
        let points: Vec<Affine<S::SigGroup>> = sigs.iter().map(|s| s.point).collect();
        Ok(AggregateSignature {
            point: checked_sum(ctx, &points, validated)?,
        })
    }

    /// Decode and sum a nonempty list of compressed signatures, with the
    /// decompressions sharing their square roots.
    pub fn aggregate_compressed<B: AsRef<[u8]> + Sync>(
        ctx: &ExecutionContext,
        sigs: &[B],
        validated: bool,
    ) -> Result<Self, AggregateSigError> {
        if sigs.is_empty() {
            return Err(AggregateSigError::EmptyInput);
        }
        let points = Affine::<S::SigGroup>::batch_from_compressed(ctx, sigs, !validated).map_err(|e| {
            debug!("Decoding {} compressed points failed: {}", sigs.len(), e);
            e
        })?;
        Ok(AggregateSignature {
            point: sum_points(ctx, &points),
        })
    }

    /// Add a signature, checking it first unless `validated` is set.
    pub fn add_signature(&mut self, sig: &Signature<S>, validated: bool) -> Result<(), AggregateSigError> {
        if !validated && !sig.point.is_torsion_free() {
            return Err(AggregateSigError::NotInSubgroup);
        }
        self.point = self.point.add_mixed(&sig.point);
        Ok(())
    }

    pub fn add_aggregate(&mut self, other: &AggregateSignature<S>) { self.point = self.point.add(&other.point) }

    pub fn to_signature(&self) -> Signature<S> { Signature::from_point(self.point.to_affine()) }
}

impl<S: SignatureScheme> AggregatePublicKey<S> {
    pub fn empty() -> Self {
        AggregatePublicKey {
            point: Projective::identity(),
        }
    }

    pub fn from_public_key(pk: &PublicKey<S>) -> Self {
        AggregatePublicKey {
            point: pk.point.to_projective(),
        }
    }

    /// Sum a nonempty list of keys. Unless `validated` is set every key is
    /// checked to be in the subgroup, and one failure fails the aggregation.
    pub fn aggregate(ctx: &ExecutionContext, pks: &[PublicKey<S>], validated: bool) -> Result<Self, AggregateSigError> {
        let points: Vec<Affine<S::KeyGroup>> = pks.iter().map(|pk| pk.point).collect();
        Ok(AggregatePublicKey {
            point: checked_sum(ctx, &points, validated)?,
        })
    }

    /// Decode and sum a nonempty list of compressed keys.
    pub fn aggregate_compressed<B: AsRef<[u8]> + Sync>(
        ctx: &ExecutionContext,
        pks: &[B],
        validated: bool,
    ) -> Result<Self, AggregateSigError> {
        if pks.is_empty() {
            return Err(AggregateSigError::EmptyInput);
        }
        let points = Affine::<S::KeyGroup>::batch_from_compressed(ctx, pks, !validated).map_err(|e| {
            debug!("Decoding {} compressed points failed: {}", pks.len(), e);
            e
        })?;
        Ok(AggregatePublicKey {
            point: sum_points(ctx, &points),
        })
    }

    pub fn add_public_key(&mut self, pk: &PublicKey<S>, validated: bool) -> Result<(), AggregateSigError> {
        if !validated && !pk.point.is_torsion_free() {
            return Err(AggregateSigError::NotInSubgroup);
        }
        self.point = self.point.add_mixed(&pk.point);
        Ok(())
    }

    pub fn add_aggregate(&mut self, other: &AggregatePublicKey<S>) { self.point = self.point.add(&other.point) }

    pub fn to_public_key(&self) -> PublicKey<S> { PublicKey::from_point(self.point.to_affine()) }
}

impl<S: SignatureScheme> Clone for AggregateSignature<S> {
    fn clone(&self) -> Self { *self }
}

impl<S: SignatureScheme> Copy for AggregateSignature<S> {}

impl<S: SignatureScheme> PartialEq for AggregateSignature<S> {
    fn eq(&self, other: &Self) -> bool { self.point == other.point }
}

impl<S: SignatureScheme> Eq for AggregateSignature<S> {}

impl<S: SignatureScheme> std::fmt::Debug for AggregateSignature<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AggregateSignature<{}>({:?})", S::NAME, self.point)
    }
}

impl<S: SignatureScheme> Clone for AggregatePublicKey<S> {
    fn clone(&self) -> Self { *self }
}

impl<S: SignatureScheme> Copy for AggregatePublicKey<S> {}

impl<S: SignatureScheme> PartialEq for AggregatePublicKey<S> {
    fn eq(&self, other: &Self) -> bool { self.point == other.point }
}

impl<S: SignatureScheme> Eq for AggregatePublicKey<S> {}

impl<S: SignatureScheme> std::fmt::Debug for AggregatePublicKey<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AggregatePublicKey<{}>({:?})", S::NAME, self.point)
    }
}

impl<S: SignatureScheme> Serial for AggregateSignature<S> {
    fn serial<B: Buffer>(&self, out: &mut B) { self.point.serial(out) }
}

impl<S: SignatureScheme> Deserial for AggregateSignature<S> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        Ok(AggregateSignature {
            point: Projective::deserial(source)?,
        })
    }
}

impl<S: SignatureScheme> Serial for AggregatePublicKey<S> {
    fn serial<B: Buffer>(&self, out: &mut B) { self.point.serial(out) }
}

impl<S: SignatureScheme> Deserial for AggregatePublicKey<S> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        Ok(AggregatePublicKey {
            point: Projective::deserial(source)?,
        })
    }
}

serde_base16!(AggregateSignature);
serde_base16!(AggregatePublicKey);

/// The pairing inputs `(pks[i], H(msgs[i]))`, computed in shards. Fails if a
/// key is rejected by [PublicKey::check].
fn message_terms<S: SignatureScheme>(
    ctx: &ExecutionContext,
    pks: &[Affine<S::KeyGroup>],
    pks_validated: bool,
    msgs: &[&[u8]],
    dst: &[u8],
) -> Result<Vec<(G1Affine, G2Affine)>, AggregateSigError> {
    let shards = ctx.map_shards(pks.len(), HASH_SHARD, |range| {
        let mut terms = Vec::with_capacity(range.len());
        for (pk, msg) in pks[range.clone()].iter().zip(msgs[range].iter()) {
            PublicKey::<S>::from_point(*pk).check(pks_validated)?;
            let h = hash_message::<S>(msg, dst, &[], HashMode::RandomOracle);
            terms.push(S::pairing_input(pk, &h.to_affine()));
        }
        Ok::<_, AggregateSigError>(terms)
    });
    let mut out = Vec::with_capacity(pks.len() + 1);
    for shard in shards {
        out.extend(shard?);
    }
    Ok(out)
}

/// Verify an aggregate signature on pairs `(msgs[i], pks[i])` by checking
/// `e(generator, sig) = product_i e(pks[i], H(msgs[i]))` with one multi
/// pairing. The lists must be nonempty and of equal length, and no key may
/// be the identity. Messages are not required to be distinct.
pub fn aggregate_verify<S: SignatureScheme>(
    ctx: &ExecutionContext,
    sig: &Signature<S>,
    sig_validated: bool,
    pks: &[PublicKey<S>],
    pks_validated: bool,
    msgs: &[&[u8]],
    dst: &[u8],
) -> bool {
    // verifying against the empty set of signers always fails
    if pks.is_empty() || pks.len() != msgs.len() {
        debug!(
            "{} aggregate verification called with {} keys and {} messages.",
            S::NAME,
            pks.len(),
            msgs.len()
        );
        return false;
    }
    if let Err(e) = sig.check(sig_validated) {
        debug!("{} aggregate verification failed: {}", S::NAME, e);
        return false;
    }
    let points: Vec<Affine<S::KeyGroup>> = pks.iter().map(|pk| pk.point).collect();
    let mut terms = match message_terms::<S>(ctx, &points, pks_validated, msgs, dst) {
        Ok(terms) => terms,
        Err(e) => {
            debug!("{} aggregate verification failed: {}", S::NAME, e);
            return false;
        }
    };
    terms.push(signature_term::<S>(&sig.point));
    pairing_product_is_one(ctx, &terms)
}

/// [aggregate_verify] on compressed encodings. The signature and every key
/// are decoded with the subgroup check, and any decoding failure makes the
/// verification fail.
pub fn aggregate_verify_compressed<S: SignatureScheme, B: AsRef<[u8]> + Sync>(
    ctx: &ExecutionContext,
    sig_bytes: &[u8],
    pk_bytes: &[B],
    msgs: &[&[u8]],
    dst: &[u8],
) -> bool {
    let sig = match Affine::<S::SigGroup>::from_compressed(sig_bytes) {
        Ok(point) => Signature::<S>::from_point(point),
        Err(e) => {
            debug!("{} aggregate signature failed to decode: {}", S::NAME, e);
            return false;
        }
    };
    let pks: Vec<PublicKey<S>> = match Affine::<S::KeyGroup>::batch_from_compressed(ctx, pk_bytes, true) {
        Ok(points) => points.into_iter().map(PublicKey::from_point).collect(),
        Err(e) => {
            debug!("{} public keys failed to decode: {}", S::NAME, e);
            return false;
        }
    };
    aggregate_verify(ctx, &sig, true, &pks, true, msgs, dst)
}

/// Verify an aggregate signature of the same message by all keys, by
/// summing the keys and checking a single signature. The sum of the keys may
/// not be the identity, which also rejects lists of identity keys. Keys must
/// come with a proof of possession, as sums of keys are otherwise open to
/// rogue key attacks.
pub fn fast_aggregate_verify<S: SignatureScheme>(
    ctx: &ExecutionContext,
    sig: &Signature<S>,
    sig_validated: bool,
    pks: &[PublicKey<S>],
    pks_validated: bool,
    msg: &[u8],
    dst: &[u8],
) -> bool {
    let agg = match AggregatePublicKey::aggregate(ctx, pks, pks_validated) {
        Ok(agg) => agg,
        Err(e) => {
            debug!("{} fast aggregate verification failed: {}", S::NAME, e);
            return false;
        }
    };
    // the sum is in the subgroup when the summands are
    sig.verify(sig_validated, &agg.to_public_key(), true, msg, dst, HashMode::RandomOracle)
}

/// Verify several aggregate signatures, each on its own message under its own
/// (aggregate) key, with one multi pairing. Each equation is weighted by a
/// nonzero random scalar of `rand_bits` bits drawn from `rng`, so that
/// invalid signatures cannot cancel each other out. `rand_bits` must be in
/// `1..=255`, and 64 is the usual choice.
#[allow(clippy::too_many_arguments)]
pub fn multiple_aggregate_verify<S: SignatureScheme, R: Rng>(
    ctx: &ExecutionContext,
    sigs: &[Signature<S>],
    sigs_validated: bool,
    pks: &[PublicKey<S>],
    pks_validated: bool,
    msgs: &[&[u8]],
    dst: &[u8],
    rng: &mut R,
    rand_bits: usize,
) -> bool {
    let n = sigs.len();
    if n == 0 || pks.len() != n || msgs.len() != n {
        debug!(
            "{} multiple aggregate verification called with {} signatures, {} keys and {} messages.",
            S::NAME,
            n,
            pks.len(),
            msgs.len()
        );
        return false;
    }
    if rand_bits == 0 || rand_bits > 255 {
        debug!("Invalid number of random bits {}.", rand_bits);
        return false;
    }
    for sig in sigs.iter() {
        if let Err(e) = sig.check(sigs_validated) {
            debug!("{} multiple aggregate verification failed: {}", S::NAME, e);
            return false;
        }
    }
    for pk in pks.iter() {
        if let Err(e) = pk.check(pks_validated) {
            debug!("{} multiple aggregate verification failed: {}", S::NAME, e);
            return false;
        }
    }

    let rands: Vec<Scalar> = (0..n).map(|_| random_scalar(rng, rand_bits)).collect();
    // the weighted keys r_i * pk_i
    let weighted = ctx.map_shards(n, HASH_SHARD, |range| {
        pks[range.clone()]
            .iter()
            .zip(rands[range].iter())
            .map(|(pk, r)| pk.point.to_projective().mul_bits(&r.to_canonical_limbs(), rand_bits))
            .collect::<Vec<_>>()
    });
    let weighted: Vec<Projective<S::KeyGroup>> = weighted.into_iter().flatten().collect();
    let weighted = batch_normalize(ctx, &weighted);

    // the keys are checked above, the weighted ones are nonzero multiples
    let mut terms = match message_terms::<S>(ctx, &weighted, true, msgs, dst) {
        Ok(terms) => terms,
        Err(e) => {
            debug!("{} multiple aggregate verification failed: {}", S::NAME, e);
            return false;
        }
    };
    // sum_i r_i * sig_i
    let sig_points: Vec<Affine<S::SigGroup>> = sigs.iter().map(|s| s.point).collect();
    let sig_sum = match multiexp_bits(ctx, &sig_points, &rands, rand_bits) {
        Some(sum) => sum.to_affine(),
        None => return false,
    };
    terms.push(signature_term::<S>(&sig_sum));
    pairing_product_is_one(ctx, &terms)
}

/// A uniformly random nonzero integer below `2^rand_bits`, with
/// `rand_bits <= 255` so that it is smaller than the group order.
fn random_scalar<R: Rng>(rng: &mut R, rand_bits: usize) -> Scalar {
    loop {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let bits = rand_bits.saturating_sub(64 * i).min(64);
            *limb = match bits {
                0 => 0,
                64 => rng.gen(),
                b => rng.gen::<u64>() >> (64 - b),
            };
        }
        let s: Option<Scalar> = Scalar::from_canonical_limbs(&limbs).into();
        if let Some(s) = s {
            if !bool::from(s.is_zero()) {
                return s;
            }
        }
    }
}
