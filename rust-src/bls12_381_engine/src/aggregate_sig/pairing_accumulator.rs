//! Incremental assembly of a verification over many (key, message,
//! signature) triples, which may be split over several accumulators and
//! merged before the single final check.
use super::{
    errors::AggregateSigError,
    keys::{PublicKey, Signature},
    scheme::{hash_message, signature_term, HashMode, SignatureScheme},
};
use crate::{
    curve_arithmetic::{pairing_product_is_one, G1Affine, G2Affine, Projective},
    parallel::ExecutionContext,
};
use log::debug;

/// Collects the pairing inputs `(pk, H(aug || msg))` of each aggregated
/// triple together with the sum of the signatures. [PairingAccumulator::final_verify]
/// then checks all of them with one multi pairing.
pub struct PairingAccumulator<S: SignatureScheme> {
    terms:   Vec<(G1Affine, G2Affine)>,
    sig_sum: Projective<S::SigGroup>,
    dst:     Vec<u8>,
    mode:    HashMode,
}

impl<S: SignatureScheme> PairingAccumulator<S> {
    /// An empty accumulator hashing messages in random oracle mode.
    pub fn new(dst: &[u8]) -> Self { Self::with_mode(dst, HashMode::RandomOracle) }

    pub fn with_mode(dst: &[u8], mode: HashMode) -> Self {
        PairingAccumulator {
            terms: Vec::new(),
            sig_sum: Projective::identity(),
            dst: dst.to_vec(),
            mode,
        }
    }

    pub fn dst(&self) -> &[u8] { &self.dst }

    /// Number of aggregated messages.
    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Add the message `aug || msg` under `pk`. The signature is optional so
    /// that an aggregate signature can be added once alongside the first
    /// message, with the other messages added without one.
    pub fn aggregate(
        &mut self,
        pk: &PublicKey<S>,
        pk_validated: bool,
        sig: Option<&Signature<S>>,
        sig_validated: bool,
        msg: &[u8],
        aug: &[u8],
    ) -> Result<(), AggregateSigError> {
        pk.check(pk_validated)?;
        if let Some(sig) = sig {
            sig.check(sig_validated)?;
            self.sig_sum = self.sig_sum.add_mixed(&sig.point);
        }
        let h = hash_message::<S>(msg, &self.dst, aug, self.mode).to_affine();
        self.terms.push(S::pairing_input(&pk.point, &h));
        Ok(())
    }

    /// Move the contents of `other` into this accumulator. Both must use the
    /// same tag and hashing mode.
    pub fn merge(&mut self, other: PairingAccumulator<S>) -> Result<(), AggregateSigError> {
        if self.dst != other.dst || self.mode != other.mode {
            return Err(AggregateSigError::DstMismatch);
        }
        self.terms.extend(other.terms);
        self.sig_sum = self.sig_sum.add(&other.sig_sum);
        Ok(())
    }

    /// Check that the sum of signatures is a valid aggregate signature on
    /// every aggregated message. An empty accumulator does not verify.
    pub fn final_verify(&self, ctx: &ExecutionContext) -> bool {
        if self.terms.is_empty() {
            debug!("{} accumulator verified without any messages.", S::NAME);
            return false;
        }
        let mut terms = Vec::with_capacity(self.terms.len() + 1);
        terms.extend_from_slice(&self.terms);
        terms.push(signature_term::<S>(&self.sig_sum.to_affine()));
        pairing_product_is_one(ctx, &terms)
    }
}
