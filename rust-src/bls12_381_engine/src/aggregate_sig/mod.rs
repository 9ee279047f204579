//! BLS signatures and their aggregation as in
//! <https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature-05>,
//! in both the variant with keys in G1 and the one with keys in G2.
mod aggregate_sig;
mod errors;
mod keys;
mod pairing_accumulator;
mod scheme;

pub use self::{
    aggregate_sig::{
        aggregate_verify, aggregate_verify_compressed, fast_aggregate_verify, multiple_aggregate_verify,
        AggregatePublicKey, AggregateSignature, HASH_SHARD,
    },
    errors::AggregateSigError,
    keys::{verify_compressed, PublicKey, SecretKey, Signature, MIN_IKM_LENGTH, SECRET_KEY_SIZE},
    pairing_accumulator::PairingAccumulator,
    scheme::{HashMode, MinPk, MinSig, SignatureScheme},
};
