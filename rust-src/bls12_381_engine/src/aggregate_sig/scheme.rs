//! The two variants of the BLS signature scheme, which differ in which group
//! holds the public keys and which holds the signatures.
use crate::curve_arithmetic::{Affine, Curve, G1Affine, G2Affine, Projective, G1, G2};
use std::fmt::Debug;

/// How messages are mapped to the signature group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashMode {
    /// hash_to_curve, the random oracle mode required for signatures.
    RandomOracle,
    /// encode_to_curve, the nonuniform encoding.
    Encode,
}

/// A choice of groups for public keys and signatures. Keys and signatures of
/// different schemes are different types and cannot be mixed.
pub trait SignatureScheme: 'static + Copy + Clone + Debug + Send + Sync + PartialEq + Eq {
    /// The group public keys live in.
    type KeyGroup: Curve;
    /// The group signatures and hashed messages live in.
    type SigGroup: Curve;

    const NAME: &'static str;
    /// The domain separation tag of the basic scheme.
    const DST: &'static [u8];
    /// The domain separation tag of the message augmentation scheme.
    const DST_AUG: &'static [u8];

    /// Arrange a point of each group as the input of the pairing.
    fn pairing_input(key: &Affine<Self::KeyGroup>, sig: &Affine<Self::SigGroup>) -> (G1Affine, G2Affine);
}

/// Public keys in G1 and signatures in G2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinPk;

/// Public keys in G2 and signatures in G1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinSig;

impl SignatureScheme for MinPk {
    type KeyGroup = G1;
    type SigGroup = G2;

    const DST: &'static [u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";
    const DST_AUG: &'static [u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_AUG_";
    const NAME: &'static str = "MinPk";

    fn pairing_input(key: &G1Affine, sig: &G2Affine) -> (G1Affine, G2Affine) { (*key, *sig) }
}

impl SignatureScheme for MinSig {
    type KeyGroup = G2;
    type SigGroup = G1;

    const DST: &'static [u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";
    const DST_AUG: &'static [u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_AUG_";
    const NAME: &'static str = "MinSig";

    fn pairing_input(key: &G2Affine, sig: &G1Affine) -> (G1Affine, G2Affine) { (*sig, *key) }
}

/// Map `aug || msg` to the signature group.
pub(crate) fn hash_message<S: SignatureScheme>(
    msg: &[u8],
    dst: &[u8],
    aug: &[u8],
    mode: HashMode,
) -> Projective<S::SigGroup> {
    let input: Vec<u8> = aug.iter().chain(msg.iter()).copied().collect();
    match mode {
        HashMode::RandomOracle => Projective::hash_to_curve(&input, dst),
        HashMode::Encode => Projective::encode_to_curve(&input, dst),
    }
}

/// The pairing input `(-generator, sig)`, which turns a check
/// `e(pk, H(m)) = e(generator, sig)` into a product equal to one.
pub(crate) fn signature_term<S: SignatureScheme>(sig: &Affine<S::SigGroup>) -> (G1Affine, G2Affine) {
    S::pairing_input(&Affine::<S::KeyGroup>::generator().neg(), sig)
}
