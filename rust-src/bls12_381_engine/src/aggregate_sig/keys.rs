use super::{
    errors::AggregateSigError,
    scheme::{hash_message, signature_term, HashMode, SignatureScheme},
};
use crate::{
    common::{serde_base16, Buffer, Deserial, ParseResult, ReadBytesExt, Serial},
    curve_arithmetic::{pairing_product_is_one, Affine, Projective, Scalar},
    parallel::ExecutionContext,
};
use hkdf::Hkdf;
use log::debug;
use sha2::{Digest, Sha256};
use std::marker::PhantomData;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Size of a secret key in bytes.
pub const SECRET_KEY_SIZE: usize = 32;
/// The smallest amount of input key material [SecretKey::key_gen] accepts.
pub const MIN_IKM_LENGTH: usize = 32;

const KEYGEN_SALT: &[u8] = b"BLS-SIG-KEYGEN-SALT-";
/// Number of HKDF output bytes reduced to a scalar, `ceil(3 * ceil(log2(r)) /
/// 16)`.
const KEYGEN_L: usize = 48;

/// A secret key is a nonzero scalar. It is erased when dropped, and can be
/// erased earlier with [Zeroize::zeroize].
///
/// Equality is constant time.
pub struct SecretKey<S: SignatureScheme> {
    scalar:  Scalar,
    _scheme: PhantomData<S>,
}

impl<S: SignatureScheme> SecretKey<S> {
    fn new(scalar: Scalar) -> Self {
        SecretKey {
            scalar,
            _scheme: PhantomData,
        }
    }

    /// Derive a key from at least [MIN_IKM_LENGTH] bytes of input key
    /// material, with the optional `key_info` of the derivation.
    /// Implements https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature-05#section-2.3
    pub fn key_gen(ikm: &[u8], key_info: &[u8]) -> Result<Self, AggregateSigError> {
        if ikm.len() < MIN_IKM_LENGTH {
            debug!("Refusing to derive a key from {} bytes of key material.", ikm.len());
            return Err(AggregateSigError::InsufficientKeyMaterial {
                min:    MIN_IKM_LENGTH,
                actual: ikm.len(),
            });
        }
        // IKM || I2OSP(0, 1)
        let mut ikm_prime = Vec::with_capacity(ikm.len() + 1);
        ikm_prime.extend_from_slice(ikm);
        ikm_prime.push(0);
        // key_info || I2OSP(L, 2)
        let mut info = Vec::with_capacity(key_info.len() + 2);
        info.extend_from_slice(key_info);
        info.extend_from_slice(&(KEYGEN_L as u16).to_be_bytes());

        let mut salt = Sha256::digest(KEYGEN_SALT);
        let mut okm = [0u8; KEYGEN_L];
        let result = loop {
            let hk = Hkdf::<Sha256>::new(Some(&salt[..]), &ikm_prime);
            if hk.expand(&info, &mut okm).is_err() {
                break Err(AggregateSigError::KeyDerivation);
            }
            match Scalar::from_be_bytes_mod_order(&okm) {
                Some(mut sk) if !bool::from(sk.is_zero()) => {
                    let key = Self::new(sk);
                    sk.zeroize();
                    break Ok(key);
                }
                Some(_) => salt = Sha256::digest(salt),
                None => break Err(AggregateSigError::KeyDerivation),
            }
        };
        ikm_prime.zeroize();
        okm.zeroize();
        result
    }

    /// Generate a key from 32 bytes of fresh randomness.
    pub fn generate<R: rand::Rng + rand::CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut ikm = [0u8; MIN_IKM_LENGTH];
            rng.fill_bytes(&mut ikm);
            let key = Self::key_gen(&ikm, &[]);
            ikm.zeroize();
            if let Ok(key) = key {
                return key;
            }
        }
    }

    /// The big-endian encoding of the scalar.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] { self.scalar.to_bytes_be() }

    /// Decode a key, rejecting zero and values that are not reduced.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AggregateSigError> {
        let bytes: &[u8; SECRET_KEY_SIZE] = bytes.try_into().map_err(|_| AggregateSigError::InvalidSecretKey)?;
        let mut scalar: Option<Scalar> = Scalar::from_bytes_be(bytes).into();
        let key = match scalar {
            Some(s) if !bool::from(s.is_zero()) => Ok(Self::new(s)),
            _ => Err(AggregateSigError::InvalidSecretKey),
        };
        scalar.zeroize();
        key
    }

    /// Sign `msg` with the message mapped to the curve in the given mode.
    pub fn sign(&self, msg: &[u8], dst: &[u8], mode: HashMode) -> Signature<S> { self.sign_with(msg, dst, &[], mode) }

    /// Sign `aug || msg`, usually with the public key as the augmentation.
    pub fn sign_aug(&self, msg: &[u8], dst: &[u8], aug: &[u8]) -> Signature<S> {
        self.sign_with(msg, dst, aug, HashMode::RandomOracle)
    }

    fn sign_with(&self, msg: &[u8], dst: &[u8], aug: &[u8], mode: HashMode) -> Signature<S> {
        let h = hash_message::<S>(msg, dst, aug, mode);
        Signature::new(h.mul(&self.scalar).to_affine())
    }
}

impl<S: SignatureScheme> Zeroize for SecretKey<S> {
    fn zeroize(&mut self) { self.scalar.zeroize() }
}

impl<S: SignatureScheme> Drop for SecretKey<S> {
    fn drop(&mut self) { self.zeroize() }
}

impl<S: SignatureScheme> Clone for SecretKey<S> {
    fn clone(&self) -> Self { Self::new(self.scalar) }
}

impl<S: SignatureScheme> PartialEq for SecretKey<S> {
    fn eq(&self, other: &Self) -> bool { bool::from(self.scalar.ct_eq(&other.scalar)) }
}

impl<S: SignatureScheme> Eq for SecretKey<S> {}

impl<S: SignatureScheme> std::fmt::Debug for SecretKey<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "<{} secret key>", S::NAME) }
}

impl<S: SignatureScheme> Serial for SecretKey<S> {
    fn serial<B: Buffer>(&self, out: &mut B) {
        let mut bytes = self.scalar.to_bytes_be();
        bytes[..].serial(out);
        bytes.zeroize();
    }
}

impl<S: SignatureScheme> Deserial for SecretKey<S> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        let mut buf = [0u8; SECRET_KEY_SIZE];
        source.read_exact(&mut buf)?;
        let key = Self::from_bytes(&buf);
        buf.zeroize();
        Ok(key?)
    }
}

/// A public key is the generator of [SignatureScheme::KeyGroup] multiplied by
/// the secret key.
pub struct PublicKey<S: SignatureScheme> {
    pub(crate) point: Affine<S::KeyGroup>,
}

impl<S: SignatureScheme> PublicKey<S> {
    pub fn from_secret_key(sk: &SecretKey<S>) -> Self {
        PublicKey {
            point: Projective::<S::KeyGroup>::generator().mul(&sk.scalar).to_affine(),
        }
    }

    /// Wrap a point without any checks.
    pub fn from_point(point: Affine<S::KeyGroup>) -> Self { PublicKey { point } }

    pub fn point(&self) -> &Affine<S::KeyGroup> { &self.point }

    /// Whether the key may be used for verification: it is not the identity
    /// and lies in the prime order subgroup.
    pub fn key_validate(&self) -> bool { !bool::from(self.point.is_identity()) && self.point.is_torsion_free() }

    /// Checks done before a key enters a verification. With `validated` the
    /// subgroup check is skipped, but the identity is always rejected.
    pub(crate) fn check(&self, validated: bool) -> Result<(), AggregateSigError> {
        if bool::from(self.point.is_identity()) {
            return Err(AggregateSigError::IdentityPoint);
        }
        if !validated && !self.point.is_torsion_free() {
            return Err(AggregateSigError::NotInSubgroup);
        }
        Ok(())
    }

    /// The compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> { self.point.to_compressed() }

    /// The uncompressed encoding.
    pub fn serialize(&self) -> Vec<u8> { self.point.to_uncompressed() }

    /// Decode a compressed or uncompressed key, chosen by length. The point is
    /// checked to be in the subgroup, but may be the identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AggregateSigError> {
        Ok(PublicKey {
            point: Affine::from_bytes(bytes)?,
        })
    }
}

impl<S: SignatureScheme> Clone for PublicKey<S> {
    fn clone(&self) -> Self { *self }
}

impl<S: SignatureScheme> Copy for PublicKey<S> {}

impl<S: SignatureScheme> PartialEq for PublicKey<S> {
    fn eq(&self, other: &Self) -> bool { self.point == other.point }
}

impl<S: SignatureScheme> Eq for PublicKey<S> {}

impl<S: SignatureScheme> std::fmt::Debug for PublicKey<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey<{}>({})", S::NAME, hex::encode(self.to_bytes()))
    }
}

impl<S: SignatureScheme> Serial for PublicKey<S> {
    fn serial<B: Buffer>(&self, out: &mut B) { self.point.serial(out) }
}

impl<S: SignatureScheme> Deserial for PublicKey<S> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        Ok(PublicKey {
            point: Affine::deserial(source)?,
        })
    }
}

serde_base16!(PublicKey);
serde_base16!(SecretKey);
serde_base16!(Signature);

/// A signature is a hashed message multiplied by the secret key.
pub struct Signature<S: SignatureScheme> {
    pub(crate) point: Affine<S::SigGroup>,
}

impl<S: SignatureScheme> Signature<S> {
    pub(crate) fn new(point: Affine<S::SigGroup>) -> Self { Signature { point } }

    /// Wrap a point without any checks.
    pub fn from_point(point: Affine<S::SigGroup>) -> Self { Self::new(point) }

    pub fn point(&self) -> &Affine<S::SigGroup> { &self.point }

    /// Whether the signature lies in the prime order subgroup and, with
    /// `check_infinity`, is not the identity.
    pub fn validate(&self, check_infinity: bool) -> bool {
        if check_infinity && bool::from(self.point.is_identity()) {
            return false;
        }
        self.point.is_torsion_free()
    }

    pub(crate) fn check(&self, validated: bool) -> Result<(), AggregateSigError> {
        if bool::from(self.point.is_identity()) {
            return Err(AggregateSigError::IdentityPoint);
        }
        if !validated && !self.point.is_torsion_free() {
            return Err(AggregateSigError::NotInSubgroup);
        }
        Ok(())
    }

    /// Verify a signature on `msg`. With `sig_validated` or `pk_validated`
    /// the subgroup check of the signature or the key is skipped. Identity
    /// keys and signatures are rejected.
    pub fn verify(
        &self,
        sig_validated: bool,
        pk: &PublicKey<S>,
        pk_validated: bool,
        msg: &[u8],
        dst: &[u8],
        mode: HashMode,
    ) -> bool {
        self.verify_with(sig_validated, pk, pk_validated, msg, dst, &[], mode)
    }

    /// Verify a signature on `aug || msg` made by [SecretKey::sign_aug].
    pub fn verify_aug(
        &self,
        sig_validated: bool,
        pk: &PublicKey<S>,
        pk_validated: bool,
        msg: &[u8],
        dst: &[u8],
        aug: &[u8],
    ) -> bool {
        self.verify_with(sig_validated, pk, pk_validated, msg, dst, aug, HashMode::RandomOracle)
    }

    #[allow(clippy::too_many_arguments)]
    fn verify_with(
        &self,
        sig_validated: bool,
        pk: &PublicKey<S>,
        pk_validated: bool,
        msg: &[u8],
        dst: &[u8],
        aug: &[u8],
        mode: HashMode,
    ) -> bool {
        if let Err(e) = pk.check(pk_validated).and_then(|_| self.check(sig_validated)) {
            debug!("{} verification failed: {}", S::NAME, e);
            return false;
        }
        let h = hash_message::<S>(msg, dst, aug, mode).to_affine();
        let (p1, q1) = S::pairing_input(&pk.point, &h);
        let (p2, q2) = signature_term::<S>(&self.point);
        let ctx = ExecutionContext::sequential();
        pairing_product_is_one(&ctx, &[(p1, q1), (p2, q2)])
    }

    /// The compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> { self.point.to_compressed() }

    /// The uncompressed encoding.
    pub fn serialize(&self) -> Vec<u8> { self.point.to_uncompressed() }

    /// Decode a compressed or uncompressed signature, chosen by length. The
    /// point is checked to be in the subgroup, but may be the identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AggregateSigError> { Ok(Self::new(Affine::from_bytes(bytes)?)) }
}

impl<S: SignatureScheme> Clone for Signature<S> {
    fn clone(&self) -> Self { *self }
}

impl<S: SignatureScheme> Copy for Signature<S> {}

impl<S: SignatureScheme> PartialEq for Signature<S> {
    fn eq(&self, other: &Self) -> bool { self.point == other.point }
}

impl<S: SignatureScheme> Eq for Signature<S> {}

impl<S: SignatureScheme> std::fmt::Debug for Signature<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature<{}>({})", S::NAME, hex::encode(self.to_bytes()))
    }
}

impl<S: SignatureScheme> Serial for Signature<S> {
    fn serial<B: Buffer>(&self, out: &mut B) { self.point.serial(out) }
}

impl<S: SignatureScheme> Deserial for Signature<S> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> { Ok(Self::new(Affine::deserial(source)?)) }
}

/// Verify a compressed signature against a compressed public key. Both are
/// decoded with the subgroup check, and any decoding failure makes the
/// verification fail.
pub fn verify_compressed<S: SignatureScheme>(
    sig_bytes: &[u8],
    pk_bytes: &[u8],
    msg: &[u8],
    dst: &[u8],
    mode: HashMode,
) -> bool {
    let decoded = Affine::<S::SigGroup>::from_compressed(sig_bytes)
        .and_then(|sig| Ok((sig, Affine::<S::KeyGroup>::from_compressed(pk_bytes)?)));
    match decoded {
        Ok((sig, pk)) => Signature::<S>::new(sig).verify(true, &PublicKey::from_point(pk), true, msg, dst, mode),
        Err(e) => {
            debug!("{} verification of compressed inputs failed: {}", S::NAME, e);
            false
        }
    }
}

/// Check `e(pk, H(m)) = e(generator, sig)` in the pairing's argument order,
/// with the two sides computed separately. Used to cross-check the one pass
/// verification in tests.
#[cfg(test)]
fn verify_two_pairings<S: SignatureScheme>(sig: &Signature<S>, pk: &PublicKey<S>, msg: &[u8], dst: &[u8]) -> bool {
    let h = hash_message::<S>(msg, dst, &[], HashMode::RandomOracle).to_affine();
    let (p1, q1) = S::pairing_input(&pk.point, &h);
    let (p2, q2) = S::pairing_input(&Affine::<S::KeyGroup>::generator(), &sig.point);
    crate::curve_arithmetic::check_pairing_eq(&p1, &q1, &p2, &q2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aggregate_sig::{MinPk, MinSig},
        common::serialize_deserialize,
    };
    use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};

    const TEST_ITERATIONS: usize = 5;

    fn sign_and_verify<S: SignatureScheme>(rng: &mut StdRng) {
        for _ in 0..TEST_ITERATIONS {
            let sk = SecretKey::<S>::generate(rng);
            let pk = PublicKey::from_secret_key(&sk);
            assert!(pk.key_validate());

            // should verify correctly
            let m = rng.gen::<[u8; 32]>();
            let signature = sk.sign(&m, S::DST, HashMode::RandomOracle);
            assert!(signature.validate(true));
            assert!(signature.verify(false, &pk, false, &m, S::DST, HashMode::RandomOracle));
            assert!(signature.verify(true, &pk, true, &m, S::DST, HashMode::RandomOracle));
            assert!(verify_two_pairings(&signature, &pk, &m, S::DST));

            // should not verify!
            let sk2 = SecretKey::<S>::generate(rng);
            let pk2 = PublicKey::from_secret_key(&sk2);
            assert!(!signature.verify(false, &pk2, false, &m, S::DST, HashMode::RandomOracle));
            assert!(!verify_two_pairings(&signature, &pk2, &m, S::DST));
            let m2 = rng.gen::<[u8; 32]>();
            assert!(!signature.verify(false, &pk, false, &m2, S::DST, HashMode::RandomOracle));
            assert!(!signature.verify(false, &pk, false, &m, S::DST_AUG, HashMode::RandomOracle));
            // the modes do not mix
            assert!(!signature.verify(false, &pk, false, &m, S::DST, HashMode::Encode));
            let encoded = sk.sign(&m, S::DST, HashMode::Encode);
            assert!(encoded.verify(false, &pk, false, &m, S::DST, HashMode::Encode));
            assert!(!encoded.verify(false, &pk, false, &m, S::DST, HashMode::RandomOracle));

            // empty messages are fine
            let empty = sk.sign(&[], S::DST, HashMode::RandomOracle);
            assert!(empty.verify(false, &pk, false, &[], S::DST, HashMode::RandomOracle));
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        sign_and_verify::<MinPk>(&mut rng);
        sign_and_verify::<MinSig>(&mut rng);
    }

    #[test]
    fn test_augmentation() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        let sk = SecretKey::<MinPk>::generate(&mut rng);
        let pk = PublicKey::from_secret_key(&sk);
        let aug = pk.to_bytes();
        let sig = sk.sign_aug(b"message", MinPk::DST_AUG, &aug);
        assert!(sig.verify_aug(false, &pk, false, b"message", MinPk::DST_AUG, &aug));
        assert!(!sig.verify_aug(false, &pk, false, b"message", MinPk::DST_AUG, b"other"));
        assert!(!sig.verify(false, &pk, false, b"message", MinPk::DST_AUG, HashMode::RandomOracle));
        // the augmentation is a prefix of the message
        let mut joined = aug.clone();
        joined.extend_from_slice(b"message");
        assert!(sig.verify(false, &pk, false, &joined, MinPk::DST_AUG, HashMode::RandomOracle));
    }

    #[test]
    fn test_identity_rejected() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        let sk = SecretKey::<MinPk>::generate(&mut rng);
        let pk = PublicKey::from_secret_key(&sk);
        let sig = sk.sign(b"m", MinPk::DST, HashMode::RandomOracle);
        let id_pk = PublicKey::<MinPk>::from_point(Affine::identity());
        let id_sig = Signature::<MinPk>::from_point(Affine::identity());
        assert!(!id_pk.key_validate());
        assert!(!id_sig.validate(true));
        assert!(id_sig.validate(false));
        // e(0, H(m)) = e(g, 0) holds, but is rejected
        assert!(!id_sig.verify(false, &id_pk, false, b"m", MinPk::DST, HashMode::RandomOracle));
        assert!(!sig.verify(false, &id_pk, false, b"m", MinPk::DST, HashMode::RandomOracle));
        assert!(!id_sig.verify(false, &pk, false, b"m", MinPk::DST, HashMode::RandomOracle));
    }

    #[test]
    fn test_key_gen() {
        // Known answers of the HKDF based derivation.
        let cases = [
            (
                "09e74ad3ead373439388bf7cfb52b151c450632e67f3c84e6ed762bc0928d5eb",
                "57cb278c9deb055f12cc807c3068f2ce804654a54de54801f0cb6a774c211de2",
            ),
            (
                "725150bb38d49fc2a7ad8a8cba1f0dc32c3a468739e88b9aa62c450ce3ce1f32",
                "397048d5f83ecb69fe96f3157bb5a350298248f8650b9092a8c55028fb577463",
            ),
        ];
        for (ikm, expected) in cases.iter() {
            let ikm = hex::decode(ikm).unwrap();
            let sk = SecretKey::<MinPk>::key_gen(&ikm, &[]).expect("Enough key material.");
            assert_eq!(hex::encode(sk.to_bytes()), *expected);
        }
        assert_eq!(
            SecretKey::<MinPk>::key_gen(&[0u8; 31], &[]),
            Err(AggregateSigError::InsufficientKeyMaterial { min: 32, actual: 31 })
        );
        let a = SecretKey::<MinPk>::key_gen(&[1u8; 32], b"").unwrap();
        let b = SecretKey::<MinPk>::key_gen(&[1u8; 32], b"info").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_key_encoding() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        let sk = SecretKey::<MinSig>::generate(&mut rng);
        assert_eq!(SecretKey::from_bytes(&sk.to_bytes()), Ok(sk.clone()));
        assert_eq!(serialize_deserialize(&sk).expect("Valid encoding."), sk);
        assert!(SecretKey::<MinSig>::from_bytes(&[0u8; 32]).is_err());
        assert!(SecretKey::<MinSig>::from_bytes(&[0xffu8; 32]).is_err());
        assert!(SecretKey::<MinSig>::from_bytes(&[1u8; 31]).is_err());

        let mut erased = sk.clone();
        erased.zeroize();
        assert_eq!(erased.to_bytes(), [0u8; 32]);
        assert_ne!(erased, sk);
    }

    #[test]
    fn test_point_encodings() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        let sk = SecretKey::<MinPk>::generate(&mut rng);
        let pk = PublicKey::from_secret_key(&sk);
        let sig = sk.sign(b"m", MinPk::DST, HashMode::RandomOracle);
        assert_eq!(pk.to_bytes().len(), 48);
        assert_eq!(pk.serialize().len(), 96);
        assert_eq!(sig.to_bytes().len(), 96);
        assert_eq!(sig.serialize().len(), 192);
        assert_eq!(PublicKey::from_bytes(&pk.to_bytes()), Ok(pk));
        assert_eq!(PublicKey::from_bytes(&pk.serialize()), Ok(pk));
        assert_eq!(Signature::from_bytes(&sig.to_bytes()), Ok(sig));
        assert_eq!(Signature::from_bytes(&sig.serialize()), Ok(sig));
        assert!(PublicKey::<MinPk>::from_bytes(&sig.to_bytes()).is_err());
        assert_eq!(serialize_deserialize(&pk).expect("Valid encoding."), pk);
        assert_eq!(serialize_deserialize(&sig).expect("Valid encoding."), sig);

        let json = serde_json::to_string(&pk).expect("Serializable.");
        assert_eq!(json, format!("\"{}\"", hex::encode(pk.to_bytes())));
        let back: PublicKey<MinPk> = serde_json::from_str(&json).expect("Valid JSON.");
        assert_eq!(back, pk);
        let json = serde_json::to_string(&sig).expect("Serializable.");
        let back: Signature<MinPk> = serde_json::from_str(&json).expect("Valid JSON.");
        assert_eq!(back, sig);
    }

    fn compressed_inputs<S: SignatureScheme>(rng: &mut StdRng) {
        let sk = SecretKey::<S>::generate(rng);
        let pk = PublicKey::from_secret_key(&sk);
        let m = rng.gen::<[u8; 32]>();
        let sig = sk.sign(&m, S::DST, HashMode::RandomOracle);
        let (sig_bytes, pk_bytes) = (sig.to_bytes(), pk.to_bytes());
        assert!(verify_compressed::<S>(&sig_bytes, &pk_bytes, &m, S::DST, HashMode::RandomOracle));
        assert!(!verify_compressed::<S>(&sig_bytes, &pk_bytes, b"other", S::DST, HashMode::RandomOracle));
        // swapped arguments are the wrong lengths
        assert!(!verify_compressed::<S>(&pk_bytes, &sig_bytes, &m, S::DST, HashMode::RandomOracle));

        assert!(!verify_compressed::<S>(&[], &pk_bytes, &m, S::DST, HashMode::RandomOracle));
        assert!(!verify_compressed::<S>(&sig_bytes, &[], &m, S::DST, HashMode::RandomOracle));
        assert!(!verify_compressed::<S>(
            &sig_bytes[..sig_bytes.len() - 1],
            &pk_bytes,
            &m,
            S::DST,
            HashMode::RandomOracle
        ));
        assert!(!verify_compressed::<S>(
            &sig_bytes,
            &pk_bytes[..pk_bytes.len() - 1],
            &m,
            S::DST,
            HashMode::RandomOracle
        ));
        // the uncompressed encodings are not accepted
        assert!(!verify_compressed::<S>(&sig.serialize(), &pk_bytes, &m, S::DST, HashMode::RandomOracle));

        // the canonical encodings of infinity decode, but do not verify
        let mut sig_inf = vec![0u8; sig_bytes.len()];
        sig_inf[0] = 0xc0;
        let mut pk_inf = vec![0u8; pk_bytes.len()];
        pk_inf[0] = 0xc0;
        assert!(!verify_compressed::<S>(&sig_inf, &pk_bytes, &m, S::DST, HashMode::RandomOracle));
        assert!(!verify_compressed::<S>(&sig_bytes, &pk_inf, &m, S::DST, HashMode::RandomOracle));
        assert!(!verify_compressed::<S>(&sig_inf, &pk_inf, &m, S::DST, HashMode::RandomOracle));

        // without the compression flag, or with infinity and a sign
        let mut bad = sig_bytes.clone();
        bad[0] &= 0x7f;
        assert!(!verify_compressed::<S>(&bad, &pk_bytes, &m, S::DST, HashMode::RandomOracle));
        let mut bad = pk_bytes.clone();
        bad[0] &= 0x7f;
        assert!(!verify_compressed::<S>(&sig_bytes, &bad, &m, S::DST, HashMode::RandomOracle));
        let mut bad = pk_inf.clone();
        bad[0] = 0xe0;
        assert!(!verify_compressed::<S>(&sig_bytes, &bad, &m, S::DST, HashMode::RandomOracle));
    }

    #[test]
    fn test_verify_compressed() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        compressed_inputs::<MinPk>(&mut rng);
        compressed_inputs::<MinSig>(&mut rng);
    }

    #[test]
    fn test_erased_key_signs_identity() {
        let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
        let mut sk = SecretKey::<MinPk>::generate(&mut rng);
        let kept = sk.clone();
        sk.zeroize();
        // signing and key derivation read the erased scalar, not a copy of it
        assert!(bool::from(sk.sign(b"m", MinPk::DST, HashMode::RandomOracle).point().is_identity()));
        assert!(bool::from(PublicKey::from_secret_key(&sk).point().is_identity()));
        let sig = kept.sign(b"m", MinPk::DST, HashMode::RandomOracle);
        assert!(sig.verify(false, &PublicKey::from_secret_key(&kept), false, b"m", MinPk::DST, HashMode::RandomOracle));
        // decoding rejects a zero key
        assert_eq!(SecretKey::<MinPk>::from_bytes(&[0u8; 32]), Err(AggregateSigError::InvalidSecretKey));
        assert_eq!(SecretKey::<MinPk>::from_bytes(&kept.to_bytes()), Ok(kept));
    }
}
