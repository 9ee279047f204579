//! End to end use of the scheme with keys in G2 and signatures in G1.
use bls12_381_engine::{
    aggregate_sig::*,
    curve_arithmetic::{Affine, G1Affine},
    parallel::ExecutionContext,
};
use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};

const IKM: &str = "93ad7e65dead052a083a910c8b728591464cca56605bb056edfe2b60a63c4899";
const PK: &str = "a1d1a2ccbf8002508561456c796c79e2be67ad4b7be1ea391449ee39ab61211956aa14dd860f6054825ed6654ecb9830172f188df7a65f0269a4b52def0f090f326fea08742e072f0d841c0e52eccdcaed74bdc64f308a593c2ae8714a3972ec";
const SIG_HELLO_FOO: &str = "a09011244b4b1327b42c47017b9193aea79a5203d83667de053ae2f919ee21d28c4d8d6e17ebdb53afae2ec031d025e1";
const P11: &str = "80803f0d09fec09a95f2ee7495323c15c162270c7cceaffa8566e941c66bcf206e72955d58b3b32e564de3209d672ca5";

fn init_logger() { let _ = env_logger::builder().is_test(true).try_init(); }

fn known_key() -> SecretKey<MinSig> {
    let ikm = hex::decode(IKM).unwrap();
    SecretKey::key_gen(&ikm, &[]).expect("Enough key material.")
}

#[test]
fn test_known_answers() {
    init_logger();
    let sk = known_key();
    let pk = PublicKey::from_secret_key(&sk);
    assert_eq!(hex::encode(pk.to_bytes()), PK);
    let sig = sk.sign(b"hello foo", MinSig::DST, HashMode::RandomOracle);
    assert_eq!(hex::encode(sig.to_bytes()), SIG_HELLO_FOO);
    assert!(sig.verify(false, &pk, false, b"hello foo", MinSig::DST, HashMode::RandomOracle));
    assert!(!sig.verify(false, &pk, false, b"hello bar!", MinSig::DST, HashMode::RandomOracle));

    let sig2 = Signature::<MinSig>::from_bytes(&hex::decode(SIG_HELLO_FOO).unwrap()).expect("Valid signature.");
    assert_eq!(sig2, sig);
    // keys of the other scheme are a different length
    assert!(PublicKey::<MinPk>::from_bytes(&hex::decode(PK).unwrap()).is_err());
}

#[test]
fn test_low_order_signature() {
    init_logger();
    let bytes = hex::decode(P11).unwrap();
    assert!(Signature::<MinSig>::from_bytes(&bytes).is_err());
    let sig = Signature::<MinSig>::from_point(G1Affine::from_compressed_unchecked(&bytes).expect("On the curve."));
    assert!(!sig.validate(false));
    let pk = PublicKey::from_secret_key(&known_key());
    assert!(!sig.verify(false, &pk, false, b"hello foo", MinSig::DST, HashMode::RandomOracle));

    let ctx = ExecutionContext::sequential();
    let good = known_key().sign(b"hello foo", MinSig::DST, HashMode::RandomOracle);
    assert_eq!(
        AggregateSignature::aggregate(&ctx, &[good, sig], false),
        Err(AggregateSigError::NotInSubgroup)
    );
    assert!(AggregateSignature::<MinSig>::aggregate_compressed(&ctx, &[good.to_bytes(), bytes], false).is_err());
}

#[test]
fn test_fast_aggregate() {
    init_logger();
    let mut rng: StdRng = SeedableRng::from_rng(thread_rng()).unwrap();
    let ctx = ExecutionContext::new(2).expect("Pool should build.");
    let msg = rng.gen::<[u8; 32]>();
    let sks: Vec<SecretKey<MinSig>> = (0..20).map(|_| SecretKey::generate(&mut rng)).collect();
    let pks: Vec<PublicKey<MinSig>> = sks.iter().map(PublicKey::from_secret_key).collect();
    let mut agg = AggregateSignature::<MinSig>::empty();
    for sk in sks.iter() {
        agg.add_signature(&sk.sign(&msg, MinSig::DST, HashMode::RandomOracle), false)
            .expect("Valid signature.");
    }
    let agg = agg.to_signature();
    assert!(fast_aggregate_verify(&ctx, &agg, false, &pks, false, &msg, MinSig::DST));
    assert!(!fast_aggregate_verify(&ctx, &agg, false, &pks[1..], false, &msg, MinSig::DST));

    // the same message under every key also passes the general check
    let msgs: Vec<&[u8]> = vec![&msg[..]; pks.len()];
    assert!(aggregate_verify(&ctx, &agg, false, &pks, false, &msgs, MinSig::DST));

    let identity_pks = vec![PublicKey::<MinSig>::from_point(Affine::identity()); 3];
    let identity_sig = Signature::<MinSig>::from_point(Affine::identity());
    assert!(!fast_aggregate_verify(&ctx, &identity_sig, false, &identity_pks, false, &msg, MinSig::DST));
}

#[test]
fn test_json_round_trip() {
    let sk = known_key();
    let pk = PublicKey::from_secret_key(&sk);
    let agg = AggregatePublicKey::aggregate(&ExecutionContext::sequential(), &[pk, pk], false).expect("Valid keys.");
    let json = serde_json::to_string(&agg).expect("Serializable.");
    let back: AggregatePublicKey<MinSig> = serde_json::from_str(&json).expect("Valid JSON.");
    assert_eq!(back, agg);
    assert!(serde_json::from_str::<PublicKey<MinSig>>("\"00\"").is_err());
}
