#[macro_use]
extern crate criterion;

use bls12_381_engine::{aggregate_sig::*, parallel::ExecutionContext};
use criterion::Criterion;
use rand::{thread_rng, Rng};

macro_rules! rand_m_of_length {
    ($length:expr, $rng:expr) => {{
        let mut m: Vec<u8> = Vec::with_capacity($length);
        for _ in 0..$length {
            m.push($rng.gen::<u8>());
        }
        m
    }};
}

macro_rules! get_sks_pks {
    ($amt:expr, $rng:expr) => {{
        let sks: Vec<SecretKey<MinPk>> = (0..$amt).map(|_| SecretKey::<MinPk>::generate(&mut $rng)).collect();

        let pks: Vec<PublicKey<MinPk>> = sks.iter().map(PublicKey::<MinPk>::from_secret_key).collect();

        (sks, pks)
    }};
}

fn bench_sign_and_verify(c: &mut Criterion) {
    let mut csprng = thread_rng();
    let m = rand_m_of_length!(1000, csprng);
    let m_clone = m.clone();

    let sk = SecretKey::<MinPk>::generate(&mut csprng);
    let pk = PublicKey::<MinPk>::from_secret_key(&sk);
    let sig = sk.sign(&m, MinPk::DST, HashMode::RandomOracle);
    c.bench_function("sign", move |b| {
        b.iter(|| sk.sign(&m, MinPk::DST, HashMode::RandomOracle))
    });
    c.bench_function("verify", move |b| {
        b.iter(|| sig.verify(false, &pk, false, &m_clone, MinPk::DST, HashMode::RandomOracle))
    });
}

fn bench_aggregate_sig(c: &mut Criterion) {
    let mut csprng = thread_rng();
    let ctx = ExecutionContext::default();
    let n = 1000;
    let (sks, _) = get_sks_pks!(n, csprng);
    let sigs: Vec<Signature<MinPk>> = sks
        .iter()
        .map(|sk| sk.sign(b"block", MinPk::DST, HashMode::RandomOracle))
        .collect();
    let encoded: Vec<Vec<u8>> = sigs.iter().map(Signature::to_bytes).collect();

    let mut group = c.benchmark_group(format!("aggregate({})", n));
    group.bench_function("decoded", |b| b.iter(|| AggregateSignature::aggregate(&ctx, &sigs, false)));
    group.bench_function("compressed", |b| {
        b.iter(|| AggregateSignature::<MinPk>::aggregate_compressed(&ctx, &encoded, false))
    });
    group.finish();
}

fn bench_verify_aggregate_sig(c: &mut Criterion) {
    let mut csprng = thread_rng();
    let ctx = ExecutionContext::default();
    let n = 200;
    let (sks, pks) = get_sks_pks!(n, csprng);

    let ms: Vec<Vec<u8>> = (0..n).map(|_| rand_m_of_length!(1000, csprng)).collect();
    let msgs: Vec<&[u8]> = ms.iter().map(|m| m.as_slice()).collect();
    let sigs: Vec<Signature<MinPk>> = sks
        .iter()
        .zip(msgs.iter())
        .map(|(sk, m)| sk.sign(m, MinPk::DST, HashMode::RandomOracle))
        .collect();
    let agg_sig = AggregateSignature::aggregate(&ctx, &sigs, false)
        .expect("Signatures are valid.")
        .to_signature();

    let mut group = c.benchmark_group(format!("verify({})", n));
    group.sample_size(10);
    group.bench_function("aggregate_verify", |b| {
        b.iter(|| aggregate_verify(&ctx, &agg_sig, false, &pks, false, &msgs, MinPk::DST))
    });
    group.bench_function("multiple_aggregate_verify", |b| {
        let mut rng = thread_rng();
        b.iter(|| multiple_aggregate_verify(&ctx, &sigs, false, &pks, false, &msgs, MinPk::DST, &mut rng, 64))
    });
    let same: Vec<Signature<MinPk>> = sks
        .iter()
        .map(|sk| sk.sign(b"block", MinPk::DST, HashMode::RandomOracle))
        .collect();
    let same_agg = AggregateSignature::aggregate(&ctx, &same, false)
        .expect("Signatures are valid.")
        .to_signature();
    group.bench_function("fast_aggregate_verify", |b| {
        b.iter(|| fast_aggregate_verify(&ctx, &same_agg, false, &pks, false, b"block", MinPk::DST))
    });
    group.finish();
}

criterion_group!(sign_and_verify, bench_sign_and_verify);
criterion_group!(aggregate, bench_aggregate_sig, bench_verify_aggregate_sig);
criterion_main!(sign_and_verify, aggregate);
