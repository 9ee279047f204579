#[macro_use]
extern crate criterion;

use bls12_381_engine::{curve_arithmetic::*, parallel::ExecutionContext};
use criterion::Criterion;
use rand::*;

pub fn bench_multiexp(c: &mut Criterion) {
    let mut csprng = thread_rng();
    let ctx = ExecutionContext::sequential();
    let m = 10;
    let ns = (1..=m).map(|x| x * x);
    let mut gs = Vec::with_capacity(m * m);
    let mut es = Vec::with_capacity(m * m);
    for _ in 0..(m * m) {
        gs.push(G1Projective::random(&mut csprng).to_affine());
        es.push(Scalar::random(&mut csprng));
    }

    for i in ns {
        let gsc = gs[..i].to_vec();
        let esc = es[..i].to_vec();
        let mut group = c.benchmark_group(format!("Group({})", i));
        group.bench_function("Baseline", move |b| {
            b.iter(|| {
                let mut a = G1Projective::identity();
                for (g, e) in gsc.iter().zip(esc.iter()) {
                    a = a.add(&g.to_projective().mul(e))
                }
                a
            })
        });
        for w in 2..=8 {
            let gsc = gs[..i].to_vec();
            let esc = es[..i].to_vec();
            let ctx = &ctx;
            group.bench_function(format!("multiexp({})", w), move |b| {
                b.iter(|| multiexp_with_window(ctx, &gsc, &esc, w))
            });
        }
        group.finish();
    }
}

pub fn bench_large_multiexp(c: &mut Criterion) {
    let mut csprng = thread_rng();
    let n = 4096;
    let gs: Vec<G2Affine> = (0..n).map(|_| G2Projective::random(&mut csprng).to_affine()).collect();
    let es: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut csprng)).collect();
    let sequential = ExecutionContext::sequential();
    let parallel = ExecutionContext::default();
    let mut group = c.benchmark_group(format!("G2 multiexp({})", n));
    group.sample_size(10);
    group.bench_function("sequential", |b| b.iter(|| multiexp(&sequential, &gs, &es)));
    group.bench_function("parallel", |b| b.iter(|| multiexp(&parallel, &gs, &es)));
    group.finish();
}

criterion_group!(multiexp_benchmarks, bench_multiexp, bench_large_multiexp);
criterion_main!(multiexp_benchmarks);
