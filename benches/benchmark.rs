use criterion::{criterion_group, criterion_main, Criterion};
use nist_pqc_seeded_rng::{NistPqcAes256CtrRng, RngCore, Seed, SeedableRng};

use rpicnic::api;
use rpicnic::keygen::{keygen, PublicKey, SecretKey};
use rpicnic::lowmc::{LowmcInstance, ParameterSet};
use rpicnic::signature::SignConfig;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = NistPqcAes256CtrRng::from_seed(Seed::default());

    // The cipher tables are expanded once per api call, so their cost is
    // measured separately from the passes that use them.
    c.bench_function("instance_generation", |b| {
        b.iter(|| LowmcInstance::generate(ParameterSet::Picnic3L1))
    });

    let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
    c.bench_function("keygen", |b| b.iter(|| keygen_bench(&instance, &mut rng)));

    let (pk, sk) = keygen(&instance, &mut rng);
    let message: Vec<u8> = vec![1, 2, 3, 4];
    let config = SignConfig::default();

    c.bench_function("signing", |b| {
        b.iter(|| signing_bench(&sk, &message, &config, &mut rng))
    });

    let signature = api::sign_with_rng(&sk, &message, &config, &mut rng).unwrap();
    c.bench_function("verification", |b| {
        b.iter(|| verification_bench(&pk, &message, &signature))
    });
}

fn keygen_bench(instance: &LowmcInstance, rng: &mut NistPqcAes256CtrRng) {
    let _keys = keygen(instance, rng);
}

fn signing_bench(sk: &SecretKey, message: &[u8], config: &SignConfig, rng: &mut NistPqcAes256CtrRng) {
    let _signature = api::sign_with_rng(sk, message, config, rng);
}

fn verification_bench(pk: &PublicKey, message: &[u8], signature: &[u8]) {
    let _verification = api::verify(pk, message, signature);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
