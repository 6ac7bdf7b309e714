use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fairplay_types::VrfSecretKey;

fn prove_bench(c: &mut Criterion) {
    let kp = fairplay_vrf::keypair_from_secret(VrfSecretKey([42u8; 32]));
    let alpha = [7u8; 64];

    c.bench_function("ecvrf_prove_64B", |b| {
        b.iter(|| fairplay_vrf::prove(&kp.secret, black_box(&alpha)))
    });
}

fn verify_bench(c: &mut Criterion) {
    let kp = fairplay_vrf::keypair_from_secret(VrfSecretKey([42u8; 32]));
    let alpha = [7u8; 64];
    let out = fairplay_vrf::prove(&kp.secret, &alpha).unwrap();

    c.bench_function("ecvrf_verify_64B", |b| {
        b.iter(|| fairplay_vrf::verify(&kp.public, black_box(&out.proof), &alpha))
    });
}

fn select_bench(c: &mut Criterion) {
    let weights: Vec<f64> = (1..=100).map(f64::from).collect();
    let seed = [0x3cu8; 32];

    c.bench_function("select_10_of_100", |b| {
        b.iter(|| fairplay_vrf::select_winners(black_box(&weights), 10, &seed))
    });
}

fn keypair_generation_bench(c: &mut Criterion) {
    c.bench_function("vrf_keypair_generate", |b| {
        b.iter(fairplay_vrf::generate_keypair)
    });
}

criterion_group!(
    benches,
    prove_bench,
    verify_bench,
    select_bench,
    keypair_generation_bench
);
criterion_main!(benches);
