use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fairseed::games::{CrashParams, DiceParams, MinesParams, PlinkoParams};
use fairseed::{generate_outcome, verify_bet, GameParams, SeedTriple};

fn bench_generators(c: &mut Criterion) {
    let seed = [7u8; 32];
    let games = [
        ("dice", GameParams::Dice(DiceParams { target: 49.5, is_over: true })),
        ("crash", GameParams::Crash(CrashParams::default())),
        ("mines_24", GameParams::Mines(MinesParams::new(24))),
        ("plinko_16", GameParams::Plinko(PlinkoParams { rows: 16 })),
    ];

    let mut group = c.benchmark_group("generate_outcome");
    for (name, params) in games {
        let mut nonce = 0u64;
        group.bench_function(name, |b| {
            b.iter(|| {
                nonce += 1;
                generate_outcome(SeedTriple::new(&seed, "bench", black_box(nonce)), &params)
            })
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let seed = [7u8; 32];
    let params = GameParams::Mines(MinesParams::new(5));
    let outcome = generate_outcome(SeedTriple::new(&seed, "bench", 1), &params).unwrap();
    let seed_hex = hex::encode(seed);
    let seed_hash = fairseed::sha256_hex(&seed);

    c.bench_function("verify_mines", |b| {
        b.iter(|| verify_bet(&seed_hex, &seed_hash, "bench", 1, &params, black_box(&outcome)))
    });
}

criterion_group!(benches, bench_generators, bench_verify);
criterion_main!(benches);
