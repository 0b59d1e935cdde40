use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stb_bench::gen_cases;
use stb_core::{DicePolicy, FlapStrategy};
use stb_engine::{dice_sum_distribution, DecisionEngine, EngineSettings};

fn bench_choose_flaps(c: &mut Criterion) {
    let engine = DecisionEngine::new(EngineSettings::default()).unwrap();
    let cases = gen_cases(1024, 9);
    let mut g = c.benchmark_group("stb_engine_choose_flaps");
    for strategy in [
        FlapStrategy::Highest,
        FlapStrategy::Lowest,
        FlapStrategy::NextRollProbability,
    ] {
        g.bench_with_input(
            BenchmarkId::new(strategy.name(), cases.len()),
            &cases,
            |b, s| {
                b.iter(|| {
                    for &(open, total) in s.iter() {
                        black_box(
                            engine
                                .choose_flaps(
                                    strategy,
                                    black_box(open),
                                    black_box(total),
                                    DicePolicy::OneIfPossible,
                                )
                                .unwrap(),
                        );
                    }
                })
            },
        );
    }
    g.finish();
}

fn bench_distribution(c: &mut Criterion) {
    let mut g = c.benchmark_group("stb_engine_distribution");
    for n in [2u8, 4, 6] {
        g.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(dice_sum_distribution(black_box(n))))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_choose_flaps, bench_distribution);
criterion_main!(benches);
