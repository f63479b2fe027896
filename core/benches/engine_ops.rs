use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use stratamine_core::{LayerConfig, LayerEngine, LayerGenerator, LayerId, RandomLayerGenerator};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (size, mines) in [((16u8, 16u8), 40u16), ((64, 64), 640), ((128, 128), 2600)] {
        let config = LayerConfig::new(size, mines);
        group.bench_function(format!("{}x{}", size.0, size.1), |b| {
            b.iter(|| RandomLayerGenerator::new(black_box(7)).generate(config))
        });
    }
    group.finish();
}

fn bench_flood_reveal(c: &mut Criterion) {
    // single far-corner mine so one reveal floods nearly the whole board
    let config = LayerConfig::new((128, 128), 1);
    let layout = {
        let mut seed = 0;
        loop {
            let candidate = RandomLayerGenerator::new(seed).generate(config);
            if !candidate.contains_mine((0, 0)) && candidate.adjacent_mines((0, 0)) == 0 {
                break candidate;
            }
            seed += 1;
        }
    };

    c.bench_function("flood_reveal_128x128", |b| {
        b.iter_batched(
            || LayerEngine::new(LayerId(0), layout.clone()),
            |mut engine| {
                engine.reveal(black_box((0, 0)));
                engine
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_generate, bench_flood_reveal);
criterion_main!(benches);
