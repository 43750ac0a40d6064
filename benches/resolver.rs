use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motormart::resolver::{resolve, CategoricalVocabulary};

fn synthetic_vocab(n: usize) -> CategoricalVocabulary {
    let values: Vec<String> = (0..n).map(|i| format!("model-{i:04}")).collect();
    CategoricalVocabulary::new("model", values)
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    for n in [100usize, 1000, 5000] {
        let vocab = synthetic_vocab(n);

        // Exact hit: hash lookup, independent of vocabulary size.
        group.bench_function(format!("exact/{n}"), |b| {
            b.iter(|| resolve(black_box("model-0042"), &vocab))
        });

        // Worst case: full scan ending in the alias table.
        group.bench_function(format!("miss/{n}"), |b| {
            b.iter(|| resolve(black_box("zzzzzzzz"), &vocab))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
