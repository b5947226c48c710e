use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seqdump::{from_str, to_string_with_options, to_value, DumpOptions, Nested};

fn generator_output(batches: usize, width: usize) -> Vec<Vec<f32>> {
    (0..batches)
        .map(|b| (0..width).map(|i| ((b * width + i) % 65_536) as f32).collect())
        .collect()
}

fn benchmark_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for batches in [10, 100, 1000].iter() {
        let value: Nested = to_value(&generator_output(*batches, 64)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(batches), &value, |b, value| {
            b.iter(|| black_box(value).flatten())
        });
    }
    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let output = generator_output(100, 64);

    let modes = [
        ("hex16", DumpOptions::hex16()),
        ("binary16", DumpOptions::binary(16)),
        ("float32", DumpOptions::float32()),
        ("float32_concatenated", DumpOptions::float32().concatenated()),
    ];

    for (name, options) in modes.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| to_string_with_options(black_box(&output), options))
        });
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let output = generator_output(100, 64);

    for options in [DumpOptions::hex16(), DumpOptions::binary(16), DumpOptions::float32()] {
        let dump = to_string_with_options(&output, &options).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(options.encoding),
            &dump,
            |b, dump| b.iter(|| from_str(black_box(dump), &options)),
        );
    }
    group.finish();
}

fn benchmark_deep_nesting(c: &mut Criterion) {
    let mut value = Nested::Leaf(1.0);
    for _ in 0..1000 {
        value = Nested::Seq(vec![value, Nested::Leaf(0.5)]);
    }

    c.bench_function("flatten_deep", |b| b.iter(|| black_box(&value).leaf_count()));
}

criterion_group!(
    benches,
    benchmark_flatten,
    benchmark_encode,
    benchmark_decode,
    benchmark_deep_nesting
);
criterion_main!(benches);
