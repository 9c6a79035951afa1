use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use strided_ndarray::{ElementKind, Ndarray};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize, kind: ElementKind) -> Ndarray {
    let values: Vec<f64> = (0..rows * cols)
        .map(|_| rng.random_range(-100.0..100.0))
        .collect();
    let mut a = Ndarray::from_values(values, kind);
    a.setshape(&[rows, cols]).unwrap();
    a
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    let mut rng = StdRng::seed_from_u64(0);
    for size in [64usize, 256] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let a = random_matrix(&mut rng, size, size, ElementKind::Float64);
        let b = random_matrix(&mut rng, size, size, ElementKind::Float64);
        let bt = b.swapaxes(0, 1).unwrap();

        group.bench_with_input(BenchmarkId::new("scalar", size), &size, |bench, _| {
            bench.iter(|| black_box(&a + 1.0));
        });
        group.bench_with_input(BenchmarkId::new("contiguous", size), &size, |bench, _| {
            bench.iter(|| black_box(a.add(&b).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("transposed", size), &size, |bench, _| {
            bench.iter(|| black_box(a.add(&bt).unwrap()));
        });
    }
    group.finish();
}

fn bench_astype(c: &mut Criterion) {
    let mut group = c.benchmark_group("astype");
    let mut rng = StdRng::seed_from_u64(1);
    let size = 256usize;
    let a = random_matrix(&mut rng, size, size, ElementKind::Float64);
    let at = a.swapaxes(0, 1).unwrap();
    group.throughput(Throughput::Elements((size * size) as u64));
    group.bench_function("f64_to_u8_clamped", |bench| {
        bench.iter(|| black_box(a.astype(ElementKind::Uint8Clamped)));
    });
    group.bench_function("transposed_copy", |bench| {
        bench.iter(|| black_box(at.copy()));
    });
    group.finish();
}

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    let mut rng = StdRng::seed_from_u64(2);
    for size in [16usize, 64] {
        let a = random_matrix(&mut rng, size, size, ElementKind::Float64);
        let b = random_matrix(&mut rng, size, size, ElementKind::Float64);
        group.bench_with_input(BenchmarkId::new("f64", size), &size, |bench, _| {
            bench.iter(|| black_box(a.matmul(&b).unwrap()));
        });

        let ai = random_matrix(&mut rng, size, size, ElementKind::Int32);
        let bi = random_matrix(&mut rng, size, size, ElementKind::Int32);
        group.bench_with_input(BenchmarkId::new("i32", size), &size, |bench, _| {
            bench.iter(|| black_box(ai.matmul(&bi).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_astype, bench_matmul);
criterion_main!(benches);
