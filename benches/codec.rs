use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use goon::{decode, decode_typed, encode, record, Encode, Registry};

#[derive(Debug, Clone, Default, PartialEq)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
    tags: Vec<String>,
}

record! {
    Product as "Product" in "bench" {
        "Sku" => sku,
        "Name" => name,
        "Price" => price,
        "Quantity" => quantity,
        "Tags" => tags,
    }
}

fn products(size: u32) -> Vec<Option<Product>> {
    (0..size)
        .map(|i| {
            Some(Product {
                sku: format!("SKU{}", i),
                name: format!("Product {}", i),
                price: 9.99 + f64::from(i),
                quantity: i,
                tags: vec!["a".to_string(), "b".to_string()],
            })
        })
        .collect()
}

fn benchmark_encode_simple(c: &mut Criterion) {
    let product = products(1).remove(0);

    c.bench_function("encode_simple_record", |b| {
        b.iter(|| encode([("p", black_box(&product) as &dyn Encode)], "bench"))
    });
}

fn benchmark_encode_seq(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_seq");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| encode([("ps", black_box(&products) as &dyn Encode)], "bench"))
        });
    }
    group.finish();
}

fn benchmark_decode_seq(c: &mut Criterion) {
    let registry = Registry::new().with::<Product>();
    let mut typed = c.benchmark_group("decode_seq_typed");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);
        let text = encode([("ps", &products as &dyn Encode)], "bench").unwrap();
        typed.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| decode_typed("bench.goon", black_box(&text), &registry))
        });
    }
    typed.finish();

    let mut untyped = c.benchmark_group("decode_seq_untyped");
    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);
        let text = encode([("ps", &products as &dyn Encode)], "bench").unwrap();
        untyped.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| decode("bench.goon", black_box(&text)))
        });
    }
    untyped.finish();
}

criterion_group!(
    benches,
    benchmark_encode_simple,
    benchmark_encode_seq,
    benchmark_decode_seq
);
criterion_main!(benches);
