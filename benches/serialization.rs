use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use serde_tomlw::{encode, to_string, to_value, Encoder, EncodeOptions};

#[derive(Serialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Clone)]
struct Catalog {
    title: String,
    products: Vec<Product>,
}

#[derive(Serialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn catalog(size: u32) -> Catalog {
    Catalog {
        title: "bench".to_string(),
        products: (0..size)
            .map(|i| Product {
                sku: format!("SKU{}", i),
                name: format!("Product {}", i),
                price: 9.99 + f64::from(i),
                quantity: i,
            })
            .collect(),
    }
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_array_of_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_of_tables");

    for size in [10, 50, 100, 500].iter() {
        let data = catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&data)))
        });
    }
    group.finish();
}

fn benchmark_serialize_nested(c: &mut Criterion) {
    let data = NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    };

    c.bench_function("serialize_nested_struct", |b| {
        b.iter(|| to_string(black_box(&data)))
    });
}

fn benchmark_pipeline_stages(c: &mut Criterion) {
    let data = catalog(100);
    let value = to_value(&data).unwrap();
    let encoder = Encoder::new();

    let mut group = c.benchmark_group("stages");
    group.bench_function("to_value", |b| b.iter(|| to_value(black_box(&data))));
    group.bench_function("encode_value", |b| b.iter(|| encode(black_box(&value))));
    group.bench_function("encode_reused_encoder", |b| {
        b.iter(|| encoder.encode(black_box(&value)))
    });
    group.finish();
}

fn benchmark_string_styles(c: &mut Criterion) {
    #[derive(Serialize)]
    struct Texts {
        short: &'static str,
        escaped: &'static str,
        multiline: &'static str,
    }

    let texts = Texts {
        short: "short",
        escaped: "C:\\Program Files\\\"quoted\"\\tab\there",
        multiline: "line one\nline two\nline three\n",
    };

    let mut group = c.benchmark_group("string_styles");
    for (name, options) in [
        ("basic", EncodeOptions::new()),
        ("literal", EncodeOptions::new().with_literal_strings(true)),
        ("multiline", EncodeOptions::new().with_multiline_strings(true)),
    ] {
        let encoder = Encoder::new().with_options(options);
        group.bench_function(name, |b| b.iter(|| encoder.serialize(black_box(&texts))));
    }
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let data = catalog(50);

    let mut group = c.benchmark_group("comparison");

    group.bench_function("tomlw_serialize", |b| {
        b.iter(|| serde_tomlw::to_string(black_box(&data)))
    });

    group.bench_function("toml_serialize", |b| {
        b.iter(|| toml::to_string(black_box(&data)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&data)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_array_of_tables,
    benchmark_serialize_nested,
    benchmark_pipeline_stages,
    benchmark_string_styles,
    benchmark_comparison_with_json
);
criterion_main!(benches);
