use chub_vault::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const MASTER_KEY: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

fn bench_encrypt_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_cipher");
    group.sample_size(20);

    let plain = FieldCipher::new(MASTER_KEY).unwrap();
    let cached = FieldCipher::builder().master_key(MASTER_KEY).unwrap().key_cache(1024).build().unwrap();

    let inputs = [("cpf", "123.456.789-00".to_owned()), ("note_1KB", "x".repeat(1024))];

    for (label, text) in &inputs {
        group.bench_with_input(BenchmarkId::new("encrypt", label), text, |b, t| {
            b.iter(|| plain.encrypt(t.as_str(), "bench-tenant").unwrap());
        });

        let stored = plain.encrypt(text.as_str(), "bench-tenant").unwrap().unwrap().to_string();

        group.bench_with_input(BenchmarkId::new("decrypt", label), &stored, |b, s| {
            b.iter(|| plain.decrypt(s.as_str(), "bench-tenant").unwrap());
        });

        group.bench_with_input(BenchmarkId::new("decrypt_cached", label), &stored, |b, s| {
            b.iter(|| cached.decrypt(s.as_str(), "bench-tenant").unwrap());
        });
    }

    group.bench_function("is_encrypted", |b| {
        let stored = plain.encrypt("123.456.789-00", "bench-tenant").unwrap().unwrap().to_string();
        b.iter(|| is_encrypted(&stored));
    });

    group.finish();
}

criterion_group!(benches, bench_encrypt_decrypt);
criterion_main!(benches);
