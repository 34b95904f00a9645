use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::time::Duration;

use partsledger_api::entities::inventory_movement::MovementKind;
use partsledger_api::services::sequences::format_document_number;

fn sample_ledger(len: usize) -> Vec<(MovementKind, Decimal)> {
    // alternate inbound and outbound so the fold sees both signs
    (0..len)
        .map(|i| {
            let kind = if i % 3 == 0 {
                MovementKind::Entry
            } else if i % 3 == 1 {
                MovementKind::Exit
            } else {
                MovementKind::AdjustmentIncrease
            };
            (kind, Decimal::new((i % 50 + 1) as i64, 1))
        })
        .collect()
}

// Benchmark for the stock fold at growing ledger sizes
fn stock_fold_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stock_fold");

    for size in [100usize, 1_000, 10_000].iter() {
        let ledger = sample_ledger(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| {
                let total: Decimal = ledger
                    .iter()
                    .map(|(kind, quantity)| Decimal::from(kind.sign()) * *quantity)
                    .sum();
                black_box(total)
            });
        });
    }

    group.finish();
}

// Benchmark for the kardex running-balance pass
fn kardex_running_balance_benchmark(c: &mut Criterion) {
    let ledger = sample_ledger(10_000);

    c.bench_function("kardex_running_balance_10k", |b| {
        b.iter(|| {
            let mut balance = Decimal::ZERO;
            let rows: Vec<(Decimal, Decimal)> = ledger
                .iter()
                .map(|(kind, quantity)| {
                    let signed = Decimal::from(kind.sign()) * *quantity;
                    balance += signed;
                    (signed, balance)
                })
                .collect();
            black_box(rows)
        });
    });
}

// Benchmark for document number formatting
fn document_number_benchmark(c: &mut Criterion) {
    c.bench_function("format_document_number", |b| {
        let mut value = 0i64;
        b.iter(|| {
            value += 1;
            black_box(format_document_number("REM", value))
        });
    });
}

// Benchmark for JSON handling of a movement payload
fn movement_json_benchmark(c: &mut Criterion) {
    use serde_json::json;

    let payload = json!({
        "kind": "EXIT",
        "origin": "SERVICE_ORDER_CONSUMPTION",
        "component_id": "550e8400-e29b-41d4-a716-446655440000",
        "quantity": "4.5",
        "service_order_id": "123e4567-e89b-12d3-a456-426614174000",
        "performed_by": "technician-7",
    });

    c.bench_function("movement_json_serialize", |b| {
        b.iter(|| {
            let serialized = serde_json::to_string(&payload).unwrap();
            black_box(serialized)
        });
    });

    c.bench_function("movement_json_deserialize", |b| {
        let serialized = serde_json::to_string(&payload).unwrap();
        b.iter(|| {
            let deserialized: serde_json::Value = serde_json::from_str(&serialized).unwrap();
            black_box(deserialized)
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets =
        stock_fold_benchmark,
        kardex_running_balance_benchmark,
        document_number_benchmark,
        movement_json_benchmark
}

criterion_main!(benches);
