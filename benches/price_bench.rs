use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use tarif::*;

fn build_price(modifiers: usize) -> Price {
    let mut price = Price::of_minor(1850, "EUR").unwrap();
    price.set_units(dec!(1.476)).unwrap().set_vat(21).unwrap();

    for i in 0..modifiers {
        let modifier = Modifier::new()
            .with_key(format!("m{i}"))
            .with_post_vat(i % 5 == 4);
        let modifier = if i % 2 == 0 {
            modifier.add(25)
        } else {
            modifier.subtract(10).multiply(dec!(1.01))
        };
        price.add_modifier("bench", modifier).unwrap();
    }

    price
}

// ── Pipeline ───────────────────────────────────────────────────────

fn bench_inclusive_cold(c: &mut Criterion) {
    let price = build_price(10);
    c.bench_function("inclusive_cold_10_modifiers", |b| {
        b.iter_batched(
            || price.clone(),
            |price| black_box(price.inclusive(false).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_inclusive_cold_1000(c: &mut Criterion) {
    let price = build_price(1000);
    c.bench_function("inclusive_cold_1000_modifiers", |b| {
        b.iter_batched(
            || price.clone(),
            |price| black_box(price.inclusive(false).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_inclusive_warm(c: &mut Criterion) {
    let price = build_price(10);
    price.inclusive(false).unwrap();
    c.bench_function("inclusive_warm_10_modifiers", |b| {
        b.iter(|| black_box(price.inclusive(false).unwrap()));
    });
}

fn bench_ledger(c: &mut Criterion) {
    let price = build_price(100);
    c.bench_function("modifications_100", |b| {
        b.iter_batched(
            || price.clone(),
            |price| black_box(price.modifications(false, Some("bench")).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

// ── Helpers ────────────────────────────────────────────────────────

fn bench_per_unit_split(c: &mut Criterion) {
    let price = build_price(0).with_units(dec!(997.5)).unwrap();
    let total = Money::of_minor(123_456_789, price.currency());
    c.bench_function("per_unit_split_997_units", |b| {
        b.iter(|| black_box(price.per_unit(black_box(&total)).unwrap()));
    });
}

fn bench_parse_units(c: &mut Criterion) {
    c.bench_function("parse_units_string", |b| {
        b.iter(|| black_box(parse_decimal(black_box("1 234,567"))));
    });
}

criterion_group!(
    benches,
    bench_inclusive_cold,
    bench_inclusive_cold_1000,
    bench_inclusive_warm,
    bench_ledger,
    bench_per_unit_split,
    bench_parse_units,
);
criterion_main!(benches);
