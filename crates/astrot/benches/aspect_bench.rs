use criterion::{black_box, criterion_group, criterion_main, Criterion};
use astrot::aspects::{AspectCalculator, AspectSettings};
use astrot::chart::BodyPosition;
use astrot::position::Placement;
use astrot::zodiac::{House, ALL_BODIES};

fn bench_calculate_aspect(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| {
            calculator.calculate_aspect(
                black_box(100.0),
                black_box(102.0),
                black_box(1.0),
                black_box(13.0),
                black_box(&settings),
            )
        })
    });
}

fn bench_natal_aspects(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    let positions: Vec<BodyPosition> = ALL_BODIES
        .iter()
        .enumerate()
        .map(|(i, &body)| {
            let placement = Placement::from_longitude(i as f64 * 37.5);
            BodyPosition {
                body,
                sign: placement.sign,
                degree: placement.degree,
                house: House::from_index(i % 12),
                retrograde: false,
                longitude: placement.longitude,
                speed: 1.0 - i as f64 * 0.1,
            }
        })
        .collect();

    c.bench_function("natal_aspects", |b| {
        b.iter(|| calculator.natal_aspects(black_box(&positions), black_box(&settings)))
    });
}

criterion_group!(benches, bench_calculate_aspect, bench_natal_aspects);
criterion_main!(benches);
