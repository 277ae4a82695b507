//! Benchmarks for decoding full "Data Out" datagrams
//!
//! Tests decode performance for:
//! - Whole Motorsport and Horizon packets through the schema
//! - Single typed field extraction via `FieldData`
//! - Snapshot and CSV row rendering of a decoded frame
//!
//! Platform: Cross-platform (packets built in memory, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use forza_telemetry::sinks::csv;
use forza_telemetry::test_utils::{PacketBuilder, motorsport_driving_packet};
use forza_telemetry::{FieldData, PacketFormat, PacketSchema, Value, decode};
use std::hint::black_box;

fn horizon_driving_packet(schema: &PacketSchema) -> Vec<u8> {
    PacketBuilder::new(schema)
        .set("CurrentEngineRpm", Value::Float32(5200.0))
        .set("Speed", Value::Float32(38.0))
        .set("Power", Value::Float32(180_000.0))
        .set("Gear", Value::Unsigned8(3))
        .build()
}

fn bench_full_packet(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_packet");

    for format in [PacketFormat::Motorsport, PacketFormat::Horizon] {
        let schema = format.schema().expect("bundled format should parse");
        let packet = match format {
            PacketFormat::Motorsport => motorsport_driving_packet(&schema),
            PacketFormat::Horizon => horizon_driving_packet(&schema),
        };

        group.throughput(Throughput::Bytes(packet.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", format), &packet, |b, packet| {
            b.iter(|| black_box(decode(&schema, black_box(packet)).unwrap()))
        });
    }

    group.finish();
}

fn bench_field_extraction(c: &mut Criterion) {
    let schema = PacketFormat::Motorsport.schema().expect("bundled format should parse");
    let packet = motorsport_driving_packet(&schema);

    let mut group = c.benchmark_group("field_extraction");

    if let Some(rpm) = schema.get_field("CurrentEngineRpm") {
        group.bench_function("f32_rpm", |b| {
            b.iter(|| black_box(f32::from_bytes(&packet, rpm).unwrap()))
        });
    }

    if let Some(gear) = schema.get_field("Gear") {
        group.bench_function("u8_gear", |b| b.iter(|| black_box(u8::from_bytes(&packet, gear).unwrap())));
    }

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let schema = PacketFormat::Motorsport.schema().expect("bundled format should parse");
    let frame = decode(&schema, &motorsport_driving_packet(&schema)).expect("packet should decode");

    let mut group = c.benchmark_group("rendering");

    group.bench_function("snapshot", |b| b.iter(|| black_box(frame.to_snapshot().unwrap())));
    group.bench_function("csv_row", |b| b.iter(|| black_box(csv::row(&schema, &frame))));

    group.finish();
}

criterion_group!(benches, bench_full_packet, bench_field_extraction, bench_rendering);
criterion_main!(benches);
