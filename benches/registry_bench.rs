//! Performance benchmarks for sensor registration.
//!
//! Registration runs three schema passes, an unknown-field scan and a linear
//! conflict scan over the sensors of the same kind. These benchmarks measure
//! each part and the full `add` path as the registry grows.
//!
//! # Run Benchmarks
//!
//! ```sh
//! # Run all registry benchmarks
//! cargo bench --bench registry_bench
//!
//! # Run one group
//! cargo bench --bench registry_bench -- schema_validation
//!
//! # Compare against a saved baseline
//! cargo bench --bench registry_bench -- --save-baseline before
//! cargo bench --bench registry_bench -- --baseline before
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sensorhub_core::SensorKind;
use sensorhub_registry::registry::{parse_config, validate_config};
use sensorhub_registry::schema::{self, BASE_SCHEMA, Schema};
use sensorhub_registry::{RegistryConfig, SensorRegistry};
use std::hint::black_box;

const I2C_CONFIG: &str = r#"{"sensor_type": "i2c", "bus_no": 2, "i2c_addr": 78,
    "dev_name": "BM280", "alias": "RHT-sensor1"}"#;

const SPI_CONFIG: &str = r#"{"sensor_type": "spi", "bus_no": 1, "cs_no": 3, "spi_mode": 2,
    "data_bits": 16, "clk_speed": 2000000, "msb_first": false,
    "dev_name": "SHT721", "alias": "RHT-sensor2A"}"#;

const UART_CONFIG: &str = r#"{"sensor_type": "uart", "bus_no": 4, "baud_rate": 115200,
    "dev_name": "CustomHygrometerSubmodule", "alias": "RHT-sensor3"}"#;

const CANDIDATE_CONFIG: &str = r#"{"sensor_type": "i2c", "bus_no": 1, "i2c_addr": 127,
    "dev_name": "BM280", "alias": "candidate"}"#;

/// Benchmark a single schema pass per tier.
fn bench_schema_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_validation");
    group.throughput(Throughput::Elements(1));

    let config = parse_config(SPI_CONFIG).unwrap_or_default();

    group.bench_function("base", |b| {
        b.iter(|| black_box(schema::validate(&BASE_SCHEMA, black_box(&config))));
    });

    let spi_schema = Schema::for_kind(SensorKind::Spi);
    group.bench_function("device_spi", |b| {
        b.iter(|| black_box(schema::validate(spi_schema, black_box(&config))));
    });

    group.bench_function("unknown_fields", |b| {
        b.iter(|| {
            black_box(schema::unknown_fields(
                &[&BASE_SCHEMA, spi_schema],
                black_box(&config),
            ))
        });
    });

    group.finish();
}

/// Benchmark the complete validation stage sequence per kind.
fn bench_validate_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_config");
    group.throughput(Throughput::Elements(1));

    for (name, raw) in [("i2c", I2C_CONFIG), ("spi", SPI_CONFIG), ("uart", UART_CONFIG)] {
        let config = parse_config(raw).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("kind", name), &config, |b, config| {
            b.iter(|| black_box(validate_config(black_box(config))));
        });
    }

    group.finish();
}

/// Benchmark `add` against registries of growing size.
///
/// The pre-filled sensors share the candidate's kind, so the conflict scan
/// visits all of them.
fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.throughput(Throughput::Elements(1));

    for registered in [0usize, 16, 64, 120] {
        let configs: Vec<String> = (0..registered)
            .map(|address| {
                format!(
                    r#"{{"sensor_type": "i2c", "bus_no": 1, "i2c_addr": {address},
                        "dev_name": "BM280", "alias": "seed-{address}"}}"#
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("i2c_into", registered),
            &configs,
            |b, configs| {
                b.iter_batched(
                    || {
                        let mut registry =
                            SensorRegistry::new(RegistryConfig::new().assign_identifiers(false));
                        for raw in configs {
                            let _ = registry.add(raw);
                        }
                        registry
                    },
                    |mut registry| black_box(registry.add(black_box(CANDIDATE_CONFIG))),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_schema_validation,
    bench_validate_config,
    bench_add
);
criterion_main!(benches);
