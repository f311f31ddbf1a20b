//! Criterion benchmarks for driller core operations.
//!
//! Benchmarks cover:
//! - Fixed-width row location (arithmetic only)
//! - Variable-width row location (two passes over the record headers)
//! - Full decode of fixed and variable tables into a ResultSet
//! - Loading a data file through each load strategy

use byteorder::{ByteOrder, LittleEndian};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;

use driller::table::column::{ColumnDescriptor, ColumnKind};
use driller::table::extract::extract_from;
use driller::table::locate::locate_rows;
use driller::table::region::{FileRegion, LoadStrategy};
use driller::table::schema::Table;

const HEADER: usize = 64;
const FIXED_ROW: usize = 32;

// ---------------------------------------------------------------------------
// Synthetic table builders (mirrors integration test helpers)
// ---------------------------------------------------------------------------

fn fixed_table() -> Table {
    let mut table = Table::new("Fixed", "FIXED.DAT", HEADER as u32, FIXED_ROW as u32);
    table.add_column(ColumnDescriptor::new("id", 0, ColumnKind::UInt32));
    table.add_column(ColumnDescriptor::new("name", 4, ColumnKind::String { length: 16 }));
    table.add_column(ColumnDescriptor::new("born", 20, ColumnKind::Date));
    table.add_column(ColumnDescriptor::new("balance", 24, ColumnKind::Decimal { scale: 2 }));
    table.add_column(ColumnDescriptor::new("flag", 28, ColumnKind::Bool));
    table
}

fn build_fixed_file(rows: usize) -> Vec<u8> {
    let mut data = vec![0u8; HEADER + rows * FIXED_ROW];
    for i in 0..rows {
        let row = &mut data[HEADER + i * FIXED_ROW..HEADER + (i + 1) * FIXED_ROW];
        LittleEndian::write_u32(&mut row[0..], i as u32);
        row[4..12].copy_from_slice(b"PATIENT ");
        LittleEndian::write_u16(&mut row[20..], 1980 + (i % 40) as u16);
        row[22] = 1 + (i % 12) as u8;
        row[23] = 1 + (i % 28) as u8;
        LittleEndian::write_i32(&mut row[24..], (i as i32) * 137 - 5000);
        row[28] = (i % 2) as u8;
    }
    data
}

fn variable_table() -> Table {
    let mut table = Table::new("Notes", "NOTES.DAT", HEADER as u32, 0);
    table.add_column(ColumnDescriptor::new("kind", 0, ColumnKind::UInt16));
    table.add_column(ColumnDescriptor::new("text", 4, ColumnKind::VarString));
    table
}

fn build_variable_file(rows: usize) -> Vec<u8> {
    let mut data = vec![0u8; HEADER];
    for i in 0..rows {
        let text_len = 8 + i % 48;
        let start = data.len();
        data.resize(start + 4 + text_len, b'x');
        LittleEndian::write_u16(&mut data[start..], (i % 5) as u16);
        LittleEndian::write_u16(&mut data[start + 2..], (4 + text_len) as u16);
    }
    data
}

// ---------------------------------------------------------------------------
// Row location
// ---------------------------------------------------------------------------

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_rows");
    let fixed = fixed_table();
    let variable = variable_table();

    for rows in [1_000usize, 10_000, 100_000] {
        let data = build_fixed_file(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("fixed", rows), &data, |b, data| {
            b.iter(|| black_box(locate_rows(data, &fixed, 0).unwrap()));
        });

        let data = build_variable_file(rows);
        group.bench_with_input(BenchmarkId::new("variable", rows), &data, |b, data| {
            b.iter(|| black_box(locate_rows(data, &variable, 0).unwrap()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let fixed = fixed_table();
    let variable = variable_table();

    for rows in [1_000usize, 10_000] {
        let data = build_fixed_file(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("fixed", rows), &data, |b, data| {
            b.iter(|| black_box(extract_from(data, &fixed, 0).unwrap()));
        });

        let data = build_variable_file(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("variable", rows), &data, |b, data| {
            b.iter(|| black_box(extract_from(data, &variable, 0).unwrap()));
        });
    }
    group.finish();
}

fn bench_extract_limited(c: &mut Criterion) {
    let fixed = fixed_table();
    let data = build_fixed_file(100_000);

    c.bench_function("extract_fixed_limit_100", |b| {
        b.iter(|| black_box(extract_from(&data, &fixed, 100).unwrap()));
    });
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

fn bench_region_load(c: &mut Criterion) {
    let data = build_fixed_file(100_000);
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&data).unwrap();
    tmp.flush().unwrap();

    let mut group = c.benchmark_group("region_load");
    group.throughput(Throughput::Bytes(data.len() as u64));

    let mut strategies = vec![LoadStrategy::Buffered];
    if LoadStrategy::mmap_available() {
        strategies.push(LoadStrategy::Mmap);
    }
    for strategy in strategies {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                let region = FileRegion::load(tmp.path(), strategy).unwrap();
                black_box(region.as_bytes().iter().step_by(4096).count());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_locate,
    bench_extract,
    bench_extract_limited,
    bench_region_load,
);
criterion_main!(benches);
