use bytes::Bytes;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::io::Cursor;

use driftkv_protocol::{encode_command, read_command, response};

fn command(parts: &[&str]) -> Vec<Bytes> {
    parts
        .iter()
        .map(|p| Bytes::copy_from_slice(p.as_bytes()))
        .collect()
}

fn bench_read_set_command(c: &mut Criterion) {
    let encoded = encode_command(&command(&["SET", "mykey", "myvalue"]));

    c.bench_function("read_set_command", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(encoded.as_ref()));
            read_command(&mut cursor).unwrap()
        })
    });
}

fn bench_read_inline_command(c: &mut Criterion) {
    let data = b"SET mykey myvalue\n";

    c.bench_function("read_inline_command", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(&data[..]));
            read_command(&mut cursor).unwrap()
        })
    });
}

fn bench_read_bulk_1kb(c: &mut Criterion) {
    let payload = "x".repeat(1024);
    let encoded = encode_command(&command(&["SET", "big", payload.as_str()]));

    c.bench_function("read_bulk_1kb", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(encoded.as_ref()));
            read_command(&mut cursor).unwrap()
        })
    });
}

fn bench_encode_set_command(c: &mut Criterion) {
    let args = command(&["SET", "mykey", "myvalue"]);

    c.bench_function("encode_set_command", |b| {
        b.iter(|| encode_command(black_box(&args)))
    });
}

fn bench_format_array_response(c: &mut Criterion) {
    let items: Vec<Option<Bytes>> = (0..16)
        .map(|i| Some(Bytes::from(format!("item:{i}"))))
        .collect();

    c.bench_function("format_array_response_16", |b| {
        b.iter(|| response::array(black_box(&items)))
    });
}

criterion_group!(
    benches,
    bench_read_set_command,
    bench_read_inline_command,
    bench_read_bulk_1kb,
    bench_encode_set_command,
    bench_format_array_response,
);
criterion_main!(benches);
