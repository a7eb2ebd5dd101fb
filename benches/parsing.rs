//! Benchmarks for decoding formatter output.

use std::fmt::Write;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use manless::document::decoder;
use manless::listing::{self, ListingCommand};

/// Bold via overstrike, as nroff emits it.
fn bold(text: &str) -> String {
    text.chars().map(|c| format!("{c}\x08{c}")).collect()
}

fn synthetic_page(sections: usize) -> String {
    let mut page = String::from("LS(1)                 User Commands                 LS(1)\n\n");
    for i in 0..sections {
        let _ = writeln!(page, "{}", bold(&format!("SECTION {i}")));
        for j in 0..20 {
            let _ = writeln!(
                page,
                "       {} _\x08f_\x08i_\x08l_\x08e print entry {j}, see ls(1) and https://example.org/{i}/{j}",
                bold(&format!("--option-{j}"))
            );
        }
        page.push('\n');
    }
    page
}

fn bench_decode_small(c: &mut Criterion) {
    let raw = synthetic_page(2);
    c.bench_function("decode_small", |b| b.iter(|| decoder::decode(black_box(&raw))));
}

fn bench_decode_large(c: &mut Criterion) {
    let raw = synthetic_page(50);
    c.bench_function("decode_large", |b| b.iter(|| decoder::decode(black_box(&raw))));
}

fn bench_parse_listing(c: &mut Criterion) {
    let mut text = String::new();
    for i in 0..5000 {
        let _ = writeln!(text, "page{i} ({}) - description of page {i}", i % 8 + 1);
    }
    c.bench_function("parse_listing", |b| {
        b.iter(|| listing::parse_listing(ListingCommand::Apropos, black_box(&text)).unwrap())
    });
}

criterion_group!(benches, bench_decode_small, bench_decode_large, bench_parse_listing);
criterion_main!(benches);
