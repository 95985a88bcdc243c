use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storykeep_parser::{parse, serialize};

fn parse_short_pane(c: &mut Criterion) {
    let source = "## title\n\n...\n\n* `youtube(tag|title)`";

    c.bench_function("parse_short_pane", |b| b.iter(|| parse(black_box(source))));
}

fn parse_long_pane(c: &mut Criterion) {
    let mut source = String::from("# Storykeep\n\n");
    for i in 0..50 {
        source.push_str(&format!(
            "## Section {}\n\nSome **bold** copy with a [link](https://example.com/{}).\n\n",
            i, i
        ));
        source.push_str("* first point\n* second point\n  1. nested\n  2. nested again\n\n");
    }

    c.bench_function("parse_long_pane", |b| b.iter(|| parse(black_box(&source))));
}

fn serialize_long_pane(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..50 {
        source.push_str(&format!("### Part {}\n\n* a\n* b\n\n", i));
    }
    let root = parse(&source).unwrap();

    c.bench_function("serialize_long_pane", |b| b.iter(|| serialize(black_box(&root))));
}

criterion_group!(benches, parse_short_pane, parse_long_pane, serialize_long_pane);
criterion_main!(benches);
