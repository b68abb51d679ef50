use criterion::{criterion_group, criterion_main, Criterion};

use inkdown::format::to_html;

/// A mixed-feature chunk repeated to build a long document. Kept synthetic
/// so the bench has no data-file dependency.
fn build_document(repeats: usize) -> String {
    let chunk = "\
# Section heading

A paragraph with **bold**, _italic_, ~underlined~ and `inline code`
content that continues on a second line.

> A quote with a [link](https://example.com/path?q=1) inside,
> and a lazy continuation line.

- first item
- second item
  with a continuation
- [x] a finished task

1. ordered one
2. ordered two

```rust
fn main() {
    println!(\"hello\");
}
```

| name | value |
| :--- | ----: |
| alpha | 1 |
| beta | 2 |

";
    chunk.repeat(repeats)
}

fn long_documents(c: &mut Criterion) {
    let content = build_document(500);

    let mut group = c.benchmark_group("long documents");
    group.bench_function("inkdown", |b| {
        b.iter(|| {
            let document = inkdown::parse(&content);
            to_html(&document)
        })
    });

    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = pulldown_cmark::Parser::new(&content);
            let mut html_output = String::new();
            pulldown_cmark::html::push_html(&mut html_output, parser);
            html_output
        })
    });
    group.finish();
}

fn short_inlines(c: &mut Criterion) {
    let content = "*this ***has some* various things* that** [create multiple elements](while/inline) taking _too_ much ![effort] to parse, and should `be a decent` test of whether this works quickly.";

    let mut group = c.benchmark_group("inlines");
    group.bench_function("inkdown", |b| {
        b.iter(|| {
            let document = inkdown::parse(content);
            to_html(&document)
        })
    });
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = pulldown_cmark::Parser::new(content);
            let mut html_output = String::new();
            pulldown_cmark::html::push_html(&mut html_output, parser);
            html_output
        })
    });
    group.finish();
}

criterion_group!(benches, long_documents, short_inlines);
criterion_main!(benches);
