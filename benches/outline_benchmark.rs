//! Benchmarks for outline extraction.
//!
//! Run with: cargo bench
//!
//! Classification runs over synthetic documents; PDF parsing over a small
//! PDF generated with lopdf.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use unoutline::{outline, JsonFormat, Outliner, ParseOptions, RawLine, SourceDocument, Unoutline};

/// A generic report: a few heading tiers per page over mostly body text.
fn create_report(page_count: usize) -> SourceDocument {
    let mut source = SourceDocument::new();
    for page in 0..page_count {
        let mut lines = vec![
            RawLine::single(format!("Chapter {}", page + 1), 24.0, 40.0),
            RawLine::single(format!("Section {}.1", page + 1), 16.0, 90.0),
        ];
        for i in 0..40 {
            lines.push(RawLine::single(
                format!("Body text line {} of page {} with a few more words.", i, page),
                10.0,
                120.0 + i as f32 * 14.0,
            ));
        }
        lines.push(RawLine::single(format!("Section {}.2", page + 1), 16.0, 700.0));
        source.add_page(lines);
    }
    source
}

/// A multi-section guide, classified structurally.
fn create_guide(page_count: usize) -> SourceDocument {
    let mut source = SourceDocument::new().with_page(vec![RawLine::single(
        "Comprehensive Guide to Major Cities in the South of France",
        24.0,
        100.0,
    )]);
    for page in 0..page_count {
        let mut lines = vec![
            RawLine::single("Nice: The Jewel of the French Riviera", 14.0, 40.0),
            RawLine::single("Key Attractions", 12.0, 80.0),
            RawLine::single("\u{2022} Promenade des Anglais", 10.0, 100.0),
        ];
        for i in 0..30 {
            lines.push(RawLine::single(
                format!("Guide text {} on page {}.", i, page),
                10.0,
                120.0 + i as f32 * 14.0,
            ));
        }
        source.add_page(lines);
    }
    source
}

/// Creates a PDF with the given number of pages, one heading and one body
/// line each.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), Object::Integer(24)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Chapter {}", i + 1))],
                ),
                Operation::new("Tf", vec!["F1".into(), Object::Integer(10)]),
                Operation::new("Td", vec![Object::Integer(0), Object::Integer(-40)]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal("Body text for the outline benchmark.")],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

fn bench_normalize(c: &mut Criterion) {
    let source = create_report(20);
    c.bench_function("normalize_20_pages", |b| {
        b.iter(|| outline::normalize(black_box(&source)).unwrap());
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_outline(c: &mut Criterion) {
    let outliner = Outliner::new();
    let mut group = c.benchmark_group("outline");

    for page_count in [1, 10, 50].iter() {
        let report = create_report(*page_count);
        group.bench_function(format!("generic_{}_pages", page_count), |b| {
            b.iter(|| outliner.outline(black_box(&report)).unwrap());
        });

        let guide = create_guide(*page_count);
        group.bench_function(format!("guide_{}_pages", page_count), |b| {
            b.iter(|| outliner.outline(black_box(&guide)).unwrap());
        });
    }

    group.finish();
}

fn bench_pdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf");
    let builder = Unoutline::new().with_parse_options(ParseOptions::new().sequential());

    for page_count in [1, 10].iter() {
        let data = create_test_pdf(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                builder
                    .outline_bytes(black_box(&data))
                    .and_then(|r| r.to_json(JsonFormat::Compact))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark compiling the built-in rules.
fn bench_outliner_creation(c: &mut Criterion) {
    c.bench_function("outliner_creation", |b| {
        b.iter(Outliner::new);
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_outline,
    bench_pdf,
    bench_outliner_creation,
);
criterion_main!(benches);
