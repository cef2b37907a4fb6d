use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::fs;
use std::path::Path;

fn load_fixture() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/test_data/pubmed_xml/article_set.xml");
    fs::read_to_string(path).unwrap()
}

/// The fixture's `PubmedArticle` elements repeated `copies` times in one set
fn build_batch_xml(fixture: &str, copies: usize) -> String {
    let start = fixture.find("<PubmedArticle>").unwrap();
    let end = fixture.rfind("</PubmedArticle>").unwrap() + "</PubmedArticle>".len();
    let articles = &fixture[start..end];

    let mut combined = String::from("<?xml version=\"1.0\" ?>\n<PubmedArticleSet>\n");
    for _ in 0..copies {
        combined.push_str(articles);
        combined.push('\n');
    }
    combined.push_str("</PubmedArticleSet>");
    combined
}

fn bench_batch_extract(c: &mut Criterion) {
    let fixture = load_fixture();

    let mut group = c.benchmark_group("pubmed_extract_records");
    for copies in [1usize, 10, 100] {
        let xml = build_batch_xml(&fixture, copies);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract_records", copies), &xml, |b, xml| {
            b.iter(|| pmbib_parser::extract_records(black_box(xml)))
        });
    }
    group.finish();
}

fn bench_document_tree(c: &mut Criterion) {
    let xml = build_batch_xml(&load_fixture(), 10);

    let mut group = c.benchmark_group("pubmed_document_tree");
    group.throughput(Throughput::Bytes(xml.len() as u64));
    group.bench_function("parse_document", |b| {
        b.iter(|| pmbib_parser::common::parse_document(black_box(&xml)))
    });
    group.finish();
}

criterion_group!(benches, bench_batch_extract, bench_document_tree);
criterion_main!(benches);
