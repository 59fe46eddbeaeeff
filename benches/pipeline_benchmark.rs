use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use webapp_minify::config::Config;
use webapp_minify::error::MinifierError;
use webapp_minify::minifier::Minifiers;
use webapp_minify::pattern::FilenamePattern;
use webapp_minify::pipeline::{run, PipelineStats};
use webapp_minify::registry::RewriteRegistry;
use webapp_minify::rewriter::HtmlRewriter;
use webapp_minify::sink::MemorySink;

fn identity(input: &str) -> Result<String, MinifierError> {
    Ok(input.to_string())
}

/// Create a source tree with N CSS/JS pairs and one HTML page per directory
fn create_source_tree(dir: &TempDir, count: usize) -> PathBuf {
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();

    for i in 0..count {
        let subdir = src.join(format!("dir{}", i % 10));
        fs::create_dir_all(&subdir).unwrap();
        fs::write(subdir.join(format!("style{i}.css")), format!(".c{i} {{ color: red; }}"))
            .unwrap();
        fs::write(subdir.join(format!("app{i}.js")), format!("var v{i} = {i};")).unwrap();
    }

    for d in 0..10.min(count) {
        let links: String = (0..count)
            .filter(|i| i % 10 == d)
            .map(|i| format!(r#"<link href="style{i}.css"><script src="app{i}.js"></script>"#))
            .collect();
        fs::write(
            src.join(format!("dir{d}")).join("index.html"),
            format!("<html><head>{links}</head></html>"),
        )
        .unwrap();
    }

    src
}

/// Benchmark filename minting
fn bench_mint(c: &mut Criterion) {
    let pattern = FilenamePattern::default();
    let content = vec![b'x'; 64 * 1024];

    c.bench_function("mint_64kb", |b| {
        b.iter(|| pattern.mint(black_box("app.css"), black_box(&content)))
    });
}

/// Benchmark reference rewriting against registries of different sizes
fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite");

    for entries in [10, 100, 1000].iter() {
        let mut registry = RewriteRegistry::new();
        for i in 0..*entries {
            registry.record(format!("app{i}.js"), format!("app{i}-abcdef.min.js"));
        }
        let rewriter = HtmlRewriter::new(&registry.snapshot()).unwrap();
        let html: String = (0..*entries)
            .map(|i| format!(r#"<script src="app{i}.js"></script>"#))
            .collect();

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entries), entries, |b, _| {
            b.iter(|| rewriter.rewrite(black_box(&html)).len())
        });
    }

    group.finish();
}

/// Benchmark a full pipeline run with identity minifiers
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let minifiers = Minifiers::new(identity, identity, identity);

    for file_count in [100, 500].iter() {
        let temp = TempDir::new().unwrap();
        let src = create_source_tree(&temp, *file_count);
        let out = temp.path().join("out");
        let config = Config::new(src, out.clone());

        group.throughput(Throughput::Elements(*file_count as u64 * 2));
        group.bench_with_input(
            BenchmarkId::from_parameter(file_count),
            file_count,
            |b, _| {
                b.iter(|| {
                    let _ = fs::remove_dir_all(&out);
                    let sink = MemorySink::new();
                    run(black_box(&config), &minifiers, &sink, &PipelineStats::new()).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_mint, bench_rewrite, bench_pipeline);
criterion_main!(benches);
