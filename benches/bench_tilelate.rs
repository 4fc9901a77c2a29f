#![allow(
    clippy::tests_outside_test_module,
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    reason = "benchmark"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tilelate::{Document, Engine, Template, localize};

mod utils;

fn tilelate_benchmark(c: &mut Criterion) {
    let mut engine = Engine::new();
    engine.localizer_mut().insert_table(
        "en",
        [
            ("popular", "popular"),
            ("add_new_tile", "add a new tile"),
            ("by", "by"),
        ],
    );

    let template_content = include_str!("grid.tmpl");
    let mut document = Document::new();
    document.add_template("grid", template_content);

    let contexts = utils::generate_random_contexts(100);

    utils::print_binary_size();

    let mut group = c.benchmark_group("Template Rendering");
    group.sample_size(50);

    group.bench_function("tilelate_parse", |b| {
        b.iter(|| black_box(Template::parse(black_box(template_content)).unwrap()));
    });

    group.bench_function("tilelate_render", |b| {
        b.iter(|| {
            for context in &contexts {
                black_box(engine.render(&document, "grid", Some(context)).unwrap());
            }
        });
    });

    group.bench_function("tilelate_localize", |b| {
        b.iter(|| black_box(localize(black_box(template_content), engine.localizer())));
    });

    let localized = localize(template_content, engine.localizer());
    let template = Template::parse(&localized).unwrap();
    group.bench_function("tilelate_render_preparsed", |b| {
        b.iter(|| {
            for context in &contexts {
                black_box(template.render(Some(context)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, tilelate_benchmark);
criterion_main!(benches);
