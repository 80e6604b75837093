use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nook_viewer::internal::content::render_article;
use nook_viewer::internal::headings::extract_headings;
use nook_viewer::internal::models::ThemeMode;
use nook_viewer::internal::ui::view::article_lines;
use nook_viewer::utils::theme_loader::TuiTheme;

fn digest(sections: usize) -> String {
    let mut markdown = String::from("# Tech Feed\n\n");
    for i in 0..sections {
        markdown.push_str(&format!(
            "## Story {i}\n\nA paragraph describing story {i} in enough words to need wrapping at typical terminal widths.\n\n- point one\n- point two\n\n```rust\nfn story_{i}() {{}}\n```\n\n"
        ));
    }
    markdown
}

fn benchmark_digest(c: &mut Criterion) {
    let small = digest(5);
    let large = digest(200);

    c.bench_function("extract_headings large", |b| {
        b.iter(|| extract_headings(black_box(&large)))
    });

    c.bench_function("render_article small", |b| {
        b.iter(|| render_article(black_box("tech_feed"), black_box(&small)))
    });

    c.bench_function("render_article large", |b| {
        b.iter(|| render_article(black_box("tech_feed"), black_box(&large)))
    });

    let article = render_article("tech_feed", &large);
    let theme = TuiTheme::builtin(ThemeMode::Dark);
    c.bench_function("article_lines large", |b| {
        b.iter(|| article_lines(black_box(&article), black_box(100), &theme, ThemeMode::Dark, None))
    });
}

criterion_group!(benches, benchmark_digest);
criterion_main!(benches);
