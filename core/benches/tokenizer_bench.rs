use criterion::{criterion_group, criterion_main, Criterion};
use cranfield_core::tokenizer::analyze;

const TEXT: &str = "an experimental study of a wing in a propeller slipstream was made in order to \
determine the spanwise distribution of the lift increase due to slipstream at different angles of \
attack of the wing and at different free stream to slipstream velocity ratios.";

fn bench_analyze(c: &mut Criterion) {
    c.bench_function("analyze_abstract", |b| b.iter(|| analyze(TEXT)));
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
