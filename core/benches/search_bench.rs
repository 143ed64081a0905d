use criterion::{criterion_group, criterion_main, Criterion};
use cranfield_core::{evaluate, Document, InvertedIndex, Query, ScoringModel};

const WORDS: &[&str] = &[
    "wing", "flow", "shock", "boundary", "layer", "pressure", "supersonic", "heat", "transfer",
    "plate", "viscous", "laminar", "turbulent", "nozzle", "jet", "slipstream", "lift", "drag",
];

fn corpus() -> Vec<Document> {
    (0..2000)
        .map(|i| {
            let content: Vec<&str> =
                (0..60).map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()]).collect();
            Document {
                id: (i + 1).to_string(),
                title: format!("{} {}", WORDS[i % WORDS.len()], WORDS[(i * 3) % WORDS.len()]),
                author: String::new(),
                content: content.join(" "),
            }
        })
        .collect()
}

fn bench_models(c: &mut Criterion) {
    let index = InvertedIndex::build(corpus());
    let query = Query::parse("supersonic boundary layer heat transfer").unwrap();
    for id in 0..5 {
        let model = ScoringModel::from_id(id).unwrap();
        c.bench_function(&format!("evaluate_{}", model.name()), |b| {
            b.iter(|| evaluate(&query, &index, model))
        });
    }
}

criterion_group!(benches, bench_models);
criterion_main!(benches);
