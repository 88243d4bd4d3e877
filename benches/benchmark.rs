use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fuzz_rush::{
    par_sparse_dot_topn, sparse_dot_topn, NgramAnalyzer, TFIDFVectorizer, TokenizeConfig, Vocabulary,
};

/// deterministic synthetic company names (xorshift32)
fn synthetic_names(count: usize, seed: u32) -> Vec<String> {
    const PARTS: [&str; 16] = [
        "acme", "global", "tech", "holdings", "north", "south", "systems", "group",
        "united", "pacific", "data", "energy", "micro", "soft", "bank", "trust",
    ];
    let mut x = seed;
    let mut next = move || {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        x as usize
    };
    (0..count)
        .map(|_| {
            let words = 2 + next() % 3;
            (0..words).map(|_| PARTS[next() % PARTS.len()]).collect::<Vec<_>>().join(" ")
        })
        .collect()
}

fn top_n_benchmark(c: &mut Criterion) {
    let source = synthetic_names(5_000, 0x1234_5678);
    let target = synthetic_names(20_000, 0x9abc_def0);

    let analyzer = NgramAnalyzer::new(&TokenizeConfig::default());
    let vocab = Vocabulary::build(&[&source[..], &target[..]], &analyzer);
    let vectorizer: TFIDFVectorizer<f64> = TFIDFVectorizer::new(&vocab, analyzer);

    c.bench_function("vectorize", |b| {
        b.iter(|| vectorizer.fit_transform(black_box(&target)))
    });

    let a = vectorizer.fit_transform(&source);
    let b_t = vectorizer.fit_transform(&target).transpose();

    c.bench_function("sparse_dot_topn", |b| {
        b.iter(|| sparse_dot_topn(black_box(&a), black_box(&b_t), 10, 0.3))
    });

    c.bench_function("par_sparse_dot_topn", |b| {
        b.iter(|| par_sparse_dot_topn(black_box(&a), black_box(&b_t), 10, 0.3))
    });
}

criterion_group!(benches, top_n_benchmark);
criterion_main!(benches);
