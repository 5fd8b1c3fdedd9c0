use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use cg_script::{
    lint_script, run_headless, ChoiceRaw, CompilerConfig, EndingRaw, LineRaw, SceneRaw,
    ScriptRaw, ScriptSession,
};

fn chain_script(scene_count: usize) -> ScriptRaw {
    let scenes = (0..scene_count)
        .map(|idx| SceneRaw {
            id: Some(format!("s{idx}")),
            dialogue: vec![
                LineRaw {
                    speaker: Some("Narrator".to_string()),
                    text: Some(format!("Scene {idx}")),
                },
                LineRaw {
                    speaker: None,
                    text: Some("...".to_string()),
                },
            ],
            choices: if idx % 4 == 0 {
                vec![
                    ChoiceRaw {
                        label: Some("Skip ahead".to_string()),
                        next: Some(format!("s{}", idx + 2)),
                    },
                    ChoiceRaw {
                        label: Some("Back".to_string()),
                        next: Some("cover".to_string()),
                    },
                ]
            } else {
                Vec::new()
            },
            ..SceneRaw::default()
        })
        .collect();
    ScriptRaw {
        scenes,
        ending: Some(EndingRaw::default()),
        ..ScriptRaw::default()
    }
}

fn bench_parse_json(c: &mut Criterion) {
    let json = chain_script(24).to_json().expect("json");
    c.bench_function("parse_json_to_raw", |b| {
        b.iter(|| ScriptRaw::from_json(&json).expect("parse"))
    });
}

fn bench_compile_script(c: &mut Criterion) {
    let config = CompilerConfig::default();
    let mut group = c.benchmark_group("compile");
    for size in [24usize, 128, 512] {
        let raw = chain_script(size);
        group.bench_function(format!("scenes_{size}"), |b| {
            b.iter(|| raw.compile(&config))
        });
    }
    group.finish();
}

fn bench_lint(c: &mut Criterion) {
    let raw = chain_script(128);
    let config = CompilerConfig::default();
    c.bench_function("lint_128", |b| b.iter(|| lint_script(&raw, &config)));
}

fn bench_session_cache_hit(c: &mut Criterion) {
    let raw = Arc::new(chain_script(128));
    let mut session = ScriptSession::default();
    session.graph(Some(&raw));
    c.bench_function("session_cache_hit", |b| {
        b.iter(|| session.graph(Some(&raw)).expect("graph"))
    });
}

fn bench_headless(c: &mut Criterion) {
    let graph = Arc::new(chain_script(128).compile(&CompilerConfig::default()));
    c.bench_function("headless_256", |b| {
        b.iter_batched(
            || Arc::clone(&graph),
            |graph| run_headless(graph, 256),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    compile_benches,
    bench_parse_json,
    bench_compile_script,
    bench_lint,
    bench_session_cache_hit,
    bench_headless
);
criterion_main!(compile_benches);
