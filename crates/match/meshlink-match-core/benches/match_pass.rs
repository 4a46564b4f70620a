use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use meshlink_match_core::{run_pass, MatchConfig, MatchingContext, Scoring};
use meshlink_test_fixtures::MockScene;

const PARTS: &[&str] = &[
    "body", "head", "hair", "face", "hand", "leg", "arm", "foot", "teeth", "tongue", "tail",
    "skirt", "belt", "rope",
];

fn build_scene(copies: u32) -> MockScene {
    let mut scene = MockScene::new();
    for copy in 0..copies {
        for (i, part) in PARTS.iter().enumerate() {
            let faces = 100 + (copy as usize * PARTS.len() + i) as u32;
            scene.add_mesh(&format!("|sim|chr_{part}_geo_{copy:02}"), faces, faces / 2);
            scene.add_mesh(&format!("|look|{part}_{copy:02}"), faces, faces / 2);
        }
    }
    scene
}

fn bench_match_pass(c: &mut Criterion) {
    for copies in [2_u32, 8] {
        let nodes = copies as usize * PARTS.len();
        c.bench_function(&format!("match_pass_{nodes}x{nodes}"), |b| {
            b.iter_batched(
                || build_scene(copies),
                |mut scene| {
                    let ctx = MatchingContext::from_roots(
                        &scene,
                        "|sim",
                        "|look",
                        MatchConfig::new(Scoring::SignatureFirst),
                    )
                    .unwrap();
                    run_pass(&mut scene, &ctx)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, bench_match_pass);
criterion_main!(benches);
