use meshlink_match_core::{link, would_create_cycle, MeshHandle};
use meshlink_test_fixtures::MockScene;

fn handles(scene: &mut MockScene) -> (MeshHandle, MeshHandle) {
    let source = scene.add_mesh("|sim|body_geo", 100, 60);
    let target = scene.add_mesh("|look|body_geo", 100, 60);
    (source, target)
}

/// it should bootstrap a new deformer through a disposable duplicate, rebind
/// slot 0 to the live driver, and delete the duplicate
#[test]
fn new_deformer_uses_and_discards_duplicate() {
    let mut scene = MockScene::new();
    let (source, target) = handles(&mut scene);

    let outcome = link(&mut scene, &source, &target).unwrap();
    assert!(outcome.created);

    let slots = scene.slots_of(&outcome.deformer).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].driver, source.shape);
    assert_eq!(slots[0].weight, 1.0);

    assert_eq!(scene.live_temp_count(), 0);
    assert_eq!(scene.deleted_nodes().len(), 1);
    assert!(scene.deleted_nodes()[0].contains("_dup"));
}

/// it should extend an existing deformer at max(existing)+1 instead of
/// creating a second deformer on the same target
#[test]
fn existing_deformer_gains_a_slot() {
    let mut scene = MockScene::new();
    let (source, target) = handles(&mut scene);
    let extra = scene.add_mesh("|sim|body_fix", 100, 60);

    let first = link(&mut scene, &source, &target).unwrap();
    let second = link(&mut scene, &extra, &target).unwrap();

    assert!(!second.created);
    assert_eq!(second.deformer, first.deformer);
    let slots = scene.slots_of(&first.deformer).unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].index, 1);
    assert_eq!(slots[1].driver, extra.shape);
    assert_eq!(scene.created_deformer_count(), 1);
}

/// it should be a no-op success when the source already drives the target,
/// creating no duplicate weight slot
#[test]
fn relinking_same_source_is_a_noop() {
    let mut scene = MockScene::new();
    let (source, target) = handles(&mut scene);

    let first = link(&mut scene, &source, &target).unwrap();
    let again = link(&mut scene, &source, &target).unwrap();

    assert!(!again.created);
    assert_eq!(again.deformer, first.deformer);
    assert_eq!(scene.slots_of(&first.deformer).unwrap().len(), 1);
    assert_eq!(scene.created_deformer_count(), 1);
}

/// it should clean up the duplicate when deformer creation is refused
#[test]
fn duplicate_is_deleted_on_failure() {
    let mut scene = MockScene::new();
    let (source, target) = handles(&mut scene);
    scene.refuse_deformer_edits();

    let err = link(&mut scene, &source, &target).unwrap_err();
    assert_eq!(err.driver, source.transform);
    assert_eq!(err.target, target.transform);
    assert_eq!(scene.live_temp_count(), 0);
}

/// it should detect the A -> B -> C chain: linking driver=C onto target=A
/// closes a cycle, the opposite direction does not
#[test]
fn chain_cycle_is_detected() {
    let mut scene = MockScene::new();
    let a = scene.add_mesh("|rig|a_geo", 10, 10);
    let b = scene.add_mesh("|rig|b_geo", 10, 10);
    let c = scene.add_mesh("|rig|c_geo", 10, 10);
    scene.connect(&a.transform, &b.transform);
    scene.connect(&b.transform, &c.transform);

    assert!(would_create_cycle(&scene, &c.shape, &a.shape, 5));
    assert!(!would_create_cycle(&scene, &a.shape, &c.shape, 5));
}

/// it should stop the upstream walk at the depth bound instead of chasing a
/// long (or malformed) chain forever
#[test]
fn cycle_walk_respects_depth_bound() {
    let mut scene = MockScene::new();
    let meshes: Vec<_> = (0..8)
        .map(|i| scene.add_mesh(&format!("|chain|n{i}_geo"), 10, 10))
        .collect();
    for pair in meshes.windows(2) {
        scene.connect(&pair[0].transform, &pair[1].transform);
    }

    let head = &meshes[0];
    let tail = &meshes[7];
    // Seven hops away: invisible at depth 5, found with a wider bound.
    assert!(!would_create_cycle(&scene, &tail.shape, &head.shape, 5));
    assert!(would_create_cycle(&scene, &tail.shape, &head.shape, 10));
}
