//! Integration test: hand-built growth scenarios.
//!
//! Each scenario starts on the growth phase (tick 3) with steering and
//! branching off, so every proposal is deterministic.

use arbor_core::{Material, Role};
use arbor_kernel::Features;
use arbor_space::Pos;
use arbor_test_utils::{lineage, Fixture};

/// Tip A at (4, 5) heads north-east from (3, 4); tip B at (6, 5) heads
/// north-west from (7, 4). Both aim at (5, 6).
fn converging_tips(with_b: bool) -> Fixture {
    let fx = Fixture::new(11, 11)
        .features(Features::NONE)
        .tick(3)
        .branch(3, 4, 1, 40)
        .grow(4, 5, 1, Role::Branch, 4, 0, 40);
    if with_b {
        fx.branch(7, 4, 2, 40)
            .grow(6, 5, 2, Role::Branch, 28, 0, 40)
    } else {
        fx
    }
}

#[test]
fn contested_cell_stays_empty() {
    let mut world = converging_tips(true).build();
    let report = world.step().unwrap();
    assert_eq!(report.metrics.contested_claims, 1);
    assert!(!world.cell(Pos::new(5, 6)).unwrap().is_occupied());
}

#[test]
fn uncontested_cell_is_claimed() {
    let mut world = converging_tips(false).build();
    world.step().unwrap();
    let c = world.cell(Pos::new(5, 6)).unwrap();
    assert_eq!(c.lineage, Some(lineage(1)));
    assert_eq!(c.heading.bucket(), 4);
}

#[test]
fn source_without_resource_spawns_nothing() {
    let mut world = Fixture::new(7, 9)
        .features(Features::NONE)
        .tick(3)
        .branch(3, 3, 1, 3)
        .build();
    let report = world.step().unwrap();
    assert_eq!(report.metrics.births, 0);
    assert_eq!(report.metrics.starved_claims, 1);
    let totals = world.step_n(60).unwrap();
    assert_eq!(totals.births, 0);
    assert_eq!(world.snapshot().occupied_count(), 1);
    assert_eq!(world.snapshot().total_resource(), 3);
}

/// Branch B at (5, 5) with heading 2 and error 5 resolves its parent at
/// (5, 4). Its backward seed would land at (4, 4).
fn reseed_scene(parent_role: Role) -> Fixture {
    let fx = Fixture::new(11, 11)
        .ground(4)
        .features(Features::NONE)
        .tick(3);
    let fx = match parent_role {
        Role::Root => fx.root(5, 4, 1, 40),
        Role::Branch => fx.grow(5, 4, 1, Role::Branch, 0, 0, 40),
    };
    fx.grow(5, 5, 1, Role::Branch, 2, 5, 40)
}

#[test]
fn branch_rooted_in_a_root_does_not_reseed() {
    let mut world = reseed_scene(Role::Root).build();
    world.step().unwrap();
    assert!(!world.cell(Pos::new(4, 4)).unwrap().is_occupied());
}

#[test]
fn branch_rooted_in_a_branch_seeds_a_root() {
    let mut world = reseed_scene(Role::Branch).build();
    world.step().unwrap();
    let seed = world.cell(Pos::new(4, 4)).unwrap();
    assert!(seed.is_role(Role::Root));
    assert_eq!(seed.lineage, Some(lineage(1)));
    assert_eq!(seed.heading.bucket(), 18);
}

#[test]
fn water_and_stone_are_never_entered() {
    let mut world = Fixture::new(9, 12)
        .ground(4)
        .material(4, 3, Material::Stone)
        .material(4, 9, Material::Water)
        .features(Features::NONE)
        .branch(4, 5, 1, 120)
        .build();
    world.step_n(400).unwrap();
    assert!(!world.cell(Pos::new(4, 3)).unwrap().is_occupied());
    assert!(!world.cell(Pos::new(4, 9)).unwrap().is_occupied());
    // The stem stops at least one cell short of the water.
    assert!(!world.cell(Pos::new(4, 8)).unwrap().is_occupied());
}
