//! Per-element behavior scenarios at grid scale: pools level, oil floats,
//! gases collect under ceilings, acid tunnels, gunpowder chains, lava cools.
//! All run on the CPU reference world with generous frame budgets so the
//! probabilistic gates have converged long before the assertions run.

use sim::{Element, Grid, World};

#[test]
fn stacked_water_levels_into_a_single_layer() {
    let mut world = World::new(8, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "........",
        "WW......",
        "WW......",
        "RRRRRRRR",
    ]));
    for _ in 0..80 {
        world.step();
    }
    let grid = world.current_grid();
    assert_eq!(grid.count_of(Element::Water), 4, "{grid:?}");
    for y in 0..2 {
        for x in 0..8 {
            assert_ne!(
                grid.get(x, y).element(),
                Element::Water,
                "water stuck above the pool layer:\n{grid:?}"
            );
        }
    }
}

#[test]
fn oil_floats_up_through_water() {
    let mut world = World::new(4, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "....", //
        "WWWW", //
        "OOOO", //
        "RRRR",
    ]));
    for _ in 0..60 {
        world.step();
    }
    let grid = world.current_grid();
    for x in 0..4 {
        assert_eq!(grid.get(x, 1).element(), Element::Oil, "{grid:?}");
        assert_eq!(grid.get(x, 2).element(), Element::Water, "{grid:?}");
    }
}

#[test]
fn steam_collects_under_a_stone_ceiling() {
    let mut world = World::new(4, 5, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "RRRR", //
        "....", //
        "....", //
        "VVVV", //
        "RRRR",
    ]));
    for _ in 0..45 {
        world.step();
    }
    let grid = world.current_grid();
    assert_eq!(grid.count_of(Element::Steam), 4, "{grid:?}");
    for x in 0..4 {
        assert_eq!(grid.get(x, 1).element(), Element::Steam, "{grid:?}");
    }
}

#[test]
fn acid_eats_into_a_stone_floor() {
    let mut world = World::new(4, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        ".A..", //
        "RRRR", //
        "....", //
        "....",
    ]));
    for _ in 0..100 {
        world.step();
    }
    let grid = world.current_grid();
    assert!(
        grid.count_of(Element::Stone) < 4,
        "acid never dissolved any stone:\n{grid:?}"
    );
    assert_eq!(grid.count_of(Element::Acid), 1, "{grid:?}");
}

#[test]
fn gunpowder_line_chain_ignites_from_one_flame() {
    let mut world = World::new(6, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "......", //
        "......", //
        "PPFPPP", //
        "RRRRRR",
    ]));
    for _ in 0..60 {
        world.step();
    }
    let grid = world.current_grid();
    assert_eq!(
        grid.count_of(Element::Gunpowder),
        0,
        "unburnt grains remain:\n{grid:?}"
    );
}

#[test]
fn lava_pool_cools_into_stone() {
    let mut world = World::new(4, 3, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "....", //
        "LL..", //
        "RRRR",
    ]));
    let mut frames = 0u32;
    while world.current_grid().count_of(Element::Lava) > 0 {
        world.step();
        frames += 1;
        assert!(frames < 8000, "lava still molten after {frames} frames");
    }
    let grid = world.current_grid();
    assert_eq!(grid.count_of(Element::Stone), 6, "{grid:?}");
}
