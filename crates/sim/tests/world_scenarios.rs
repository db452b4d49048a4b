//! End-to-end scenarios on the CPU reference world: literal grids stepped
//! through full frames, plus the structural pass/scheduler properties.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim::cell::{Cell, EMPTY};
use sim::schedule::{PassParams, OFFSETS};
use sim::world::run_pass;
use sim::{ConfigError, Element, Grid, World};

// ---- construction ---------------------------------------------------------

#[test]
fn construction_rejects_bad_configs() {
    assert!(matches!(
        World::new(1, 8, 24),
        Err(ConfigError::GridTooSmall { width: 1, height: 8 })
    ));
    assert!(matches!(
        World::new(8, 8, 10),
        Err(ConfigError::BadPassCount { passes_per_frame: 10 })
    ));
    assert!(World::new(8, 8, 0).is_err());
    assert!(World::new(2, 2, 4).is_ok());
}

// ---- falling --------------------------------------------------------------

#[test]
fn lone_sand_grain_falls_to_the_floor() {
    let mut world = World::new(4, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        ".S..", //
        "....", //
        "....", //
        "....",
    ]));
    for _ in 0..5 {
        world.step();
    }
    let grid = world.current_grid();
    assert_eq!(grid.particle_count(), 1, "{grid:?}");
    assert_eq!(grid.get(1, 3).element(), Element::Sand, "{grid:?}");
}

#[test]
fn full_water_row_on_stone_is_stable() {
    let mut world = World::new(8, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "........",
        "........",
        "WWWWWWWW",
        "RRRRRRRR",
    ]));
    for _ in 0..60 {
        world.step();
    }
    let grid = world.current_grid();
    for x in 0..8 {
        assert_eq!(grid.get(x, 2).element(), Element::Water, "{grid:?}");
        assert_eq!(grid.get(x, 3).element(), Element::Stone, "{grid:?}");
    }
    assert_eq!(grid.count_of(Element::Water), 8);
}

#[test]
fn sand_sinks_through_a_water_column() {
    let mut world = World::new(4, 8, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "SSSS", //
        "WWWW", //
        "WWWW", //
        "WWWW", //
        "WWWW", //
        "WWWW", //
        "WWWW", //
        "RRRR",
    ]));
    for _ in 0..120 {
        world.step();
    }
    let grid = world.current_grid();
    // conservation through the exchange
    assert_eq!(grid.count_of(Element::Sand), 4, "{grid:?}");
    assert_eq!(grid.count_of(Element::Water), 24, "{grid:?}");
    assert_eq!(grid.count_of(Element::Stone), 4, "{grid:?}");
    for x in 0..4 {
        assert_eq!(grid.get(x, 6).element(), Element::Sand, "{grid:?}");
        for y in 0..6 {
            assert_eq!(grid.get(x, y).element(), Element::Water, "{grid:?}");
        }
    }
}

#[test]
fn settled_columns_are_density_sorted() {
    let mut world = World::new(8, 8, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "SSSSSSSS",
        "SSSSSSSS",
        "........",
        "WWWWWWWW",
        "WWWWWWWW",
        "........",
        "........",
        "RRRRRRRR",
    ]));
    for _ in 0..200 {
        world.step();
    }
    let grid = world.current_grid();
    assert_eq!(grid.count_of(Element::Sand), 16);
    assert_eq!(grid.count_of(Element::Water), 16);
    for x in 0..8 {
        for y in 0..7 {
            let (top, bot) = (grid.get(x, y).element(), grid.get(x, y + 1).element());
            if top == Element::Stone || bot == Element::Stone {
                continue;
            }
            assert!(
                top.density() <= bot.density(),
                "column {x} inverted at row {y}:\n{grid:?}"
            );
        }
    }
}

#[test]
fn fire_without_fuel_decays_to_nothing() {
    let mut world = World::new(4, 4, 24).unwrap();
    world.set_cells(Grid::from_rows(&[
        "FFFF", //
        "FFFF", //
        "FFFF", //
        "FFFF",
    ]));
    let mut frames = 0u32;
    while world.particle_count() > 0 {
        world.step();
        frames += 1;
        assert!(frames < 4000, "fire still alive after {frames} frames");
    }
}

// ---- pass structure -------------------------------------------------------

#[test]
fn orphan_edge_cells_survive_an_offset_pass() {
    let src = Grid::from_rows(&[
        "S..", //
        "...", //
        "...",
    ]);
    let mut dst = Grid::new(3, 3);
    run_pass(
        &src,
        &mut dst,
        &PassParams {
            offset: (1, 1),
            tick: 0,
            lateral_only: false,
        },
    );
    assert_eq!(dst.get(0, 0).element(), Element::Sand, "{dst:?}");
    assert_eq!(dst, src);
}

#[test]
fn every_cell_is_written_exactly_once_per_pass() {
    // an odd-sized grid of stones with unique colors: stones never move, so
    // a duplicated or dropped write shows up as a color mismatch
    let mut src = Grid::new(7, 5);
    for y in 0..5 {
        for x in 0..7 {
            src.set(x, y, Cell::new(Element::Stone, (y * 7 + x) as u8, 0));
        }
    }
    let marker = Cell::new(Element::Bomb, 0xab, 0xcd);
    for offset in OFFSETS {
        let mut dst = Grid::new(7, 5);
        dst.fill(marker);
        run_pass(
            &src,
            &mut dst,
            &PassParams {
                offset,
                tick: 9,
                lateral_only: false,
            },
        );
        assert!(!dst.cells().contains(&marker), "offset {offset:?} skipped a cell");
        assert_eq!(dst, src, "offset {offset:?}");
    }
}

#[test]
fn passes_preserve_the_cell_multiset_without_reactions() {
    // sand + water + empty only: no reaction applies, so a pass is a pure
    // permutation of the grid
    let mut rng = StdRng::seed_from_u64(7);
    let mut src = Grid::new(10, 9);
    for y in 0..9 {
        for x in 0..10 {
            let cell = match rng.gen_range(0..3) {
                0 => Cell::new(Element::Sand, rng.gen(), 0),
                1 => Cell::new(Element::Water, rng.gen(), 0),
                _ => EMPTY,
            };
            src.set(x, y, cell);
        }
    }
    for (i, offset) in OFFSETS.into_iter().enumerate() {
        let mut dst = Grid::new(10, 9);
        run_pass(
            &src,
            &mut dst,
            &PassParams {
                offset,
                tick: i as u32,
                lateral_only: false,
            },
        );
        let mut before: Vec<u32> = src.cells().iter().map(|c| c.0).collect();
        let mut after: Vec<u32> = dst.cells().iter().map(|c| c.0).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after, "offset {offset:?} not a permutation");
    }
}

#[test]
fn identical_worlds_stay_identical() {
    let elements = [
        Element::Sand,
        Element::Water,
        Element::Stone,
        Element::Oil,
        Element::Wood,
        Element::Fire,
        Element::Smoke,
        Element::Steam,
        Element::Lava,
        Element::Acid,
        Element::Gunpowder,
        Element::Glass,
        Element::Bomb,
    ];
    let seed_grid = |rng: &mut StdRng| {
        let mut grid = Grid::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                if rng.gen_bool(0.4) {
                    let e = elements[rng.gen_range(0..elements.len())];
                    let aux = match e {
                        Element::Fire => 150,
                        Element::Steam | Element::Smoke => 80,
                        Element::Lava => 200,
                        Element::Acid => 180,
                        _ => 0,
                    };
                    grid.set(x, y, Cell::new(e, rng.gen(), aux));
                }
            }
        }
        grid
    };
    let mut a = World::new(32, 32, 12).unwrap();
    let mut b = World::new(32, 32, 12).unwrap();
    a.set_cells(seed_grid(&mut StdRng::seed_from_u64(99)));
    b.set_cells(seed_grid(&mut StdRng::seed_from_u64(99)));
    for frame in 0..8 {
        a.step();
        b.step();
        assert_eq!(
            a.current_grid().cells(),
            b.current_grid().cells(),
            "diverged at frame {frame}"
        );
    }
}

// ---- reactions at grid scale ----------------------------------------------

#[test]
fn detonation_stays_inside_its_block_for_one_pass() {
    let mut src = Grid::new(6, 6);
    src.set(2, 2, Cell::new(Element::Bomb, 0, 0));
    src.set(3, 2, Cell::new(Element::Fire, 0, 120));
    let mut dst = Grid::new(6, 6);
    run_pass(
        &src,
        &mut dst,
        &PassParams {
            offset: (0, 0),
            tick: 0,
            lateral_only: false,
        },
    );
    // the detonating block covers (2..=3, 2..=3); nothing may leak past it
    for y in 0..6 {
        for x in 0..6 {
            let inside = (2..=3).contains(&x) && (2..=3).contains(&y);
            if !inside {
                assert_eq!(dst.get(x, y), EMPTY, "leak at ({x}, {y}):\n{dst:?}");
            }
        }
    }
    assert_eq!(dst.get(2, 2).element(), Element::Fire);
    assert_eq!(dst.get(2, 2).aux(), 250);
    assert_eq!(dst.get(3, 2).element(), Element::Fire);
    assert_eq!(dst.get(3, 2).aux(), 250);
    assert_eq!(dst.get(2, 3).element(), Element::Smoke);
    assert_eq!(dst.get(3, 3).element(), Element::Smoke);
}

#[test]
fn fire_sharing_a_block_with_water_is_quenched() {
    let mut src = Grid::new(4, 4);
    src.set(0, 0, Cell::new(Element::Water, 0, 0));
    src.set(1, 0, Cell::new(Element::Water, 0, 0));
    src.set(0, 1, Cell::new(Element::Water, 0, 0));
    src.set(1, 1, Cell::new(Element::Fire, 0, 200));
    let mut dst = Grid::new(4, 4);
    run_pass(
        &src,
        &mut dst,
        &PassParams {
            offset: (0, 0),
            tick: 0,
            lateral_only: false,
        },
    );
    assert_eq!(dst.count_of(Element::Fire), 0, "{dst:?}");
    assert!(dst.count_of(Element::Steam) >= 1, "{dst:?}");
}

// ---- brush ingestion ------------------------------------------------------

#[test]
fn brush_lands_only_on_empty_cells_but_erasers_always_cut() {
    let mut world = World::new(4, 4, 12).unwrap();
    let mut stones = Grid::new(4, 4);
    stones.fill(Cell::new(Element::Stone, 5, 0));
    world.set_cells(stones);

    world.paint(2, 2, Cell::new(Element::Sand, 0, 0)); // blocked: cell occupied
    world.paint(1, 1, EMPTY); // eraser: always lands
    world.step();

    let grid = world.current_grid();
    assert_eq!(grid.get(2, 2).element(), Element::Stone, "{grid:?}");
    assert_eq!(grid.get(1, 1), EMPTY, "{grid:?}");
    assert_eq!(grid.particle_count(), 15);
}

#[test]
fn out_of_bounds_brush_entries_are_dropped() {
    let mut world = World::new(4, 4, 12).unwrap();
    world.paint(4, 0, Cell::new(Element::Sand, 0, 0));
    world.paint(0, 17, Cell::new(Element::Sand, 0, 0));
    world.step();
    assert_eq!(world.particle_count(), 0);
}

#[test]
fn painted_sand_appears_and_falls() {
    let mut world = World::new(4, 4, 24).unwrap();
    world.paint(1, 0, Cell::new(Element::Sand, 3, 0));
    for _ in 0..5 {
        world.step();
    }
    let grid = world.current_grid();
    assert_eq!(grid.particle_count(), 1);
    assert_eq!(grid.get(1, 3).element(), Element::Sand);
    assert_eq!(grid.get(1, 3).color(), 3);
}

#[test]
fn clear_resets_everything() {
    let mut world = World::new(4, 4, 12).unwrap();
    world.paint(1, 1, Cell::new(Element::Sand, 0, 0));
    world.step();
    world.step();
    assert!(world.particle_count() > 0);
    assert_eq!(world.frame_counter(), 2);
    world.clear();
    assert_eq!(world.particle_count(), 0);
    assert_eq!(world.frame_counter(), 0);
    world.step();
    assert_eq!(world.particle_count(), 0);
}
