//! The block kernel: one pure update of a 2x2 Margolus block.

use crate::cell::Cell;
use crate::hash::BlockRng;
use crate::movement;
use crate::reactions;

/// Update one block. `bx`/`by` are the block base coordinates (top-left cell),
/// `tick` the combined frame-and-pass counter. Reads and writes nothing
/// outside the four cells passed in; all randomness derives from
/// `(bx, by, tick)`, so the update is a pure function.
///
/// Lane order is tl, tr, bl, br. Reactions run first, then movement re-reads
/// the (possibly transformed) element identities.
pub fn update_block(mut cells: [Cell; 4], bx: i32, by: i32, tick: u32, lateral_only: bool) -> [Cell; 4] {
    let rng = BlockRng::new(bx, by, tick);
    reactions::apply_reactions(&mut cells, &rng);
    movement::apply_movement(&mut cells, &rng, lateral_only);
    cells
}
