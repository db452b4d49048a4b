//! CPU reference simulation: the full frame loop over a ping-pong grid pair.
//!
//! This mirrors the GPU scheduler pass for pass - same extended block tiling,
//! same tick counters, same conditional-write brush ingestion - so a frame
//! stepped here is bit-identical to a frame stepped on the device. The GPU
//! path exists for throughput; this path exists for tests and debugging.

use crate::cell::{Cell, EMPTY};
use crate::grid::Grid;
use crate::kernel::update_block;
use crate::schedule::{frame_passes, PassParams};

/// Pending-buffer sentinel: the host sets bit 31 on staged brush writes.
pub const PENDING_BIT: u32 = 0x8000_0000;

/// Construction-time misconfiguration; always the host's bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Width and height must both be at least 2.
    GridTooSmall { width: u32, height: u32 },
    /// The pass count must be a positive multiple of 4.
    BadPassCount { passes_per_frame: u32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is smaller than 2x2")
            }
            ConfigError::BadPassCount { passes_per_frame } => {
                write!(f, "passes_per_frame {passes_per_frame} is not a positive multiple of 4")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn validate_config(width: u32, height: u32, passes_per_frame: u32) -> Result<(), ConfigError> {
    if width < 2 || height < 2 {
        return Err(ConfigError::GridTooSmall { width, height });
    }
    if passes_per_frame == 0 || passes_per_frame % 4 != 0 {
        return Err(ConfigError::BadPassCount { passes_per_frame });
    }
    Ok(())
}

/// Run one pass: apply the block kernel over the extended tiling for the
/// pass's offset, writing every cell of `dst` exactly once.
///
/// Block bases run over `(2i - ox, 2j - oy)`, so the row/column left orphaned
/// by offset 1 and any trailing edge land in partial blocks, whose in-bounds
/// cells are copied through unchanged.
pub fn run_pass(src: &Grid, dst: &mut Grid, params: &PassParams) {
    let (ox, oy) = params.offset;
    let nbx = (src.width() + ox + 1) / 2;
    let nby = (src.height() + oy + 1) / 2;
    for j in 0..nby {
        for i in 0..nbx {
            let bx = (2 * i) as i32 - ox as i32;
            let by = (2 * j) as i32 - oy as i32;
            process_block(src, dst, bx, by, params);
        }
    }
}

fn process_block(src: &Grid, dst: &mut Grid, bx: i32, by: i32, params: &PassParams) {
    const LANES: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];
    let full = LANES
        .iter()
        .all(|&(dx, dy)| src.in_bounds(bx + dx, by + dy));
    if !full {
        for (dx, dy) in LANES {
            let (x, y) = (bx + dx, by + dy);
            if src.in_bounds(x, y) {
                dst.set(x as u32, y as u32, src.get(x as u32, y as u32));
            }
        }
        return;
    }
    let cells = [
        src.get(bx as u32, by as u32),
        src.get(bx as u32 + 1, by as u32),
        src.get(bx as u32, by as u32 + 1),
        src.get(bx as u32 + 1, by as u32 + 1),
    ];
    let out = update_block(cells, bx, by, params.tick, params.lateral_only);
    dst.set(bx as u32, by as u32, out[0]);
    dst.set(bx as u32 + 1, by as u32, out[1]);
    dst.set(bx as u32, by as u32 + 1, out[2]);
    dst.set(bx as u32 + 1, by as u32 + 1, out[3]);
}

/// The CPU world: ping-pong grids, a pending brush buffer, and the frame
/// counter that drives the schedule.
pub struct World {
    grids: [Grid; 2],
    pending: Vec<u32>,
    any_pending: bool,
    frame: u32,
    passes_per_frame: u32,
}

impl World {
    pub fn new(width: u32, height: u32, passes_per_frame: u32) -> Result<Self, ConfigError> {
        validate_config(width, height, passes_per_frame)?;
        Ok(World {
            grids: [Grid::new(width, height), Grid::new(width, height)],
            pending: vec![0; (width * height) as usize],
            any_pending: false,
            frame: 0,
            passes_per_frame,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.grids[0].width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.grids[0].height()
    }

    #[inline]
    pub fn frame_counter(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn passes_per_frame(&self) -> u32 {
        self.passes_per_frame
    }

    /// Which grid the colorizer would read. The pass count is even, so every
    /// completed frame lands back in the same buffer.
    #[inline]
    pub fn current_index(&self) -> usize {
        (self.frame.wrapping_mul(self.passes_per_frame) % 2) as usize
    }

    #[inline]
    pub fn current_grid(&self) -> &Grid {
        &self.grids[self.current_index()]
    }

    pub fn particle_count(&self) -> u32 {
        self.current_grid().particle_count()
    }

    /// Seed the current grid directly, bypassing the brush path. Intended for
    /// scenario setup; `clear` + `paint` is the simulated route.
    pub fn set_cells(&mut self, grid: Grid) {
        assert_eq!(
            (grid.width(), grid.height()),
            (self.width(), self.height()),
            "seed grid size mismatch"
        );
        let idx = self.current_index();
        self.grids[idx] = grid;
    }

    /// Stage one brush cell. Out-of-bounds entries are dropped silently (the
    /// host's stroke rasterizer legitimately overshoots at grid edges). An
    /// entry with element 0 is an eraser.
    pub fn paint(&mut self, x: u32, y: u32, cell: Cell) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let idx = (y * self.width() + x) as usize;
        self.pending[idx] = (cell.0 & !PENDING_BIT) | PENDING_BIT;
        self.any_pending = true;
    }

    /// Zero both grids and the pending buffer; restart the frame counter.
    pub fn clear(&mut self) {
        self.grids[0].fill(EMPTY);
        self.grids[1].fill(EMPTY);
        self.pending.fill(0);
        self.any_pending = false;
        self.frame = 0;
    }

    /// Advance one frame: merge pending brush writes, then run the frame's
    /// scheduled passes, alternating the ping-pong pair every pass.
    pub fn step(&mut self) {
        if self.any_pending {
            self.apply_pending();
        }
        for params in frame_passes(self.frame, self.passes_per_frame) {
            let read = (params.tick % 2) as usize;
            let [g0, g1] = &mut self.grids;
            let (src, dst) = if read == 0 { (&*g0, g1) } else { (&*g1, g0) };
            run_pass(src, dst, &params);
        }
        self.frame = self.frame.wrapping_add(1);
    }

    /// Conditional-write merge: an eraser always lands, anything else only
    /// over an empty live cell, so fast brushing cannot punch through a
    /// falling pile. Every applied slot is drained back to zero.
    fn apply_pending(&mut self) {
        let idx = self.current_index();
        let live = &mut self.grids[idx];
        for (slot, cell) in self.pending.iter_mut().zip(live.cells_mut().iter_mut()) {
            if *slot & PENDING_BIT != 0 {
                let value = Cell(*slot & !PENDING_BIT);
                if value.is_empty() || cell.is_empty() {
                    *cell = value;
                }
                *slot = 0;
            }
        }
        self.any_pending = false;
    }
}
