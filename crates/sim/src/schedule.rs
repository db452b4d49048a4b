//! Per-frame pass schedule: shuffled Margolus offsets, gravity/lateral
//! halves, and the combined tick counter that drives ping-pong and RNG.
//!
//! Shared by the CPU world and the GPU scheduler so both record exactly the
//! same sequence of passes for a given frame.

use crate::hash::hash;

/// The four Margolus offsets. Any fixed visit order produces directional
/// bias and horizontal banding, so each sweep of four passes draws a fresh
/// permutation.
pub const OFFSETS: [(u32, u32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Everything one pass needs: the offset tiling, the tick that seeds the
/// block RNG and selects the ping-pong direction, and whether the gravity
/// phase is disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassParams {
    pub offset: (u32, u32),
    pub tick: u32,
    pub lateral_only: bool,
}

/// Uniformly random permutation of the four offsets for one sweep,
/// Fisher-Yates driven by successive hash words.
pub fn offset_order(frame: u32, sweep: u32) -> [(u32, u32); 4] {
    let mut order = OFFSETS;
    let mut w = hash(frame.wrapping_mul(2).wrapping_add(sweep));
    for i in (1..4usize).rev() {
        let j = (w % (i as u32 + 1)) as usize;
        order.swap(i, j);
        w = hash(w);
    }
    order
}

/// The frame's full pass list. `passes_per_frame` must be a positive
/// multiple of 4; the first half runs the full kernel, the second half is
/// lateral-only so liquids level without extra falling.
pub fn frame_passes(frame: u32, passes_per_frame: u32) -> Vec<PassParams> {
    debug_assert!(passes_per_frame > 0 && passes_per_frame % 4 == 0);
    let mut out = Vec::with_capacity(passes_per_frame as usize);
    for pass in 0..passes_per_frame {
        let order = offset_order(frame, pass / 4);
        out.push(PassParams {
            offset: order[(pass % 4) as usize],
            tick: frame.wrapping_mul(passes_per_frame).wrapping_add(pass),
            lateral_only: pass >= passes_per_frame / 2,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sweep_is_a_permutation() {
        for frame in 0..200 {
            for sweep in 0..6 {
                let mut order = offset_order(frame, sweep);
                order.sort();
                let mut expect = OFFSETS;
                expect.sort();
                assert_eq!(order, expect);
            }
        }
    }

    #[test]
    fn shuffle_is_not_constant() {
        let first = offset_order(0, 0);
        assert!((1..100).any(|f| offset_order(f, 0) != first));
    }

    #[test]
    fn halves_split_gravity_and_lateral() {
        let passes = frame_passes(3, 24);
        assert_eq!(passes.len(), 24);
        assert!(passes[..12].iter().all(|p| !p.lateral_only));
        assert!(passes[12..].iter().all(|p| p.lateral_only));
        // ticks are consecutive so ping-pong alternates every pass
        for (i, p) in passes.iter().enumerate() {
            assert_eq!(p.tick, 3 * 24 + i as u32);
        }
    }

    #[test]
    fn each_sweep_covers_all_offsets() {
        let passes = frame_passes(7, 12);
        for sweep in 0..3 {
            let mut offs: Vec<_> = passes[sweep * 4..sweep * 4 + 4]
                .iter()
                .map(|p| p.offset)
                .collect();
            offs.sort();
            assert_eq!(offs, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        }
    }
}
