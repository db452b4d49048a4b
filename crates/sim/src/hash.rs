//! Stateless integer hashing - the only source of randomness in the kernel.
//!
//! Every random decision hashes a seed built from the block position and the
//! combined frame-and-pass counter, so two runs over the same state take
//! identical decisions, on the CPU and on the GPU alike. No PRNG state ever
//! crosses the kernel boundary. The constants here are mirrored in
//! `update_blocks.wgsl` and must not drift.

/// Two rounds of xorshift-multiply. Good avalanche for grid coordinates.
#[inline]
pub const fn hash(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x45d9f3b);
    x ^= x >> 16;
    x = x.wrapping_mul(0x45d9f3b);
    x ^= x >> 16;
    x
}

const TICK_MIX: u32 = 0x9e37_79b9;
const BX_MIX: u32 = 0x85eb_ca6b;
const BY_MIX: u32 = 0xc2b2_ae35;
const LANE_MIX: u32 = 0x27d4_eb2f;

/// Random words scoped to one 2x2 block for one pass.
///
/// Each rule draws from its own stream (a distinct salt), and within a rule
/// each of the four cell lanes draws independently, so rule outcomes do not
/// perturb each other.
#[derive(Clone, Copy)]
pub struct BlockRng {
    seed: u32,
}

impl BlockRng {
    /// `bx`/`by` are the block base coordinates in cells (negative on the
    /// orphan edge), `tick` the combined frame-and-pass counter.
    #[inline]
    pub fn new(bx: i32, by: i32, tick: u32) -> Self {
        let seed = hash(
            tick.wrapping_mul(TICK_MIX)
                ^ (bx as u32).wrapping_mul(BX_MIX)
                ^ (by as u32).wrapping_mul(BY_MIX),
        );
        BlockRng { seed }
    }

    /// One word per (rule salt, cell lane).
    #[inline]
    pub fn word(&self, salt: u32, lane: u32) -> u32 {
        hash(self.seed ^ salt.wrapping_add(lane.wrapping_mul(LANE_MIX)))
    }

    /// True with probability `pct`/100.
    #[inline]
    pub fn percent(&self, salt: u32, lane: u32, pct: u32) -> bool {
        self.word(salt, lane) % 100 < pct
    }

    /// True with probability 1/n.
    #[inline]
    pub fn one_in(&self, salt: u32, lane: u32, n: u32) -> bool {
        self.word(salt, lane) % n == 0
    }

    /// Uniform in `lo..=hi` (both at most 255).
    #[inline]
    pub fn range(&self, salt: u32, lane: u32, lo: u32, hi: u32) -> u8 {
        (lo + self.word(salt, lane) % (hi - lo + 1)) as u8
    }
}
