//! Falling-powder simulation rules and CPU reference world.
//!
//! A block cellular automaton over 2x2 Margolus blocks: gravity, liquid
//! flow, gas buoyancy, and an inter-element reaction table, all expressed as
//! a pure function of one block so the same rules run unchanged on a
//! massively parallel device. This crate is framework-agnostic; the `engine`
//! crate ports the kernel to WGSL and drives it with wgpu.

pub mod cell;
pub mod grid;
pub mod hash;
pub mod kernel;
pub mod material;
pub mod movement;
pub mod reactions;
pub mod schedule;
pub mod world;

pub use cell::{Cell, EMPTY};
pub use grid::Grid;
pub use material::Element;
pub use schedule::PassParams;
pub use world::{ConfigError, World, PENDING_BIT};
