//! wgpu compute core for the falling-powder simulator.
//!
//! The host owns the window, the device, and the frame tick; this crate owns
//! the cell buffers and records one frame of compute work per [`Simulation::step`]:
//! a conditional-write brush merge followed by the frame's shuffled Margolus
//! block passes over a ping-pong buffer pair. The block rules live in the
//! `sim` crate and are ported to WGSL in `shaders/update_blocks.wgsl`.

pub mod readback;
pub mod simulation;

pub use simulation::Simulation;

/// Construction errors surfaced to the host. Runtime device trouble is
/// logged and absorbed; it never interrupts the frame loop.
#[derive(Debug)]
pub enum EngineError {
    /// Host misconfiguration (grid below 2x2, pass count not a positive
    /// multiple of 4).
    InvalidConfig(sim::ConfigError),
    /// The device rejected buffer allocation or pipeline compilation.
    DeviceInitFailure(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidConfig(e) => write!(f, "invalid configuration: {e}"),
            EngineError::DeviceInitFailure(e) => write!(f, "device initialization failed: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::InvalidConfig(e) => Some(e),
            EngineError::DeviceInitFailure(_) => None,
        }
    }
}

impl From<sim::ConfigError> for EngineError {
    fn from(e: sim::ConfigError) -> Self {
        EngineError::InvalidConfig(e)
    }
}
