//! Fixed-timestep game loop
//!
//! Logical updates run at a fixed rate independent of the render rate.
//! Rendering is requested through a [`RenderSink`] with a snapshot of the
//! simulation, never performed on the loop thread.

mod error;
mod fixed_step;
mod render;
mod runner;
mod throughput;


pub use error::{LoopError, SimulationError};
pub use fixed_step::FixedStep;
pub use render::{CountingSink, Frame, RenderSink, WatchRenderSink, render_channel};
pub use runner::{GameLoop, LoopHandle, LoopReport, Simulation, StepOutcome, StopToken, spawn};
pub use throughput::{Throughput, ThroughputCounter};

use crate::context::LoopSettings;

/// Reject settings the loop cannot run with
pub fn check_loop_settings(settings: &LoopSettings) -> Result<(), &'static str> {
    if settings.updates_per_second == 0 {
        return Err("updates_per_second must be positive");
    }
    if settings.frames_per_second == 0 {
        return Err("frames_per_second must be positive");
    }
    if settings.max_frame_delta_ms == 0 {
        return Err("max_frame_delta_ms must be positive");
    }
    if settings.throughput_window_ms == 0 {
        return Err("throughput_window_ms must be positive");
    }
    Ok(())
}
