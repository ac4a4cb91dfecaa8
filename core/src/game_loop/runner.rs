use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{
    FixedStep, LoopError, RenderSink, SimulationError, Throughput, ThroughputCounter,
    check_loop_settings,
};
use crate::context::{LoopSettings, SystemClock, TimeSource};

/// The logical world driven by the loop
pub trait Simulation {
    /// What a renderer needs to draw one frame
    type Snapshot;

    fn update(&mut self) -> Result<(), SimulationError>;

    fn snapshot(&self) -> Self::Snapshot;
}

/// Cooperative cancellation shared with the loop thread
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Work performed by one loop iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub updates: u32,
    pub renders: u32,
    /// Elapsed time exceeded the per-measurement cap and was truncated
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    pub total_updates: u64,
    pub total_renders: u64,
    pub iterations: u64,
    pub last_throughput: Throughput,
}

/// Fixed-timestep scheduler.
///
/// Each iteration measures the time since the previous one, adds it to the
/// update and render debts and then pays off every whole unit owed, so a
/// late iteration runs several updates back to back. Elapsed time is capped
/// at `max_frame_delta_ms` per measurement; the excess after a stall is
/// dropped rather than replayed.
pub struct GameLoop<C: TimeSource> {
    clock: C,
    updates: FixedStep,
    renders: FixedStep,
    previous: Duration,
    max_frame_delta: Duration,
    idle_sleep: Duration,
    throughput: ThroughputCounter,
    stop: StopToken,
    report: LoopReport,
}

impl<C: TimeSource> GameLoop<C> {
    pub fn new(settings: &LoopSettings, clock: C) -> Result<Self, LoopError> {
        check_loop_settings(settings).map_err(|reason| LoopError::InvalidSettings { reason })?;
        let now = clock.now();
        Ok(Self {
            updates: FixedStep::new(settings.updates_per_second),
            renders: FixedStep::new(settings.frames_per_second),
            previous: now,
            max_frame_delta: Duration::from_millis(settings.max_frame_delta_ms),
            idle_sleep: Duration::from_micros(settings.idle_sleep_us),
            throughput: ThroughputCounter::new(
                Duration::from_millis(settings.throughput_window_ms),
                now,
            ),
            stop: StopToken::default(),
            report: LoopReport::default(),
            clock,
        })
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn throughput(&self) -> watch::Receiver<Throughput> {
        self.throughput.subscribe()
    }

    pub fn report(&self) -> LoopReport {
        self.report
    }

    /// Run one iteration: measure, pay off owed updates, then owed redraws.
    pub fn step<S, R>(&mut self, sim: &mut S, sink: &mut R) -> Result<StepOutcome, LoopError>
    where
        S: Simulation,
        R: RenderSink<S::Snapshot>,
    {
        let now = self.clock.now();
        let mut elapsed = now.saturating_sub(self.previous);
        self.previous = now;

        let mut outcome = StepOutcome::default();
        if elapsed > self.max_frame_delta {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                cap_ms = self.max_frame_delta.as_millis() as u64,
                "Loop stalled, dropping excess time"
            );
            elapsed = self.max_frame_delta;
            outcome.clamped = true;
        }

        self.updates.accumulate(elapsed);
        self.renders.accumulate(elapsed);

        while self.updates.try_consume() {
            let tick = self.report.total_updates + 1;
            if let Err(source) = sim.update() {
                error!(tick, error = %source, "Logical update failed, stopping loop");
                return Err(LoopError::Update { tick, source });
            }
            self.report.total_updates = tick;
            self.throughput.record_update();
            outcome.updates += 1;
        }

        while self.renders.try_consume() {
            let frame = self.report.total_renders + 1;
            sink.request_redraw(frame, sim.snapshot());
            self.report.total_renders = frame;
            self.throughput.record_frame();
            outcome.renders += 1;
        }

        if let Some(window) = self.throughput.roll(now) {
            debug!(ups = window.updates, fps = window.frames, "Loop throughput");
            self.report.last_throughput = window;
        }

        self.report.iterations += 1;
        Ok(outcome)
    }

    /// Iterate until the stop token fires or an update fails.
    pub fn run<S, R>(&mut self, sim: &mut S, sink: &mut R) -> Result<LoopReport, LoopError>
    where
        S: Simulation,
        R: RenderSink<S::Snapshot>,
    {
        while !self.stop.is_stopped() {
            let outcome = self.step(sim, sink)?;
            if outcome.updates == 0 && outcome.renders == 0 && !self.idle_sleep.is_zero() {
                std::thread::sleep(self.idle_sleep);
            }
        }
        Ok(self.report)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dedicated loop thread
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a loop running on its own thread
pub struct LoopHandle {
    stop: StopToken,
    throughput: watch::Receiver<Throughput>,
    join: JoinHandle<Result<LoopReport, LoopError>>,
}

impl LoopHandle {
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn throughput(&self) -> watch::Receiver<Throughput> {
        self.throughput.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loop thread to exit and return its result
    pub fn join(self) -> Result<LoopReport, LoopError> {
        self.join.join().map_err(|_| LoopError::Panicked)?
    }

    pub fn stop_and_join(self) -> Result<LoopReport, LoopError> {
        self.stop.stop();
        self.join()
    }
}

/// Start a loop on a dedicated thread with the wall clock.
///
/// `build` runs on the loop thread, so the simulation and sink may hold
/// single-threaded state.
pub fn spawn<S, R, F>(settings: &LoopSettings, build: F) -> Result<LoopHandle, LoopError>
where
    S: Simulation,
    R: RenderSink<S::Snapshot>,
    F: FnOnce() -> (S, R) + Send + 'static,
{
    let mut game_loop = GameLoop::new(settings, SystemClock::new())?;
    let stop = game_loop.stop_token();
    let throughput = game_loop.throughput();
    let ups = settings.updates_per_second;
    let fps = settings.frames_per_second;

    let join = std::thread::Builder::new()
        .name("cadence-loop".to_string())
        .spawn(move || {
            let (mut sim, mut sink) = build();
            info!(ups, fps, "Game loop started");
            let result = game_loop.run(&mut sim, &mut sink);
            match &result {
                Ok(report) => info!(
                    updates = report.total_updates,
                    renders = report.total_renders,
                    "Game loop stopped"
                ),
                Err(e) => error!(error = %e, "Game loop terminated"),
            }
            result
        })
        .map_err(LoopError::Spawn)?;

    Ok(LoopHandle {
        stop,
        throughput,
        join,
    })
}
