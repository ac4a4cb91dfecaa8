use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use cadence_core::boss::Phase;
use cadence_core::boss::roric::{RoricDefinition, RoricPhase};
use cadence_core::context::{AppConfig, AppConfigExt, DebugSettings, SystemClock, TimeSource};
use cadence_core::events::{
    EncounterId, EnemyKind, EnemyRef, EventKind, GameEvent, PhaseChange, Rect, event_channel,
};
use cadence_core::game_loop::{
    self, CountingSink, GameLoop, LoopHandle, LoopReport, render_channel,
};
use cadence_core::headless::HeadlessSession;
use cadence_core::presentation::PresentationCall;
use cadence_core::state::{FrameSnapshot, GameState, MenuState, PlayingState, StateManager};
use cadence_types::LoopSettings;
use tracing::{error, info};

/// Load the Roric definition from an explicit file, or from the configured
/// encounter directory with built-in defaults as the fallback.
pub fn load_definition(
    config: &AppConfig,
    path: Option<&Path>,
) -> Result<RoricDefinition, String> {
    let definition = match path {
        Some(path) => RoricDefinition::load(path),
        None => RoricDefinition::load_from_dir(config.encounter_dir_path().as_deref()),
    };
    definition.map_err(|e| e.to_string())
}

fn loop_settings(config: &AppConfig, ups: Option<u32>, fps: Option<u32>) -> LoopSettings {
    let mut settings = config.game_loop.clone();
    if let Some(ups) = ups {
        settings.updates_per_second = ups;
    }
    if let Some(fps) = fps {
        settings.frames_per_second = fps;
    }
    settings
}

/// Arena entry followed by engagement of the Roric fight
fn engage_roric() -> [GameEvent; 2] {
    [
        GameEvent::FightInitiated {
            encounter: EncounterId::Roric,
        },
        GameEvent::EncounterEngaged {
            encounter: EncounterId::Roric,
        },
    ]
}

fn roric_ref() -> EnemyRef {
    EnemyRef::new(
        1,
        EnemyKind::Roric,
        Rect {
            x: 608.0,
            y: 240.0,
            width: 64.0,
            height: 96.0,
        },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// run
// ─────────────────────────────────────────────────────────────────────────────

/// Drive a live session on the wall clock until `seconds` pass or ctrl-c.
pub async fn run(
    config: &AppConfig,
    seconds: f64,
    ups: Option<u32>,
    fps: Option<u32>,
    engage: bool,
) -> Result<(), String> {
    let settings = loop_settings(config, ups, fps);
    let definition = load_definition(config, None)?;
    let debug = config.debug.clone();

    let (sender, inbox) = event_channel();
    let (sink, mut frames) = render_channel::<FrameSnapshot>();

    let handle = game_loop::spawn(&settings, move || {
        let session = HeadlessSession::with_clock(SystemClock::new(), debug);
        let roster = session.roster(definition);
        let state: Box<dyn GameState> = match PlayingState::new(session.ctx.clone(), &roster) {
            Ok(state) => Box::new(state.with_inbox(inbox)),
            Err(e) => {
                error!(error = %e, "Could not build the playing state, staying in the menu");
                Box::new(MenuState)
            }
        };
        (StateManager::new(state), sink)
    })
    .map_err(|e| e.to_string())?;

    if engage {
        for event in engage_roric() {
            sender.send(event).map_err(|e| e.to_string())?;
        }
    }

    let mut throughput = handle.throughput();
    let throughput_task = tokio::spawn(async move {
        while throughput.changed().await.is_ok() {
            let window = *throughput.borrow_and_update();
            info!(ups = window.updates, fps = window.frames, "Throughput");
        }
    });

    let render_task = tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let latest = frames.borrow_and_update().clone();
            if let Some(frame) = latest
                && frame.number % 60 == 0
            {
                println!(
                    "frame {:>6}  tick {:>6}  state {}{}",
                    frame.number,
                    frame.snapshot.tick,
                    frame.snapshot.state,
                    if frame.snapshot.paused { " (paused)" } else { "" }
                );
            }
        }
    });

    let timeout = Duration::from_secs_f64(seconds.max(0.0));
    match wait_for_loop(&handle, timeout).await {
        RunEnd::Interrupted => info!("Interrupted"),
        RunEnd::LoopExited => error!("Game loop exited before the run ended"),
        RunEnd::TimedOut => {}
    }

    let report = tokio::task::spawn_blocking(move || handle.stop_and_join())
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    throughput_task.abort();
    render_task.abort();

    print_report(&report);
    Ok(())
}

/// Why a live run stopped waiting on its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    TimedOut,
    Interrupted,
    /// The loop thread finished on its own, usually after a failed update
    LoopExited,
}

const LOOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait for the timeout, ctrl-c or the loop thread ending, whichever comes first.
pub async fn wait_for_loop(handle: &LoopHandle, timeout: Duration) -> RunEnd {
    let exited = async {
        let mut poll = tokio::time::interval(LOOP_POLL_INTERVAL);
        while !handle.is_finished() {
            poll.tick().await;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => RunEnd::Interrupted,
        _ = tokio::time::sleep(timeout) => RunEnd::TimedOut,
        _ = exited => RunEnd::LoopExited,
    }
}

fn print_report(report: &LoopReport) {
    println!(
        "{} updates, {} renders over {} iterations (last window: {} ups / {} fps)",
        report.total_updates,
        report.total_renders,
        report.iterations,
        report.last_throughput.updates,
        report.last_throughput.frames,
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// replay
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Simulated fight length
    pub duration_ms: u64,
    /// Damage is applied this often; 0 disables damage
    pub damage_interval_ms: u64,
    pub damage_percent: f32,
    /// Inject one clock jump of `stall_ms` at this point of the fight
    pub stall_at_ms: Option<u64>,
    pub stall_ms: u64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            duration_ms: 170_000,
            damage_interval_ms: 10_000,
            damage_percent: 5.0,
            stall_at_ms: None,
            stall_ms: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplaySummary {
    /// Phase announcements with the clock reading they were made at
    pub phases: Vec<(u64, RoricPhase)>,
    pub report: LoopReport,
    pub final_health: f32,
    pub defeated: bool,
    /// Every presentation request, in the order it was made
    pub presentation: Vec<PresentationCall>,
    pub world_calls: usize,
}

/// Run a scripted Roric fight on a manual clock.
///
/// The same options always produce the same summary.
pub fn replay_scenario(
    settings: &LoopSettings,
    debug: DebugSettings,
    definition: RoricDefinition,
    options: &ReplayOptions,
) -> Result<ReplaySummary, String> {
    let session = HeadlessSession::manual(debug);
    let roster = session.roster(definition);
    let (sender, inbox) = event_channel();
    let state = PlayingState::new(session.ctx.clone(), &roster)
        .map_err(|e| e.to_string())?
        .with_inbox(inbox);
    let mut manager = StateManager::new(Box::new(state));

    let phases = Rc::new(RefCell::new(Vec::new()));
    {
        let phases = phases.clone();
        let clock = session.clock.clone();
        session.ctx.bus.register(EventKind::PhaseChanged, move |event| {
            if let GameEvent::PhaseChanged {
                change: PhaseChange::Roric(phase),
                ..
            } = event
            {
                phases.borrow_mut().push((clock.now_ms(), *phase));
            }
        });
    }

    let bus = session.ctx.bus.clone();
    let boss = roric_ref();
    let mut game_loop =
        GameLoop::new(settings, session.clock.clone()).map_err(|e| e.to_string())?;
    let mut sink = CountingSink::default();

    // Arena entry and engagement arrive together and land on the first tick
    for event in engage_roric() {
        sender.send(event).map_err(|e| e.to_string())?;
    }

    let mut health = 100.0_f32;
    let mut next_hit = options.damage_interval_ms;
    let mut elapsed = 0;
    while elapsed < options.duration_ms && health > 0.0 {
        let step = match options.stall_at_ms {
            Some(at) if at == elapsed && options.stall_ms > 0 => options.stall_ms,
            _ => 1,
        };
        session.clock.advance_ms(step);
        elapsed += step;
        game_loop
            .step(&mut manager, &mut sink)
            .map_err(|e| e.to_string())?;

        if options.damage_interval_ms > 0 && elapsed >= next_hit {
            let old_percent = health;
            health = (health - options.damage_percent).max(0.0);
            bus.publish(GameEvent::BossHealthChanged {
                boss,
                old_percent,
                new_percent: health,
            });
            next_hit += options.damage_interval_ms;
        }
    }

    let defeated = health <= 0.0;
    if defeated {
        bus.publish(GameEvent::BossDefeated { boss });
        // Let the queued level reset land
        for _ in 0..100 {
            session.clock.advance_ms(1);
            game_loop
                .step(&mut manager, &mut sink)
                .map_err(|e| e.to_string())?;
        }
    }

    let phases = phases.borrow().clone();
    let presentation = session.presentation.borrow_mut().take_calls();
    let world_calls = session.world.borrow().calls().len();
    Ok(ReplaySummary {
        phases,
        report: game_loop.report(),
        final_health: health,
        defeated,
        presentation,
        world_calls,
    })
}

pub fn replay(
    config: &AppConfig,
    definition: Option<&Path>,
    options: &ReplayOptions,
    print_calls: bool,
) -> Result<(), String> {
    let roric = load_definition(config, definition)?;
    let summary = replay_scenario(&config.game_loop, config.debug.clone(), roric, options)?;

    if print_calls {
        for (index, call) in summary.presentation.iter().enumerate() {
            println!("{index:>6}  {call:?}");
        }
        println!();
    }

    println!("{:<12} Phase", "At (ms)");
    println!("{}", "-".repeat(24));
    for (at, phase) in &summary.phases {
        println!("{:<12} {}", at, phase.name());
    }
    println!();
    print_report(&summary.report);
    println!(
        "boss health {:.0}%{}, {} presentation calls, {} world calls",
        summary.final_health,
        if summary.defeated { " (defeated)" } else { "" },
        summary.presentation.len(),
        summary.world_calls,
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// config / definitions
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_settings(config: &AppConfig) -> Result<(), String> {
    match AppConfig::config_path() {
        Ok(path) => println!("# {}", path.display()),
        Err(e) => println!("# config path unavailable: {e}"),
    }
    let rendered = toml::to_string_pretty(config).map_err(|e| e.to_string())?;
    println!("{rendered}");
    match config.encounter_dir_path() {
        Some(dir) => println!("# encounter definitions: {}", dir.display()),
        None => println!("# encounter definitions: built-in"),
    }
    Ok(())
}

pub fn check_definition(path: &str) -> Result<(), String> {
    let path = PathBuf::from(path);
    let definition = RoricDefinition::load(&path).map_err(|e| e.to_string())?;
    println!("{} is valid", path.display());
    for entry in &definition.phases {
        let trigger = match &entry.trigger {
            Some(trigger) => format!("{trigger:?}"),
            None => "fight start".to_string(),
        };
        println!(
            "  {:<8} {:<40} cooldown x{:.2}  projectiles x{:.2}",
            entry.phase.name(),
            trigger,
            entry.cooldown_modifier,
            entry.projectile_speed,
        );
    }
    Ok(())
}

pub fn exit() -> Result<(), String> {
    use std::io::Write;
    writeln!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::game_loop::{LoopError, Simulation, SimulationError};

    /// Simulation whose third update fails
    struct FailsOnThird {
        ticks: u64,
    }

    impl Simulation for FailsOnThird {
        type Snapshot = u64;

        fn update(&mut self) -> Result<(), SimulationError> {
            self.ticks += 1;
            if self.ticks == 3 {
                return Err(SimulationError::Fault("scripted failure".to_string()));
            }
            Ok(())
        }

        fn snapshot(&self) -> u64 {
            self.ticks
        }
    }

    #[test]
    fn test_wait_returns_when_loop_dies() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let handle = game_loop::spawn(&LoopSettings::with_rates(200, 60), || {
            (FailsOnThird { ticks: 0 }, CountingSink::default())
        })
        .unwrap();

        let started = std::time::Instant::now();
        let end = runtime.block_on(wait_for_loop(&handle, Duration::from_secs(30)));

        assert_eq!(end, RunEnd::LoopExited);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(matches!(
            handle.join(),
            Err(LoopError::Update { tick: 3, .. })
        ));
    }

    #[test]
    fn test_wait_times_out_while_loop_runs() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let handle = game_loop::spawn(&LoopSettings::with_rates(200, 60), || {
            (FailsOnThird { ticks: 100 }, CountingSink::default())
        })
        .unwrap();

        let end = runtime.block_on(wait_for_loop(&handle, Duration::from_millis(100)));

        assert_eq!(end, RunEnd::TimedOut);
        assert!(handle.stop_and_join().is_ok());
    }

    fn phases_of(summary: &ReplaySummary) -> Vec<RoricPhase> {
        summary.phases.iter().map(|(_, phase)| *phase).collect()
    }

    #[test]
    fn test_replay_walks_every_phase() {
        let summary = replay_scenario(
            &LoopSettings::with_rates(60, 30),
            DebugSettings::default(),
            RoricDefinition::default(),
            &ReplayOptions::default(),
        )
        .unwrap();

        assert_eq!(
            phases_of(&summary),
            vec![
                RoricPhase::Intro,
                RoricPhase::Assault,
                RoricPhase::Bridge,
                RoricPhase::Storm,
                RoricPhase::Finale,
            ]
        );
        let (assault_at, _) = summary.phases[1];
        assert!(assault_at >= 53_000);
        assert!(summary.phases.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(!summary.defeated);
        assert!(!summary.presentation.is_empty());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let options = ReplayOptions {
            duration_ms: 100_000,
            ..ReplayOptions::default()
        };
        let run = || {
            replay_scenario(
                &LoopSettings::with_rates(60, 30),
                DebugSettings::default(),
                RoricDefinition::default(),
                &options,
            )
            .unwrap()
        };
        let (first, second) = (run(), run());
        assert_eq!(first.phases, second.phases);
        assert_eq!(first.report, second.report);
        assert_eq!(first.presentation, second.presentation);
    }

    #[test]
    fn test_replay_defeat_returns_to_overworld() {
        let options = ReplayOptions {
            duration_ms: 20_000,
            damage_interval_ms: 1_000,
            damage_percent: 10.0,
            ..ReplayOptions::default()
        };
        let summary = replay_scenario(
            &LoopSettings::with_rates(60, 30),
            DebugSettings::default(),
            RoricDefinition::default(),
            &options,
        )
        .unwrap();

        assert!(summary.defeated);
        assert_eq!(summary.final_health, 0.0);
        // Only the opening phase is reached before the boss dies
        assert_eq!(phases_of(&summary), vec![RoricPhase::Intro]);
        assert!(summary.world_calls > 0);
    }

    #[test]
    fn test_replay_stall_is_clamped() {
        let options = ReplayOptions {
            duration_ms: 2_000,
            damage_interval_ms: 0,
            stall_at_ms: Some(1_000),
            stall_ms: 5_000,
            ..ReplayOptions::default()
        };
        let summary = replay_scenario(
            &LoopSettings::with_rates(60, 30),
            DebugSettings::default(),
            RoricDefinition::default(),
            &options,
        )
        .unwrap();

        // The stall ends the 2 s run early and only 250 ms of it is simulated
        assert!(summary.report.total_updates < 90);
    }
}
