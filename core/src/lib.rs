pub mod boss;
pub mod context;
pub mod events;
pub mod flow;
pub mod game_loop;
pub mod headless;
pub mod presentation;
pub mod quests;
pub mod state;
pub mod world;

// Re-exports for convenience
pub use boss::roric::{RoricDefinition, RoricEffectsHandler, RoricEncounter, RoricPhase};
pub use boss::{BossAi, FightTimer, LancerEffectsHandler, PhaseMachine, TimedScript};
pub use context::{AppConfig, AppConfigExt, GameContext, ManualClock, SystemClock, TimeSource};
pub use events::{EventBus, EventHandler, EventKind, GameEvent};
pub use flow::GameFlowHandler;
pub use game_loop::{GameLoop, LoopError, Simulation, StopToken};
pub use headless::HeadlessSession;
pub use presentation::{Presentation, RecordingPresentation};
pub use quests::QuestTracker;
pub use state::{EncounterRoster, FrameSnapshot, GameState, PlayingState, StateManager};
pub use world::{RecordingWorld, WorldControl};
