//! Boss encounter system
//!
//! This module provides:
//! - **PhaseMachine**: forward-only progression through a boss's phases
//! - **FightTimer**: pause-aware fight clock shared by managers and scripts
//! - **TimedScript**: one-shot cues at fixed offsets from the fight start
//! - **roric**: the time-scripted Roric fight
//! - **lancer**: the event-only Lancer effects

mod ai;
mod error;
mod fight_timer;
pub mod lancer;
mod phase;
pub mod roric;
mod timed_script;

pub use ai::{BossAi, RecordingAi};
pub use error::{DefinitionError, PhaseError};
pub use fight_timer::FightTimer;
pub use lancer::LancerEffectsHandler;
pub use phase::{Phase, PhaseMachine, PhaseTrigger};
pub use timed_script::{Cue, TimedScript};
