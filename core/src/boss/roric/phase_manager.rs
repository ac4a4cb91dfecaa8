//! Roric fight choreography
//!
//! Tracks fight time and boss health, decides the current phase and exposes
//! the phase-scoped parameters the AI reads (attack pool, cooldown and
//! projectile speed multipliers, trap drops).

use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::RoricDefinition;
use crate::boss::{FightTimer, Phase, PhaseError, PhaseMachine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoricPhase {
    Intro,
    Assault,
    Bridge,
    Storm,
    Finale,
}

impl Phase for RoricPhase {
    const ORDER: &'static [Self] = &[
        Self::Intro,
        Self::Assault,
        Self::Bridge,
        Self::Storm,
        Self::Finale,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Assault => "assault",
            Self::Bridge => "bridge",
            Self::Storm => "storm",
            Self::Finale => "finale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoricAttack {
    ArrowAttack,
    Jumping,
    BeamAttack,
    ArrowRain,
    ArrowStrike,
    SkyfallBarrage,
    CelestialRain,
    PhantomBarrage,
}

const OPENING_ATTACKS: &[RoricAttack] = &[
    RoricAttack::ArrowAttack,
    RoricAttack::Jumping,
    RoricAttack::BeamAttack,
    RoricAttack::ArrowRain,
    RoricAttack::ArrowStrike,
];

const ASSAULT_ATTACKS: &[RoricAttack] = &[
    RoricAttack::ArrowAttack,
    RoricAttack::Jumping,
    RoricAttack::BeamAttack,
    RoricAttack::ArrowRain,
    RoricAttack::ArrowStrike,
    RoricAttack::SkyfallBarrage,
];

const BRIDGE_ATTACKS: &[RoricAttack] = &[RoricAttack::ArrowAttack];

const STORM_ATTACKS: &[RoricAttack] = &[RoricAttack::CelestialRain];

const FINALE_ATTACKS: &[RoricAttack] = &[
    RoricAttack::ArrowAttack,
    RoricAttack::Jumping,
    RoricAttack::BeamAttack,
    RoricAttack::ArrowRain,
    RoricAttack::ArrowStrike,
    RoricAttack::SkyfallBarrage,
    RoricAttack::PhantomBarrage,
];

/// Result of one manager update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseUpdate {
    /// Phases entered during this update, in order
    pub entered: Vec<RoricPhase>,
    pub skybeam_due: bool,
}

#[derive(Debug, Clone)]
pub struct RoricPhaseManager {
    definition: Rc<RoricDefinition>,
    machine: PhaseMachine<RoricPhase>,
    timer: FightTimer,
    health_percent: f32,
    last_skybeam_ms: Option<u64>,
}

impl RoricPhaseManager {
    pub fn new(definition: Rc<RoricDefinition>) -> Self {
        Self {
            definition,
            machine: PhaseMachine::new(),
            timer: FightTimer::default(),
            health_percent: 100.0,
            last_skybeam_ms: None,
        }
    }

    /// Start the fight clock. A fight already in progress keeps its start.
    pub fn start_fight(&mut self, now_ms: u64, head_start_ms: u64) -> bool {
        self.timer.start(now_ms, head_start_ms)
    }

    pub fn is_started(&self) -> bool {
        self.timer.is_started()
    }

    pub fn fight_timer(&self) -> FightTimer {
        self.timer
    }

    pub fn elapsed(&self, now_ms: u64) -> Option<u64> {
        self.timer.elapsed(now_ms)
    }

    pub fn current_phase(&self) -> RoricPhase {
        self.machine.current()
    }

    pub fn history(&self) -> &[RoricPhase] {
        self.machine.history()
    }

    /// Advance through every phase whose trigger is met, then schedule skybeams.
    pub fn update(&mut self, now_ms: u64) -> PhaseUpdate {
        let Some(elapsed) = self.timer.elapsed(now_ms) else {
            return PhaseUpdate::default();
        };
        let entered = self.advance(elapsed);

        let mut skybeam_due = false;
        if self.current_phase() == RoricPhase::Finale {
            let due = self
                .last_skybeam_ms
                .is_none_or(|last| elapsed.saturating_sub(last) >= self.definition.skybeam_interval_ms);
            if due {
                self.last_skybeam_ms = Some(elapsed);
                skybeam_due = true;
            }
        } else {
            self.last_skybeam_ms = None;
        }

        PhaseUpdate {
            entered,
            skybeam_due,
        }
    }

    /// Record a health change and enter any phase it unlocks.
    pub fn on_health_changed(&mut self, now_ms: u64, new_percent: f32) -> Vec<RoricPhase> {
        self.health_percent = new_percent;
        match self.timer.elapsed(now_ms) {
            Some(elapsed) => self.advance(elapsed),
            None => Vec::new(),
        }
    }

    /// Jump straight to `target`, skipping intermediate phases.
    pub fn request(&mut self, target: RoricPhase) -> Result<RoricPhase, PhaseError> {
        if !self.timer.is_started() {
            return Err(PhaseError::NotEngaged);
        }
        self.machine.transition_to(target)
    }

    fn advance(&mut self, elapsed: u64) -> Vec<RoricPhase> {
        let mut entered = Vec::new();
        while let Some(next) = self.current_phase().successor() {
            let met = self
                .definition
                .trigger(next)
                .is_some_and(|t| t.is_met(elapsed, self.health_percent));
            if !met || self.machine.transition_to(next).is_err() {
                break;
            }
            entered.push(next);
        }
        entered
    }

    pub fn available_attacks(&self) -> &'static [RoricAttack] {
        match self.current_phase() {
            RoricPhase::Intro => OPENING_ATTACKS,
            RoricPhase::Assault => ASSAULT_ATTACKS,
            RoricPhase::Bridge => BRIDGE_ATTACKS,
            RoricPhase::Storm => STORM_ATTACKS,
            RoricPhase::Finale => FINALE_ATTACKS,
        }
    }

    pub fn choose_next_attack(&self, rng: &mut impl Rng) -> RoricAttack {
        let pool = self.available_attacks();
        pool[rng.gen_range(0..pool.len())]
    }

    /// Whether the aerial attack drops a trap this time (coin flip in Assault and Finale)
    pub fn should_drop_trap(&self, rng: &mut impl Rng) -> bool {
        matches!(
            self.current_phase(),
            RoricPhase::Assault | RoricPhase::Finale
        ) && rng.gen_bool(0.5)
    }

    pub fn cooldown_modifier(&self) -> f64 {
        self.definition.cooldown_modifier(self.current_phase())
    }

    pub fn projectile_speed_multiplier(&self) -> f64 {
        self.definition.projectile_speed(self.current_phase())
    }

    pub fn pause(&mut self, now_ms: u64) {
        self.timer.pause(now_ms);
    }

    pub fn resume(&mut self, now_ms: u64) {
        self.timer.resume(now_ms);
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.timer.reset();
        self.health_percent = 100.0;
        self.last_skybeam_ms = None;
    }
}
