//! Presentation side of the Roric fight
//!
//! Reacts to phase changes and Roric's animation cues:
//! - rain from the intro onwards, darkness and flashes on the bridge
//! - tinted flashes with screen shake through the finale
//! - the celestial aura while the storm lasts
//! - particles for teleports, clones, jumps, beam charges

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::{RoricDefinition, RoricPhase};
use crate::boss::{BossAi, DefinitionError, FightTimer, TimedScript};
use crate::context::GameContext;
use crate::events::{
    EnemyKind, EnemyRef, EventHandler, EventKind, GameEvent, PhaseChange, Point, RoricEffect,
    TeleportDirection,
};
use crate::presentation::{ParticleKind, Tint};

const TELEPORT_IN_PARTICLES: u32 = 40;
const TELEPORT_OUT_PARTICLES: u32 = 50;
const CLONE_PARTICLES: u32 = 50;
const JUMP_PARTICLES: u32 = 10;
const LAND_PARTICLES: u32 = 15;
const REPOSITION_PARTICLES: u32 = 2;
const REPOSITION_SPREAD: f64 = 0.6;
const BEAM_CHARGE_PARTICLES: u32 = 60;
const CELESTIAL_AURA_PARTICLES: u32 = 3;

/// Cue fired by the phase-scoped scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoricCue {
    BridgeFlash,
    FinaleFlash,
}

pub struct RoricEffectsHandler {
    ctx: GameContext,
    ai: Rc<RefCell<dyn BossAi>>,
    definition: Rc<RoricDefinition>,
    fight: FightTimer,
    bridge: TimedScript<RoricCue>,
    finale: TimedScript<RoricCue>,
    /// Roric while the celestial aura is up
    aura_owner: Option<EnemyRef>,
    rng: StdRng,
}

impl RoricEffectsHandler {
    pub fn new(
        ctx: GameContext,
        ai: Rc<RefCell<dyn BossAi>>,
        definition: Rc<RoricDefinition>,
    ) -> Result<Self, DefinitionError> {
        let bridge = TimedScript::uniform(&definition.bridge_flashes_ms, RoricCue::BridgeFlash)?;
        let finale = TimedScript::uniform(&definition.finale_flashes_ms, RoricCue::FinaleFlash)?;
        let rng = StdRng::seed_from_u64(ctx.debug.rng_seed);
        Ok(Self {
            ctx,
            ai,
            definition,
            fight: FightTimer::default(),
            bridge,
            finale,
            aura_owner: None,
            rng,
        })
    }

    pub fn subscribe(this: &Rc<RefCell<Self>>, ctx: &GameContext) {
        ctx.bus
            .subscribe(EventKind::PhaseChanged, this, Self::on_phase_changed);
        ctx.bus
            .subscribe(EventKind::Teleport, this, Self::on_teleport);
        ctx.bus
            .subscribe(EventKind::CloneSummoned, this, Self::on_clone_summoned);
        ctx.bus
            .subscribe(EventKind::RoricEffect, this, Self::on_effect);
        ctx.bus
            .subscribe(EventKind::SkybeamRequested, this, Self::on_skybeam);
    }

    pub fn bridge_script(&self) -> &TimedScript<RoricCue> {
        &self.bridge
    }

    pub fn finale_script(&self) -> &TimedScript<RoricCue> {
        &self.finale
    }

    pub fn is_aura_active(&self) -> bool {
        self.aura_owner.is_some()
    }

    // ─── Phase changes ─────────────────────────────────────────────────────

    fn on_phase_changed(&mut self, event: &GameEvent) {
        let GameEvent::PhaseChanged {
            change: PhaseChange::Roric(phase),
            fight_started_at_ms,
            head_start_ms,
        } = event
        else {
            return;
        };
        if !self.fight.is_started() {
            self.fight.start(*fight_started_at_ms, *head_start_ms);
        }

        match self.ai.try_borrow_mut() {
            Ok(mut ai) => ai.interrupt_and_idle(),
            Err(_) => warn!("Roric AI busy, skipping interrupt"),
        }

        self.enter_phase(*phase);
    }

    fn enter_phase(&mut self, phase: RoricPhase) {
        debug!(phase = ?phase, "Applying Roric phase effects");
        let mut presentation = self.ctx.presentation.borrow_mut();

        if phase == RoricPhase::Intro {
            presentation.start_rain();
            self.ctx.world.borrow_mut().clear_arrow_rain_telegraphs();
        }

        if phase != RoricPhase::Storm
            && let Some(owner) = self.aura_owner.take()
        {
            presentation.clear_particles(owner.id, ParticleKind::CelestialAura);
        }

        match phase {
            RoricPhase::Bridge => {
                presentation.set_dark_phase(true);
                presentation.override_ambient_darkness(self.definition.bridge_darkness);
                self.bridge.activate(self.fight);
            }
            RoricPhase::Finale => {
                self.bridge.deactivate();
                self.finale.activate(self.fight);
            }
            _ => {
                presentation.set_dark_phase(false);
                presentation.release_ambient_darkness();
                self.bridge.deactivate();
                self.finale.deactivate();
            }
        }
    }

    // ─── Discrete cues ─────────────────────────────────────────────────────

    fn on_teleport(&mut self, event: &GameEvent) {
        let GameEvent::Teleport {
            boss,
            location,
            direction,
        } = event
        else {
            return;
        };
        if !boss.is(EnemyKind::Roric) {
            return;
        }
        let (kind, count) = match direction {
            TeleportDirection::In => (ParticleKind::RoricTeleportIn, TELEPORT_IN_PARTICLES),
            TeleportDirection::Out => (ParticleKind::RoricTeleportOut, TELEPORT_OUT_PARTICLES),
        };
        self.ctx
            .presentation
            .borrow_mut()
            .spawn_particles(*location, kind, count, None);
    }

    fn on_clone_summoned(&mut self, event: &GameEvent) {
        let GameEvent::CloneSummoned { location } = event else {
            return;
        };
        self.ctx.presentation.borrow_mut().spawn_particles(
            *location,
            ParticleKind::RoricSummon,
            CLONE_PARTICLES,
            None,
        );
    }

    fn on_effect(&mut self, event: &GameEvent) {
        let GameEvent::RoricEffect { boss, effect } = event else {
            return;
        };
        if !boss.is(EnemyKind::Roric) {
            return;
        }
        let hitbox = boss.hitbox;
        let owner = Some(boss.id);
        let mut presentation = self.ctx.presentation.borrow_mut();
        match effect {
            RoricEffect::Jump => {
                presentation.spawn_particles(hitbox.feet(), ParticleKind::Impact, JUMP_PARTICLES, owner)
            }
            RoricEffect::Land => {
                presentation.spawn_particles(hitbox.feet(), ParticleKind::Impact, LAND_PARTICLES, owner)
            }
            RoricEffect::Repositioning => {
                let center = hitbox.center();
                let dx = (self.rng.r#gen::<f64>() - 0.5) * hitbox.width * REPOSITION_SPREAD;
                let dy = (self.rng.r#gen::<f64>() - 0.5) * hitbox.height * REPOSITION_SPREAD;
                presentation.spawn_particles(
                    Point::new(center.x + dx, center.y + dy),
                    ParticleKind::EtherealDash,
                    REPOSITION_PARTICLES,
                    owner,
                );
            }
            RoricEffect::BeamChargeStart => presentation.spawn_particles(
                hitbox.center(),
                ParticleKind::RoricBeamCharge,
                BEAM_CHARGE_PARTICLES,
                owner,
            ),
            RoricEffect::BeamChargeEnd => {
                presentation.clear_particles(boss.id, ParticleKind::RoricBeamCharge)
            }
            RoricEffect::CelestialRainStart => self.aura_owner = Some(*boss),
            RoricEffect::CelestialRainEnd => {
                self.aura_owner = None;
                presentation.clear_particles(boss.id, ParticleKind::CelestialAura);
            }
        }
    }

    fn on_skybeam(&mut self, _event: &GameEvent) {
        self.ctx.world.borrow_mut().spawn_skybeam();
    }
}

impl EventHandler for RoricEffectsHandler {
    fn continuous_update(&mut self) {
        let now = self.ctx.now_ms();
        let presentation = Rc::clone(&self.ctx.presentation);

        self.bridge.poll(now, |_| {
            presentation.borrow_mut().flash_ambient(None);
        });

        if let Some(owner) = &self.aura_owner {
            presentation.borrow_mut().spawn_particles(
                owner.hitbox.center(),
                ParticleKind::CelestialAura,
                CELESTIAL_AURA_PARTICLES,
                Some(owner.id),
            );
        }

        let tint = Tint::from(self.definition.finale_tint);
        let shake = self.definition.finale_shake;
        self.finale.poll(now, |_| {
            let mut presentation = presentation.borrow_mut();
            presentation.flash_ambient(Some(tint));
            presentation.screen_shake(shake.duration_ticks, shake.intensity);
        });
    }

    fn pause(&mut self) {
        let now = self.ctx.now_ms();
        self.fight.pause(now);
        self.bridge.pause(now);
        self.finale.pause(now);
    }

    fn unpause(&mut self) {
        let now = self.ctx.now_ms();
        self.fight.resume(now);
        self.bridge.resume(now);
        self.finale.resume(now);
    }

    fn reset(&mut self) {
        self.fight.reset();
        self.bridge.deactivate();
        self.finale.deactivate();
        let mut presentation = self.ctx.presentation.borrow_mut();
        if let Some(owner) = self.aura_owner.take() {
            presentation.clear_particles(owner.id, ParticleKind::CelestialAura);
        }
        presentation.set_dark_phase(false);
        presentation.release_ambient_darkness();
    }
}
