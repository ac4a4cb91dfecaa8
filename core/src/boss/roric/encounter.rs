use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use super::{RoricDefinition, RoricPhase, RoricPhaseManager};
use crate::context::GameContext;
use crate::events::{
    EncounterId, EnemyKind, EnemyRef, EventHandler, EventKind, GameEvent, PhaseChange,
};

/// Drives the Roric phase manager from the clock and from fight events.
///
/// Every phase entered is announced with [`GameEvent::PhaseChanged`]; the
/// visual consequences live in `RoricEffectsHandler`.
pub struct RoricEncounter {
    ctx: GameContext,
    manager: RoricPhaseManager,
    boss: Option<EnemyRef>,
    defeated: bool,
}

impl RoricEncounter {
    pub fn new(ctx: GameContext, definition: Rc<RoricDefinition>) -> Self {
        Self {
            ctx,
            manager: RoricPhaseManager::new(definition),
            boss: None,
            defeated: false,
        }
    }

    /// Wire the fight listeners onto the bus
    pub fn subscribe(this: &Rc<RefCell<Self>>, ctx: &GameContext) {
        ctx.bus
            .subscribe(EventKind::EncounterEngaged, this, Self::on_engaged);
        ctx.bus
            .subscribe(EventKind::BossHealthChanged, this, Self::on_health_changed);
        ctx.bus
            .subscribe(EventKind::PhaseChangeRequested, this, Self::on_phase_requested);
        ctx.bus
            .subscribe(EventKind::BossDefeated, this, Self::on_boss_defeated);
        ctx.bus
            .subscribe(EventKind::FastProjectileFired, this, Self::on_fast_projectile);
    }

    pub fn manager(&self) -> &RoricPhaseManager {
        &self.manager
    }

    pub fn current_phase(&self) -> RoricPhase {
        self.manager.current_phase()
    }

    /// Last known state of the boss, from health or defeat events
    pub fn boss(&self) -> Option<&EnemyRef> {
        self.boss.as_ref()
    }

    pub fn is_engaged(&self) -> bool {
        self.manager.is_started() && !self.defeated
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    // ─── Listeners ─────────────────────────────────────────────────────────

    fn on_engaged(&mut self, event: &GameEvent) {
        let GameEvent::EncounterEngaged {
            encounter: EncounterId::Roric,
        } = event
        else {
            return;
        };
        let now = self.ctx.now_ms();
        let head_start = self.ctx.debug.fight_start_offset_ms();
        if !self.manager.start_fight(now, head_start) {
            return;
        }
        self.defeated = false;
        info!(head_start_ms = head_start, "Roric fight started");
        self.announce(RoricPhase::Intro);
        self.advance(now);
    }

    fn on_health_changed(&mut self, event: &GameEvent) {
        let GameEvent::BossHealthChanged {
            boss, new_percent, ..
        } = event
        else {
            return;
        };
        if !boss.is(EnemyKind::Roric) {
            return;
        }
        self.boss = Some(*boss);
        if !self.is_engaged() {
            return;
        }
        let entered = self
            .manager
            .on_health_changed(self.ctx.now_ms(), *new_percent);
        for phase in entered {
            self.announce(phase);
        }
    }

    fn on_phase_requested(&mut self, event: &GameEvent) {
        let GameEvent::PhaseChangeRequested {
            change: PhaseChange::Roric(target),
        } = event
        else {
            return;
        };
        if self.defeated {
            return;
        }
        match self.manager.request(*target) {
            Ok(_) => self.announce(*target),
            Err(e) => debug!(error = %e, "Ignoring Roric phase request"),
        }
    }

    fn on_boss_defeated(&mut self, event: &GameEvent) {
        let GameEvent::BossDefeated { boss } = event else {
            return;
        };
        if boss.is(EnemyKind::Roric) {
            self.defeated = true;
            self.boss = Some(*boss);
        }
    }

    fn on_fast_projectile(&mut self, event: &GameEvent) {
        let GameEvent::FastProjectileFired { boss } = event else {
            return;
        };
        if !boss.is(EnemyKind::Roric) {
            return;
        }
        let speed = self.manager.projectile_speed_multiplier();
        self.ctx
            .world
            .borrow_mut()
            .launch_fast_projectile(boss, speed);
    }

    // ─── Internals ─────────────────────────────────────────────────────────

    fn advance(&mut self, now_ms: u64) {
        let update = self.manager.update(now_ms);
        for phase in update.entered {
            self.announce(phase);
        }
        if update.skybeam_due {
            self.ctx.bus.publish(GameEvent::SkybeamRequested);
        }
    }

    fn announce(&self, phase: RoricPhase) {
        let timer = self.manager.fight_timer();
        debug!(phase = ?phase, "Roric phase changed");
        self.ctx.bus.publish(GameEvent::PhaseChanged {
            change: PhaseChange::Roric(phase),
            fight_started_at_ms: timer.started_at().unwrap_or_default(),
            head_start_ms: timer.head_start(),
        });
    }
}

impl EventHandler for RoricEncounter {
    fn continuous_update(&mut self) {
        if self.is_engaged() {
            let now = self.ctx.now_ms();
            self.advance(now);
        }
    }

    fn pause(&mut self) {
        self.manager.pause(self.ctx.now_ms());
    }

    fn unpause(&mut self) {
        self.manager.resume(self.ctx.now_ms());
    }

    fn reset(&mut self) {
        self.manager.reset();
        self.boss = None;
        self.defeated = false;
    }
}
