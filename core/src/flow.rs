//! Scene transitions around scripted fights
//!
//! Entering the Roric fight moves the player into the arena; defeating Roric
//! brings them back. Both are one-shot reactions guarded by the current
//! level, so duplicate notifications are harmless.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::context::GameContext;
use crate::events::{EncounterId, EnemyKind, EventKind, GameEvent, Point};
use crate::state::StateCommand;
use crate::world::{Level, SpawnAnchor};

pub struct GameFlowHandler {
    ctx: GameContext,
    level: Level,
    transitions: u32,
}

impl GameFlowHandler {
    pub fn new(ctx: GameContext) -> Self {
        Self {
            ctx,
            level: Level::Overworld,
            transitions: 0,
        }
    }

    pub fn subscribe(this: &Rc<RefCell<Self>>, ctx: &GameContext) {
        ctx.bus
            .subscribe(EventKind::FightInitiated, this, Self::on_fight_initiated);
        ctx.bus
            .subscribe(EventKind::BossDefeated, this, Self::on_boss_defeated);
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of level transitions performed so far
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    fn on_fight_initiated(&mut self, event: &GameEvent) {
        let GameEvent::FightInitiated { encounter } = event else {
            return;
        };
        if *encounter != EncounterId::Roric || self.level != Level::Overworld {
            return;
        }

        info!(encounter = encounter.as_str(), "Entering boss arena");
        let spawn = {
            let mut world = self.ctx.world.borrow_mut();
            world.disable_arena_entrance();
            world.switch_to_arena(*encounter);
            world.spawn_point(SpawnAnchor::Left)
        };
        self.level = Level::Arena(*encounter);
        self.level_transition(spawn);
    }

    fn on_boss_defeated(&mut self, event: &GameEvent) {
        let GameEvent::BossDefeated { boss } = event else {
            return;
        };
        if !boss.is(EnemyKind::Roric) || self.level != Level::Arena(EncounterId::Roric) {
            return;
        }

        self.ctx.presentation.borrow_mut().stop_rain();
        info!("Roric defeated, returning to the overworld");
        let spawn = {
            let mut world = self.ctx.world.borrow_mut();
            world.return_to_overworld();
            world
                .saved_spawn()
                .or_else(|| world.spawn_point(SpawnAnchor::Left))
        };
        self.level = Level::Overworld;
        self.level_transition(spawn);
        self.ctx.world.borrow_mut().set_minimap_active(true);
    }

    fn level_transition(&mut self, spawn: Option<Point>) {
        // State reset runs once every listener has seen this event
        self.ctx.commands.push(StateCommand::Reset);

        let mut world = self.ctx.world.borrow_mut();
        world.reload_level_data();
        world.reload_enemies();
        world.reload_objects();
        world.init_boss_spells();
        world.refresh_minimap();
        world.update_camera_bounds();
        match spawn {
            Some(at) => world.reposition_player(at),
            None => warn!(level = ?self.level, "No spawn point for level, player left in place"),
        }
        self.transitions += 1;
    }
}
