//! Level, spawn and projectile control
//!
//! The flow controller and encounter handlers drive the world through
//! [`WorldControl`]. [`RecordingWorld`] is an in-memory stand-in that logs
//! every request and answers spawn queries from configured points.

use crate::events::{EncounterId, EnemyRef, Point};

/// Named spawn anchors of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnAnchor {
    Left,
    Right,
}

/// Which map the player is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Overworld,
    Arena(EncounterId),
}

pub trait WorldControl {
    /// Stop the overworld from re-triggering the arena entrance
    fn disable_arena_entrance(&mut self);

    fn switch_to_arena(&mut self, encounter: EncounterId);

    fn return_to_overworld(&mut self);

    fn spawn_point(&mut self, anchor: SpawnAnchor) -> Option<Point>;

    /// Spawn recorded in the player's save, if any
    fn saved_spawn(&mut self) -> Option<Point>;

    fn reload_level_data(&mut self);

    fn reload_enemies(&mut self);

    fn reload_objects(&mut self);

    fn init_boss_spells(&mut self);

    fn refresh_minimap(&mut self);

    fn set_minimap_active(&mut self, active: bool);

    fn update_camera_bounds(&mut self);

    fn reposition_player(&mut self, at: Point);

    fn spawn_skybeam(&mut self);

    fn clear_arrow_rain_telegraphs(&mut self);

    fn launch_fast_projectile(&mut self, boss: &EnemyRef, speed_multiplier: f64);
}

/// One recorded world request
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCall {
    DisableArenaEntrance,
    SwitchToArena(EncounterId),
    ReturnToOverworld,
    ReloadLevelData,
    ReloadEnemies,
    ReloadObjects,
    InitBossSpells,
    RefreshMinimap,
    SetMinimapActive(bool),
    UpdateCameraBounds,
    RepositionPlayer(Point),
    SpawnSkybeam,
    ClearArrowRainTelegraphs,
    LaunchFastProjectile { speed_multiplier: f64 },
}

#[derive(Debug, Default)]
pub struct RecordingWorld {
    pub level: Level,
    pub arena_spawn: Option<Point>,
    pub overworld_spawn: Option<Point>,
    pub saved_spawn: Option<Point>,
    calls: Vec<WorldCall>,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[WorldCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<WorldCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, call: &WorldCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl WorldControl for RecordingWorld {
    fn disable_arena_entrance(&mut self) {
        self.calls.push(WorldCall::DisableArenaEntrance);
    }

    fn switch_to_arena(&mut self, encounter: EncounterId) {
        self.level = Level::Arena(encounter);
        self.calls.push(WorldCall::SwitchToArena(encounter));
    }

    fn return_to_overworld(&mut self) {
        self.level = Level::Overworld;
        self.calls.push(WorldCall::ReturnToOverworld);
    }

    fn spawn_point(&mut self, _anchor: SpawnAnchor) -> Option<Point> {
        match self.level {
            Level::Overworld => self.overworld_spawn,
            Level::Arena(_) => self.arena_spawn,
        }
    }

    fn saved_spawn(&mut self) -> Option<Point> {
        self.saved_spawn
    }

    fn reload_level_data(&mut self) {
        self.calls.push(WorldCall::ReloadLevelData);
    }

    fn reload_enemies(&mut self) {
        self.calls.push(WorldCall::ReloadEnemies);
    }

    fn reload_objects(&mut self) {
        self.calls.push(WorldCall::ReloadObjects);
    }

    fn init_boss_spells(&mut self) {
        self.calls.push(WorldCall::InitBossSpells);
    }

    fn refresh_minimap(&mut self) {
        self.calls.push(WorldCall::RefreshMinimap);
    }

    fn set_minimap_active(&mut self, active: bool) {
        self.calls.push(WorldCall::SetMinimapActive(active));
    }

    fn update_camera_bounds(&mut self) {
        self.calls.push(WorldCall::UpdateCameraBounds);
    }

    fn reposition_player(&mut self, at: Point) {
        self.calls.push(WorldCall::RepositionPlayer(at));
    }

    fn spawn_skybeam(&mut self) {
        self.calls.push(WorldCall::SpawnSkybeam);
    }

    fn clear_arrow_rain_telegraphs(&mut self) {
        self.calls.push(WorldCall::ClearArrowRainTelegraphs);
    }

    fn launch_fast_projectile(&mut self, _boss: &EnemyRef, speed_multiplier: f64) {
        self.calls
            .push(WorldCall::LaunchFastProjectile { speed_multiplier });
    }
}
