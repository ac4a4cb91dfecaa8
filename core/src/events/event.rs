use crate::boss::roric::RoricPhase;

// ─────────────────────────────────────────────────────────────────────────────
// Payload types
// ─────────────────────────────────────────────────────────────────────────────

/// World-space position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned hitbox, `y` grows downwards
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the bottom edge
    pub fn feet(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Skeleton,
    Ghoul,
    Knight,
    Lancer,
    Roric,
}

/// Identity and hitbox of an enemy at the moment an event was raised
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyRef {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub hitbox: Rect,
}

impl EnemyRef {
    pub fn new(id: u64, kind: EnemyKind, hitbox: Rect) -> Self {
        Self {
            id: EntityId(id),
            kind,
            hitbox,
        }
    }

    pub fn is(&self, kind: EnemyKind) -> bool {
        self.kind == kind
    }
}

/// Scripted encounters the flow controller knows how to stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncounterId {
    Roric,
    Lancer,
}

impl EncounterId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roric => "roric",
            Self::Lancer => "lancer",
        }
    }
}

impl std::str::FromStr for EncounterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "roric" => Ok(Self::Roric),
            "lancer" => Ok(Self::Lancer),
            other => Err(format!("unknown encounter '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeleportDirection {
    In,
    Out,
}

/// Phase identifiers, one variant per phased boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseChange {
    Roric(RoricPhase),
}

/// Discrete Roric animation cues raised by its AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoricEffect {
    Jump,
    Land,
    Repositioning,
    BeamChargeStart,
    BeamChargeEnd,
    CelestialRainStart,
    CelestialRainEnd,
}

// ─────────────────────────────────────────────────────────────────────────────
// Game events
// ─────────────────────────────────────────────────────────────────────────────

/// Every notification that crosses subsystem boundaries.
///
/// The set is closed: listeners subscribe to an [`EventKind`] and match on
/// the payload, ignoring variants they do not care about.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // Flow
    FightInitiated {
        encounter: EncounterId,
    },
    /// The boss noticed the player; the fight clock starts here
    EncounterEngaged {
        encounter: EncounterId,
    },
    BossDefeated {
        boss: EnemyRef,
    },
    EnemyDefeated {
        enemy: EnemyRef,
    },
    CrateDestroyed,

    // Phases
    PhaseChanged {
        change: PhaseChange,
        /// Clock reading recorded as the fight start
        fight_started_at_ms: u64,
        /// Script time already elapsed at the fight start (debug offset)
        head_start_ms: u64,
    },
    /// Request an immediate transition, e.g. from the AI or a debug command
    PhaseChangeRequested {
        change: PhaseChange,
    },
    BossHealthChanged {
        boss: EnemyRef,
        old_percent: f32,
        new_percent: f32,
    },

    // Boss effects
    Teleport {
        boss: EnemyRef,
        location: Point,
        direction: TeleportDirection,
    },
    SpawnAura {
        boss: EnemyRef,
    },
    ClearAura {
        boss: EnemyRef,
    },
    DashSlash {
        boss: EnemyRef,
        start: Point,
        end: Point,
    },
    FastProjectileFired {
        boss: EnemyRef,
    },
    CloneSummoned {
        location: Point,
    },
    RoricEffect {
        boss: EnemyRef,
        effect: RoricEffect,
    },
    SkybeamRequested,

    // Presentation
    ScreenShakeRequested {
        duration_ticks: u32,
        intensity: f64,
    },

    // Lifecycle
    GamePaused,
    GameResumed,
}

/// Discriminant of [`GameEvent`], used as the bus subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FightInitiated,
    EncounterEngaged,
    BossDefeated,
    EnemyDefeated,
    CrateDestroyed,
    PhaseChanged,
    PhaseChangeRequested,
    BossHealthChanged,
    Teleport,
    SpawnAura,
    ClearAura,
    DashSlash,
    FastProjectileFired,
    CloneSummoned,
    RoricEffect,
    SkybeamRequested,
    ScreenShakeRequested,
    GamePaused,
    GameResumed,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FightInitiated { .. } => EventKind::FightInitiated,
            Self::EncounterEngaged { .. } => EventKind::EncounterEngaged,
            Self::BossDefeated { .. } => EventKind::BossDefeated,
            Self::EnemyDefeated { .. } => EventKind::EnemyDefeated,
            Self::CrateDestroyed => EventKind::CrateDestroyed,
            Self::PhaseChanged { .. } => EventKind::PhaseChanged,
            Self::PhaseChangeRequested { .. } => EventKind::PhaseChangeRequested,
            Self::BossHealthChanged { .. } => EventKind::BossHealthChanged,
            Self::Teleport { .. } => EventKind::Teleport,
            Self::SpawnAura { .. } => EventKind::SpawnAura,
            Self::ClearAura { .. } => EventKind::ClearAura,
            Self::DashSlash { .. } => EventKind::DashSlash,
            Self::FastProjectileFired { .. } => EventKind::FastProjectileFired,
            Self::CloneSummoned { .. } => EventKind::CloneSummoned,
            Self::RoricEffect { .. } => EventKind::RoricEffect,
            Self::SkybeamRequested => EventKind::SkybeamRequested,
            Self::ScreenShakeRequested { .. } => EventKind::ScreenShakeRequested,
            Self::GamePaused => EventKind::GamePaused,
            Self::GameResumed => EventKind::GameResumed,
        }
    }

    /// The boss a per-boss event refers to, if any
    pub fn boss(&self) -> Option<&EnemyRef> {
        match self {
            Self::BossDefeated { boss }
            | Self::BossHealthChanged { boss, .. }
            | Self::Teleport { boss, .. }
            | Self::SpawnAura { boss }
            | Self::ClearAura { boss }
            | Self::DashSlash { boss, .. }
            | Self::FastProjectileFired { boss }
            | Self::RoricEffect { boss, .. } => Some(boss),
            _ => None,
        }
    }
}
