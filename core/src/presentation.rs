//! Visual side effects requested by the simulation
//!
//! Handlers describe what should be shown; drawing it is the renderer's
//! business. [`RecordingPresentation`] keeps the requests in order, which is
//! what headless runs and tests inspect.

use crate::events::{EntityId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Impact,
    Teleport,
    DashSlash,
    RoricTeleportIn,
    RoricTeleportOut,
    RoricSummon,
    RoricBeamCharge,
    EtherealDash,
    CelestialAura,
}

/// RGBA tint applied over the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Tint {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Tint {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

pub trait Presentation {
    /// Emit `count` particles at `at`, optionally attached to an entity
    fn spawn_particles(&mut self, at: Point, kind: ParticleKind, count: u32, owner: Option<EntityId>);

    fn clear_particles(&mut self, owner: EntityId, kind: ParticleKind);

    fn spawn_aura(&mut self, owner: EntityId, at: Point, count: u32);

    fn clear_aura(&mut self, owner: EntityId);

    fn screen_shake(&mut self, duration_ticks: u32, intensity: f64);

    /// Drop the ambient light to zero for one flash, optionally tinted
    fn flash_ambient(&mut self, tint: Option<Tint>);

    fn override_ambient_darkness(&mut self, level: u8);

    fn release_ambient_darkness(&mut self);

    fn set_dark_phase(&mut self, dark: bool);

    fn start_rain(&mut self);

    fn stop_rain(&mut self);
}

/// One recorded presentation request
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    SpawnParticles {
        at: Point,
        kind: ParticleKind,
        count: u32,
        owner: Option<EntityId>,
    },
    ClearParticles {
        owner: EntityId,
        kind: ParticleKind,
    },
    SpawnAura {
        owner: EntityId,
        count: u32,
    },
    ClearAura {
        owner: EntityId,
    },
    ScreenShake {
        duration_ticks: u32,
        intensity: f64,
    },
    FlashAmbient {
        tint: Option<Tint>,
    },
    OverrideAmbientDarkness {
        level: u8,
    },
    ReleaseAmbientDarkness,
    SetDarkPhase(bool),
    StartRain,
    StopRain,
}

#[derive(Debug, Default)]
pub struct RecordingPresentation {
    calls: Vec<PresentationCall>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[PresentationCall] {
        &self.calls
    }

    /// Take the calls recorded so far, leaving the log empty
    pub fn take_calls(&mut self) -> Vec<PresentationCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, pred: impl Fn(&PresentationCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Total particles requested of `kind`
    pub fn particles_of(&self, kind: ParticleKind) -> u32 {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::SpawnParticles { kind: k, count, .. } if *k == kind => {
                    Some(*count)
                }
                _ => None,
            })
            .sum()
    }
}

impl Presentation for RecordingPresentation {
    fn spawn_particles(&mut self, at: Point, kind: ParticleKind, count: u32, owner: Option<EntityId>) {
        self.calls.push(PresentationCall::SpawnParticles {
            at,
            kind,
            count,
            owner,
        });
    }

    fn clear_particles(&mut self, owner: EntityId, kind: ParticleKind) {
        self.calls
            .push(PresentationCall::ClearParticles { owner, kind });
    }

    fn spawn_aura(&mut self, owner: EntityId, _at: Point, count: u32) {
        self.calls.push(PresentationCall::SpawnAura { owner, count });
    }

    fn clear_aura(&mut self, owner: EntityId) {
        self.calls.push(PresentationCall::ClearAura { owner });
    }

    fn screen_shake(&mut self, duration_ticks: u32, intensity: f64) {
        self.calls.push(PresentationCall::ScreenShake {
            duration_ticks,
            intensity,
        });
    }

    fn flash_ambient(&mut self, tint: Option<Tint>) {
        self.calls.push(PresentationCall::FlashAmbient { tint });
    }

    fn override_ambient_darkness(&mut self, level: u8) {
        self.calls
            .push(PresentationCall::OverrideAmbientDarkness { level });
    }

    fn release_ambient_darkness(&mut self) {
        self.calls.push(PresentationCall::ReleaseAmbientDarkness);
    }

    fn set_dark_phase(&mut self, dark: bool) {
        self.calls.push(PresentationCall::SetDarkPhase(dark));
    }

    fn start_rain(&mut self) {
        self.calls.push(PresentationCall::StartRain);
    }

    fn stop_rain(&mut self) {
        self.calls.push(PresentationCall::StopRain);
    }
}
