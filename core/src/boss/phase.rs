//! Forward-only phase progression
//!
//! A boss fight moves through an ordered list of phases. Each phase is
//! entered at most once, and only phases after the current one can be
//! entered.

use serde::{Deserialize, Serialize};

use super::PhaseError;

/// An ordered, closed set of phases
pub trait Phase: Copy + Eq + std::fmt::Debug + 'static {
    /// Every phase in fight order. The first entry is the initial phase, so
    /// the list must not be empty.
    const ORDER: &'static [Self];

    fn name(self) -> &'static str;

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|p| *p == self)
            .unwrap_or_default()
    }

    fn initial() -> Self {
        const { assert!(!Self::ORDER.is_empty(), "Phase::ORDER must not be empty") };
        Self::ORDER[0]
    }

    fn successor(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }
}

/// What moves a fight into a phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PhaseTrigger {
    /// Fight time since engagement reaches `at_ms`
    Elapsed { at_ms: u64 },
    /// Boss health drops to `percent` or below
    HealthBelow { percent: f32 },
}

impl PhaseTrigger {
    pub fn is_met(&self, elapsed_ms: u64, health_percent: f32) -> bool {
        match *self {
            Self::Elapsed { at_ms } => elapsed_ms >= at_ms,
            Self::HealthBelow { percent } => health_percent <= percent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhaseMachine<P: Phase> {
    current: P,
    history: Vec<P>,
}

impl<P: Phase> Default for PhaseMachine<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Phase> PhaseMachine<P> {
    pub fn new() -> Self {
        Self {
            current: P::initial(),
            history: vec![P::initial()],
        }
    }

    pub fn current(&self) -> P {
        self.current
    }

    /// Phases entered so far, in order, starting with the initial phase
    pub fn history(&self) -> &[P] {
        &self.history
    }

    pub fn has_entered(&self, phase: P) -> bool {
        self.history.contains(&phase)
    }

    pub fn is_final(&self) -> bool {
        self.current.successor().is_none()
    }

    /// Move to `next`, returning the phase that was left.
    pub fn transition_to(&mut self, next: P) -> Result<P, PhaseError> {
        if self.has_entered(next) || next.index() <= self.current.index() {
            return Err(PhaseError::NotForward {
                from: self.current.name(),
                to: next.name(),
            });
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(next);
        Ok(previous)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
