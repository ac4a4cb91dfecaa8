//! Session wiring without a window
//!
//! Builds a [`GameContext`] around the recording collaborators so the whole
//! simulation can run in a terminal or a test and be inspected afterwards.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::boss::RecordingAi;
use crate::boss::roric::RoricDefinition;
use crate::context::{DebugSettings, GameContext, ManualClock, TimeSource};
use crate::presentation::RecordingPresentation;
use crate::state::EncounterRoster;
use crate::world::RecordingWorld;

pub struct HeadlessSession<C> {
    pub clock: C,
    pub ctx: GameContext,
    pub presentation: Rc<RefCell<RecordingPresentation>>,
    pub world: Rc<RefCell<RecordingWorld>>,
    pub ai: Rc<RefCell<RecordingAi>>,
}

impl<C: TimeSource + Clone + 'static> HeadlessSession<C> {
    pub fn with_clock(clock: C, debug: DebugSettings) -> Self {
        let presentation = Rc::new(RefCell::new(RecordingPresentation::new()));
        let world = Rc::new(RefCell::new(RecordingWorld::new()));
        let ctx = GameContext::new(
            Arc::new(clock.clone()),
            presentation.clone(),
            world.clone(),
            debug,
        );
        Self {
            clock,
            ctx,
            presentation,
            world,
            ai: Rc::new(RefCell::new(RecordingAi::default())),
        }
    }

    /// Roster wired to this session's recording AI
    pub fn roster(&self, roric: RoricDefinition) -> EncounterRoster {
        EncounterRoster::new(roric, self.ai.clone())
    }
}

impl HeadlessSession<ManualClock> {
    /// Session on a manual clock starting at zero
    pub fn new() -> Self {
        Self::manual(DebugSettings::default())
    }

    pub fn manual(debug: DebugSettings) -> Self {
        Self::with_clock(ManualClock::new(), debug)
    }
}

impl Default for HeadlessSession<ManualClock> {
    fn default() -> Self {
        Self::new()
    }
}
