use tracing::{debug, info};

use super::{EncounterRoster, EncounterSet, GameState, StateCommand};
use crate::boss::DefinitionError;
use crate::context::GameContext;
use crate::events::{EventInbox, HandlerRegistry};
use crate::game_loop::SimulationError;

/// In-game state: owns the handler registry and runs it every tick.
///
/// Handlers are built up front and wired on [`GameState::enter`]. On exit
/// the registry and handlers are dropped, which also silences their bus
/// listeners; a fresh `PlayingState` is built for the next session.
pub struct PlayingState {
    ctx: GameContext,
    registry: HandlerRegistry,
    encounters: Option<EncounterSet>,
    inbox: Option<EventInbox>,
    paused: bool,
}

impl PlayingState {
    pub fn new(ctx: GameContext, roster: &EncounterRoster) -> Result<Self, DefinitionError> {
        let encounters = EncounterSet::build(&ctx, roster)?;
        Ok(Self {
            ctx,
            registry: HandlerRegistry::new(),
            encounters: Some(encounters),
            inbox: None,
            paused: false,
        })
    }

    /// Fold events from other threads into each tick
    pub fn with_inbox(mut self, inbox: EventInbox) -> Self {
        self.inbox = Some(inbox);
        self
    }

    pub fn encounters(&self) -> Option<&EncounterSet> {
        self.encounters.as_ref()
    }

    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    fn apply_commands(&mut self) {
        for command in self.ctx.commands.drain() {
            debug!(?command, "Applying state command");
            match command {
                StateCommand::Pause if !self.paused => {
                    self.paused = true;
                    self.registry.pause_all();
                    info!("Game paused");
                }
                StateCommand::Resume if self.paused => {
                    self.paused = false;
                    self.registry.unpause_all();
                    info!("Game resumed");
                }
                StateCommand::Reset => self.registry.reset_all(),
                StateCommand::Pause | StateCommand::Resume => {}
            }
        }
    }
}

impl GameState for PlayingState {
    fn name(&self) -> &'static str {
        "playing"
    }

    fn enter(&mut self) {
        // Commands raised before this state existed are stale
        self.ctx.commands.drain();
        if let Some(encounters) = &self.encounters {
            encounters.install(&self.ctx, &mut self.registry);
        }
        debug!(handlers = self.registry.len(), "Playing state ready");
    }

    fn exit(&mut self) {
        self.registry.clear();
        self.encounters = None;
        self.inbox = None;
    }

    fn update(&mut self) -> Result<(), SimulationError> {
        if let Some(mut inbox) = self.inbox.take() {
            // Commands raised by one event land before the next event is published
            while let Some(event) = inbox.next_event() {
                self.ctx.bus.publish(event);
                self.apply_commands();
            }
            self.inbox = Some(inbox);
        }
        self.apply_commands();

        if !self.paused {
            self.registry.continuous_update_all()?;
        }

        self.apply_commands();
        Ok(())
    }

    fn reset(&mut self) {
        self.ctx.commands.drain();
        if self.paused {
            self.paused = false;
            self.registry.unpause_all();
        }
        self.registry.reset_all();
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
