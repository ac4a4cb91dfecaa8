use std::cell::RefCell;

/// State-level request raised during a tick and applied once the tick completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCommand {
    Pause,
    Resume,
    Reset,
}

/// Queue of deferred state commands shared through the game context
#[derive(Debug, Default)]
pub struct StateCommands {
    pending: RefCell<Vec<StateCommand>>,
}

impl StateCommands {
    pub fn push(&self, command: StateCommand) {
        self.pending.borrow_mut().push(command);
    }

    pub fn drain(&self) -> Vec<StateCommand> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
