use thiserror::Error;

/// Failure of a single logical update
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("handler '{handler}' was still borrowed when its update ran")]
    HandlerBusy { handler: &'static str },

    #[error("{0}")]
    Fault(String),
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("invalid loop settings: {reason}")]
    InvalidSettings { reason: &'static str },

    #[error("logical update {tick} failed")]
    Update {
        tick: u64,
        #[source]
        source: SimulationError,
    },

    #[error("failed to spawn game loop thread")]
    Spawn(#[source] std::io::Error),

    #[error("game loop thread panicked")]
    Panicked,
}
