/// Boss behaviour controller, owned by the enemy system.
///
/// Encounter handlers only need to interrupt it when the fight changes phase.
pub trait BossAi {
    /// Cancel the current action and fall back to idle
    fn interrupt_and_idle(&mut self);
}

/// Records interruptions for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingAi {
    pub interrupts: u32,
}

impl BossAi for RecordingAi {
    fn interrupt_and_idle(&mut self) {
        self.interrupts += 1;
    }
}
