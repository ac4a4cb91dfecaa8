//! One-shot cues at fixed offsets from the fight start
//!
//! A script is inert until a phase activates it. While active, each poll
//! fires every cue whose offset has been reached, in order, exactly once.
//! A poll after a long stall fires all overdue cues in that single poll.

use super::{DefinitionError, FightTimer};

#[derive(Debug, Clone, PartialEq)]
pub struct Cue<E> {
    /// Milliseconds after the fight start
    pub offset_ms: u64,
    pub effect: E,
}

#[derive(Debug, Clone)]
pub struct TimedScript<E> {
    cues: Vec<Cue<E>>,
    cursor: usize,
    timer: FightTimer,
    active: bool,
}

impl<E> TimedScript<E> {
    /// Build a script. Offsets must be non-decreasing.
    pub fn new(cues: Vec<Cue<E>>) -> Result<Self, DefinitionError> {
        if let Some(pair) = cues.windows(2).find(|w| w[1].offset_ms < w[0].offset_ms) {
            return Err(DefinitionError::Invalid {
                reason: format!(
                    "cue offsets must be ascending ({} ms listed after {} ms)",
                    pair[1].offset_ms, pair[0].offset_ms
                ),
            });
        }
        Ok(Self {
            cues,
            cursor: 0,
            timer: FightTimer::default(),
            active: false,
        })
    }

    /// The same effect at every offset
    pub fn uniform(offsets: &[u64], effect: E) -> Result<Self, DefinitionError>
    where
        E: Clone,
    {
        let cues = offsets
            .iter()
            .map(|&offset_ms| Cue {
                offset_ms,
                effect: effect.clone(),
            })
            .collect();
        Self::new(cues)
    }

    /// Arm the script against `fight`. Re-activating an active script keeps its cursor.
    pub fn activate(&mut self, fight: FightTimer) {
        if self.active {
            return;
        }
        self.timer = fight;
        self.cursor = 0;
        self.active = true;
    }

    /// Disarm and rewind so the next activation starts from the first cue
    pub fn deactivate(&mut self) {
        self.active = false;
        self.cursor = 0;
        self.timer.reset();
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.active {
            self.timer.pause(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.active {
            self.timer.resume(now_ms);
        }
    }

    /// Fire every cue that is due at `now_ms`. Returns the number fired.
    pub fn poll(&mut self, now_ms: u64, mut fire: impl FnMut(&E)) -> usize {
        if !self.active {
            return 0;
        }
        let Some(elapsed) = self.timer.elapsed(now_ms) else {
            return 0;
        };
        let mut fired = 0;
        while let Some(cue) = self.cues.get(self.cursor) {
            if cue.offset_ms > elapsed {
                break;
            }
            fire(&cue.effect);
            self.cursor += 1;
            fired += 1;
        }
        fired
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.cues.len()
    }
}
