use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Work owed at a fixed rate.
///
/// Debt is kept in units of `1 / (rate * 1e9)` of a step so that folding in
/// elapsed time never accumulates rounding error.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    rate: u32,
    debt: u128,
}

impl FixedStep {
    pub fn new(rate: u32) -> Self {
        Self { rate, debt: 0 }
    }

    pub fn accumulate(&mut self, elapsed: Duration) {
        self.debt += elapsed.as_nanos() * u128::from(self.rate);
    }

    /// Consume one whole step if at least one is owed
    pub fn try_consume(&mut self) -> bool {
        if self.debt >= NANOS_PER_SEC {
            self.debt -= NANOS_PER_SEC;
            true
        } else {
            false
        }
    }

    /// Outstanding debt in steps, including the fractional part
    pub fn debt(&self) -> f64 {
        self.debt as f64 / NANOS_PER_SEC as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owes_one_step_per_interval() {
        let mut step = FixedStep::new(200);
        step.accumulate(Duration::from_millis(4));
        assert!(!step.try_consume());
        step.accumulate(Duration::from_millis(1));
        assert!(step.try_consume());
        assert!(!step.try_consume());
    }

    #[test]
    fn fractional_debt_carries_over() {
        let mut step = FixedStep::new(144);
        for _ in 0..1000 {
            step.accumulate(Duration::from_millis(1));
        }
        let mut consumed = 0;
        while step.try_consume() {
            consumed += 1;
        }
        assert_eq!(consumed, 144);
        assert!(step.debt() < 1.0);
    }
}
