//! Time budgets handed to the work loop by a scheduling source.
//!
//! The reconciler has no clock of its own. It only asks the deadline how much
//! time is left before each unit of work, and treats the answer as an opaque
//! number that never grows within one quantum.

use std::cell::Cell;
use std::time::{Duration, Instant};

pub trait Deadline {
    /// Remaining budget for the current quantum, in milliseconds
    fn time_remaining(&self) -> f64;
}

impl<F> Deadline for F
where
    F: Fn() -> f64,
{
    fn time_remaining(&self) -> f64 {
        self()
    }
}

/// Deadline that never expires; one quantum finishes the traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> f64 {
        f64::INFINITY
    }
}

/// Wall-clock budget measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct TimeSlice {
    started: Instant,
    budget: Duration,
}

impl TimeSlice {
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl Deadline for TimeSlice {
    fn time_remaining(&self) -> f64 {
        let left = self.budget.saturating_sub(self.started.elapsed());
        left.as_secs_f64() * 1000.0
    }
}

/// Budget of exactly `units` units of work.
///
/// Every query that finds budget left consumes one unit, so with the loop's
/// check-before-each-unit discipline this permits exactly `units` units.
#[derive(Debug)]
pub struct UnitBudget {
    remaining: Cell<usize>,
}

impl UnitBudget {
    pub fn new(units: usize) -> Self {
        Self {
            remaining: Cell::new(units),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

impl Deadline for UnitBudget {
    fn time_remaining(&self) -> f64 {
        match self.remaining.get() {
            0 => 0.0,
            n => {
                self.remaining.set(n - 1);
                f64::INFINITY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_budget_counts_down() {
        let budget = UnitBudget::new(2);
        assert!(budget.time_remaining() > 1.0);
        assert!(budget.time_remaining() > 1.0);
        assert_eq!(budget.time_remaining(), 0.0);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_closure_deadline() {
        let deadline = || 3.0;
        assert_eq!(deadline.time_remaining(), 3.0);
    }

    #[test]
    fn test_time_slice_expires() {
        let expired = TimeSlice::new(Duration::ZERO);
        assert_eq!(expired.time_remaining(), 0.0);

        let generous = TimeSlice::from_millis(60_000);
        assert!(generous.time_remaining() > 1.0);
    }

    #[test]
    fn test_unbounded() {
        assert!(Unbounded.time_remaining().is_infinite());
    }
}
