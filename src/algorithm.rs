//! Every solver strategy in this crate is exposed through the
//! [`IterativeAlgorithm`] trait.
//!
//! The contract splits a run into small steps so that an external driver can
//! interleave stepping with its own bookkeeping, most importantly the
//! wall-clock budget check. A step is never interrupted; the budget is only
//! consulted between steps.

use crate::scenario::Cost;
use crate::tour::Tour;
use std::time::{Duration, Instant};

/// Step-wise execution interface shared by all strategies.
///
/// Implementors provide [`IterativeAlgorithm::execute_step`],
/// [`IterativeAlgorithm::is_completed`] and
/// [`IterativeAlgorithm::best_known_solution`]. Construction is left to each
/// strategy since the parameters differ; it should stay cheap and defer real
/// work to the first step.
///
/// Strategies that are guaranteed to run out of work on their own should
/// additionally adopt the [`TerminatingIterativeAlgorithm`] marker.
pub trait IterativeAlgorithm {
    /// Advances the computation by one unit of work, e.g. one frontier
    /// expansion or one candidate tour. Must not be called again once
    /// [`IterativeAlgorithm::is_completed`] returns true.
    fn execute_step(&mut self);

    /// Returns true iff there is no more work left.
    fn is_completed(&self) -> bool;

    /// Returns the best tour found so far, if any.
    fn best_known_solution(&self) -> Option<&Tour>;

    /// Cost of the best tour found so far; infinite while none is known.
    fn best_known_cost(&self) -> Cost {
        self.best_known_solution().map_or(Cost::INFINITY, Tour::cost)
    }

    /// Keeps stepping while `predicate` holds and work remains. The
    /// predicate is evaluated before every step, so a false predicate on
    /// entry means no step runs at all.
    fn run_while<F: FnMut(&Self) -> bool>(&mut self, mut predicate: F)
    where
        Self: Sized,
    {
        while !self.is_completed() && predicate(self) {
            self.execute_step();
        }
    }

    /// Runs until the algorithm completes or `budget` wall-clock time has
    /// elapsed. The budget is re-checked before every step; a step already
    /// in flight is not cut short, so the bound is cooperative rather than
    /// hard real-time.
    fn run_until_timeout(&mut self, budget: Duration)
    where
        Self: Sized,
    {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < budget);
    }
}

/// Marker for algorithms that exhaust their search space in finite time.
pub trait TerminatingIterativeAlgorithm: IterativeAlgorithm + Sized {
    /// Steps until completion and returns the best tour found, if any.
    fn run_to_completion(&mut self) -> Option<Tour> {
        while !self.is_completed() {
            self.execute_step();
        }
        self.best_known_solution().cloned()
    }
}
