use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::scenario::{CityId, DistanceModel};
use crate::tour::{tour_cost, Tour};

/// Local search over segment reversals (2-opt), seeded with an existing
/// tour. One step is one full sweep over all reversal candidates; the best
/// strictly improving move of the sweep is applied. The search completes
/// once a sweep finds no improvement.
///
/// With asymmetric costs a reversal re-prices the whole reversed segment,
/// so candidate moves are scored by evaluating the modified tour instead of
/// a local delta.
pub struct TwoOptImprovement<'a, D> {
    model: &'a D,
    current: Vec<CityId>,
    best: Tour,
    improvements: usize,
    stalled: bool,
}

impl<'a, D: DistanceModel> TwoOptImprovement<'a, D> {
    pub fn new(model: &'a D, seed: Tour) -> Self {
        Self {
            model,
            current: seed.order().to_vec(),
            best: seed,
            improvements: 0,
            stalled: false,
        }
    }

    /// Number of improving moves applied so far.
    pub fn improvements(&self) -> usize {
        self.improvements
    }
}

impl<'a, D: DistanceModel> IterativeAlgorithm for TwoOptImprovement<'a, D> {
    fn execute_step(&mut self) {
        let n = self.current.len();
        let mut best_cost = self.best.cost();
        let mut best_move = None;

        for i in 0..n - 1 {
            for j in i + 1..n {
                self.current[i..=j].reverse();
                let cost = tour_cost(self.model, &self.current);
                self.current[i..=j].reverse();

                if cost < best_cost {
                    best_cost = cost;
                    best_move = Some((i, j));
                }
            }
        }

        match best_move {
            Some((i, j)) => {
                self.current[i..=j].reverse();
                self.improvements += 1;
                self.best = Tour::from_order(self.model, self.current.clone());
                debug_assert_eq!(self.best.cost(), best_cost);
            }
            None => self.stalled = true,
        }
    }

    fn is_completed(&self) -> bool {
        self.stalled
    }

    fn best_known_solution(&self) -> Option<&Tour> {
        Some(&self.best)
    }
}

impl<'a, D: DistanceModel> TerminatingIterativeAlgorithm for TwoOptImprovement<'a, D> {}
