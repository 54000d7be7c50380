use crate::algorithm::IterativeAlgorithm;
use crate::scenario::{CityId, DistanceModel};
use crate::tour::{tour_cost, Tour};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draws uniformly random city permutations until one of them is a
/// feasible tour. Used to seed the branch-and-bound incumbent when the
/// greedy construction comes up empty.
///
/// One step is one permutation; the sampler never completes on a scenario
/// without a feasible tour, so it must be driven with a time budget.
pub struct RandomTourSampler<'a, D, R> {
    model: &'a D,
    rng: &'a mut R,
    order: Vec<CityId>,
    best: Option<Tour>,
    attempts: usize,
}

impl<'a, D: DistanceModel, R: Rng> RandomTourSampler<'a, D, R> {
    pub fn new(model: &'a D, rng: &'a mut R) -> Self {
        Self {
            model,
            rng,
            order: (0..model.order()).collect(),
            best: None,
            attempts: 0,
        }
    }

    /// Number of permutations drawn so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl<'a, D: DistanceModel, R: Rng> IterativeAlgorithm for RandomTourSampler<'a, D, R> {
    fn execute_step(&mut self) {
        self.order.shuffle(self.rng);
        self.attempts += 1;

        if tour_cost(self.model, &self.order).is_finite() {
            self.best = Some(Tour::from_order(self.model, self.order.clone()));
        }
    }

    fn is_completed(&self) -> bool {
        self.best.is_some()
    }

    fn best_known_solution(&self) -> Option<&Tour> {
        self.best.as_ref()
    }
}
