use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::scenario::{CityId, Cost, DistanceModel};
use crate::tour::Tour;
use fxhash::FxHashSet;

/// Greedy tour construction: starting from a candidate city, always move to
/// the cheapest unvisited successor. A walk that strands before covering all
/// cities is abandoned and the next start city is tried; the producer fails
/// once every start city has been used up.
///
/// One step is one start city, so the whole run takes at most `n` steps.
pub struct NearestNeighborGreedy<'a, D> {
    model: &'a D,
    next_start: CityId,
    tours_built: usize,
    best: Option<Tour>,
}

impl<'a, D: DistanceModel> NearestNeighborGreedy<'a, D> {
    pub fn new(model: &'a D) -> Self {
        Self {
            model,
            next_start: 0,
            tours_built: 0,
            best: None,
        }
    }

    /// Number of complete candidate tours evaluated so far.
    pub fn tours_built(&self) -> usize {
        self.tours_built
    }

    /// Follows the cheapest-successor rule from `start`. Returns the full
    /// walk or None if it strands early.
    fn walk_from(&self, start: CityId) -> Option<Vec<CityId>> {
        let n = self.model.len();
        let mut route = Vec::with_capacity(n);
        let mut visited = FxHashSet::default();
        let mut current = start;
        route.push(current);
        visited.insert(current);

        while route.len() < n {
            let mut cheapest: Option<(CityId, Cost)> = None;
            for to in 0..self.model.order() {
                if visited.contains(&to) {
                    continue;
                }
                let cost = self.model.cost(current, to);
                if cost.is_finite() && cheapest.map_or(true, |(_, best)| cost < best) {
                    cheapest = Some((to, cost));
                }
            }

            let (next, _) = cheapest?;
            route.push(next);
            visited.insert(next);
            current = next;
        }

        Some(route)
    }
}

impl<'a, D: DistanceModel> IterativeAlgorithm for NearestNeighborGreedy<'a, D> {
    fn execute_step(&mut self) {
        let start = self.next_start;
        self.next_start += 1;

        if let Some(route) = self.walk_from(start) {
            self.tours_built += 1;
            let tour = Tour::from_order(self.model, route);
            if tour.is_feasible() {
                self.best = Some(tour);
            }
        }
    }

    fn is_completed(&self) -> bool {
        self.best.is_some() || self.next_start >= self.model.order()
    }

    fn best_known_solution(&self) -> Option<&Tour> {
        self.best.as_ref()
    }
}

impl<'a, D: DistanceModel> TerminatingIterativeAlgorithm for NearestNeighborGreedy<'a, D> {}
