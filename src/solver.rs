use crate::algorithm::IterativeAlgorithm;
use crate::exact::BranchAndBound;
use crate::heuristics::{NearestNeighborGreedy, RandomTourSampler, TwoOptImprovement};
use crate::scenario::{Cost, Scenario};
use crate::tour::Tour;
use log::info;
use rand::Rng;
use std::time::{Duration, Instant};

/// Default time budget, in seconds, for every strategy.
pub const DEFAULT_TIME_ALLOWANCE: f64 = 60.0;

/// The uniform per-call result record shared by all strategies. `count` is
/// strategy-specific (permutations tried, tours built, improving moves, or
/// incumbent updates); the last three fields are only filled in by
/// branch-and-bound.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// Cost of the best tour found, infinite if none was.
    pub cost: Cost,
    /// Wall-clock duration of the call in seconds.
    pub time: f64,
    /// Strategy-specific work counter.
    pub count: usize,
    /// Best tour found, if any.
    pub soln: Option<Tour>,
    /// Largest frontier observed.
    pub max: Option<usize>,
    /// Subproblems created.
    pub total: Option<usize>,
    /// Subproblems discarded by bound comparison.
    pub pruned: Option<usize>,
}

impl SolveReport {
    fn from_tour(soln: Option<Tour>, started: Instant, count: usize) -> Self {
        Self {
            cost: soln.as_ref().map_or(Cost::INFINITY, Tour::cost),
            time: started.elapsed().as_secs_f64(),
            count,
            soln,
            max: None,
            total: None,
            pruned: None,
        }
    }
}

/// Entry points wiring heuristics and the exact search together under a
/// time budget. Every call builds its frontier, incumbent and statistics
/// from scratch; nothing carries over between calls.
///
/// Malformed inputs never reach this type: [`Scenario`] construction
/// already rejects them.
pub struct TspSolver {
    scenario: Scenario,
}

impl TspSolver {
    pub fn new(scenario: Scenario) -> Self {
        Self { scenario }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Samples random permutations until one is feasible or the budget
    /// runs out. `count` is the number of permutations tried.
    pub fn random_tour<R: Rng>(&self, time_allowance: f64, rng: &mut R) -> SolveReport {
        let started = Instant::now();
        let mut sampler = RandomTourSampler::new(&self.scenario, rng);
        sampler.run_until_timeout(Duration::from_secs_f64(time_allowance));

        let count = sampler.attempts();
        let soln = sampler.best_known_solution().cloned();
        log_report("random", SolveReport::from_tour(soln, started, count))
    }

    /// Builds a tour with the cheapest-successor rule, rotating through
    /// start cities. `count` is the number of complete tours evaluated.
    pub fn nearest_neighbor(&self, time_allowance: f64) -> SolveReport {
        let started = Instant::now();
        let mut greedy = NearestNeighborGreedy::new(&self.scenario);
        greedy.run_until_timeout(Duration::from_secs_f64(time_allowance));

        let count = greedy.tours_built();
        let soln = greedy.best_known_solution().cloned();
        log_report("greedy", SolveReport::from_tour(soln, started, count))
    }

    /// Improves a heuristic seed tour with 2-opt sweeps. `count` is the
    /// number of improving moves applied.
    pub fn two_opt<R: Rng>(&self, time_allowance: f64, rng: &mut R) -> SolveReport {
        let started = Instant::now();
        let deadline = started + Duration::from_secs_f64(time_allowance);

        let seed = match self.seed_tour(deadline, rng) {
            Some(seed) => seed,
            None => return log_report("two-opt", SolveReport::from_tour(None, started, 0)),
        };

        let mut search = TwoOptImprovement::new(&self.scenario, seed);
        search.run_until_timeout(remaining(deadline));

        let count = search.improvements();
        let soln = search.best_known_solution().cloned().filter(Tour::is_feasible);
        log_report("two-opt", SolveReport::from_tour(soln, started, count))
    }

    /// Exact branch-and-bound search, seeded with the best heuristic tour
    /// the budget allows. `count` is the number of incumbent updates during
    /// the search; `max`, `total` and `pruned` carry the search statistics.
    pub fn branch_and_bound<R: Rng>(&self, time_allowance: f64, rng: &mut R) -> SolveReport {
        let started = Instant::now();
        let deadline = started + Duration::from_secs_f64(time_allowance);

        let mut search = BranchAndBound::new(&self.scenario);
        if let Some(seed) = self.seed_tour(deadline, rng) {
            search.set_incumbent(seed);
        }
        search.run_until_timeout(remaining(deadline));

        let stats = *search.stats();
        let soln = search.best_known_solution().cloned();
        let report = SolveReport {
            max: Some(stats.max_frontier),
            total: Some(stats.created),
            pruned: Some(stats.pruned),
            ..SolveReport::from_tour(soln, started, stats.improvements)
        };
        log_report("branch-and-bound", report)
    }

    /// Greedy first, random sampling as the fallback, both capped by the
    /// shared deadline.
    fn seed_tour<R: Rng>(&self, deadline: Instant, rng: &mut R) -> Option<Tour> {
        let mut greedy = NearestNeighborGreedy::new(&self.scenario);
        greedy.run_until_timeout(remaining(deadline));
        if let Some(tour) = greedy.best_known_solution() {
            return Some(tour.clone());
        }

        let mut sampler = RandomTourSampler::new(&self.scenario, rng);
        sampler.run_until_timeout(remaining(deadline));
        sampler.best_known_solution().cloned()
    }
}

fn log_report(strategy: &str, report: SolveReport) -> SolveReport {
    info!(
        "{} finished: cost={}, count={}, {:.3}s",
        strategy, report.cost, report.count, report.time
    );
    report
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const INF: Cost = Cost::INFINITY;

    fn ring() -> Scenario {
        Scenario::from_matrix(vec![
            vec![INF, 1.0, INF, 1.0],
            vec![1.0, INF, 1.0, INF],
            vec![INF, 1.0, INF, 1.0],
            vec![1.0, INF, 1.0, INF],
        ])
        .unwrap()
    }

    fn infeasible() -> Scenario {
        Scenario::from_matrix(vec![
            vec![INF, 1.0, INF, INF],
            vec![1.0, INF, INF, INF],
            vec![INF, INF, INF, 1.0],
            vec![INF, INF, 1.0, INF],
        ])
        .unwrap()
    }

    #[test]
    fn branch_and_bound_solves_the_ring() {
        let solver = TspSolver::new(ring());
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let report = solver.branch_and_bound(DEFAULT_TIME_ALLOWANCE, &mut rng);

        assert_eq!(report.cost, 4.0);
        assert!(report.soln.is_some());
        assert!(report.total.unwrap() >= 5);
        assert!(report.pruned.unwrap() >= 1);
        assert!(report.max.unwrap() >= 1);
    }

    #[test]
    fn heuristic_reports_leave_search_fields_empty() {
        let solver = TspSolver::new(ring());
        let mut rng = Pcg64Mcg::seed_from_u64(2);

        let random = solver.random_tour(DEFAULT_TIME_ALLOWANCE, &mut rng);
        assert_eq!(random.cost, 4.0);
        assert!(random.count >= 1);
        assert!(random.max.is_none() && random.total.is_none() && random.pruned.is_none());

        let greedy = solver.nearest_neighbor(DEFAULT_TIME_ALLOWANCE);
        assert_eq!(greedy.cost, 4.0);
        assert!(greedy.max.is_none() && greedy.total.is_none() && greedy.pruned.is_none());
    }

    #[test]
    fn two_opt_returns_a_feasible_tour() {
        let solver = TspSolver::new(ring());
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let report = solver.two_opt(DEFAULT_TIME_ALLOWANCE, &mut rng);

        assert_eq!(report.cost, 4.0);
        assert!(report.soln.unwrap().is_feasible());
    }

    #[test]
    fn infeasible_scenarios_report_null_solutions() {
        let solver = TspSolver::new(infeasible());
        let mut rng = Pcg64Mcg::seed_from_u64(4);

        let greedy = solver.nearest_neighbor(DEFAULT_TIME_ALLOWANCE);
        assert!(greedy.cost.is_infinite());
        assert!(greedy.soln.is_none());

        let bnb = solver.branch_and_bound(0.5, &mut rng);
        assert!(bnb.cost.is_infinite());
        assert!(bnb.soln.is_none());
        assert_eq!(bnb.count, 0);
    }

    #[test]
    fn exhausted_budget_still_returns_a_record() {
        let solver = TspSolver::new(ring());
        let mut rng = Pcg64Mcg::seed_from_u64(5);

        // A zero budget stops every phase before its first step.
        let report = solver.random_tour(0.0, &mut rng);
        assert!(report.cost.is_infinite());
        assert!(report.soln.is_none());
        assert_eq!(report.count, 0);
        assert!(report.time >= 0.0);
    }

    #[test]
    fn random_tour_is_deterministic_for_a_seed() {
        let solver = TspSolver::new(ring());

        let mut rng = Pcg64Mcg::seed_from_u64(6);
        let first = solver.random_tour(DEFAULT_TIME_ALLOWANCE, &mut rng);
        let mut rng = Pcg64Mcg::seed_from_u64(6);
        let second = solver.random_tour(DEFAULT_TIME_ALLOWANCE, &mut rng);

        assert_eq!(first.count, second.count);
        assert_eq!(first.soln, second.soln);
    }
}
