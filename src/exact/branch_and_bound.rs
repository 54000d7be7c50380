use super::reduced_matrix::ReducedCostMatrix;
use super::stats::SearchStats;
use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::scenario::{CityId, Cost, DistanceModel};
use crate::tour::Tour;
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Best-first branch-and-bound over reduced cost matrices.
///
/// Live subproblems are owned by an arena; the frontier is a binary heap of
/// lightweight handles carrying the subproblem's bound, depth, id and arena
/// slot. The heap prefers the smallest lower bound, breaks ties towards
/// deeper subproblems (they reach feasible leaves sooner) and finally
/// towards the older id, so expansion order is fully deterministic.
///
/// Children whose bound already matches the incumbent are dropped at
/// creation. A popped subproblem is checked once more, since the incumbent
/// may have improved while it sat in the frontier; that late check only
/// drops strictly worse entries, so a node admitted at its creation is
/// still expanded when the incumbent merely caught up with its bound. Both
/// kinds of discard count into [`SearchStats::pruned`].
///
/// One [`IterativeAlgorithm::execute_step`] pops and resolves exactly one
/// subproblem, so a driver can bound the run with `run_until_timeout`. Run
/// to completion, the incumbent is provably optimal.
///
/// # Example
/// ```
/// use atsp::algorithm::TerminatingIterativeAlgorithm;
/// use atsp::exact::BranchAndBound;
/// use atsp::scenario::Scenario;
///
/// let scenario = Scenario::from_matrix(vec![
///     vec![f64::INFINITY, 1.0, 2.0],
///     vec![2.0, f64::INFINITY, 1.0],
///     vec![1.0, 2.0, f64::INFINITY],
/// ])
/// .unwrap();
/// let tour = BranchAndBound::new(&scenario).run_to_completion().unwrap();
/// assert_eq!(tour.cost(), 3.0);
/// ```
pub struct BranchAndBound<'a, D> {
    model: &'a D,
    pool: SubproblemPool,
    frontier: BinaryHeap<FrontierEntry>,
    incumbent: Option<Tour>,
    stats: SearchStats,
    next_id: u64,
}

/// Handle into the arena, ordered for the max-heap so that the most
/// promising subproblem is popped first.
struct FrontierEntry {
    bound: Cost,
    depth: usize,
    id: u64,
    slot: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bound
            .total_cmp(&self.bound)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Slot arena for live subproblems. Slots freed by popped subproblems are
/// reused, so memory tracks the frontier instead of the whole search tree.
#[derive(Default)]
struct SubproblemPool {
    slots: Vec<Option<ReducedCostMatrix>>,
    free: Vec<usize>,
}

impl SubproblemPool {
    fn insert(&mut self, subproblem: ReducedCostMatrix) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(subproblem);
                slot
            }
            None => {
                self.slots.push(Some(subproblem));
                self.slots.len() - 1
            }
        }
    }

    fn take(&mut self, slot: usize) -> ReducedCostMatrix {
        self.free.push(slot);
        self.slots[slot].take().expect("frontier handle to an empty slot")
    }
}

impl<'a, D: DistanceModel> BranchAndBound<'a, D> {
    /// Builds the root subproblem, reduces it and seeds the frontier. No
    /// incumbent is installed; use [`BranchAndBound::set_incumbent`] to
    /// start from a heuristic tour.
    pub fn new(model: &'a D) -> Self {
        let mut search = Self {
            model,
            pool: SubproblemPool::default(),
            frontier: BinaryHeap::new(),
            incumbent: None,
            stats: SearchStats::new(),
            next_id: 0,
        };

        let mut root = ReducedCostMatrix::root(model, search.fresh_id());
        root.reduce();
        search.stats.created += 1;
        search.push(root);
        search
    }

    /// Installs `tour` as the starting incumbent if it beats the current
    /// one. Seed tours do not count as improvements.
    pub fn set_incumbent(&mut self, tour: Tour) {
        if tour.cost() < self.incumbent_cost() {
            self.incumbent = Some(tour);
        }
    }

    pub fn incumbent_cost(&self) -> Cost {
        self.incumbent.as_ref().map_or(Cost::INFINITY, Tour::cost)
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, subproblem: ReducedCostMatrix) {
        let bound = subproblem.lower_bound();
        let depth = subproblem.depth();
        let id = subproblem.id();
        let slot = self.pool.insert(subproblem);
        self.frontier.push(FrontierEntry {
            bound,
            depth,
            id,
            slot,
        });
    }

    /// A leaf's last edge is forced; stitch the committed edges into the
    /// tour and challenge the incumbent with its evaluated cost.
    fn resolve_leaf(&mut self, leaf: ReducedCostMatrix) {
        let forced = leaf.forced_edge();
        let order = cycle_order(leaf.committed(), forced);
        let tour = Tour::from_order(self.model, order);

        if tour.cost() < self.incumbent_cost() {
            debug!(
                "incumbent improved to {} at subproblem {}",
                tour.cost(),
                leaf.id()
            );
            self.stats.improvements += 1;
            self.incumbent = Some(tour);
        }
    }

    fn expand(&mut self, subproblem: ReducedCostMatrix) {
        for (from, to) in subproblem.candidate_edges() {
            let id = self.fresh_id();
            let child = subproblem.branch_on(from, to, id);
            self.stats.created += 1;

            if child.lower_bound() >= self.incumbent_cost() {
                self.stats.pruned += 1;
            } else {
                self.push(child);
            }
        }
    }
}

impl<'a, D: DistanceModel> IterativeAlgorithm for BranchAndBound<'a, D> {
    fn execute_step(&mut self) {
        self.stats.observe_frontier(self.frontier.len());

        let entry = match self.frontier.pop() {
            Some(entry) => entry,
            None => return,
        };
        let subproblem = self.pool.take(entry.slot);

        if subproblem.lower_bound() > self.incumbent_cost() {
            self.stats.pruned += 1;
            return;
        }

        self.stats.expanded += 1;
        if subproblem.is_leaf() {
            self.resolve_leaf(subproblem);
        } else {
            self.expand(subproblem);
        }
    }

    fn is_completed(&self) -> bool {
        self.frontier.is_empty()
    }

    fn best_known_solution(&self) -> Option<&Tour> {
        self.incumbent.as_ref()
    }
}

impl<'a, D: DistanceModel> TerminatingIterativeAlgorithm for BranchAndBound<'a, D> {}

/// Orders the closed edge set into the visit sequence starting at city 0.
fn cycle_order(committed: &[(CityId, CityId)], forced: (CityId, CityId)) -> Vec<CityId> {
    let n = committed.len() + 1;
    let mut succ = vec![0 as CityId; n];
    for &(u, v) in committed.iter().chain(std::iter::once(&forced)) {
        succ[u as usize] = v;
    }

    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    for _ in 0..n {
        order.push(current);
        current = succ[current as usize];
    }
    debug_assert_eq!(current, 0, "committed edges must close a single cycle");
    order
}
