use crate::scenario::{CityId, Cost, DistanceModel};

/// A branch-and-bound subproblem: the matrix of still-admissible edge
/// costs, the edges committed so far (in selection order), and the lower
/// bound accumulated through matrix reduction.
///
/// The bound is admissible: reduction only ever subtracts amounts that any
/// completion must pay, so it never exceeds the cheapest tour reachable
/// from this subproblem. Identity is the creation id, never the content.
#[derive(Clone, Debug)]
pub struct ReducedCostMatrix {
    n: usize,
    costs: Vec<Cost>,
    committed: Vec<(CityId, CityId)>,
    lower_bound: Cost,
    id: u64,
}

impl ReducedCostMatrix {
    /// Builds the root subproblem from the full distance matrix. The
    /// caller is expected to [`ReducedCostMatrix::reduce`] it before use.
    pub fn root<D: DistanceModel>(model: &D, id: u64) -> Self {
        let n = model.len();
        let mut costs = Vec::with_capacity(n * n);
        for from in 0..model.order() {
            for to in 0..model.order() {
                costs.push(if from == to {
                    Cost::INFINITY
                } else {
                    model.cost(from, to)
                });
            }
        }

        Self {
            n,
            costs,
            committed: Vec::new(),
            lower_bound: 0.0,
            id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lower_bound(&self) -> Cost {
        self.lower_bound
    }

    /// Number of committed edges.
    pub fn depth(&self) -> usize {
        self.committed.len()
    }

    pub fn committed(&self) -> &[(CityId, CityId)] {
        &self.committed
    }

    /// A leaf has all but one edge committed; the last edge is forced.
    pub fn is_leaf(&self) -> bool {
        self.committed.len() + 1 == self.n
    }

    pub fn cost_at(&self, from: CityId, to: CityId) -> Cost {
        self.costs[from as usize * self.n + to as usize]
    }

    fn set(&mut self, from: CityId, to: CityId, cost: Cost) {
        self.costs[from as usize * self.n + to as usize] = cost;
    }

    /// Subtracts every row's and then every column's minimum finite value,
    /// adding the subtracted total to the lower bound. Rows and columns
    /// whose minimum is zero or that hold no finite entry are skipped.
    /// Reducing an already-reduced matrix is a no-op.
    pub fn reduce(&mut self) -> Cost {
        let mut total = 0.0;

        for row in self.costs.chunks_exact_mut(self.n) {
            let min = row.iter().copied().fold(Cost::INFINITY, Cost::min);
            if min.is_finite() && min > 0.0 {
                for cost in row.iter_mut() {
                    *cost -= min;
                }
                total += min;
            }
        }

        for to in 0..self.n {
            let min = (0..self.n)
                .map(|from| self.costs[from * self.n + to])
                .fold(Cost::INFINITY, Cost::min);
            if min.is_finite() && min > 0.0 {
                for from in 0..self.n {
                    self.costs[from * self.n + to] -= min;
                }
                total += min;
            }
        }

        self.lower_bound += total;
        total
    }

    /// Derives the child that commits the edge `from -> to`: the source row,
    /// destination column and reverse edge become inadmissible, as does the
    /// edge that would close the committed chain through `from -> to` while
    /// cities are still missing. The child is re-reduced, so its bound is
    /// the parent's plus the committed entry plus whatever the reduction
    /// recovers.
    pub fn branch_on(&self, from: CityId, to: CityId, id: u64) -> Self {
        let committed_cost = self.cost_at(from, to);
        debug_assert!(committed_cost.is_finite());

        let mut child = Self {
            n: self.n,
            costs: self.costs.clone(),
            committed: self.committed.clone(),
            lower_bound: self.lower_bound + committed_cost,
            id,
        };

        for k in 0..self.n as CityId {
            child.set(from, k, Cost::INFINITY);
            child.set(k, to, Cost::INFINITY);
        }
        child.set(to, from, Cost::INFINITY);
        child.committed.push((from, to));

        // The committed edges form vertex-disjoint chains. Closing the
        // chain that now runs through `from -> to` is only allowed as the
        // final edge of a tour.
        if child.committed.len() + 1 < child.n {
            let (start, end) = child.chain_through(from, to);
            child.set(end, start, Cost::INFINITY);
        }

        child.reduce();
        child
    }

    /// Iterates over all still-admissible edges of this subproblem.
    pub fn candidate_edges(&self) -> impl Iterator<Item = (CityId, CityId)> + '_ {
        (0..self.n as CityId)
            .flat_map(move |from| (0..self.n as CityId).map(move |to| (from, to)))
            .filter(|&(from, to)| self.cost_at(from, to).is_finite())
    }

    /// Start and end of the committed chain containing the edge
    /// `from -> to`.
    fn chain_through(&self, from: CityId, to: CityId) -> (CityId, CityId) {
        let mut succ = vec![None; self.n];
        let mut pred = vec![None; self.n];
        for &(u, v) in &self.committed {
            succ[u as usize] = Some(v);
            pred[v as usize] = Some(u);
        }

        let mut start = from;
        while let Some(p) = pred[start as usize] {
            start = p;
        }
        let mut end = to;
        while let Some(s) = succ[end as usize] {
            end = s;
        }
        (start, end)
    }

    /// On a leaf, the one edge whose source has no committed outgoing edge
    /// and whose destination has no committed incoming edge.
    pub fn forced_edge(&self) -> (CityId, CityId) {
        debug_assert!(self.is_leaf());

        let mut is_source = vec![false; self.n];
        let mut is_dest = vec![false; self.n];
        for &(u, v) in &self.committed {
            is_source[u as usize] = true;
            is_dest[v as usize] = true;
        }

        let from = is_source.iter().position(|&s| !s).expect("leaf invariant") as CityId;
        let to = is_dest.iter().position(|&d| !d).expect("leaf invariant") as CityId;
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    const INF: Cost = Cost::INFINITY;

    fn example() -> Scenario {
        Scenario::from_matrix(vec![
            vec![INF, 4.0, 1.0, 9.0],
            vec![3.0, INF, 6.0, 11.0],
            vec![4.0, 1.0, INF, 2.0],
            vec![6.0, 5.0, 4.0, INF],
        ])
        .unwrap()
    }

    #[test]
    fn reduce_collects_row_and_column_minima() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);

        // Row minima 1, 3, 1, 4 leave a zero in every row; afterwards
        // column 3 still lacks a zero and gives up 1 more.
        assert_eq!(root.reduce(), 1.0 + 3.0 + 1.0 + 4.0 + 1.0);
        assert_eq!(root.lower_bound(), 10.0);
        assert_eq!(root.cost_at(0, 2), 0.0);
        assert_eq!(root.cost_at(2, 3), 0.0);
    }

    #[test]
    fn reduce_is_idempotent() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);
        root.reduce();

        let before = root.clone();
        assert_eq!(root.reduce(), 0.0);
        assert_eq!(root.lower_bound(), before.lower_bound());
        assert_eq!(root.costs, before.costs);
    }

    #[test]
    fn reduce_skips_rows_without_finite_entries() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);
        root.reduce();

        let child = root.branch_on(0, 2, 1);
        // Row 0 is fully inadmissible in the child; reducing again must not
        // touch it or the bound.
        let mut again = child.clone();
        assert_eq!(again.reduce(), 0.0);
        assert_eq!(again.lower_bound(), child.lower_bound());
    }

    #[test]
    fn branch_bound_is_monotone() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);
        root.reduce();

        let mut id = 1;
        for (from, to) in root.candidate_edges().collect::<Vec<_>>() {
            let child = root.branch_on(from, to, id);
            id += 1;
            assert!(
                child.lower_bound() >= root.lower_bound(),
                "bound shrank on edge ({}, {})",
                from,
                to
            );
            for (f2, t2) in child.candidate_edges().collect::<Vec<_>>() {
                let grandchild = child.branch_on(f2, t2, id);
                id += 1;
                assert!(grandchild.lower_bound() >= child.lower_bound());
            }
        }
    }

    #[test]
    fn branch_excludes_row_column_and_reverse_edge() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);
        root.reduce();

        let child = root.branch_on(0, 2, 1);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.committed(), &[(0, 2)]);
        for k in 0..4 {
            assert!(child.cost_at(0, k).is_infinite(), "row 0 must be closed");
            assert!(child.cost_at(k, 2).is_infinite(), "column 2 must be closed");
        }
        assert!(child.cost_at(2, 0).is_infinite(), "reverse edge must be closed");
    }

    #[test]
    fn branch_forbids_closing_a_longer_chain_early() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);
        root.reduce();

        // Chain 0 -> 2 -> 3 of the four cities; 3 -> 0 would close a
        // three-city subtour and must be gone, while 3 -> 1 stays open.
        let child = root.branch_on(0, 2, 1).branch_on(2, 3, 2);
        assert!(child.cost_at(3, 0).is_infinite());
        assert!(child.cost_at(3, 1).is_finite());
    }

    #[test]
    fn forced_edge_completes_the_cycle() {
        let scenario = example();
        let mut root = ReducedCostMatrix::root(&scenario, 0);
        root.reduce();

        let leaf = root.branch_on(0, 2, 1).branch_on(2, 3, 2).branch_on(3, 1, 3);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.forced_edge(), (1, 0));
    }

    #[test]
    fn identity_is_the_assigned_id() {
        let scenario = example();
        let root = ReducedCostMatrix::root(&scenario, 17);
        assert_eq!(root.id(), 17);
        assert_eq!(root.branch_on(0, 2, 18).id(), 18);
    }
}
