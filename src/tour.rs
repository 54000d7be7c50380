use crate::scenario::{CityId, Cost, DistanceModel};
use itertools::Itertools;

/// Computes the total directed cost of visiting `order` front to back and
/// returning to the first city. Infinite as soon as one leg is missing.
pub fn tour_cost<D: DistanceModel>(model: &D, order: &[CityId]) -> Cost {
    debug_assert_eq!(order.len(), model.len());

    let legs: Cost = order.iter().tuple_windows().map(|(&u, &v)| model.cost(u, v)).sum();
    legs + model.cost(order[order.len() - 1], order[0])
}

/// A complete tour: every city exactly once, closed back to the start.
/// The cost is fixed at construction; tours of equal cost are considered
/// interchangeable by all solvers.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    order: Vec<CityId>,
    cost: Cost,
}

impl Tour {
    /// Evaluates `order` against `model` and wraps it up. The order must
    /// contain every city of the model exactly once.
    pub fn from_order<D: DistanceModel>(model: &D, order: Vec<CityId>) -> Self {
        debug_assert!(is_permutation(&order, model.order()));
        let cost = tour_cost(model, &order);
        Self { order, cost }
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// True iff every leg of the tour exists.
    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite()
    }

    pub fn order(&self) -> &[CityId] {
        &self.order
    }
}

fn is_permutation(order: &[CityId], n: CityId) -> bool {
    let mut seen = vec![false; n as usize];
    order.len() == n as usize
        && order.iter().all(|&u| {
            u < n && !std::mem::replace(&mut seen[u as usize], true)
        })
}
