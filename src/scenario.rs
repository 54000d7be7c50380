use thiserror::Error;

pub type CityId = u32;

/// Directed travel cost. [`Cost::INFINITY`] encodes a missing edge.
pub type Cost = f64;

/// Read-only access to the directed travel costs of a fixed city set.
///
/// All solvers are generic over this trait so that tests can plug in
/// hand-built matrices without going through [`Scenario`].
pub trait DistanceModel {
    /// Returns the number of cities.
    fn order(&self) -> CityId;

    /// Returns the number of cities as usize.
    fn len(&self) -> usize {
        self.order() as usize
    }

    /// Returns the directed cost of travelling from `from` to `to`, or
    /// [`Cost::INFINITY`] if no such edge exists.
    /// ** Panics if from, to >= order **
    fn cost(&self, from: CityId, to: CityId) -> Cost;
}

/// A single city of a scenario. The position is carried for presentation
/// layers only; no solver reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct City {
    id: CityId,
    x: f64,
    y: f64,
}

impl City {
    pub fn new(id: CityId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn id(&self) -> CityId {
        self.id
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("a scenario requires at least two cities, got {0}")]
    NotEnoughCities(usize),

    #[error("city {0} has no outgoing edge")]
    NoOutgoingEdge(CityId),

    #[error("cost matrix has {0} rows for {1} cities")]
    WrongRowCount(usize, usize),

    #[error("cost matrix row {0} has {1} entries, expected {2}")]
    RaggedMatrix(usize, usize, usize),
}

/// An immutable problem instance: the ordered city list plus the full
/// directed cost matrix. The diagonal is forced to infinity on construction
/// and malformed inputs are rejected before any search can start.
#[derive(Clone, Debug)]
pub struct Scenario {
    cities: Vec<City>,
    costs: Vec<Cost>,
    n: usize,
}

impl Scenario {
    /// Builds a scenario from explicit cities and a square cost matrix given
    /// as rows. Fails if there are fewer than two cities, if the matrix is
    /// not n by n, or if some city has no outgoing finite edge.
    pub fn new(cities: Vec<City>, rows: Vec<Vec<Cost>>) -> Result<Self, ScenarioError> {
        let n = cities.len();
        if n < 2 {
            return Err(ScenarioError::NotEnoughCities(n));
        }
        if rows.len() != n {
            return Err(ScenarioError::WrongRowCount(rows.len(), n));
        }

        let mut costs = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(ScenarioError::RaggedMatrix(i, row.len(), n));
            }
            costs.extend(row.iter().copied());
            costs[i * n + i] = Cost::INFINITY;
        }

        for u in 0..n {
            if costs[u * n..(u + 1) * n].iter().all(|c| c.is_infinite()) {
                return Err(ScenarioError::NoOutgoingEdge(u as CityId));
            }
        }

        Ok(Self { cities, costs, n })
    }

    /// Builds a scenario from a cost matrix alone; cities are numbered in
    /// row order and placed at dummy positions.
    pub fn from_matrix(rows: Vec<Vec<Cost>>) -> Result<Self, ScenarioError> {
        let cities = (0..rows.len())
            .map(|i| City::new(i as CityId, i as f64, 0.0))
            .collect();
        Self::new(cities, rows)
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }
}

impl DistanceModel for Scenario {
    fn order(&self) -> CityId {
        self.n as CityId
    }

    fn cost(&self, from: CityId, to: CityId) -> Cost {
        assert!((from as usize) < self.n && (to as usize) < self.n);
        self.costs[from as usize * self.n + to as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: Cost = Cost::INFINITY;

    #[test]
    fn rejects_tiny_city_sets() {
        assert_eq!(
            Scenario::from_matrix(vec![]).unwrap_err(),
            ScenarioError::NotEnoughCities(0)
        );
        assert_eq!(
            Scenario::from_matrix(vec![vec![0.0]]).unwrap_err(),
            ScenarioError::NotEnoughCities(1)
        );
    }

    #[test]
    fn rejects_city_without_outgoing_edge() {
        let err = Scenario::from_matrix(vec![
            vec![INF, 1.0, 1.0],
            vec![INF, INF, INF],
            vec![1.0, 1.0, INF],
        ])
        .unwrap_err();
        assert_eq!(err, ScenarioError::NoOutgoingEdge(1));
    }

    #[test]
    fn rejects_ragged_matrix() {
        let err =
            Scenario::from_matrix(vec![vec![INF, 1.0], vec![1.0, INF], vec![1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, ScenarioError::RaggedMatrix(..)));

        let err = Scenario::from_matrix(vec![vec![INF, 1.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, ScenarioError::RaggedMatrix(1, 1, 2)));
    }

    #[test]
    fn rejects_wrong_row_count() {
        let cities = vec![City::new(0, 0.0, 0.0), City::new(1, 1.0, 0.0)];
        let err = Scenario::new(cities, vec![vec![INF, 1.0]]).unwrap_err();
        assert_eq!(err, ScenarioError::WrongRowCount(1, 2));
    }

    #[test]
    fn diagonal_is_forced_to_infinity() {
        let scenario =
            Scenario::from_matrix(vec![vec![0.0, 2.0], vec![3.0, 0.0]]).unwrap();
        assert!(scenario.cost(0, 0).is_infinite());
        assert!(scenario.cost(1, 1).is_infinite());
        assert_eq!(scenario.cost(0, 1), 2.0);
        assert_eq!(scenario.cost(1, 0), 3.0);
    }

    #[test]
    fn costs_are_directed() {
        let scenario =
            Scenario::from_matrix(vec![vec![INF, 5.0], vec![7.0, INF]]).unwrap();
        assert_eq!(scenario.cost(0, 1), 5.0);
        assert_eq!(scenario.cost(1, 0), 7.0);
        assert_eq!(scenario.order(), 2);
        assert_eq!(scenario.cities().len(), 2);
    }
}
