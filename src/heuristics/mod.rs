pub mod nearest_neighbor;
pub mod random_tour;
pub mod two_opt;

pub use nearest_neighbor::NearestNeighborGreedy;
pub use random_tour::RandomTourSampler;
pub use two_opt::TwoOptImprovement;
