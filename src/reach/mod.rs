//! Reachability analysis: which island can claim which cell, and at what depth

pub mod analysis;
pub mod distance;
pub mod forbidden;
pub mod histogram;

pub use analysis::{Analysis, IslandReach, Owner, Predicate, SeaReach, SeaRoot};
pub use distance::{DistanceMap, Span};
pub use forbidden::{forbidden_matrices, seed_halos, ForbiddenMatrix, Halo};
pub use histogram::{Layer, TreeHistogram};
