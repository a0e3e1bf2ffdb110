//! A Portal indicates a pathable crossing from one cluster to a neighbour.
//!
//! A [path_finder::PathFinder] is used to calculate a route over the clusters (effectively a
//! high level path of crossing from one cluster to another through portals).

pub mod min_heap;
pub mod path_finder;
pub mod portals;
