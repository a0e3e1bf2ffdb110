//! A [Portal] indicates a pathable crossing from one cluster to an adjacent one. It records every
//! pair of boundary cells, one on each side, where both cells are free and touch each other
//! either orthogonally or diagonally.
//!
//! Here is the shared boundary of two horizontally adjacent clusters where `x` marks an obstacle.
//! The pairs spanning the boundary between two free cells become the nodes of the [Portal]:
//!
//! ```text
//!   cluster A    cluster B
//!  ___________ ___________
//! |   |   |   | x |   |   |
//! |___|___|___|___|___|___|
//! |   |   | x |   |   |   |
//! |___|___|___|___|___|___|
//! |   |   |   |   |   |   |
//! |___|___|___|___|___|___|
//! ```
//!
//! Clusters which only touch at a corner can be joined by a diagonal [Portal] made of the single
//! pair of corner cells.

use bevy::prelude::*;

use crate::prelude::*;

/// Identity of a [Portal]: the unordered pair of clusters it joins, stored lowest first
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Reflect)]
pub struct PortalID((ClusterID, ClusterID));

impl PortalID {
	/// Create a new instance of [PortalID], the order of the clusters does not matter
	pub fn new(a: ClusterID, b: ClusterID) -> Self {
		if a <= b {
			PortalID((a, b))
		} else {
			PortalID((b, a))
		}
	}
	/// The lower of the two clusters
	pub fn get_first(&self) -> ClusterID {
		self.0 .0
	}
	/// The higher of the two clusters
	pub fn get_second(&self) -> ClusterID {
		self.0 .1
	}
	/// Whether the portal touches `cluster`
	pub fn contains(&self, cluster: ClusterID) -> bool {
		self.get_first() == cluster || self.get_second() == cluster
	}
	/// From one side of the portal get the cluster on the other side
	pub fn other(&self, cluster: ClusterID) -> Option<ClusterID> {
		if self.get_first() == cluster {
			Some(self.get_second())
		} else if self.get_second() == cluster {
			Some(self.get_first())
		} else {
			None
		}
	}
}

/// A pair of mutually traversable boundary cells in grid coordinates, `first` sits in the first
/// cluster of the [PortalID] and `second` in the second
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct PortalNode {
	/// Cell within the first cluster
	first: CellCoord,
	/// Cell within the second cluster
	second: CellCoord,
}

impl PortalNode {
	/// Create a new instance of [PortalNode]
	pub fn new(first: CellCoord, second: CellCoord) -> Self {
		PortalNode { first, second }
	}
	/// Cell within the first cluster of the portal
	pub fn get_first(&self) -> CellCoord {
		self.first
	}
	/// Cell within the second cluster of the portal
	pub fn get_second(&self) -> CellCoord {
		self.second
	}
}

/// A traversable boundary between two adjacent clusters
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
	/// Clusters joined by the portal
	id: PortalID,
	/// Boundary cell pairs, never empty
	nodes: Vec<PortalNode>,
}

impl Portal {
	/// Get the [PortalID]
	pub fn get_id(&self) -> PortalID {
		self.id
	}
	/// Get the boundary cell pairs
	pub fn get_nodes(&self) -> &[PortalNode] {
		&self.nodes
	}
	/// The boundary cells of the portal which sit in `cluster`, empty if the portal doesn't touch it
	pub fn cells_in(&self, cluster: ClusterID) -> Vec<CellCoord> {
		let mut cells = Vec::with_capacity(self.nodes.len());
		if self.id.get_first() == cluster {
			for node in self.nodes.iter() {
				if !cells.contains(&node.get_first()) {
					cells.push(node.get_first());
				}
			}
		} else if self.id.get_second() == cluster {
			for node in self.nodes.iter() {
				if !cells.contains(&node.get_second()) {
					cells.push(node.get_second());
				}
			}
		}
		cells
	}
	/// For a node get the cell sitting in `cluster`
	pub fn node_cell_in(&self, node: &PortalNode, cluster: ClusterID) -> Option<CellCoord> {
		if self.id.get_first() == cluster {
			Some(node.get_first())
		} else if self.id.get_second() == cluster {
			Some(node.get_second())
		} else {
			None
		}
	}
	/// Average world position of every cell of the portal
	pub fn centroid(&self, grid: &Grid) -> Option<Vec3> {
		if self.nodes.is_empty() {
			return None;
		}
		let mut sum = Vec3::ZERO;
		for node in self.nodes.iter() {
			sum += grid.cell_world_position(node.get_first());
			sum += grid.cell_world_position(node.get_second());
		}
		Some(sum / (self.nodes.len() * 2) as f32)
	}
	/// Scan the boundary between cluster `a` and its neighbour `b` found in the direction of
	/// `ordinal` and build the [Portal] between them. [None] is returned when the clusters
	/// aren't adjacent in that direction or no pair of boundary cells is traversable
	pub fn build(grid: &Grid, a: ClusterID, b: ClusterID, ordinal: Ordinal) -> Option<Portal> {
		let (dx, dz) = ordinal.offset();
		if a.get_x() as i64 + dx as i64 != b.get_x() as i64
			|| a.get_z() as i64 + dz as i64 != b.get_z() as i64
		{
			return None;
		}
		let size = grid.get_cluster_size();
		let a_start_x = a.get_x() * size;
		let a_start_z = a.get_z() * size;
		// pairs are collected as (cell in a, cell in b)
		let mut pairs = Vec::new();
		match ordinal {
			Ordinal::East => {
				let x = a_start_x + size - 1;
				for z in a_start_z..a_start_z + size {
					for nz in z.saturating_sub(1)..=z + 1 {
						if nz < a_start_z || nz >= a_start_z + size {
							continue;
						}
						push_if_free(grid, &mut pairs, (x, z), (x + 1, nz));
					}
				}
			}
			Ordinal::North => {
				let z = a_start_z + size - 1;
				for x in a_start_x..a_start_x + size {
					for nx in x.saturating_sub(1)..=x + 1 {
						if nx < a_start_x || nx >= a_start_x + size {
							continue;
						}
						push_if_free(grid, &mut pairs, (x, z), (nx, z + 1));
					}
				}
			}
			Ordinal::NorthWest => {
				push_if_free(
					grid,
					&mut pairs,
					(a_start_x, a_start_z + size - 1),
					(a_start_x - 1, a_start_z + size),
				);
			}
			Ordinal::SouthWest => {
				push_if_free(
					grid,
					&mut pairs,
					(a_start_x, a_start_z),
					(a_start_x - 1, a_start_z - 1),
				);
			}
			// scan from the other side so each boundary has a single implementation
			Ordinal::West | Ordinal::South | Ordinal::SouthEast | Ordinal::NorthEast => {
				return Portal::build(grid, b, a, ordinal.inverse());
			}
		}
		if pairs.is_empty() {
			return None;
		}
		let id = PortalID::new(a, b);
		let a_is_first = id.get_first() == a;
		let nodes = pairs
			.into_iter()
			.map(|(cell_a, cell_b)| {
				if a_is_first {
					PortalNode::new(cell_a, cell_b)
				} else {
					PortalNode::new(cell_b, cell_a)
				}
			})
			.collect();
		Some(Portal { id, nodes })
	}
}

/// Record a boundary pair when both cells are free
fn push_if_free(
	grid: &Grid,
	pairs: &mut Vec<(CellCoord, CellCoord)>,
	a: (usize, usize),
	b: (usize, usize),
) {
	if !grid.is_obstacle(a.0, a.1) && !grid.is_obstacle(b.0, b.1) {
		pairs.push((CellCoord::new(a.0, a.1), CellCoord::new(b.0, b.1)));
	}
}
