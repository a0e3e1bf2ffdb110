//! The grid is split into a series of `cluster_size x cluster_size` clusters. A cluster knows the
//! portals crossing its boundary and keeps one local [FlowField] per portal which leads every
//! cell of the cluster towards that portal.
//!
//! Clusters are indexed by `(cluster_x, cluster_z)` starting from the `(-x, -z)` corner of the
//! grid, the local fields of a cluster are indexed from the `(-x, -z)` corner of the cluster.
//!

pub mod cluster_graph;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::prelude::*;
use bevy::prelude::*;

/// Unique ID of a cluster
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct ClusterID((usize, usize));

impl ClusterID {
	/// Create a new instance of [ClusterID]
	pub fn new(cluster_x: usize, cluster_z: usize) -> Self {
		ClusterID((cluster_x, cluster_z))
	}
	/// Get the `(cluster_x, cluster_z)` tuple
	pub fn get(&self) -> (usize, usize) {
		self.0
	}
	/// Get the cluster column
	pub fn get_x(&self) -> usize {
		self.0 .0
	}
	/// Get the cluster row
	pub fn get_z(&self) -> usize {
		self.0 .1
	}
	/// Index of the cluster in an arena of `clusters_per_side x clusters_per_side` clusters
	pub fn flat_index(&self, clusters_per_side: usize) -> usize {
		self.get_x() * clusters_per_side + self.get_z()
	}
}

/// A square region of the grid
#[derive(Clone, Debug)]
pub struct Cluster {
	/// Identity of the cluster
	id: ClusterID,
	/// Grid coordinate of the `(-x, -z)` corner cell
	start: CellCoord,
	/// Cells along each side
	size: usize,
	/// Centre of the cluster measured in cells, used by the A* heuristic
	center: Vec3,
	/// Portals crossing the boundary of this cluster
	portals: BTreeSet<PortalID>,
	/// For each portal a field leading every cell of the cluster towards it
	local_fields: BTreeMap<PortalID, FlowField>,
}

impl PartialEq for Cluster {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for Cluster {}

impl Cluster {
	/// Create a new [Cluster] without any portals
	pub fn new(id: ClusterID, size: usize) -> Self {
		let start = CellCoord::new(id.get_x() * size, id.get_z() * size);
		let half = size as f32 * 0.5;
		Cluster {
			id,
			start,
			size,
			center: Vec3::new(start.get_x() as f32 + half, 0.0, start.get_z() as f32 + half),
			portals: BTreeSet::new(),
			local_fields: BTreeMap::new(),
		}
	}
	/// Get the [ClusterID]
	pub fn get_id(&self) -> ClusterID {
		self.id
	}
	/// Grid coordinate of the `(-x, -z)` corner cell
	pub fn get_start(&self) -> CellCoord {
		self.start
	}
	/// Cells along each side
	pub fn get_size(&self) -> usize {
		self.size
	}
	/// Centre of the cluster in cell units
	pub fn get_center(&self) -> Vec3 {
		self.center
	}
	/// Portals crossing the boundary of the cluster
	pub fn get_portals(&self) -> &BTreeSet<PortalID> {
		&self.portals
	}
	/// Local fields keyed by the portal they lead towards
	pub fn get_local_fields(&self) -> &BTreeMap<PortalID, FlowField> {
		&self.local_fields
	}
	/// The local field leading towards a portal
	pub fn get_local_field(&self, portal: &PortalID) -> Option<&FlowField> {
		self.local_fields.get(portal)
	}
	/// Whether a grid cell lies inside the cluster
	pub fn contains_cell(&self, cell: CellCoord) -> bool {
		cell.get_x() >= self.start.get_x()
			&& cell.get_x() < self.start.get_x() + self.size
			&& cell.get_z() >= self.start.get_z()
			&& cell.get_z() < self.start.get_z() + self.size
	}
	/// Convert a grid cell into the local coordinates of the cluster
	pub fn to_local(&self, cell: CellCoord) -> Option<CellCoord> {
		if self.contains_cell(cell) {
			Some(CellCoord::new(
				cell.get_x() - self.start.get_x(),
				cell.get_z() - self.start.get_z(),
			))
		} else {
			None
		}
	}
	/// Convert local coordinates of the cluster into a grid cell
	pub fn to_global(&self, local: CellCoord) -> CellCoord {
		CellCoord::new(
			local.get_x() + self.start.get_x(),
			local.get_z() + self.start.get_z(),
		)
	}
	/// Record a portal crossing the boundary
	pub(crate) fn add_portal(&mut self, portal: PortalID) {
		self.portals.insert(portal);
	}
	/// Forget a portal along with its local field
	pub(crate) fn remove_portal(&mut self, portal: &PortalID) {
		self.portals.remove(portal);
		self.local_fields.remove(portal);
	}
	/// Drop every local field
	pub(crate) fn clear_local_fields(&mut self) {
		self.local_fields.clear();
	}
	/// Calculate the local field leading towards `portal` using its cells inside this cluster as
	/// the sources. An existing field for the portal is recalculated in place
	pub fn build_local_field(&mut self, grid: &Grid, portal: &Portal, queue: &mut VecDeque<usize>) {
		let sources: Vec<CellCoord> = portal
			.cells_in(self.id)
			.into_iter()
			.filter_map(|cell| self.to_local(cell))
			.collect();
		let start = self.start;
		let field = self
			.local_fields
			.entry(portal.get_id())
			.or_insert_with(|| FlowField::new(self.size));
		field.calculate(
			&sources,
			|x, z| grid.is_obstacle(start.get_x() + x, start.get_z() + z),
			queue,
		);
	}
	/// From a grid cell inside the cluster get the grid cell to step into next in order to reach
	/// `portal`. [None] when there is no field for the portal, the cell is outside the cluster,
	/// unreachable or already part of the portal
	pub fn next_step_towards(&self, portal: &PortalID, cell: CellCoord) -> Option<CellCoord> {
		let field = self.local_fields.get(portal)?;
		let local = self.to_local(cell)?;
		field.next_step(local).map(|next| self.to_global(next))
	}
}
