//! The [ClusterGraph] treats clusters as nodes and portals as edges. It owns every [Cluster] in a
//! flat arena indexed by [ClusterID::flat_index] and every [Portal] keyed by its [PortalID].
//!
//! Portals are discovered in a single pass over the clusters. Each cluster scans its boundary
//! with the neighbours to the East, North, NorthWest and SouthWest so that every unordered pair
//! of adjacent clusters is visited exactly once:
//!
//! ```text
//!  _____ _____ _____
//! |     |     |     |
//! | NW  |  N  |     |
//! |_____|_____|_____|
//! |     |     |     |
//! |     |  C  |  E  |
//! |_____|_____|_____|
//! |     |     |     |
//! | SW  |     |     |
//! |_____|_____|_____|
//! ```

use std::collections::{BTreeMap, VecDeque};

use bevy::prelude::*;

use crate::prelude::*;

/// Directions scanned by each cluster when discovering portals
const SCAN_DIRECTIONS: [Ordinal; 4] = [
	Ordinal::East,
	Ordinal::North,
	Ordinal::NorthWest,
	Ordinal::SouthWest,
];

/// Clusters and the portals joining them
#[derive(Clone, Debug)]
pub struct ClusterGraph {
	/// Number of clusters along each side of the grid
	clusters_per_side: usize,
	/// Cells along each side of a cluster
	cluster_size: usize,
	/// Arena of clusters indexed by [ClusterID::flat_index]
	clusters: Vec<Cluster>,
	/// Every portal of the graph
	portals: BTreeMap<PortalID, Portal>,
}

impl ClusterGraph {
	/// Partition the grid into clusters and discover the portals between them. Local fields are
	/// not calculated, see [ClusterGraph::build_all_local_fields]
	pub fn new(grid: &Grid) -> Self {
		let cluster_size = grid.get_cluster_size();
		let clusters_per_side = grid.get_grid_size() / cluster_size;
		let mut clusters = Vec::with_capacity(clusters_per_side * clusters_per_side);
		for x in 0..clusters_per_side {
			for z in 0..clusters_per_side {
				clusters.push(Cluster::new(ClusterID::new(x, z), cluster_size));
			}
		}
		let mut graph = ClusterGraph {
			clusters_per_side,
			cluster_size,
			clusters,
			portals: BTreeMap::new(),
		};
		for x in 0..clusters_per_side {
			for z in 0..clusters_per_side {
				let id = ClusterID::new(x, z);
				for ordinal in SCAN_DIRECTIONS {
					let Some(neighbour) = graph.neighbour_in_direction(id, ordinal) else {
						continue;
					};
					if let Some(portal) = Portal::build(grid, id, neighbour, ordinal) {
						graph.insert_portal(portal);
					}
				}
			}
		}
		info!(
			"Cluster graph built with {} clusters and {} portals",
			graph.clusters.len(),
			graph.portals.len()
		);
		graph
	}
	/// Number of clusters along each side of the grid
	pub fn get_clusters_per_side(&self) -> usize {
		self.clusters_per_side
	}
	/// Cells along each side of a cluster
	pub fn get_cluster_size(&self) -> usize {
		self.cluster_size
	}
	/// Get a reference to the arena of clusters
	pub fn get_clusters(&self) -> &[Cluster] {
		&self.clusters
	}
	/// Get a reference to every portal
	pub fn get_portals(&self) -> &BTreeMap<PortalID, Portal> {
		&self.portals
	}
	/// Whether the cluster exists in the graph
	pub fn contains(&self, id: ClusterID) -> bool {
		id.get_x() < self.clusters_per_side && id.get_z() < self.clusters_per_side
	}
	/// Get a cluster
	pub fn get_cluster(&self, id: ClusterID) -> Option<&Cluster> {
		if self.contains(id) {
			self.clusters.get(id.flat_index(self.clusters_per_side))
		} else {
			None
		}
	}
	/// Get a mutable cluster
	pub fn get_cluster_mut(&mut self, id: ClusterID) -> Option<&mut Cluster> {
		if self.contains(id) {
			self.clusters.get_mut(id.flat_index(self.clusters_per_side))
		} else {
			None
		}
	}
	/// Get a portal
	pub fn get_portal(&self, id: &PortalID) -> Option<&Portal> {
		self.portals.get(id)
	}
	/// The portal joining two clusters if one exists
	pub fn portal_between(&self, a: ClusterID, b: ClusterID) -> Option<&Portal> {
		self.portals.get(&PortalID::new(a, b))
	}
	/// Clusters reachable from `id` through a portal paired with that portal
	pub fn neighbouring_clusters(&self, id: ClusterID) -> Vec<(ClusterID, PortalID)> {
		let Some(cluster) = self.get_cluster(id) else {
			return Vec::new();
		};
		cluster
			.get_portals()
			.iter()
			.filter_map(|portal| portal.other(id).map(|other| (other, *portal)))
			.collect()
	}
	/// The adjacent cluster in the direction of `ordinal`
	pub fn neighbour_in_direction(&self, id: ClusterID, ordinal: Ordinal) -> Option<ClusterID> {
		ordinal
			.step_within(id.get_x(), id.get_z(), self.clusters_per_side)
			.map(|(x, z)| ClusterID::new(x, z))
	}
	/// Calculate the local field of every portal in every cluster
	pub fn build_all_local_fields(&mut self, grid: &Grid, queue: &mut VecDeque<usize>) {
		let portals = &self.portals;
		for cluster in self.clusters.iter_mut() {
			cluster.clear_local_fields();
			let ids: Vec<PortalID> = cluster.get_portals().iter().copied().collect();
			for id in ids.iter() {
				if let Some(portal) = portals.get(id) {
					cluster.build_local_field(grid, portal, queue);
				}
			}
		}
		debug!("Built local fields for {} portals", self.portals.len());
	}
	/// After the obstacles of `changed` have been edited rediscover its portals with all 8
	/// neighbours, recalculate all of its local fields and recalculate the local field of each
	/// neighbour leading towards the shared portal
	pub fn rebuild_around(&mut self, grid: &Grid, changed: ClusterID, queue: &mut VecDeque<usize>) {
		if !self.contains(changed) {
			return;
		}
		let mut neighbours = Vec::with_capacity(8);
		for ordinal in Ordinal::ALL {
			let Some(neighbour) = self.neighbour_in_direction(changed, ordinal) else {
				continue;
			};
			self.remove_portal(&PortalID::new(changed, neighbour));
			if let Some(portal) = Portal::build(grid, changed, neighbour, ordinal) {
				self.insert_portal(portal);
				neighbours.push(neighbour);
			}
		}
		let index = changed.flat_index(self.clusters_per_side);
		let portals = &self.portals;
		let cluster = &mut self.clusters[index];
		cluster.clear_local_fields();
		let ids: Vec<PortalID> = cluster.get_portals().iter().copied().collect();
		for id in ids.iter() {
			if let Some(portal) = portals.get(id) {
				cluster.build_local_field(grid, portal, queue);
			}
		}
		for neighbour in neighbours {
			let id = PortalID::new(changed, neighbour);
			let index = neighbour.flat_index(self.clusters_per_side);
			if let Some(portal) = self.portals.get(&id) {
				self.clusters[index].build_local_field(grid, portal, queue);
			}
		}
		debug!("Rebuilt portals and local fields around cluster {:?}", changed);
	}
	/// Discard everything and rebuild the whole graph including local fields
	pub fn rebuild_all(&mut self, grid: &Grid, queue: &mut VecDeque<usize>) {
		*self = ClusterGraph::new(grid);
		self.build_all_local_fields(grid, queue);
	}
	/// Add a portal to the graph and to both of its clusters
	fn insert_portal(&mut self, portal: Portal) {
		let id = portal.get_id();
		for cluster in [id.get_first(), id.get_second()] {
			if let Some(c) = self.get_cluster_mut(cluster) {
				c.add_portal(id);
			}
		}
		self.portals.insert(id, portal);
	}
	/// Remove a portal from the graph and from both of its clusters
	fn remove_portal(&mut self, id: &PortalID) {
		if self.portals.remove(id).is_none() {
			return;
		}
		for cluster in [id.get_first(), id.get_second()] {
			if let Some(c) = self.get_cluster_mut(cluster) {
				c.remove_portal(id);
			}
		}
	}
}
