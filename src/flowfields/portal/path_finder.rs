//! A* over the [ClusterGraph] where clusters are the nodes and portals are the edges. The result
//! is the ordered list of clusters an agent has to cross to reach the goal cluster, the start
//! cluster itself is not included.
//!
//! The [PathFinder] owns one [PathNode] per cluster for the lifetime of the graph. Nodes are reset
//! at the start of every search rather than reallocated.
//!

use std::cmp::Ordering;
use std::collections::VecDeque;

use bevy::prelude::*;
use fixedbitset::FixedBitSet;

use super::min_heap::{HeapItem, MinHeap};
use crate::prelude::*;

/// Search bookkeeping of a single cluster
#[derive(Clone, Debug)]
pub struct PathNode {
	/// Cluster the node represents
	cluster: ClusterID,
	/// Arena index of the node this one was reached from
	parent: Option<usize>,
	/// Cost of the best known route from the start
	g_cost: f32,
	/// Heuristic estimate to the goal
	h_cost: f32,
	/// `g_cost + h_cost`
	f_cost: f32,
	/// Position in the open set
	heap_index: usize,
}

impl PathNode {
	/// Create a new unvisited [PathNode]
	fn new(cluster: ClusterID) -> Self {
		PathNode {
			cluster,
			parent: None,
			g_cost: f32::MAX,
			h_cost: 0.0,
			f_cost: f32::MAX,
			heap_index: 0,
		}
	}
	/// Back to an unvisited state
	fn reset(&mut self) {
		self.parent = None;
		self.g_cost = f32::MAX;
		self.h_cost = 0.0;
		self.f_cost = f32::MAX;
	}
	/// Record new costs
	fn set_costs(&mut self, g_cost: f32, h_cost: f32) {
		self.g_cost = g_cost;
		self.h_cost = h_cost;
		self.f_cost = g_cost + h_cost;
	}
}

impl HeapItem for PathNode {
	fn get_heap_index(&self) -> usize {
		self.heap_index
	}
	fn set_heap_index(&mut self, index: usize) {
		self.heap_index = index;
	}
	fn compare(&self, other: &Self) -> Ordering {
		self.f_cost
			.total_cmp(&other.f_cost)
			.then(self.h_cost.total_cmp(&other.h_cost))
			.then(self.cluster.get_x().cmp(&other.cluster.get_x()))
			.then(self.cluster.get_z().cmp(&other.cluster.get_z()))
	}
}

/// Reusable A* search state over a [ClusterGraph]
#[derive(Clone, Debug)]
pub struct PathFinder {
	/// One node per cluster indexed by [ClusterID::flat_index]
	nodes: Vec<PathNode>,
	/// Number of clusters along each side
	clusters_per_side: usize,
	/// Nodes awaiting expansion
	open_set: MinHeap,
	/// A set bit marks the arena index of an expanded node
	closed_set: FixedBitSet,
	/// Scratch storage used when walking back from the goal
	reusable_path: Vec<ClusterID>,
}

impl PathFinder {
	/// Create a new [PathFinder] sized for the clusters of `graph`
	pub fn new(graph: &ClusterGraph) -> Self {
		let clusters_per_side = graph.get_clusters_per_side();
		let count = clusters_per_side * clusters_per_side;
		let mut nodes = Vec::with_capacity(count);
		for x in 0..clusters_per_side {
			for z in 0..clusters_per_side {
				nodes.push(PathNode::new(ClusterID::new(x, z)));
			}
		}
		PathFinder {
			nodes,
			clusters_per_side,
			open_set: MinHeap::with_capacity(count),
			closed_set: FixedBitSet::with_capacity(count),
			reusable_path: Vec::new(),
		}
	}
	/// Search for the clusters to cross from `start` to `goal`. On success `output` holds the
	/// clusters in travel order excluding `start`, it is empty when `start == goal`. When no route
	/// exists `output` is emptied and `false` returned
	pub fn find_cluster_path(
		&mut self,
		graph: &ClusterGraph,
		start: ClusterID,
		goal: ClusterID,
		output: &mut VecDeque<ClusterID>,
	) -> bool {
		output.clear();
		let (Some(start_cluster), Some(goal_cluster)) =
			(graph.get_cluster(start), graph.get_cluster(goal))
		else {
			return false;
		};
		let goal_center = goal_cluster.get_center();
		for node in self.nodes.iter_mut() {
			node.reset();
		}
		self.open_set.clear();
		self.closed_set.clear();

		let start_index = start.flat_index(self.clusters_per_side);
		let goal_index = goal.flat_index(self.clusters_per_side);
		self.nodes[start_index].set_costs(
			0.0,
			octile_distance(start_cluster.get_center(), goal_center),
		);
		self.open_set.add(&mut self.nodes, start_index);

		while let Some(current) = self.open_set.remove_first(&mut self.nodes) {
			self.closed_set.insert(current);
			if current == goal_index {
				self.reconstruct_path(current, output);
				return true;
			}
			let current_cluster = self.nodes[current].cluster;
			let current_g = self.nodes[current].g_cost;
			let Some(cluster) = graph.get_cluster(current_cluster) else {
				continue;
			};
			let current_center = cluster.get_center();
			for portal in cluster.get_portals().iter() {
				let Some(neighbour) = portal.other(current_cluster) else {
					continue;
				};
				let neighbour_index = neighbour.flat_index(self.clusters_per_side);
				if self.closed_set.contains(neighbour_index) {
					continue;
				}
				let Some(neighbour_cluster) = graph.get_cluster(neighbour) else {
					continue;
				};
				let neighbour_center = neighbour_cluster.get_center();
				let g_cost = current_g + octile_distance(current_center, neighbour_center);
				let in_open_set = self.open_set.contains(&self.nodes, neighbour_index);
				if !in_open_set || g_cost < self.nodes[neighbour_index].g_cost {
					let h_cost = octile_distance(neighbour_center, goal_center);
					let node = &mut self.nodes[neighbour_index];
					node.set_costs(g_cost, h_cost);
					node.parent = Some(current);
					if in_open_set {
						self.open_set.update_item(&mut self.nodes, neighbour_index);
					} else {
						self.open_set.add(&mut self.nodes, neighbour_index);
					}
				}
			}
		}
		debug!("No cluster path from {:?} to {:?}", start, goal);
		false
	}
	/// Walk the parents back from `end` and write the clusters into `output` in travel order
	fn reconstruct_path(&mut self, end: usize, output: &mut VecDeque<ClusterID>) {
		self.reusable_path.clear();
		let mut current = end;
		while let Some(parent) = self.nodes[current].parent {
			self.reusable_path.push(self.nodes[current].cluster);
			current = parent;
		}
		output.extend(self.reusable_path.iter().rev());
	}
}
