//! The [GridManager] owns the navigation data and answers the per-agent direction queries.
//!
//! Agents are steered on two levels. Every tick each agent is given the list of clusters it has to
//! cross to reach the cluster of its target ([GridManager::tick]), then within its current cluster
//! it follows the local field leading towards the portal into the next cluster. Once it shares a
//! cluster with its target it follows the global field calculated for that target.
//!
//! Global target fields are only recalculated once a target has moved further than
//! `recalc_threshold * cell_size` from where its field was last calculated.
//!
//! Obstacle edits are recorded against the cluster owning the cell and applied lazily at the start
//! of the next [GridManager::tick] or [GridManager::refresh_target_fields].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bevy::prelude::*;

use crate::prelude::*;

/// An agent to be planned for during a [GridManager::tick]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedAgent {
	/// The agent
	pub agent: Entity,
	/// Current world position of the agent
	pub position: Vec3,
	/// Current world position of the agent's target
	pub target_position: Vec3,
}

/// Cluster path cached for an agent
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentPath {
	/// Clusters still to be crossed in travel order
	clusters: VecDeque<ClusterID>,
	/// Cluster of the target when the path was planned
	destination: Option<ClusterID>,
}

impl AgentPath {
	/// Clusters still to be crossed in travel order
	pub fn get_clusters(&self) -> &VecDeque<ClusterID> {
		&self.clusters
	}
	/// Cluster of the target when the path was planned
	pub fn get_destination(&self) -> Option<ClusterID> {
		self.destination
	}
}

/// Navigation data of the world along with every per-target field and per-agent path
#[derive(Resource)]
pub struct GridManager {
	/// Validated dimensions
	config: NavigationConfig,
	/// Cells and obstacles
	grid: Grid,
	/// Clusters, portals and local fields
	cluster_graph: ClusterGraph,
	/// Reusable A* state
	path_finder: PathFinder,
	/// Global field of each tracked target
	target_fields: BTreeMap<Entity, FlowFieldData>,
	/// Cluster path of each agent
	agent_paths: BTreeMap<Entity, AgentPath>,
	/// Working storage for field calculations
	cell_queue: VecDeque<usize>,
	/// Clusters whose obstacles changed since navigation data was last rebuilt
	dirty_clusters: BTreeSet<ClusterID>,
	/// Whether the whole cluster graph must be rebuilt
	full_rebuild: bool,
}

impl GridManager {
	/// Validate `config` and build the navigation data of an obstacle-free grid
	pub fn new(config: NavigationConfig) -> Result<Self, ConfigError> {
		GridManager::new_with_obstacles(config, std::iter::empty())
	}
	/// Validate `config` and build the navigation data with the `(x, z)` cells of `obstacles`
	/// blocked
	pub fn new_with_obstacles(
		config: NavigationConfig,
		obstacles: impl IntoIterator<Item = (usize, usize)>,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		let mut grid = Grid::new(&config);
		for (x, z) in obstacles {
			grid.set_obstacle(x, z, true);
		}
		let mut cell_queue = VecDeque::with_capacity(config.grid_size);
		let mut cluster_graph = ClusterGraph::new(&grid);
		cluster_graph.build_all_local_fields(&grid, &mut cell_queue);
		let path_finder = PathFinder::new(&cluster_graph);
		info!(
			"Navigation grid of {}x{} cells ready with {} obstacles",
			config.grid_size,
			config.grid_size,
			grid.obstacle_count()
		);
		Ok(GridManager {
			config,
			grid,
			cluster_graph,
			path_finder,
			target_fields: BTreeMap::new(),
			agent_paths: BTreeMap::new(),
			cell_queue,
			dirty_clusters: BTreeSet::new(),
			full_rebuild: false,
		})
	}
	/// Get the [NavigationConfig]
	pub fn config(&self) -> &NavigationConfig {
		&self.config
	}
	/// Get the [Grid]
	pub fn grid(&self) -> &Grid {
		&self.grid
	}
	/// Get the [ClusterGraph]
	pub fn cluster_graph(&self) -> &ClusterGraph {
		&self.cluster_graph
	}
	/// Whether obstacle edits are waiting to be applied
	pub fn has_pending_changes(&self) -> bool {
		self.full_rebuild || !self.dirty_clusters.is_empty()
	}
	/// Whether a cell is an obstacle, cells outside the grid count as obstacles
	pub fn is_obstacle(&self, x: usize, z: usize) -> bool {
		self.grid.is_obstacle(x, z)
	}
	/// World position of the centre of a cell
	pub fn world_position(&self, x: usize, z: usize) -> Option<Vec3> {
		self.grid.world_position(x, z)
	}
	/// Set the obstacle state of a cell, returns `true` when the state changed. The navigation
	/// data is brought up to date at the start of the next [GridManager::tick] or
	/// [GridManager::refresh_target_fields]
	pub fn set_obstacle(&mut self, x: usize, z: usize, is_obstacle: bool) -> bool {
		if !self.grid.set_obstacle(x, z, is_obstacle) {
			return false;
		}
		let cluster = self.grid.cluster_of_cell(CellCoord::new(x, z));
		self.dirty_clusters.insert(cluster);
		true
	}
	/// Replace the obstacle layout with the contents of a CSV file, see
	/// [Grid::obstacles_from_csv]. Returns the number of cells that changed
	#[cfg(feature = "csv")]
	pub fn load_obstacles_csv(&mut self, path: &str) -> Result<usize, ConfigError> {
		let result = self.grid.obstacles_from_csv(path);
		// a failed read may still have edited some rows
		self.full_rebuild = true;
		result
	}
	/// Bring the cluster graph up to date with any obstacle edits. Every cached agent path is
	/// discarded and every target field recalculated when something changed, returns whether
	/// anything did
	pub fn apply_obstacle_changes(&mut self) -> bool {
		if !self.has_pending_changes() {
			return false;
		}
		if self.full_rebuild {
			self.cluster_graph
				.rebuild_all(&self.grid, &mut self.cell_queue);
			self.path_finder = PathFinder::new(&self.cluster_graph);
		} else {
			for cluster in self.dirty_clusters.iter() {
				self.cluster_graph
					.rebuild_around(&self.grid, *cluster, &mut self.cell_queue);
			}
		}
		debug!(
			"Applied obstacle changes to {} clusters, full rebuild: {}",
			self.dirty_clusters.len(),
			self.full_rebuild
		);
		self.dirty_clusters.clear();
		self.full_rebuild = false;
		self.agent_paths.clear();
		for data in self.target_fields.values_mut() {
			let position = data.get_target_position();
			calculate_target_field(
				&self.grid,
				data.get_field_mut(),
				position,
				&mut self.cell_queue,
			);
		}
		true
	}
	/// Plan the cluster path of each agent. An agent is replanned when the cluster of its target
	/// differs from the one its cached path was planned for. Agents or targets outside the grid
	/// are skipped
	pub fn tick(&mut self, agents: impl IntoIterator<Item = TrackedAgent>) {
		self.apply_obstacle_changes();
		for tracked in agents {
			let Some(target_cluster) = self
				.grid
				.cluster_from_world_position(tracked.target_position)
			else {
				continue;
			};
			let Some(current) = self.grid.cluster_from_world_position(tracked.position) else {
				continue;
			};
			let path = self.agent_paths.entry(tracked.agent).or_default();
			if path.destination != Some(target_cluster) {
				path.destination = Some(target_cluster);
				if current == target_cluster {
					path.clusters.clear();
				} else if !self.path_finder.find_cluster_path(
					&self.cluster_graph,
					current,
					target_cluster,
					&mut path.clusters,
				) {
					debug!(
						"Agent {:?} has no route from {:?} to {:?}",
						tracked.agent, current, target_cluster
					);
				}
			}
			if path.clusters.front() == Some(&current) {
				path.clusters.pop_front();
			}
		}
	}
	/// Direction towards the best node of the portal into the next cluster of the agent's path.
	/// Falls back to a straight line to `target_position` when the agent is off the grid or has
	/// no remaining path. A path whose next portal no longer exists is discarded
	pub fn flow_direction(&mut self, agent: Entity, current_position: Vec3, target_position: Vec3) -> Vec3 {
		let straight = planar_direction(current_position, target_position);
		let Some(current) = self.grid.cluster_from_world_position(current_position) else {
			return straight;
		};
		let Some(path) = self.agent_paths.get_mut(&agent) else {
			return straight;
		};
		if path.clusters.front() == Some(&current) {
			path.clusters.pop_front();
		}
		let Some(&next) = path.clusters.front() else {
			return straight;
		};
		let Some(portal) = self.cluster_graph.portal_between(current, next) else {
			warn!(
				"No portal between {:?} and {:?}, discarding path of {:?}",
				current, next, agent
			);
			self.agent_paths.remove(&agent);
			return straight;
		};
		let mut best: Option<(f32, Vec3)> = None;
		for node in portal.get_nodes() {
			let Some(cell) = portal.node_cell_in(node, next) else {
				continue;
			};
			let node_position = self.grid.cell_world_position(cell);
			let score = current_position.distance_squared(node_position)
				+ node_position.distance_squared(target_position);
			if best.is_none_or(|(best_score, _)| score < best_score) {
				best = Some((score, node_position));
			}
		}
		let aim = match best {
			Some((_, position)) => position,
			None => match portal.centroid(&self.grid) {
				Some(centroid) => centroid,
				None => return straight,
			},
		};
		planar_direction(current_position, aim)
	}
	/// Direction given by the local field of the agent's current cluster leading towards the
	/// portal into the next cluster of its path. [None] when the agent has no remaining path or is
	/// standing on the portal
	pub fn local_field_direction(&self, agent: Entity, position: Vec3) -> Option<Vec3> {
		let cell = self.grid.coords_from_world_position(position)?;
		let current = self.grid.cluster_of_cell(cell);
		let path = self.agent_paths.get(&agent)?;
		let next = path.clusters.iter().find(|c| **c != current)?;
		let cluster = self.cluster_graph.get_cluster(current)?;
		let step = cluster.next_step_towards(&PortalID::new(current, *next), cell)?;
		Some(planar_direction(
			self.grid.cell_world_position(cell),
			self.grid.cell_world_position(step),
		))
	}
	/// Direction combining both levels of navigation. While clusters remain to be crossed the
	/// local portal field is followed, or [GridManager::flow_direction] when the agent is on the
	/// portal. Within the target's cluster the target's global field is followed, falling back to
	/// a straight line
	pub fn steering_direction(
		&mut self,
		agent: Entity,
		position: Vec3,
		target: Entity,
		target_position: Vec3,
	) -> Vec3 {
		let has_remaining_path = self
			.agent_paths
			.get(&agent)
			.is_some_and(|path| !path.clusters.is_empty());
		if has_remaining_path {
			if let Some(direction) = self.local_field_direction(agent, position) {
				return direction;
			}
			return self.flow_direction(agent, position, target_position);
		}
		let direction = self.target_flow_direction(position, target);
		if direction != Vec3::ZERO {
			return direction;
		}
		planar_direction(position, target_position)
	}
	/// Start tracking a target by calculating its global field, a target already tracked is left
	/// untouched
	pub fn track_target(&mut self, target: Entity, position: Vec3) {
		if self.target_fields.contains_key(&target) {
			return;
		}
		let mut field = FlowField::new(self.grid.get_grid_size());
		calculate_target_field(&self.grid, &mut field, position, &mut self.cell_queue);
		self.target_fields
			.insert(target, FlowFieldData::new(field, position));
		debug!("Tracking target {:?}", target);
	}
	/// Stop tracking a target, returns whether it was tracked
	pub fn untrack_target(&mut self, target: Entity) -> bool {
		self.target_fields.remove(&target).is_some()
	}
	/// Whether a target has a global field
	pub fn is_tracking(&self, target: Entity) -> bool {
		self.target_fields.contains_key(&target)
	}
	/// Recalculate the global field of every target that has moved past the threshold. Targets
	/// for which `position_of` gives [None] are left as they are
	pub fn refresh_target_fields(&mut self, position_of: impl Fn(Entity) -> Option<Vec3>) {
		self.apply_obstacle_changes();
		let threshold = self.config.recalc_distance_squared();
		for (target, data) in self.target_fields.iter_mut() {
			let Some(position) = position_of(*target) else {
				continue;
			};
			if data.is_stale(position, threshold) {
				calculate_target_field(
					&self.grid,
					data.get_field_mut(),
					position,
					&mut self.cell_queue,
				);
				data.set_target_position(position);
				debug!("Recalculated field of target {:?}", target);
			}
		}
	}
	/// The global field of a target
	pub fn target_field(&self, target: Entity) -> Option<&FlowFieldData> {
		self.target_fields.get(&target)
	}
	/// Direction from the cell of `follower_position` to the neighbour it should step into to
	/// approach `target`. [Vec3::ZERO] when the target isn't tracked, the follower is off the grid,
	/// unreachable or standing on the target's cell
	pub fn target_flow_direction(&self, follower_position: Vec3, target: Entity) -> Vec3 {
		let Some(data) = self.target_fields.get(&target) else {
			return Vec3::ZERO;
		};
		let Some(cell) = self.grid.coords_from_world_position(follower_position) else {
			return Vec3::ZERO;
		};
		match data.get_field().next_step(cell) {
			Some(next) => planar_direction(
				self.grid.cell_world_position(cell),
				self.grid.cell_world_position(next),
			),
			None => Vec3::ZERO,
		}
	}
	/// The clusters an agent still has to cross
	pub fn entity_path_for_debug_draw(&self, agent: Entity) -> Option<Vec<ClusterID>> {
		self.agent_paths
			.get(&agent)
			.map(|path| path.clusters.iter().copied().collect())
	}
	/// The cached path state of an agent
	pub fn agent_path(&self, agent: Entity) -> Option<&AgentPath> {
		self.agent_paths.get(&agent)
	}
	/// Drop the cached path of an agent, returns whether one existed
	pub fn forget_agent(&mut self, agent: Entity) -> bool {
		self.agent_paths.remove(&agent).is_some()
	}
}

/// Recalculate a global field with the cell of `position` as the only source, a position off the
/// grid leaves the field unreached
fn calculate_target_field(grid: &Grid, field: &mut FlowField, position: Vec3, queue: &mut VecDeque<usize>) {
	let sources: Vec<CellCoord> = grid.coords_from_world_position(position).into_iter().collect();
	field.calculate(&sources, |x, z| grid.is_obstacle(x, z), queue);
}
