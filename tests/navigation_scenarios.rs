//! Drive the [GridManager] through small worlds and check where agents are sent
//!

use bevy::prelude::*;
use bevy_flowfield_clusters::prelude::*;

/// A 20x20 grid of 10x10 clusters with a wall along `x == 9` broken only at `z == 14`
fn wall_with_gap() -> GridManager {
	let wall = (0..20).filter(|z| *z != 14).map(|z| (9, z));
	GridManager::new_with_obstacles(NavigationConfig::new(20, 1.0, 10, 1.0), wall).unwrap()
}

/// Step an agent one cell at a time along its steering direction until it reaches the cell of the
/// target, returns the cells visited
fn walk(manager: &mut GridManager, start: (usize, usize), goal: (usize, usize), limit: usize) -> Vec<CellCoord> {
	let agent = Entity::from_raw(1);
	let target = Entity::from_raw(2);
	let target_position = manager.world_position(goal.0, goal.1).unwrap();
	manager.track_target(target, target_position);
	let mut position = manager.world_position(start.0, start.1).unwrap();
	let goal_cell = CellCoord::new(goal.0, goal.1);
	let mut visited = Vec::new();
	for _ in 0..limit {
		let cell = manager.grid().coords_from_world_position(position).unwrap();
		visited.push(cell);
		if cell == goal_cell {
			break;
		}
		manager.tick([TrackedAgent { agent, position, target_position }]);
		let direction = manager.steering_direction(agent, position, target, target_position);
		let next = position + direction * manager.grid().get_cell_size();
		let next_cell = manager.grid().coords_from_world_position(next).unwrap();
		position = manager.world_position(next_cell.get_x(), next_cell.get_z()).unwrap();
	}
	visited
}

#[test]
fn open_grid_global_field_direction() {
	let mut manager = GridManager::new(NavigationConfig::new(10, 1.0, 5, 1.0)).unwrap();
	let target = Entity::from_raw(7);
	manager.track_target(target, manager.world_position(5, 5).unwrap());
	let follower = manager.world_position(0, 0).unwrap();
	let result = manager.target_flow_direction(follower, target);
	assert!(result.x > 0.0);
	assert!(result.z > 0.0);
	assert!((result.length() - 1.0).abs() < 0.0001);
}

#[test]
fn open_grid_flow_direction() {
	let mut manager = GridManager::new(NavigationConfig::new(10, 1.0, 5, 1.0)).unwrap();
	let agent = Entity::from_raw(1);
	let position = manager.world_position(0, 0).unwrap();
	let target_position = manager.world_position(5, 5).unwrap();
	manager.tick([TrackedAgent { agent, position, target_position }]);
	assert_eq!(Some(vec![ClusterID::new(1, 1)]), manager.entity_path_for_debug_draw(agent));
	let result = manager.flow_direction(agent, position, target_position);
	assert!(result.x > 0.0);
	assert!(result.z > 0.0);
	assert!((result.length() - 1.0).abs() < 0.0001);
}

#[test]
fn wall_with_gap_cluster_path() {
	let mut manager = wall_with_gap();
	let agent = Entity::from_raw(1);
	let position = manager.world_position(2, 2).unwrap();
	let target_position = manager.world_position(17, 2).unwrap();
	manager.tick([TrackedAgent { agent, position, target_position }]);
	let expected = vec![ClusterID::new(0, 1), ClusterID::new(1, 1), ClusterID::new(1, 0)];
	assert_eq!(Some(expected), manager.entity_path_for_debug_draw(agent));
}

#[test]
fn wall_with_gap_global_field_reaches_through_gap() {
	let mut manager = wall_with_gap();
	let target = Entity::from_raw(2);
	manager.track_target(target, manager.world_position(17, 2).unwrap());
	let field = manager.target_field(target).unwrap().get_field();
	let mut cell = CellCoord::new(2, 2);
	let mut through_gap = false;
	while let Some(next) = field.next_step(cell) {
		assert!(!manager.is_obstacle(next.get_x(), next.get_z()));
		if next == CellCoord::new(9, 14) {
			through_gap = true;
		}
		cell = next;
	}
	assert_eq!(CellCoord::new(17, 2), cell);
	assert!(through_gap);
}

#[test]
fn wall_with_gap_agent_arrives() {
	let mut manager = wall_with_gap();
	let visited = walk(&mut manager, (2, 2), (17, 2), 200);
	assert_eq!(Some(&CellCoord::new(17, 2)), visited.last());
	assert!(visited.contains(&CellCoord::new(9, 14)));
	for cell in visited.iter() {
		assert!(!manager.is_obstacle(cell.get_x(), cell.get_z()));
	}
}

#[test]
fn small_grid_cluster_paths() {
	let mut manager = GridManager::new(NavigationConfig::new(4, 1.0, 2, 1.0)).unwrap();
	let agent = Entity::from_raw(1);
	let position = manager.world_position(0, 0).unwrap();
	// target shares the agent's cluster
	manager.tick([TrackedAgent { agent, position, target_position: manager.world_position(1, 1).unwrap() }]);
	assert_eq!(Some(vec![]), manager.entity_path_for_debug_draw(agent));
	assert_eq!(Some(ClusterID::new(0, 0)), manager.agent_path(agent).unwrap().get_destination());
	manager.tick([TrackedAgent { agent, position, target_position: manager.world_position(3, 3).unwrap() }]);
	assert_eq!(Some(vec![ClusterID::new(1, 1)]), manager.entity_path_for_debug_draw(agent));
	manager.tick([TrackedAgent { agent, position, target_position: manager.world_position(3, 0).unwrap() }]);
	assert_eq!(Some(vec![ClusterID::new(1, 0)]), manager.entity_path_for_debug_draw(agent));
}

#[test]
fn small_grid_blocked_corner_takes_two_clusters() {
	let mut manager = GridManager::new_with_obstacles(NavigationConfig::new(4, 1.0, 2, 1.0), [(1, 1)]).unwrap();
	let agent = Entity::from_raw(1);
	let position = manager.world_position(0, 0).unwrap();
	let target_position = manager.world_position(3, 3).unwrap();
	manager.tick([TrackedAgent { agent, position, target_position }]);
	let path = manager.entity_path_for_debug_draw(agent).unwrap();
	assert_eq!(2, path.len());
	assert_eq!(ClusterID::new(1, 1), path[1]);
}

#[test]
fn opening_wall_at_runtime_shortens_path() {
	let mut manager = wall_with_gap();
	let agent = Entity::from_raw(1);
	let position = manager.world_position(2, 2).unwrap();
	let target_position = manager.world_position(17, 2).unwrap();
	manager.tick([TrackedAgent { agent, position, target_position }]);
	assert_eq!(3, manager.entity_path_for_debug_draw(agent).unwrap().len());
	assert!(manager.set_obstacle(9, 2, false));
	manager.tick([TrackedAgent { agent, position, target_position }]);
	assert_eq!(Some(vec![ClusterID::new(1, 0)]), manager.entity_path_for_debug_draw(agent));
}

#[test]
fn enclosed_target_leaves_empty_path() {
	// seal off the corner cluster (3, 3) along with its neighbouring boundary cells
	let mut walls = Vec::new();
	for i in 14..20 {
		walls.push((i, 14));
		walls.push((14, i));
	}
	let mut manager = GridManager::new_with_obstacles(NavigationConfig::new(20, 1.0, 5, 1.0), walls).unwrap();
	let agent = Entity::from_raw(1);
	let position = manager.world_position(1, 1).unwrap();
	let target_position = manager.world_position(15, 15).unwrap();
	manager.tick([TrackedAgent { agent, position, target_position }]);
	assert_eq!(Some(vec![]), manager.entity_path_for_debug_draw(agent));
	assert_eq!(Some(ClusterID::new(3, 3)), manager.agent_path(agent).unwrap().get_destination());
	let target = Entity::from_raw(2);
	manager.track_target(target, target_position);
	assert_eq!(Vec3::ZERO, manager.target_flow_direction(position, target));
}

#[test]
#[cfg(feature = "csv")]
fn obstacles_from_csv_asset() {
	let mut manager = GridManager::new(NavigationConfig::new(20, 1.0, 10, 1.0)).unwrap();
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/obstacles.csv";
	assert_eq!(19, manager.load_obstacles_csv(&path).unwrap());
	let agent = Entity::from_raw(1);
	let position = manager.world_position(2, 2).unwrap();
	let target_position = manager.world_position(17, 2).unwrap();
	manager.tick([TrackedAgent { agent, position, target_position }]);
	let expected = vec![ClusterID::new(0, 1), ClusterID::new(1, 1), ClusterID::new(1, 0)];
	assert_eq!(Some(expected), manager.entity_path_for_debug_draw(agent));
}

#[test]
#[cfg(feature = "ron")]
fn manager_from_ron_config() {
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/navigation_config.ron";
	let config = NavigationConfig::from_ron(&path).unwrap();
	let manager = GridManager::new(config).unwrap();
	assert_eq!(36, manager.cluster_graph().get_clusters().len());
	assert_eq!(Some(Vec3::new(-14.75, 0.0, -14.75)), manager.world_position(0, 0));
}
