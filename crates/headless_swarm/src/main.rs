//! Runs without a window: a target orbits the centre of a walled world while a swarm of
//! navigators chases it. A gate in one of the walls is opened and closed periodically
//!

use std::time::Duration;

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use bevy_flowfield_clusters::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Cells along each side of the world
const GRID_SIZE: usize = 100;
/// Cells along each side of a cluster
const CLUSTER_SIZE: usize = 10;
/// Number of navigators to spawn
const SWARM_SIZE: usize = 500;
/// Radius of the orbit of the target in world units
const ORBIT_RADIUS: f32 = 30.0;
/// Frames simulated before exiting
const FRAME_LIMIT: u32 = 600;
/// Seconds between toggling the gate
const GATE_PERIOD: f32 = 2.0;

fn main() -> Result<(), ConfigError> {
	let config = NavigationConfig::new(GRID_SIZE, 1.0, CLUSTER_SIZE, 1.0);
	let manager = GridManager::new_with_obstacles(config, walls())?;
	App::new()
		.add_plugins((
			MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
				1.0 / 60.0,
			))),
			LogPlugin::default(),
			FlowFieldNavigationPlugin,
		))
		.insert_resource(manager)
		.insert_resource(Gate::default())
		.add_systems(Startup, setup_swarm)
		.add_systems(Update, (orbit_target, toggle_gate, report).chain())
		.run();
	Ok(())
}

/// Labels the orbiting target
#[derive(Component)]
struct Orbiting;

/// State of the gate cut into the vertical wall
#[derive(Resource, Default)]
struct Gate {
	/// Whether the gate cells are free
	is_open: bool,
	/// Seconds since the gate last changed
	timer: f32,
}

/// Cells of two walls splitting the world, the horizontal wall has a permanent gap
fn walls() -> Vec<(usize, usize)> {
	let mut cells = Vec::new();
	for z in 10..90 {
		cells.push((GRID_SIZE / 2, z));
	}
	for x in 10..90 {
		if !(20..24).contains(&x) {
			cells.push((x, GRID_SIZE / 3));
		}
	}
	cells
}

/// Cells of the vertical wall which open and close
fn gate_cells() -> impl Iterator<Item = (usize, usize)> {
	(60..64).map(|z| (GRID_SIZE / 2, z))
}

/// Spawn the target and scatter the swarm across free cells
fn setup_swarm(mut cmds: Commands, manager: Res<GridManager>) {
	let target = cmds
		.spawn((
			NavigationTarget,
			Orbiting,
			Transform::from_xyz(ORBIT_RADIUS, 0.0, 0.0),
		))
		.id();
	let mut rng = StdRng::seed_from_u64(42);
	let mut spawned = 0;
	while spawned < SWARM_SIZE {
		let x = rng.random_range(0..GRID_SIZE);
		let z = rng.random_range(0..GRID_SIZE);
		if manager.is_obstacle(x, z) {
			continue;
		}
		let Some(position) = manager.world_position(x, z) else {
			continue;
		};
		let speed = rng.random_range(3.0..6.0);
		cmds.spawn((Navigator::new(target, speed), Transform::from_translation(position)));
		spawned += 1;
	}
	info!("Spawned {} navigators", spawned);
}

/// Move the target around its orbit
fn orbit_target(mut query: Query<&mut Transform, With<Orbiting>>, time: Res<Time>) {
	let angle = time.elapsed_secs() * 0.2;
	for mut transform in &mut query {
		transform.translation = Vec3::new(angle.cos(), 0.0, angle.sin()) * ORBIT_RADIUS;
	}
}

/// Open or close the gate every [GATE_PERIOD] seconds
fn toggle_gate(
	mut gate: ResMut<Gate>,
	mut events: EventWriter<EventUpdateObstacle>,
	time: Res<Time>,
) {
	gate.timer += time.delta_secs();
	if gate.timer < GATE_PERIOD {
		return;
	}
	gate.timer = 0.0;
	gate.is_open = !gate.is_open;
	for (x, z) in gate_cells() {
		events.write(EventUpdateObstacle::new(x, z, !gate.is_open));
	}
	info!("Gate is now {}", if gate.is_open { "open" } else { "closed" });
}

/// Log how close the swarm is to its target and exit after [FRAME_LIMIT] frames
fn report(
	navigators: Query<&Transform, With<Navigator>>,
	target: Query<&Transform, With<Orbiting>>,
	mut exit: EventWriter<AppExit>,
	mut frame: Local<u32>,
) {
	*frame += 1;
	if *frame % 60 == 0 {
		if let Ok(target) = target.single() {
			let count = navigators.iter().count().max(1);
			let mean = navigators
				.iter()
				.map(|t| t.translation.distance(target.translation))
				.sum::<f32>()
				/ count as f32;
			info!("Frame {}: mean distance to target {:.2}", *frame, mean);
		}
	}
	if *frame >= FRAME_LIMIT {
		exit.write(AppExit::Success);
	}
}
