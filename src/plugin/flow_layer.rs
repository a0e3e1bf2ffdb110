//! Logic relating to tracking targets, planning navigator paths and moving navigators along them
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Marks an entity whose position is tracked with a global [FlowField]
#[derive(Component, Reflect, Default, Clone, Copy, Debug)]
#[reflect(Component)]
pub struct NavigationTarget;

/// An agent steered towards `target`
#[derive(Component, Reflect, Clone, Copy, Debug)]
#[reflect(Component)]
pub struct Navigator {
	/// Entity being moved towards
	target: Entity,
	/// World units travelled per second
	speed: f32,
}

impl Navigator {
	/// Create a new instance of [Navigator]
	pub fn new(target: Entity, speed: f32) -> Self {
		Navigator { target, speed }
	}
	/// Entity being moved towards
	pub fn get_target(&self) -> Entity {
		self.target
	}
	/// Change the entity being moved towards
	pub fn set_target(&mut self, target: Entity) {
		self.target = target;
	}
	/// World units travelled per second
	pub fn get_speed(&self) -> f32 {
		self.speed
	}
}

/// Drop the cached path of any despawned [Navigator]
#[cfg(not(tarpaulin_include))]
pub fn forget_removed_navigators(
	mut removed: RemovedComponents<Navigator>,
	mut manager: ResMut<GridManager>,
) {
	for entity in removed.read() {
		manager.forget_agent(entity);
	}
}

/// Drop the global field of any despawned [NavigationTarget]
#[cfg(not(tarpaulin_include))]
pub fn untrack_removed_targets(
	mut removed: RemovedComponents<NavigationTarget>,
	mut manager: ResMut<GridManager>,
) {
	for entity in removed.read() {
		if manager.untrack_target(entity) {
			debug!("Untracked target {:?}", entity);
		}
	}
}

/// Calculate a global field for every newly added [NavigationTarget]
#[cfg(not(tarpaulin_include))]
pub fn track_new_targets(
	targets: Query<(Entity, &Transform), Added<NavigationTarget>>,
	mut manager: ResMut<GridManager>,
) {
	for (entity, transform) in targets.iter() {
		manager.track_target(entity, transform.translation);
	}
}

/// Recalculate the global field of any [NavigationTarget] that has moved far enough
#[cfg(not(tarpaulin_include))]
pub fn refresh_target_fields(
	targets: Query<&Transform, With<NavigationTarget>>,
	mut manager: ResMut<GridManager>,
) {
	manager.refresh_target_fields(|entity| targets.get(entity).ok().map(|t| t.translation));
}

/// Plan the cluster path of every [Navigator]
#[cfg(not(tarpaulin_include))]
pub fn tick_navigators(
	navigators: Query<(Entity, &Transform, &Navigator)>,
	transforms: Query<&Transform>,
	mut manager: ResMut<GridManager>,
) {
	let agents = navigators
		.iter()
		.filter_map(|(entity, transform, navigator)| {
			transforms
				.get(navigator.get_target())
				.ok()
				.map(|target| TrackedAgent {
					agent: entity,
					position: transform.translation,
					target_position: target.translation,
				})
		});
	manager.tick(agents);
}

/// Move every [Navigator] along its steering direction
#[cfg(not(tarpaulin_include))]
pub fn steer_navigators(
	navigators: Query<(Entity, &Navigator)>,
	mut transforms: Query<&mut Transform>,
	mut manager: ResMut<GridManager>,
	time: Res<Time>,
) {
	let delta = time.delta_secs();
	for (entity, navigator) in navigators.iter() {
		let target = navigator.get_target();
		let Ok(target_position) = transforms.get(target).map(|t| t.translation) else {
			continue;
		};
		let Ok(mut transform) = transforms.get_mut(entity) else {
			continue;
		};
		let direction =
			manager.steering_direction(entity, transform.translation, target, target_position);
		transform.translation += direction * navigator.get_speed() * delta;
	}
}
