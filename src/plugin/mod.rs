//! Defines the Bevy [Plugin] for FlowField navigation
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod cost_layer;
pub mod flow_layer;

/// Order in which the navigation systems run each frame
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Forget despawned navigators and targets
	Tidy,
	/// Apply obstacle edits, refresh target fields and plan navigator paths
	Calculate,
	/// Move navigators
	Steer,
}

/// Registers the navigation types and systems. The systems only run once a [GridManager]
/// resource has been inserted
pub struct FlowFieldNavigationPlugin;

impl Plugin for FlowFieldNavigationPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<CellCoord>()
			.register_type::<ClusterID>()
			.register_type::<PortalID>()
			.register_type::<PortalNode>()
			.register_type::<Navigator>()
			.register_type::<NavigationTarget>()
			.add_event::<cost_layer::EventUpdateObstacle>()
			.configure_sets(
				Update,
				(
					OrderingSet::Tidy,
					OrderingSet::Calculate,
					OrderingSet::Steer,
				)
					.chain()
					.run_if(resource_exists::<GridManager>),
			)
			.add_systems(
				Update,
				(
					(
						flow_layer::forget_removed_navigators,
						flow_layer::untrack_removed_targets,
					)
						.in_set(OrderingSet::Tidy),
					(
						cost_layer::process_obstacle_updates,
						flow_layer::track_new_targets,
						flow_layer::refresh_target_fields,
						flow_layer::tick_navigators,
					)
						.chain()
						.in_set(OrderingSet::Calculate),
					flow_layer::steer_navigators.in_set(OrderingSet::Steer),
				),
			);
	}
}
