//! Logic for handling obstacle edits which in turn rebuild the portals and local fields of the
//! affected clusters and invalidate cached agent paths
//!

use std::collections::BTreeMap;

use crate::prelude::*;
use bevy::prelude::*;

/// Used to block or unblock a cell of the [Grid]
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct EventUpdateObstacle {
	/// Column of the cell
	x: usize,
	/// Row of the cell
	z: usize,
	/// Whether the cell should become an obstacle
	is_obstacle: bool,
}

impl EventUpdateObstacle {
	/// Create a new instance of [EventUpdateObstacle]
	pub fn new(x: usize, z: usize, is_obstacle: bool) -> Self {
		EventUpdateObstacle { x, z, is_obstacle }
	}
	/// Get the `(x, z)` of the cell
	pub fn get_cell(&self) -> (usize, usize) {
		(self.x, self.z)
	}
	/// Whether the cell should become an obstacle
	pub fn is_obstacle(&self) -> bool {
		self.is_obstacle
	}
}

/// Collapse a series of edits so each cell is only written once with its final state
pub fn coalesce_obstacle_updates<'a>(
	events: impl IntoIterator<Item = &'a EventUpdateObstacle>,
) -> BTreeMap<(usize, usize), bool> {
	let mut cells = BTreeMap::new();
	for event in events {
		cells.insert(event.get_cell(), event.is_obstacle());
	}
	cells
}

/// Read [EventUpdateObstacle] and apply them to the [GridManager]. The navigation data is rebuilt
/// around the edited clusters when the manager next ticks
#[cfg(not(tarpaulin_include))]
pub fn process_obstacle_updates(
	mut events: EventReader<EventUpdateObstacle>,
	mut manager: ResMut<GridManager>,
) {
	if events.is_empty() {
		return;
	}
	let cells = coalesce_obstacle_updates(events.read());
	let mut changed = 0;
	for ((x, z), is_obstacle) in cells {
		if manager.set_obstacle(x, z, is_obstacle) {
			changed += 1;
		}
	}
	debug!("Obstacle updates changed {} cells", changed);
}
