//! The kinds of fields used by the algorithm
//!

pub mod flow_field;

use crate::prelude::*;
use bevy::prelude::*;

/// A global [FlowField] covering the whole grid paired with the target position it was last
/// calculated for, used to decide whether the field has gone stale
#[derive(Clone, Debug)]
pub struct FlowFieldData {
	/// Field leading every reachable cell towards the target
	field: FlowField,
	/// World position of the target when `field` was calculated
	target_position: Vec3,
}

impl FlowFieldData {
	/// Create a new instance of [FlowFieldData]
	pub fn new(field: FlowField, target_position: Vec3) -> Self {
		FlowFieldData {
			field,
			target_position,
		}
	}
	/// Get a reference to the field
	pub fn get_field(&self) -> &FlowField {
		&self.field
	}
	/// Get a mutable reference to the field
	pub fn get_field_mut(&mut self) -> &mut FlowField {
		&mut self.field
	}
	/// Position of the target when the field was last calculated
	pub fn get_target_position(&self) -> Vec3 {
		self.target_position
	}
	/// Record the position the field was calculated for
	pub fn set_target_position(&mut self, target_position: Vec3) {
		self.target_position = target_position;
	}
	/// Whether the target has moved further than the threshold since the field was calculated
	pub fn is_stale(&self, target_position: Vec3, threshold_squared: f32) -> bool {
		target_position.distance_squared(self.target_position) > threshold_squared
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn stale_beyond_threshold() {
		let data = FlowFieldData::new(FlowField::new(2), Vec3::ZERO);
		assert!(!data.is_stale(Vec3::new(1.0, 0.0, 0.0), 1.0));
		assert!(data.is_stale(Vec3::new(1.0, 0.0, 0.1), 1.0));
	}
	#[test]
	fn zero_threshold_rebuilds_on_any_move() {
		let mut data = FlowFieldData::new(FlowField::new(2), Vec3::ZERO);
		assert!(!data.is_stale(Vec3::ZERO, 0.0));
		assert!(data.is_stale(Vec3::new(0.0, 0.0, 0.001), 0.0));
		data.set_target_position(Vec3::new(0.0, 0.0, 0.001));
		assert!(!data.is_stale(Vec3::new(0.0, 0.0, 0.001), 0.0));
	}
}
