//! Useful structures and tools used by the fields and the cluster graph
//!

use bevy::prelude::*;

/// Cost of stepping to an orthogonally adjacent cell
pub const STRAIGHT_COST: u16 = 10;
/// Cost of stepping to a diagonally adjacent cell
pub const DIAGONAL_COST: u16 = 14;
/// Sentinel cost of a cell that is unreachable or hasn't been visited
pub const MAX_COST: u16 = u16::MAX;

/// Unit cost of a straight step used by the octile heuristic
const OCTILE_STRAIGHT: f32 = 1.0;
/// Approximation of `sqrt(2)` used by the octile heuristic
const OCTILE_DIAGONAL: f32 = 1.414;

/// Convenience way of accessing the 8 directions of movement from one cell to a neighbour.
///
/// The `x` axis increases towards the East and the `z` axis increases towards the North
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Reflect)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
	NorthEast,
	SouthEast,
	SouthWest,
	NorthWest,
}

impl Ordinal {
	/// All ordinals in the order neighbours are inspected by the field relaxation
	pub const ALL: [Ordinal; 8] = [
		Ordinal::SouthWest,
		Ordinal::West,
		Ordinal::NorthWest,
		Ordinal::South,
		Ordinal::North,
		Ordinal::SouthEast,
		Ordinal::East,
		Ordinal::NorthEast,
	];
	/// The `(dx, dz)` step taken when moving in this direction
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, 1),
			Ordinal::East => (1, 0),
			Ordinal::South => (0, -1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthEast => (1, 1),
			Ordinal::SouthEast => (1, -1),
			Ordinal::SouthWest => (-1, -1),
			Ordinal::NorthWest => (-1, 1),
		}
	}
	/// Whether moving in this direction changes both axes
	pub fn is_diagonal(&self) -> bool {
		matches!(
			self,
			Ordinal::NorthEast | Ordinal::SouthEast | Ordinal::SouthWest | Ordinal::NorthWest
		)
	}
	/// Cost of a single step in this direction
	pub fn step_cost(&self) -> u16 {
		if self.is_diagonal() {
			DIAGONAL_COST
		} else {
			STRAIGHT_COST
		}
	}
	/// Get the opposite direction
	pub fn inverse(&self) -> Ordinal {
		match self {
			Ordinal::North => Ordinal::South,
			Ordinal::East => Ordinal::West,
			Ordinal::South => Ordinal::North,
			Ordinal::West => Ordinal::East,
			Ordinal::NorthEast => Ordinal::SouthWest,
			Ordinal::SouthEast => Ordinal::NorthWest,
			Ordinal::SouthWest => Ordinal::NorthEast,
			Ordinal::NorthWest => Ordinal::SouthEast,
		}
	}
	/// Step from `(x, z)` in this direction, [None] if the step leaves a square area of `side` cells
	pub fn step_within(&self, x: usize, z: usize, side: usize) -> Option<(usize, usize)> {
		let (dx, dz) = self.offset();
		let nx = x as i64 + dx as i64;
		let nz = z as i64 + dz as i64;
		if nx < 0 || nz < 0 || nx >= side as i64 || nz >= side as i64 {
			None
		} else {
			Some((nx as usize, nz as usize))
		}
	}
}

/// Octile distance between two points on the `x-z` plane, an admissible heuristic when both
/// straight and diagonal movement are allowed
pub fn octile_distance(a: Vec3, b: Vec3) -> f32 {
	let dx = (a.x - b.x).abs();
	let dz = (a.z - b.z).abs();
	OCTILE_STRAIGHT * (dx + dz) + (OCTILE_DIAGONAL - 2.0 * OCTILE_STRAIGHT) * dx.min(dz)
}

/// Normalised direction from `from` to `to` on the `x-z` plane, [Vec3::ZERO] when the points coincide
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
	let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
	delta.normalize_or_zero()
}
