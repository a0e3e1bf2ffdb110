//! The [Grid] is a square lattice of cells laid over the `x-z` plane of the world. Each cell is
//! either free or an obstacle and has a precomputed world position at its centre.
//!
//! The grid is centred on the world origin, cell `(0, 0)` sits in the `(-x, -z)` corner:
//!
//! ```text
//!  z
//!  ^  _______________
//!  | |___|___|___|___|
//!  | |___|___|___|___|
//!  | |___|___|___|___|
//!  | |0,0|___|___|___|
//!  +-----------------> x
//! ```
//!
//! Cells are stored in flat arrays where the index of `(x, z)` is `x * grid_size + z`.

use bevy::prelude::*;
use fixedbitset::FixedBitSet;

use crate::prelude::*;

/// ID of a cell within the [Grid] or within the local area of a cluster
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct CellCoord((usize, usize));

impl CellCoord {
	/// Create a new instance of [CellCoord]
	pub fn new(x: usize, z: usize) -> Self {
		CellCoord((x, z))
	}
	/// Get the `(x, z)` tuple
	pub fn get(&self) -> (usize, usize) {
		self.0
	}
	/// Get the `x` coordinate
	pub fn get_x(&self) -> usize {
		self.0 .0
	}
	/// Get the `z` coordinate
	pub fn get_z(&self) -> usize {
		self.0 .1
	}
	/// Flat index of the cell in an array describing a square area of `side` cells
	pub fn flat_index(&self, side: usize) -> usize {
		self.get_x() * side + self.get_z()
	}
	/// Convert a flat index of a square area of `side` cells back into a [CellCoord]
	pub fn from_flat_index(index: usize, side: usize) -> Self {
		CellCoord::new(index / side, index % side)
	}
}

/// Obstacle layout and world-space mapping of the navigable area
#[derive(Clone, Debug)]
pub struct Grid {
	/// Number of cells along each side
	grid_size: usize,
	/// World units spanned by each cell
	cell_size: f32,
	/// Number of cells along each side of a cluster
	cluster_size: usize,
	/// A set bit marks the flat index of an obstacle cell
	obstacles: FixedBitSet,
	/// Centre of each cell in world space
	world_positions: Vec<Vec3>,
}

impl Grid {
	/// Create a new obstacle-free [Grid] from a validated [NavigationConfig]
	pub fn new(config: &NavigationConfig) -> Self {
		let grid_size = config.grid_size;
		let cell_size = config.cell_size;
		let half_extent = grid_size as f32 * cell_size * 0.5;
		let world_offset = Vec3::new(-half_extent, 0.0, -half_extent);
		let mut world_positions = Vec::with_capacity(grid_size * grid_size);
		for x in 0..grid_size {
			for z in 0..grid_size {
				world_positions.push(
					Vec3::new(
						x as f32 * cell_size + cell_size * 0.5,
						0.0,
						z as f32 * cell_size + cell_size * 0.5,
					) + world_offset,
				);
			}
		}
		Grid {
			grid_size,
			cell_size,
			cluster_size: config.cluster_size,
			obstacles: FixedBitSet::with_capacity(grid_size * grid_size),
			world_positions,
		}
	}
	/// Number of cells along each side
	pub fn get_grid_size(&self) -> usize {
		self.grid_size
	}
	/// World units spanned by each cell
	pub fn get_cell_size(&self) -> f32 {
		self.cell_size
	}
	/// Number of cells along each side of a cluster
	pub fn get_cluster_size(&self) -> usize {
		self.cluster_size
	}
	/// Whether `(x, z)` lies within the grid
	pub fn in_bounds(&self, x: usize, z: usize) -> bool {
		x < self.grid_size && z < self.grid_size
	}
	/// Flat index of a cell
	pub fn flat_index(&self, cell: CellCoord) -> usize {
		cell.flat_index(self.grid_size)
	}
	/// Toggle the obstacle bit of a cell, returns `true` if the state of the cell changed.
	///
	/// Cells outside of the grid are never changed
	pub fn set_obstacle(&mut self, x: usize, z: usize, is_obstacle: bool) -> bool {
		if !self.in_bounds(x, z) {
			warn!(
				"Cannot set obstacle at ({}, {}), outside of a grid of size {}",
				x, z, self.grid_size
			);
			return false;
		}
		let index = x * self.grid_size + z;
		if self.obstacles.contains(index) == is_obstacle {
			return false;
		}
		self.obstacles.set(index, is_obstacle);
		true
	}
	/// Whether the cell is an obstacle. Cells outside of the grid are treated as obstacles
	pub fn is_obstacle(&self, x: usize, z: usize) -> bool {
		if !self.in_bounds(x, z) {
			return true;
		}
		self.obstacles.contains(x * self.grid_size + z)
	}
	/// Number of obstacle cells
	pub fn obstacle_count(&self) -> usize {
		self.obstacles.count_ones(..)
	}
	/// World position of the centre of a cell, [None] if the cell is outside the grid
	pub fn world_position(&self, x: usize, z: usize) -> Option<Vec3> {
		if self.in_bounds(x, z) {
			Some(self.world_positions[x * self.grid_size + z])
		} else {
			None
		}
	}
	/// World position of the centre of a cell known to be inside the grid
	pub(crate) fn cell_world_position(&self, cell: CellCoord) -> Vec3 {
		self.world_positions[cell.flat_index(self.grid_size)]
	}
	/// Map a world position onto the cell containing it, [None] when it sits outside the grid
	pub fn coords_from_world_position(&self, position: Vec3) -> Option<CellCoord> {
		let half = self.grid_size as f32 * 0.5;
		let x = (position.x / self.cell_size + half).floor();
		let z = (position.z / self.cell_size + half).floor();
		let size = self.grid_size as f32;
		if x >= 0.0 && x < size && z >= 0.0 && z < size {
			Some(CellCoord::new(x as usize, z as usize))
		} else {
			None
		}
	}
	/// Map a world position onto the cluster containing it, [None] when it sits outside the grid
	pub fn cluster_from_world_position(&self, position: Vec3) -> Option<ClusterID> {
		self.coords_from_world_position(position)
			.map(|cell| self.cluster_of_cell(cell))
	}
	/// The cluster a cell belongs to
	pub fn cluster_of_cell(&self, cell: CellCoord) -> ClusterID {
		ClusterID::new(
			cell.get_x() / self.cluster_size,
			cell.get_z() / self.cluster_size,
		)
	}
	/// Read a headerless CSV of `0` (free) and `1` (obstacle) values into the grid, each record
	/// is a row of constant `z` and each column an `x` coordinate. Returns the number of cells
	/// whose state changed
	#[cfg(feature = "csv")]
	pub fn obstacles_from_csv(&mut self, path: &str) -> Result<usize, ConfigError> {
		let data = std::fs::File::open(path).map_err(|e| ConfigError::Io(e.to_string()))?;
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(false)
			.from_reader(data);
		let mut changed = 0;
		for (z, record) in rdr.records().enumerate() {
			let record = record.map_err(|e| ConfigError::Parse(e.to_string()))?;
			for (x, value) in record.iter().enumerate() {
				if !self.in_bounds(x, z) {
					return Err(ConfigError::Parse(format!(
						"cell ({}, {}) lies outside a grid of size {}",
						x, z, self.grid_size
					)));
				}
				let is_obstacle = match value.trim() {
					"0" => false,
					"1" => true,
					other => {
						return Err(ConfigError::Parse(format!(
							"expected `0` or `1` at ({}, {}), found `{}`",
							x, z, other
						)))
					}
				};
				if self.set_obstacle(x, z, is_obstacle) {
					changed += 1;
				}
			}
		}
		Ok(changed)
	}
}
