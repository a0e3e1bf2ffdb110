//! A [FlowField] is a pair of dense arrays describing a square area of cells. The cost array
//! holds the accumulated cost of reaching the nearest source from each cell and the direction
//! array holds the flat index of the neighbour an actor should step into to get closer to it.
//!
//! A field is calculated as an expanding wavefront from one or more source cells which are given
//! a cost of `0`. Each step to an orthogonal neighbour adds [STRAIGHT_COST] and each step to a
//! diagonal neighbour adds [DIAGONAL_COST]:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  24 |  14 |  10 |  14 |  24 |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  28 |  10 |  0  |  10 |  28 |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  24 |  14 |  10 |  14 |  24 |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! A cell is costed the first time the wavefront reaches it and is never revisited, even if a
//! cheaper route through a different neighbour is discovered later (the `28`s above are reached
//! diagonally before the straight route of `20` is explored). This bounds the work to one
//! visit per reachable cell at the price of occasionally slightly sub-optimal directions.
//!
//! Every cell costed by a calculation is recorded so that the next calculation only has to
//! reset those cells rather than the whole field.

use std::collections::VecDeque;

use crate::prelude::*;

/// Costs and best-neighbour directions for a square area of `side` cells
#[derive(Clone, Debug)]
pub struct FlowField {
	/// Number of cells along each side of the field
	side: usize,
	/// Cost of reaching the nearest source, [MAX_COST] when unreached
	costs: Vec<u16>,
	/// Flat index of the best neighbour, a cell pointing at itself is a source or unreached
	best_directions: Vec<usize>,
	/// Flat indices of every cell costed since the last reset
	dirty_cells: Vec<usize>,
}

impl FlowField {
	/// Create a new [FlowField] where every cell is unreached
	pub fn new(side: usize) -> Self {
		let area = side * side;
		FlowField {
			side,
			costs: vec![MAX_COST; area],
			best_directions: (0..area).collect(),
			dirty_cells: Vec::new(),
		}
	}
	/// Number of cells along each side of the field
	pub fn get_side(&self) -> usize {
		self.side
	}
	/// Get a reference to the cost array
	pub fn get_costs(&self) -> &[u16] {
		&self.costs
	}
	/// Get a reference to the best-direction array
	pub fn get_best_directions(&self) -> &[usize] {
		&self.best_directions
	}
	/// Flat indices of the cells costed by the last calculation
	pub fn get_dirty_cells(&self) -> &[usize] {
		&self.dirty_cells
	}
	/// Cost of a cell, [MAX_COST] if it is unreached or outside the field
	pub fn get_cost(&self, cell: CellCoord) -> u16 {
		if cell.get_x() >= self.side || cell.get_z() >= self.side {
			return MAX_COST;
		}
		self.costs[cell.flat_index(self.side)]
	}
	/// Whether the calculation reached a cell
	pub fn is_reachable(&self, cell: CellCoord) -> bool {
		self.get_cost(cell) != MAX_COST
	}
	/// The neighbour an actor in `cell` should step into, [None] when the cell is a source, is
	/// unreached or lies outside the field
	pub fn next_step(&self, cell: CellCoord) -> Option<CellCoord> {
		if !self.is_reachable(cell) {
			return None;
		}
		let index = cell.flat_index(self.side);
		let direction = self.best_directions[index];
		if direction == index {
			None
		} else {
			Some(CellCoord::from_flat_index(direction, self.side))
		}
	}
	/// Reset only the cells touched by the last calculation
	pub fn reset(&mut self) {
		for &index in self.dirty_cells.iter() {
			self.costs[index] = MAX_COST;
			self.best_directions[index] = index;
		}
		self.dirty_cells.clear();
	}
	/// Calculate the field from a series of `sources`. `is_obstacle` is queried with the local
	/// `(x, z)` of a cell within the field and `queue` is working storage which can be reused
	/// across calculations.
	///
	/// Sources outside of the field are ignored. Obstacle cells are never costed unless they
	/// are themselves a source
	pub fn calculate<F>(&mut self, sources: &[CellCoord], is_obstacle: F, queue: &mut VecDeque<usize>)
	where
		F: Fn(usize, usize) -> bool,
	{
		self.reset();
		queue.clear();
		for source in sources.iter() {
			if source.get_x() >= self.side || source.get_z() >= self.side {
				continue;
			}
			let index = source.flat_index(self.side);
			if self.costs[index] == 0 {
				continue;
			}
			self.costs[index] = 0;
			self.best_directions[index] = index;
			self.dirty_cells.push(index);
			queue.push_back(index);
		}
		while let Some(current) = queue.pop_front() {
			let (x, z) = CellCoord::from_flat_index(current, self.side).get();
			let current_cost = self.costs[current];
			for ordinal in Ordinal::ALL {
				let Some((nx, nz)) = ordinal.step_within(x, z, self.side) else {
					continue;
				};
				let neighbour = nx * self.side + nz;
				if self.costs[neighbour] != MAX_COST {
					continue;
				}
				if is_obstacle(nx, nz) {
					continue;
				}
				// keep the sentinel reserved for unreached cells on very long routes
				let cost = current_cost
					.saturating_add(ordinal.step_cost())
					.min(MAX_COST - 1);
				self.costs[neighbour] = cost;
				self.best_directions[neighbour] = current;
				self.dirty_cells.push(neighbour);
				queue.push_back(neighbour);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	/// No obstacles anywhere
	fn open(_x: usize, _z: usize) -> bool {
		false
	}
	#[test]
	fn new_field_is_unreached() {
		let field = FlowField::new(4);
		for index in 0..16 {
			assert_eq!(MAX_COST, field.get_costs()[index]);
			assert_eq!(index, field.get_best_directions()[index]);
		}
		assert!(field.get_dirty_cells().is_empty());
	}
	#[test]
	fn single_source_costs() {
		let mut field = FlowField::new(5);
		field.calculate(&[CellCoord::new(2, 2)], open, &mut VecDeque::new());
		assert_eq!(0, field.get_cost(CellCoord::new(2, 2)));
		assert_eq!(10, field.get_cost(CellCoord::new(2, 3)));
		assert_eq!(14, field.get_cost(CellCoord::new(3, 3)));
		// reached diagonally from (1, 1) before (1, 2) is expanded
		assert_eq!(28, field.get_cost(CellCoord::new(0, 2)));
		assert_eq!(28, field.get_cost(CellCoord::new(0, 0)));
	}
	#[test]
	fn source_is_terminal() {
		let mut field = FlowField::new(5);
		let source = CellCoord::new(1, 3);
		field.calculate(&[source], open, &mut VecDeque::new());
		assert_eq!(None, field.next_step(source));
		for index in 0..25 {
			let cell = CellCoord::from_flat_index(index, 5);
			if cell != source {
				assert!(field.next_step(cell).is_some());
			}
		}
	}
	#[test]
	fn directions_point_at_cheaper_neighbour() {
		let mut field = FlowField::new(6);
		field.calculate(&[CellCoord::new(0, 0)], open, &mut VecDeque::new());
		for index in 0..36 {
			let cell = CellCoord::from_flat_index(index, 6);
			if let Some(next) = field.next_step(cell) {
				assert!(field.get_cost(next) < field.get_cost(cell));
				let dx = next.get_x() as i32 - cell.get_x() as i32;
				let dz = next.get_z() as i32 - cell.get_z() as i32;
				assert!(dx.abs() <= 1 && dz.abs() <= 1);
			}
		}
	}
	#[test]
	fn obstacles_are_not_costed() {
		let mut field = FlowField::new(5);
		// wall along x == 2 with no gap
		let wall = |x: usize, _z: usize| x == 2;
		field.calculate(&[CellCoord::new(0, 0)], wall, &mut VecDeque::new());
		for z in 0..5 {
			assert_eq!(MAX_COST, field.get_cost(CellCoord::new(2, z)));
			assert_eq!(MAX_COST, field.get_cost(CellCoord::new(4, z)));
			assert!(field.is_reachable(CellCoord::new(1, z)));
		}
	}
	#[test]
	fn dirty_cells_match_costed_cells() {
		let mut field = FlowField::new(8);
		let blocked = |x: usize, z: usize| x == 3 && z < 7;
		field.calculate(&[CellCoord::new(1, 1)], blocked, &mut VecDeque::new());
		let dirty: HashSet<usize> = field.get_dirty_cells().iter().copied().collect();
		assert_eq!(dirty.len(), field.get_dirty_cells().len());
		let costed: HashSet<usize> = field
			.get_costs()
			.iter()
			.enumerate()
			.filter(|(_, c)| **c != MAX_COST)
			.map(|(i, _)| i)
			.collect();
		assert_eq!(costed, dirty);
	}
	#[test]
	fn reset_clears_only_dirty_cells() {
		let mut field = FlowField::new(6);
		let mut queue = VecDeque::new();
		field.calculate(&[CellCoord::new(5, 5)], open, &mut queue);
		field.reset();
		assert!(field.get_costs().iter().all(|c| *c == MAX_COST));
		assert!(field.get_best_directions().iter().enumerate().all(|(i, d)| i == *d));
		assert!(field.get_dirty_cells().is_empty());
	}
	#[test]
	fn recalculate_moves_source() {
		let mut field = FlowField::new(6);
		let mut queue = VecDeque::new();
		field.calculate(&[CellCoord::new(0, 0)], open, &mut queue);
		field.calculate(&[CellCoord::new(5, 5)], open, &mut queue);
		assert_eq!(0, field.get_cost(CellCoord::new(5, 5)));
		assert_eq!(14 * 5, field.get_cost(CellCoord::new(0, 0)));
		assert_eq!(36, field.get_dirty_cells().len());
	}
	#[test]
	fn multiple_sources() {
		let mut field = FlowField::new(4);
		let sources = [CellCoord::new(0, 3), CellCoord::new(1, 3), CellCoord::new(1, 3)];
		field.calculate(&sources, open, &mut VecDeque::new());
		assert_eq!(0, field.get_cost(CellCoord::new(0, 3)));
		assert_eq!(0, field.get_cost(CellCoord::new(1, 3)));
		assert_eq!(10, field.get_cost(CellCoord::new(1, 2)));
		assert_eq!(16, field.get_dirty_cells().len());
	}
	#[test]
	fn out_of_bounds_source_ignored() {
		let mut field = FlowField::new(4);
		field.calculate(&[CellCoord::new(4, 0)], open, &mut VecDeque::new());
		assert!(field.get_dirty_cells().is_empty());
		assert_eq!(MAX_COST, field.get_cost(CellCoord::new(9, 9)));
	}
}
