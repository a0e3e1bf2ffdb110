//! Measure calculating the global field of a target when a third of the world is blocked
//!
//! World is 500x500 cells with obstacles scattered from a fixed seed
//!

use std::collections::VecDeque;

use bevy_flowfield_clusters::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Scatter obstacles across the grid, leaving the target cell free
fn prepare_grid(grid_size: usize) -> Grid {
	let mut grid = Grid::new(&NavigationConfig::new(grid_size, 1.0, 10, 1.0));
	let mut rng = StdRng::seed_from_u64(7);
	let centre = grid_size / 2;
	for x in 0..grid_size {
		for z in 0..grid_size {
			if (x, z) != (centre, centre) && rng.random_bool(0.3) {
				grid.set_obstacle(x, z, true);
			}
		}
	}
	grid
}

/// Expand a field from the centre of the grid around the obstacles
fn calc(grid: &Grid, field: &mut FlowField, queue: &mut VecDeque<usize>) {
	let centre = grid.get_grid_size() / 2;
	field.calculate(
		&[CellCoord::new(centre, centre)],
		|x, z| grid.is_obstacle(x, z),
		queue,
	);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let grid = prepare_grid(500);
	let mut field = FlowField::new(grid.get_grid_size());
	let mut queue = VecDeque::new();
	group.bench_function("calc_flow_maze", |b| {
		b.iter(|| calc(black_box(&grid), black_box(&mut field), &mut queue))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
