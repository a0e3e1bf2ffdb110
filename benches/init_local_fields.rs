//! Measure calculating the local field of every portal in every cluster
//!
//! World is 500x500 cells split into 50x50 clusters
//!

use std::collections::VecDeque;

use bevy_flowfield_clusters::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Calculate every local field of the graph
fn init(grid: &Grid, graph: &mut ClusterGraph, queue: &mut VecDeque<usize>) {
	graph.build_all_local_fields(grid, queue);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("data_initialisation");
	group.significance_level(0.05).sample_size(10);
	let grid = Grid::new(&NavigationConfig::new(500, 1.0, 10, 1.0));
	let mut graph = ClusterGraph::new(&grid);
	let mut queue = VecDeque::new();
	group.bench_function("init_local_fields", |b| {
		b.iter(|| init(black_box(&grid), black_box(&mut graph), &mut queue))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
