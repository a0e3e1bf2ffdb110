//! Measure finding a cluster route from one corner of the world to the opposite corner
//!
//! World is 1000x1000 cells split into 100x100 clusters
//!

use std::collections::VecDeque;

use bevy_flowfield_clusters::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Create the grid and cluster graph before benchmarking
fn prepare_graph(grid_size: usize, cluster_size: usize) -> ClusterGraph {
	let config = NavigationConfig::new(grid_size, 1.0, cluster_size, 1.0);
	let grid = Grid::new(&config);
	ClusterGraph::new(&grid)
}

/// Route an actor in the bottom right cluster to the top left cluster
fn calc(finder: &mut PathFinder, graph: &ClusterGraph, output: &mut VecDeque<ClusterID>) {
	let source = ClusterID::new(99, 0);
	let target = ClusterID::new(0, 99);
	finder.find_cluster_path(graph, source, target, output);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let graph = prepare_graph(1000, 10);
	let mut finder = PathFinder::new(&graph);
	let mut output = VecDeque::new();
	group.bench_function("calc_route", |b| {
		b.iter(|| calc(black_box(&mut finder), black_box(&graph), &mut output))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
