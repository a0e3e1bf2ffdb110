//! `use bevy_flowfield_clusters::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	clusters::{cluster_graph::*, *},
	config::*,
	fields::{flow_field::*, *},
	grid::*,
	grid_manager::*,
	portal::{path_finder::*, portals::*},
	utilities::*,
};

#[doc(hidden)]
pub use crate::plugin::{cost_layer::*, flow_layer::*, *};
