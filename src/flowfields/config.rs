//! Construction-time configuration of the navigation grid
//!

use std::fmt;

/// Describes the dimensions of the navigable world and how eagerly target fields are rebuilt
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(default)
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationConfig {
	/// Number of cells along each side of the square grid
	pub grid_size: usize,
	/// World units spanned by a single cell
	pub cell_size: f32,
	/// Number of cells along each side of a square cluster. `grid_size` must be an exact
	/// multiple of it
	pub cluster_size: usize,
	/// How far (as a multiple of `cell_size`) a target must move before its global field is
	/// rebuilt
	pub recalc_threshold: f32,
}

impl Default for NavigationConfig {
	fn default() -> Self {
		NavigationConfig {
			grid_size: 100,
			cell_size: 1.0,
			cluster_size: 10,
			recalc_threshold: 1.0,
		}
	}
}

impl NavigationConfig {
	/// Create a new instance of [NavigationConfig]
	pub fn new(grid_size: usize, cell_size: f32, cluster_size: usize, recalc_threshold: f32) -> Self {
		NavigationConfig {
			grid_size,
			cell_size,
			cluster_size,
			recalc_threshold,
		}
	}
	/// Number of clusters along each side of the grid
	pub fn clusters_per_side(&self) -> usize {
		self.grid_size / self.cluster_size
	}
	/// Squared world distance a target must exceed before its field is rebuilt
	pub fn recalc_distance_squared(&self) -> f32 {
		let distance = self.recalc_threshold * self.cell_size;
		distance * distance
	}
	/// Ensure the dimensions can be partitioned into clusters
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.grid_size == 0 {
			return Err(ConfigError::ZeroGridSize);
		}
		if self.cluster_size == 0 {
			return Err(ConfigError::ZeroClusterSize);
		}
		if self.grid_size % self.cluster_size != 0 {
			return Err(ConfigError::ClusterSizeMismatch {
				grid_size: self.grid_size,
				cluster_size: self.cluster_size,
			});
		}
		if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
			return Err(ConfigError::InvalidCellSize(self.cell_size));
		}
		if !self.recalc_threshold.is_finite() || self.recalc_threshold < 0.0 {
			return Err(ConfigError::InvalidThreshold(self.recalc_threshold));
		}
		Ok(())
	}
	/// From a `ron` file read a [NavigationConfig] and validate it
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| ConfigError::Io(e.to_string()))?;
		let config: NavigationConfig =
			ron::de::from_reader(file).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}
}

/// Reasons a [NavigationConfig] or an obstacle layout is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// A grid must have at least one cell
	ZeroGridSize,
	/// A cluster must have at least one cell
	ZeroClusterSize,
	/// The grid cannot be split into whole clusters
	ClusterSizeMismatch {
		/// Cells per grid side
		grid_size: usize,
		/// Cells per cluster side
		cluster_size: usize,
	},
	/// Cell size must be a positive finite number
	InvalidCellSize(f32),
	/// Recalculation threshold must be zero or a positive finite number
	InvalidThreshold(f32),
	/// A file could not be read
	Io(String),
	/// A file could not be parsed
	Parse(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::ZeroGridSize => write!(f, "grid size must be greater than zero"),
			ConfigError::ZeroClusterSize => write!(f, "cluster size must be greater than zero"),
			ConfigError::ClusterSizeMismatch {
				grid_size,
				cluster_size,
			} => write!(
				f,
				"grid size `{}` cannot support clusters, it must be an exact multiple of {}",
				grid_size, cluster_size
			),
			ConfigError::InvalidCellSize(size) => {
				write!(f, "cell size `{}` must be positive and finite", size)
			}
			ConfigError::InvalidThreshold(threshold) => write!(
				f,
				"recalculation threshold `{}` must be non-negative and finite",
				threshold
			),
			ConfigError::Io(e) => write!(f, "failed reading navigation data: {}", e),
			ConfigError::Parse(e) => write!(f, "failed parsing navigation data: {}", e),
		}
	}
}

impl std::error::Error for ConfigError {}
