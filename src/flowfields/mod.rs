//! Flowfields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [SupCom2- Elijah Emerson](https://www.gameaipro.com/GameAIPro/GameAIPro_Chapter23_Crowd_Pathfinding_and_Steering_Using_Flow_Field_Tiles.pdf)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! A square grid of cells is divided into a series of square Clusters with Portals marking the
//! traversable crossings from one Cluster to a neighbour. Navigation happens on two levels:
//!
//! * A* over the Clusters finds which Clusters an agent has to cross to reach the Cluster of its
//! target
//! * within a Cluster the agent follows a precalculated local field leading towards the Portal into
//! the next Cluster, and once it shares a Cluster with its target it follows a global field
//! calculated for that target
//!
//! Clusters are indexed from the `(-x, -z)` corner of the grid:
//!
//! ```text
//!  z
//!  ^  _______________________
//!  | |           |           |
//!  | |   (0,1)   |   (1,1)   |
//!  | |___________|___________|
//!  | |           |           |
//!  | |   (0,0)   |   (1,0)   |
//!  | |___________|___________|
//!  +-------------------------> x
//! ```
//!
//! Definitions:
//!
//! * Cell - a single square of the grid, either free or an obstacle
//! * Cluster - a `cluster_size x cluster_size` area of cells
//! * Portal - every pair of touching free cells across the boundary of two adjacent Clusters
//! * Flow field - a cost per cell of reaching one or more source cells along with the neighbour each
//! cell should step into to get there. Steps cost `10` orthogonally and `14` diagonally
//!

pub mod clusters;
pub mod config;
pub mod fields;
pub mod grid;
pub mod grid_manager;
pub mod portal;
pub mod utilities;
