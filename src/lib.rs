//! This is a plugin for Bevy game engine to steer large crowds of agents towards moving targets
//! using hierarchical FlowFields
//!

pub mod flowfields;
pub mod plugin;

pub mod prelude;
