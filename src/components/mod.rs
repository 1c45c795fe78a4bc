//! UI components.

pub mod particle_network;
pub mod theme_toggle;
