//! Decorative 3D particle-network background.
//!
//! Renders a slowly rotating cloud of particles on an HTML canvas with:
//! - A center-biased spherical field tinted along a color gradient
//! - Pointer attraction while the pointer hovers the canvas
//! - Damped motion contained by an elastic boundary sphere
//! - Links drawn between nearby particles, rebuilt every frame
//!
//! The simulation types ([`NetworkState`], [`generate_field`], [`integrate`],
//! [`build_links`]) have no browser dependency and can be driven directly.
//!
//! # Example
//!
//! ```ignore
//! use particle_network::{NetworkConfig, ParticleNetworkCanvas, ThemeMode};
//!
//! let (theme, _) = signal(ThemeMode::Dark);
//! let config = NetworkConfig { count: 200, ..NetworkConfig::default() };
//!
//! view! {
//!     <div style="height: 600px">
//!         <ParticleNetworkCanvas theme=theme config=config />
//!     </div>
//! }
//! ```

pub mod camera;
mod component;
pub mod config;
pub mod field;
pub mod geometry;
pub mod integrator;
pub mod linker;
mod render;
pub mod state;
pub mod theme;

pub use component::ParticleNetworkCanvas;
pub use config::{CameraConfig, MotionConfig, NetworkConfig};
pub use field::{Particle, generate_field};
pub use integrator::{MotionParams, REFERENCE_FRAME, integrate};
pub use linker::{LinkParams, build_links};
pub use state::{NetworkState, PointerState};
pub use theme::{GradientPalette, Theme, ThemeMode};
