//! particle-network: decorative 3D particle-network background for a portfolio page.
//!
//! This crate provides a WASM canvas component that renders a rotating field
//! of linked particles drifting toward the pointer, plus the small amount of
//! page glue needed to mount it with a persisted dark/light theme.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_network::{
	NetworkConfig, NetworkState, Particle, ParticleNetworkCanvas, ThemeMode, build_links,
	generate_field, integrate,
};
pub use components::theme_toggle::ThemeToggle;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-network: logging initialized");
}

/// Load config overrides from a script element with id="network-config".
/// Expected format: a JSON object with any subset of `NetworkConfig` fields.
fn load_network_config() -> Option<NetworkConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("network-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match NetworkConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"particle-network: loaded config ({} particles, link distance {})",
				config.count, config.link_distance
			);
			Some(config)
		}
		Err(e) => {
			warn!("particle-network: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads config from the DOM and renders the network behind a hero overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_network_config().unwrap_or_default();
	let mode = RwSignal::new(components::particle_network::theme::load_theme_mode());
	let data_theme = move || mode.get().as_str();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=data_theme />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section class="network-hero">
			<ParticleNetworkCanvas theme=mode config=config />
			<div class="network-overlay">
				<ThemeToggle mode=mode />
			</div>
		</section>
	}
}
