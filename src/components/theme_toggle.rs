//! Dark/light mode switch.

use leptos::prelude::*;

use super::particle_network::ThemeMode;
use super::particle_network::theme::apply_theme_mode;

/// Button flipping the page between dark and light mode.
///
/// Every change is written to local storage and reflected as the `dark`
/// class on the document element.
#[component]
pub fn ThemeToggle(mode: RwSignal<ThemeMode>) -> impl IntoView {
	Effect::new(move |_| apply_theme_mode(mode.get()));

	let label = move || match mode.get() {
		ThemeMode::Dark => "Light mode",
		ThemeMode::Light => "Dark mode",
	};

	view! {
		<button
			class="theme-toggle"
			aria-label="Toggle dark mode"
			on:click=move |_| mode.update(|m| *m = m.toggled())
		>
			{label}
		</button>
	}
}
