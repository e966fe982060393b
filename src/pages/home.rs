use leptos::prelude::*;

use crate::components::skills_graph::{GraphConfig, SkillsGraph};
use crate::dataset;

/// Portfolio page hosting the interactive skills graph.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section id="skills" class="skills-section">
				<h2>"Skills & Projects"</h2>
				<p class="subtitle">
					"Drag nodes to rearrange. Hover for a summary, click for project details."
				</p>
				{dataset::portfolio()
					.map(|data| view! { <SkillsGraph dataset=data config=GraphConfig::default() /> })}
			</section>
		</ErrorBoundary>
	}
}
