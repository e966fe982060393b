use std::time::Duration;

/// Tunables for the skills graph widget.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Canvas height in CSS pixels; width follows the parent container.
	pub height: f64,
	pub node_radius: f64,
	pub hover_scale: f64,
	pub drag_scale: f64,
	/// Distance from node center to the label baseline.
	pub label_offset: f64,
	/// Upward offset of the tooltip anchor from the pointer.
	pub tooltip_lift: f64,
	pub curve_ratio: f64,
	pub curve_max_offset: f64,
	pub edge_reveal_delay: Duration,
	/// Seconds an edge takes to draw in once revealed.
	pub edge_draw_secs: f64,
	/// Per-item delay of the node and edge entrance animations, in seconds.
	pub stagger_secs: f64,
	/// Pointer travel beyond which a release no longer counts as a click.
	pub click_slop: f64,
	pub grid_size: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			height: 700.0,
			node_radius: 25.0,
			hover_scale: 1.2,
			drag_scale: 1.1,
			label_offset: 45.0,
			tooltip_lift: 80.0,
			curve_ratio: 0.3,
			curve_max_offset: 50.0,
			edge_reveal_delay: Duration::from_millis(500),
			edge_draw_secs: 1.5,
			stagger_secs: 0.1,
			click_slop: 4.0,
			grid_size: 40.0,
		}
	}
}
