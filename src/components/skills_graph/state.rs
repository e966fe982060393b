use std::rc::Rc;

use log::{debug, warn};

use super::config::GraphConfig;
use super::geometry::{ContainerRect, EdgeCurve};
use super::types::{GraphDataset, GraphEdge, Point, SkillNode};

#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	pub node_id: String,
	origin: Option<Point>,
	travel: f64,
	/// Identifier of the touch point that owns the gesture.
	touch: Option<i32>,
}

/// Summary of a finished drag gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct DragRelease {
	pub node_id: String,
	pub travel: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub node_id: String,
	/// Container-local anchor, already lifted above the pointer.
	pub anchor: Point,
}

pub struct SkillsGraphState {
	layout: Rc<GraphDataset>,
	pub config: GraphConfig,
	pub nodes: Vec<SkillNode>,
	drag: Option<DragState>,
	tooltip: Option<Tooltip>,
	selected: Option<String>,
	suppress_click: bool,
	pub edges_visible: bool,
	/// Seconds since mount, drives the node entrance animation.
	pub intro_t: f64,
	/// Seconds since the edges were revealed.
	pub reveal_t: f64,
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl SkillsGraphState {
	/// Builds a live copy of `layout`; the layout itself is never mutated.
	pub fn new(layout: Rc<GraphDataset>, config: GraphConfig) -> Self {
		let nodes = layout.nodes.clone();
		let height = config.height;
		Self {
			layout,
			config,
			nodes,
			drag: None,
			tooltip: None,
			selected: None,
			suppress_click: false,
			edges_visible: false,
			intro_t: 0.0,
			reveal_t: 0.0,
			width: 0.0,
			height,
			pixel_ratio: 1.0,
		}
	}

	pub fn node(&self, id: &str) -> Option<&SkillNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	fn node_mut(&mut self, id: &str) -> Option<&mut SkillNode> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.layout.edges
	}

	pub fn dragging(&self) -> Option<&str> {
		self.drag.as_ref().map(|d| d.node_id.as_str())
	}

	pub fn is_dragging(&self, id: &str) -> bool {
		self.dragging() == Some(id)
	}

	pub fn tooltip(&self) -> Option<&Tooltip> {
		self.tooltip.as_ref()
	}

	pub fn selected(&self) -> Option<&SkillNode> {
		self.selected.as_deref().and_then(|id| self.node(id))
	}

	/// Starts dragging `id`. Ignored while another drag is active.
	pub fn begin_drag(&mut self, id: &str, pointer: Option<Point>) -> bool {
		if let Some(active) = &self.drag {
			debug!("ignoring drag of {id}: {} is already being dragged", active.node_id);
			return false;
		}
		if self.node(id).is_none() {
			warn!("cannot drag unknown node {id}");
			return false;
		}
		debug!("drag start: {id}");
		self.suppress_click = false;
		self.drag = Some(DragState {
			node_id: id.to_string(),
			origin: pointer,
			travel: 0.0,
			touch: None,
		});
		true
	}

	/// Like `begin_drag`, but only a release of `touch_id` ends the gesture.
	pub fn begin_touch_drag(&mut self, id: &str, pointer: Option<Point>, touch_id: i32) -> bool {
		if !self.begin_drag(id, pointer) {
			return false;
		}
		if let Some(drag) = self.drag.as_mut() {
			drag.touch = Some(touch_id);
		}
		true
	}

	pub fn touch_id(&self) -> Option<i32> {
		self.drag.as_ref().and_then(|d| d.touch)
	}

	/// Moves the dragged node under the pointer. No clamping is applied.
	pub fn update_drag(&mut self, page: Point, container: Option<ContainerRect>) -> bool {
		let Some(rect) = container else {
			return false;
		};
		let Some(drag) = self.drag.as_mut() else {
			return false;
		};
		let local = rect.to_local(page);
		if let Some(origin) = drag.origin {
			drag.travel = drag.travel.max(origin.distance(local));
		} else {
			drag.origin = Some(local);
		}
		let id = drag.node_id.clone();
		match self.node_mut(&id) {
			Some(node) => {
				node.position = local;
				true
			}
			None => false,
		}
	}

	pub fn end_drag(&mut self) -> Option<DragRelease> {
		let drag = self.drag.take()?;
		self.suppress_click = drag.travel > self.config.click_slop;
		debug!("drag end: {} (travel {:.1}px)", drag.node_id, drag.travel);
		Some(DragRelease {
			node_id: drag.node_id,
			travel: drag.travel,
		})
	}

	/// Ends a touch drag if its own touch point is among `lifted`.
	pub fn end_touch_drag(&mut self, lifted: &[i32]) -> Option<DragRelease> {
		let touch = self.touch_id()?;
		if !lifted.contains(&touch) {
			return None;
		}
		self.end_drag()
	}

	pub fn hover(&mut self, id: &str, page: Point, container: Option<ContainerRect>) {
		let Some(rect) = container else {
			return;
		};
		if self.node(id).is_none() {
			return;
		}
		let local = rect.to_local(page);
		self.tooltip = Some(Tooltip {
			node_id: id.to_string(),
			anchor: Point::new(local.x, local.y - self.config.tooltip_lift),
		});
	}

	pub fn unhover(&mut self) {
		self.tooltip = None;
	}

	pub fn select_node(&mut self, id: &str) -> bool {
		if self.node(id).is_none() {
			return false;
		}
		self.selected = Some(id.to_string());
		true
	}

	/// Click handler entry point: swallows the click that follows a real drag.
	pub fn click_node(&mut self, id: &str) -> bool {
		if std::mem::take(&mut self.suppress_click) {
			return false;
		}
		self.select_node(id)
	}

	pub fn close_detail(&mut self) {
		self.selected = None;
	}

	/// Restores the original layout and clears all transient interaction state.
	pub fn reset(&mut self) {
		for (node, original) in self.nodes.iter_mut().zip(&self.layout.nodes) {
			node.position = original.position;
		}
		self.drag = None;
		self.tooltip = None;
		self.selected = None;
		self.suppress_click = false;
		debug!("graph reset to original layout");
	}

	pub fn reveal_edges(&mut self) {
		self.edges_visible = true;
	}

	/// Curves for every edge whose endpoints resolve, at current positions.
	pub fn edge_curves(&self) -> impl Iterator<Item = (usize, EdgeCurve)> + '_ {
		self.layout
			.edges
			.iter()
			.enumerate()
			.filter_map(move |(i, edge)| {
				let from = self.node(&edge.from)?;
				let to = self.node(&edge.to)?;
				Some((
					i,
					EdgeCurve::between(
						from.position,
						to.position,
						self.config.curve_ratio,
						self.config.curve_max_offset,
					),
				))
			})
	}

	/// Top-most node under a container-local point.
	pub fn node_at(&self, local: Point) -> Option<&SkillNode> {
		if let Some(dragged) = self.dragging().and_then(|id| self.node(id)) {
			if dragged.position.distance(local) <= self.node_radius(dragged) {
				return Some(dragged);
			}
		}
		self.nodes
			.iter()
			.rev()
			.find(|n| n.position.distance(local) <= self.node_radius(n))
	}

	/// Rendered radius including the drag/hover enlargement.
	pub fn node_radius(&self, node: &SkillNode) -> f64 {
		let scale = if self.is_dragging(&node.id) {
			self.config.drag_scale
		} else if self.tooltip.as_ref().is_some_and(|t| t.node_id == node.id) {
			self.config.hover_scale
		} else {
			1.0
		};
		self.config.node_radius * scale
	}

	pub fn tick(&mut self, dt: f64) {
		self.intro_t += dt;
		if self.edges_visible {
			self.reveal_t += dt;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
		self.width = width;
		self.height = height;
		self.pixel_ratio = pixel_ratio;
	}
}
