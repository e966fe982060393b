use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList, Window,
};

use super::config::GraphConfig;
use super::geometry::ContainerRect;
use super::render;
use super::state::SkillsGraphState;
use super::subscription::Subscription;
use super::types::{Category, GraphDataset, Point, SkillNode};

type SharedState = Rc<RefCell<SkillsGraphState>>;
type DragSlot = Rc<RefCell<Option<Subscription>>>;

#[derive(Clone, Debug, PartialEq)]
struct TooltipView {
	title: String,
	summary: String,
	x: f64,
	y: f64,
}

/// Signals mirroring the parts of the graph state drawn as HTML.
#[derive(Clone, Copy)]
struct Overlay {
	tooltip: RwSignal<Option<TooltipView>>,
	selected: RwSignal<Option<SkillNode>>,
	cursor: RwSignal<&'static str>,
}

impl Overlay {
	fn new() -> Self {
		Self {
			tooltip: RwSignal::new(None),
			selected: RwSignal::new(None),
			cursor: RwSignal::new("default"),
		}
	}

	fn sync(&self, s: &SkillsGraphState) {
		let tooltip = s.tooltip().and_then(|t| {
			s.node(&t.node_id).map(|node| TooltipView {
				title: node.detail.title.clone(),
				summary: node.detail.summary.clone(),
				x: t.anchor.x,
				y: t.anchor.y,
			})
		});
		if self.tooltip.get_untracked() != tooltip {
			self.tooltip.set(tooltip);
		}
		let selected = s.selected().cloned();
		if self.selected.get_untracked() != selected {
			self.selected.set(selected);
		}
		let cursor = if s.dragging().is_some() {
			"grabbing"
		} else if s.tooltip().is_some() {
			"grab"
		} else {
			"default"
		};
		if self.cursor.get_untracked() != cursor {
			self.cursor.set(cursor);
		}
	}
}

fn container_rect(canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<ContainerRect> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	ContainerRect::measured(rect.left(), rect.top(), rect.width(), rect.height())
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	match canvas.get_context("2d") {
		Ok(Some(ctx)) => ctx.dyn_into().ok(),
		Ok(None) => None,
		Err(err) => {
			warn!("2d context unavailable: {err:?}");
			None
		}
	}
}

/// Sizes the backing store to the parent width and the configured height.
fn fit_canvas(canvas: &HtmlCanvasElement, window: &Window, state: &mut SkillsGraphState) {
	let width = canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(800.0);
	let height = state.config.height;
	let dpr = window.device_pixel_ratio().max(1.0);
	canvas.set_width((width * dpr) as u32);
	canvas.set_height((height * dpr) as u32);
	state.resize(width, height, dpr);
}

fn page_point(ev: &MouseEvent) -> Point {
	Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

fn touch_ids(list: &TouchList) -> Vec<i32> {
	(0..list.length())
		.filter_map(|i| list.get(i))
		.map(|t| t.identifier())
		.collect()
}

fn touch_point(list: &TouchList, touch_id: i32) -> Option<Point> {
	(0..list.length())
		.filter_map(|i| list.get(i))
		.find(|t| t.identifier() == touch_id)
		.map(|t| Point::new(t.client_x() as f64, t.client_y() as f64))
}

/// Hit-tests the press and starts a drag on the node under it.
fn press(
	state: &SharedState,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	page: Point,
	touch_id: Option<i32>,
) -> bool {
	let Some(rect) = container_rect(canvas_ref) else {
		return false;
	};
	let local = rect.to_local(page);
	let mut s = state.borrow_mut();
	let Some(id) = s.node_at(local).map(|n| n.id.clone()) else {
		return false;
	};
	match touch_id {
		Some(touch_id) => s.begin_touch_drag(&id, Some(local), touch_id),
		None => s.begin_drag(&id, Some(local)),
	}
}

/// Ends the active drag and drops its subscription. For touch gestures only
/// a release of the gesture's own touch point counts.
fn release(
	state: &SharedState,
	slot: &DragSlot,
	overlay: Overlay,
	lifted: Option<&[i32]>,
	tap_selects: bool,
) {
	{
		let mut s = state.borrow_mut();
		let released = match lifted {
			Some(ids) => s.end_touch_drag(ids),
			None => s.end_drag(),
		};
		let Some(released) = released else {
			return;
		};
		if tap_selects && released.travel <= s.config.click_slop {
			s.select_node(&released.node_id);
		}
		overlay.sync(&s);
	}
	let subscription = slot.borrow_mut().take();
	drop(subscription);
}

fn track(
	state: &SharedState,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	overlay: Overlay,
	page: Option<Point>,
) {
	let Some(page) = page else {
		return;
	};
	let mut s = state.borrow_mut();
	s.update_drag(page, container_rect(canvas_ref));
	overlay.sync(&s);
}

fn mouse_subscription(
	state: &SharedState,
	slot: &DragSlot,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	overlay: Overlay,
) -> Option<Subscription> {
	let document = web_sys::window()?.document()?;
	let (state_move, state_up, slot_up) = (state.clone(), state.clone(), slot.clone());
	Some(
		Subscription::new(document.into())
			.listen("mousemove", move |ev: Event| {
				let page = ev.dyn_ref::<MouseEvent>().map(page_point);
				track(&state_move, canvas_ref, overlay, page);
			})
			.listen("mouseup", move |_| release(&state_up, &slot_up, overlay, None, false)),
	)
}

fn touch_subscription(
	state: &SharedState,
	slot: &DragSlot,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	overlay: Overlay,
	touch_id: i32,
) -> Option<Subscription> {
	let document = web_sys::window()?.document()?;
	let (state_move, state_end, state_cancel) = (state.clone(), state.clone(), state.clone());
	let (slot_end, slot_cancel) = (slot.clone(), slot.clone());
	let lifted = |ev: &Event| {
		ev.dyn_ref::<TouchEvent>()
			.map(|t| touch_ids(&t.changed_touches()))
			.unwrap_or_default()
	};
	Some(
		Subscription::new(document.into())
			.listen("touchmove", move |ev: Event| {
				let page = ev
					.dyn_ref::<TouchEvent>()
					.and_then(|t| touch_point(&t.touches(), touch_id));
				track(&state_move, canvas_ref, overlay, page);
			})
			.listen("touchend", move |ev: Event| {
				release(&state_end, &slot_end, overlay, Some(&lifted(&ev)), true)
			})
			.listen("touchcancel", move |ev: Event| {
				release(&state_cancel, &slot_cancel, overlay, Some(&lifted(&ev)), false)
			}),
	)
}

/// Canvas `touchstart` registered as non-passive, so a press on a node can
/// stop the page from scrolling while a press on empty canvas still scrolls.
fn touch_start(
	canvas: &HtmlCanvasElement,
	state: &SharedState,
	slot: &DragSlot,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	overlay: Overlay,
) -> Subscription {
	let (state, slot) = (state.clone(), slot.clone());
	Subscription::new(canvas.clone().into()).listen_active("touchstart", move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<TouchEvent>() else {
			return;
		};
		let Some(touch) = ev.changed_touches().get(0) else {
			return;
		};
		let page = Point::new(touch.client_x() as f64, touch.client_y() as f64);
		if !press(&state, canvas_ref, page, Some(touch.identifier())) {
			return;
		}
		ev.prevent_default();
		*slot.borrow_mut() =
			touch_subscription(&state, &slot, canvas_ref, overlay, touch.identifier());
		overlay.sync(&state.borrow());
	})
}

/// Browser resources owned by one mounted graph, released on unmount.
struct Mount {
	frame: Cell<Option<i32>>,
	animate: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	listeners: RefCell<Vec<Subscription>>,
	drag: DragSlot,
}

impl Mount {
	fn new(drag: DragSlot) -> Self {
		Self {
			frame: Cell::new(None),
			animate: RefCell::new(None),
			listeners: RefCell::new(Vec::new()),
			drag,
		}
	}

	fn request_frame(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(cb) = self.animate.borrow().as_ref() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(handle) => self.frame.set(Some(handle)),
				Err(err) => warn!("animation frame request failed: {err:?}"),
			}
		}
	}

	fn teardown(&self) {
		if let (Some(handle), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		let animate = self.animate.borrow_mut().take();
		let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
		let drag = self.drag.borrow_mut().take();
		drop((animate, listeners, drag));
	}
}

impl Drop for Mount {
	fn drop(&mut self) {
		self.teardown();
	}
}

/// Interactive skills graph: draggable nodes, curved edges, hover tooltips
/// and a project detail panel.
#[component]
pub fn SkillsGraph(
	dataset: GraphDataset,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let height = config.height;
	let reveal_delay = config.edge_reveal_delay;
	let state: SharedState = Rc::new(RefCell::new(SkillsGraphState::new(
		Rc::new(dataset),
		config,
	)));
	let drag: DragSlot = Rc::new(RefCell::new(None));
	let mount = Rc::new(Mount::new(drag.clone()));
	let overlay = Overlay::new();
	// Reactive children and cleanups must be Send, so they reach the Rc state
	// through local arena handles.
	let graph = StoredValue::new_local(state.clone());
	let mounted = StoredValue::new_local(mount.clone());
	on_cleanup(move || {
		mounted.try_with_value(|m| m.teardown());
	});

	let (state_init, drag_init, mount_init) = (state.clone(), drag.clone(), mount);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			return;
		};
		mount_init.teardown();
		{
			let mut s = state_init.borrow_mut();
			fit_canvas(&canvas, &window, &mut s);
			info!(
				"skills graph mounted: {} nodes, {} edges",
				s.nodes.len(),
				s.edges().len()
			);
		}

		let state_reveal = state_init.clone();
		set_timeout(move || state_reveal.borrow_mut().reveal_edges(), reveal_delay);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = Subscription::new(window.clone().into()).listen("resize", move |_| {
			if let Some(win) = web_sys::window() {
				fit_canvas(&canvas_resize, &win, &mut state_resize.borrow_mut());
			}
		});
		let touch = touch_start(&canvas, &state_init, &drag_init, canvas_ref, overlay);
		mount_init.listeners.borrow_mut().extend([resize, touch]);

		let (state_anim, mount_anim) = (state_init.clone(), Rc::downgrade(&mount_init));
		let last_frame = Cell::new(None::<f64>);
		*mount_init.animate.borrow_mut() = Some(Closure::new(move |now: f64| {
			let Some(mount) = mount_anim.upgrade() else {
				return;
			};
			let dt = last_frame
				.replace(Some(now))
				.map_or(0.0, |prev| ((now - prev) / 1000.0).clamp(0.0, 0.1));
			{
				let mut s = state_anim.borrow_mut();
				s.tick(dt);
				render::render(&s, &ctx);
			}
			mount.request_frame();
		}));
		mount_init.request_frame();
	});

	let (state_md, drag_md) = (state.clone(), drag.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 || !press(&state_md, canvas_ref, page_point(&ev), None) {
			return;
		}
		ev.prevent_default();
		*drag_md.borrow_mut() = mouse_subscription(&state_md, &drag_md, canvas_ref, overlay);
		overlay.sync(&state_md.borrow());
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let page = page_point(&ev);
		let rect = container_rect(canvas_ref);
		let mut s = state_mm.borrow_mut();
		let hit = rect.and_then(|r| s.node_at(r.to_local(page)).map(|n| n.id.clone()));
		match hit {
			Some(id) if s.tooltip().map(|t| t.node_id.as_str()) != Some(id.as_str()) => {
				s.hover(&id, page, rect)
			}
			Some(_) => {}
			None => s.unhover(),
		}
		overlay.sync(&s);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut s = state_ml.borrow_mut();
		s.unhover();
		overlay.sync(&s);
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(rect) = container_rect(canvas_ref) else {
			return;
		};
		let mut s = state_click.borrow_mut();
		let Some(id) = s.node_at(rect.to_local(page_point(&ev))).map(|n| n.id.clone()) else {
			return;
		};
		if s.click_node(&id) {
			info!("opened detail panel for {id}");
		}
		overlay.sync(&s);
	};

	let (state_reset, drag_reset) = (state.clone(), drag.clone());
	let on_reset = move |_: MouseEvent| {
		let subscription = drag_reset.borrow_mut().take();
		{
			let mut s = state_reset.borrow_mut();
			s.reset();
			overlay.sync(&s);
		}
		drop(subscription);
	};

	let close_detail = move || {
		graph.with_value(|state| {
			let mut s = state.borrow_mut();
			s.close_detail();
			overlay.sync(&s);
		})
	};

	view! {
		<div
			class="skills-graph"
			style=format!(
				"position: relative; width: 100%; height: {height}px; overflow: hidden; border-radius: 8px; border: 1px solid #2a2a2a; background: #0a0a0a;",
			)
		>
			<canvas
				node_ref=canvas_ref
				class="skills-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				style=move || {
					format!(
						"display: block; width: 100%; height: 100%; cursor: {};",
						overlay.cursor.get(),
					)
				}
			/>
			<Legend />
			<button
				class="skills-graph-reset"
				on:click=on_reset
				style="position: absolute; top: 16px; right: 16px; z-index: 30; padding: 6px 12px; border-radius: 6px; border: 1px solid #2a2a2a; background: rgba(26, 26, 26, 0.9); color: white; cursor: pointer;"
			>
				"↺ Reset Graph"
			</button>
			{move || {
				overlay
					.tooltip
					.get()
					.map(|tip| {
						view! {
							<div
								class="skills-graph-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; transform: translateX(-50%); pointer-events: none; z-index: 10; padding: 12px; border-radius: 8px; border: 1px solid #3a3a3a; background: rgba(26, 26, 26, 0.95);",
									tip.x,
									tip.y,
								)
							>
								<div style="font-size: 14px; font-weight: 600; color: white;">
									{tip.title}
								</div>
								<div style="font-size: 12px; color: #a1a1a1; margin-top: 4px; max-width: 12rem;">
									{tip.summary}
								</div>
							</div>
						}
					})
			}}
			{move || {
				overlay
					.selected
					.get()
					.map(|node| view! { <DetailPanel node=node on_close=close_detail /> })
			}}
		</div>
	}
}

#[component]
fn Legend() -> impl IntoView {
	view! {
		<div
			class="skills-graph-legend"
			style="position: absolute; top: 16px; left: 16px; padding: 16px; border-radius: 8px; border: 1px solid #2a2a2a; background: rgba(26, 26, 26, 0.9);"
		>
			<h3 style="font-size: 14px; font-weight: 600; color: white; margin: 0 0 12px;">
				"Categories"
			</h3>
			{Category::ALL
				.into_iter()
				.map(|category| {
					view! {
						<div style="display: flex; align-items: center; gap: 8px; margin-top: 8px;">
							<div style=format!(
								"width: 12px; height: 12px; border-radius: 50%; background: {0}; box-shadow: 0 0 8px {0};",
								category.color(),
							) />
							<span style="font-size: 12px; color: #a1a1a1;">{category.label()}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

/// Modal over the graph; clicks on the dimmed backdrop close it.
#[component]
fn DetailPanel(
	node: SkillNode,
	on_close: impl Fn() + Copy + Send + Sync + 'static,
) -> impl IntoView {
	let color = node.category.color();
	view! {
		<div
			class="skills-graph-backdrop"
			on:click=move |_| on_close()
			style="position: absolute; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.7);"
		>
			<div
				class="skills-graph-detail"
				on:click=|ev: MouseEvent| ev.stop_propagation()
				style="max-width: 28rem; width: 100%; margin: 0 16px; padding: 24px; border-radius: 12px; border: 1px solid #3a3a3a; background: #1a1a1a;"
			>
				<div style="display: flex; align-items: flex-start; justify-content: space-between; margin-bottom: 16px;">
					<div>
						<h3 style="font-size: 20px; font-weight: 600; color: white; margin: 0 0 4px;">
							{node.detail.title}
						</h3>
						<div style="display: flex; align-items: center; gap: 8px;">
							<div style=format!(
								"width: 12px; height: 12px; border-radius: 50%; background: {color}; box-shadow: 0 0 8px {color};",
							) />
							<span style="font-size: 14px; color: #a1a1a1;">
								{node.category.label()}
							</span>
						</div>
					</div>
					<button
						class="skills-graph-close"
						aria-label="Close"
						on:click=move |_| on_close()
						style="background: none; border: none; color: #a1a1a1; cursor: pointer; font-size: 18px;"
					>
						"✕"
					</button>
				</div>
				<p style="font-size: 14px; line-height: 1.6; color: #a1a1a1; margin: 0 0 24px;">
					{node.detail.description}
				</p>
				<div style="display: flex; gap: 12px;">
					{node
						.detail
						.links
						.into_iter()
						.map(|link| {
							view! {
								<a
									class="skills-graph-link"
									href=link.url
									target="_blank"
									rel="noopener noreferrer"
									style="padding: 6px 12px; border-radius: 6px; border: 1px solid #3a3a3a; color: white; text-decoration: none; font-size: 14px;"
								>
									{link.label}
								</a>
							}
						})
						.collect_view()}
				</div>
			</div>
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use wasm_bindgen_test::*;
	use web_sys::{Element, HtmlElement};

	use super::super::types::{NodeDetail, ProjectLink};
	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn sample_node() -> SkillNode {
		SkillNode {
			id: "rust".into(),
			name: "Rust".into(),
			category: Category::WebDeployment,
			position: Point::new(0.0, 0.0),
			connections: vec![],
			detail: NodeDetail {
				title: "Canvas Graph".into(),
				summary: "Draggable nodes".into(),
				description: "A skills graph rendered to canvas.".into(),
				links: vec![ProjectLink {
					label: "Source".into(),
					url: "https://example.com/source".into(),
				}],
			},
		}
	}

	fn click(root: &Element, selector: &str) {
		root.query_selector(selector)
			.unwrap()
			.unwrap_or_else(|| panic!("{selector} not rendered"))
			.unchecked_into::<HtmlElement>()
			.click();
	}

	#[wasm_bindgen_test]
	fn only_backdrop_and_close_button_dismiss_the_panel() {
		let document = web_sys::window().unwrap().document().unwrap();
		let host: HtmlElement = document.create_element("div").unwrap().unchecked_into();
		document.body().unwrap().append_child(&host).unwrap();

		let closes = RwSignal::new(0);
		let on_close = move || closes.update(|n| *n += 1);
		let _mounted = leptos::mount::mount_to(host.clone(), move || {
			view! { <DetailPanel node=sample_node() on_close=on_close /> }
		});

		let link = host.query_selector(".skills-graph-link").unwrap().unwrap();
		assert_eq!(link.get_attribute("href").as_deref(), Some("https://example.com/source"));
		assert_eq!(link.get_attribute("rel").as_deref(), Some("noopener noreferrer"));

		click(&host, ".skills-graph-detail");
		assert_eq!(closes.get_untracked(), 0);

		click(&host, ".skills-graph-backdrop");
		assert_eq!(closes.get_untracked(), 1);

		click(&host, ".skills-graph-close");
		assert_eq!(closes.get_untracked(), 2);
	}
}
