use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// A set of event listeners on one target, removed when dropped.
///
/// Drag gestures hold one on the document for their lifetime, so the release
/// handler only has to drop it, wherever on the page the pointer was let go.
/// The mounted widget holds others for its canvas and the window.
pub struct Subscription {
	target: EventTarget,
	listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl Subscription {
	pub fn new(target: EventTarget) -> Self {
		Self {
			target,
			listeners: Vec::new(),
		}
	}

	pub fn listen(self, event: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
		self.attach(event, None, handler)
	}

	/// Listener allowed to call `prevent_default`, even for touch events.
	pub fn listen_active(self, event: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
		let options = AddEventListenerOptions::new();
		options.set_passive(false);
		self.attach(event, Some(options), handler)
	}

	fn attach(
		mut self,
		event: &'static str,
		options: Option<AddEventListenerOptions>,
		handler: impl FnMut(Event) + 'static,
	) -> Self {
		let closure = Closure::<dyn FnMut(Event)>::new(handler);
		let callback = closure.as_ref().unchecked_ref();
		let attached = match &options {
			Some(options) => self
				.target
				.add_event_listener_with_callback_and_add_event_listener_options(
					event, callback, options,
				),
			None => self.target.add_event_listener_with_callback(event, callback),
		};
		if let Err(err) = attached {
			warn!("failed to attach {event} listener: {err:?}");
			return self;
		}
		self.listeners.push((event, closure));
		self
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		for (event, closure) in self.listeners.drain(..) {
			let _ = self
				.target
				.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
		}
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use std::cell::{Cell, RefCell};
	use std::rc::Rc;

	use wasm_bindgen_test::*;
	use web_sys::EventInit;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn bubbling(name: &str) -> Event {
		let init = EventInit::new();
		init.set_bubbles(true);
		Event::new_with_event_init_dict(name, &init).unwrap()
	}

	#[wasm_bindgen_test]
	fn release_outside_the_widget_detaches_listeners_once() {
		let document = web_sys::window().unwrap().document().unwrap();
		let outside = document.create_element("div").unwrap();
		document.body().unwrap().append_child(&outside).unwrap();

		let moves = Rc::new(Cell::new(0));
		let releases = Rc::new(Cell::new(0));
		let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

		let (moves_in, releases_in, slot_in) = (moves.clone(), releases.clone(), slot.clone());
		*slot.borrow_mut() = Some(
			Subscription::new(document.clone().into())
				.listen("mousemove", move |_| moves_in.set(moves_in.get() + 1))
				.listen("mouseup", move |_| {
					releases_in.set(releases_in.get() + 1);
					let released = slot_in.borrow_mut().take();
					drop(released);
				}),
		);

		outside.dispatch_event(&bubbling("mousemove")).unwrap();
		outside.dispatch_event(&bubbling("mouseup")).unwrap();
		assert_eq!((moves.get(), releases.get()), (1, 1));
		assert!(slot.borrow().is_none());

		outside.dispatch_event(&bubbling("mousemove")).unwrap();
		outside.dispatch_event(&bubbling("mouseup")).unwrap();
		assert_eq!((moves.get(), releases.get()), (1, 1));

		outside.remove();
	}

	#[wasm_bindgen_test]
	fn active_listener_can_cancel_the_event() {
		let document = web_sys::window().unwrap().document().unwrap();
		let target = document.create_element("div").unwrap();
		document.body().unwrap().append_child(&target).unwrap();

		let init = EventInit::new();
		init.set_cancelable(true);
		let event = Event::new_with_event_init_dict("touchstart", &init).unwrap();

		let subscription = Subscription::new(target.clone().into())
			.listen_active("touchstart", |ev: Event| ev.prevent_default());
		target.dispatch_event(&event).unwrap();
		assert!(event.default_prevented());

		drop(subscription);
		target.remove();
	}
}
