use leptos::prelude::*;
use skills_graph::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
