//! Browser entry point: mounts the app.

// the library crate owns every other dependency
#![allow(unused_crate_dependencies)]

use isometric_topology::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
