use crate::config::ConfigPanel;
use sycamore::view;

mod board;
mod canvas;
mod config;
mod util;

fn main() { sycamore::render(|cx| view! { cx, ConfigPanel {} }) }
