use std::{
    cell::RefCell,
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    board::{Board, GAME_ID},
    util,
};

use bimap::BiMap;
use glowtris::{config::Settings, game::Input};
use serde::{Deserialize, Serialize};
use sycamore::{
    component,
    generic_node::Html,
    prelude::{create_effect, create_memo, create_signal, provide_context_ref, ReadSignal, Scope, Signal},
    view,
    view::View,
    Prop,
};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement, KeyboardEvent};

const STORAGE_KEY: &str = "glowtris-config";

#[component]
pub fn ConfigPanel<'a, G: Html>(cx: Scope<'a>) -> View<G> {
    let c = Config::load();
    util::log(&format!("config: {}", c));

    let performance_mode = create_signal(cx, c.settings.performance_mode);
    let glow = create_signal(cx, c.settings.glow);
    let drop_interval = create_signal(cx, c.settings.drop_interval);
    let keybinds = create_signal(cx, c.keybinds.clone());

    let config = create_signal(cx, RefCell::new(c));
    provide_context_ref(cx, config);

    // what the board pushes into the running game
    let settings = create_memo(cx, || Settings {
        performance_mode: *performance_mode.get(),
        glow: *glow.get(),
        drop_interval: *drop_interval.get(),
    });

    // the stored config is written untracked so saving doesn't retrigger this
    create_effect(cx, move || {
        let settings = (*settings.get()).clone();
        let keybinds = (*keybinds.get()).clone();
        util::with_signal_mut_untracked(config, |config| {
            config.settings = settings.clone();
            config.keybinds = keybinds.clone();
            config.save();
        });
    });

    let panel_open = create_signal(cx, false);
    let panel_class = create_memo(cx, || {
        if *panel_open.get() {
            "settings-panel"
        } else {
            "settings-panel hidden"
        }
    });

    view! { cx,
        div(class="content") {
            Board { settings }
            input(type="button", id="settings-btn", value="settings", on:click=|_| panel_open.set(true))
            div(class=panel_class.get(), id="settings-panel") {
                SectionHeading("Visual")
                div(class="config-button-box") {
                    ToggleButton { label: "Performance mode", value: performance_mode }
                    ToggleButton { label: "Glow", value: glow }
                }

                SectionHeading("Gameplay")
                RangeInput { label: "Drop interval", min: 50, max: 2_000, step: 10, value: drop_interval }

                SectionHeading("Keybinds")
                div(class="config-button-box") {
                    InputCaptureButton { label: "Left", input: Input::Left, keybinds }
                    InputCaptureButton { label: "Right", input: Input::Right, keybinds }
                    InputCaptureButton { label: "Soft drop", input: Input::SoftDrop, keybinds }
                    InputCaptureButton { label: "Hard drop", input: Input::HardDrop, keybinds }
                    InputCaptureButton { label: "Rotate CW", input: Input::RotateCw, keybinds }
                    InputCaptureButton { label: "Rotate CCW", input: Input::RotateCcw, keybinds }
                    InputCaptureButton { label: "Pause", input: Input::Pause, keybinds }
                }

                input(type="button", id="close-settings", value="close", on:click=|_| close_panel(panel_open, || {
                    util::focus_by_id(GAME_ID);
                }))
            }
        }
    }
}

// hands keyboard focus back to the board, which loses it to the panel's buttons
fn close_panel(panel_open: &Signal<bool>, refocus: impl FnOnce()) {
    panel_open.set(false);
    refocus();
}

#[derive(Prop)]
struct RangeInputProps<'a, T: Copy + Display + FromStr + 'static> {
    label: &'static str,
    min: T,
    max: T,
    step: T,
    value: &'a Signal<T>,
}

#[component]
fn RangeInput<'a, T, G>(cx: Scope<'a>, props: RangeInputProps<'a, T>) -> View<G>
where
    T: Copy + Display + FromStr + 'static,
    G: Html,
{
    let RangeInputProps {
        label,
        min,
        max,
        step,
        value,
    } = props;

    view! { cx,
        div(class="config-option") {
            InputLabel { label, value }
            input(
                type="range",
                min=min, max=max, step=step, value=value.to_string(),
                on:input=|e: Event| {
                    let elem = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
                    if let Some(new_value) = elem.and_then(|elem| elem.value().parse().ok()) {
                        value.set(new_value);
                    }
                },
            )
        }
    }
}

#[derive(Prop)]
struct ToggleButtonProps<'a> {
    label: &'static str,
    value: &'a Signal<bool>,
}

// button that toggles a `bool`
#[component]
fn ToggleButton<'a, G: Html>(cx: Scope<'a>, props: ToggleButtonProps<'a>) -> View<G> {
    let ToggleButtonProps { label, value } = props;
    let text = value.map(cx, move |v| format!("{} ({})", label, if *v { "on" } else { "off" }));

    view! { cx,
        div(class="config-option") {
            input(
                type="button",
                value=text.get(),
                on:click=|_| value.set(!*value.get()),
            )
        }
    }
}

#[derive(Prop)]
struct InputCaptureButtonProps<'a> {
    label: &'static str,
    input: Input,
    keybinds: &'a Signal<Keybinds>,
}

// button that captures keyboard input when pressed (used for assigning keybinds)
#[component]
fn InputCaptureButton<'a, G: Html>(cx: Scope<'a>, props: InputCaptureButtonProps<'a>) -> View<G> {
    let InputCaptureButtonProps { label, input, keybinds } = props;

    let is_capturing_input = create_signal(cx, false);
    let text = create_memo(cx, move || {
        let keybind = if *is_capturing_input.get() {
            "<press a key>".to_string()
        } else {
            keybinds.get().get_by_left(&input).map_or("<unset>".to_string(), |k| key_name(k))
        };
        format!("{} ({})", label, keybind)
    });

    view! { cx,
        div(class="config-option") {
            input(
                type="button",
                value=text.get(),
                on:click=|_| is_capturing_input.set(!*is_capturing_input.get()),
                on:keydown=move |e: Event| {
                    e.prevent_default();
                    e.stop_propagation();
                    let key = match e.dyn_into::<KeyboardEvent>() {
                        Ok(e) => e.key(),
                        Err(_) => return,
                    };

                    // only change binds if currently capturing and let escape cancel the action
                    if *is_capturing_input.get() && !key.starts_with("Esc") {
                        keybinds.modify().insert(input, normalize_key(&key));
                    }
                    is_capturing_input.set(false);
                },
            )
        }
    }
}

#[component]
fn SectionHeading<'a, G: Html>(cx: Scope<'a>, section: &'static str) -> View<G> {
    view! { cx, p(class="config-heading") { (section.to_uppercase()) } }
}

#[derive(Prop)]
struct InputLabelProps<'a, T: Display + 'static> {
    label: &'static str,
    value: &'a ReadSignal<T>,
}

#[component]
fn InputLabel<'a, G: Html, T: Display + 'static>(cx: Scope<'a>, props: InputLabelProps<'a, T>) -> View<G> {
    view! { cx, p(class="config-option-label") { (props.label) " (" (props.value.get()) "):" } }
}

fn key_name(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        _ if key.starts_with("Arrow") => key[5..].to_string(),
        _ => key.to_string(),
    }
}

// single letters are bound case-insensitively so caps lock and shift don't matter
pub fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

pub type Keybinds = BiMap<Input, String>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub settings: Settings,
    pub keybinds: Keybinds,
}

impl Config {
    // the saved config, or the default if there is none or it can't be read
    pub fn load() -> Self {
        let saved = util::local_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        match saved.map(|json| serde_json::from_str(&json)) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                util::log(&format!("ignoring saved config: {}", e));
                Config::default()
            }
            None => Config::default(),
        }
    }

    pub fn save(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => return util::log(&format!("failed to serialize config: {}", e)),
        };
        match util::local_storage().map(|s| s.set_item(STORAGE_KEY, &json)) {
            Some(Ok(())) => {}
            _ => util::log("failed to save config"),
        }
    }

    pub fn input_for_key(&self, key: &str) -> Option<Input> {
        self.keybinds.get_by_right(&normalize_key(key)).copied()
    }
}

impl Default for Config {
    fn default() -> Self {
        let inputs = [
            (Input::Left, "ArrowLeft"),
            (Input::Right, "ArrowRight"),
            (Input::SoftDrop, "ArrowDown"),
            (Input::HardDrop, " "),
            (Input::RotateCw, "ArrowUp"),
            (Input::RotateCcw, "z"),
            (Input::Pause, "p"),
        ];

        Config {
            settings: Settings::default(),
            keybinds: inputs.into_iter().map(|(i, k)| (i, k.to_string())).collect(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.settings;
        write!(
            f,
            "performance mode {}, glow {}, drop interval {}ms",
            s.performance_mode, s.glow, s.drop_interval
        )
    }
}
