use crate::{
    canvas::{CanvasDrawer, NEXT_PIECE_WIDTH, SQUARE_WIDTH},
    config::Config,
    util,
};

use std::{cell::RefCell, rc::Rc};

use glowtris::{
    config::{GameConfig, Settings},
    game::{Game, GameEvent, Input},
    UniformRandomizer,
};
use sycamore::{
    component,
    generic_node::Html,
    prelude::{create_effect, create_rc_signal, create_ref, use_context, use_scope_status, ReadSignal, Scope, Signal},
    view,
    view::View,
    Prop,
};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Event, KeyboardEvent};

pub const FIELD_CANVAS_ID: &str = "field";
pub const NEXT_CANVAS_ID: &str = "next";
pub const GAME_ID: &str = "game";

type SharedGame = Rc<RefCell<Game>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[derive(Prop)]
pub struct BoardProps<'a> {
    settings: &'a ReadSignal<Settings>,
}

#[component]
pub fn Board<'a, G: Html>(cx: Scope<'a>, props: BoardProps<'a>) -> View<G> {
    let config = use_context::<Signal<RefCell<Config>>>(cx);
    let settings = props.settings;

    let game_config = GameConfig::default();
    let (width, height) = (game_config.field_width, game_config.field_height);
    let game = Game::new(game_config, (*settings.get_untracked()).clone(), UniformRandomizer::new());
    let game: SharedGame = Rc::new(RefCell::new(game));

    // push settings panel changes into the game
    {
        let game = game.clone();
        create_effect(cx, move || {
            let settings = settings.get();
            let mut game = game.borrow_mut();
            game.set_performance_mode(settings.performance_mode);
            game.set_glow(settings.glow);
            if game.settings().drop_interval != settings.drop_interval {
                game.request_drop_interval(util::now(), settings.drop_interval);
            }
        });
    }

    // written from the animation frame loop, which outlives borrows of this scope
    let score = create_rc_signal(0);
    let status = create_rc_signal(String::new());
    let score_text = create_ref(cx, score.clone());
    let status_text = create_ref(cx, status.clone());

    run_frame_loop(cx, game.clone(), move |event| match event {
        GameEvent::ScoreChanged(new_score) => score.set(*new_score),
        GameEvent::Paused => status.set("paused".to_string()),
        GameEvent::GameOver => status.set("game over".to_string()),
        GameEvent::Resumed | GameEvent::Restarted => status.set(String::new()),
        _ => {}
    });

    let keydown_handler = {
        let game = game.clone();
        move |e: Event| {
            let e = match e.dyn_into::<KeyboardEvent>() {
                Ok(e) => e,
                Err(_) => return,
            };
            // held keys repeat through the operating system, only the first press counts
            if e.repeat() {
                return;
            }

            let input = config.get().borrow().input_for_key(&e.key());
            if let Some(input) = input {
                e.prevent_default();
                game.borrow_mut().handle_input(input);
            }
        }
    };

    let field_style = format!("width: {}px; height: {}px;", width * SQUARE_WIDTH, height * SQUARE_WIDTH);
    let next_style = format!("width: {0}px; height: {0}px;", NEXT_PIECE_WIDTH);

    view! { cx,
        div(class="game", id=GAME_ID, tabindex="0", on:keydown=keydown_handler) {
            div(class="field") {
                canvas(id=FIELD_CANVAS_ID, class="field-canvas", style=field_style)
            }
            div(class="side-panel") {
                p(class="panel-label") { "next" }
                canvas(id=NEXT_CANVAS_ID, class="next-canvas", style=next_style)
                p(class="panel-label") { "score" }
                p(id="score") { (score_text.get()) }
                p(class="status") { (status_text.get()) }
            }
            div(class="touch-controls") {
                button(id="left-btn", on:pointerdown=press_handler(&game, Input::Left)) { "◀" }
                button(id="rotate-btn", on:pointerdown=press_handler(&game, Input::RotateCw)) { "⟳" }
                button(id="down-btn", on:pointerdown=press_handler(&game, Input::SoftDrop)) { "▼" }
                button(id="right-btn", on:pointerdown=press_handler(&game, Input::Right)) { "▶" }
            }
        }
    }
}

fn press_handler(game: &SharedGame, input: Input) -> impl Fn(Event) {
    let game = game.clone();
    move |e: Event| {
        e.prevent_default();
        game.borrow_mut().handle_input(input);
    }
}

// ticks the game on every animation frame until this scope is disposed, handing drained events to `on_event`
fn run_frame_loop(cx: Scope, game: SharedGame, mut on_event: impl FnMut(&GameEvent) + 'static) {
    let scope_alive = use_scope_status(cx);
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next_callback = callback.clone();

    // found once the view is mounted
    let mut drawers: Option<(CanvasDrawer, CanvasDrawer)> = None;

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
        if release_when_disposed(*scope_alive.get(), &next_callback) {
            return;
        }

        let frame = game.borrow_mut().tick(time);
        let events = game.borrow_mut().drain_events();
        for event in &events {
            util::log(&describe_event(event));
            on_event(event);
        }

        if drawers.is_none() {
            drawers = CanvasDrawer::from_id(FIELD_CANVAS_ID).zip(CanvasDrawer::from_id(NEXT_CANVAS_ID));
            if drawers.is_some() {
                util::focus_by_id(GAME_ID);
            }
        }
        match &drawers {
            Some((field, next)) if frame.render => {
                let game = game.borrow();
                field.draw_field(&*game);
                next.draw_next_piece(game.next_piece());
            }
            _ => {}
        }

        if let Some(callback) = next_callback.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = callback.borrow().as_ref() {
        request_animation_frame(callback);
    };
}

// drops whatever `slot` holds once its scope is gone, breaking the cycle between the frame closure and itself
// the closure may be the one running; wasm-bindgen keeps it alive until the call returns
fn release_when_disposed<T>(alive: bool, slot: &RefCell<Option<T>>) -> bool {
    if !alive {
        slot.borrow_mut().take();
    }
    !alive
}

fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) {
    let requested = util::window().map(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()));
    if !matches!(requested, Some(Ok(_))) {
        util::log("failed to request an animation frame");
    }
}

fn describe_event(event: &GameEvent) -> String {
    match event {
        GameEvent::Locked(kind) => format!("locked {}", kind),
        GameEvent::LinesCleared(n) => format!("cleared {} line{}", n, if *n == 1 { "" } else { "s" }),
        GameEvent::ScoreChanged(score) => format!("score {}", score),
        GameEvent::LevelUp(level) => format!("level {}", level),
        GameEvent::DropIntervalChanged(ms) => format!("drop interval {}ms", ms),
        GameEvent::Paused => "paused".to_string(),
        GameEvent::Resumed => "resumed".to_string(),
        GameEvent::GameOver => "game over".to_string(),
        GameEvent::Restarted => "restarted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposed_scope_releases_frame_callback() {
        let slot = Rc::new(RefCell::new(Some(Rc::new(()))));
        let held = slot.borrow().clone().unwrap();
        assert_eq!(Rc::strong_count(&held), 2);

        assert!(!release_when_disposed(true, &slot));
        assert!(slot.borrow().is_some());

        assert!(release_when_disposed(false, &slot));
        assert!(slot.borrow().is_none());
        assert_eq!(Rc::strong_count(&held), 1);

        // later frames find nothing left to drop
        assert!(release_when_disposed(false, &slot));
    }
}
