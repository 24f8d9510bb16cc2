use std::mem;

use strum_macros::EnumIter;

use crate::{
    config::{GameConfig, Settings},
    field::{Field, LivePiece},
    kicks::{AlternatingKickTable, Rotation},
    pieces::Tetromino,
    scoring::Score,
    timer::Deferred,
    Randomizer, UniformRandomizer,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameStatus {
    Running,
    Paused,
    // the field filled up; a reset is pending
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    Left,
    Right,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Pause,
}

// things that happened since the host last drained events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Locked(Tetromino),
    LinesCleared(usize),
    ScoreChanged(u64),
    LevelUp(u32),
    DropIntervalChanged(u32),
    Paused,
    Resumed,
    GameOver,
    Restarted,
}

// what the host should do after a tick
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Frame {
    pub render: bool,
    pub dropped: bool,
}

// one game session: the field, the falling piece and everything derived from them
pub struct Game<R: Randomizer = UniformRandomizer> {
    config: GameConfig,
    settings: Settings,

    field: Field,
    cur_piece: LivePiece,
    next_piece: Tetromino,
    randomizer: R,
    kick_table: AlternatingKickTable,

    score: Score,
    status: GameStatus,

    // latest host time in milliseconds
    now: f64,
    last_tick: Option<f64>,
    last_render: Option<f64>,
    drop_counter: f64,

    game_over_reset: Deferred<()>,
    drop_interval_update: Deferred<u32>,

    events: Vec<GameEvent>,
}

impl Default for Game {
    fn default() -> Self { Game::new(GameConfig::default(), Settings::default(), UniformRandomizer::new()) }
}

impl<R: Randomizer> Game<R> {
    pub fn new(config: GameConfig, settings: Settings, mut randomizer: R) -> Self {
        let field = Field::new(config.field_width, config.field_height);
        let first = randomizer.next();
        let next_piece = randomizer.next();

        let mut score = Score::new(&config);
        score.set_drop_interval(settings.drop_interval);

        Game {
            cur_piece: LivePiece::spawn(first, field.width()),
            next_piece,
            field,
            randomizer,
            kick_table: AlternatingKickTable,

            score,
            status: GameStatus::Running,

            now: 0.0,
            last_tick: None,
            last_render: None,
            drop_counter: 0.0,

            game_over_reset: Deferred::new(),
            drop_interval_update: Deferred::new(),

            events: vec![],

            config,
            settings,
        }
    }

    pub fn config(&self) -> &GameConfig { &self.config }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn field(&self) -> &Field { &self.field }

    // direct access for setting up positions; the current piece is not checked against the changes
    pub fn field_mut(&mut self) -> &mut Field { &mut self.field }

    pub fn cur_piece(&self) -> &LivePiece { &self.cur_piece }

    pub fn next_piece(&self) -> Tetromino { self.next_piece }

    pub fn score(&self) -> &Score { &self.score }

    pub fn status(&self) -> GameStatus { self.status }

    pub fn drop_counter(&self) -> f64 { self.drop_counter }

    pub fn drain_events(&mut self) -> Vec<GameEvent> { mem::take(&mut self.events) }

    pub fn handle_input(&mut self, input: Input) -> bool {
        match input {
            Input::Left => self.try_shift(-1),
            Input::Right => self.try_shift(1),
            Input::SoftDrop => self.soft_drop(),
            Input::HardDrop => self.hard_drop(),
            Input::RotateCw => self.try_rotate(Rotation::Cw),
            Input::RotateCcw => self.try_rotate(Rotation::Ccw),
            Input::Pause => {
                let before = self.status;
                before != self.toggle_pause()
            }
        }
    }

    // move the current piece sideways by `cols` (fails if blocked)
    pub fn try_shift(&mut self, cols: i32) -> bool {
        self.status.is_running() && self.cur_piece.try_shift(&self.field, 0, cols)
    }

    pub fn try_rotate(&mut self, rotation: Rotation) -> bool {
        self.status.is_running() && self.cur_piece.try_rotate(&self.field, &self.kick_table, rotation)
    }

    // move down one row, locking the piece if it cannot move
    // returns whether the piece moved
    pub fn soft_drop(&mut self) -> bool {
        if !self.status.is_running() {
            return false;
        }

        let moved = self.cur_piece.try_shift(&self.field, 1, 0);
        if !moved {
            self.lock_cur_piece();
        }
        self.drop_counter = 0.0;
        moved
    }

    // move to the lowest reachable row and lock
    pub fn hard_drop(&mut self) -> bool {
        if !self.status.is_running() {
            return false;
        }

        self.cur_piece = self.cur_piece.projected_down(&self.field);
        self.lock_cur_piece();
        self.drop_counter = 0.0;
        true
    }

    // running and paused swap, a finished game stays finished until its reset
    pub fn toggle_pause(&mut self) -> GameStatus {
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameStatus::Paused => {
                self.status = GameStatus::Running;
                self.events.push(GameEvent::Resumed);
            }
            GameStatus::GameOver => {}
        }
        self.status
    }

    // replace the current piece with a fresh `kind` at the top of the field
    // a spawn that is blocked straight away ends the game
    pub fn spawn(&mut self, kind: Tetromino) -> bool {
        let piece = LivePiece::spawn(kind, self.field.width());
        let blocked = piece.is_blocked(&self.field);
        self.cur_piece = piece;
        if blocked {
            self.top_out();
        }
        !blocked
    }

    fn spawn_next(&mut self) -> bool {
        let kind = mem::replace(&mut self.next_piece, self.randomizer.next());
        self.spawn(kind)
    }

    fn lock_cur_piece(&mut self) {
        self.cur_piece.lock(&mut self.field);
        self.events.push(GameEvent::Locked(self.cur_piece.kind()));

        let n_cleared = self.field.sweep();
        if n_cleared > 0 {
            let update = self.score.update(n_cleared);
            self.events.push(GameEvent::LinesCleared(n_cleared));
            self.events.push(GameEvent::ScoreChanged(self.score.score()));
            if update.levels_gained > 0 {
                self.events.push(GameEvent::LevelUp(self.score.level()));
                self.events.push(GameEvent::DropIntervalChanged(self.score.drop_interval()));
            }
        }

        self.spawn_next();
    }

    fn top_out(&mut self) {
        if self.status.is_game_over() {
            return;
        }
        self.status = GameStatus::GameOver;
        self.events.push(GameEvent::GameOver);
        self.game_over_reset.start(self.now, self.config.game_over_delay, ());
    }

    // clear everything but the settings and start over
    fn restart(&mut self) {
        self.field.reset();
        self.score.reset();
        self.drop_counter = 0.0;
        self.status = GameStatus::Running;
        self.events.push(GameEvent::Restarted);
        self.events.push(GameEvent::ScoreChanged(self.score.score()));
        self.spawn_next();
    }

    pub fn game_over_reset_due(&self) -> Option<f64> { self.game_over_reset.due_at() }

    pub fn set_performance_mode(&mut self, enabled: bool) { self.settings.performance_mode = enabled; }

    pub fn set_glow(&mut self, enabled: bool) { self.settings.glow = enabled; }

    pub fn glow_enabled(&self) -> bool { self.settings.glow_enabled() }

    // debounced: only the last request within the debounce window is applied, on a later tick
    // ignored in performance mode
    pub fn request_drop_interval(&mut self, now: f64, drop_interval: u32) -> bool {
        if self.settings.performance_mode {
            return false;
        }
        self.now = self.now.max(now);
        self.drop_interval_update
            .start(now, self.config.drop_interval_debounce, drop_interval);
        true
    }

    fn apply_drop_interval(&mut self, drop_interval: u32) {
        self.settings.drop_interval = drop_interval;
        self.score.set_drop_interval(drop_interval);
        self.events.push(GameEvent::DropIntervalChanged(self.score.drop_interval()));
    }

    // milliseconds that must pass between renders
    pub fn min_frame_time(&self) -> f64 {
        let fps = if self.settings.performance_mode {
            self.config.reduced_fps
        } else {
            self.config.target_fps
        };
        1_000.0 / fps
    }

    // advance the game to `now` (milliseconds on the host clock)
    pub fn tick(&mut self, now: f64) -> Frame {
        let elapsed = self.last_tick.map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick = Some(now);
        self.now = self.now.max(now);

        if let Some(drop_interval) = self.drop_interval_update.poll(now) {
            self.apply_drop_interval(drop_interval);
        }
        if self.game_over_reset.poll(now).is_some() {
            self.restart();
        }

        let mut dropped = false;
        if self.status.is_running() {
            self.drop_counter += elapsed;
            if self.drop_counter > self.score.drop_interval() as f64 {
                self.soft_drop();
                dropped = true;
            }
        }

        Frame {
            render: self.should_render(now),
            dropped,
        }
    }

    // every tick renders normally, performance mode throttles to the reduced frame rate
    fn should_render(&mut self, now: f64) -> bool {
        let render = !self.settings.performance_mode
            || self.last_render.map_or(true, |last| now - last >= self.min_frame_time());
        if render {
            self.last_render = Some(now);
        }
        render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Square, Coords, SequenceRandomizer};

    fn game(kinds: impl IntoIterator<Item = Tetromino>) -> Game<SequenceRandomizer> {
        Game::new(GameConfig::default(), Settings::default(), SequenceRandomizer::new(kinds))
    }

    fn filled(field: &Field) -> usize {
        field.lines().iter().flat_map(|l| l.squares()).filter(|s| s.is_filled()).count()
    }

    #[test]
    fn first_piece_is_spawned() {
        let game = game([Tetromino::T, Tetromino::O]);
        assert_eq!(game.cur_piece().kind(), Tetromino::T);
        assert_eq!(game.next_piece(), Tetromino::O);
        assert_eq!(game.cur_piece().origin(), Coords(0, 5));
        assert!(game.status().is_running());
    }

    #[test]
    fn hard_drop_locks_o_on_the_floor() {
        let mut game = game([Tetromino::O, Tetromino::T]);
        assert!(game.hard_drop());
        for coords in [Coords(18, 5), Coords(18, 6), Coords(19, 5), Coords(19, 6)] {
            assert_eq!(game.field().get_at(&coords), Some(Square::Filled(Tetromino::O)));
        }
        assert_eq!(filled(game.field()), 4);
        assert_eq!(game.cur_piece().kind(), Tetromino::T);
        assert_eq!(game.next_piece(), Tetromino::O);
        assert_eq!(game.drain_events(), [GameEvent::Locked(Tetromino::O)]);
    }

    #[test]
    fn soft_drop_locks_when_blocked() {
        let mut game = game([Tetromino::O]);
        for _ in 0..18 {
            assert!(game.soft_drop());
        }
        assert_eq!(game.cur_piece().origin(), Coords(18, 5));
        assert!(!game.soft_drop());
        assert_eq!(filled(game.field()), 4);
        assert_eq!(game.cur_piece().origin(), Coords(0, 5));
    }

    #[test]
    fn hard_drop_matches_repeated_soft_drops() {
        let kinds = [Tetromino::J, Tetromino::S, Tetromino::I, Tetromino::T];
        let mut hard = game(kinds);
        let mut soft = game(kinds);

        for (shift, rotation) in [(-3, None), (2, Some(Rotation::Cw)), (0, Some(Rotation::Ccw)), (4, None)] {
            for game in [&mut hard, &mut soft] {
                if let Some(rotation) = rotation {
                    game.try_rotate(rotation);
                }
                game.try_shift(shift);
            }
            hard.hard_drop();
            while soft.soft_drop() {}
            assert_eq!(hard.field(), soft.field());
        }
        assert_eq!(filled(hard.field()), 16);
    }

    #[test]
    fn clearing_lines_scores() {
        let mut game = game([Tetromino::O]);
        for row in [18, 19] {
            for col in (0..12).filter(|c| ![5, 6].contains(c)) {
                game.field_mut().set_at(&Coords(row, col), Square::Filled(Tetromino::I));
            }
        }
        game.hard_drop();

        assert!(game.field().is_empty());
        assert_eq!(game.score().score(), 100);
        assert_eq!(game.score().lines(), 2);
        assert_eq!(
            game.drain_events(),
            [GameEvent::Locked(Tetromino::O), GameEvent::LinesCleared(2), GameEvent::ScoreChanged(100)]
        );
    }

    #[test]
    fn inputs_are_ignored_while_paused() {
        let mut game = game([Tetromino::T]);
        assert!(game.handle_input(Input::Pause));
        assert!(game.status().is_paused());

        let before = game.cur_piece().clone();
        for input in [Input::Left, Input::Right, Input::SoftDrop, Input::HardDrop, Input::RotateCw] {
            assert!(!game.handle_input(input));
        }
        assert_eq!(game.cur_piece(), &before);
        assert!(game.field().is_empty());

        assert!(game.handle_input(Input::Pause));
        assert!(game.status().is_running());
        assert!(game.handle_input(Input::Left));
        assert_eq!(game.drain_events(), [GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn gravity_is_suspended_while_paused() {
        let mut game = game([Tetromino::T]);
        game.tick(0.0);
        game.toggle_pause();
        assert!(!game.tick(5_000.0).dropped);
        assert_eq!(game.drop_counter(), 0.0);
        game.toggle_pause();
        assert!(!game.tick(5_500.0).dropped);
        assert!(game.tick(6_001.0).dropped);
        assert_eq!(game.cur_piece().origin(), Coords(1, 5));
    }

    #[test]
    fn blocked_spawn_ends_the_game_once() {
        let mut game = game([Tetromino::O, Tetromino::T]);
        game.field_mut().set_at(&Coords(1, 6), Square::Filled(Tetromino::L));
        game.drain_events();

        assert!(!game.spawn(Tetromino::O));
        assert!(game.status().is_game_over());
        assert_eq!(filled(game.field()), 1);

        // a second blocked spawn doesn't restart the game over
        assert!(!game.spawn(Tetromino::O));
        assert_eq!(game.drain_events(), [GameEvent::GameOver]);
        assert!(!game.handle_input(Input::Pause));
        assert!(game.status().is_game_over());
    }

    #[test]
    fn game_over_resets_after_delay() {
        let mut game = game([Tetromino::O, Tetromino::T]);
        game.tick(1_000.0);
        game.field_mut().set_at(&Coords(19, 0), Square::Filled(Tetromino::L));
        game.field_mut().set_at(&Coords(0, 5), Square::Filled(Tetromino::L));
        game.spawn(Tetromino::O);
        assert_eq!(game.game_over_reset_due(), Some(1_800.0));

        game.tick(1_500.0);
        assert!(game.status().is_game_over());
        game.tick(1_800.0);
        assert!(game.status().is_running());
        assert!(game.field().is_empty());
        assert_eq!(game.score().score(), 0);
        assert!(game.drain_events().ends_with(&[GameEvent::Restarted, GameEvent::ScoreChanged(0)]));
    }

    #[test]
    fn gravity_drops_after_interval() {
        let mut game = game([Tetromino::T]);
        assert!(!game.tick(0.0).dropped);
        assert!(!game.tick(500.0).dropped);
        assert!(!game.tick(1_000.0).dropped);
        assert!(game.tick(1_016.0).dropped);
        assert_eq!(game.cur_piece().origin(), Coords(1, 5));
        assert_eq!(game.drop_counter(), 0.0);
    }

    #[test]
    fn manual_drop_resets_gravity() {
        let mut game = game([Tetromino::T]);
        game.tick(0.0);
        game.tick(900.0);
        game.soft_drop();
        assert!(!game.tick(1_100.0).dropped);
        assert_eq!(game.cur_piece().origin(), Coords(1, 5));
    }

    #[test]
    fn normal_mode_renders_every_tick() {
        let mut game = game([Tetromino::T]);
        assert!((0..10).all(|t| game.tick(t as f64).render));
    }

    #[test]
    fn performance_mode_throttles_rendering() {
        let mut game = game([Tetromino::T]);
        game.set_performance_mode(true);
        assert!(game.tick(0.0).render);
        assert!(!game.tick(16.0).render);
        assert!(!game.tick(33.0).render);
        assert!(game.tick(34.0).render);
        assert!(!game.tick(50.0).render);
        assert!(game.tick(70.0).render);
    }

    #[test]
    fn drop_interval_is_debounced() {
        let mut game = game([Tetromino::T]);
        game.tick(0.0);
        assert!(game.request_drop_interval(10.0, 500));
        assert!(game.request_drop_interval(50.0, 300));
        game.tick(100.0);
        assert_eq!(game.score().drop_interval(), 1_000);
        game.tick(130.0);
        assert_eq!(game.score().drop_interval(), 300);
        assert_eq!(game.settings().drop_interval, 300);
        assert_eq!(game.drain_events(), [GameEvent::DropIntervalChanged(300)]);
    }

    #[test]
    fn drop_interval_requests_ignored_in_performance_mode() {
        let mut game = game([Tetromino::T]);
        game.set_performance_mode(true);
        assert!(!game.request_drop_interval(0.0, 200));
        game.tick(1_000.0);
        assert_eq!(game.score().drop_interval(), 1_000);
    }

    #[test]
    fn glow_follows_performance_mode() {
        let mut game = game([Tetromino::T]);
        assert!(game.glow_enabled());
        game.set_performance_mode(true);
        assert!(!game.glow_enabled());
        game.set_performance_mode(false);
        game.set_glow(false);
        assert!(!game.glow_enabled());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = game([Tetromino::O]);
        let b = game([Tetromino::O]);
        a.hard_drop();
        assert_eq!(filled(a.field()), 4);
        assert!(b.field().is_empty());
    }
}
