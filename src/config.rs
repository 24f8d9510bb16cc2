// fixed parameters of a game session
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub field_width: usize,
    pub field_height: usize,

    // gravity, all in milliseconds
    pub drop_interval: u32,
    pub min_drop_interval: u32,
    pub level_speedup: u32,
    pub lines_per_level: u32,

    // deferred actions in milliseconds
    pub game_over_delay: f64,
    pub drop_interval_debounce: f64,

    // render rates
    pub target_fps: f64,
    pub reduced_fps: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field_width: 12,
            field_height: 20,

            drop_interval: 1_000,
            min_drop_interval: 120,
            level_speedup: 60,
            lines_per_level: 10,

            game_over_delay: 800.0,
            drop_interval_debounce: 80.0,

            target_fps: 60.0,
            reduced_fps: 30.0,
        }
    }
}

// user-facing options from the settings panel
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    // reduced fidelity: throttled rendering and no glow
    pub performance_mode: bool,
    pub glow: bool,
    pub drop_interval: u32,
}

impl Settings {
    pub fn glow_enabled(&self) -> bool { self.glow && !self.performance_mode }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            performance_mode: false,
            glow: true,
            drop_interval: GameConfig::default().drop_interval,
        }
    }
}
