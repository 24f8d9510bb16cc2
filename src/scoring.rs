use crate::config::GameConfig;

// base points for clearing 0-4 lines at once
pub const LINE_CLEAR_POINTS: [u64; 5] = [0, 40, 100, 300, 1_200];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ScoreUpdate {
    pub points: u64,
    pub levels_gained: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Score {
    score: u64,
    lines: u32,
    level: u32,
    drop_interval: u32,

    min_drop_interval: u32,
    level_speedup: u32,
    lines_per_level: u32,
}

impl Score {
    pub fn new(config: &GameConfig) -> Self {
        Score {
            score: 0,
            lines: 0,
            level: 0,
            drop_interval: config.drop_interval,

            min_drop_interval: config.min_drop_interval,
            level_speedup: config.level_speedup,
            lines_per_level: config.lines_per_level.max(1),
        }
    }

    pub fn score(&self) -> u64 { self.score }

    pub fn lines(&self) -> u32 { self.lines }

    pub fn level(&self) -> u32 { self.level }

    // milliseconds between automatic drops
    pub fn drop_interval(&self) -> u32 { self.drop_interval }

    pub fn set_drop_interval(&mut self, drop_interval: u32) { self.drop_interval = drop_interval.max(1); }

    pub fn points_for(n_cleared: usize, level: u32) -> u64 {
        LINE_CLEAR_POINTS.get(n_cleared).copied().unwrap_or(0) * (level as u64 + 1)
    }

    // award points at the current level, then level up every `lines_per_level` lines
    // each level gained speeds gravity up by a fixed step, never below the minimum interval
    pub fn update(&mut self, n_cleared: usize) -> ScoreUpdate {
        let points = Self::points_for(n_cleared, self.level);
        self.score += points;
        self.lines += n_cleared as u32;

        let new_level = self.lines / self.lines_per_level;
        let levels_gained = new_level.saturating_sub(self.level);
        if levels_gained > 0 {
            self.level = new_level;
            let sped_up = self
                .drop_interval
                .saturating_sub(self.level_speedup * levels_gained)
                .max(self.min_drop_interval);
            // an interval already below the minimum is left alone rather than slowed down
            self.drop_interval = sped_up.min(self.drop_interval);
        }

        ScoreUpdate { points, levels_gained }
    }

    // back to level 0 with no score, keeping the current drop interval
    pub fn reset(&mut self) {
        self.score = 0;
        self.lines = 0;
        self.level = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score() -> Score { Score::new(&GameConfig::default()) }

    #[test]
    fn single_at_level_zero() {
        let mut score = score();
        assert_eq!(score.update(1).points, 40);
        assert_eq!(score.score(), 40);
        assert_eq!(score.lines(), 1);
    }

    #[test]
    fn tetris_at_level_zero() {
        let mut score = score();
        assert_eq!(score.update(4).points, 1_200);
        assert_eq!(score.score(), 1_200);
    }

    #[test]
    fn level_multiplies_points() {
        let mut score = score();
        // 20 lines gets to level 2
        for _ in 0..5 {
            score.update(4);
        }
        assert_eq!(score.level(), 2);
        let before = score.score();
        assert_eq!(score.update(1).points, 120);
        assert_eq!(score.score(), before + 120);
    }

    #[test]
    fn points_table() {
        assert_eq!(Score::points_for(0, 0), 0);
        assert_eq!(Score::points_for(2, 0), 100);
        assert_eq!(Score::points_for(3, 0), 300);
        assert_eq!(Score::points_for(5, 3), 0);
        assert_eq!(Score::points_for(3, 1), 600);
    }

    #[test]
    fn points_use_level_before_the_clear() {
        let mut score = score();
        for _ in 0..9 {
            score.update(1);
        }
        assert_eq!(score.level(), 0);
        // the 10th line levels up, but is still scored at level 0
        assert_eq!(score.update(1), ScoreUpdate { points: 40, levels_gained: 1 });
        assert_eq!(score.level(), 1);
    }

    #[test]
    fn level_up_speeds_up_gravity() {
        let mut score = score();
        for _ in 0..2 {
            score.update(4);
        }
        assert_eq!(score.level(), 0);
        assert_eq!(score.drop_interval(), 1_000);
        score.update(4);
        assert_eq!(score.level(), 1);
        assert_eq!(score.drop_interval(), 940);
    }

    #[test]
    fn multiple_levels_at_once() {
        let mut score = score();
        score.set_drop_interval(500);
        for _ in 0..9 {
            score.update(1);
        }
        assert_eq!(score.update(4).levels_gained, 1);
        assert_eq!(score.drop_interval(), 440);

        // a single clear crossing two level boundaries
        score.lines = 29;
        assert_eq!(score.update(4).levels_gained, 2);
        assert_eq!(score.level(), 3);
        assert_eq!(score.drop_interval(), 320);
    }

    #[test]
    fn drop_interval_has_a_floor() {
        let mut score = score();
        score.set_drop_interval(150);
        for _ in 0..10 {
            score.update(4);
        }
        assert_eq!(score.drop_interval(), 120);
    }

    #[test]
    fn fast_custom_interval_is_never_slowed() {
        let mut score = score();
        score.set_drop_interval(50);
        for _ in 0..3 {
            score.update(4);
        }
        assert_eq!(score.level(), 1);
        assert_eq!(score.drop_interval(), 50);
    }

    #[test]
    fn reset_keeps_drop_interval() {
        let mut score = score();
        for _ in 0..3 {
            score.update(4);
        }
        score.reset();
        assert_eq!((score.score(), score.lines(), score.level()), (0, 0, 0));
        assert_eq!(score.drop_interval(), 940);
    }
}
