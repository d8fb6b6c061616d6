//! Level math: level ⇄ cumulative XP, and level titles.

use jobquest_core::{UserStats, XpAction, XpGained};
use serde::{Deserialize, Serialize};

/// Level curve configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// XP span of level 1
    pub base_xp: u64,
    /// Growth factor of each following level
    pub multiplier: f64,
    /// Highest reachable level
    pub max_level: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            base_xp: 100,
            multiplier: 1.5,
            max_level: 100,
        }
    }
}

/// Level titles, by lowest level that earns them.
pub const LEVEL_TITLES: &[(u32, &str)] = &[
    (1, "Job Seeker Novice"),
    (5, "Application Apprentice"),
    (10, "Resume Warrior"),
    (15, "Interview Knight"),
    (20, "Career Crusader"),
    (30, "Opportunity Hunter"),
    (40, "Professional Pioneer"),
    (50, "Employment Elite"),
    (60, "Career Champion"),
    (70, "Job Master"),
    (80, "Legendary Applicant"),
    (90, "Career Conqueror"),
    (100, "Ultimate Job Tracker"),
];

/// Pure level calculator with a precomputed cumulative XP table.
#[derive(Debug, Clone)]
pub struct LevelCalculator {
    config: LevelConfig,
    /// `cumulative[k]` = XP needed to finish levels `1..=k`
    cumulative: Vec<u64>,
}

impl LevelCalculator {
    /// Build the calculator.
    ///
    /// # Panics
    /// On a config with `max_level == 0`, `base_xp == 0` or a multiplier
    /// below 1; the level curve is static configuration.
    pub fn new(config: LevelConfig) -> Self {
        assert!(config.max_level >= 1, "max_level must be at least 1");
        assert!(config.base_xp > 0, "base_xp must be positive");
        assert!(config.multiplier >= 1.0, "multiplier must be at least 1.0");

        let mut cumulative = Vec::with_capacity(config.max_level as usize + 1);
        cumulative.push(0u64);
        let mut sum = 0u64;
        for level in 1..=config.max_level {
            sum = sum.saturating_add(xp_span(&config, level));
            cumulative.push(sum);
        }

        Self { config, cumulative }
    }

    /// The config this calculator was built from.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Highest reachable level.
    pub fn max_level(&self) -> u32 {
        self.config.max_level
    }

    /// XP span of `level`: `floor(base_xp * multiplier^(level-1))`.
    pub fn xp_for_level(&self, level: u32) -> u64 {
        xp_span(&self.config, level.clamp(1, self.config.max_level))
    }

    /// XP needed to finish levels `1..=level`. Zero for level 0.
    pub fn cumulative_through(&self, level: u32) -> u64 {
        self.cumulative[level.min(self.config.max_level) as usize]
    }

    /// Largest level `L` (capped at `max_level`) with
    /// `cumulative_through(L - 1) <= total_xp`.
    pub fn level_from_total_xp(&self, total_xp: u64) -> u32 {
        let starts = &self.cumulative[..self.config.max_level as usize];
        // starts[0] == 0, so at least level 1 is always reached
        starts.partition_point(|&start| start <= total_xp) as u32
    }

    /// Title for `level`.
    pub fn title_for(&self, level: u32) -> &'static str {
        LEVEL_TITLES
            .iter()
            .rev()
            .find(|(threshold, _)| *threshold <= level)
            .map(|(_, title)| *title)
            .unwrap_or(LEVEL_TITLES[0].1)
    }

    /// Add `amount` XP to `stats`, handling (multi-)level-ups.
    pub fn apply_xp(&self, stats: &mut UserStats, action: XpAction, amount: u64) -> XpGained {
        let previous_level = stats.level;
        stats.total_xp = stats.total_xp.saturating_add(amount);
        stats.current_xp = stats.current_xp.saturating_add(amount);

        let new_level = self.level_from_total_xp(stats.total_xp);
        let leveled_up = new_level > previous_level;
        if leveled_up {
            stats.level = new_level;
            stats.current_xp = stats.total_xp - self.cumulative_through(new_level - 1);
            stats.next_level_xp = self.xp_for_level(new_level);
            stats.title = self.title_for(new_level).to_string();
        }

        XpGained {
            amount,
            action,
            total_xp: stats.total_xp,
            current_xp: stats.current_xp,
            level: stats.level,
            leveled_up,
            previous_level,
            title: stats.title.clone(),
        }
    }
}

impl Default for LevelCalculator {
    fn default() -> Self {
        Self::new(LevelConfig::default())
    }
}

fn xp_span(config: &LevelConfig, level: u32) -> u64 {
    let exponent = f64::from(level.saturating_sub(1));
    // f64 -> u64 casts saturate, which caps the far end of the curve
    (config.base_xp as f64 * config.multiplier.powf(exponent)).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobquest_core::UserId;

    fn fresh() -> UserStats {
        UserStats::new(UserId::new("alice"), 100, "Job Seeker Novice")
    }

    #[test]
    fn test_xp_for_level_follows_curve() {
        let calc = LevelCalculator::default();
        assert_eq!(calc.xp_for_level(1), 100);
        assert_eq!(calc.xp_for_level(2), 150);
        assert_eq!(calc.xp_for_level(3), 225);
        assert_eq!(calc.xp_for_level(4), 337);
    }

    #[test]
    fn test_far_levels_use_real_exponent() {
        let calc = LevelCalculator::default();
        assert_eq!(calc.xp_for_level(10), 3844);
        assert_eq!(calc.xp_for_level(82), 18_339_689_708_355_696);
        assert_eq!(calc.xp_for_level(99), 18_069_385_668_231_788_544);
    }

    #[test]
    fn test_cumulative_table() {
        let calc = LevelCalculator::default();
        assert_eq!(calc.cumulative_through(0), 0);
        assert_eq!(calc.cumulative_through(1), 100);
        assert_eq!(calc.cumulative_through(2), 250);
        assert_eq!(calc.cumulative_through(3), 475);
    }

    #[test]
    fn test_level_boundaries() {
        let calc = LevelCalculator::default();
        assert_eq!(calc.level_from_total_xp(0), 1);
        assert_eq!(calc.level_from_total_xp(99), 1);
        assert_eq!(calc.level_from_total_xp(100), 2);
        assert_eq!(calc.level_from_total_xp(249), 2);
        assert_eq!(calc.level_from_total_xp(250), 3);
    }

    #[test]
    fn test_level_is_unique_for_every_total() {
        let calc = LevelCalculator::default();
        for total in (0..20_000u64).step_by(7) {
            let level = calc.level_from_total_xp(total);
            assert!(calc.cumulative_through(level - 1) <= total);
            assert!(total < calc.cumulative_through(level));
        }
    }

    #[test]
    fn test_level_is_capped() {
        let calc = LevelCalculator::default();
        assert_eq!(calc.level_from_total_xp(u64::MAX), 100);

        let small = LevelCalculator::new(LevelConfig {
            base_xp: 10,
            multiplier: 1.0,
            max_level: 3,
        });
        assert_eq!(small.level_from_total_xp(29), 3);
        assert_eq!(small.level_from_total_xp(1_000), 3);
    }

    #[test]
    fn test_titles() {
        let calc = LevelCalculator::default();
        assert_eq!(calc.title_for(1), "Job Seeker Novice");
        assert_eq!(calc.title_for(4), "Job Seeker Novice");
        assert_eq!(calc.title_for(5), "Application Apprentice");
        assert_eq!(calc.title_for(29), "Career Crusader");
        assert_eq!(calc.title_for(100), "Ultimate Job Tracker");
    }

    #[test]
    fn test_apply_xp_within_level() {
        let calc = LevelCalculator::default();
        let mut stats = fresh();

        let gained = calc.apply_xp(&mut stats, XpAction::DailyLogin, 25);
        assert!(!gained.leveled_up);
        assert_eq!((stats.level, stats.current_xp, stats.total_xp), (1, 25, 25));
    }

    #[test]
    fn test_apply_xp_level_up_keeps_overflow() {
        let calc = LevelCalculator::default();
        let mut stats = fresh();

        calc.apply_xp(&mut stats, XpAction::DailyLogin, 25);
        let gained = calc.apply_xp(&mut stats, XpAction::ApplicationUpdated, 100);

        assert!(gained.leveled_up);
        assert_eq!(gained.previous_level, 1);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.current_xp, 25);
        assert_eq!(stats.total_xp, 125);
        assert_eq!(stats.next_level_xp, 150);
    }

    #[test]
    fn test_apply_xp_multi_level_jump() {
        let calc = LevelCalculator::default();
        let mut stats = fresh();

        let gained = calc.apply_xp(&mut stats, XpAction::HundredApplications, 2_500);
        // cumulative: 100, 250, 475, 812, 1318, 2077, 3216
        assert_eq!(stats.level, 7);
        assert_eq!(stats.current_xp, 2_500 - 2_077);
        assert_eq!(stats.next_level_xp, calc.xp_for_level(7));
        assert_eq!(stats.title, "Application Apprentice");
        assert_eq!(gained.previous_level, 1);
    }

    #[test]
    #[should_panic(expected = "max_level")]
    fn test_zero_max_level_is_rejected() {
        LevelCalculator::new(LevelConfig {
            max_level: 0,
            ..LevelConfig::default()
        });
    }
}
