//! Daily login streak tracking.

use jobquest_core::{Day, UserStats};
use serde::{Deserialize, Serialize};

/// What a login check did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginCheck {
    /// Today's login was already counted
    AlreadyCounted,
    /// Last login was yesterday; the streak grew
    Continued {
        /// Streak after the check
        streak: u32,
    },
    /// First login, a gap of two or more days, or a login dated in the
    /// future; the streak restarted at 1
    Restarted,
}

impl LoginCheck {
    /// Whether this check counted a new login day.
    pub fn is_new_day(&self) -> bool {
        !matches!(self, LoginCheck::AlreadyCounted)
    }
}

/// Calendar-day streak rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakTracker;

impl StreakTracker {
    /// Count a login on `today`.
    ///
    /// Compares calendar days, not elapsed time. Any recorded login other
    /// than today or yesterday restarts the streak, including one dated after
    /// `today` when the clock moved backwards.
    pub fn check_in(stats: &mut UserStats, today: Day) -> LoginCheck {
        let outcome = match stats.last_login_date {
            Some(last) if last == today => return LoginCheck::AlreadyCounted,
            Some(last) if today.pred_opt() == Some(last) => {
                stats.current_streak = stats.current_streak.saturating_add(1);
                LoginCheck::Continued {
                    streak: stats.current_streak,
                }
            }
            _ => {
                stats.current_streak = 1;
                LoginCheck::Restarted
            }
        };

        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        stats.last_login_date = Some(today);
        outcome
    }
}
