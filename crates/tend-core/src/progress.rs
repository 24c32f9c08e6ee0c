//! Mutable engagement state and its single transition, `toggle_ritual`.
//!
//! All point arithmetic reads the catalog's per-ritual value, the one source
//! of truth. Level is derived from points after every transition. The unlocked
//! achievement set is sticky: it only grows, even when the counters that
//! earned an achievement later regress.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::achievement;
use crate::catalog::Catalog;

/// Points per level tier: `level = total_points / 100 + 1`.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Engagement state snapshot. Mutated only through [`ProgressState::toggle_ritual`]
/// and [`ProgressState::set_user_name`]; persisted as a whole after every change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressState {
    pub completed_rituals: BTreeSet<String>,
    pub streaks: BTreeMap<String, u32>,
    pub total_points: u32,
    pub level: u32,
    pub user_name: String,
    pub unlocked_achievements: BTreeSet<String>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            completed_rituals: BTreeSet::new(),
            streaks: BTreeMap::new(),
            total_points: 0,
            level: 1,
            user_name: "Friend".to_string(),
            unlocked_achievements: BTreeSet::new(),
        }
    }
}

/// What a toggle did, for the caller to narrate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Unknown ritual id; state untouched.
    Ignored,
    /// Ritual marked complete.
    Completed {
        points_earned: u32,
        /// New level, when the toggle crossed a tier boundary upward.
        leveled_up: Option<u32>,
        /// Achievement ids that became unlocked by this toggle.
        newly_unlocked: Vec<&'static str>,
    },
    /// Ritual unmarked. Points refunded (floored at zero); streak untouched.
    Uncompleted { points_lost: u32 },
}

impl ProgressState {
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            ..Self::default()
        }
    }

    /// Flip completion of a ritual.
    ///
    /// Completing adds the catalog point value and bumps the ritual's streak.
    /// Un-completing removes the same value (saturating at zero) but leaves
    /// the streak alone; undo must not erase streak history. Two consecutive
    /// toggles restore points and completion exactly; the streak counter is
    /// the one deliberate exception.
    pub fn toggle_ritual(&mut self, catalog: &Catalog, ritual_id: &str) -> ToggleOutcome {
        let Some(ritual) = catalog.ritual(ritual_id) else {
            return ToggleOutcome::Ignored;
        };

        let outcome = if self.completed_rituals.remove(ritual_id) {
            self.total_points = self.total_points.saturating_sub(ritual.point_value);
            ToggleOutcome::Uncompleted {
                points_lost: ritual.point_value,
            }
        } else {
            self.completed_rituals.insert(ritual_id.to_string());
            self.total_points += ritual.point_value;
            *self.streaks.entry(ritual_id.to_string()).or_insert(0) += 1;

            let previous_level = self.level;
            self.recompute_level();
            let leveled_up = (self.level > previous_level).then_some(self.level);

            ToggleOutcome::Completed {
                points_earned: ritual.point_value,
                leveled_up,
                newly_unlocked: achievement::refresh_unlocked(self, catalog),
            }
        };

        self.recompute_level();
        outcome
    }

    pub fn set_user_name(&mut self, name: &str) {
        self.user_name = name.to_string();
    }

    /// Highest streak across all rituals, 0 when none.
    pub fn max_streak(&self) -> u32 {
        self.streaks.values().copied().max().unwrap_or(0)
    }

    pub fn is_completed(&self, ritual_id: &str) -> bool {
        self.completed_rituals.contains(ritual_id)
    }

    pub fn streak(&self, ritual_id: &str) -> u32 {
        self.streaks.get(ritual_id).copied().unwrap_or(0)
    }

    /// Points earned so far within the current level tier.
    pub fn points_into_level(&self) -> u32 {
        self.total_points % POINTS_PER_LEVEL
    }

    fn recompute_level(&mut self) {
        self.level = self.total_points / POINTS_PER_LEVEL + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    #[test]
    fn test_complete_earns_catalog_points() {
        let catalog = catalog();
        let mut state = ProgressState::default();

        let outcome = state.toggle_ritual(&catalog, "homework");
        assert!(matches!(
            outcome,
            ToggleOutcome::Completed {
                points_earned: 10,
                ..
            }
        ));
        assert_eq!(state.total_points, 10);
        assert!(state.is_completed("homework"));
        assert_eq!(state.streak("homework"), 1);

        // 5-point ritual uses its own catalog value
        state.toggle_ritual(&catalog, "made-bed");
        assert_eq!(state.total_points, 15);
    }

    #[test]
    fn test_toggle_symmetry_except_streak() {
        let catalog = catalog();
        let mut state = ProgressState::default();

        state.toggle_ritual(&catalog, "homework");
        let outcome = state.toggle_ritual(&catalog, "homework");

        assert_eq!(outcome, ToggleOutcome::Uncompleted { points_lost: 10 });
        assert_eq!(state.total_points, 0);
        assert!(state.completed_rituals.is_empty());
        // Undo does not erase streak history
        assert_eq!(state.streak("homework"), 1);
    }

    #[test]
    fn test_unknown_ritual_ignored() {
        let catalog = catalog();
        let mut state = ProgressState::default();

        let outcome = state.toggle_ritual(&catalog, "does-not-exist");
        assert_eq!(outcome, ToggleOutcome::Ignored);
        assert_eq!(state.total_points, 0);
        assert!(state.completed_rituals.is_empty());
        assert!(state.streaks.is_empty());
    }

    #[test]
    fn test_points_floor_at_zero() {
        let catalog = catalog();
        let mut state = ProgressState::default();
        state.toggle_ritual(&catalog, "homework");
        // Simulate a drained balance (e.g. loaded from an older snapshot)
        state.total_points = 0;

        state.toggle_ritual(&catalog, "homework");
        assert_eq!(state.total_points, 0, "deduction must saturate at zero");
    }

    #[test]
    fn test_level_formula() {
        let catalog = catalog();
        let mut state = ProgressState::default();

        state.total_points = 99;
        state.toggle_ritual(&catalog, "made-bed"); // +5 -> 104
        assert_eq!(state.level, 2);

        state.total_points = 245;
        state.toggle_ritual(&catalog, "drank-water"); // +5 -> 250
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_level_up_surfaced() {
        let catalog = catalog();
        let mut state = ProgressState::default();
        state.total_points = 95;

        let outcome = state.toggle_ritual(&catalog, "homework"); // 95 -> 105
        match outcome {
            ToggleOutcome::Completed { leveled_up, .. } => {
                assert_eq!(leveled_up, Some(2));
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn test_level_tracks_points_downward() {
        let catalog = catalog();
        let mut state = ProgressState::default();
        state.completed_rituals.insert("homework".to_string());
        state.total_points = 100;
        state.level = 2;

        state.toggle_ritual(&catalog, "homework"); // 100 -> 90
        assert_eq!(state.level, 1, "level is derived, not ratcheted");
    }

    #[test]
    fn test_repeated_completion_grows_streak() {
        let catalog = catalog();
        let mut state = ProgressState::default();

        for _ in 0..3 {
            state.toggle_ritual(&catalog, "reading"); // complete
            state.toggle_ritual(&catalog, "reading"); // undo
        }
        state.toggle_ritual(&catalog, "reading");
        assert_eq!(state.streak("reading"), 4);
        assert_eq!(state.max_streak(), 4);
    }

    #[test]
    fn test_points_into_level() {
        let mut state = ProgressState::default();
        state.total_points = 237;
        assert_eq!(state.points_into_level(), 37);
    }
}
