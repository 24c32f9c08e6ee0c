//! Achievement predicates over the progress snapshot.
//!
//! `compute_unlocked` is pure and recomputes from live counters, so a
//! predicate can stop holding when counters regress. The sticky set on
//! `ProgressState` papers over that: `refresh_unlocked` unions predicate
//! results in and never removes.

use crate::catalog::Catalog;
use crate::progress::ProgressState;

type Predicate = fn(&ProgressState, &Catalog) -> bool;

/// A named milestone with a predicate over engagement state.
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    predicate: Predicate,
}

impl Achievement {
    pub fn holds(&self, state: &ProgressState, catalog: &Catalog) -> bool {
        (self.predicate)(state, catalog)
    }
}

/// Fixed achievement catalog. Order matters: `next_achievement` surfaces the
/// first locked entry as the "next challenge" hint.
pub static ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: "first-ritual",
        title: "First Steps",
        description: "Completed your very first ritual",
        predicate: |state, _| !state.completed_rituals.is_empty(),
    },
    Achievement {
        id: "streak-3",
        title: "Getting Hot",
        description: "Kept a 3-day streak going",
        predicate: |state, _| state.max_streak() >= 3,
    },
    Achievement {
        id: "streak-7",
        title: "Week Warrior",
        description: "Kept a 7-day streak going",
        predicate: |state, _| state.max_streak() >= 7,
    },
    Achievement {
        id: "level-5",
        title: "Rising Star",
        description: "Reached level 5",
        predicate: |state, _| state.level >= 5,
    },
    Achievement {
        id: "perfect-day",
        title: "Perfect Day",
        description: "Completed every ritual in one day",
        predicate: |state, catalog| state.completed_rituals.len() == catalog.ritual_count(),
    },
];

/// Ids of achievements whose predicate currently holds, in catalog order.
pub fn compute_unlocked(state: &ProgressState, catalog: &Catalog) -> Vec<&'static str> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| a.holds(state, catalog))
        .map(|a| a.id)
        .collect()
}

/// Union currently-holding predicates into the sticky unlocked set.
/// Returns the ids that are new this time, in catalog order.
pub fn refresh_unlocked(state: &mut ProgressState, catalog: &Catalog) -> Vec<&'static str> {
    let mut newly = Vec::new();
    for a in &ACHIEVEMENTS {
        if a.holds(state, catalog) && state.unlocked_achievements.insert(a.id.to_string()) {
            newly.push(a.id);
        }
    }
    newly
}

/// First achievement (catalog order) not yet in the sticky set.
pub fn next_achievement(state: &ProgressState) -> Option<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .find(|a| !state.unlocked_achievements.contains(a.id))
}
