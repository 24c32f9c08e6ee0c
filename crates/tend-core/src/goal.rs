//! User-authored multi-step goals, independent of rituals and points.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A multi-step objective. Steps are immutable once created; only their
/// completion state changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub emoji: String,
    pub steps: Vec<String>,
    pub completed_steps: BTreeSet<usize>,
    pub created_at: String,
}

impl Goal {
    /// Completion percentage. A zero-step goal is 0%, never a division by zero.
    pub fn progress_percent(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        100.0 * self.completed_steps.len() as f64 / self.steps.len() as f64
    }

    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.completed_steps.len() == self.steps.len()
    }
}

/// All of a user's goals, in creation order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoalBoard {
    pub goals: Vec<Goal>,
}

impl GoalBoard {
    /// Author a new goal. Rejects an empty or whitespace-only title by
    /// returning `None` (the caller keeps its form data). Blank steps are
    /// filtered out; a goal may legally end up with zero steps.
    pub fn create_goal(
        &mut self,
        title: &str,
        description: &str,
        category: &str,
        emoji: &str,
        steps: &[String],
        created_at: &str,
    ) -> Option<Uuid> {
        if title.trim().is_empty() {
            return None;
        }

        let steps: Vec<String> = steps
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .collect();

        let id = Uuid::new_v4();
        self.goals.push(Goal {
            id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category: category.to_string(),
            emoji: emoji.to_string(),
            steps,
            completed_steps: BTreeSet::new(),
            created_at: created_at.to_string(),
        });
        Some(id)
    }

    /// Flip completion of one step. Unknown goal or out-of-range index is a
    /// no-op. Returns the goal's progress after the flip. Reaching 100% is a
    /// display state, not terminal; steps may be un-toggled afterward.
    pub fn toggle_step(&mut self, goal_id: Uuid, step_index: usize) -> Option<f64> {
        let goal = self.goals.iter_mut().find(|g| g.id == goal_id)?;
        if step_index >= goal.steps.len() {
            return None;
        }
        if !goal.completed_steps.remove(&step_index) {
            goal.completed_steps.insert(step_index);
        }
        Some(goal.progress_percent())
    }

    /// Destroy a goal. Returns whether anything was removed.
    pub fn remove_goal(&mut self, goal_id: Uuid) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != goal_id);
        self.goals.len() != before
    }

    pub fn get(&self, goal_id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}
