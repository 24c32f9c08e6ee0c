//! JSON wire format for the persisted snapshot.
//!
//! One camelCase object; every field carries a default so a partial or
//! malformed-but-parseable record loads without a hard failure. `goals` and
//! `unlockedAchievements` are absent in records written by older versions
//! and default to empty.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::{Goal, GoalBoard};
use crate::progress::{POINTS_PER_LEVEL, ProgressState};

#[derive(Serialize, Deserialize, Debug)]
pub struct WireRecord {
    #[serde(rename = "completedRituals", default)]
    pub completed_rituals: Vec<String>,
    #[serde(default)]
    pub streaks: BTreeMap<String, u32>,
    #[serde(rename = "totalPoints", default)]
    pub total_points: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(rename = "userName", default = "default_user_name")]
    pub user_name: String,
    #[serde(rename = "unlockedAchievements", default)]
    pub unlocked_achievements: Vec<String>,
    #[serde(default)]
    pub goals: Vec<WireGoal>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WireGoal {
    /// A goal entry missing its id gets a fresh one rather than failing the
    /// whole record.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(rename = "completedSteps", default)]
    pub completed_steps: Vec<usize>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

fn default_level() -> u32 {
    1
}

fn default_user_name() -> String {
    "Friend".to_string()
}

impl WireRecord {
    pub fn from_state(progress: &ProgressState, goals: &GoalBoard) -> Self {
        Self {
            completed_rituals: progress.completed_rituals.iter().cloned().collect(),
            streaks: progress.streaks.clone(),
            total_points: progress.total_points,
            level: progress.level,
            user_name: progress.user_name.clone(),
            unlocked_achievements: progress.unlocked_achievements.iter().cloned().collect(),
            goals: goals.goals.iter().map(WireGoal::from_goal).collect(),
        }
    }

    /// Rebuild engine state. Level is re-derived from points so a record with
    /// a stale or missing level still satisfies the level invariant.
    pub fn into_state(self) -> (ProgressState, GoalBoard) {
        let progress = ProgressState {
            completed_rituals: self.completed_rituals.into_iter().collect(),
            streaks: self.streaks,
            total_points: self.total_points,
            level: self.total_points / POINTS_PER_LEVEL + 1,
            user_name: self.user_name,
            unlocked_achievements: self.unlocked_achievements.into_iter().collect(),
        };
        let board = GoalBoard {
            goals: self.goals.into_iter().map(WireGoal::into_goal).collect(),
        };
        (progress, board)
    }
}

impl WireGoal {
    fn from_goal(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title.clone(),
            description: goal.description.clone(),
            category: goal.category.clone(),
            emoji: goal.emoji.clone(),
            steps: goal.steps.clone(),
            completed_steps: goal.completed_steps.iter().copied().collect(),
            created_at: goal.created_at.clone(),
        }
    }

    fn into_goal(self) -> Goal {
        // Indices past the step list can appear in hand-edited records; drop them
        let step_count = self.steps.len();
        let completed_steps: BTreeSet<usize> = self
            .completed_steps
            .into_iter()
            .filter(|i| *i < step_count)
            .collect();
        Goal {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            emoji: self.emoji,
            steps: self.steps,
            completed_steps,
            created_at: self.created_at,
        }
    }
}

/// Serialize the full snapshot to pretty JSON.
pub fn export_json(progress: &ProgressState, goals: &GoalBoard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&WireRecord::from_state(progress, goals))
}

/// Parse a wire record, applying per-field defaults.
pub fn import_json(json: &str) -> serde_json::Result<(ProgressState, GoalBoard)> {
    let record: WireRecord = serde_json::from_str(json)?;
    Ok(record.into_state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_empty_object_loads_defaults() {
        let (progress, goals) = import_json("{}").unwrap();
        assert!(progress.completed_rituals.is_empty());
        assert!(progress.streaks.is_empty());
        assert_eq!(progress.total_points, 0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.user_name, "Friend");
        assert!(progress.unlocked_achievements.is_empty());
        assert!(goals.is_empty());
    }

    #[test]
    fn test_partial_record_defaults_per_field() {
        let (progress, _) =
            import_json(r#"{"totalPoints": 250, "userName": "Maya"}"#).unwrap();
        assert_eq!(progress.total_points, 250);
        assert_eq!(progress.user_name, "Maya");
        // level re-derived from points, not left at the field default
        assert_eq!(progress.level, 3);
    }

    #[test]
    fn test_roundtrip() {
        let catalog = Catalog::builtin();
        let mut progress = ProgressState::new("Maya");
        progress.toggle_ritual(&catalog, "homework");
        progress.toggle_ritual(&catalog, "made-bed");

        let mut board = GoalBoard::default();
        let goal_id = board
            .create_goal(
                "Learn chess",
                "openings first",
                "Personal",
                "♟️",
                &["Learn the moves".to_string(), "Play a game".to_string()],
                "2026-08-31T10:00:00Z",
            )
            .unwrap();
        board.toggle_step(goal_id, 0);

        let json = export_json(&progress, &board).unwrap();
        let (loaded_progress, loaded_board) = import_json(&json).unwrap();

        assert_eq!(loaded_progress.completed_rituals, progress.completed_rituals);
        assert_eq!(loaded_progress.streaks, progress.streaks);
        assert_eq!(loaded_progress.total_points, 15);
        assert_eq!(loaded_progress.level, 1);
        assert_eq!(
            loaded_progress.unlocked_achievements,
            progress.unlocked_achievements
        );
        assert_eq!(loaded_board.len(), 1);
        let goal = loaded_board.get(goal_id).unwrap();
        assert_eq!(goal.steps.len(), 2);
        assert!(goal.completed_steps.contains(&0));
    }

    #[test]
    fn test_camel_case_field_names() {
        let progress = ProgressState::default();
        let json = export_json(&progress, &GoalBoard::default()).unwrap();
        assert!(json.contains("\"completedRituals\""));
        assert!(json.contains("\"totalPoints\""));
        assert!(json.contains("\"userName\""));
        assert!(json.contains("\"unlockedAchievements\""));
    }

    #[test]
    fn test_goal_without_id_gets_one() {
        let json = r#"{
            "goals": [
                {"title": "no id here", "steps": ["one"]},
                {"id": "6b7f9d80-1111-2222-3333-444455556666", "title": "has id"}
            ]
        }"#;
        let (_, board) = import_json(json).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.goals[0].title, "no id here");
        assert_ne!(board.goals[0].id, board.goals[1].id);
    }

    #[test]
    fn test_out_of_range_step_indices_dropped() {
        let json = r#"{
            "goals": [{
                "id": "6b7f9d80-1111-2222-3333-444455556666",
                "title": "g",
                "steps": ["one"],
                "completedSteps": [0, 7]
            }]
        }"#;
        let (_, board) = import_json(json).unwrap();
        let goal = &board.goals[0];
        assert_eq!(goal.completed_steps.len(), 1);
        assert!((goal.progress_percent() - 100.0).abs() < 1e-9);
    }
}
