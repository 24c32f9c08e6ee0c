use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use uuid::Uuid;

use tend_core::progress::POINTS_PER_LEVEL;
use tend_core::{Goal, GoalBoard, ProgressState};

use crate::error::{Result, StoreError};
use crate::schema;

/// Default base directory for tend storage.
pub fn default_data_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".tend")
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Save (full snapshot overwrite) ---

    pub fn save_state(&self, progress: &ProgressState, goals: &GoalBoard) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute_batch(
            "DELETE FROM completed_rituals;
             DELETE FROM streaks;
             DELETE FROM unlocked_achievements;
             DELETE FROM goal_steps;
             DELETE FROM goals;",
        )?;

        set_metadata_on(&tx, "user_name", &progress.user_name)?;
        set_metadata_on(&tx, "total_points", &progress.total_points.to_string())?;
        set_metadata_on(&tx, "level", &progress.level.to_string())?;

        {
            let mut stmt = tx.prepare("INSERT INTO completed_rituals (ritual_id) VALUES (?1)")?;
            for id in &progress.completed_rituals {
                stmt.execute([id])?;
            }
        }
        {
            let mut stmt = tx.prepare("INSERT INTO streaks (ritual_id, count) VALUES (?1, ?2)")?;
            for (id, count) in &progress.streaks {
                stmt.execute(params![id, count])?;
            }
        }
        {
            let mut stmt =
                tx.prepare("INSERT INTO unlocked_achievements (achievement_id) VALUES (?1)")?;
            for id in &progress.unlocked_achievements {
                stmt.execute([id])?;
            }
        }

        for (position, goal) in goals.goals.iter().enumerate() {
            save_goal_on(&tx, goal, position)?;
        }

        tx.commit()?;
        tracing::debug!(
            points = progress.total_points,
            goals = goals.len(),
            "snapshot saved"
        );
        Ok(())
    }

    // --- Load (per-field defaulting, never a hard failure on absence) ---

    pub fn load_state(&self) -> Result<(ProgressState, GoalBoard)> {
        let user_name = self
            .get_metadata("user_name")?
            .unwrap_or_else(|| "Friend".to_string());
        let total_points: u32 = self
            .get_metadata("total_points")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let completed_rituals = self.load_string_set("SELECT ritual_id FROM completed_rituals")?;
        let unlocked_achievements =
            self.load_string_set("SELECT achievement_id FROM unlocked_achievements")?;

        let mut streaks = std::collections::BTreeMap::new();
        let mut stmt = self.conn.prepare("SELECT ritual_id, count FROM streaks")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;
        for row in rows {
            let (id, count) = row?;
            streaks.insert(id, count);
        }

        let progress = ProgressState {
            completed_rituals,
            streaks,
            total_points,
            // Re-derive rather than trusting the stored value
            level: total_points / POINTS_PER_LEVEL + 1,
            user_name,
            unlocked_achievements,
        };

        Ok((progress, self.load_goals()?))
    }

    fn load_string_set(&self, sql: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut set = BTreeSet::new();
        for row in rows {
            set.insert(row?);
        }
        Ok(set)
    }

    fn load_goals(&self) -> Result<GoalBoard> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, category, emoji, created_at
             FROM goals ORDER BY position",
        )?;
        let rows: Vec<(String, String, String, String, String, String)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<std::result::Result<_, _>>()?;

        let mut goals = Vec::with_capacity(rows.len());
        for (id_str, title, description, category, emoji, created_at) in rows {
            let id = parse_uuid(&id_str)?;
            let (steps, completed_steps) = self.load_steps(&id_str)?;
            goals.push(Goal {
                id,
                title,
                description,
                category,
                emoji,
                steps,
                completed_steps,
                created_at,
            });
        }

        Ok(GoalBoard { goals })
    }

    fn load_steps(&self, goal_id: &str) -> Result<(Vec<String>, BTreeSet<usize>)> {
        let mut stmt = self.conn.prepare(
            "SELECT step_index, text, completed FROM goal_steps
             WHERE goal_id = ?1 ORDER BY step_index",
        )?;
        let rows: Vec<(usize, String, bool)> = stmt
            .query_map([goal_id], |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)? != 0,
                ))
            })?
            .collect::<std::result::Result<_, _>>()?;

        let mut steps = Vec::with_capacity(rows.len());
        let mut completed = BTreeSet::new();
        for (index, text, done) in rows {
            if done {
                completed.insert(index);
            }
            steps.push(text);
        }
        Ok((steps, completed))
    }
}

fn set_metadata_on(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn save_goal_on(conn: &Connection, goal: &Goal, position: usize) -> Result<()> {
    conn.execute(
        "INSERT INTO goals (id, position, title, description, category, emoji, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            goal.id.to_string(),
            position as i64,
            goal.title,
            goal.description,
            goal.category,
            goal.emoji,
            goal.created_at,
        ],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO goal_steps (goal_id, step_index, text, completed) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (index, text) in goal.steps.iter().enumerate() {
        stmt.execute(params![
            goal.id.to_string(),
            index as i64,
            text,
            goal.completed_steps.contains(&index) as i64,
        ])?;
    }
    Ok(())
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("invalid UUID '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tend_core::Catalog;

    fn make_state() -> (ProgressState, GoalBoard) {
        let catalog = Catalog::builtin();
        let mut progress = ProgressState::new("Maya");
        progress.toggle_ritual(&catalog, "homework");
        progress.toggle_ritual(&catalog, "made-bed");

        let mut board = GoalBoard::default();
        let id = board
            .create_goal(
                "Learn to juggle",
                "three balls, then four",
                "Personal",
                "🤹",
                &["Get beanbags".to_string(), "Practice daily".to_string()],
                "2026-08-31T09:00:00Z",
            )
            .unwrap();
        board.toggle_step(id, 0);
        (progress, board)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let (progress, board) = make_state();

        store.save_state(&progress, &board).unwrap();
        let (loaded, loaded_board) = store.load_state().unwrap();

        assert_eq!(loaded.user_name, "Maya");
        assert_eq!(loaded.total_points, 15);
        assert_eq!(loaded.level, 1);
        assert_eq!(loaded.completed_rituals, progress.completed_rituals);
        assert_eq!(loaded.streaks, progress.streaks);
        assert_eq!(loaded.unlocked_achievements, progress.unlocked_achievements);

        assert_eq!(loaded_board.len(), 1);
        let goal = &loaded_board.goals[0];
        assert_eq!(goal.title, "Learn to juggle");
        assert_eq!(goal.steps.len(), 2);
        assert!(goal.completed_steps.contains(&0));
        assert!(!goal.completed_steps.contains(&1));
    }

    #[test]
    fn test_load_empty_db_gives_defaults() {
        let store = Store::open_in_memory().unwrap();
        let (progress, board) = store.load_state().unwrap();

        assert_eq!(progress.user_name, "Friend");
        assert_eq!(progress.total_points, 0);
        assert_eq!(progress.level, 1);
        assert!(progress.completed_rituals.is_empty());
        assert!(progress.streaks.is_empty());
        assert!(board.is_empty());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let store = Store::open_in_memory().unwrap();
        let (progress, board) = make_state();

        store.save_state(&progress, &board).unwrap();

        let catalog = Catalog::builtin();
        let mut progress = progress;
        progress.toggle_ritual(&catalog, "homework"); // undo
        store.save_state(&progress, &board).unwrap();

        let (loaded, loaded_board) = store.load_state().unwrap();
        assert_eq!(loaded.total_points, 5);
        assert!(!loaded.is_completed("homework"));
        assert_eq!(loaded.streak("homework"), 1);
        assert_eq!(loaded_board.len(), 1);
    }

    #[test]
    fn test_level_rederived_from_corrupt_metadata() {
        let store = Store::open_in_memory().unwrap();
        store.set_metadata("total_points", "250").unwrap();
        store.set_metadata("level", "99").unwrap();

        let (progress, _) = store.load_state().unwrap();
        assert_eq!(progress.total_points, 250);
        assert_eq!(progress.level, 3);
    }

    #[test]
    fn test_unparseable_points_default_to_zero() {
        let store = Store::open_in_memory().unwrap();
        store.set_metadata("total_points", "not-a-number").unwrap();

        let (progress, _) = store.load_state().unwrap();
        assert_eq!(progress.total_points, 0);
        assert_eq!(progress.level, 1);
    }

    #[test]
    fn test_goal_order_preserved() {
        let store = Store::open_in_memory().unwrap();
        let mut board = GoalBoard::default();
        for title in ["first", "second", "third"] {
            board.create_goal(title, "", "Personal", "⭐", &[], "t");
        }
        store.save_state(&ProgressState::default(), &board).unwrap();

        let (_, loaded) = store.load_state().unwrap();
        let titles: Vec<&str> = loaded.goals.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tend.db");
        let store = Store::open(&path).unwrap();
        store
            .save_state(&ProgressState::default(), &GoalBoard::default())
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_metadata() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_metadata("foo").unwrap().is_none());
        store.set_metadata("foo", "bar").unwrap();
        assert_eq!(store.get_metadata("foo").unwrap(), Some("bar".to_string()));
    }
}
