use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS completed_rituals (
            ritual_id TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS streaks (
            ritual_id TEXT PRIMARY KEY,
            count     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS unlocked_achievements (
            achievement_id TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS goals (
            id          TEXT PRIMARY KEY,
            position    INTEGER NOT NULL,
            title       TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category    TEXT NOT NULL DEFAULT '',
            emoji       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS goal_steps (
            goal_id    TEXT NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
            step_index INTEGER NOT NULL,
            text       TEXT NOT NULL,
            completed  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (goal_id, step_index)
        );

        CREATE INDEX IF NOT EXISTS idx_steps_goal ON goal_steps(goal_id);
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT value FROM metadata WHERE key = 'schema_version'")?;
    let version = stmt
        .query_row([], |row| {
            let v: String = row.get(0)?;
            Ok(v.parse::<i64>().unwrap_or(0))
        })
        .ok();
    Ok(version)
}
