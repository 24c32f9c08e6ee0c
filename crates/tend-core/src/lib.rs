//! Engagement state engine and scripted companion dialogue.
//!
//! Users check off catalog-defined recurring actions ("rituals"), accrue
//! points, level up, hold per-ritual streaks, author multi-step goals, and
//! chat with a keyword-matched companion. State transitions live here;
//! storage and presentation are collaborators.
//!
//! Zero I/O: the engine takes time and randomness as arguments and has no
//! opinions about transport or persistence.

pub mod achievement;
pub mod catalog;
pub mod dialogue;
pub mod goal;
pub mod progress;
pub mod session;
pub mod time;
pub mod wire;

pub use achievement::{Achievement, ACHIEVEMENTS, compute_unlocked, next_achievement};
pub use catalog::{Catalog, RitualCategory, RitualDefinition};
pub use dialogue::{Intent, QUICK_ACTIONS, classify, select_reply};
pub use goal::{Goal, GoalBoard};
pub use progress::{ProgressState, ToggleOutcome};
pub use session::{ChatSession, Message, Sender, REPLY_DELAY_MS};
pub use time::{now_iso8601, now_unix_millis, now_unix_secs, unix_to_iso8601};
pub use wire::{export_json, import_json};
