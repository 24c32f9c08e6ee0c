mod chat;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tend_core::{
    ACHIEVEMENTS, Catalog, GoalBoard, ToggleOutcome, next_achievement, now_iso8601,
};
use tend_store::Store;

#[derive(Parser)]
#[command(name = "tend", about = "Ritual tracker, goal board, and companion chat")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the ritual catalog with completion marks and streaks
    Rituals,

    /// Toggle completion of one or more rituals
    Check {
        /// Ritual id(s), e.g. "homework"
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show level, points, streaks, and achievements
    Stats,

    /// Set the profile name used in greetings
    Name { name: String },

    /// Manage multi-step goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Chat with the companion
    Chat,

    /// Export the snapshot to a JSON file
    Export { path: PathBuf },

    /// Import a snapshot from a JSON file, replacing current state
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Create a goal
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "Personal")]
        category: String,
        #[arg(long, default_value = "🎯")]
        emoji: String,
        /// Repeatable: --step "..." --step "..."
        #[arg(long = "step")]
        steps: Vec<String>,
    },

    /// List goals with progress
    List,

    /// Toggle a step: goal number from `goal list`, then 1-based step number
    Step { goal: usize, step: usize },

    /// Delete a goal by its number from `goal list`
    Remove { goal: usize },
}

fn data_dir() -> PathBuf {
    std::env::var("TEND_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(tend_store::default_data_dir)
}

pub(crate) fn open_store() -> Result<Store> {
    let path = data_dir().join("tend.db");
    Store::open(&path).with_context(|| format!("failed to open store at {}", path.display()))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = Catalog::builtin();

    match &cli.command {
        Commands::Rituals => cmd_rituals(&catalog),
        Commands::Check { ids } => cmd_check(&catalog, ids),
        Commands::Stats => cmd_stats(&catalog),
        Commands::Name { name } => cmd_name(name),
        Commands::Goal { command } => cmd_goal(command),
        Commands::Chat => chat::run(&catalog).await,
        Commands::Export { path } => cmd_export(path),
        Commands::Import { path } => cmd_import(path),
    }
}

fn cmd_rituals(catalog: &Catalog) -> Result<()> {
    let store = open_store()?;
    let (progress, _) = store.load_state().context("failed to load state")?;

    for category in catalog.categories() {
        let done = category
            .rituals
            .iter()
            .filter(|r| progress.is_completed(r.id))
            .count();
        println!("{} {} ({done}/{})", category.emoji, category.title, category.rituals.len());
        for ritual in &category.rituals {
            let mark = if progress.is_completed(ritual.id) { "x" } else { " " };
            let streak = progress.streak(ritual.id);
            let streak_note = if streak > 0 {
                format!("  🔥{streak}")
            } else {
                String::new()
            };
            println!(
                "  [{mark}] {:<20} {} {}  +{}pts{streak_note}",
                ritual.id, ritual.emoji, ritual.display_name, ritual.point_value
            );
        }
        println!();
    }
    Ok(())
}

fn cmd_check(catalog: &Catalog, ids: &[String]) -> Result<()> {
    let store = open_store()?;
    let (mut progress, goals) = store.load_state().context("failed to load state")?;

    for id in ids {
        match progress.toggle_ritual(catalog, id) {
            ToggleOutcome::Ignored => {
                println!("unknown ritual: {id} (see `tend rituals`)");
            }
            ToggleOutcome::Completed {
                points_earned,
                leveled_up,
                newly_unlocked,
            } => {
                println!("✓ {id} (+{points_earned} pts, streak {})", progress.streak(id));
                if let Some(level) = leveled_up {
                    println!("🎉 Level up! You reached level {level}!");
                }
                for achievement_id in newly_unlocked {
                    if let Some(a) = ACHIEVEMENTS.iter().find(|a| a.id == achievement_id) {
                        println!("🏆 Achievement unlocked: {} — {}", a.title, a.description);
                    }
                }
            }
            ToggleOutcome::Uncompleted { points_lost } => {
                println!("✗ {id} unchecked (-{points_lost} pts)");
            }
        }
    }

    store
        .save_state(&progress, &goals)
        .context("failed to save state")?;
    Ok(())
}

fn cmd_stats(catalog: &Catalog) -> Result<()> {
    let store = open_store()?;
    let (progress, goals) = store.load_state().context("failed to load state")?;

    println!("name:        {}", progress.user_name);
    println!("level:       {}", progress.level);
    println!("points:      {}", progress.total_points);
    println!(
        "next level:  {}/100 pts",
        progress.points_into_level()
    );
    println!("best streak: {}", progress.max_streak());
    println!(
        "today:       {}/{} rituals",
        progress.completed_rituals.len(),
        catalog.ritual_count()
    );
    println!(
        "goals:       {} ({} complete)",
        goals.len(),
        goals.goals.iter().filter(|g| g.is_complete()).count()
    );

    println!(
        "achievements ({}/{}):",
        progress.unlocked_achievements.len(),
        ACHIEVEMENTS.len()
    );
    for a in &ACHIEVEMENTS {
        let mark = if progress.unlocked_achievements.contains(a.id) {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {} — {}", a.title, a.description);
    }
    if let Some(next) = next_achievement(&progress) {
        println!("next challenge: {} — {}", next.title, next.description);
    }
    Ok(())
}

fn cmd_name(name: &str) -> Result<()> {
    let store = open_store()?;
    let (mut progress, goals) = store.load_state().context("failed to load state")?;
    progress.set_user_name(name);
    store
        .save_state(&progress, &goals)
        .context("failed to save state")?;
    println!("hi {name}!");
    Ok(())
}

fn cmd_goal(command: &GoalCommands) -> Result<()> {
    let store = open_store()?;
    let (progress, mut goals) = store.load_state().context("failed to load state")?;

    match command {
        GoalCommands::Add {
            title,
            description,
            category,
            emoji,
            steps,
        } => {
            match goals.create_goal(title, description, category, emoji, steps, &now_iso8601()) {
                Some(_) => println!("goal created: {title}"),
                None => {
                    println!("a goal needs a title");
                    return Ok(());
                }
            }
        }
        GoalCommands::List => {
            print_goals(&goals);
            return Ok(());
        }
        GoalCommands::Step { goal, step } => {
            let Some(goal_id) = goal
                .checked_sub(1)
                .and_then(|i| goals.goals.get(i))
                .map(|g| g.id)
            else {
                println!("no goal #{goal} (see `tend goal list`)");
                return Ok(());
            };
            match step.checked_sub(1).and_then(|i| goals.toggle_step(goal_id, i)) {
                Some(percent) => {
                    println!("goal #{goal} now at {percent:.0}%");
                    if goals.get(goal_id).is_some_and(|g| g.is_complete()) {
                        println!("🎉 GOAL COMPLETED!");
                    }
                }
                None => println!("no step #{step} on goal #{goal}"),
            }
        }
        GoalCommands::Remove { goal } => {
            let removed = goal
                .checked_sub(1)
                .and_then(|i| goals.goals.get(i))
                .map(|g| g.id)
                .is_some_and(|id| goals.remove_goal(id));
            if removed {
                println!("goal #{goal} removed");
            } else {
                println!("no goal #{goal} (see `tend goal list`)");
                return Ok(());
            }
        }
    }

    store
        .save_state(&progress, &goals)
        .context("failed to save state")?;
    Ok(())
}

fn print_goals(goals: &GoalBoard) {
    if goals.is_empty() {
        println!("no goals yet — `tend goal add \"...\" --step \"...\"`");
        return;
    }
    for (n, goal) in goals.goals.iter().enumerate() {
        println!(
            "{}. {} {} — {:.0}% ({}/{} steps)",
            n + 1,
            goal.emoji,
            goal.title,
            goal.progress_percent(),
            goal.completed_steps.len(),
            goal.steps.len()
        );
        if !goal.description.is_empty() {
            println!("   {}", goal.description);
        }
        for (i, step) in goal.steps.iter().enumerate() {
            let mark = if goal.completed_steps.contains(&i) { "x" } else { " " };
            println!("   [{mark}] {}. {step}", i + 1);
        }
    }
}

fn cmd_export(path: &std::path::Path) -> Result<()> {
    let store = open_store()?;
    store
        .export_json_file(path)
        .context("failed to export JSON")?;
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(path: &std::path::Path) -> Result<()> {
    let store = open_store()?;
    store.import_json_file(path).context("failed to import JSON")?;

    let (progress, goals) = store.load_state().context("failed to load state")?;
    println!(
        "imported from {}. points={}, level={}, goals={}",
        path.display(),
        progress.total_points,
        progress.level,
        goals.len()
    );
    Ok(())
}
