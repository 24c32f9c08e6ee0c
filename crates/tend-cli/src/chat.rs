//! Interactive companion chat. Replies land after the engine's fixed
//! thinking delay; the session is torn down (pending replies dropped) on
//! `/new` and on exit.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, sleep};

use tend_core::{
    Catalog, ChatSession, Message, QUICK_ACTIONS, Sender, ToggleOutcome, now_unix_millis,
};

use crate::open_store;

pub async fn run(catalog: &Catalog) -> Result<()> {
    let store = open_store()?;
    let (mut progress, goals) = store.load_state().context("failed to load state")?;

    let mut rng = SmallRng::from_os_rng();
    let mut session = ChatSession::new(&progress.user_name, now_unix_millis());
    if let Some(greeting) = session.messages().first() {
        print_message(greeting);
    }
    println!("(type a message, /quick for starters, /done <ritual>, /new, or bye)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("bye") || input.eq_ignore_ascii_case("quit") {
            println!("see you soon! 👋");
            break;
        }

        if input == "/quick" {
            for (i, action) in QUICK_ACTIONS.iter().enumerate() {
                println!("  /q {} — {action}", i + 1);
            }
            continue;
        }
        if input == "/new" {
            session.reset(&progress.user_name, now_unix_millis());
            if let Some(greeting) = session.messages().first() {
                print_message(greeting);
            }
            continue;
        }
        if let Some(id) = input.strip_prefix("/done ") {
            check_ritual(&store, catalog, &mut progress, &goals, id.trim())?;
            continue;
        }

        let text = if let Some(n) = input.strip_prefix("/q ") {
            match n
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| QUICK_ACTIONS.get(i))
            {
                Some(action) => action.to_string(),
                None => {
                    println!("no such quick action (try /quick)");
                    continue;
                }
            }
        } else {
            input.to_string()
        };

        session.submit(&text, now_unix_millis());
        wait_for_reply(&mut session, &mut rng).await;
    }

    Ok(())
}

/// Sleep until the next scheduled reply is due, then print what lands.
async fn wait_for_reply(session: &mut ChatSession, rng: &mut SmallRng) {
    if let Some(due) = session.next_due_ms() {
        let now = now_unix_millis();
        if due > now {
            sleep(Duration::from_millis(due - now)).await;
        }
    }
    for message in session.poll_due(now_unix_millis(), rng) {
        print_message(&message);
    }
}

/// The chat surface can mark rituals done mid-conversation.
fn check_ritual(
    store: &tend_store::Store,
    catalog: &Catalog,
    progress: &mut tend_core::ProgressState,
    goals: &tend_core::GoalBoard,
    id: &str,
) -> Result<()> {
    match progress.toggle_ritual(catalog, id) {
        ToggleOutcome::Ignored => println!("unknown ritual: {id}"),
        ToggleOutcome::Completed {
            points_earned,
            leveled_up,
            ..
        } => {
            println!("✓ {id} (+{points_earned} pts)");
            if let Some(level) = leveled_up {
                println!("🎉 Level up! You reached level {level}!");
            }
        }
        ToggleOutcome::Uncompleted { points_lost } => {
            println!("✗ {id} unchecked (-{points_lost} pts)");
        }
    }
    store.save_state(progress, goals).context("failed to save state")
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::Companion => "🤖",
        Sender::User => "you",
    };
    println!("{who}  {}", message.content);
}
