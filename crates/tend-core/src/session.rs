//! Conversation session: append-only message log plus scheduled companion
//! replies.
//!
//! Time is passed in by the caller as milliseconds on whatever clock it
//! likes, so the session is fully deterministic in tests. A submission
//! schedules a reply at `now + REPLY_DELAY_MS` and returns immediately;
//! `poll_due` delivers everything whose deadline has elapsed, in scheduling
//! order (delays are fixed and equal, so FIFO holds). `reset` drops pending
//! replies; a torn-down session can never deliver a stale reply into the
//! next one.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialogue::{self, Intent};
use crate::time::unix_to_iso8601;

/// Simulated thinking delay before a companion reply lands.
pub const REPLY_DELAY_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Companion,
}

/// One entry in the session's append-only message sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: String,
    pub intent: Intent,
}

struct PendingReply {
    due_at_ms: u64,
    intent: Intent,
}

/// Per-session dialogue state machine.
pub struct ChatSession {
    messages: Vec<Message>,
    pending: VecDeque<PendingReply>,
}

impl ChatSession {
    /// Start a session with the companion's greeting already in the log.
    pub fn new(user_name: &str, now_ms: u64) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            pending: VecDeque::new(),
        };
        session.push(dialogue::greeting(user_name), Sender::Companion, Intent::Normal, now_ms);
        session
    }

    /// Submit a user message: append it, classify it, schedule the companion
    /// reply. Non-blocking; the reply arrives via [`ChatSession::poll_due`].
    /// A second submission while a reply is pending is fine; each pending
    /// reply resolves independently, in delivery order.
    pub fn submit(&mut self, text: &str, now_ms: u64) -> Intent {
        let intent = dialogue::classify(text);
        self.push(text.to_string(), Sender::User, intent, now_ms);
        self.pending.push_back(PendingReply {
            due_at_ms: now_ms + REPLY_DELAY_MS,
            intent,
        });
        intent
    }

    /// Deliver every scheduled reply whose deadline has elapsed. Returns the
    /// newly appended companion messages.
    pub fn poll_due(&mut self, now_ms: u64, rng: &mut impl Rng) -> Vec<Message> {
        let mut delivered = Vec::new();
        while let Some(reply) = self.pending.front() {
            if reply.due_at_ms > now_ms {
                break;
            }
            let intent = reply.intent;
            self.pending.pop_front();
            let reply = dialogue::select_reply(intent, rng);
            let message = self.push(reply, Sender::Companion, intent, now_ms);
            delivered.push(message);
        }
        delivered
    }

    /// Tear the session down and start fresh: pending replies are dropped,
    /// the log is cleared, and a new greeting opens the next conversation.
    pub fn reset(&mut self, user_name: &str, now_ms: u64) {
        self.pending.clear();
        self.messages.clear();
        self.push(dialogue::greeting(user_name), Sender::Companion, Intent::Normal, now_ms);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Replies scheduled but not yet delivered.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the next scheduled reply, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.front().map(|p| p.due_at_ms)
    }

    fn push(&mut self, content: String, sender: Sender, intent: Intent, now_ms: u64) -> Message {
        let message = Message {
            id: Uuid::new_v4(),
            content,
            sender,
            timestamp: unix_to_iso8601(now_ms / 1000),
            intent,
        };
        self.messages.push(message.clone());
        message
    }
}
