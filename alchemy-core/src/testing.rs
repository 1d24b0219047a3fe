//! Testing utilities for the combination engine.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedGenerator` that replays queued replies without API calls
//! - `ScriptedReply` to script successes, failures, slow and hung requests
//! - `test_session` to build a `GameSession` around a scripted generator

use crate::generator::{Candidate, GenerateError, Generator};
use crate::inventory::Inventory;
use crate::session::{GameSession, SessionConfig};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// A scripted reply from the mock generator.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this candidate.
    Ok(Candidate),
    /// Yield to the scheduler once, then return this candidate. Lets a
    /// concurrent resolution of the same pair reach the generator too.
    Delayed(Candidate),
    /// Fail with this error.
    Fail(GenerateError),
    /// Never complete. Pair with a resolver timeout.
    Hang,
}

impl ScriptedReply {
    pub fn ok(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        ScriptedReply::Ok(Candidate::new(name, emoji))
    }

    pub fn delayed(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        ScriptedReply::Delayed(Candidate::new(name, emoji))
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ScriptedReply::Fail(GenerateError::Transport(message.into()))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ScriptedReply::Fail(GenerateError::Validation(message.into()))
    }
}

/// A generator that returns scripted replies in order.
///
/// Once the script runs out every call fails with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a reply to the end of the script.
    pub fn queue(&self, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Every `(first, second)` pair the generator was called with.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, first: &str, second: &str) -> Result<Candidate, GenerateError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((first.to_string(), second.to_string()));

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match reply {
            Some(ScriptedReply::Ok(candidate)) => Ok(candidate),
            Some(ScriptedReply::Delayed(candidate)) => {
                tokio::task::yield_now().await;
                Ok(candidate)
            }
            Some(ScriptedReply::Fail(e)) => Err(e),
            Some(ScriptedReply::Hang) => std::future::pending().await,
            None => Err(GenerateError::Transport(
                "scripted generator has no more replies".to_string(),
            )),
        }
    }
}

/// Build a session with the base inventory around a scripted generator.
pub fn test_session(generator: Arc<ScriptedGenerator>) -> GameSession {
    GameSession::with_generator(SessionConfig::default(), generator, Inventory::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_exhausted() {
        let generator = ScriptedGenerator::new(vec![
            ScriptedReply::ok("Buhar", "💨"),
            ScriptedReply::transport("offline"),
        ]);

        assert_eq!(generator.generate("Ateş", "Su").await.unwrap().name, "Buhar");
        assert!(matches!(
            generator.generate("Ateş", "Su").await,
            Err(GenerateError::Transport(_))
        ));
        assert!(generator.generate("Ateş", "Su").await.is_err());
        assert_eq!(generator.call_count(), 3);
        assert_eq!(generator.remaining(), 0);
    }

    #[tokio::test]
    async fn test_queue_appends() {
        let generator = ScriptedGenerator::default();
        generator.queue(ScriptedReply::ok("Toz", "🌪️"));
        assert_eq!(generator.remaining(), 1);
        assert_eq!(generator.generate("Hava", "Toprak").await.unwrap().name, "Toz");
    }
}
