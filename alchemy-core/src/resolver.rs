//! Combination resolution.
//!
//! [`Resolver::resolve`] turns an unordered pair of element names into a
//! [`CombinationResult`], calling the generator at most once per distinct
//! pair that succeeds. Failures are never memoized, so the same pair is
//! attempted again next time.
//!
//! Concurrent resolutions of the same missing key may both reach the
//! generator. The memo store keeps the first committed result and both
//! callers receive it.

use crate::element::CombinationResult;
use crate::generator::{Candidate, GenerateError, Generator};
use crate::memo::{CombinationKey, MemoStore};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on a single generator call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves combinations through a memo store and a generator.
#[derive(Clone)]
pub struct Resolver {
    generator: Arc<dyn Generator>,
    memo: Arc<MemoStore>,
    timeout: Duration,
}

impl Resolver {
    pub fn new(generator: Arc<dyn Generator>, memo: Arc<MemoStore>) -> Self {
        Self {
            generator,
            memo,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the generator timeout. Expiry counts as a transport failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn memo(&self) -> &Arc<MemoStore> {
        &self.memo
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve the combination of two element names.
    ///
    /// Returns `None` when the generator failed or produced an invalid
    /// payload; the reason is logged, not returned.
    pub async fn resolve(&self, first: &str, second: &str) -> Option<Arc<CombinationResult>> {
        let key = CombinationKey::new(first, second);

        if let Some(hit) = self.memo.get(&key) {
            tracing::debug!(key = %key, "combination memo hit");
            return Some(hit);
        }

        tracing::debug!(key = %key, "combination memo miss, calling generator");

        match self.generate(first, second).await {
            Ok(result) => {
                let stored = self.memo.insert(key.clone(), result);
                tracing::info!(key = %key, name = %stored.name, emoji = %stored.emoji, "combination resolved");
                Some(stored)
            }
            Err(e) => {
                tracing::warn!(key = %key, kind = %e.kind(), error = %e, "combination produced no result");
                None
            }
        }
    }

    async fn generate(&self, first: &str, second: &str) -> Result<CombinationResult, GenerateError> {
        let candidate = tokio::time::timeout(self.timeout, self.generator.generate(first, second))
            .await
            .map_err(|_| GenerateError::Timeout(self.timeout))??;
        validate(candidate)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("memo_entries", &self.memo.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Check a candidate and trim its fields.
pub fn validate(candidate: Candidate) -> Result<CombinationResult, GenerateError> {
    let name = candidate.name.trim();
    let emoji = candidate.emoji.trim();

    if name.is_empty() {
        return Err(GenerateError::Validation("empty name".to_string()));
    }
    if emoji.is_empty() {
        return Err(GenerateError::Validation("empty emoji".to_string()));
    }

    Ok(CombinationResult {
        name: name.to_string(),
        emoji: emoji.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGenerator, ScriptedReply};

    fn resolver(generator: &Arc<ScriptedGenerator>) -> Resolver {
        Resolver::new(generator.clone(), Arc::new(MemoStore::new()))
    }

    #[test]
    fn test_validate_trims_fields() {
        let result = validate(Candidate::new("  Buhar ", "💨\n")).unwrap();
        assert_eq!(result.name, "Buhar");
        assert_eq!(result.emoji, "💨");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(validate(Candidate::new("", "🔥")).is_err());
        assert!(validate(Candidate::new("   ", "🔥")).is_err());
        assert!(validate(Candidate::new("Kül", " ")).is_err());
    }

    #[test]
    fn test_validate_keeps_long_glyphs() {
        let result = validate(Candidate::new("Aile", "👨‍👩‍👧‍👦🏠")).unwrap();
        assert_eq!(result.emoji, "👨‍👩‍👧‍👦🏠");
    }

    #[tokio::test]
    async fn test_hit_skips_generator() {
        let generator = Arc::new(ScriptedGenerator::new(vec![ScriptedReply::ok("Buhar", "💨")]));
        let resolver = resolver(&generator);

        let first = resolver.resolve("Ateş", "Su").await.unwrap();
        let second = resolver.resolve("Ateş", "Su").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generator_sees_names_in_call_order() {
        let generator = Arc::new(ScriptedGenerator::new(vec![ScriptedReply::ok("Buhar", "💨")]));
        let resolver = resolver(&generator);

        resolver.resolve("Su", "Ateş").await.unwrap();

        assert_eq!(generator.calls(), vec![("Su".to_string(), "Ateş".to_string())]);
    }

    #[tokio::test]
    async fn test_invalid_payload_not_cached() {
        let generator = Arc::new(ScriptedGenerator::new(vec![ScriptedReply::ok("", "🔥")]));
        let resolver = resolver(&generator);

        assert!(resolver.resolve("Ateş", "Ateş").await.is_none());
        assert!(resolver.memo().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_failure() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            ScriptedReply::Hang,
            ScriptedReply::ok("Buhar", "💨"),
        ]));
        let resolver = resolver(&generator).with_timeout(Duration::from_secs(5));

        assert!(resolver.resolve("Ateş", "Su").await.is_none());
        assert!(resolver.memo().is_empty());

        let result = resolver.resolve("Ateş", "Su").await.unwrap();
        assert_eq!(result.name, "Buhar");
        assert_eq!(generator.call_count(), 2);
    }
}
