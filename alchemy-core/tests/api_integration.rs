//! Integration tests that call the real Gemini API.
//!
//! These tests require GEMINI_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p alchemy-core --test api_integration -- --ignored`
//!
//! These are marked #[ignore] by default to avoid API costs in CI and
//! failures when no API key is available.

use alchemy_core::{GeminiGenerator, Generator, GeneratorConfig, MemoStore, Resolver};
use std::sync::Arc;

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    gemini::API_KEY_VARS
        .iter()
        .any(|var| std::env::var(var).is_ok_and(|v| !v.is_empty()))
}

#[tokio::test]
#[ignore] // Run with: cargo test -p alchemy-core --test api_integration -- --ignored
async fn test_generator_returns_name_and_emoji() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let generator =
        GeminiGenerator::from_env(GeneratorConfig::default()).expect("Failed to create generator");

    let candidate = generator
        .generate("Ateş", "Su")
        .await
        .expect("Generator should respond");

    println!("Ateş + Su = {} {}", candidate.emoji, candidate.name);
    assert!(!candidate.name.trim().is_empty());
    assert!(!candidate.emoji.trim().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_resolver_caches_live_result() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let generator = GeminiGenerator::from_env(GeneratorConfig::default().with_language("English"))
        .expect("Failed to create generator");
    let resolver = Resolver::new(Arc::new(generator), Arc::new(MemoStore::new()));

    let first = resolver.resolve("Earth", "Wind").await.expect("Should resolve");
    let second = resolver.resolve("Wind", "Earth").await.expect("Should hit the memo");

    println!("Earth + Wind = {} {}", first.emoji, first.name);
    assert!(Arc::ptr_eq(&first, &second));
}
