//! Element combination game engine with an AI recipe generator.
//!
//! This crate provides:
//! - A combination resolver that memoizes results per unordered pair of names
//! - A Gemini-backed generator that invents new elements
//! - An inventory deduplicated by element name, with JSON persistence
//! - A `GameSession` that ties them together
//!
//! # Quick Start
//!
//! ```ignore
//! use alchemy_core::{CombineOutcome, GameSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::new(SessionConfig::default()).await?;
//!
//!     match session.combine_names("Ateş", "Su").await? {
//!         CombineOutcome::Discovered(e) => println!("New: {e}"),
//!         CombineOutcome::Known(e) => println!("Again: {e}"),
//!         CombineOutcome::Nothing => println!("Nothing happened"),
//!     }
//!
//!     session.save("inventory.json").await?;
//!     Ok(())
//! }
//! ```

pub mod element;
pub mod generator;
pub mod inventory;
pub mod memo;
pub mod persist;
pub mod resolver;
pub mod session;
pub mod testing;

// Primary public API
pub use element::{base_elements, CombinationResult, Element, ElementId};
pub use generator::{Candidate, FailureKind, GeminiGenerator, GenerateError, Generator, GeneratorConfig};
pub use inventory::Inventory;
pub use memo::{CombinationKey, MemoStore};
pub use persist::PersistError;
pub use resolver::Resolver;
pub use session::{CombineOutcome, GameSession, SessionConfig, SessionError};
pub use testing::{ScriptedGenerator, ScriptedReply};
