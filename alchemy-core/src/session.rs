//! GameSession - the primary public API for playing.
//!
//! A session is the composition root: it owns the inventory and the memo
//! store, and hands the store to its resolver. Front ends drive it with
//! [`GameSession::combine`] and render the returned [`CombineOutcome`].

use crate::element::Element;
use crate::generator::{GeminiGenerator, Generator, GeneratorConfig};
use crate::inventory::Inventory;
use crate::memo::MemoStore;
use crate::persist::PersistError;
use crate::resolver::{Resolver, DEFAULT_TIMEOUT};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("No API key configured - set GEMINI_API_KEY environment variable")]
    NoApiKey,

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Configuration for creating a new game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Model to use for generation.
    pub model: Option<String>,

    /// Language new elements are named in.
    pub language: String,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Upper bound on a single generation request.
    pub timeout: Duration,

    /// Where the inventory is loaded from and saved to after each discovery.
    pub save_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            model: generator.model,
            language: generator.language,
            temperature: generator.temperature,
            timeout: DEFAULT_TIMEOUT,
            save_path: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `ALCHEMY_MODEL`, `ALCHEMY_LANGUAGE`,
    /// `ALCHEMY_TIMEOUT_SECS` and `ALCHEMY_SAVE_PATH`.
    pub fn from_env() -> Result<Self, SessionError> {
        let mut config = Self::default();

        if let Ok(model) = std::env::var("ALCHEMY_MODEL") {
            config = config.with_model(model);
        }
        if let Ok(language) = std::env::var("ALCHEMY_LANGUAGE") {
            config = config.with_language(language);
        }
        if let Ok(secs) = std::env::var("ALCHEMY_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| SessionError::Config(format!("ALCHEMY_TIMEOUT_SECS: {e}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Ok(path) = std::env::var("ALCHEMY_SAVE_PATH") {
            config = config.with_save_path(path);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    /// The generator settings this config implies.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.model.clone(),
            language: self.language.clone(),
            temperature: self.temperature,
            ..GeneratorConfig::default()
        }
    }
}

/// What came of combining two elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineOutcome {
    /// A result the inventory did not have yet; it has been added.
    Discovered(Element),

    /// A result the inventory already held.
    Known(Element),

    /// The combination produced nothing this time.
    Nothing,
}

impl CombineOutcome {
    /// The resulting element, if any.
    pub fn element(&self) -> Option<&Element> {
        match self {
            CombineOutcome::Discovered(e) | CombineOutcome::Known(e) => Some(e),
            CombineOutcome::Nothing => None,
        }
    }

    pub fn is_discovery(&self) -> bool {
        matches!(self, CombineOutcome::Discovered(_))
    }
}

/// A single-player game session.
#[derive(Debug)]
pub struct GameSession {
    resolver: Resolver,
    inventory: Inventory,
    save_path: Option<PathBuf>,
}

impl GameSession {
    /// Create a new game session backed by Gemini.
    ///
    /// Requires `GEMINI_API_KEY` (or `API_KEY`) to be set. If the config has a
    /// save path, the inventory is loaded from it.
    pub async fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let generator = GeminiGenerator::from_env(config.generator_config())
            .map_err(|_| SessionError::NoApiKey)?;

        let inventory = match &config.save_path {
            Some(path) => Inventory::load_or_default(path).await,
            None => Inventory::new(),
        };

        Ok(Self::with_generator(config, Arc::new(generator), inventory))
    }

    /// Create a session around any generator and a pre-built inventory.
    pub fn with_generator(
        config: SessionConfig,
        generator: Arc<dyn Generator>,
        inventory: Inventory,
    ) -> Self {
        let resolver =
            Resolver::new(generator, Arc::new(MemoStore::new())).with_timeout(config.timeout);
        Self {
            resolver,
            inventory,
            save_path: config.save_path,
        }
    }

    /// Replace the inventory with a saved one.
    ///
    /// The memo store is kept, so pairs resolved earlier in this process
    /// still return the same result. On error the current inventory is left
    /// untouched.
    pub async fn load_inventory(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.inventory = Inventory::load_json(path).await?;
        Ok(())
    }

    /// Save the inventory to a file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.inventory.save_json(path).await?;
        Ok(())
    }

    /// Combine two elements.
    ///
    /// Combining an element with itself is allowed. New results are added to
    /// the inventory (deduplicated by name) and autosaved when a save path is
    /// configured; an autosave failure is logged and does not affect the
    /// outcome.
    pub async fn combine(&mut self, first: &Element, second: &Element) -> CombineOutcome {
        let Some(result) = self.resolver.resolve(&first.name, &second.name).await else {
            return CombineOutcome::Nothing;
        };

        if let Some(added) = self.inventory.add_if_absent(&result).cloned() {
            tracing::info!(name = %added.name, emoji = %added.emoji, "new discovery");
            self.autosave().await;
            return CombineOutcome::Discovered(added);
        }

        match self.inventory.find_by_name(&result.name) {
            Some(existing) => CombineOutcome::Known(existing.clone()),
            None => CombineOutcome::Nothing,
        }
    }

    /// Combine two owned elements by display name.
    pub async fn combine_names(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<CombineOutcome, SessionError> {
        let first = self.owned(first)?;
        let second = self.owned(second)?;
        Ok(self.combine(&first, &second).await)
    }

    fn owned(&self, name: &str) -> Result<Element, SessionError> {
        self.inventory
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownElement(name.to_string()))
    }

    async fn autosave(&self) {
        let Some(path) = &self.save_path else {
            return;
        };
        if let Err(e) = self.inventory.save_json(path).await {
            tracing::warn!(path = %path.display(), error = %e, "autosave failed");
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn memo(&self) -> &MemoStore {
        self.resolver.memo()
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_session, ScriptedGenerator, ScriptedReply};

    #[test]
    fn test_session_config() {
        let config = SessionConfig::new()
            .with_language("English")
            .with_model("gemini-2.0-flash")
            .with_timeout(Duration::from_secs(5))
            .with_save_path("saves/inventory.json");

        assert_eq!(config.language, "English");
        assert_eq!(config.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.generator_config().language, "English");
        assert!(config.save_path.is_some());
    }

    #[test]
    fn test_default_config_matches_generator_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.language, "Turkish");
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.save_path.is_none());
    }

    #[tokio::test]
    async fn test_known_result_is_not_rediscovered() {
        let generator = Arc::new(ScriptedGenerator::new(vec![ScriptedReply::ok("Su", "💧")]));
        let mut session = test_session(generator);

        let outcome = session.combine_names("Su", "Su").await.unwrap();

        assert!(matches!(outcome, CombineOutcome::Known(ref e) if e.name == "Su"));
        assert_eq!(session.inventory().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_element_rejected() {
        let generator = Arc::new(ScriptedGenerator::default());
        let mut session = test_session(generator.clone());

        let err = session.combine_names("Su", "Lava").await.unwrap_err();

        assert!(matches!(err, SessionError::UnknownElement(ref n) if n == "Lava"));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_outcome_accessors() {
        let generator = Arc::new(ScriptedGenerator::new(vec![ScriptedReply::ok("Buhar", "💨")]));
        let mut session = test_session(generator);

        let outcome = session.combine_names("Ateş", "Su").await.unwrap();
        assert!(outcome.is_discovery());
        assert_eq!(outcome.element().unwrap().name, "Buhar");
        assert!(CombineOutcome::Nothing.element().is_none());
    }
}
