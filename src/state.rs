use crate::catalog::load_tools_file;
use crate::config::Config;
use crate::error::Result;
use crate::suggest::{EngineOptions, SuggestionEngine};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Application state shared across all request handlers.
///
/// The engine is published behind an `RwLock<Arc<..>>`: request handlers
/// clone the `Arc` under a short read lock, so an in-flight request keeps
/// ranking against the engine it started with even while `POST /api/config`
/// swaps in a replacement.
pub struct AppState {
    engine: RwLock<Arc<SuggestionEngine>>,
    pub config: Arc<Config>,
    /// Flag indicating the service is ready (catalog loaded and indexed).
    pub ready: AtomicBool,
}

impl AppState {
    /// Initialize application state: load the startup catalog (if any) and
    /// build the engine from the configured options.
    pub fn new(config: Config) -> Result<Self> {
        let tools = match &config.tools_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading tool catalog");
                let loaded = load_tools_file(path)?;
                tracing::info!(count = loaded.len(), "Catalog loaded successfully");
                loaded
            }
            None => {
                tracing::info!("No TOOLS_PATH configured, starting with an empty catalog");
                Vec::new()
            }
        };

        let engine = SuggestionEngine::new(tools, config.engine.clone())?;
        let state = Self {
            engine: RwLock::new(Arc::new(engine)),
            config: Arc::new(config),
            ready: AtomicBool::new(false),
        };
        state.ready.store(true, Ordering::SeqCst);
        Ok(state)
    }

    /// Current engine handle.
    pub fn engine(&self) -> Arc<SuggestionEngine> {
        Arc::clone(&self.engine.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Rebuild the engine with new options over the live catalog and publish
    /// it. All sessions are cleared as a documented side effect.
    pub fn apply_options(&self, options: EngineOptions) -> Result<()> {
        options.validate()?;
        let current = self.engine();
        let rebuilt = SuggestionEngine::new(current.tool_specs(), options)?;
        let mut slot = self.engine.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Arc::new(rebuilt);
        tracing::info!("Engine reinitialized with new configuration");
        Ok(())
    }

    /// Check if the service is ready to handle requests.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
