//! Runtime engine reconfiguration.
//!
//! Applying a configuration rebuilds the engine over the live catalog and
//! clears every session; clients are expected to re-feed their buffers.

use crate::error::Result;
use crate::state::AppState;
use crate::suggest::{CombineStrategy, EngineOptions};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: EngineOptions,
}

/// GET /api/config - Current engine options.
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        config: state.engine().options().clone(),
    })
}

/// Partial update: absent fields keep their current value. For the separator
/// list, an explicit `null` restores the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    pub top_k: Option<usize>,
    pub max_intents: Option<usize>,
    pub min_score: Option<f64>,
    pub combine_strategy: Option<CombineStrategy>,
    #[serde(default, with = "double_option")]
    pub intent_separator_tokens: Option<Option<Vec<String>>>,
    pub locales: Option<Vec<String>>,
}

/// Distinguishes an absent key from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

/// POST /api/config - Merge the update onto the current options and rebuild.
pub async fn update_config_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ConfigResponse>> {
    let mut options = state.engine().options().clone();
    if let Some(top_k) = update.top_k {
        options.top_k = top_k;
    }
    if let Some(max_intents) = update.max_intents {
        options.max_intents = max_intents;
    }
    if let Some(min_score) = update.min_score {
        options.min_score = min_score;
    }
    if let Some(strategy) = update.combine_strategy {
        options.combine_strategy = strategy;
    }
    if let Some(separators) = update.intent_separator_tokens {
        options.intent_separator_tokens = separators;
    }
    if let Some(locales) = update.locales {
        options.locales = locales;
    }

    state.apply_options(options)?;
    metrics::counter!("config_updates_total").increment(1);

    Ok(Json(ConfigResponse {
        config: state.engine().options().clone(),
    }))
}
