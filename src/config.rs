use std::env;
use std::path::PathBuf;

use crate::suggest::{CombineStrategy, EngineOptions};

/// Gateway configuration, loaded from environment variables.
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Optional path to the startup catalog JSON (plain spec array or MCP
    /// `list_tools` response). Unset starts with an empty catalog.
    pub tools_path: Option<PathBuf>,
    pub shutdown_timeout_secs: u64,
    /// Engine construction parameters, re-applied on `POST /api/config`.
    pub engine: EngineOptions,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Engine knobs: `TOP_K`, `MAX_INTENTS`, `MIN_SCORE`, `COMBINE_STRATEGY`
    /// (`max`/`sum`), `INTENT_SEPARATORS` (comma-separated, overrides the
    /// built-in list when set), `LOCALES` (comma-separated language codes).
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = EngineOptions::default();

        let intent_separator_tokens = env::var("INTENT_SEPARATORS").ok().map(parse_list);
        let locales = env::var("LOCALES")
            .ok()
            .map(parse_list)
            .filter(|l| !l.is_empty())
            .unwrap_or(defaults.locales);

        let combine_strategy = match env::var("COMBINE_STRATEGY")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "sum" => CombineStrategy::Sum,
            "max" | "" => CombineStrategy::Max,
            other => anyhow::bail!("COMBINE_STRATEGY must be 'max' or 'sum', got '{other}'"),
        };

        let engine = EngineOptions {
            top_k: env::var("TOP_K")
                .unwrap_or_else(|_| defaults.top_k.to_string())
                .parse()?,
            max_intents: env::var("MAX_INTENTS")
                .unwrap_or_else(|_| defaults.max_intents.to_string())
                .parse()?,
            min_score: env::var("MIN_SCORE")
                .unwrap_or_else(|_| defaults.min_score.to_string())
                .parse()?,
            intent_separator_tokens,
            combine_strategy,
            locales,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            tools_path: env::var("TOOLS_PATH").ok().map(PathBuf::from),
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            engine,
        })
    }

    /// Configuration for tests and embedders: local bind, empty catalog,
    /// default engine options.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            tools_path: None,
            shutdown_timeout_secs: 0,
            engine: EngineOptions::default(),
        }
    }
}

fn parse_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list("and, then , ,e".to_string()),
            vec!["and", "then", "e"]
        );
        assert!(parse_list(" , ".to_string()).is_empty());
    }
}
