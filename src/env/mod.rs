//! The `import.meta.env` surface of the front-end: four string variables,
//! layered from `.env` files and the process environment.

use std::collections::HashMap;
use std::path::Path;
use serde::Serialize;
use tracing::{debug, warn};


pub const ENV_KEYS: [&str; 4] = [
    "VITE_AI_API_URL",
    "VITE_AI_API_KEY",
    "VITE_AI_API_SECRET",
    "VITE_AI_APP_ID",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMetaEnv {
    #[serde(rename = "VITE_AI_API_URL")]
    pub ai_api_url: String,
    #[serde(rename = "VITE_AI_API_KEY")]
    pub ai_api_key: String,
    #[serde(rename = "VITE_AI_API_SECRET")]
    pub ai_api_secret: String,
    #[serde(rename = "VITE_AI_APP_ID")]
    pub ai_app_id: String,
}

impl ImportMetaEnv {
    /// Absent keys become empty strings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).unwrap_or_default();
        Self {
            ai_api_url: read(ENV_KEYS[0]),
            ai_api_key: read(ENV_KEYS[1]),
            ai_api_secret: read(ENV_KEYS[2]),
            ai_app_id: read(ENV_KEYS[3]),
        }
    }

    /// Reads the env files under `root` for `mode`, then lets the process
    /// environment override them.
    pub fn load(root: &Path, mode: &str) -> Self {
        let files = load_env_files(root, mode);
        let env = Self::from_lookup(|key| {
            std::env::var(key).ok().or_else(|| files.get(key).cloned())
        });

        for key in env.missing() {
            warn!(key, "environment variable is not set, exposing an empty string");
        }
        env
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "VITE_AI_API_URL" => Some(&self.ai_api_url),
            "VITE_AI_API_KEY" => Some(&self.ai_api_key),
            "VITE_AI_API_SECRET" => Some(&self.ai_api_secret),
            "VITE_AI_APP_ID" => Some(&self.ai_app_id),
            _ => None,
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        ENV_KEYS
            .iter()
            .copied()
            .filter(|key| self.get(key).map_or(true, str::is_empty))
            .collect()
    }
}

/// Lowest priority first.
pub fn env_files(mode: &str) -> [String; 4] {
    [
        ".env".to_string(),
        ".env.local".to_string(),
        format!(".env.{}", mode),
        format!(".env.{}.local", mode),
    ]
}

/// Merges every readable env file; later files win. Unreadable lines are skipped.
pub fn load_env_files(root: &Path, mode: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for name in env_files(mode) {
        let path = root.join(&name);
        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(e) => {
                debug!(file = %path.display(), error = %e, "skipping env file");
                continue;
            }
        };
        for item in iter {
            match item {
                Ok((key, value)) => {
                    vars.insert(key, value);
                }
                Err(e) => warn!(file = %path.display(), error = %e, "invalid env file entry"),
            }
        }
    }
    vars
}
