use std::time::Duration;
use serde::Serialize;
use crate::config::DevServerConfig;
use crate::env::ImportMetaEnv;
use crate::errors::DevServerError;

/// Replaces a literal prefix, anchored at the start of the path, at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRewrite {
    pub from: String,
    pub to: String,
}

impl PathRewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, path: &str) -> String {
        match path.strip_prefix(self.from.as_str()) {
            Some(rest) => format!("{}{}", self.to, rest),
            None => path.to_string(),
        }
    }
}

/// A single `/prefix -> target` forwarding entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyRule {
    pub context: String,
    pub target: String,
    pub change_origin: bool,
    pub rewrite: Option<PathRewrite>,
}

impl ProxyRule {
    pub fn new(context: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            target: target.into(),
            change_origin: false,
            rewrite: None,
        }
    }

    pub fn change_origin(mut self, change_origin: bool) -> Self {
        self.change_origin = change_origin;
        self
    }

    pub fn rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rewrite = Some(PathRewrite::new(from, to));
        self
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(self.context.as_str())
    }

    pub fn rewrite_path(&self, path: &str) -> String {
        match &self.rewrite {
            Some(rewrite) => rewrite.apply(path),
            None => path.to_string(),
        }
    }
}

pub struct AppState {
    pub config: DevServerConfig,
    pub env: ImportMetaEnv,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: DevServerConfig, env: ImportMetaEnv) -> Result<Self, DevServerError> {
        // Redirects are handed back to the browser untouched.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.server.request_timeout_secs))
            .build()
            .map_err(|e| DevServerError::Config(e.to_string()))?;

        Ok(Self { config, env, client })
    }

    pub fn match_rule(&self, path: &str) -> Option<&ProxyRule> {
        self.config.server.proxy.iter().find(|rule| rule.matches(path))
    }
}
