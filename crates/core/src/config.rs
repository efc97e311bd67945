use std::env;

use serde::{Deserialize, Serialize};

/// Read `.env` from the working directory or a parent, if one exists.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Environment lookups scoped to a profile.
///
/// With profile `SITE_A`, key `QC_LOG` resolves `SITE_A_QC_LOG` first and
/// falls back to `QC_LOG`. Empty values count as unset.
#[derive(Debug, Clone, Copy, Default)]
struct ProfileEnv<'a> {
    profile: &'a str,
}

impl<'a> ProfileEnv<'a> {
    fn new(profile: &'a str) -> Self {
        Self { profile }
    }

    fn get(&self, key: &str) -> Option<String> {
        let prefixed = (!self.profile.is_empty()).then(|| format!("{}_{}", self.profile, key));
        let found = prefixed
            .as_deref()
            .into_iter()
            .chain([key])
            .find_map(|k| env::var(k).ok().filter(|v| !v.is_empty()));
        found
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub rules: RulesConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `QC_PROFILE` env var. When set (e.g. `SITE_A`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = ProfileEnv::default().get("QC_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let profile = profile.to_uppercase();
        let env = ProfileEnv::new(&profile);
        Self {
            rules: RulesConfig::from_profile_env(&env),
            log: LogConfig::from_profile_env(&env),
            profile,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:  sources={}", self.rules.sources.len());
        for source in &self.rules.sources {
            tracing::info!("    - {}", source);
        }
        tracing::info!("  log:    filter={}", self.log.filter);
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rule file paths or glob patterns, in load order.
    pub sources: Vec<String>,
}

impl RulesConfig {
    fn from_profile_env(env: &ProfileEnv<'_>) -> Self {
        Self {
            sources: env
                .get("QC_RULE_FILES")
                .map(|v| parse_sources(&v))
                .unwrap_or_default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Split a comma-separated source list, dropping blank entries.
pub fn parse_sources(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub filter: String,
}

impl LogConfig {
    fn from_profile_env(env: &ProfileEnv<'_>) -> Self {
        Self {
            filter: env.get_or("QC_LOG", "info"),
        }
    }
}
