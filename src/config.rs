// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Remote language-model backends, in `auto` preference order (fastest first).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Gemini,
    Groq,
    OpenAI,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Gemini, Backend::Groq, Backend::OpenAI];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::OpenAI => "openai",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Environment variable holding this backend's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::Groq => "llama-3.1-8b-instant",
            Self::OpenAI => "gpt-4o-mini",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backends a generation request may use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderChoice {
    /// Every configured backend in preference order, then the local heuristic
    #[default]
    Auto,
    /// One backend, if its credential is configured
    Named(Backend),
    /// Local heuristic only
    None,
}

impl ProviderChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "none" => Some(Self::None),
            other => Backend::parse(other).map(Self::Named),
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Named(backend) => write!(f, "{backend}"),
            Self::None => f.write_str("none"),
        }
    }
}

impl TryFrom<String> for ProviderChoice {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| {
            format!("unknown provider '{value}', expected auto, none, gemini, groq or openai")
        })
    }
}

impl From<ProviderChoice> for String {
    fn from(value: ProviderChoice) -> Self {
        value.to_string()
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,

    /// Entries older than this are treated as misses (default 3600)
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_entries(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// API keys for the remote backends. Never serialized.
#[derive(Debug, Default)]
pub struct Credentials {
    gemini: Option<SecretString>,
    groq: Option<SecretString>,
    openai: Option<SecretString>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut credentials = Self::default();
        for backend in Backend::ALL {
            if let Some(key) = lookup(backend.env_var()).filter(|k| !k.trim().is_empty()) {
                credentials.set(backend, SecretString::from(key.trim().to_string()));
            }
        }
        credentials
    }

    pub fn get(&self, backend: Backend) -> Option<&SecretString> {
        match backend {
            Backend::Gemini => self.gemini.as_ref(),
            Backend::Groq => self.groq.as_ref(),
            Backend::OpenAI => self.openai.as_ref(),
        }
    }

    pub fn set(&mut self, backend: Backend, key: SecretString) {
        let slot = match backend {
            Backend::Gemini => &mut self.gemini,
            Backend::Groq => &mut self.groq,
            Backend::OpenAI => &mut self.openai,
        };
        *slot = Some(key);
    }

    pub fn is_configured(&self, backend: Backend) -> bool {
        self.get(backend).is_some()
    }

    /// Configured backends in preference order
    pub fn configured(&self) -> Vec<Backend> {
        Backend::ALL
            .into_iter()
            .filter(|b| self.is_configured(*b))
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderChoice,

    /// Model override applied to whichever backend answers
    #[serde(default)]
    pub model: Option<String>,

    /// Type-prefixed subjects, e.g. `feat: ...` (default: true)
    #[serde(default = "default_true")]
    pub conventional: bool,

    /// Ask for an explanatory body below the subject (default: false)
    #[serde(default)]
    pub body: bool,

    /// LLM temperature (0.0-2.0, default 0.3)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (default 256)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Prompt token budget (~4 chars per token, default 100000)
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Per-backend request timeout in seconds (default 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL for the OpenAI backend (default: https://api.openai.com/v1)
    #[serde(default)]
    pub openai_base_url: Option<String>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(skip)]
    pub credentials: Credentials,
}

fn default_true() -> bool {
    true
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    256
}
fn default_token_budget() -> usize {
    100_000
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_cache_entries() -> usize {
    100
}
fn default_cache_ttl() -> u64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderChoice::default(),
            model: None,
            conventional: true,
            body: false,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            token_budget: default_token_budget(),
            timeout_secs: default_timeout_secs(),
            openai_base_url: None,
            cache: CacheConfig::default(),
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let project_config = std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(".commitflow.toml"));
        let mut config = Self::load_files(project_config.as_deref(), Self::config_path().as_deref())?;

        config.credentials = Credentials::from_env();

        // Keyring fallback for backends without an env credential
        #[cfg(feature = "secure-storage")]
        for backend in Backend::ALL {
            if config.credentials.is_configured(backend) {
                continue;
            }
            if let Ok(entry) = keyring::Entry::new("commitflow", backend.as_str()) {
                if let Ok(key) = entry.get_password() {
                    config.credentials.set(backend, SecretString::from(key));
                }
            }
        }

        if config.openai_base_url.is_none() {
            config.openai_base_url = std::env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty());
        }

        config.apply_cli(cli)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge defaults, the given TOML files (lowest priority first) and `COMMITFLOW_*` env.
    pub fn load_files(project: Option<&Path>, user: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in [project, user].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // COMMITFLOW_MODEL, COMMITFLOW_CACHE__ENABLED, ...
        figment = figment.merge(Env::prefixed("COMMITFLOW_").split("__"));

        figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "commitflow").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(ref p) = cli.provider {
            self.provider = ProviderChoice::parse(p).ok_or_else(|| {
                Error::Config(format!(
                    "unknown provider '{p}', expected auto, none, gemini, groq or openai"
                ))
            })?;
        }
        if let Some(ref m) = cli.model {
            self.model = Some(m.clone());
        }
        if cli.conventional {
            self.conventional = true;
        }
        if cli.plain {
            self.conventional = false;
        }
        if cli.body {
            self.body = true;
        }
        if cli.no_cache {
            self.cache.enabled = false;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if !(1..=8_192).contains(&self.max_tokens) {
            return Err(Error::Config(format!(
                "max_tokens must be 1–8192, got {}",
                self.max_tokens
            )));
        }

        if !(1_000..=2_000_000).contains(&self.token_budget) {
            return Err(Error::Config(format!(
                "token_budget must be 1000–2000000, got {}",
                self.token_budget
            )));
        }

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if self.cache.max_entries == 0 {
            return Err(Error::Config("cache.max_entries must be at least 1".into()));
        }

        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("cache.ttl_secs must be at least 1".into()));
        }

        if let Some(ref base) = self.openai_base_url {
            let parsed = url::Url::parse(base)
                .map_err(|e| Error::Config(format!("openai_base_url is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "openai_base_url must start with http:// or https://, got '{base}'"
                )));
            }
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# commitflow configuration
#
# API keys are read from GEMINI_API_KEY, GROQ_API_KEY and OPENAI_API_KEY
# (or the system keychain via `commitflow set-key <provider>`).

# Backend selection: auto, none, gemini, groq, openai
provider = "auto"

# Model override for whichever backend answers (each has its own default)
# model = "gpt-4o-mini"

# Type-prefixed subjects such as "feat: add login form"
conventional = true

# Ask for an explanatory body below the subject
body = false

temperature = 0.3
max_tokens = 256

# Prompt budget in tokens (~4 characters each). Larger diffs are reduced
# to a file summary, then a status listing, then truncated.
token_budget = 100000

# Seconds before a backend request counts as failed
timeout_secs = 60

# OpenAI-compatible endpoint override
# openai_base_url = "https://api.openai.com/v1"

[cache]
enabled = true
max_entries = 100
ttl_secs = 3600
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
