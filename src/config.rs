use std::fmt;

use config::{Config as ConfigLoader, Environment};
use is_terminal::IsTerminal;
use serde::Deserialize;

use crate::Error;

const PREFIX: &str = "IPMONSTER";

pub const DEFAULT_BASE_URL: &str = "https://api.bestipapi.com/query";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_OUTPUT: &str = "json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    #[default]
    Auto,
    Always,
    Never,
}

impl LogStyle {
    pub fn is_color(&self) -> bool {
        match self {
            LogStyle::Auto => std::io::stderr().is_terminal(),
            LogStyle::Always => true,
            LogStyle::Never => false,
        }
    }
}

impl<'de> Deserialize<'de> for LogStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?.to_lowercase();
        match s.as_str() {
            "auto" => Ok(LogStyle::Auto),
            "always" => Ok(LogStyle::Always),
            "never" => Ok(LogStyle::Never),
            _ => Err(serde::de::Error::unknown_variant(
                &s,
                &["auto", "always", "never"],
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub style: LogStyle,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: Self::level(),
            style: LogStyle::default(),
        }
    }
}

impl Log {
    fn level() -> String {
        String::from("ipmonster=warn")
    }
}

/// Startup settings read from `IPMONSTER_*` environment variables.
///
/// `api_key` is only a fallback: it is consulted after per-call options and
/// the client configuration.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub log: Log,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log: Log::default(),
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("log", &self.log)
            .field("api_key_set", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiKeyOnly {
    api_key: Option<String>,
}

fn environment() -> Environment {
    Environment::with_prefix(PREFIX)
        .separator("__")
        .prefix_separator("_")
        .try_parsing(true)
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        let settings = ConfigLoader::builder()
            .add_source(environment())
            .build()
            .and_then(|cfg| cfg.try_deserialize::<Settings>())?;
        Ok(settings)
    }

    /// Like [`Settings::from_env`], but a bad value in any other variable
    /// never costs the fallback key: on error the defaults are used with
    /// `IPMONSTER_API_KEY` loaded on its own.
    pub fn from_env_lenient() -> Self {
        match Self::from_env() {
            Ok(settings) => settings,
            Err(err) => {
                warn!("failed to load settings from environment: {}", err);
                Settings {
                    api_key: api_key_from_env(),
                    ..Settings::default()
                }
            }
        }
    }
}

fn api_key_from_env() -> Option<String> {
    ConfigLoader::builder()
        .add_source(environment())
        .build()
        .and_then(|cfg| cfg.try_deserialize::<ApiKeyOnly>())
        .map(|only| only.api_key)
        .unwrap_or_else(|err| {
            warn!("failed to load IPMONSTER_API_KEY: {}", err);
            None
        })
}

/// Client configuration, replaced field by field through `configure`.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: u64,
    pub output: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT_MS,
            output: None,
        }
    }
}

impl From<&Settings> for ClientConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            api_key: None,
            base_url: settings.base_url.clone(),
            timeout: settings.timeout,
            output: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key_set", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("output", &self.output)
            .finish()
    }
}

impl ClientConfig {
    /// Shallow merge: every field present in `options` replaces the current one.
    pub fn merge(&mut self, options: Options) {
        let Options {
            api_key,
            base_url,
            timeout,
            output,
        } = options;
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        if output.is_some() {
            self.output = output;
        }
    }
}

/// Options accepted by `configure` and as per-call overrides.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Options {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Milliseconds.
    pub timeout: Option<u64>,
    pub output: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("api_key_set", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("output", &self.output)
            .finish()
    }
}

/// Values used by one lookup after applying the precedence rules.
#[derive(Clone, PartialEq, Eq)]
pub struct Resolved {
    pub api_key: String,
    pub base_url: String,
    pub timeout: u64,
    pub output: String,
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("output", &self.output)
            .finish()
    }
}

impl Resolved {
    /// Empty strings and a zero timeout count as unset at every level.
    pub fn resolve(
        options: &Options,
        config: &ClientConfig,
        env_api_key: Option<&str>,
    ) -> Result<Self, Error> {
        let api_key = first_present(&[
            options.api_key.as_deref(),
            config.api_key.as_deref(),
            env_api_key,
        ])
        .ok_or(Error::MissingApiKey)?;

        let base_url = first_present(&[
            options.base_url.as_deref(),
            Some(config.base_url.as_str()),
        ])
        .unwrap_or(DEFAULT_BASE_URL);

        let timeout = [options.timeout, Some(config.timeout)]
            .into_iter()
            .flatten()
            .find(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let output = first_present(&[options.output.as_deref(), config.output.as_deref()])
            .unwrap_or(DEFAULT_OUTPUT);

        Ok(Self {
            api_key: api_key.to_owned(),
            base_url: base_url.to_owned(),
            timeout,
            output: output.to_owned(),
        })
    }

    pub fn is_default_output(&self) -> bool {
        self.output == DEFAULT_OUTPUT
    }
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.is_empty())
}
