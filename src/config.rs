use std::fmt;
use std::path::PathBuf;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    Missing(&'static str),
    /// An environment variable is present but unusable.
    Invalid { name: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => {
                write!(f, "missing required environment variable {name}")
            }
            Self::Invalid { name, reason } => write!(f, "invalid {name}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide configuration, read once at startup.
#[derive(Debug)]
pub struct Config {
    /// Discord bot token used for both the gateway session and REST calls.
    pub discord_token: String,
    /// Application ID the slash commands belong to.
    pub application_id: u64,
    /// Guild the two commands are registered against.
    pub guild_id: u64,
    /// API key for the chat-completion service.
    pub openai_api_key: String,
    /// Directory for the file log. No file logging when unset.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = require(&lookup, "DISCORD_TOKEN")?;
        let application_id = require_id(&lookup, "DISCORD_APPLICATION_ID")?;
        let guild_id = require_id(&lookup, "DISCORD_GUILD_ID")?;
        let openai_api_key = require(&lookup, "OPENAI_API_KEY")?;
        let log_dir = lookup("LOG_DIR").filter(|v| !v.is_empty()).map(PathBuf::from);

        Ok(Self {
            discord_token,
            application_id,
            guild_id,
            openai_api_key,
            log_dir,
        })
    }
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn require_id<F>(lookup: &F, name: &'static str) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require(lookup, name)?;
    let id = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("expected a numeric snowflake, got '{raw}': {e}"),
    })?;
    if id == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "snowflake must be non-zero".into(),
        });
    }
    Ok(id)
}
