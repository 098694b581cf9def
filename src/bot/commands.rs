//! Slash-command definitions and one-time guild registration.

use serenity::all::{CacheHttp, CommandOptionType, CreateCommand, CreateCommandOption, GuildId};

#[derive(Debug)]
pub enum RegistrationError {
    /// Discord answered and refused the definitions.
    Rejected(String),
    /// Discord could not be reached.
    Unavailable(String),
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "registration rejected: {e}"),
            Self::Unavailable(e) => write!(f, "registration unavailable: {e}"),
        }
    }
}

impl std::error::Error for RegistrationError {}

/// The two commands the bot serves, each with one required "query" option.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("wiki")
            .description("Get a summary of a Wikipedia page")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "query",
                    "Search term for Wikipedia",
                )
                .required(true),
            ),
        CreateCommand::new("summarize")
            .description("Summarize a Wikipedia page using GPT-3.5")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "query",
                    "Search term for Wikipedia",
                )
                .required(true),
            ),
    ]
}

/// Bulk-overwrite the guild's command set. The overwrite is idempotent, so
/// re-running at every startup is safe.
pub async fn register_commands(
    http: impl CacheHttp + AsRef<serenity::http::Http>,
    guild_id: GuildId,
) -> Result<(), RegistrationError> {
    guild_id
        .set_commands(http, definitions())
        .await
        .map(|_| ())
        .map_err(|e| match e {
            serenity::Error::Http(err) => RegistrationError::Rejected(err.to_string()),
            other => RegistrationError::Unavailable(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines_both_commands() {
        let defs = serde_json::to_value(definitions()).unwrap();
        let defs = defs.as_array().unwrap();

        let names: Vec<&str> = defs.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["wiki", "summarize"]);

        for def in defs {
            assert!(!def["description"].as_str().unwrap().is_empty());
        }
    }

    #[test]
    fn test_each_command_requires_a_query_string() {
        let defs = serde_json::to_value(definitions()).unwrap();

        for def in defs.as_array().unwrap() {
            let options = def["options"].as_array().unwrap();
            assert_eq!(options.len(), 1);
            assert_eq!(options[0]["name"], "query");
            assert_eq!(options[0]["required"], true);
            // Discord wire value for the STRING option type.
            assert_eq!(options[0]["type"], 3);
        }
    }
}
