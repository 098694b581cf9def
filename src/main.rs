mod bot;
mod config;

use async_trait::async_trait;
use serenity::all::{
    ApplicationId, Client, CommandDataOptionValue, CommandInteraction, Context,
    CreateInteractionResponse, CreateInteractionResponseMessage, EventHandler, GatewayIntents,
    GuildId, Interaction, Ready,
};
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;

use bot::router::{self, Invocation};
use bot::{CommandName, OpenAiClient, WikipediaClient};
use config::Config;

struct Handler {
    guild_id: GuildId,
    wiki: WikipediaClient,
    openai: OpenAiClient,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);

        // Best-effort: a failed registration is logged, the gateway session
        // keeps serving whatever commands Discord already knows.
        match bot::register_commands(&ctx.http, self.guild_id).await {
            Ok(()) => info!("Slash commands registered for guild {}", self.guild_id),
            Err(e) => warn!("Slash command registration failed: {e}"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let Some(invocation) = parse_invocation(&command) else {
            warn!("Ignoring unrecognized command invocation: {}", command.data.name);
            return;
        };

        info!(
            "/{} {:?} from {}",
            invocation.command.as_str(),
            invocation.query,
            command.user.name
        );

        let reply = router::handle(&invocation, &self.wiki, &self.openai).await;

        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(reply),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!("Failed to reply to /{}: {e}", invocation.command.as_str());
        }
    }
}

fn parse_invocation(command: &CommandInteraction) -> Option<Invocation> {
    let name = CommandName::parse(&command.data.name)?;
    let query = command
        .data
        .options
        .iter()
        .find(|option| option.name == "query")
        .and_then(|option| match &option.value {
            CommandDataOptionValue::String(value) => Some(value.clone()),
            _ => None,
        })?;

    Some(Invocation {
        command: name,
        query,
    })
}

fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        );
    let registry = tracing_subscriber::registry().with(stdout_layer);

    if let Some(ref log_dir) = config.log_dir {
        std::fs::create_dir_all(log_dir).ok();
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("wikibrief.log"))
        {
            Ok(log_file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
                registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(non_blocking)
                            .with_ansi(false)
                            .with_filter(
                                tracing_subscriber::EnvFilter::from_default_env()
                                    .add_directive(tracing::Level::INFO.into()),
                            ),
                    )
                    .init();
                return Some(guard);
            }
            Err(e) => {
                eprintln!("Failed to open log file in {}: {e}", log_dir.display());
            }
        }
    }

    registry.init();
    None
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let _guard = init_tracing(&config);

    info!("Starting wikibrief...");

    let handler = Handler {
        guild_id: GuildId::new(config.guild_id),
        wiki: WikipediaClient::new(),
        openai: OpenAiClient::new(config.openai_api_key.clone()),
    };

    let mut client = match Client::builder(&config.discord_token, GatewayIntents::GUILDS)
        .application_id(ApplicationId::new(config.application_id))
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build Discord client: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = client.start().await {
        error!("Gateway error: {e}");
        std::process::exit(1);
    }
}
