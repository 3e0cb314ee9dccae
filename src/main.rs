use chatcord::commands::{chat, settings, voice};
use chatcord::{config::Config, Data};
use poise::serenity_prelude as serenity;
use songbird::serenity::SerenityInit;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let discord_token = config.discord_token.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                chat::ask(),
                settings::settings(),
                settings::set_mode(),
                settings::activate(),
                settings::deactivate(),
                voice::join(),
                voice::leave(),
            ],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::Message { new_message } => {
                            if let Err(e) =
                                chatcord::reply::handle_message(ctx, new_message, data).await
                            {
                                error!(
                                    "Error handling message in channel {}: {}",
                                    new_message.channel_id, e
                                );
                            }
                        }
                        serenity::FullEvent::Ready { data_about_bot } => {
                            data.stats.set_server_count(data_about_bot.guilds.len());
                        }
                        serenity::FullEvent::GuildCreate { .. }
                        | serenity::FullEvent::GuildDelete { .. } => {
                            data.stats.set_server_count(ctx.cache.guilds().len());
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready!");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // Set bot status
                ctx.set_activity(Some(serenity::ActivityData::custom(&config.status_message)));

                let db = chatcord::db::Database::new(&config).expect("Failed to open database");
                db.execute_init().expect("Failed to initialize database");

                let llm_client = chatcord::llm::LlmClient::new(&config);
                let stats = chatcord::stats::UsageTracker::new(db.clone());
                tokio::spawn(stats.clone().run_uptime_task());

                Ok(Data {
                    config,
                    db,
                    llm_client,
                    stats,
                    voice: Arc::new(chatcord::voice::VoiceRegistry::new()),
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let mut client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .register_songbird()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}
