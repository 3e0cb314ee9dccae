use crate::chunk::chunk_message;
use crate::config::CHUNK_LIMIT;
use crate::reply::generate_reply;
use crate::{Context, Error, DM_GUILD_KEY};
use tracing::warn;

/// Ask the assistant a question
#[poise::command(slash_command)]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your message to the assistant"] prompt: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let guild_key = ctx
        .guild_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| DM_GUILD_KEY.to_string());

    let settings = match data.db.ensure_settings(&guild_key) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Storage unavailable during /ask: {}", e);
            ctx.say("⚠️ I can't reach my storage right now. Please try again later.")
                .await?;
            return Ok(());
        }
    };

    // An explicit invocation always gets an answer; the response-mode policy
    // only governs automatic replies.
    let guild_id = ctx.guild_id().map(|id| id.to_string());
    let response = match generate_reply(
        data,
        &settings,
        &ctx.channel_id().to_string(),
        &ctx.author().id.to_string(),
        guild_id.as_deref(),
        &prompt,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Storage unavailable during /ask: {}", e);
            ctx.say("⚠️ I can't reach my storage right now. Please try again later.")
                .await?;
            return Ok(());
        }
    };

    // First chunk resolves the deferred reply; the rest go out as follow-ups.
    for chunk in chunk_message(&response, CHUNK_LIMIT) {
        ctx.say(chunk).await?;
    }

    Ok(())
}
