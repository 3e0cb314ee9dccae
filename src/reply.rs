use crate::chunk::chunk_message;
use crate::config::CHUNK_LIMIT;
use crate::db::Role;
use crate::settings::GuildSettings;
use crate::{context, policy, prompt};
use crate::{Data, Error, DM_GUILD_KEY};
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

/// Handle a plain channel message according to the guild's response mode.
pub async fn handle_message(
    ctx: &serenity::Context,
    new_message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if new_message.author.bot || new_message.content.trim().is_empty() {
        return Ok(());
    }

    let guild_key = new_message
        .guild_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| DM_GUILD_KEY.to_string());

    let settings = match data.db.ensure_settings(&guild_key) {
        Ok(settings) => settings,
        Err(e) => {
            // Storage down: drop the event without replying.
            warn!(
                "Storage unavailable, dropping message in channel {}: {}",
                new_message.channel_id, e
            );
            return Ok(());
        }
    };

    let channel_id = new_message.channel_id.to_string();
    if !policy::should_auto_respond(&settings, &channel_id) {
        debug!(
            "Response policy denied message in channel {} (mode {})",
            channel_id,
            settings.slash_mode.as_str()
        );
        return Ok(());
    }

    info!(
        "Replying to {} in channel {}",
        new_message.author.name, new_message.channel_id
    );

    let typing = new_message.channel_id.start_typing(&ctx.http);
    let reply = match generate_reply(
        data,
        &settings,
        &channel_id,
        &new_message.author.id.to_string(),
        new_message.guild_id.map(|id| id.to_string()).as_deref(),
        &new_message.content,
    )
    .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(
                "Storage unavailable mid-turn in channel {}: {}",
                new_message.channel_id, e
            );
            return Ok(());
        }
    };
    drop(typing);

    for (i, chunk) in chunk_message(&reply, CHUNK_LIMIT).into_iter().enumerate() {
        let delivery = if i == 0 {
            new_message.reply(&ctx.http, chunk).await
        } else {
            new_message.channel_id.say(&ctx.http, chunk).await
        };
        if let Err(e) = delivery {
            // Delivery failures are logged and not retried.
            error!(
                "Failed to deliver reply chunk {} in channel {}: {}",
                i + 1,
                new_message.channel_id,
                e
            );
            break;
        }
    }

    Ok(())
}

/// Run one full reply turn: persist the prompt, build the request, call the
/// completion service, and record the assistant's answer.
///
/// Returns `Err` only for storage failures; completion failures are folded
/// into the returned text as a fixed apology.
pub async fn generate_reply(
    data: &Data,
    settings: &GuildSettings,
    channel_id: &str,
    user_id: &str,
    guild_id: Option<&str>,
    prompt_text: &str,
) -> anyhow::Result<String> {
    let turn = context::assemble_turn(
        &data.db,
        &data.config,
        channel_id,
        user_id,
        guild_id,
        prompt_text,
    )?;
    if turn.new_conversation {
        data.stats.record_new_conversation();
    }

    let request = prompt::build_request(settings, &turn.messages, prompt_text)?;

    let response = match data.llm_client.complete(request).await {
        Ok(text) => text,
        Err(e) => {
            error!("Completion failed ({:?}): {}", e.kind, e);
            data.stats.record(true, true);
            return Ok(e.user_message().to_string());
        }
    };

    // Persist the assistant turn so it shows up in future context windows.
    if let Err(e) = data
        .db
        .append_message(turn.conversation_id, Role::Assistant, &response)
    {
        warn!("Failed to record assistant reply: {}", e);
    }
    data.stats.record(true, true);

    Ok(response)
}
