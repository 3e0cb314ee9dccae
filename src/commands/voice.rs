use crate::voice::events::DisconnectHandler;
use crate::{Context, Error};

/// Join your current voice channel
#[poise::command(
    slash_command,
    guild_only,
    required_bot_permissions = "CONNECT | SPEAK"
)]
pub async fn join(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command must be used in a server")?;

    let channel_id = {
        let guild = ctx.guild().ok_or("Could not access guild")?;
        guild
            .voice_states
            .get(&ctx.author().id)
            .and_then(|vs| vs.channel_id)
            .ok_or("You must be in a voice channel to use this command")?
    };

    let manager = songbird::get(ctx.serenity_context())
        .await
        .ok_or("Songbird Voice client not initialized")?
        .clone();
    let registry = ctx.data().voice.clone();

    // Claim before joining: a second /join racing this one loses the claim
    // instead of opening a duplicate connection.
    if !registry.try_claim(guild_id, channel_id).await {
        ctx.say("🔊 I'm already in a voice channel in this server. Use `/leave` first.")
            .await?;
        return Ok(());
    }

    match manager.join(guild_id, channel_id).await {
        Ok(call) => {
            let mut handler = call.lock().await;
            handler.add_global_event(
                songbird::Event::Core(songbird::CoreEvent::DriverDisconnect),
                DisconnectHandler {
                    guild_id,
                    registry: registry.clone(),
                },
            );
            drop(handler);
            ctx.say(format!("🔊 Joined <#{}>", channel_id)).await?;
        }
        Err(e) => {
            registry.release(guild_id).await;
            ctx.say(format!("❌ Failed to join voice channel: {}", e))
                .await?;
        }
    }

    Ok(())
}

/// Leave the voice channel
#[poise::command(slash_command, guild_only)]
pub async fn leave(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command must be used in a server")?;
    let manager = songbird::get(ctx.serenity_context())
        .await
        .ok_or("Songbird Voice client not initialized")?;

    if ctx.data().voice.release(guild_id).await {
        manager.remove(guild_id).await?;
        ctx.say("👋 Left voice channel").await?;
    } else {
        ctx.say("❌ I'm not in a voice channel").await?;
    }

    Ok(())
}
