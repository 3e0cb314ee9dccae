use crate::settings::{ChannelMode, Personality, ResponseLength, SlashMode};
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Manage how the assistant responds in this server
#[poise::command(
    slash_command,
    subcommands("show", "set", "restrict", "unrestrict"),
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show the current response settings
#[poise::command(slash_command)]
pub async fn show(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    let settings = ctx.data().db.ensure_settings(&guild_id.to_string())?;

    let channels = match settings.channel_mode {
        ChannelMode::All => "all channels".to_string(),
        ChannelMode::Specific => format!("{} allowed channel(s)", settings.allowed_channels.len()),
    };

    let embed = serenity::CreateEmbed::new()
        .title("⚙️ Response Settings")
        .field("Personality", settings.personality.as_str(), true)
        .field("Response length", settings.response_length.as_str(), true)
        .field(
            "Code formatting",
            if settings.code_formatting { "on" } else { "off" },
            true,
        )
        .field("Mode", settings.slash_mode.as_str(), true)
        .field("Channels", channels, true)
        .field(
            "Activated channels",
            settings.activated_channels.len().to_string(),
            true,
        )
        .color(0x5865F2);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Change personality, response length or code formatting
#[poise::command(slash_command)]
pub async fn set(
    ctx: Context<'_>,
    #[description = "How the assistant should sound"] personality: Option<Personality>,
    #[description = "How long responses should be"] length: Option<ResponseLength>,
    #[description = "Wrap code in code blocks"] code_formatting: Option<bool>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    if personality.is_none() && length.is_none() && code_formatting.is_none() {
        ctx.say("❌ Please specify at least one setting to change.")
            .await?;
        return Ok(());
    }

    let mut settings = ctx.data().db.ensure_settings(&guild_id.to_string())?;
    let mut confirmations = Vec::new();
    if let Some(p) = personality {
        settings.personality = p;
        confirmations.push(format!("personality to **{}**", p.as_str()));
    }
    if let Some(l) = length {
        settings.response_length = l;
        confirmations.push(format!("response length to **{}**", l.as_str()));
    }
    if let Some(f) = code_formatting {
        settings.code_formatting = f;
        confirmations.push(format!("code formatting **{}**", if f { "on" } else { "off" }));
    }
    ctx.data().db.upsert_settings(&settings)?;

    ctx.say(format!("✅ Updated settings: set {}", confirmations.join(" and ")))
        .await?;

    Ok(())
}

/// Restrict automatic replies to this channel
#[poise::command(slash_command)]
pub async fn restrict(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    let channel_id = ctx.channel_id().to_string();

    let added = ctx
        .data()
        .db
        .add_allowed_channel(&guild_id.to_string(), &channel_id)?;

    let content = if added {
        format!("✅ Added <#{}> to the allowed channels.", channel_id)
    } else {
        format!("ℹ️ <#{}> is already an allowed channel.", channel_id)
    };
    ctx.send(poise::CreateReply::default().content(content).ephemeral(true))
        .await?;

    Ok(())
}

/// Remove this channel from the allowed list
#[poise::command(slash_command)]
pub async fn unrestrict(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    let channel_id = ctx.channel_id().to_string();

    let removed = ctx
        .data()
        .db
        .remove_allowed_channel(&guild_id.to_string(), &channel_id)?;

    let content = if removed {
        format!("✅ Removed <#{}> from the allowed channels.", channel_id)
    } else {
        format!("ℹ️ <#{}> was not an allowed channel.", channel_id)
    };
    ctx.send(poise::CreateReply::default().content(content).ephemeral(true))
        .await?;

    Ok(())
}

/// Set how the assistant decides when to reply
#[poise::command(
    slash_command,
    rename = "mode",
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn set_mode(
    ctx: Context<'_>,
    #[description = "Response mode"] mode: SlashMode,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    let mut settings = ctx.data().db.ensure_settings(&guild_id.to_string())?;
    settings.slash_mode = mode;
    ctx.data().db.upsert_settings(&settings)?;

    ctx.say(format!(
        "✅ Mode set to **{}**. {}",
        mode.as_str(),
        mode.description()
    ))
    .await?;

    Ok(())
}

/// Opt this channel in to automatic replies
#[poise::command(
    slash_command,
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn activate(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    let channel_id = ctx.channel_id().to_string();
    let db = &ctx.data().db;

    let added = db.add_activated_channel(&guild_id.to_string(), &channel_id)?;

    // First activation also switches a guild that never picked a mode over
    // to activated, so the opt-in takes effect immediately.
    let mut settings = db.ensure_settings(&guild_id.to_string())?;
    if settings.slash_mode == SlashMode::Disabled {
        settings.slash_mode = SlashMode::Activated;
        db.upsert_settings(&settings)?;
    }

    let content = if added {
        format!("✅ I'll now reply to messages in <#{}>.", channel_id)
    } else {
        format!("ℹ️ <#{}> is already activated.", channel_id)
    };
    ctx.send(poise::CreateReply::default().content(content).ephemeral(true))
        .await?;

    Ok(())
}

/// Opt this channel out of automatic replies
#[poise::command(
    slash_command,
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn deactivate(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    let channel_id = ctx.channel_id().to_string();

    let removed = ctx
        .data()
        .db
        .remove_activated_channel(&guild_id.to_string(), &channel_id)?;

    let content = if removed {
        format!("✅ I'll no longer reply to messages in <#{}>.", channel_id)
    } else {
        format!("ℹ️ <#{}> was not activated.", channel_id)
    };
    ctx.send(poise::CreateReply::default().content(content).ephemeral(true))
        .await?;

    Ok(())
}
