use crate::voice::VoiceRegistry;
use serenity::async_trait;
use songbird::{Event, EventContext, EventHandler as VoiceEventHandler};
use std::sync::Arc;
use tracing::info;

/// Clears the registry entry when the driver loses its connection, so an
/// externally dropped session does not block a later join.
pub struct DisconnectHandler {
    pub guild_id: serenity::model::id::GuildId,
    pub registry: Arc<VoiceRegistry>,
}

#[async_trait]
impl VoiceEventHandler for DisconnectHandler {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::DriverDisconnect(_) = ctx {
            if self.registry.release(self.guild_id).await {
                info!(
                    "Voice driver disconnected in guild {}, clearing registry entry",
                    self.guild_id
                );
            }
        }
        None
    }
}
