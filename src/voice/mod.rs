//! Per-guild voice connection tracking.

pub mod events;

use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Owns the guild -> voice channel map. Claim and release both run under a
/// single lock, so two near-simultaneous join commands cannot both pass a
/// membership check and double-connect.
#[derive(Default)]
pub struct VoiceRegistry {
    connected: Mutex<HashMap<serenity::GuildId, serenity::ChannelId>>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the guild's slot. Returns false when a connection is already
    /// registered; the caller must not join in that case.
    pub async fn try_claim(
        &self,
        guild_id: serenity::GuildId,
        channel_id: serenity::ChannelId,
    ) -> bool {
        let mut connected = self.connected.lock().await;
        if connected.contains_key(&guild_id) {
            return false;
        }
        connected.insert(guild_id, channel_id);
        true
    }

    /// Drop the guild's slot. Returns false when nothing was registered, so
    /// transport-driven cleanup after an explicit leave is a no-op.
    pub async fn release(&self, guild_id: serenity::GuildId) -> bool {
        self.connected.lock().await.remove(&guild_id).is_some()
    }

    pub async fn current_channel(
        &self,
        guild_id: serenity::GuildId,
    ) -> Option<serenity::ChannelId> {
        self.connected.lock().await.get(&guild_id).copied()
    }
}
