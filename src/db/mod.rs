use crate::config::Config;
use crate::settings::{ChannelMode, GuildSettings, Personality, ResponseLength, SlashMode};
use rusqlite::{Connection, OptionalExtension, Result, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub mod schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

/// One stored conversation turn, read back in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounters {
    pub server_count: i64,
    pub message_count: i64,
    pub conversation_count: i64,
    pub api_call_count: i64,
    pub uptime_secs: i64,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(config: &Config) -> Result<Self> {
        let conn = Connection::open(&config.database_url)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn execute_init(&self) -> anyhow::Result<()> {
        info!("Database: Initializing schema...");
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(schema::SCHEMA)?;
        debug!("Database: Schema initialized successfully");
        Ok(())
    }

    // --- Guild settings ---

    /// Fetch the settings row for a guild, creating it with defaults on
    /// first contact. The insert-or-ignore keeps concurrent first messages
    /// from racing a read against a conditional write.
    pub fn ensure_settings(&self, guild_id: &str) -> anyhow::Result<GuildSettings> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO guild_settings (guild_id) VALUES (?1)",
            [guild_id],
        )?;

        let mut stmt = conn.prepare(
            "SELECT guild_id, prefix, response_length, personality, code_formatting,
                    channel_mode, allowed_channels, slash_mode, activated_channels
             FROM guild_settings WHERE guild_id = ?1",
        )?;
        let settings = stmt.query_row([guild_id], Self::settings_from_row)?;
        Ok(settings)
    }

    pub fn upsert_settings(&self, settings: &GuildSettings) -> anyhow::Result<()> {
        debug!("Database: Upserting settings for guild {}", settings.guild_id);
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO guild_settings (guild_id, prefix, response_length, personality,
                 code_formatting, channel_mode, allowed_channels, slash_mode, activated_channels)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(guild_id) DO UPDATE SET
                 prefix = ?2, response_length = ?3, personality = ?4, code_formatting = ?5,
                 channel_mode = ?6, allowed_channels = ?7, slash_mode = ?8,
                 activated_channels = ?9, updated_at = CURRENT_TIMESTAMP",
            rusqlite::params![
                settings.guild_id,
                settings.prefix,
                settings.response_length.as_str(),
                settings.personality.as_str(),
                settings.code_formatting,
                settings.channel_mode.as_str(),
                serde_json::to_string(&settings.allowed_channels)?,
                settings.slash_mode.as_str(),
                serde_json::to_string(&settings.activated_channels)?,
            ],
        )?;
        Ok(())
    }

    /// Add a channel to the activated set. Returns false when it was already
    /// present; either way the stored set holds the id at most once.
    pub fn add_activated_channel(&self, guild_id: &str, channel_id: &str) -> anyhow::Result<bool> {
        self.update_channel_set(guild_id, "activated_channels", channel_id, true, false)
    }

    pub fn remove_activated_channel(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> anyhow::Result<bool> {
        self.update_channel_set(guild_id, "activated_channels", channel_id, false, false)
    }

    /// Add a channel to the allowlist and flip the guild into restricted
    /// channel mode.
    pub fn add_allowed_channel(&self, guild_id: &str, channel_id: &str) -> anyhow::Result<bool> {
        self.update_channel_set(guild_id, "allowed_channels", channel_id, true, true)
    }

    pub fn remove_allowed_channel(&self, guild_id: &str, channel_id: &str) -> anyhow::Result<bool> {
        self.update_channel_set(guild_id, "allowed_channels", channel_id, false, false)
    }

    fn update_channel_set(
        &self,
        guild_id: &str,
        column: &str,
        channel_id: &str,
        insert: bool,
        mark_specific: bool,
    ) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO guild_settings (guild_id) VALUES (?1)",
            [guild_id],
        )?;

        let raw: String = conn.query_row(
            &format!("SELECT {} FROM guild_settings WHERE guild_id = ?1", column),
            [guild_id],
            |row| row.get(0),
        )?;
        let mut channels: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();

        let changed = if insert {
            if channels.iter().any(|c| c == channel_id) {
                false
            } else {
                channels.push(channel_id.to_string());
                true
            }
        } else {
            let before = channels.len();
            channels.retain(|c| c != channel_id);
            channels.len() != before
        };

        let mode_update = if mark_specific {
            ", channel_mode = 'specific'"
        } else {
            ""
        };
        conn.execute(
            &format!(
                "UPDATE guild_settings SET {} = ?1, updated_at = CURRENT_TIMESTAMP{} WHERE guild_id = ?2",
                column, mode_update
            ),
            (serde_json::to_string(&channels)?, guild_id),
        )?;
        Ok(changed)
    }

    fn settings_from_row(row: &Row<'_>) -> Result<GuildSettings> {
        let allowed_raw: String = row.get(6)?;
        let activated_raw: String = row.get(8)?;
        Ok(GuildSettings {
            guild_id: row.get(0)?,
            prefix: row.get(1)?,
            response_length: ResponseLength::parse(&row.get::<_, String>(2)?),
            personality: Personality::parse(&row.get::<_, String>(3)?),
            code_formatting: row.get(4)?,
            channel_mode: ChannelMode::parse(&row.get::<_, String>(5)?),
            allowed_channels: serde_json::from_str(&allowed_raw).unwrap_or_default(),
            slash_mode: SlashMode::parse(&row.get::<_, String>(7)?),
            activated_channels: serde_json::from_str(&activated_raw).unwrap_or_default(),
        })
    }

    // --- Conversations ---

    /// Find the most recent conversation for a (channel, user) pair, or start
    /// a new one. Returns the conversation id and whether it was created.
    /// Multiple rows per pair can exist; most recent by creation time wins.
    pub fn get_or_create_conversation(
        &self,
        channel_id: &str,
        user_id: &str,
        guild_id: Option<&str>,
    ) -> anyhow::Result<(i64, bool)> {
        let conn = self.conn.lock().unwrap();
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM conversations
                 WHERE channel_id = ?1 AND user_id = ?2
                 ORDER BY created_at DESC, id DESC LIMIT 1",
                (channel_id, user_id),
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok((id, false));
        }

        debug!(
            "Database: Starting conversation for user {} in channel {}",
            user_id, channel_id
        );
        conn.execute(
            "INSERT INTO conversations (channel_id, user_id, guild_id) VALUES (?1, ?2, ?3)",
            (channel_id, user_id, guild_id),
        )?;
        Ok((conn.last_insert_rowid(), true))
    }

    pub fn append_message(
        &self,
        conversation_id: i64,
        role: Role,
        content: &str,
    ) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO conversation_messages (conversation_id, role, content) VALUES (?1, ?2, ?3)",
            (conversation_id, role.as_str(), content),
        )?;
        Ok(())
    }

    /// The last `limit` messages of a conversation, oldest first.
    pub fn trailing_messages(
        &self,
        conversation_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT role, content FROM conversation_messages
             WHERE conversation_id = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map((conversation_id, limit as i64), |row| {
            Ok(StoredMessage {
                role: Role::parse(&row.get::<_, String>(0)?),
                content: row.get(1)?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        messages.reverse();
        Ok(messages)
    }

    // --- Usage counters ---

    pub fn get_counters(&self) -> anyhow::Result<UsageCounters> {
        let conn = self.conn.lock().unwrap();
        let (_, counters) = Self::read_latest_counters(&conn)?;
        Ok(counters)
    }

    /// Read-most-recent, apply delta, write back with a fresh timestamp.
    /// Concurrent patches can lose an increment; the counters are telemetry,
    /// not a ledger.
    pub fn patch_counters(&self, apply: impl FnOnce(&mut UsageCounters)) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        let (row_id, mut counters) = Self::read_latest_counters(&conn)?;
        apply(&mut counters);

        match row_id {
            Some(id) => {
                conn.execute(
                    "UPDATE usage_counters SET server_count = ?1, message_count = ?2,
                         conversation_count = ?3, api_call_count = ?4, uptime_secs = ?5,
                         updated_at = CURRENT_TIMESTAMP
                     WHERE id = ?6",
                    rusqlite::params![
                        counters.server_count,
                        counters.message_count,
                        counters.conversation_count,
                        counters.api_call_count,
                        counters.uptime_secs,
                        id,
                    ],
                )?;
            }
            None => {
                conn.execute(
                    "INSERT INTO usage_counters
                         (server_count, message_count, conversation_count, api_call_count, uptime_secs)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        counters.server_count,
                        counters.message_count,
                        counters.conversation_count,
                        counters.api_call_count,
                        counters.uptime_secs,
                    ],
                )?;
            }
        }
        Ok(())
    }

    fn read_latest_counters(conn: &Connection) -> anyhow::Result<(Option<i64>, UsageCounters)> {
        let row = conn
            .query_row(
                "SELECT id, server_count, message_count, conversation_count, api_call_count, uptime_secs
                 FROM usage_counters ORDER BY updated_at DESC, id DESC LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        UsageCounters {
                            server_count: row.get(1)?,
                            message_count: row.get(2)?,
                            conversation_count: row.get(3)?,
                            api_call_count: row.get(4)?,
                            uptime_secs: row.get(5)?,
                        },
                    ))
                },
            )
            .optional()?;

        Ok(match row {
            Some((id, counters)) => (Some(id), counters),
            None => (None, UsageCounters::default()),
        })
    }
}
