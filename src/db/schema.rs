/// Idempotent schema, applied at startup.
pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS guild_settings (
        guild_id TEXT PRIMARY KEY,
        prefix TEXT NOT NULL DEFAULT '!',
        response_length TEXT NOT NULL DEFAULT 'medium',
        personality TEXT NOT NULL DEFAULT 'helpful',
        code_formatting BOOLEAN NOT NULL DEFAULT TRUE,
        channel_mode TEXT NOT NULL DEFAULT 'all',
        allowed_channels TEXT NOT NULL DEFAULT '[]',
        slash_mode TEXT NOT NULL DEFAULT 'disabled',
        activated_channels TEXT NOT NULL DEFAULT '[]',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS conversations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        guild_id TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_conversations_pair
        ON conversations (channel_id, user_id, created_at);

    CREATE TABLE IF NOT EXISTS conversation_messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        conversation_id INTEGER NOT NULL REFERENCES conversations(id),
        role TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_messages_conversation
        ON conversation_messages (conversation_id, id);

    CREATE TABLE IF NOT EXISTS usage_counters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        server_count INTEGER NOT NULL DEFAULT 0,
        message_count INTEGER NOT NULL DEFAULT 0,
        conversation_count INTEGER NOT NULL DEFAULT 0,
        api_call_count INTEGER NOT NULL DEFAULT 0,
        uptime_secs INTEGER NOT NULL DEFAULT 0,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";
