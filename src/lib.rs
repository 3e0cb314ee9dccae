pub mod chunk;
pub mod commands;
pub mod config;
pub mod context;
pub mod db;
pub mod llm;
pub mod policy;
pub mod prompt;
pub mod reply;
pub mod settings;
pub mod stats;
pub mod voice;

/// Custom data passed to all commands
pub struct Data {
    pub config: config::Config,
    pub db: db::Database,
    pub llm_client: llm::LlmClient,
    pub stats: stats::UsageTracker,
    pub voice: std::sync::Arc<voice::VoiceRegistry>,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Settings key used for direct messages, which carry no guild id.
pub const DM_GUILD_KEY: &str = "DM";
