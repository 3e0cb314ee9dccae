//! Per-guild response configuration.
//!
//! One row per guild (direct messages share the `DM` sentinel row). Rows are
//! created lazily with these defaults on first contact and only change
//! through the explicit settings commands.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, poise::ChoiceParameter)]
pub enum ResponseLength {
    #[name = "concise"]
    Concise,
    #[default]
    #[name = "medium"]
    Medium,
    #[name = "detailed"]
    Detailed,
}

impl ResponseLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseLength::Concise => "concise",
            ResponseLength::Medium => "medium",
            ResponseLength::Detailed => "detailed",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "concise" => ResponseLength::Concise,
            "detailed" => ResponseLength::Detailed,
            _ => ResponseLength::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, poise::ChoiceParameter)]
pub enum Personality {
    #[default]
    #[name = "helpful"]
    Helpful,
    #[name = "friendly"]
    Friendly,
    #[name = "technical"]
    Technical,
    #[name = "creative"]
    Creative,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Helpful => "helpful",
            Personality::Friendly => "friendly",
            Personality::Technical => "technical",
            Personality::Creative => "creative",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "friendly" => Personality::Friendly,
            "technical" => Personality::Technical,
            "creative" => Personality::Creative,
            _ => Personality::Helpful,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    #[default]
    All,
    Specific,
}

impl ChannelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelMode::All => "all",
            ChannelMode::Specific => "specific",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "specific" => ChannelMode::Specific,
            _ => ChannelMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, poise::ChoiceParameter)]
pub enum SlashMode {
    #[default]
    #[name = "disabled"]
    Disabled,
    #[name = "enabled"]
    Enabled,
    #[name = "required"]
    Required,
    #[name = "activated"]
    Activated,
}

impl SlashMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlashMode::Disabled => "disabled",
            SlashMode::Enabled => "enabled",
            SlashMode::Required => "required",
            SlashMode::Activated => "activated",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "enabled" => SlashMode::Enabled,
            "required" => SlashMode::Required,
            "activated" => SlashMode::Activated,
            _ => SlashMode::Disabled,
        }
    }

    /// Operator-facing description shown when the mode is changed.
    pub fn description(&self) -> &'static str {
        match self {
            SlashMode::Disabled => {
                "Slash-command mode is off. I reply to regular messages wherever the channel settings allow."
            }
            SlashMode::Enabled => {
                "Slash commands are available and I still reply to regular messages."
            }
            SlashMode::Required => {
                "I only respond to the /ask command. Regular messages are ignored."
            }
            SlashMode::Activated => {
                "I only reply to regular messages in channels opted in with /activate."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub guild_id: String,
    /// Legacy text-command prefix. Persisted but no longer consulted.
    pub prefix: String,
    pub response_length: ResponseLength,
    pub personality: Personality,
    pub code_formatting: bool,
    pub channel_mode: ChannelMode,
    pub allowed_channels: Vec<String>,
    pub slash_mode: SlashMode,
    pub activated_channels: Vec<String>,
}

impl GuildSettings {
    pub fn defaults(guild_id: &str) -> Self {
        Self {
            guild_id: guild_id.to_string(),
            prefix: "!".to_string(),
            response_length: ResponseLength::default(),
            personality: Personality::default(),
            code_formatting: true,
            channel_mode: ChannelMode::default(),
            allowed_channels: Vec::new(),
            slash_mode: SlashMode::default(),
            activated_channels: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_contact_behavior() {
        let settings = GuildSettings::defaults("123");
        assert_eq!(settings.response_length, ResponseLength::Medium);
        assert_eq!(settings.personality, Personality::Helpful);
        assert!(settings.code_formatting);
        assert_eq!(settings.channel_mode, ChannelMode::All);
        assert_eq!(settings.slash_mode, SlashMode::Disabled);
        assert!(settings.allowed_channels.is_empty());
        assert!(settings.activated_channels.is_empty());
    }

    #[test]
    fn enum_round_trips() {
        for mode in [
            SlashMode::Disabled,
            SlashMode::Enabled,
            SlashMode::Required,
            SlashMode::Activated,
        ] {
            assert_eq!(SlashMode::parse(mode.as_str()), mode);
        }
        for personality in [
            Personality::Helpful,
            Personality::Friendly,
            Personality::Technical,
            Personality::Creative,
        ] {
            assert_eq!(Personality::parse(personality.as_str()), personality);
        }
    }

    #[test]
    fn unknown_stored_values_fall_back_to_defaults() {
        assert_eq!(ResponseLength::parse("verbose"), ResponseLength::Medium);
        assert_eq!(Personality::parse(""), Personality::Helpful);
        assert_eq!(SlashMode::parse("bogus"), SlashMode::Disabled);
    }
}
