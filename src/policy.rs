//! Decides whether an incoming plain message gets an automatic reply.
//!
//! The /ask command bypasses this entirely: an explicit invocation is always
//! answered, gated only by Discord-side permissions.

use crate::settings::{ChannelMode, GuildSettings, SlashMode};

/// First matching rule wins:
/// 1. channel restriction active and this channel is not on the allowlist
/// 2. mode `required` turns plain-message replies off everywhere
/// 3. mode `activated` only replies in explicitly activated channels
pub fn should_auto_respond(settings: &GuildSettings, channel_id: &str) -> bool {
    if settings.channel_mode == ChannelMode::Specific
        && !settings.allowed_channels.is_empty()
        && !settings.allowed_channels.iter().any(|c| c == channel_id)
    {
        return false;
    }

    match settings.slash_mode {
        SlashMode::Required => false,
        SlashMode::Activated => settings.activated_channels.iter().any(|c| c == channel_id),
        SlashMode::Disabled | SlashMode::Enabled => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> GuildSettings {
        GuildSettings::defaults("guild-1")
    }

    #[test]
    fn defaults_admit_everywhere() {
        let settings = base_settings();
        assert!(should_auto_respond(&settings, "C1"));
        assert!(should_auto_respond(&settings, "C2"));
    }

    #[test]
    fn required_mode_denies_regardless_of_channel_lists() {
        let mut settings = base_settings();
        settings.slash_mode = SlashMode::Required;
        settings.activated_channels = vec!["C1".to_string()];
        assert!(!should_auto_respond(&settings, "C1"));
        assert!(!should_auto_respond(&settings, "C2"));
    }

    #[test]
    fn activated_mode_admits_only_activated_channels() {
        let mut settings = base_settings();
        settings.slash_mode = SlashMode::Activated;
        settings.activated_channels = vec!["C1".to_string()];
        assert!(should_auto_respond(&settings, "C1"));
        assert!(!should_auto_respond(&settings, "C2"));
    }

    #[test]
    fn channel_restriction_denies_channels_off_the_allowlist() {
        let mut settings = base_settings();
        settings.channel_mode = ChannelMode::Specific;
        settings.allowed_channels = vec!["general".to_string()];
        assert!(should_auto_respond(&settings, "general"));
        assert!(!should_auto_respond(&settings, "random"));
    }

    #[test]
    fn empty_allowlist_does_not_restrict() {
        let mut settings = base_settings();
        settings.channel_mode = ChannelMode::Specific;
        assert!(should_auto_respond(&settings, "anywhere"));
    }

    #[test]
    fn restriction_applies_before_activation() {
        let mut settings = base_settings();
        settings.channel_mode = ChannelMode::Specific;
        settings.allowed_channels = vec!["C1".to_string()];
        settings.slash_mode = SlashMode::Activated;
        settings.activated_channels = vec!["C2".to_string()];
        // C2 is activated but not allowed; C1 is allowed but not activated.
        assert!(!should_auto_respond(&settings, "C2"));
        assert!(!should_auto_respond(&settings, "C1"));
    }
}
