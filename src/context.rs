//! Rolling conversation context for completion prompts.
//!
//! Each (channel, user) pair owns a conversation; the incoming message is
//! persisted first, then the trailing window is read back so the new turn is
//! part of the context handed to the request builder.

use crate::config::Config;
use crate::db::{Database, Role, StoredMessage};

pub struct TurnContext {
    pub conversation_id: i64,
    pub new_conversation: bool,
    pub messages: Vec<StoredMessage>,
}

/// Persist the incoming user message and return the trailing context window.
///
/// A storage failure aborts the turn here, before any completion call is
/// made; a reply that could not be recorded is never generated.
pub fn assemble_turn(
    db: &Database,
    config: &Config,
    channel_id: &str,
    user_id: &str,
    guild_id: Option<&str>,
    content: &str,
) -> anyhow::Result<TurnContext> {
    let (conversation_id, new_conversation) =
        db.get_or_create_conversation(channel_id, user_id, guild_id)?;
    db.append_message(conversation_id, Role::User, content)?;
    let messages = db.trailing_messages(conversation_id, config.max_context_messages)?;

    Ok(TurnContext {
        conversation_id,
        new_conversation,
        messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy;
    use crate::prompt;

    fn test_config() -> Config {
        Config {
            discord_token: "test".to_string(),
            openai_url: "test".to_string(),
            openai_api_key: None,
            openai_model: "test".to_string(),
            database_url: ":memory:".to_string(),
            status_message: "test".to_string(),
            max_context_messages: 10,
        }
    }

    fn test_db() -> Database {
        let db = Database::new(&test_config()).unwrap();
        db.execute_init().unwrap();
        db
    }

    #[test]
    fn test_first_turn_creates_conversation_and_stores_message() {
        let db = test_db();
        let config = test_config();

        let turn = assemble_turn(&db, &config, "general", "U1", Some("g1"), "hello").unwrap();
        assert!(turn.new_conversation);
        assert_eq!(turn.messages.len(), 1);
        assert_eq!(turn.messages[0].role, Role::User);
        assert_eq!(turn.messages[0].content, "hello");
    }

    #[test]
    fn test_window_caps_at_ten_after_eleven_turns() {
        let db = test_db();
        let config = test_config();

        for i in 1..=11 {
            assemble_turn(&db, &config, "c1", "u1", None, &format!("turn {}", i)).unwrap();
        }
        let turn = assemble_turn(&db, &config, "c1", "u1", None, "turn 12").unwrap();

        assert!(!turn.new_conversation);
        assert_eq!(turn.messages.len(), 10);
        assert_eq!(turn.messages[0].content, "turn 3");
        assert_eq!(turn.messages[9].content, "turn 12");
    }

    #[test]
    fn test_assistant_turns_survive_in_the_window() {
        let db = test_db();
        let config = test_config();

        let turn = assemble_turn(&db, &config, "c1", "u1", None, "question").unwrap();
        db.append_message(turn.conversation_id, Role::Assistant, "answer")
            .unwrap();

        let turn = assemble_turn(&db, &config, "c1", "u1", None, "follow-up").unwrap();
        let roles: Vec<Role> = turn.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    }

    // First contact end to end, minus the gateway and the completion call:
    // defaults created, message admitted, conversation started, one stored
    // turn, and the request builder suppresses the duplicate prompt.
    #[test]
    fn test_first_contact_flow() {
        let db = test_db();
        let config = test_config();

        let settings = db.ensure_settings("g1").unwrap();
        assert!(policy::should_auto_respond(&settings, "general"));

        let turn = assemble_turn(&db, &config, "general", "U1", Some("g1"), "hi there").unwrap();
        assert!(turn.new_conversation);
        assert_eq!(turn.messages.len(), 1);

        let request = prompt::build_request(&settings, &turn.messages, "hi there").unwrap();
        // System instruction plus the single context entry; the prompt is
        // already the trailing entry and must not be sent twice.
        assert_eq!(request.messages.len(), 2);
    }
}
