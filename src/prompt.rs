//! Builds completion requests from guild settings and trailing context.

use crate::db::{Role, StoredMessage};
use crate::settings::{GuildSettings, Personality, ResponseLength};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

const BASE_CLAUSE: &str = "You are a helpful Discord assistant.";
const FORMATTING_CLAUSE: &str = "Format any code in fenced code blocks.";

pub struct CompletionRequest {
    pub messages: Vec<ChatCompletionRequestMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

fn personality_clause(personality: Personality) -> &'static str {
    match personality {
        Personality::Helpful => "Be accurate and genuinely useful in your answers.",
        Personality::Friendly => "Be warm, conversational and approachable.",
        Personality::Technical => "Be precise and detail-oriented, like an experienced engineer.",
        Personality::Creative => "Be imaginative and original in how you respond.",
    }
}

fn length_clause(length: ResponseLength) -> &'static str {
    match length {
        ResponseLength::Concise => "Keep your responses short and to the point.",
        ResponseLength::Medium => "Give moderately detailed responses.",
        ResponseLength::Detailed => "Give thorough, comprehensive responses.",
    }
}

pub fn system_instruction(settings: &GuildSettings) -> String {
    let mut instruction = format!(
        "{} {} {}",
        BASE_CLAUSE,
        personality_clause(settings.personality),
        length_clause(settings.response_length)
    );
    if settings.code_formatting {
        instruction.push(' ');
        instruction.push_str(FORMATTING_CLAUSE);
    }
    instruction
}

pub fn max_output_tokens(length: ResponseLength) -> u32 {
    match length {
        ResponseLength::Concise => 500,
        ResponseLength::Medium => 1000,
        ResponseLength::Detailed => 1500,
    }
}

pub fn sampling_temperature(personality: Personality) -> f32 {
    if personality == Personality::Creative {
        0.8
    } else {
        0.7
    }
}

/// Assemble the ordered prompt sequence: system instruction, role-tagged
/// context, then the current prompt — unless the prompt is already the
/// trailing context entry, in which case it is not sent twice.
pub fn build_request(
    settings: &GuildSettings,
    context: &[StoredMessage],
    prompt: &str,
) -> anyhow::Result<CompletionRequest> {
    let mut messages: Vec<ChatCompletionRequestMessage> =
        vec![ChatCompletionRequestSystemMessageArgs::default()
            .content(system_instruction(settings))
            .build()?
            .into()];

    for stored in context {
        let message: ChatCompletionRequestMessage = match stored.role {
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(stored.content.clone())
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(stored.content.clone())
                .build()?
                .into(),
        };
        messages.push(message);
    }

    let already_trailing = context
        .last()
        .map_or(false, |m| m.role == Role::User && m.content == prompt);
    if !already_trailing {
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        );
    }

    Ok(CompletionRequest {
        messages,
        max_tokens: max_output_tokens(settings.response_length),
        temperature: sampling_temperature(settings.personality),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GuildSettings {
        GuildSettings::defaults("g1")
    }

    fn user(content: &str) -> StoredMessage {
        StoredMessage {
            role: Role::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> StoredMessage {
        StoredMessage {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }

    #[test]
    fn creative_personality_raises_temperature() {
        let mut s = settings();
        assert_eq!(sampling_temperature(s.personality), 0.7);
        s.personality = Personality::Creative;
        assert_eq!(sampling_temperature(s.personality), 0.8);
    }

    #[test]
    fn response_length_maps_to_max_tokens() {
        assert_eq!(max_output_tokens(ResponseLength::Concise), 500);
        assert_eq!(max_output_tokens(ResponseLength::Medium), 1000);
        assert_eq!(max_output_tokens(ResponseLength::Detailed), 1500);
    }

    #[test]
    fn instruction_carries_personality_and_length_clauses() {
        let mut s = settings();
        s.personality = Personality::Technical;
        s.response_length = ResponseLength::Concise;

        let instruction = system_instruction(&s);
        assert!(instruction.starts_with(BASE_CLAUSE));
        assert!(instruction.contains(personality_clause(Personality::Technical)));
        assert!(instruction.contains(length_clause(ResponseLength::Concise)));
        assert!(instruction.contains(FORMATTING_CLAUSE));
    }

    #[test]
    fn formatting_clause_is_optional() {
        let mut s = settings();
        s.code_formatting = false;
        assert!(!system_instruction(&s).contains(FORMATTING_CLAUSE));
    }

    #[test]
    fn prompt_already_in_context_is_not_duplicated() {
        let context = vec![user("hello"), assistant("hi!"), user("how are you?")];
        let request = build_request(&settings(), &context, "how are you?").unwrap();
        // system + 3 context entries, no extra prompt message
        assert_eq!(request.messages.len(), 4);
    }

    #[test]
    fn prompt_is_appended_when_context_trails_differently() {
        let context = vec![user("hello"), assistant("hi!")];
        let request = build_request(&settings(), &context, "how are you?").unwrap();
        assert_eq!(request.messages.len(), 4);
    }

    #[test]
    fn empty_context_still_yields_system_and_prompt() {
        let request = build_request(&settings(), &[], "hello").unwrap();
        assert_eq!(request.messages.len(), 2);
    }
}
