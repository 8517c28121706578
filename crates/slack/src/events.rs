use std::sync::Arc;

use async_trait::async_trait;

/// One delivery from the socket transport, acknowledged by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlackEnvelope {
    pub envelope_id: String,
    pub event: SlackEvent,
}

/// The two event kinds that reach the core, plus everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackEvent {
    /// The bot was @-mentioned in a channel.
    AppMention { channel_id: String, user_id: String, text: String },
    /// A message event; only direct messages from humans are handled.
    Message {
        channel_id: String,
        channel_type: String,
        user_id: String,
        bot_id: Option<String>,
        text: String,
    },
    Unsupported { event_type: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    /// Reply text to post back into the originating channel.
    Responded { channel_id: String, text: String },
    Ignored,
}

/// The core's only contract with this front door.
#[async_trait]
pub trait CommandService: Send + Sync {
    async fn handle(&self, raw_text: &str) -> String;
}

/// Echo service used when no runtime is wired in.
pub struct NoopCommandService;

#[async_trait]
impl CommandService for NoopCommandService {
    async fn handle(&self, raw_text: &str) -> String {
        format!("received: {raw_text}")
    }
}

/// Routes envelopes to the command service, applying the front-door
/// filters: mentions are stripped of the bot tag, channel messages
/// without a mention are dropped, and so are the bot's own messages.
pub struct EventDispatcher {
    service: Arc<dyn CommandService>,
}

impl EventDispatcher {
    pub fn new(service: Arc<dyn CommandService>) -> Self {
        Self { service }
    }

    pub async fn dispatch(&self, envelope: &SlackEnvelope) -> HandlerResult {
        match &envelope.event {
            SlackEvent::AppMention { channel_id, text, .. } => {
                let cleaned = strip_mentions(text);
                if cleaned.is_empty() {
                    return HandlerResult::Responded {
                        channel_id: channel_id.clone(),
                        text: "How can I help with the pipeline? \
                               Try something like 'move Acme to Discovery'"
                            .to_string(),
                    };
                }
                HandlerResult::Responded {
                    channel_id: channel_id.clone(),
                    text: self.service.handle(&cleaned).await,
                }
            }
            SlackEvent::Message { channel_id, channel_type, bot_id, text, .. } => {
                if channel_type != "im" || bot_id.is_some() {
                    return HandlerResult::Ignored;
                }
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return HandlerResult::Ignored;
                }
                HandlerResult::Responded {
                    channel_id: channel_id.clone(),
                    text: self.service.handle(trimmed).await,
                }
            }
            SlackEvent::Unsupported { .. } => HandlerResult::Ignored,
        }
    }
}

/// Removes `<@USERID>` mention tags and collapses surrounding whitespace.
fn strip_mentions(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '<' && matches!(chars.peek(), Some('@')) {
            // Skip through the closing '>'; an unterminated tag eats the
            // rest of the line, matching how the platform renders it.
            for next in chars.by_ref() {
                if next == '>' {
                    break;
                }
            }
            continue;
        }
        output.push(ch);
    }

    output.split_whitespace().collect::<Vec<_>>().join(" ")
}
