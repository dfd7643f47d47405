use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::events::EventEnvelope;
use crate::runner::BotAction;
use crate::sdk::{Attribute, EventKind};

/// Trait for components that react to bot events off the SDK thread
pub trait EventConsumer: Send + 'static {
    fn handle_event(&mut self, envelope: EventEnvelope);
}

/// Event consumer that logs events to the console
pub struct LoggingConsumer;

impl EventConsumer for LoggingConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        let name = envelope.string(Attribute::AvatarName).unwrap_or("?");
        match envelope.kind {
            EventKind::Chat => {
                info!(
                    target: "events",
                    "{}: {}",
                    name,
                    envelope.string(Attribute::ChatMessage).unwrap_or_default()
                );
            }
            EventKind::AvatarAdd => {
                info!(
                    target: "events",
                    "{} entered (session {})",
                    name,
                    envelope.int(Attribute::AvatarSession).unwrap_or_default()
                );
            }
            EventKind::AvatarDelete => {
                info!(target: "events", "{} left", name);
            }
            EventKind::WorldDisconnect | EventKind::UniverseDisconnect => {
                warn!(target: "events", "Disconnected: {}", envelope.kind);
            }
            kind => {
                debug!(target: "events", "{} #{}", kind, envelope.context.sequence);
            }
        }
    }
}

/// Whispers a greeting to every avatar that comes into view
pub struct WelcomeConsumer {
    greeting: String,
    action_tx: UnboundedSender<BotAction>,
}

impl WelcomeConsumer {
    pub fn new(greeting: impl Into<String>, action_tx: UnboundedSender<BotAction>) -> Self {
        Self {
            greeting: greeting.into(),
            action_tx,
        }
    }
}

impl EventConsumer for WelcomeConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        if envelope.kind != EventKind::AvatarAdd {
            return;
        }
        let Some(session) = envelope.int(Attribute::AvatarSession) else {
            return;
        };
        let _ = self.action_tx.send(BotAction::Whisper {
            session,
            message: self.greeting.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventContext;
    use crate::sdk::InstanceHandle;
    use std::time::Instant;

    fn envelope(kind: EventKind, values: Vec<(Attribute, crate::sdk::AttributeValue)>) -> EventEnvelope {
        EventEnvelope {
            kind,
            values,
            context: EventContext {
                instance: InstanceHandle::from_raw(1).unwrap(),
                sequence: 0,
            },
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_welcome_whispers_new_avatars_only() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut consumer = WelcomeConsumer::new("Welcome!", tx);

        consumer.handle_event(envelope(
            EventKind::AvatarAdd,
            vec![(Attribute::AvatarSession, 31.into())],
        ));
        consumer.handle_event(envelope(
            EventKind::Chat,
            vec![(Attribute::ChatSession, 31.into())],
        ));

        assert_eq!(
            rx.try_recv().unwrap(),
            BotAction::Whisper {
                session: 31,
                message: "Welcome!".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_logging_consumer_handles_sparse_envelopes() {
        let mut consumer = LoggingConsumer;
        consumer.handle_event(envelope(EventKind::Chat, Vec::new()));
        consumer.handle_event(envelope(EventKind::WorldDisconnect, Vec::new()));
        consumer.handle_event(envelope(EventKind::Teleport, Vec::new()));
    }
}
