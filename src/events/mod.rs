//! Republishing native SDK callbacks to local subscribers.
//!
//! The vendor library calls a parameterless handler per event slot and
//! leaves the payload in its attribute table. [`dispatch`] owns the
//! `extern "C"` side and routes each callback to the [`EventBus`] of the
//! instance that raised it. The bus hands subscribers a borrowed [`Event`]
//! for reading the payload in place, and broadcasts an owned
//! [`EventEnvelope`] to channel receivers.

mod bus;
pub(crate) mod dispatch;

use std::time::Instant;

pub use bus::{EventBus, Subscriber, SubscriptionId};

use crate::sdk::{self, Attribute, AttributeValue, EventKind, InstanceHandle, Sdk, ValueKind};

/// A callback in flight. Only valid while the native handler runs.
pub struct Event<'a> {
    sdk: &'a dyn Sdk,
    kind: EventKind,
    instance: InstanceHandle,
}

impl<'a> Event<'a> {
    pub fn new(sdk: &'a dyn Sdk, kind: EventKind, instance: InstanceHandle) -> Self {
        Self {
            sdk,
            kind,
            instance,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn instance(&self) -> InstanceHandle {
        self.instance
    }

    pub fn int(&self, attribute: Attribute) -> i32 {
        self.sdk.int(attribute)
    }

    pub fn bool(&self, attribute: Attribute) -> bool {
        self.sdk.bool(attribute)
    }

    pub fn float(&self, attribute: Attribute) -> f32 {
        self.sdk.float(attribute)
    }

    pub fn string(&self, attribute: Attribute) -> String {
        self.sdk.string(attribute)
    }

    pub fn data(&self, attribute: Attribute) -> Vec<u8> {
        self.sdk.data(attribute)
    }

    pub fn value(&self, attribute: Attribute, kind: ValueKind) -> AttributeValue {
        sdk::read(self.sdk, attribute, kind)
    }

    /// Copy this event's payload out of the attribute table.
    pub fn snapshot(&self, sequence: u64) -> EventEnvelope {
        let values = self
            .kind
            .attributes()
            .iter()
            .map(|&(attribute, kind)| (attribute, self.value(attribute, kind)))
            .collect();
        EventEnvelope {
            kind: self.kind,
            values,
            context: EventContext {
                instance: self.instance,
                sequence,
            },
            timestamp: Instant::now(),
        }
    }
}

/// Context information attached to every envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    /// Instance that raised the event
    pub instance: InstanceHandle,
    /// Position of this event on its bus
    pub sequence: u64,
}

/// Owned copy of an event, safe to send across threads
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub kind: EventKind,
    pub values: Vec<(Attribute, AttributeValue)>,
    pub context: EventContext,
    pub timestamp: Instant,
}

impl EventEnvelope {
    pub fn value(&self, attribute: Attribute) -> Option<&AttributeValue> {
        self.values
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, v)| v)
    }

    pub fn int(&self, attribute: Attribute) -> Option<i32> {
        self.value(attribute).and_then(AttributeValue::as_int)
    }

    pub fn string(&self, attribute: Attribute) -> Option<&str> {
        self.value(attribute).and_then(AttributeValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::FakeSdk;

    #[test]
    fn test_snapshot_copies_payload() {
        let sdk = FakeSdk::new();
        sdk.string_set(Attribute::AvatarName, "Visitor").unwrap();
        sdk.int_set(Attribute::ChatSession, 42).unwrap();
        sdk.string_set(Attribute::ChatMessage, "hello").unwrap();

        let instance = InstanceHandle::from_raw(1).unwrap();
        let envelope = Event::new(&sdk, EventKind::Chat, instance).snapshot(9);

        assert_eq!(envelope.kind, EventKind::Chat);
        assert_eq!(envelope.context.sequence, 9);
        assert_eq!(envelope.string(Attribute::AvatarName), Some("Visitor"));
        assert_eq!(envelope.string(Attribute::ChatMessage), Some("hello"));
        assert_eq!(envelope.int(Attribute::ChatSession), Some(42));
        assert_eq!(envelope.int(Attribute::WorldSize), None);
    }
}
