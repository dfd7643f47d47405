use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::error::Result;
use crate::events::{dispatch, Event, EventEnvelope};
use crate::sdk::{EventKind, InstanceHandle, Sdk};

const CHANNEL_CAPACITY: usize = 256;

/// Callback invoked for every event of the kind it subscribed to.
pub type Subscriber = Arc<dyn Fn(&Event<'_>) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscriptions {
    by_kind: BTreeMap<EventKind, Vec<(SubscriptionId, Subscriber)>>,
    hooked: BTreeSet<EventKind>,
}

pub(crate) struct BusShared {
    pub(crate) sdk: Arc<dyn Sdk>,
    pub(crate) instance: InstanceHandle,
    subscriptions: Mutex<Subscriptions>,
    next_id: AtomicU64,
    sequence: AtomicU64,
    sender: broadcast::Sender<EventEnvelope>,
}

impl BusShared {
    fn lock(&self) -> MutexGuard<'_, Subscriptions> {
        self.subscriptions.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn publish(&self, event: &Event<'_>) {
        let kind = event.kind();
        // Cloned so subscribers may (un)subscribe while being called.
        let subscribers: Vec<Subscriber> = self
            .lock()
            .by_kind
            .get(&kind)
            .map(|subs| subs.iter().map(|(_, s)| s.clone()).collect())
            .unwrap_or_default();

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        debug!(
            target: "events",
            "{} #{} on instance {} -> {} subscriber(s)",
            kind,
            sequence,
            self.instance.as_raw(),
            subscribers.len()
        );

        // Taken up front: subscribers may call into the SDK and overwrite
        // the attributes this event carries.
        let envelope = (self.sender.receiver_count() > 0).then(|| event.snapshot(sequence));

        for subscriber in subscribers {
            if panic::catch_unwind(AssertUnwindSafe(|| subscriber(event))).is_err() {
                error!(target: "events", "Subscriber for {} panicked", kind);
            }
        }

        if let Some(envelope) = envelope {
            let _ = self.sender.send(envelope);
        }
    }
}

impl Drop for BusShared {
    fn drop(&mut self) {
        dispatch::unregister_route();
    }
}

/// Per-instance event bus.
///
/// Cloning is cheap; every clone shares the same subscribers.
#[derive(Clone)]
pub struct EventBus {
    shared: Arc<BusShared>,
}

impl EventBus {
    pub fn new(sdk: Arc<dyn Sdk>, instance: InstanceHandle) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let shared = Arc::new(BusShared {
            sdk,
            instance,
            subscriptions: Mutex::new(Subscriptions::default()),
            next_id: AtomicU64::new(1),
            sequence: AtomicU64::new(0),
            sender,
        });
        dispatch::register_route(&shared);
        EventBus { shared }
    }

    pub fn instance(&self) -> InstanceHandle {
        self.shared.instance
    }

    pub(crate) fn downgrade(&self) -> Weak<BusShared> {
        Arc::downgrade(&self.shared)
    }

    /// Install the native handler for `kind` unless this bus already did.
    pub fn hook(&self, kind: EventKind) -> Result<()> {
        let mut subs = self.shared.lock();
        if subs.hooked.contains(&kind) {
            return Ok(());
        }
        self.shared
            .sdk
            .event_set(kind, Some(dispatch::trampoline_for(kind)))?;
        subs.hooked.insert(kind);
        debug!(target: "events", "Hooked native slot {}", kind);
        Ok(())
    }

    pub fn subscribe<F>(&self, kind: EventKind, subscriber: F) -> Result<SubscriptionId>
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.hook(kind)?;
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        self.shared
            .lock()
            .by_kind
            .entry(kind)
            .or_default()
            .push((id, Arc::new(subscriber)));
        Ok(id)
    }

    /// Remove a subscriber. Unknown ids are ignored and the native slot
    /// stays hooked.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) {
        if let Some(subs) = self.shared.lock().by_kind.get_mut(&kind) {
            subs.retain(|(sid, _)| *sid != id);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.shared
            .lock()
            .by_kind
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn publish(&self, event: &Event<'_>) {
        self.shared.publish(event);
    }

    /// Receive an owned copy of every event this bus publishes from now on.
    /// Only hooked kinds are ever published.
    pub fn channel(&self) -> broadcast::Receiver<EventEnvelope> {
        self.shared.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{Attribute, FakeSdk};
    use std::sync::atomic::AtomicUsize;

    fn bus() -> (Arc<FakeSdk>, EventBus) {
        let fake = Arc::new(FakeSdk::new());
        let instance = InstanceHandle::from_raw(1).unwrap();
        let bus = EventBus::new(fake.clone(), instance);
        (fake, bus)
    }

    #[test]
    fn test_first_subscription_hooks_native_slot_once() {
        let (fake, bus) = bus();
        bus.subscribe(EventKind::Chat, |_| {}).unwrap();
        bus.subscribe(EventKind::Chat, |_| {}).unwrap();

        assert!(fake.has_handler(EventKind::Chat));
        let hooks = fake
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("aw_event_set(CHAT"))
            .count();
        assert_eq!(hooks, 1);
    }

    #[test]
    fn test_publish_in_subscription_order() {
        let (fake, bus) = bus();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            bus.subscribe(EventKind::AvatarAdd, move |_| order.lock().unwrap().push(n))
                .unwrap();
        }

        bus.publish(&Event::new(&*fake, EventKind::AvatarAdd, bus.instance()));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery_and_ignores_unknown_ids() {
        let (fake, bus) = bus();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let id = bus
            .subscribe(EventKind::Chat, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        bus.publish(&Event::new(&*fake, EventKind::Chat, bus.instance()));
        bus.unsubscribe(EventKind::Chat, id);
        bus.unsubscribe(EventKind::Chat, id);
        bus.unsubscribe(EventKind::AvatarDelete, id);
        bus.publish(&Event::new(&*fake, EventKind::Chat, bus.instance()));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(EventKind::Chat), 0);
    }

    #[test]
    fn test_subscriber_may_unsubscribe_itself() {
        let (fake, bus) = bus();
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let inner_bus = bus.clone();
        let inner_slot = slot.clone();
        let id = bus
            .subscribe(EventKind::Chat, move |_| {
                if let Some(id) = *inner_slot.lock().unwrap() {
                    inner_bus.unsubscribe(EventKind::Chat, id);
                }
            })
            .unwrap();
        *slot.lock().unwrap() = Some(id);

        bus.publish(&Event::new(&*fake, EventKind::Chat, bus.instance()));
        assert_eq!(bus.subscriber_count(EventKind::Chat), 0);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_others() {
        let (fake, bus) = bus();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.subscribe(EventKind::Chat, |_| panic!("boom")).unwrap();
        let counter = hits.clone();
        bus.subscribe(EventKind::Chat, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        bus.publish(&Event::new(&*fake, EventKind::Chat, bus.instance()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_channel_receives_snapshots_with_increasing_sequence() {
        let (fake, bus) = bus();
        let mut rx = bus.channel();
        fake.string_set(Attribute::ChatMessage, "one").unwrap();
        bus.publish(&Event::new(&*fake, EventKind::Chat, bus.instance()));
        fake.string_set(Attribute::ChatMessage, "two").unwrap();
        bus.publish(&Event::new(&*fake, EventKind::Chat, bus.instance()));

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.string(Attribute::ChatMessage), Some("one"));
        assert_eq!(second.string(Attribute::ChatMessage), Some("two"));
        assert!(second.context.sequence > first.context.sequence);
    }

    #[test]
    fn test_channel_snapshot_is_taken_before_subscribers_touch_the_sdk() {
        let (fake, bus) = bus();
        let mut rx = bus.channel();
        fake.set_session_address(99, std::net::Ipv4Addr::new(10, 0, 0, 9));
        fake.int_set(Attribute::AvatarSession, 31).unwrap();

        let sdk = fake.clone();
        bus.subscribe(EventKind::AvatarAdd, move |_| {
            sdk.address(99).unwrap();
        })
        .unwrap();
        bus.publish(&Event::new(&*fake, EventKind::AvatarAdd, bus.instance()));

        assert_eq!(fake.int(Attribute::AvatarSession), 99);
        let envelope = rx.try_recv().unwrap();
        assert_eq!(envelope.int(Attribute::AvatarSession), Some(31));
    }
}
