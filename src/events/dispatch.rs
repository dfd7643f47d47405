//! Native side of the event bus.
//!
//! The vendor handler signature carries no context, so every slot gets its
//! own `extern "C"` trampoline. When a trampoline fires it asks the SDK
//! that is currently waiting on this thread which instance is selected and
//! looks that instance's bus up in a process-wide route table.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use tracing::{error, warn};

use crate::events::bus::BusShared;
use crate::events::{Event, EventBus};
use crate::sdk::{EventKind, InstanceHandle, NativeCallback, Sdk};

type RouteKey = (usize, InstanceHandle);

static ROUTES: Mutex<BTreeMap<RouteKey, Weak<BusShared>>> = Mutex::new(BTreeMap::new());

struct Waiter {
    sdk: Arc<dyn Sdk>,
    bus: Weak<BusShared>,
}

thread_local! {
    static WAITERS: RefCell<Vec<Waiter>> = const { RefCell::new(Vec::new()) };
}

fn sdk_key(sdk: &Arc<dyn Sdk>) -> usize {
    Arc::as_ptr(sdk) as *const () as usize
}

pub(crate) fn register_route(shared: &Arc<BusShared>) {
    let key = (sdk_key(&shared.sdk), shared.instance);
    ROUTES
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(key, Arc::downgrade(shared));
}

/// Forget routes whose bus has been dropped.
pub(crate) fn unregister_route() {
    ROUTES
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .retain(|_, bus| bus.strong_count() > 0);
}

fn lookup(sdk: &Arc<dyn Sdk>, instance: InstanceHandle) -> Option<Arc<BusShared>> {
    ROUTES
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&(sdk_key(sdk), instance))
        .and_then(Weak::upgrade)
}

/// Marks the current thread as waiting inside the SDK on behalf of `bus`.
/// Popped again on drop.
pub(crate) struct WaitGuard {
    _not_send: std::marker::PhantomData<*const ()>,
}

pub(crate) fn enter_wait(sdk: Arc<dyn Sdk>, bus: &EventBus) -> WaitGuard {
    WAITERS.with(|w| {
        w.borrow_mut().push(Waiter {
            sdk,
            bus: bus.downgrade(),
        })
    });
    WaitGuard {
        _not_send: std::marker::PhantomData,
    }
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        WAITERS.with(|w| {
            w.borrow_mut().pop();
        });
    }
}

fn route(code: i32) {
    let Some(kind) = EventKind::from_code(code) else {
        warn!(target: "events", "Callback for unknown event code {}", code);
        return;
    };

    let waiter = WAITERS.with(|w| {
        w.borrow()
            .last()
            .map(|w| (w.sdk.clone(), w.bus.clone()))
    });
    let Some((sdk, fallback)) = waiter else {
        warn!(target: "events", "{} fired outside of wait, dropped", kind);
        return;
    };

    let bus = sdk
        .current_instance()
        .and_then(|instance| lookup(&sdk, instance))
        .or_else(|| fallback.upgrade());
    let Some(bus) = bus else {
        warn!(target: "events", "{} has no live bus, dropped", kind);
        return;
    };

    let event = Event::new(&*bus.sdk, kind, bus.instance);
    bus.publish(&event);
}

extern "C" fn trampoline<const CODE: i32>() {
    // Unwinding into the vendor library is undefined behaviour.
    if panic::catch_unwind(AssertUnwindSafe(|| route(CODE))).is_err() {
        error!(target: "events", "Panic while dispatching event code {}", CODE);
    }
}

macro_rules! trampolines {
    ($kind:expr; $($variant:ident),* $(,)?) => {
        match $kind {
            $(EventKind::$variant => trampoline::<{ EventKind::$variant as i32 }> as NativeCallback,)*
        }
    };
}

/// The native handler installed for `kind`.
pub(crate) fn trampoline_for(kind: EventKind) -> NativeCallback {
    trampolines!(kind;
        AvatarAdd,
        AvatarChange,
        AvatarDelete,
        CellBegin,
        CellObject,
        CellEnd,
        Chat,
        ObjectAdd,
        ObjectDelete,
        UniverseAttributes,
        UniverseDisconnect,
        WorldAttributes,
        WorldInfo,
        WorldDisconnect,
        SendFile,
        Teleport,
        TerrainBegin,
        TerrainChanged,
        TerrainData,
        TerrainEnd,
        ObjectClick,
        ObjectSelect,
        Url,
        UrlClick,
        AvatarClick,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{Attribute, FakeSdk};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_bus(
        fake: &Arc<FakeSdk>,
        raw: usize,
        kind: EventKind,
    ) -> (EventBus, Arc<AtomicUsize>) {
        let bus = EventBus::new(fake.clone(), InstanceHandle::from_raw(raw).unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        bus.subscribe(kind, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        (bus, hits)
    }

    #[test]
    fn test_callback_outside_wait_is_dropped() {
        let fake = Arc::new(FakeSdk::new());
        let (_bus, hits) = counting_bus(&fake, 1, EventKind::Chat);

        trampoline_for(EventKind::Chat)();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_routes_to_bus_of_current_instance() {
        let fake = Arc::new(FakeSdk::new());
        fake.init(134).unwrap();
        let first = fake.create("localhost", 6670).unwrap();
        let second = fake.create("localhost", 6670).unwrap();
        let (bus_a, hits_a) = counting_bus(&fake, first.as_raw(), EventKind::AvatarAdd);
        let (_bus_b, hits_b) = counting_bus(&fake, second.as_raw(), EventKind::AvatarAdd);

        fake.push_event_for(
            second,
            EventKind::AvatarAdd,
            vec![(Attribute::AvatarName, "Guest".into())],
        );
        fake.set_instance(first).unwrap();
        let sdk: Arc<dyn Sdk> = fake.clone();
        {
            let _guard = enter_wait(sdk.clone(), &bus_a);
            sdk.wait(0).unwrap();
        }

        assert_eq!(hits_a.load(Ordering::SeqCst), 0);
        assert_eq!(hits_b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unrouted_instance_falls_back_to_waiting_bus() {
        let fake = Arc::new(FakeSdk::new());
        let (bus, hits) = counting_bus(&fake, 5, EventKind::Chat);

        // 6 has no bus of its own.
        fake.push_event_for(InstanceHandle::from_raw(6).unwrap(), EventKind::Chat, Vec::new());
        let sdk: Arc<dyn Sdk> = fake.clone();
        {
            let _guard = enter_wait(sdk.clone(), &bus);
            sdk.wait(0).unwrap();
        }

        assert_eq!(fake.current_instance(), InstanceHandle::from_raw(6));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_selected_instance_falls_back_to_waiting_bus() {
        let fake = Arc::new(FakeSdk::new());
        let (bus, hits) = counting_bus(&fake, 8, EventKind::AvatarDelete);

        fake.push_event(EventKind::AvatarDelete, Vec::new());
        let sdk: Arc<dyn Sdk> = fake.clone();
        {
            let _guard = enter_wait(sdk.clone(), &bus);
            sdk.wait(0).unwrap();
        }

        assert_eq!(fake.current_instance(), None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trampolines_are_distinct_per_kind() {
        let chat = trampoline_for(EventKind::Chat) as usize;
        let add = trampoline_for(EventKind::AvatarAdd) as usize;
        assert_ne!(chat, add);
    }

    #[test]
    fn test_dropped_bus_leaves_route_table() {
        let fake = Arc::new(FakeSdk::new());
        let sdk: Arc<dyn Sdk> = fake.clone();
        let instance = InstanceHandle::from_raw(77).unwrap();
        let bus = EventBus::new(sdk.clone(), instance);
        assert!(lookup(&sdk, instance).is_some());
        drop(bus);
        assert!(lookup(&sdk, instance).is_none());
    }
}
