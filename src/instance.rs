use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::avatar::Avatar;
use crate::coords::Coordinates;
use crate::data::{AddressData, CellObject, LoginData, StateChangeData};
use crate::error::{Error, Result};
use crate::events::{dispatch, Event, EventBus, EventEnvelope, SubscriptionId};
use crate::query::Query;
use crate::sdk::{Attribute, EventKind, InstanceHandle, Sdk};
use crate::world::World;

/// Universe server an instance connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub host: String,
    pub port: u16,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            host: "auth.activeworlds.com".to_string(),
            port: 6670,
        }
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Selects one avatar for calls that accept exactly one of citizen,
/// session or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarLookup<'a> {
    Citizen(i32),
    Session(i32),
    Name(&'a str),
}

/// One bot connected to a universe.
///
/// The vendor instance is destroyed when this value is dropped.
pub struct Instance {
    sdk: Arc<dyn Sdk>,
    handle: InstanceHandle,
    name: String,
    coords: Coordinates,
    world: Option<String>,
    bus: EventBus,
}

impl Instance {
    pub fn create(sdk: Arc<dyn Sdk>, name: impl Into<String>, universe: &Universe) -> Result<Self> {
        let name = name.into();
        let handle = sdk.create(&universe.host, universe.port)?;
        info!("Created instance {} for {} on {}", handle.as_raw(), name, universe);
        let bus = EventBus::new(sdk.clone(), handle);
        Ok(Self {
            sdk,
            handle,
            name,
            coords: Coordinates::default(),
            world: None,
            bus,
        })
    }

    pub fn handle(&self) -> InstanceHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sdk(&self) -> &dyn Sdk {
        &*self.sdk
    }

    /// The world entered last, if any.
    pub fn world_name(&self) -> Option<&str> {
        self.world.as_deref()
    }

    /// Make this instance the SDK's current one.
    pub fn select(&self) -> Result<()> {
        self.sdk.set_instance(self.handle)
    }

    pub fn login(&mut self, citizen: i32, password: &str) -> Result<&mut Self> {
        self.select()?;
        LoginData {
            citizen,
            password: password.to_string(),
            application: format!("korth-spirit #{}", citizen),
            bot_name: self.name.clone(),
        }
        .write(&*self.sdk)?;
        self.sdk.login()?;
        info!("{} logged in as citizen {}", self.name, citizen);
        Ok(self)
    }

    /// Enter `world` and place the bot at the coordinates recorded so far.
    pub fn enter_world(&mut self, world: &str) -> Result<&mut Self> {
        self.select()?;
        self.sdk.enter(world)?;
        self.world = Some(world.to_string());
        info!("{} entered {}", self.name, world);
        self.send_position(self.coords)?;
        Ok(self)
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    /// Outside a world the coordinates are only recorded for the next
    /// [`enter_world`](Self::enter_world).
    pub fn move_to(&mut self, coords: Coordinates) -> Result<&mut Self> {
        if self.world.is_some() {
            self.select()?;
            self.send_position(coords)?;
        }
        self.coords = coords;
        Ok(self)
    }

    fn send_position(&self, coords: Coordinates) -> Result<()> {
        StateChangeData::from(coords).write(&*self.sdk)?;
        self.sdk.state_change()?;
        debug!("{} moved to {}", self.name, coords);
        Ok(())
    }

    pub fn say(&self, message: &str) -> Result<&Self> {
        self.select()?;
        self.sdk.say(message)?;
        Ok(self)
    }

    pub fn whisper(&self, session: i32, message: &str) -> Result<&Self> {
        self.select()?;
        self.sdk.whisper(session, message)?;
        Ok(self)
    }

    pub fn send_botgram(&self, citizen: i32, text: &str) -> Result<&Self> {
        self.select()?;
        self.sdk.string_set(Attribute::BotgramText, text)?;
        self.sdk.int_set(Attribute::BotgramTo, citizen)?;
        self.sdk.botgram_send()?;
        Ok(self)
    }

    /// Objects in the 3x3 sector block around sector `(x, z)`.
    pub fn query(&self, x: i32, z: i32) -> Result<Vec<CellObject>> {
        Query::sectors(x, z).run(self)
    }

    pub fn avatar(&self, citizen: i32) -> Result<Avatar> {
        Avatar::load(self, citizen)
    }

    pub fn world(&self) -> World<'_> {
        World::new(self)
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe<F>(&self, kind: EventKind, subscriber: F) -> Result<SubscriptionId>
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.bus.subscribe(kind, subscriber)
    }

    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) {
        self.bus.unsubscribe(kind, id);
    }

    /// Owned copies of every event of a hooked kind.
    pub fn channel(&self) -> broadcast::Receiver<EventEnvelope> {
        self.bus.channel()
    }

    /// Let the SDK process traffic for up to `milliseconds`, firing
    /// subscribers on this thread.
    pub fn wait(&self, milliseconds: i32) -> Result<()> {
        self.select()?;
        let _waiting = dispatch::enter_wait(self.sdk.clone(), &self.bus);
        self.sdk.wait(milliseconds)
    }

    pub fn address(&self, session: i32) -> Result<AddressData> {
        self.select()?;
        self.sdk.address(session)?;
        Ok(AddressData::from_raw(
            self.sdk.int(Attribute::AvatarSession),
            self.sdk.int(Attribute::AvatarAddress),
        ))
    }

    pub fn click_avatar(&self, session: i32) -> Result<()> {
        self.select()?;
        self.sdk.avatar_click(session)
    }

    /// Ask everyone in the world to reload the avatar's appearance.
    pub fn reload_avatar(&self, target: AvatarLookup<'_>) -> Result<()> {
        let (citizen, session) = match target {
            AvatarLookup::Citizen(citizen) => (citizen, 0),
            AvatarLookup::Session(session) => (0, session),
            AvatarLookup::Name(name) => {
                return Err(Error::InvalidArgument(format!(
                    "avatars cannot be reloaded by name ({})",
                    name
                )))
            }
        };
        self.select()?;
        self.sdk.avatar_reload(citizen, session)
    }

    /// Request an avatar's location. The answer arrives as an event.
    pub fn locate_avatar(&self, target: AvatarLookup<'_>) -> Result<()> {
        self.select()?;
        match target {
            AvatarLookup::Citizen(citizen) => self.sdk.avatar_location(citizen, 0, None),
            AvatarLookup::Session(session) => self.sdk.avatar_location(0, session, None),
            AvatarLookup::Name(name) => self.sdk.avatar_location(0, 0, Some(name)),
        }
    }

    /// Push this instance's avatar settings to the avatar with `session`.
    pub fn set_avatar(&self, session: i32) -> Result<()> {
        self.select()?;
        self.sdk.avatar_set(session)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("handle", &self.handle)
            .field("name", &self.name)
            .field("coords", &self.coords)
            .field("world", &self.world)
            .finish()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        if let Err(e) = self.sdk.destroy(self.handle) {
            warn!("Failed to destroy instance {}: {}", self.handle.as_raw(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::FakeSdk;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn instance() -> (Arc<FakeSdk>, Instance) {
        let fake = Arc::new(FakeSdk::new());
        fake.init(134).unwrap();
        let instance = Instance::create(fake.clone(), "Korth", &Universe::default()).unwrap();
        (fake, instance)
    }

    #[test]
    fn test_create_uses_universe() {
        let (fake, _instance) = instance();
        assert!(fake
            .calls()
            .contains(&"aw_create(auth.activeworlds.com, 6670)".to_string()));
    }

    #[test]
    fn test_drop_destroys_instance() {
        let (fake, instance) = instance();
        assert_eq!(fake.live_instances(), 1);
        drop(instance);
        assert_eq!(fake.live_instances(), 0);
    }

    #[test]
    fn test_login_sets_application_name() {
        let (fake, mut instance) = instance();
        instance.login(318855, "secret").unwrap();

        assert_eq!(fake.string(Attribute::LoginApplication), "korth-spirit #318855");
        assert_eq!(fake.string(Attribute::LoginName), "Korth");
        assert!(fake.calls().contains(&"aw_login()".to_string()));
    }

    #[test]
    fn test_login_failure_is_typed() {
        let (fake, mut instance) = instance();
        fake.fail_next("aw_login", 3);
        let err = instance.login(1, "bad").unwrap_err();
        assert!(matches!(err, Error::Sdk { call: "aw_login", .. }));
    }

    #[test]
    fn test_move_before_enter_is_only_recorded() {
        let (fake, mut instance) = instance();
        fake.clear_calls();
        instance.move_to(Coordinates::new(100, 0, -300)).unwrap();

        assert!(fake.calls().is_empty());
        assert_eq!(instance.coords(), Coordinates::new(100, 0, -300));

        instance.enter_world("Alpha").unwrap();
        assert_eq!(fake.int(Attribute::MyX), 100);
        assert_eq!(fake.int(Attribute::MyZ), -300);
        assert!(fake.calls().contains(&"aw_state_change()".to_string()));
    }

    #[test]
    fn test_move_after_enter_sends_state_change() {
        let (fake, mut instance) = instance();
        instance.enter_world("Alpha").unwrap();
        fake.clear_calls();

        instance.move_to(Coordinates::new(5, 6, 7).with_yaw(900)).unwrap();
        assert_eq!(fake.int(Attribute::MyYaw), 900);
        assert_eq!(fake.calls().last().map(String::as_str), Some("aw_state_change()"));
    }

    #[test]
    fn test_wait_delivers_to_subscribers() {
        let (fake, instance) = instance();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        instance
            .subscribe(EventKind::Chat, move |event| {
                assert_eq!(event.string(Attribute::ChatMessage), "hi bot");
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        fake.push_event(EventKind::Chat, vec![(Attribute::ChatMessage, "hi bot".into())]);
        instance.wait(0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reload_by_name_is_rejected() {
        let (_fake, instance) = instance();
        let err = instance.reload_avatar(AvatarLookup::Name("Bob")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        instance.reload_avatar(AvatarLookup::Session(12)).unwrap();
    }

    #[test]
    fn test_address_lookup() {
        let (fake, instance) = instance();
        fake.set_session_address(9, std::net::Ipv4Addr::new(10, 0, 0, 5));
        let address = instance.address(9).unwrap();
        assert_eq!(address.session, 9);
        assert_eq!(address.address, std::net::Ipv4Addr::new(10, 0, 0, 5));
        assert!(instance.address(10).is_err());
    }

    #[test]
    fn test_botgram_sets_recipient() {
        let (fake, instance) = instance();
        instance.send_botgram(42, "ping").unwrap();
        assert_eq!(fake.int(Attribute::BotgramTo), 42);
        assert_eq!(fake.string(Attribute::BotgramText), "ping");
    }
}
