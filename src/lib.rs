//! Typed bindings and a small bot runner for the Active Worlds SDK.
//!
//! ```no_run
//! use std::sync::Arc;
//! use korth_spirit::{Coordinates, Instance, NativeSdk, Sdk, Universe};
//!
//! # fn main() -> korth_spirit::Result<()> {
//! let sdk: Arc<dyn Sdk> = Arc::new(NativeSdk::load("aw64.dll")?);
//! sdk.init(korth_spirit::sdk::AW_BUILD)?;
//! let mut bot = Instance::create(sdk.clone(), "Korth", &Universe::default())?;
//! bot.login(318855, "password")?
//!     .enter_world("AWTeen")?
//!     .move_to(Coordinates::new(0, 0, 0))?;
//! bot.say("Hello!")?;
//! # Ok(())
//! # }
//! ```

pub mod avatar;
pub mod config;
pub mod coords;
pub mod data;
pub mod error;
pub mod events;
pub mod instance;
pub mod logging;
pub mod query;
pub mod runner;
pub mod sdk;
pub mod world;

pub use avatar::Avatar;
pub use coords::Coordinates;
pub use data::{AddressData, CellObject, LoginData, StateChangeData};
pub use error::{Error, Result};
pub use events::{Event, EventBus, EventEnvelope, SubscriptionId};
pub use instance::{AvatarLookup, Instance, Universe};
pub use query::Query;
pub use sdk::{Attribute, AttributeValue, EventKind, FakeSdk, NativeSdk, Sdk, ValueKind};
pub use world::{ServerAttribute, World, WorldObject, WorldScan};
