//! The seam between typed Rust code and the vendor SDK.
//!
//! [`Sdk`] mirrors the vendor's C entry points one to one. [`NativeSdk`]
//! forwards them to the dynamic library; [`FakeSdk`] answers them from
//! memory so everything above this layer can be tested without it.
//!
//! The vendor library is single threaded and keeps a global "current
//! instance". Callers select an instance with [`Sdk::set_instance`] before
//! every call that depends on it and drive all calls from one thread.

pub mod attribute;
pub mod event;
pub mod fake;
pub mod native;
pub mod reason;

use std::num::NonZeroUsize;

pub use attribute::{Attribute, AttributeValue, ValueKind};
pub use event::EventKind;
pub use fake::FakeSdk;
pub use native::NativeSdk;
pub use reason::ReasonCode;

use crate::error::Result;

/// SDK build this binding targets (Active Worlds 7.0).
pub const AW_BUILD: i32 = 134;

/// Handler signature for native event slots.
pub type NativeCallback = extern "C" fn();

/// Opaque vendor instance pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(NonZeroUsize);

impl InstanceHandle {
    pub fn from_raw(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(InstanceHandle)
    }

    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

/// Sector index containing `cell`. Sectors are 8 cells wide and centred on
/// multiples of 8.
pub fn sector_from_cell(cell: i32) -> i32 {
    (cell + 4).div_euclid(8)
}

/// One method per wrapped vendor entry point.
pub trait Sdk: Send + Sync {
    fn init(&self, build: i32) -> Result<()>;
    fn term(&self);

    fn create(&self, domain: &str, port: u16) -> Result<InstanceHandle>;
    fn destroy(&self, instance: InstanceHandle) -> Result<()>;
    fn set_instance(&self, instance: InstanceHandle) -> Result<()>;
    fn current_instance(&self) -> Option<InstanceHandle>;

    fn login(&self) -> Result<()>;
    fn enter(&self, world: &str) -> Result<()>;
    fn state_change(&self) -> Result<()>;
    /// Process network traffic and fire handlers. Negative waits forever.
    fn wait(&self, milliseconds: i32) -> Result<()>;

    fn say(&self, message: &str) -> Result<()>;
    fn whisper(&self, session: i32, message: &str) -> Result<()>;
    fn botgram_send(&self) -> Result<()>;

    fn int(&self, attribute: Attribute) -> i32;
    fn int_set(&self, attribute: Attribute, value: i32) -> Result<()>;
    fn bool(&self, attribute: Attribute) -> bool;
    fn bool_set(&self, attribute: Attribute, value: bool) -> Result<()>;
    fn float(&self, attribute: Attribute) -> f32;
    fn float_set(&self, attribute: Attribute, value: f32) -> Result<()>;
    fn string(&self, attribute: Attribute) -> String;
    fn string_set(&self, attribute: Attribute, value: &str) -> Result<()>;
    fn data(&self, attribute: Attribute) -> Vec<u8>;
    fn data_set(&self, attribute: Attribute, value: &[u8]) -> Result<()>;

    fn event_set(&self, kind: EventKind, handler: Option<NativeCallback>) -> Result<()>;

    /// Query the 3x3 block of sectors centred on `(x_sector, z_sector)`.
    /// `sequence` holds the last seen sequence number of each sector and is
    /// updated in place.
    fn query(&self, x_sector: i32, z_sector: i32, sequence: &mut [[i32; 3]; 3]) -> Result<()>;
    /// Advance the world-wide cell iterator stored in `CELL_ITERATOR`.
    fn cell_next(&self) -> Result<()>;

    fn world_attribute_get(&self, attribute: i32) -> Result<(bool, String)>;
    fn world_attribute_set(&self, attribute: i32, value: &str) -> Result<()>;
    fn has_world_right(&self, citizen: i32, right: Attribute) -> bool;

    /// Look up a session's address into `AVATAR_SESSION`/`AVATAR_ADDRESS`.
    fn address(&self, session: i32) -> Result<()>;
    fn avatar_click(&self, session: i32) -> Result<()>;
    fn avatar_reload(&self, citizen: i32, session: i32) -> Result<()>;
    fn avatar_location(&self, citizen: i32, session: i32, name: Option<&str>) -> Result<()>;
    fn avatar_set(&self, session: i32) -> Result<()>;
}

/// Read `attribute` with the accessor family selected by `kind`.
pub fn read(sdk: &dyn Sdk, attribute: Attribute, kind: ValueKind) -> AttributeValue {
    match kind {
        ValueKind::Int => AttributeValue::Int(sdk.int(attribute)),
        ValueKind::Bool => AttributeValue::Bool(sdk.bool(attribute)),
        ValueKind::Float => AttributeValue::Float(sdk.float(attribute)),
        ValueKind::String => AttributeValue::String(sdk.string(attribute)),
        ValueKind::Data => AttributeValue::Data(sdk.data(attribute)),
    }
}

/// Write `value` with the accessor family matching its kind.
pub fn write(sdk: &dyn Sdk, attribute: Attribute, value: &AttributeValue) -> Result<()> {
    match value {
        AttributeValue::Int(v) => sdk.int_set(attribute, *v),
        AttributeValue::Bool(v) => sdk.bool_set(attribute, *v),
        AttributeValue::Float(v) => sdk.float_set(attribute, *v),
        AttributeValue::String(v) => sdk.string_set(attribute, v),
        AttributeValue::Data(v) => sdk.data_set(attribute, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_from_cell() {
        assert_eq!(sector_from_cell(0), 0);
        assert_eq!(sector_from_cell(3), 0);
        assert_eq!(sector_from_cell(4), 1);
        assert_eq!(sector_from_cell(-4), 0);
        assert_eq!(sector_from_cell(-5), -1);
        assert_eq!(sector_from_cell(12), 2);
    }

    #[test]
    fn test_read_write_round_trip_through_fake() {
        let sdk = FakeSdk::new();
        write(&sdk, Attribute::WorldTitle, &AttributeValue::from("Alpha")).unwrap();
        write(&sdk, Attribute::WorldSize, &AttributeValue::Int(40)).unwrap();

        assert_eq!(
            read(&sdk, Attribute::WorldTitle, ValueKind::String),
            AttributeValue::String("Alpha".to_string())
        );
        assert_eq!(read(&sdk, Attribute::WorldSize, ValueKind::Int).as_int(), Some(40));
        // unset attributes read as the zero value of their kind
        assert_eq!(read(&sdk, Attribute::WorldAllowFlying, ValueKind::Bool).as_bool(), Some(false));
    }

    #[test]
    fn test_instance_handle_rejects_null() {
        assert!(InstanceHandle::from_raw(0).is_none());
        assert_eq!(InstanceHandle::from_raw(7).unwrap().as_raw(), 7);
    }
}
