//! Typed records marshalled into or out of the attribute table.

use std::net::Ipv4Addr;

use crate::coords::Coordinates;
use crate::error::Result;
use crate::events::Event;
use crate::sdk::{Attribute, AttributeValue, Sdk};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginData {
    pub citizen: i32,
    pub password: String,
    pub application: String,
    pub bot_name: String,
}

impl LoginData {
    pub(crate) fn write(&self, sdk: &dyn Sdk) -> Result<()> {
        sdk.int_set(Attribute::LoginOwner, self.citizen)?;
        sdk.string_set(Attribute::LoginPrivilegePassword, &self.password)?;
        sdk.string_set(Attribute::LoginApplication, &self.application)?;
        sdk.string_set(Attribute::LoginName, &self.bot_name)?;
        Ok(())
    }
}

/// The bot's own avatar state. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChangeData {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
    pub yaw: Option<i32>,
    pub pitch: Option<i32>,
    pub avatar_type: Option<i32>,
    pub gesture: Option<i32>,
    pub state: Option<i32>,
}

impl StateChangeData {
    pub(crate) fn write(&self, sdk: &dyn Sdk) -> Result<()> {
        let fields = [
            (Attribute::MyX, self.x),
            (Attribute::MyY, self.y),
            (Attribute::MyZ, self.z),
            (Attribute::MyYaw, self.yaw),
            (Attribute::MyPitch, self.pitch),
            (Attribute::MyType, self.avatar_type),
            (Attribute::MyGesture, self.gesture),
            (Attribute::MyState, self.state),
        ];
        for (attribute, value) in fields {
            if let Some(value) = value {
                sdk.int_set(attribute, value)?;
            }
        }
        Ok(())
    }
}

impl From<Coordinates> for StateChangeData {
    fn from(coords: Coordinates) -> Self {
        StateChangeData {
            x: Some(coords.x),
            y: Some(coords.y),
            z: Some(coords.z),
            yaw: Some(coords.yaw),
            ..Default::default()
        }
    }
}

/// An object reported by a cell or sector query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellObject {
    pub object_type: i32,
    pub id: i32,
    pub number: i32,
    pub owner: i32,
    pub build_timestamp: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub yaw: i32,
    pub tilt: i32,
    pub roll: i32,
    pub model: String,
    pub description: String,
    pub action: String,
    pub data: Vec<u8>,
}

impl CellObject {
    /// Read the object currently described by an object event.
    pub fn from_event(event: &Event<'_>) -> Self {
        CellObject {
            object_type: event.int(Attribute::ObjectType),
            id: event.int(Attribute::ObjectId),
            number: event.int(Attribute::ObjectNumber),
            owner: event.int(Attribute::ObjectOwner),
            build_timestamp: event.int(Attribute::ObjectBuildTimestamp),
            x: event.int(Attribute::ObjectX),
            y: event.int(Attribute::ObjectY),
            z: event.int(Attribute::ObjectZ),
            yaw: event.int(Attribute::ObjectYaw),
            tilt: event.int(Attribute::ObjectTilt),
            roll: event.int(Attribute::ObjectRoll),
            model: event.string(Attribute::ObjectModel),
            description: event.string(Attribute::ObjectDescription),
            action: event.string(Attribute::ObjectAction),
            data: event.data(Attribute::ObjectData),
        }
    }

    /// The attribute values that describe this object.
    pub fn attributes(&self) -> Vec<(Attribute, AttributeValue)> {
        vec![
            (Attribute::ObjectType, self.object_type.into()),
            (Attribute::ObjectId, self.id.into()),
            (Attribute::ObjectNumber, self.number.into()),
            (Attribute::ObjectOwner, self.owner.into()),
            (Attribute::ObjectBuildTimestamp, self.build_timestamp.into()),
            (Attribute::ObjectX, self.x.into()),
            (Attribute::ObjectY, self.y.into()),
            (Attribute::ObjectZ, self.z.into()),
            (Attribute::ObjectYaw, self.yaw.into()),
            (Attribute::ObjectTilt, self.tilt.into()),
            (Attribute::ObjectRoll, self.roll.into()),
            (Attribute::ObjectModel, self.model.clone().into()),
            (Attribute::ObjectDescription, self.description.clone().into()),
            (Attribute::ObjectAction, self.action.clone().into()),
            (Attribute::ObjectData, self.data.clone().into()),
        ]
    }

    /// Cell coordinates (objects are positioned in centimetres, cells are 10m).
    pub fn cell(&self) -> (i32, i32) {
        (self.x.div_euclid(1000), self.z.div_euclid(1000))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressData {
    pub session: i32,
    pub address: Ipv4Addr,
}

impl AddressData {
    /// `raw` is the address as the SDK stores it: network byte order
    /// packed into a native integer.
    pub fn from_raw(session: i32, raw: i32) -> Self {
        AddressData {
            session,
            address: Ipv4Addr::from(raw.to_le_bytes()),
        }
    }

    pub fn to_raw(self) -> i32 {
        i32::from_le_bytes(self.address.octets())
    }
}
