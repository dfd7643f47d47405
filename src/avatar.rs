use std::collections::BTreeMap;

use crate::error::Result;
use crate::instance::Instance;
use crate::sdk::Attribute;

/// The world rights a citizen holds in the instance's current world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    citizen: i32,
    rights: BTreeMap<Attribute, bool>,
}

impl Avatar {
    pub(crate) fn load(instance: &Instance, citizen: i32) -> Result<Self> {
        instance.select()?;
        let sdk = instance.sdk();
        let rights = Attribute::world_rights()
            .map(|right| (right, sdk.has_world_right(citizen, right)))
            .collect();
        Ok(Self { citizen, rights })
    }

    pub fn citizen(&self) -> i32 {
        self.citizen
    }

    /// Whether the citizen holds `right`. Attributes that are not world
    /// rights are never held.
    pub fn has(&self, right: Attribute) -> bool {
        self.rights.get(&right).copied().unwrap_or(false)
    }

    /// Every world right with whether it is held, in attribute order.
    pub fn rights(&self) -> impl Iterator<Item = (Attribute, bool)> + '_ {
        self.rights.iter().map(|(right, held)| (*right, *held))
    }

    pub fn granted(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.rights().filter(|(_, held)| *held).map(|(right, _)| right)
    }
}
