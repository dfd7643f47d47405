use std::collections::{HashSet, VecDeque};
use std::iter::StepBy;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::coords::Coordinates;
use crate::data::CellObject;
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::query::Query;
use crate::sdk::{self, sector_from_cell, Attribute, AttributeValue, ValueKind};

/// Anything that names a world attribute.
pub trait WorldKey {
    fn resolve(self) -> Result<Attribute>;
}

/// `"size"`, `"WORLD_SIZE"` and `"aw_world_size"` all name `WORLD_SIZE`.
impl WorldKey for &str {
    fn resolve(self) -> Result<Attribute> {
        match Attribute::from_name(self) {
            Some(attribute) if attribute.is_world() => Ok(attribute),
            _ => Attribute::world(self),
        }
    }
}

impl WorldKey for Attribute {
    fn resolve(self) -> Result<Attribute> {
        if self.is_world() {
            Ok(self)
        } else {
            Err(Error::UnknownAttribute(self.name().to_string()))
        }
    }
}

/// Attributes of the world an instance is in.
pub struct World<'a> {
    instance: &'a Instance,
}

impl<'a> World<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    pub fn get_attribute(&self, key: impl WorldKey, kind: ValueKind) -> Result<AttributeValue> {
        let attribute = key.resolve()?;
        self.instance.select()?;
        Ok(sdk::read(self.instance.sdk(), attribute, kind))
    }

    pub fn set_attribute(&self, key: impl WorldKey, value: impl Into<AttributeValue>) -> Result<()> {
        let attribute = key.resolve()?;
        self.instance.select()?;
        sdk::write(self.instance.sdk(), attribute, &value.into())
    }

    /// World diameter in cells.
    pub fn size(&self) -> Result<i32> {
        self.instance.select()?;
        Ok(self.instance.sdk().int(Attribute::WorldSize))
    }

    pub fn name(&self) -> Result<String> {
        self.instance.select()?;
        Ok(self.instance.sdk().string(Attribute::WorldName))
    }

    /// A world server attribute by its server-side id, read through
    /// `aw_world_attribute_get` rather than the client attribute table.
    pub fn server_attribute(&self, id: i32) -> Result<ServerAttribute> {
        self.instance.select()?;
        let (read_only, value) = self.instance.sdk().world_attribute_get(id)?;
        Ok(ServerAttribute { read_only, value })
    }

    /// Fails with the SDK's return code when the attribute is read-only.
    pub fn set_server_attribute(&self, id: i32, value: &str) -> Result<()> {
        self.instance.select()?;
        self.instance.sdk().world_attribute_set(id, value)
    }

    /// Every object in the world, queried one sector block at a time.
    pub fn objects(&self) -> Result<WorldScan<'a>> {
        let size = self.size()?;
        Ok(WorldScan::new(self.instance, size))
    }
}

/// Raw world server attribute, always transported as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAttribute {
    pub read_only: bool,
    pub value: String,
}

/// Centres of the 3x3 sector blocks covering cells `-ceil(size/2)..ceil(size/2)`.
fn block_centres(size: i32) -> StepBy<RangeInclusive<i32>> {
    let size = size.max(0);
    let half = size / 2 + size % 2;
    let first = sector_from_cell(-half) + 1;
    let last = if half == 0 {
        first - 1
    } else {
        sector_from_cell(half - 1) + 1
    };
    (first..=last).step_by(3)
}

/// Lazy iterator over a world's objects. Query failures are yielded as
/// `Err` items and scanning continues with the next block.
pub struct WorldScan<'a> {
    instance: &'a Instance,
    centres: StepBy<RangeInclusive<i32>>,
    columns: StepBy<RangeInclusive<i32>>,
    rows: StepBy<RangeInclusive<i32>>,
    column: Option<i32>,
    buffered: VecDeque<CellObject>,
    seen: HashSet<i32>,
}

impl<'a> WorldScan<'a> {
    fn new(instance: &'a Instance, size: i32) -> Self {
        let centres = block_centres(size);
        let scan = Self {
            instance,
            columns: centres.clone(),
            rows: (1..=0).step_by(3),
            centres,
            column: None,
            buffered: VecDeque::new(),
            seen: HashSet::new(),
        };
        debug!("Scanning world of size {} in {} block(s)", size, scan.remaining_blocks());
        scan
    }

    /// Blocks not queried yet.
    pub fn remaining_blocks(&self) -> usize {
        let per_column = self.centres.size_hint().0;
        self.columns
            .size_hint()
            .0
            .saturating_mul(per_column)
            .saturating_add(self.rows.size_hint().0)
    }

    fn next_block(&mut self) -> Option<(i32, i32)> {
        loop {
            if let Some(x) = self.column {
                if let Some(z) = self.rows.next() {
                    return Some((x, z));
                }
            }
            self.column = Some(self.columns.next()?);
            self.rows = self.centres.clone();
        }
    }
}

impl Iterator for WorldScan<'_> {
    type Item = Result<WorldObject>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(object) = self.buffered.pop_front() {
                // Number 0 means the SDK did not assign one
                if object.number != 0 && !self.seen.insert(object.number) {
                    continue;
                }
                return Some(Ok(WorldObject::from(object)));
            }

            let (x, z) = self.next_block()?;
            match Query::sectors(x, z).run(self.instance) {
                Ok(objects) => self.buffered.extend(objects),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// A placed object with its position and build time decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldObject {
    pub number: i32,
    pub owner: i32,
    pub position: Coordinates,
    pub tilt: i32,
    pub roll: i32,
    pub model: String,
    pub description: String,
    pub action: String,
    pub data: Vec<u8>,
    build_timestamp: i32,
}

impl WorldObject {
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.build_timestamp), 0)
    }
}

impl From<CellObject> for WorldObject {
    fn from(object: CellObject) -> Self {
        Self {
            number: object.number,
            owner: object.owner,
            position: Coordinates::new(object.x, object.y, object.z).with_yaw(object.yaw),
            tilt: object.tilt,
            roll: object.roll,
            model: object.model,
            description: object.description,
            action: object.action,
            data: object.data,
            build_timestamp: object.build_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Universe;
    use crate::sdk::{FakeSdk, Sdk};
    use std::sync::Arc;

    fn setup() -> (Arc<FakeSdk>, Instance) {
        let fake = Arc::new(FakeSdk::new());
        fake.init(134).unwrap();
        let instance = Instance::create(fake.clone(), "Scanner", &Universe::default()).unwrap();
        (fake, instance)
    }

    #[test]
    fn test_block_centres() {
        let centres = |size| block_centres(size).collect::<Vec<_>>();
        assert!(centres(0).is_empty());
        // cells -1..1 fit in sector 0
        assert_eq!(centres(2), vec![1]);
        // cells -20..20 span sectors -2..=2
        assert_eq!(centres(40), vec![-1, 2]);
        assert!(centres(-5).is_empty());
    }

    #[test]
    fn test_largest_world_size_is_scanned_lazily() {
        let mut centres = block_centres(i32::MAX);
        assert_eq!(centres.size_hint().0, 89_478_486);
        assert_eq!(centres.next(), Some(-134_217_727));

        let (fake, instance) = setup();
        fake.int_set(Attribute::WorldSize, i32::MAX).unwrap();
        let scan = instance.world().objects().unwrap();
        assert_eq!(scan.remaining_blocks(), 89_478_486 * 89_478_486);
    }

    #[test]
    fn test_remaining_blocks_counts_down() {
        let (fake, instance) = setup();
        fake.int_set(Attribute::WorldSize, 40).unwrap();
        let mut scan = instance.world().objects().unwrap();
        assert_eq!(scan.remaining_blocks(), 4);
        assert!(scan.next().is_none());
        assert_eq!(scan.remaining_blocks(), 0);
    }

    #[test]
    fn test_attribute_by_name_and_enum() {
        let (fake, instance) = setup();
        let world = instance.world();
        world.set_attribute("title", "Alpha World").unwrap();
        fake.int_set(Attribute::WorldSize, 64).unwrap();

        assert_eq!(
            world.get_attribute("TITLE", ValueKind::String).unwrap().as_str(),
            Some("Alpha World")
        );
        assert_eq!(
            world
                .get_attribute(Attribute::WorldSize, ValueKind::Int)
                .unwrap()
                .as_int(),
            Some(64)
        );
        assert_eq!(world.size().unwrap(), 64);
    }

    #[test]
    fn test_server_attribute_by_id() {
        let (fake, instance) = setup();
        let world = instance.world();
        fake.set_world_attribute(3, true, "Alpha");

        assert_eq!(
            world.server_attribute(3).unwrap(),
            ServerAttribute {
                read_only: true,
                value: "Alpha".to_string()
            }
        );
        assert!(matches!(
            world.set_server_attribute(3, "Beta"),
            Err(Error::Sdk { .. })
        ));

        world.set_server_attribute(40, "on").unwrap();
        assert_eq!(world.server_attribute(40).unwrap().value, "on");
        assert!(world.server_attribute(41).is_err());
    }

    #[test]
    fn test_unknown_attribute() {
        let (_fake, instance) = setup();
        let world = instance.world();
        assert!(matches!(
            world.get_attribute("no_such_thing", ValueKind::Int),
            Err(Error::UnknownAttribute(_))
        ));
        assert!(matches!(
            world.get_attribute(Attribute::MyX, ValueKind::Int),
            Err(Error::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_scan_yields_each_object_once() {
        let (fake, instance) = setup();
        fake.int_set(Attribute::WorldSize, 200).unwrap();
        for (number, x, z) in [(1, 0, 0), (2, 30_000, -40_000), (3, -90_000, 90_000)] {
            fake.add_cell_object(CellObject {
                number,
                x,
                z,
                build_timestamp: 1_000_000_000,
                ..Default::default()
            });
        }

        let mut numbers: Vec<_> = instance
            .world()
            .objects()
            .unwrap()
            .map(|o| o.unwrap().number)
            .collect();
        numbers.sort();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_scan_reports_query_errors_and_continues() {
        let (fake, instance) = setup();
        fake.int_set(Attribute::WorldSize, 40).unwrap();
        fake.fail_next("aw_query", 4);

        let results: Vec<_> = instance.world().objects().unwrap().collect();
        assert!(results[0].is_err());
        assert!(results.iter().skip(1).all(|r| r.is_ok()));
    }

    #[test]
    fn test_built_at() {
        let object = WorldObject::from(CellObject {
            build_timestamp: 1_000_000_000,
            ..Default::default()
        });
        assert_eq!(
            object.built_at().unwrap().to_rfc3339(),
            "2001-09-09T01:46:40+00:00"
        );
    }
}
