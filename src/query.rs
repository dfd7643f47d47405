//! Collecting objects reported by cell queries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::data::CellObject;
use crate::error::Result;
use crate::instance::Instance;
use crate::sdk::{Attribute, EventKind};

/// Milliseconds handed to each `wait` while a query is outstanding.
const QUERY_WAIT_MS: i32 = 1;
/// Upper bound on `wait` calls for one sector query.
const MAX_QUERY_WAITS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Sectors { x: i32, z: i32 },
    Everything,
}

/// A single object query against the current world.
///
/// [`Query::sectors`] asks for the 3x3 block of sectors centred on one
/// sector. [`Query::everything`] walks the world-wide cell iterator until
/// the SDK reports the end of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    target: Target,
}

impl Query {
    pub fn sectors(x: i32, z: i32) -> Self {
        Self {
            target: Target::Sectors { x, z },
        }
    }

    pub fn everything() -> Self {
        Self {
            target: Target::Everything,
        }
    }

    /// Centre sector, or `None` for a world-wide query.
    pub fn center(&self) -> Option<(i32, i32)> {
        match self.target {
            Target::Sectors { x, z } => Some((x, z)),
            Target::Everything => None,
        }
    }

    pub fn run(&self, instance: &Instance) -> Result<Vec<CellObject>> {
        let found = Arc::new(Mutex::new(Vec::new()));
        let sink = found.clone();
        let id = instance.subscribe(EventKind::CellObject, move |event| {
            let object = CellObject::from_event(event);
            sink.lock().unwrap_or_else(|e| e.into_inner()).push(object);
        })?;

        let outcome = match self.target {
            Target::Sectors { x, z } => query_sectors(instance, x, z, MAX_QUERY_WAITS),
            Target::Everything => walk_cells(instance),
        };
        instance.unsubscribe(EventKind::CellObject, id);
        outcome?;

        let objects = std::mem::take(&mut *found.lock().unwrap_or_else(|e| e.into_inner()));
        debug!("Query {:?} returned {} object(s)", self.target, objects.len());
        Ok(objects)
    }
}

/// Ask for the block around `(x, z)`. The SDK may answer in several
/// responses; whenever one ends without `QUERY_COMPLETE` the query is sent
/// again with the sequence numbers it has filled in so far.
fn query_sectors(instance: &Instance, x: i32, z: i32, max_waits: usize) -> Result<()> {
    let mut sequence = [[0; 3]; 3];

    let response_ended = Arc::new(AtomicBool::new(false));
    let flag = response_ended.clone();
    let id = instance.subscribe(EventKind::CellEnd, move |_| flag.store(true, Ordering::SeqCst))?;

    let outcome = drive_sector_query(instance, x, z, max_waits, &mut sequence, &response_ended);
    instance.unsubscribe(EventKind::CellEnd, id);

    if !outcome? {
        warn!("Query of sector {},{} did not complete, returning partial results", x, z);
    }
    Ok(())
}

/// Returns whether the SDK reported the query complete within `max_waits`.
fn drive_sector_query(
    instance: &Instance,
    x: i32,
    z: i32,
    max_waits: usize,
    sequence: &mut [[i32; 3]; 3],
    response_ended: &AtomicBool,
) -> Result<bool> {
    let sdk = instance.sdk();
    instance.select()?;
    sdk.query(x, z, sequence)?;
    for _ in 0..max_waits {
        instance.wait(QUERY_WAIT_MS)?;
        if sdk.bool(Attribute::QueryComplete) {
            return Ok(true);
        }
        if response_ended.swap(false, Ordering::SeqCst) {
            debug!("Query of sector {},{} incomplete, asking for more", x, z);
            instance.select()?;
            sdk.query(x, z, sequence)?;
        }
    }
    Ok(false)
}

/// Iterate every cell. The SDK signals the end either with an error from
/// `aw_cell_next` or by setting the iterator to -1.
fn walk_cells(instance: &Instance) -> Result<()> {
    let sdk = instance.sdk();

    instance.select()?;
    sdk.bool_set(Attribute::CellCombine, true)?;
    sdk.int_set(Attribute::CellIterator, 0)?;
    loop {
        instance.select()?;
        if let Err(e) = sdk.cell_next() {
            debug!("Cell iteration ended: {}", e);
            return Ok(());
        }
        instance.wait(QUERY_WAIT_MS)?;
        if sdk.int(Attribute::CellIterator) == -1 {
            return Ok(());
        }
    }
}
