//! In-memory stand-in for the vendor library.
//!
//! `FakeSdk` keeps one attribute table, records every call it receives, and
//! fires registered handlers from [`Sdk::wait`] exactly like the real
//! library: payload attributes are written first, then the handler runs
//! with the originating instance selected.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::net::Ipv4Addr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::data::{AddressData, CellObject};
use crate::error::{Error, Result};
use crate::sdk::{
    sector_from_cell, Attribute, AttributeValue, EventKind, InstanceHandle, NativeCallback,
    ReasonCode, Sdk,
};

/// Returned by `aw_cell_next` once the iterator is exhausted.
pub const RC_NO_SUCH_CELL: i32 = 74;
/// Returned for calls on an unknown session.
pub const RC_NO_SUCH_SESSION: i32 = 67;
/// Returned for calls made before `aw_init`.
pub const RC_NOT_INITIALIZED: i32 = 400;

#[derive(Debug, Clone)]
struct PendingEvent {
    kind: EventKind,
    instance: Option<InstanceHandle>,
    values: Vec<(Attribute, AttributeValue)>,
}

#[derive(Default)]
struct FakeState {
    build: Option<i32>,
    next_handle: usize,
    instances: HashSet<InstanceHandle>,
    current: Option<InstanceHandle>,
    values: HashMap<Attribute, AttributeValue>,
    handlers: HashMap<EventKind, NativeCallback>,
    pending: VecDeque<PendingEvent>,
    cells: BTreeMap<(i32, i32), Vec<CellObject>>,
    rights: HashMap<(i32, Attribute), bool>,
    world_attributes: HashMap<i32, (bool, String)>,
    addresses: HashMap<i32, Ipv4Addr>,
    query_batch: Option<usize>,
    failures: HashMap<&'static str, i32>,
    calls: Vec<String>,
}

impl FakeState {
    fn set(&mut self, attribute: Attribute, value: AttributeValue) {
        self.values.insert(attribute, value);
    }

    /// `complete` is reported on this cell's `CellEnd` when set.
    fn queue_cell(&mut self, cell: (i32, i32), objects: Vec<CellObject>, complete: Option<bool>) {
        let instance = self.current;
        self.pending.push_back(PendingEvent {
            kind: EventKind::CellBegin,
            instance,
            values: vec![
                (Attribute::CellX, cell.0.into()),
                (Attribute::CellZ, cell.1.into()),
            ],
        });
        for object in objects {
            self.pending.push_back(PendingEvent {
                kind: EventKind::CellObject,
                instance,
                values: object.attributes(),
            });
        }
        let mut end_values = Vec::new();
        if let Some(complete) = complete {
            end_values.push((Attribute::QueryComplete, complete.into()));
        }
        self.pending.push_back(PendingEvent {
            kind: EventKind::CellEnd,
            instance,
            values: end_values,
        });
    }
}

/// See the module documentation.
#[derive(Default)]
pub struct FakeSdk {
    state: Mutex<FakeState>,
}

impl FakeSdk {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A panicking test thread must not wedge the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record `call` and return the injected failure for it, if any.
    fn enter_call(&self, call: &'static str, detail: String) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        state.calls.push(format!("{}({})", call, detail));
        if let Some(rc) = state.failures.remove(call) {
            return Err(Error::Sdk {
                call,
                code: ReasonCode(rc),
            });
        }
        Ok(state)
    }

    fn require_init(state: &FakeState, call: &'static str) -> Result<()> {
        if state.build.is_none() {
            return Err(Error::Sdk {
                call,
                code: ReasonCode(RC_NOT_INITIALIZED),
            });
        }
        Ok(())
    }

    /// Every call received so far, formatted as `name(args)`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make the next call to `call` (e.g. `"aw_login"`) fail with `rc`.
    pub fn fail_next(&self, call: &'static str, rc: i32) {
        self.lock().failures.insert(call, rc);
    }

    /// Answer each `aw_query` with at most `cells` cells, leaving the rest
    /// for follow-up queries. `Some(0)` makes queries never complete.
    pub fn set_query_batch(&self, cells: Option<usize>) {
        self.lock().query_batch = cells;
    }

    /// Queue an event for the current instance, delivered on the next `wait`.
    pub fn push_event(&self, kind: EventKind, values: Vec<(Attribute, AttributeValue)>) {
        let mut state = self.lock();
        let instance = state.current;
        state.pending.push_back(PendingEvent {
            kind,
            instance,
            values,
        });
    }

    /// Queue an event that the library attributes to `instance`.
    pub fn push_event_for(
        &self,
        instance: InstanceHandle,
        kind: EventKind,
        values: Vec<(Attribute, AttributeValue)>,
    ) {
        self.lock().pending.push_back(PendingEvent {
            kind,
            instance: Some(instance),
            values,
        });
    }

    /// Place an object in the cell containing its position.
    pub fn add_cell_object(&self, object: CellObject) {
        let cell = object.cell();
        self.lock().cells.entry(cell).or_default().push(object);
    }

    pub fn set_world_right(&self, citizen: i32, right: Attribute, granted: bool) {
        self.lock().rights.insert((citizen, right), granted);
    }

    pub fn set_session_address(&self, session: i32, address: Ipv4Addr) {
        self.lock().addresses.insert(session, address);
    }

    pub fn set_world_attribute(&self, attribute: i32, read_only: bool, value: &str) {
        self.lock()
            .world_attributes
            .insert(attribute, (read_only, value.to_string()));
    }

    pub fn has_handler(&self, kind: EventKind) -> bool {
        self.lock().handlers.contains_key(&kind)
    }

    pub fn live_instances(&self) -> usize {
        self.lock().instances.len()
    }
}

impl Sdk for FakeSdk {
    fn init(&self, build: i32) -> Result<()> {
        let mut state = self.enter_call("aw_init", build.to_string())?;
        state.build = Some(build);
        Ok(())
    }

    fn term(&self) {
        let mut state = self.lock();
        state.calls.push("aw_term()".to_string());
        state.build = None;
    }

    fn create(&self, domain: &str, port: u16) -> Result<InstanceHandle> {
        let mut state = self.enter_call("aw_create", format!("{}, {}", domain, port))?;
        Self::require_init(&state, "aw_create")?;
        state.next_handle += 1;
        let handle = InstanceHandle::from_raw(state.next_handle).ok_or(Error::NullInstance)?;
        state.instances.insert(handle);
        state.current = Some(handle);
        Ok(handle)
    }

    fn destroy(&self, instance: InstanceHandle) -> Result<()> {
        let mut state = self.enter_call("aw_destroy", instance.as_raw().to_string())?;
        state.instances.remove(&instance);
        if state.current == Some(instance) {
            state.current = None;
        }
        Ok(())
    }

    fn set_instance(&self, instance: InstanceHandle) -> Result<()> {
        let mut state = self.lock();
        if !state.instances.contains(&instance) {
            return Err(Error::Sdk {
                call: "aw_instance_set",
                code: ReasonCode(RC_NOT_INITIALIZED),
            });
        }
        state.current = Some(instance);
        Ok(())
    }

    fn current_instance(&self) -> Option<InstanceHandle> {
        self.lock().current
    }

    fn login(&self) -> Result<()> {
        let state = self.enter_call("aw_login", String::new())?;
        Self::require_init(&state, "aw_login")
    }

    fn enter(&self, world: &str) -> Result<()> {
        let mut state = self.enter_call("aw_enter", world.to_string())?;
        state.set(Attribute::WorldName, world.into());
        Ok(())
    }

    fn state_change(&self) -> Result<()> {
        self.enter_call("aw_state_change", String::new()).map(|_| ())
    }

    fn wait(&self, milliseconds: i32) -> Result<()> {
        let idle = {
            let state = self.enter_call("aw_wait", milliseconds.to_string())?;
            state.pending.is_empty()
        };
        if idle && milliseconds > 0 {
            std::thread::sleep(Duration::from_millis(milliseconds as u64));
        }

        loop {
            // Never hold the lock while a handler runs: handlers read
            // attributes back through this same object.
            let handler = {
                let mut state = self.lock();
                let Some(event) = state.pending.pop_front() else {
                    break;
                };
                for (attribute, value) in event.values {
                    state.set(attribute, value);
                }
                if let Some(instance) = event.instance {
                    state.current = Some(instance);
                }
                state.handlers.get(&event.kind).copied()
            };
            if let Some(handler) = handler {
                handler();
            }
        }
        Ok(())
    }

    fn say(&self, message: &str) -> Result<()> {
        self.enter_call("aw_say", message.to_string()).map(|_| ())
    }

    fn whisper(&self, session: i32, message: &str) -> Result<()> {
        self.enter_call("aw_whisper", format!("{}, {}", session, message))
            .map(|_| ())
    }

    fn botgram_send(&self) -> Result<()> {
        let state = self.enter_call("aw_botgram_send", String::new())?;
        let to = state.values.get(&Attribute::BotgramTo).and_then(|v| v.as_int());
        if to.unwrap_or(0) == 0 {
            return Err(Error::Sdk {
                call: "aw_botgram_send",
                code: ReasonCode(3),
            });
        }
        Ok(())
    }

    fn int(&self, attribute: Attribute) -> i32 {
        self.lock()
            .values
            .get(&attribute)
            .and_then(|v| v.as_int())
            .unwrap_or(0)
    }

    fn int_set(&self, attribute: Attribute, value: i32) -> Result<()> {
        let mut state = self.enter_call("aw_int_set", format!("{}, {}", attribute.name(), value))?;
        state.set(attribute, value.into());
        Ok(())
    }

    fn bool(&self, attribute: Attribute) -> bool {
        self.lock()
            .values
            .get(&attribute)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn bool_set(&self, attribute: Attribute, value: bool) -> Result<()> {
        let mut state =
            self.enter_call("aw_bool_set", format!("{}, {}", attribute.name(), value))?;
        state.set(attribute, value.into());
        Ok(())
    }

    fn float(&self, attribute: Attribute) -> f32 {
        self.lock()
            .values
            .get(&attribute)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0)
    }

    fn float_set(&self, attribute: Attribute, value: f32) -> Result<()> {
        let mut state =
            self.enter_call("aw_float_set", format!("{}, {}", attribute.name(), value))?;
        state.set(attribute, value.into());
        Ok(())
    }

    fn string(&self, attribute: Attribute) -> String {
        self.lock()
            .values
            .get(&attribute)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    fn string_set(&self, attribute: Attribute, value: &str) -> Result<()> {
        if value.contains('\0') {
            return Err(Error::InvalidArgument(format!(
                "string contains a NUL byte: {:?}",
                value
            )));
        }
        let mut state =
            self.enter_call("aw_string_set", format!("{}, {}", attribute.name(), value))?;
        state.set(attribute, value.into());
        Ok(())
    }

    fn data(&self, attribute: Attribute) -> Vec<u8> {
        self.lock()
            .values
            .get(&attribute)
            .and_then(|v| v.as_bytes().map(<[u8]>::to_vec))
            .unwrap_or_default()
    }

    fn data_set(&self, attribute: Attribute, value: &[u8]) -> Result<()> {
        let mut state = self.enter_call(
            "aw_data_set",
            format!("{}, {} bytes", attribute.name(), value.len()),
        )?;
        state.set(attribute, value.to_vec().into());
        Ok(())
    }

    fn event_set(&self, kind: EventKind, handler: Option<NativeCallback>) -> Result<()> {
        let mut state =
            self.enter_call("aw_event_set", format!("{}, {}", kind, handler.is_some()))?;
        match handler {
            Some(handler) => state.handlers.insert(kind, handler),
            None => state.handlers.remove(&kind),
        };
        Ok(())
    }

    /// `sequence[dz][dx]` counts the cells already delivered for the sector
    /// at offset `(dx - 1, dz - 1)`; only cells past that count are sent.
    fn query(&self, x_sector: i32, z_sector: i32, sequence: &mut [[i32; 3]; 3]) -> Result<()> {
        let mut state = self.enter_call("aw_query", format!("{}, {}", x_sector, z_sector))?;
        state.set(Attribute::QueryComplete, false.into());

        let mut seen = [[0; 3]; 3];
        let mut outstanding = Vec::new();
        for (&(x, z), objects) in &state.cells {
            let dx = sector_from_cell(x) - x_sector + 1;
            let dz = sector_from_cell(z) - z_sector + 1;
            let (Ok(col @ 0..=2), Ok(row @ 0..=2)) = (usize::try_from(dx), usize::try_from(dz))
            else {
                continue;
            };
            if seen[row][col] >= sequence[row][col] {
                outstanding.push(((row, col), (x, z), objects.clone()));
            }
            seen[row][col] += 1;
        }

        let batch = state.query_batch.unwrap_or(usize::MAX).min(outstanding.len());
        let complete = batch == outstanding.len();
        if batch == 0 && complete {
            state.set(Attribute::QueryComplete, true.into());
        }
        for (i, ((row, col), cell, objects)) in outstanding.into_iter().take(batch).enumerate() {
            sequence[row][col] += 1;
            state.queue_cell(cell, objects, (i + 1 == batch).then_some(complete));
        }
        Ok(())
    }

    fn cell_next(&self) -> Result<()> {
        let mut state = self.enter_call("aw_cell_next", String::new())?;
        let iterator = state
            .values
            .get(&Attribute::CellIterator)
            .and_then(|v| v.as_int())
            .unwrap_or(0);

        let cells: Vec<_> = state.cells.keys().copied().collect();
        let index = match usize::try_from(iterator) {
            Ok(index) if index < cells.len() => index,
            _ => {
                return Err(Error::Sdk {
                    call: "aw_cell_next",
                    code: ReasonCode(RC_NO_SUCH_CELL),
                })
            }
        };

        let cell = cells[index];
        let objects = state.cells.get(&cell).cloned().unwrap_or_default();
        state.queue_cell(cell, objects, None);

        let next = if index + 1 < cells.len() {
            index as i32 + 1
        } else {
            -1
        };
        state.set(Attribute::CellIterator, next.into());
        Ok(())
    }

    fn world_attribute_get(&self, attribute: i32) -> Result<(bool, String)> {
        let state = self.enter_call("aw_world_attribute_get", attribute.to_string())?;
        state
            .world_attributes
            .get(&attribute)
            .cloned()
            .ok_or(Error::Sdk {
                call: "aw_world_attribute_get",
                code: ReasonCode(20),
            })
    }

    fn world_attribute_set(&self, attribute: i32, value: &str) -> Result<()> {
        let mut state =
            self.enter_call("aw_world_attribute_set", format!("{}, {}", attribute, value))?;
        let read_only = state
            .world_attributes
            .get(&attribute)
            .map(|(ro, _)| *ro)
            .unwrap_or(false);
        if read_only {
            return Err(Error::Sdk {
                call: "aw_world_attribute_set",
                code: ReasonCode(32),
            });
        }
        state
            .world_attributes
            .insert(attribute, (false, value.to_string()));
        Ok(())
    }

    fn has_world_right(&self, citizen: i32, right: Attribute) -> bool {
        let mut state = self.lock();
        state
            .calls
            .push(format!("aw_has_world_right({}, {})", citizen, right.name()));
        state.rights.get(&(citizen, right)).copied().unwrap_or(false)
    }

    fn address(&self, session: i32) -> Result<()> {
        let mut state = self.enter_call("aw_address", session.to_string())?;
        let address = state.addresses.get(&session).copied().ok_or(Error::Sdk {
            call: "aw_address",
            code: ReasonCode(RC_NO_SUCH_SESSION),
        })?;
        let raw = AddressData { session, address }.to_raw();
        state.set(Attribute::AvatarSession, session.into());
        state.set(Attribute::AvatarAddress, raw.into());
        Ok(())
    }

    fn avatar_click(&self, session: i32) -> Result<()> {
        self.enter_call("aw_avatar_click", session.to_string())
            .map(|_| ())
    }

    fn avatar_reload(&self, citizen: i32, session: i32) -> Result<()> {
        self.enter_call("aw_avatar_reload", format!("{}, {}", citizen, session))
            .map(|_| ())
    }

    fn avatar_location(&self, citizen: i32, session: i32, name: Option<&str>) -> Result<()> {
        self.enter_call(
            "aw_avatar_location",
            format!("{}, {}, {}", citizen, session, name.unwrap_or("")),
        )
        .map(|_| ())
    }

    fn avatar_set(&self, session: i32) -> Result<()> {
        self.enter_call("aw_avatar_set", session.to_string())
            .map(|_| ())
    }
}
