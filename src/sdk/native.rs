use std::ffi::{c_char, c_float, c_int, c_uint, c_void, CStr, CString};
use std::path::Path;
use std::ptr;

use libloading::{Library, Symbol};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sdk::{Attribute, EventKind, InstanceHandle, NativeCallback, ReasonCode, Sdk};

/// Size of the buffer handed to `aw_world_attribute_get`.
const WORLD_ATTRIBUTE_BUFFER: usize = 1024;

/// Resolved vendor entry points.
struct Api {
    init: unsafe extern "C" fn(c_int) -> c_int,
    term: unsafe extern "C" fn(),
    create: unsafe extern "C" fn(*const c_char, c_int, *mut *mut c_void) -> c_int,
    destroy: unsafe extern "C" fn() -> c_int,
    instance: unsafe extern "C" fn() -> *mut c_void,
    instance_set: unsafe extern "C" fn(*mut c_void) -> c_int,
    login: unsafe extern "C" fn() -> c_int,
    enter: unsafe extern "C" fn(*const c_char) -> c_int,
    state_change: unsafe extern "C" fn() -> c_int,
    wait: unsafe extern "C" fn(c_int) -> c_int,
    say: unsafe extern "C" fn(*const c_char) -> c_int,
    whisper: unsafe extern "C" fn(c_int, *const c_char) -> c_int,
    botgram_send: unsafe extern "C" fn() -> c_int,
    int: unsafe extern "C" fn(c_int) -> c_int,
    int_set: unsafe extern "C" fn(c_int, c_int) -> c_int,
    bool: unsafe extern "C" fn(c_int) -> c_int,
    bool_set: unsafe extern "C" fn(c_int, c_int) -> c_int,
    float: unsafe extern "C" fn(c_int) -> c_float,
    float_set: unsafe extern "C" fn(c_int, c_float) -> c_int,
    string: unsafe extern "C" fn(c_int) -> *const c_char,
    string_set: unsafe extern "C" fn(c_int, *const c_char) -> c_int,
    data: unsafe extern "C" fn(c_int, *mut c_uint) -> *const c_char,
    data_set: unsafe extern "C" fn(c_int, *const c_char, c_uint) -> c_int,
    event_set: unsafe extern "C" fn(c_int, Option<NativeCallback>) -> c_int,
    query: unsafe extern "C" fn(c_int, c_int, *mut c_int) -> c_int,
    cell_next: unsafe extern "C" fn() -> c_int,
    world_attribute_get: unsafe extern "C" fn(c_int, *mut c_int, *mut c_char) -> c_int,
    world_attribute_set: unsafe extern "C" fn(c_int, *const c_char) -> c_int,
    has_world_right: unsafe extern "C" fn(c_int, c_int) -> c_int,
    address: unsafe extern "C" fn(c_int) -> c_int,
    avatar_click: unsafe extern "C" fn(c_int) -> c_int,
    avatar_reload: unsafe extern "C" fn(c_int, c_int) -> c_int,
    avatar_location: unsafe extern "C" fn(c_int, c_int, *const c_char) -> c_int,
    avatar_set: unsafe extern "C" fn(c_int) -> c_int,
}

/// Copy a function pointer out of the library.
///
/// # Safety
/// `T` must match the C signature of `name`.
unsafe fn resolve<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
    let symbol: Symbol<T> = library
        .get(name.as_bytes())
        .map_err(|_| Error::MissingSymbol(name))?;
    Ok(*symbol)
}

impl Api {
    fn load(library: &Library) -> Result<Self> {
        // SAFETY: every field type above is the documented prototype of
        // the symbol it is resolved from.
        unsafe {
            Ok(Api {
                init: resolve(library, "aw_init")?,
                term: resolve(library, "aw_term")?,
                create: resolve(library, "aw_create")?,
                destroy: resolve(library, "aw_destroy")?,
                instance: resolve(library, "aw_instance")?,
                instance_set: resolve(library, "aw_instance_set")?,
                login: resolve(library, "aw_login")?,
                enter: resolve(library, "aw_enter")?,
                state_change: resolve(library, "aw_state_change")?,
                wait: resolve(library, "aw_wait")?,
                say: resolve(library, "aw_say")?,
                whisper: resolve(library, "aw_whisper")?,
                botgram_send: resolve(library, "aw_botgram_send")?,
                int: resolve(library, "aw_int")?,
                int_set: resolve(library, "aw_int_set")?,
                bool: resolve(library, "aw_bool")?,
                bool_set: resolve(library, "aw_bool_set")?,
                float: resolve(library, "aw_float")?,
                float_set: resolve(library, "aw_float_set")?,
                string: resolve(library, "aw_string")?,
                string_set: resolve(library, "aw_string_set")?,
                data: resolve(library, "aw_data")?,
                data_set: resolve(library, "aw_data_set")?,
                event_set: resolve(library, "aw_event_set")?,
                query: resolve(library, "aw_query")?,
                cell_next: resolve(library, "aw_cell_next")?,
                world_attribute_get: resolve(library, "aw_world_attribute_get")?,
                world_attribute_set: resolve(library, "aw_world_attribute_set")?,
                has_world_right: resolve(library, "aw_has_world_right")?,
                address: resolve(library, "aw_address")?,
                avatar_click: resolve(library, "aw_avatar_click")?,
                avatar_reload: resolve(library, "aw_avatar_reload")?,
                avatar_location: resolve(library, "aw_avatar_location")?,
                avatar_set: resolve(library, "aw_avatar_set")?,
            })
        }
    }
}

/// The vendor SDK loaded from its dynamic library.
pub struct NativeSdk {
    api: Api,
    // Keeps the function pointers in `api` valid.
    _library: Library,
}

impl NativeSdk {
    /// Open the SDK library at `path` (e.g. `./aw64.dll`) and resolve its
    /// entry points.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // SAFETY: loading runs the library's initialisers; the vendor
        // library has none beyond its own static setup.
        let library = unsafe { Library::new(path) }?;
        let api = Api::load(&library)?;
        info!(target: "sdk", "Loaded SDK from {}", path.display());
        Ok(NativeSdk {
            api,
            _library: library,
        })
    }
}

fn c_string(value: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|_| Error::InvalidArgument(format!("string contains a NUL byte: {:?}", value)))
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn read_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

// SAFETY (applies to every call below): the pointers passed are either
// owned CStrings/buffers that outlive the call or null where the vendor
// prototype allows it.
impl Sdk for NativeSdk {
    fn init(&self, build: i32) -> Result<()> {
        debug!(target: "sdk", "aw_init({})", build);
        ReasonCode::check("aw_init", unsafe { (self.api.init)(build) })
    }

    fn term(&self) {
        debug!(target: "sdk", "aw_term()");
        unsafe { (self.api.term)() }
    }

    fn create(&self, domain: &str, port: u16) -> Result<InstanceHandle> {
        let domain = c_string(domain)?;
        let mut raw: *mut c_void = ptr::null_mut();
        let rc = unsafe { (self.api.create)(domain.as_ptr(), c_int::from(port), &mut raw) };
        ReasonCode::check("aw_create", rc)?;
        InstanceHandle::from_raw(raw as usize).ok_or(Error::NullInstance)
    }

    fn destroy(&self, instance: InstanceHandle) -> Result<()> {
        self.set_instance(instance)?;
        ReasonCode::check("aw_destroy", unsafe { (self.api.destroy)() })
    }

    fn set_instance(&self, instance: InstanceHandle) -> Result<()> {
        let rc = unsafe { (self.api.instance_set)(instance.as_raw() as *mut c_void) };
        ReasonCode::check("aw_instance_set", rc)
    }

    fn current_instance(&self) -> Option<InstanceHandle> {
        InstanceHandle::from_raw(unsafe { (self.api.instance)() } as usize)
    }

    fn login(&self) -> Result<()> {
        ReasonCode::check("aw_login", unsafe { (self.api.login)() })
    }

    fn enter(&self, world: &str) -> Result<()> {
        let world = c_string(world)?;
        ReasonCode::check("aw_enter", unsafe { (self.api.enter)(world.as_ptr()) })
    }

    fn state_change(&self) -> Result<()> {
        ReasonCode::check("aw_state_change", unsafe { (self.api.state_change)() })
    }

    fn wait(&self, milliseconds: i32) -> Result<()> {
        ReasonCode::check("aw_wait", unsafe { (self.api.wait)(milliseconds) })
    }

    fn say(&self, message: &str) -> Result<()> {
        let message = c_string(message)?;
        ReasonCode::check("aw_say", unsafe { (self.api.say)(message.as_ptr()) })
    }

    fn whisper(&self, session: i32, message: &str) -> Result<()> {
        let message = c_string(message)?;
        ReasonCode::check("aw_whisper", unsafe {
            (self.api.whisper)(session, message.as_ptr())
        })
    }

    fn botgram_send(&self) -> Result<()> {
        ReasonCode::check("aw_botgram_send", unsafe { (self.api.botgram_send)() })
    }

    fn int(&self, attribute: Attribute) -> i32 {
        unsafe { (self.api.int)(attribute.code()) }
    }

    fn int_set(&self, attribute: Attribute, value: i32) -> Result<()> {
        ReasonCode::check("aw_int_set", unsafe {
            (self.api.int_set)(attribute.code(), value)
        })
    }

    fn bool(&self, attribute: Attribute) -> bool {
        unsafe { (self.api.bool)(attribute.code()) != 0 }
    }

    fn bool_set(&self, attribute: Attribute, value: bool) -> Result<()> {
        ReasonCode::check("aw_bool_set", unsafe {
            (self.api.bool_set)(attribute.code(), c_int::from(value))
        })
    }

    fn float(&self, attribute: Attribute) -> f32 {
        unsafe { (self.api.float)(attribute.code()) }
    }

    fn float_set(&self, attribute: Attribute, value: f32) -> Result<()> {
        ReasonCode::check("aw_float_set", unsafe {
            (self.api.float_set)(attribute.code(), value)
        })
    }

    fn string(&self, attribute: Attribute) -> String {
        unsafe { read_c_str((self.api.string)(attribute.code())) }
    }

    fn string_set(&self, attribute: Attribute, value: &str) -> Result<()> {
        let value = c_string(value)?;
        ReasonCode::check("aw_string_set", unsafe {
            (self.api.string_set)(attribute.code(), value.as_ptr())
        })
    }

    fn data(&self, attribute: Attribute) -> Vec<u8> {
        let mut length: c_uint = 0;
        let ptr = unsafe { (self.api.data)(attribute.code(), &mut length) };
        if ptr.is_null() || length == 0 {
            return Vec::new();
        }
        // SAFETY: the SDK reports `length` readable bytes at `ptr`.
        unsafe { std::slice::from_raw_parts(ptr as *const u8, length as usize) }.to_vec()
    }

    fn data_set(&self, attribute: Attribute, value: &[u8]) -> Result<()> {
        let length = c_uint::try_from(value.len())
            .map_err(|_| Error::InvalidArgument(format!("{} bytes is too long", value.len())))?;
        ReasonCode::check("aw_data_set", unsafe {
            (self.api.data_set)(attribute.code(), value.as_ptr() as *const c_char, length)
        })
    }

    fn event_set(&self, kind: EventKind, handler: Option<NativeCallback>) -> Result<()> {
        debug!(target: "sdk", "aw_event_set({}, {})", kind, handler.is_some());
        ReasonCode::check("aw_event_set", unsafe {
            (self.api.event_set)(kind.code(), handler)
        })
    }

    fn query(&self, x_sector: i32, z_sector: i32, sequence: &mut [[i32; 3]; 3]) -> Result<()> {
        ReasonCode::check("aw_query", unsafe {
            (self.api.query)(x_sector, z_sector, sequence.as_mut_ptr() as *mut c_int)
        })
    }

    fn cell_next(&self) -> Result<()> {
        ReasonCode::check("aw_cell_next", unsafe { (self.api.cell_next)() })
    }

    fn world_attribute_get(&self, attribute: i32) -> Result<(bool, String)> {
        let mut read_only: c_int = 0;
        let mut buffer = vec![0 as c_char; WORLD_ATTRIBUTE_BUFFER];
        let rc = unsafe {
            (self.api.world_attribute_get)(attribute, &mut read_only, buffer.as_mut_ptr())
        };
        ReasonCode::check("aw_world_attribute_get", rc)?;
        // The vendor does not guarantee termination on overflow.
        if let Some(last) = buffer.last_mut() {
            *last = 0;
        }
        let value = unsafe { read_c_str(buffer.as_ptr()) };
        Ok((read_only != 0, value))
    }

    fn world_attribute_set(&self, attribute: i32, value: &str) -> Result<()> {
        let value = c_string(value)?;
        ReasonCode::check("aw_world_attribute_set", unsafe {
            (self.api.world_attribute_set)(attribute, value.as_ptr())
        })
    }

    fn has_world_right(&self, citizen: i32, right: Attribute) -> bool {
        unsafe { (self.api.has_world_right)(citizen, right.code()) != 0 }
    }

    fn address(&self, session: i32) -> Result<()> {
        ReasonCode::check("aw_address", unsafe { (self.api.address)(session) })
    }

    fn avatar_click(&self, session: i32) -> Result<()> {
        ReasonCode::check("aw_avatar_click", unsafe { (self.api.avatar_click)(session) })
    }

    fn avatar_reload(&self, citizen: i32, session: i32) -> Result<()> {
        ReasonCode::check("aw_avatar_reload", unsafe {
            (self.api.avatar_reload)(citizen, session)
        })
    }

    fn avatar_location(&self, citizen: i32, session: i32, name: Option<&str>) -> Result<()> {
        let name = name.map(c_string).transpose()?;
        let name_ptr = name.as_ref().map_or(ptr::null(), |n| n.as_ptr());
        ReasonCode::check("aw_avatar_location", unsafe {
            (self.api.avatar_location)(citizen, session, name_ptr)
        })
    }

    fn avatar_set(&self, session: i32) -> Result<()> {
        ReasonCode::check("aw_avatar_set", unsafe { (self.api.avatar_set)(session) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_library_fails() {
        let result = NativeSdk::load("./definitely-not-the-sdk.so");
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_c_string_rejects_interior_nul() {
        assert!(c_string("hello").is_ok());
        assert!(matches!(c_string("he\0llo"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_read_null_string() {
        assert_eq!(unsafe { read_c_str(ptr::null()) }, "");
    }
}
