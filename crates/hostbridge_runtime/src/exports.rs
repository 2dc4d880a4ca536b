//! The `extern "C"` surface.
//!
//! Every entry point runs through [`Bridge::run`], so errors and panics end
//! as one fault on [`FAULTS`] plus the documented failure value. Output
//! pointers are written only after the whole result is built.

use core::ffi::c_void;
use core::mem::MaybeUninit;

use hostbridge_abi::bytes::{borrow_native, borrow_native_mut};
use hostbridge_abi::{
    Bool32, MemberDescriptor, NativeArray, NativeString, ObjectHandle, ReflectionType, TypeHandle,
};
use hostbridge_marshal::{MarshalError, release_outbound};
use hostbridge_utils::logger::init_logging;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::fault::{FaultCallback, FaultChannel};

pub static FAULTS: FaultChannel = FaultChannel::new();

static BRIDGE: Lazy<Bridge> = Lazy::new(|| {
    let config = BridgeConfig::load();
    init_logging(config.log_filter.as_deref());
    FAULTS.set_include_operation(config.faults.include_operation);
    debug!(?config, "bridge initialized");
    Bridge::new(config)
});

/// The process-wide bridge behind the entry points.
pub fn bridge() -> &'static Bridge {
    &BRIDGE
}

fn run<T>(
    operation: &'static str,
    failure: T,
    body: impl FnOnce(&Bridge) -> Result<T, BridgeError>,
) -> T {
    bridge().run(&FAULTS, operation, failure, body)
}

unsafe fn text(string: &NativeString, argument: &'static str) -> Result<String, BridgeError> {
    unsafe { string.to_string_lossy() }.ok_or(BridgeError::NullArgument(argument))
}

fn non_null<T>(pointer: *mut T, argument: &'static str) -> Result<*mut T, BridgeError> {
    if pointer.is_null() {
        Err(BridgeError::NullArgument(argument))
    } else {
        Ok(pointer)
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn hostbridge_initialize() {
    Lazy::force(&BRIDGE);
}

/// Registers the fault receiver, replacing any previous one. `None` turns
/// delivery off.
#[unsafe(no_mangle)]
pub extern "C" fn hostbridge_set_fault_callback(callback: Option<FaultCallback>) {
    FAULTS.set_callback(callback);
}

/// # Safety
/// `name` must be a valid descriptor for the duration of the call and `out`
/// must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_resolve_type_descriptor(
    name: NativeString,
    out: *mut ReflectionType,
) -> Bool32 {
    run("resolve_type_descriptor", Bool32::FALSE, |bridge| {
        let out = non_null(out, "out")?;
        let name = unsafe { text(&name, "name") }?;
        let Some(descriptor) = bridge.resolve_type_descriptor(&name)? else {
            return Ok(Bool32::FALSE);
        };
        unsafe { out.write(descriptor) };
        Ok(Bool32::TRUE)
    })
}

/// # Safety
/// Both names must be valid descriptors for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_is_type_assignable_to(
    from: NativeString,
    to: NativeString,
) -> Bool32 {
    run("is_type_assignable_to", Bool32::FALSE, |bridge| {
        let from = unsafe { text(&from, "from") }?;
        let to = unsafe { text(&to, "to") }?;
        Ok(bridge.is_assignable_to(&from, &to).into())
    })
}

/// # Safety
/// Both names must be valid descriptors for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_is_type_assignable_from(
    target: NativeString,
    source: NativeString,
) -> Bool32 {
    run("is_type_assignable_from", Bool32::FALSE, |bridge| {
        let target = unsafe { text(&target, "target") }?;
        let source = unsafe { text(&source, "source") }?;
        Ok(bridge.is_assignable_from(&target, &source).into())
    })
}

/// # Safety
/// `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_describe_type_of_object(
    object: ObjectHandle,
    out: *mut ReflectionType,
) -> Bool32 {
    run("describe_type_of_object", Bool32::FALSE, |bridge| {
        let out = non_null(out, "out")?;
        let descriptor = bridge.describe_object(object)?;
        unsafe { out.write(descriptor) };
        Ok(Bool32::TRUE)
    })
}

type Enumerate =
    fn(&Bridge, &str, Option<&mut [MaybeUninit<MemberDescriptor>]>) -> Result<usize, BridgeError>;

/// Shared two-pass protocol. `*count` carries the buffer capacity in and the
/// member count out; a failure writes zero.
unsafe fn enumerate_members(
    operation: &'static str,
    enumerate: Enumerate,
    name: &NativeString,
    out: *mut MemberDescriptor,
    count: *mut i32,
) {
    let Some(count) = (unsafe { count.as_mut() }) else {
        run(operation, (), |_| Err(BridgeError::NullArgument("count")));
        return;
    };
    let capacity = usize::try_from(*count).unwrap_or_default();
    *count = run(operation, 0, |bridge| {
        let name = unsafe { text(name, "name") }?;
        let buffer = if out.is_null() {
            None
        } else {
            // SAFETY: the caller provides `capacity` writable slots.
            let slots = out.cast::<MaybeUninit<MemberDescriptor>>();
            Some(unsafe { core::slice::from_raw_parts_mut(slots, capacity) })
        };
        let members = enumerate(bridge, &name, buffer)?;
        i32::try_from(members)
            .map_err(|_| MarshalError::TooManyElements { count: members })
            .map_err(BridgeError::from)
    });
}

/// Pass a null `out` to learn the count, then a buffer with `*count` slots.
///
/// # Safety
/// `count` must be writable and `out` null or valid for `*count` slots.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_enumerate_methods(
    name: NativeString,
    out: *mut MemberDescriptor,
    count: *mut i32,
) {
    unsafe {
        enumerate_members("enumerate_methods", Bridge::enumerate_methods, &name, out, count);
    }
}

/// See [`hostbridge_enumerate_methods`].
///
/// # Safety
/// `count` must be writable and `out` null or valid for `*count` slots.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_enumerate_fields(
    name: NativeString,
    out: *mut MemberDescriptor,
    count: *mut i32,
) {
    unsafe {
        enumerate_members("enumerate_fields", Bridge::enumerate_fields, &name, out, count);
    }
}

/// Writes the null handle on a miss.
///
/// # Safety
/// `name` must be a valid descriptor and `out` writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_resolve_type_handle(name: NativeString, out: *mut TypeHandle) {
    run("resolve_type_handle", (), |bridge| {
        let out = non_null(out, "out")?;
        let name = unsafe { text(&name, "name") }?;
        unsafe { out.write(bridge.resolve_type_handle(&name)) };
        Ok(())
    });
}

/// Creates an object with the constructor matching `count`. Returns the
/// null handle on failure.
///
/// # Safety
/// `parameters` must be null or point at `count` pointers, each null or
/// pointing at a value laid out as its parameter's shape.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_create_object(
    type_handle: TypeHandle,
    parameters: *const *const c_void,
    count: i32,
) -> ObjectHandle {
    run("create_object", ObjectHandle::NULL, |bridge| {
        let count = usize::try_from(count).map_err(|_| MarshalError::NegativeLength(count))?;
        unsafe { bridge.create_object_from_native(type_handle, parameters.cast(), count) }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn hostbridge_release_object(object: ObjectHandle) -> Bool32 {
    run("release_object", Bool32::FALSE, |bridge| {
        Ok(bridge.release_object(object).into())
    })
}

/// Writes the field's value into `destination`. Strings and arrays written
/// are released with [`hostbridge_release_value`].
///
/// # Safety
/// `field` must be a valid descriptor and `destination` valid for `size`
/// writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_get_field_value(
    object: ObjectHandle,
    field: NativeString,
    destination: *mut u8,
    size: usize,
) -> Bool32 {
    run("get_field_value", Bool32::FALSE, |bridge| {
        let field = unsafe { text(&field, "field") }?;
        let destination = unsafe { borrow_native_mut(destination, size) }
            .ok_or(BridgeError::NullArgument("destination"))?;
        bridge.get_field_value(object, &field, destination)?;
        Ok(Bool32::TRUE)
    })
}

/// # Safety
/// `field` must be a valid descriptor and `source` valid for `size` bytes
/// laid out as the field's shape.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_set_field_value(
    object: ObjectHandle,
    field: NativeString,
    source: *const u8,
    size: usize,
) -> Bool32 {
    run("set_field_value", Bool32::FALSE, |bridge| {
        let field = unsafe { text(&field, "field") }?;
        let source =
            unsafe { borrow_native(source, size) }.ok_or(BridgeError::NullArgument("source"))?;
        unsafe { bridge.set_field_value(object, &field, source) }?;
        Ok(Bool32::TRUE)
    })
}

/// Deep-releases a value of type `type_name` previously written by the
/// bridge into `buffer`. An unknown type releases nothing.
///
/// # Safety
/// `buffer` must be valid for `size` writable bytes holding such a value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_release_value(
    type_name: NativeString,
    buffer: *mut u8,
    size: usize,
) -> Bool32 {
    run("release_value", Bool32::FALSE, |bridge| {
        let name = unsafe { text(&type_name, "type_name") }?;
        let Some(shape) = bridge.directory().shape_of(&name) else {
            return Ok(Bool32::FALSE);
        };
        let buffer = unsafe { borrow_native_mut(buffer, size) }
            .ok_or(BridgeError::NullArgument("buffer"))?;
        if buffer.len() < shape.size() {
            return Err(BridgeError::BufferTooSmall {
                capacity: buffer.len(),
                required: shape.size(),
            });
        }
        unsafe { release_outbound(buffer, &shape) };
        Ok(Bool32::TRUE)
    })
}

/// # Safety
/// `string` must be null or point at a descriptor produced by the bridge.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_native_string_free(string: *mut NativeString) {
    if let Some(string) = unsafe { string.as_mut() } {
        unsafe { string.release() };
    }
}

/// Frees the element buffer only.
///
/// # Safety
/// `array` must be null or point at a descriptor produced by the bridge.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hostbridge_native_array_free(array: *mut NativeArray) {
    if let Some(array) = unsafe { array.as_mut() } {
        unsafe { array.release() };
    }
}

/// Function table for hosts that bind the library dynamically.
#[repr(C)]
pub struct BridgeExports {
    pub initialize: extern "C" fn(),
    pub set_fault_callback: extern "C" fn(Option<FaultCallback>),
    pub resolve_type_descriptor: unsafe extern "C" fn(NativeString, *mut ReflectionType) -> Bool32,
    pub is_type_assignable_to: unsafe extern "C" fn(NativeString, NativeString) -> Bool32,
    pub is_type_assignable_from: unsafe extern "C" fn(NativeString, NativeString) -> Bool32,
    pub describe_type_of_object: unsafe extern "C" fn(ObjectHandle, *mut ReflectionType) -> Bool32,
    pub enumerate_methods: unsafe extern "C" fn(NativeString, *mut MemberDescriptor, *mut i32),
    pub enumerate_fields: unsafe extern "C" fn(NativeString, *mut MemberDescriptor, *mut i32),
    pub resolve_type_handle: unsafe extern "C" fn(NativeString, *mut TypeHandle),
    pub create_object: unsafe extern "C" fn(TypeHandle, *const *const c_void, i32) -> ObjectHandle,
    pub release_object: extern "C" fn(ObjectHandle) -> Bool32,
    pub get_field_value: unsafe extern "C" fn(ObjectHandle, NativeString, *mut u8, usize) -> Bool32,
    pub set_field_value:
        unsafe extern "C" fn(ObjectHandle, NativeString, *const u8, usize) -> Bool32,
    pub release_value: unsafe extern "C" fn(NativeString, *mut u8, usize) -> Bool32,
    pub native_string_free: unsafe extern "C" fn(*mut NativeString),
    pub native_array_free: unsafe extern "C" fn(*mut NativeArray),
}

static EXPORTS: BridgeExports = BridgeExports {
    initialize: hostbridge_initialize,
    set_fault_callback: hostbridge_set_fault_callback,
    resolve_type_descriptor: hostbridge_resolve_type_descriptor,
    is_type_assignable_to: hostbridge_is_type_assignable_to,
    is_type_assignable_from: hostbridge_is_type_assignable_from,
    describe_type_of_object: hostbridge_describe_type_of_object,
    enumerate_methods: hostbridge_enumerate_methods,
    enumerate_fields: hostbridge_enumerate_fields,
    resolve_type_handle: hostbridge_resolve_type_handle,
    create_object: hostbridge_create_object,
    release_object: hostbridge_release_object,
    get_field_value: hostbridge_get_field_value,
    set_field_value: hostbridge_set_field_value,
    release_value: hostbridge_release_value,
    native_string_free: hostbridge_native_string_free,
    native_array_free: hostbridge_native_array_free,
};

#[unsafe(no_mangle)]
pub extern "C" fn hostbridge_exports() -> *const BridgeExports {
    &raw const EXPORTS
}
