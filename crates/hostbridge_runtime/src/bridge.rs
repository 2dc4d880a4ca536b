use core::mem::MaybeUninit;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use hostbridge_abi::{MemberDescriptor, ObjectHandle, ReflectionType, TypeHandle};
use hostbridge_marshal::{read_inbound, read_parameter_list, write_outbound};
use hostbridge_symbol::TypeShape;
use hostbridge_ty::{TypeDirectory, TypeError, Value};
use tracing::debug;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::fault::FaultSink;
use crate::heap::{ManagedObject, ObjectHeap};
use crate::reflection::{build_member_descriptors, build_reflection_type};

/// The bridge's services behind one facade: the type directory, the object
/// heap and the configuration they were created with.
///
/// Operations return `Result`; only [`Bridge::run`] turns an error into a
/// reported fault.
pub struct Bridge {
    config: BridgeConfig,
    directory: TypeDirectory,
    heap: ObjectHeap,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        let directory = TypeDirectory::new();
        directory.bootstrap(config.directory.autoload_core);
        Self {
            config,
            directory,
            heap: ObjectHeap::new(),
        }
    }

    #[inline]
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[inline]
    pub const fn directory(&self) -> &TypeDirectory {
        &self.directory
    }

    #[inline]
    pub const fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    /// Runs `body` for the boundary. An error or panic is reported to `sink`
    /// exactly once and `failure` is returned instead.
    pub fn run<T>(
        &self,
        sink: &dyn FaultSink,
        operation: &'static str,
        failure: T,
        body: impl FnOnce(&Self) -> Result<T, BridgeError>,
    ) -> T {
        match catch_unwind(AssertUnwindSafe(|| body(self))) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                sink.report(operation, &err);
                failure
            }
            Err(payload) => {
                sink.report(operation, &BridgeError::Panic(panic_message(&*payload)));
                failure
            }
        }
    }

    /// `None` when the name does not resolve.
    pub fn resolve_type_descriptor(&self, name: &str) -> Result<Option<ReflectionType>, BridgeError> {
        let Some(info) = self.directory.resolve(name) else {
            debug!(name, "type not found");
            return Ok(None);
        };
        Ok(Some(build_reflection_type(&info)?))
    }

    fn object(&self, handle: ObjectHandle) -> Result<std::sync::Arc<ManagedObject>, BridgeError> {
        self.heap
            .get(handle)
            .ok_or(BridgeError::InvalidHandle(handle.0))
    }

    pub fn describe_object(&self, handle: ObjectHandle) -> Result<ReflectionType, BridgeError> {
        let object = self.object(handle)?;
        let info = self
            .directory
            .resolve_handle(object.type_handle)
            .ok_or(TypeError::UnknownHandle(object.type_handle.0))?;
        Ok(build_reflection_type(&info)?)
    }

    pub fn is_assignable_to(&self, from: &str, to: &str) -> bool {
        self.directory.is_assignable_to(from, to)
    }

    pub fn is_assignable_from(&self, target: &str, source: &str) -> bool {
        self.directory.is_assignable_from(target, source)
    }

    /// Two-pass member enumeration. Without `out` only the count is
    /// returned; with it, the first `count` slots are initialized. A miss
    /// counts zero members.
    pub fn enumerate_methods(
        &self,
        name: &str,
        out: Option<&mut [MaybeUninit<MemberDescriptor>]>,
    ) -> Result<usize, BridgeError> {
        let methods = self.directory.methods_of(name).unwrap_or_default();
        fill_members(
            methods
                .iter()
                .map(|method| (method.name.as_str(), method.access.visibility())),
            methods.len(),
            out,
        )
    }

    pub fn enumerate_fields(
        &self,
        name: &str,
        out: Option<&mut [MaybeUninit<MemberDescriptor>]>,
    ) -> Result<usize, BridgeError> {
        let fields = self.directory.fields_of(name).unwrap_or_default();
        fill_members(
            fields
                .iter()
                .map(|field| (field.name.as_str(), field.access.visibility())),
            fields.len(),
            out,
        )
    }

    /// The handle of `name`, or the null handle on a miss.
    pub fn resolve_type_handle(&self, name: &str) -> TypeHandle {
        self.directory
            .resolve(name)
            .map_or(TypeHandle::NULL, |info| info.handle)
    }

    pub fn create_object(
        &self,
        type_handle: TypeHandle,
        arguments: Vec<Value>,
    ) -> Result<ObjectHandle, BridgeError> {
        let value = self.directory.construct(type_handle, arguments)?;
        let info = self
            .directory
            .resolve_handle(type_handle)
            .ok_or(TypeError::UnknownHandle(type_handle.0))?;
        let handle = self.heap.insert(type_handle, info.name.clone(), value);
        debug!(ty = %info.name, object = handle.0, "created object");
        Ok(handle)
    }

    /// Reads constructor arguments from native memory and creates the object.
    ///
    /// # Safety
    /// See [`read_parameter_list`].
    pub unsafe fn create_object_from_native(
        &self,
        type_handle: TypeHandle,
        parameters: *const *const u8,
        count: usize,
    ) -> Result<ObjectHandle, BridgeError> {
        let info = self
            .directory
            .resolve_handle(type_handle)
            .ok_or(TypeError::UnknownHandle(type_handle.0))?;
        let received = if parameters.is_null() { 0 } else { count };
        let constructor = info.constructors().find(|ctor| ctor.arity() == received);
        if constructor.is_none() && received > 0 {
            return Err(TypeError::NoMatchingConstructor {
                ty: info.name.clone(),
                arity: received,
            }
            .into());
        }
        let arguments = unsafe { read_parameter_list(parameters, count, constructor) }?
            .unwrap_or_default();
        self.create_object(type_handle, arguments)
    }

    pub fn release_object(&self, handle: ObjectHandle) -> bool {
        self.heap.release(handle)
    }

    /// Shape of an instance field of a live object.
    pub fn field_shape(&self, handle: ObjectHandle, field: &str) -> Result<TypeShape, BridgeError> {
        let object = self.object(handle)?;
        let info = self
            .directory
            .resolve_handle(object.type_handle)
            .ok_or(TypeError::UnknownHandle(object.type_handle.0))?;
        self.directory
            .instance_fields_of(&info)
            .into_iter()
            .find(|candidate| candidate.name == field)
            .map(|field| field.shape)
            .ok_or_else(|| BridgeError::UnknownField {
                ty: info.name.clone(),
                field: field.to_owned(),
            })
    }

    /// Writes a field's current value into `destination`, which becomes the
    /// owner of any strings or arrays written.
    pub fn get_field_value(
        &self,
        handle: ObjectHandle,
        field: &str,
        destination: &mut [u8],
    ) -> Result<(), BridgeError> {
        let shape = self.field_shape(handle, field)?;
        let object = self.object(handle)?;
        let value = object.field(field).ok_or_else(|| BridgeError::UnknownField {
            ty: object.type_name.clone(),
            field: field.to_owned(),
        })?;

        let required = shape.size();
        let capacity = destination.len();
        let destination = destination
            .get_mut(..required)
            .ok_or(BridgeError::BufferTooSmall { capacity, required })?;

        // Nothing reaches `destination` unless the whole value was written.
        let mut scratch = vec![0u8; required];
        write_outbound(&value, &shape, &mut scratch)?;
        destination.copy_from_slice(&scratch);
        Ok(())
    }

    /// Replaces a field with the value laid out in `source`.
    ///
    /// # Safety
    /// See [`read_inbound`].
    pub unsafe fn set_field_value(
        &self,
        handle: ObjectHandle,
        field: &str,
        source: &[u8],
    ) -> Result<(), BridgeError> {
        let shape = self.field_shape(handle, field)?;
        let value = unsafe { read_inbound(source, &shape) }?;
        let object = self.object(handle)?;
        if object.set_field(field, value) {
            Ok(())
        } else {
            Err(BridgeError::UnknownField {
                ty: object.type_name.clone(),
                field: field.to_owned(),
            })
        }
    }
}

fn fill_members<'a>(
    members: impl Iterator<Item = (&'a str, hostbridge_abi::TypeVisibility)>,
    required: usize,
    out: Option<&mut [MaybeUninit<MemberDescriptor>]>,
) -> Result<usize, BridgeError> {
    let Some(out) = out else {
        return Ok(required);
    };
    if out.len() < required {
        return Err(BridgeError::BufferTooSmall {
            capacity: out.len(),
            required,
        });
    }
    let descriptors = build_member_descriptors(members)?;
    for (slot, descriptor) in out.iter_mut().zip(descriptors) {
        slot.write(descriptor);
    }
    Ok(required)
}
