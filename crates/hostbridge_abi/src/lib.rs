//! `#[repr(C)]` containers shared with the native side, plus the
//! bounds-checked byte views every layout read and write goes through.

pub mod alloc;
pub mod array;
pub mod bool32;
pub mod bytes;
pub mod handle;
pub mod reflection;
pub mod string;

pub use alloc::AllocError;
pub use array::NativeArray;
pub use bool32::Bool32;
pub use bytes::{Blittable, ByteView, ByteViewMut, OutOfBounds};
pub use handle::{ObjectHandle, TypeHandle};
pub use reflection::{MemberDescriptor, ReflectionType, TypeVisibility};
pub use string::NativeString;
