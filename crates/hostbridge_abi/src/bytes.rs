//! Bounds-checked views over raw boundary buffers.
//!
//! Layout reads and writes never touch memory through raw offsets. A caller
//! pointer is turned into a slice once, at the entry point, and everything
//! after that is an indexed access that can fail with [`OutOfBounds`].

use hostbridge_symbol::{PrimitiveKind, TypeShape};
use thiserror::Error;

use crate::bool32::Bool32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("access of {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
pub struct OutOfBounds {
    pub offset: usize,
    pub len: usize,
    pub available: usize,
}

fn checked_range(offset: usize, len: usize, available: usize) -> Result<usize, OutOfBounds> {
    offset
        .checked_add(len)
        .filter(|end| *end <= available)
        .ok_or(OutOfBounds {
            offset,
            len,
            available,
        })
}

#[derive(Clone, Copy, Debug)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteView<'a> {
    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], OutOfBounds> {
        let end = checked_range(offset, len, self.bytes.len())?;
        Ok(&self.bytes[offset..end])
    }

    pub fn read<T: Blittable>(&self, offset: usize) -> Result<T, OutOfBounds> {
        self.slice(offset, T::SIZE).map(T::read_bytes)
    }
}

#[derive(Debug)]
pub struct ByteViewMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> ByteViewMut<'a> {
    #[inline]
    pub const fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_view(&self) -> ByteView<'_> {
        ByteView::new(self.bytes)
    }

    pub fn slice_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8], OutOfBounds> {
        let end = checked_range(offset, len, self.bytes.len())?;
        Ok(&mut self.bytes[offset..end])
    }

    pub fn write<T: Blittable>(&mut self, offset: usize, value: T) -> Result<(), OutOfBounds> {
        value.write_bytes(self.slice_mut(offset, T::SIZE)?);
        Ok(())
    }

    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), OutOfBounds> {
        self.slice_mut(offset, bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn fill_zero(&mut self, offset: usize, len: usize) -> Result<(), OutOfBounds> {
        self.slice_mut(offset, len)?.fill(0);
        Ok(())
    }
}

/// Borrows `len` bytes of native memory.
///
/// Returns `None` for a null pointer with a nonzero length.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` bytes for `'a`.
pub unsafe fn borrow_native<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { core::slice::from_raw_parts(ptr, len) })
}

/// # Safety
/// A non-null `ptr` must be valid for reads and writes of `len` bytes for
/// `'a`, with no other live reference to that memory.
pub unsafe fn borrow_native_mut<'a>(ptr: *mut u8, len: usize) -> Option<&'a mut [u8]> {
    if len == 0 {
        return Some(&mut []);
    }
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { core::slice::from_raw_parts_mut(ptr, len) })
}

/// Borrows `count` consecutive `T`s of native memory.
///
/// # Safety
/// A non-null `ptr` must be aligned and valid for reads of `count` values of
/// `T` for `'a`.
pub unsafe fn borrow_native_slice<'a, T>(ptr: *const T, count: usize) -> Option<&'a [T]> {
    if count == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { core::slice::from_raw_parts(ptr, count) })
}

/// A Rust value with a fixed native layout that copies in and out of a byte
/// buffer without interpretation.
pub trait Blittable: Copy {
    const SIZE: usize;

    fn shape() -> TypeShape;

    /// `bytes` is exactly [`Self::SIZE`] long.
    fn write_bytes(self, bytes: &mut [u8]);

    /// `bytes` is exactly [`Self::SIZE`] long.
    fn read_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_blittable_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Blittable for $ty {
                const SIZE: usize = size_of::<$ty>();

                #[inline]
                fn shape() -> TypeShape {
                    TypeShape::Primitive(PrimitiveKind::$kind)
                }

                #[inline]
                fn write_bytes(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn read_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_blittable_primitive! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Blittable for bool {
    const SIZE: usize = 1;

    #[inline]
    fn shape() -> TypeShape {
        TypeShape::Bool
    }

    #[inline]
    fn write_bytes(self, bytes: &mut [u8]) {
        bytes[0] = u8::from(self);
    }

    /// Only the first byte is significant; any nonzero value is true.
    #[inline]
    fn read_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl Blittable for usize {
    const SIZE: usize = size_of::<usize>();

    #[inline]
    fn shape() -> TypeShape {
        TypeShape::Pointer
    }

    #[inline]
    fn write_bytes(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_ne_bytes());
    }

    #[inline]
    fn read_bytes(bytes: &[u8]) -> Self {
        let mut raw = [0u8; size_of::<usize>()];
        raw.copy_from_slice(bytes);
        Self::from_ne_bytes(raw)
    }
}

impl Blittable for Bool32 {
    const SIZE: usize = 4;

    #[inline]
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::U32)
    }

    #[inline]
    fn write_bytes(self, bytes: &mut [u8]) {
        self.0.write_bytes(bytes);
    }

    #[inline]
    fn read_bytes(bytes: &[u8]) -> Self {
        Self(u32::read_bytes(bytes))
    }
}
