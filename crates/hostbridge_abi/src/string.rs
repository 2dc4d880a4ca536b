use core::ffi::c_char;
use core::ptr;

use hostbridge_symbol::{POINTER_SIZE, STRING_DESCRIPTOR_SIZE};

use crate::alloc::{self, AllocError};
use crate::bytes::{ByteView, ByteViewMut, OutOfBounds, borrow_native};

/// UTF-8 text with an explicit length.
///
/// `data == null` is the null string, distinct from an allocated empty one.
/// Strings the bridge produces are NUL terminated and owned by the receiver,
/// who gives them back through `hostbridge_native_string_free`.
#[repr(C)]
#[derive(Debug)]
pub struct NativeString {
    pub data: *mut c_char,
    pub len: usize,
}

const _: () = assert!(size_of::<NativeString>() == STRING_DESCRIPTOR_SIZE);

impl Default for NativeString {
    fn default() -> Self {
        Self::null()
    }
}

impl NativeString {
    #[inline]
    pub const fn null() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn new(text: &str) -> Result<Self, AllocError> {
        let len = text.len();
        let size = len.checked_add(1).ok_or(AllocError { size: usize::MAX })?;
        let data = alloc::allocate_zeroed(size)?;
        // SAFETY: `data` is a fresh allocation of `len + 1` bytes; the
        // trailing byte stays zero.
        unsafe { ptr::copy_nonoverlapping(text.as_ptr(), data.as_ptr(), len) };
        Ok(Self {
            data: data.as_ptr().cast(),
            len,
        })
    }

    pub fn from_option(text: Option<&str>) -> Result<Self, AllocError> {
        text.map_or_else(|| Ok(Self::null()), Self::new)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.data.is_null()
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// # Safety
    /// A non-null descriptor must point at `len` readable bytes that outlive
    /// the returned slice.
    pub unsafe fn as_bytes(&self) -> Option<&[u8]> {
        if self.is_null() {
            return None;
        }
        unsafe { borrow_native(self.data.cast_const().cast(), self.len) }
    }

    /// Copies the text out. Invalid UTF-8 is replaced, interior NULs kept.
    ///
    /// # Safety
    /// Same contract as [`NativeString::as_bytes`].
    pub unsafe fn to_string_lossy(&self) -> Option<String> {
        unsafe { self.as_bytes() }.map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Frees the text and nulls the descriptor. Releasing a null descriptor
    /// does nothing.
    ///
    /// # Safety
    /// A non-null descriptor must have been produced by [`NativeString::new`]
    /// and not released through another copy.
    pub unsafe fn release(&mut self) {
        if !self.data.is_null() {
            unsafe { alloc::release(self.data.cast()) };
        }
        *self = Self::null();
    }

    pub fn write_to(&self, view: &mut ByteViewMut<'_>, offset: usize) -> Result<(), OutOfBounds> {
        view.slice_mut(offset, STRING_DESCRIPTOR_SIZE)?;
        view.write(offset, self.data as usize)?;
        view.write(offset + POINTER_SIZE, self.len)
    }

    pub fn read_from(view: &ByteView<'_>, offset: usize) -> Result<Self, OutOfBounds> {
        view.slice(offset, STRING_DESCRIPTOR_SIZE)?;
        let data = view.read::<usize>(offset)?;
        let len = view.read::<usize>(offset + POINTER_SIZE)?;
        Ok(Self {
            data: data as *mut c_char,
            len,
        })
    }
}
