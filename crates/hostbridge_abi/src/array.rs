use core::ffi::c_void;
use core::ptr;

use hostbridge_symbol::ARRAY_DESCRIPTOR_SIZE;

use crate::alloc;
use crate::bytes::{ByteView, ByteViewMut, OutOfBounds, borrow_native};

/// Native-owned buffer of `length` tightly packed element records.
///
/// The empty array is `{ null, 0 }`. Releasing the container frees the
/// element buffer only; strings stored inside elements are released by the
/// marshalling layer, which knows the element shape.
#[repr(C)]
#[derive(Debug)]
pub struct NativeArray {
    pub data: *mut c_void,
    pub length: i32,
}

const _: () = assert!(size_of::<NativeArray>() == ARRAY_DESCRIPTOR_SIZE);

impl Default for NativeArray {
    fn default() -> Self {
        Self::empty()
    }
}

impl NativeArray {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            length: 0,
        }
    }

    #[inline]
    pub const fn from_raw_parts(data: *mut c_void, length: i32) -> Self {
        Self { data, length }
    }

    /// Element count; negative lengths read as zero.
    #[inline]
    pub fn len(&self) -> usize {
        usize::try_from(self.length).unwrap_or(0)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.length <= 0 || self.data.is_null()
    }

    /// The element buffer as bytes, or `None` when the length is nonzero but
    /// the data pointer is null or the byte count overflows.
    ///
    /// # Safety
    /// A non-null `data` must point at `length * element_size` readable
    /// bytes that outlive the returned slice.
    pub unsafe fn bytes(&self, element_size: usize) -> Option<&[u8]> {
        let total = self.len().checked_mul(element_size)?;
        unsafe { borrow_native(self.data.cast_const().cast(), total) }
    }

    /// Frees the element buffer and resets to the empty array.
    ///
    /// # Safety
    /// A non-null `data` must have come from the bridge allocator and not
    /// been released through another copy.
    pub unsafe fn release(&mut self) {
        if !self.data.is_null() {
            unsafe { alloc::release(self.data.cast()) };
        }
        *self = Self::empty();
    }

    pub fn write_to(&self, view: &mut ByteViewMut<'_>, offset: usize) -> Result<(), OutOfBounds> {
        view.fill_zero(offset, ARRAY_DESCRIPTOR_SIZE)?;
        view.write(offset, self.data as usize)?;
        view.write(offset + size_of::<usize>(), self.length)
    }

    pub fn read_from(view: &ByteView<'_>, offset: usize) -> Result<Self, OutOfBounds> {
        view.slice(offset, ARRAY_DESCRIPTOR_SIZE)?;
        let data = view.read::<usize>(offset)?;
        let length = view.read::<i32>(offset + size_of::<usize>())?;
        Ok(Self {
            data: data as *mut c_void,
            length,
        })
    }
}
