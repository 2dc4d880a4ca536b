//! Native allocation for memory whose ownership passes to the native side.
//!
//! Everything handed across the boundary comes from the C allocator so the
//! caller can release it with the matching bridge entry point regardless of
//! which Rust allocator this library was built with.

use core::ptr::NonNull;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("native allocation of {size} bytes failed")]
pub struct AllocError {
    pub size: usize,
}

/// Allocates `size` zeroed bytes. Zero-sized requests still return a unique
/// pointer.
pub fn allocate_zeroed(size: usize) -> Result<NonNull<u8>, AllocError> {
    // SAFETY: calloc has no preconditions; a null return is handled below.
    let ptr = unsafe { libc::calloc(1, size.max(1)) };
    NonNull::new(ptr.cast::<u8>()).ok_or(AllocError { size })
}

/// # Safety
/// `ptr` must be null or have come from [`allocate_zeroed`] and not been
/// released yet.
pub unsafe fn release(ptr: *mut u8) {
    if !ptr.is_null() {
        unsafe { libc::free(ptr.cast()) };
    }
}
