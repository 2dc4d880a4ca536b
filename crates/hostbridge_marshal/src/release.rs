use hostbridge_abi::bytes::borrow_native_mut;
use hostbridge_abi::{ByteViewMut, NativeArray, NativeString};
use hostbridge_symbol::TypeShape;

/// Whether values of `shape` own native memory once written out.
pub(crate) fn owns_memory(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::String | TypeShape::Array(_) => true,
        TypeShape::Struct(layout) => layout.fields.iter().any(|field| owns_memory(&field.shape)),
        _ => false,
    }
}

/// Frees everything a previous `write_outbound` of `shape` allocated into
/// `buffer` and nulls the descriptors, so a second release is a no-op.
///
/// # Safety
/// Every non-null string and array descriptor reachable from `buffer` must
/// have been produced by the bridge and not released elsewhere.
pub unsafe fn release_outbound(buffer: &mut [u8], shape: &TypeShape) {
    let mut view = ByteViewMut::new(buffer);
    unsafe { release_at(&mut view, 0, shape) };
}

pub(crate) unsafe fn release_at(view: &mut ByteViewMut<'_>, offset: usize, shape: &TypeShape) {
    match shape {
        TypeShape::String => {
            if let Ok(mut string) = NativeString::read_from(&view.as_view(), offset) {
                unsafe { string.release() };
                let _ = string.write_to(view, offset);
            }
        }
        TypeShape::Array(element) => {
            let Ok(mut array) = NativeArray::read_from(&view.as_view(), offset) else {
                return;
            };
            if owns_memory(element) {
                let size = element.size();
                let total = array.len().saturating_mul(size);
                if let Some(bytes) = unsafe { borrow_native_mut(array.data.cast(), total) } {
                    let mut elements = ByteViewMut::new(bytes);
                    for idx in 0..array.len() {
                        unsafe { release_at(&mut elements, idx * size, element) };
                    }
                }
            }
            unsafe { array.release() };
            let _ = array.write_to(view, offset);
        }
        TypeShape::Struct(layout) => {
            for field in &layout.fields {
                unsafe { release_at(view, offset + field.offset, &field.shape) };
            }
        }
        _ => {}
    }
}
