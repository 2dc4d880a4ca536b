use core::ffi::c_void;

use hostbridge_abi::{ByteViewMut, NativeArray, NativeString, alloc};
use hostbridge_symbol::{PrimitiveKind, StructLayout, TypeShape};
use hostbridge_ty::Value;
use tracing::trace;

use crate::error::MarshalError;
use crate::release::{owns_memory, release_at};

fn mismatch(value: &Value, shape: &TypeShape) -> MarshalError {
    MarshalError::Mismatch {
        value: value.type_label(),
        shape: shape.to_string(),
    }
}

/// Writes `value` into `destination` using the native layout of `shape`.
///
/// `destination` must hold at least `shape.size()` bytes. Arrays and strings
/// are allocated natively and become owned by whoever owns `destination`.
/// On error nothing allocated by this call survives and a void shape writes
/// nothing.
pub fn write_outbound(
    value: &Value,
    shape: &TypeShape,
    destination: &mut [u8],
) -> Result<(), MarshalError> {
    if shape.is_void() {
        return Ok(());
    }
    let mut view = ByteViewMut::new(destination);
    view.slice_mut(0, shape.size())?;
    write_at(value, shape, &mut view, 0)
}

fn write_at(
    value: &Value,
    shape: &TypeShape,
    view: &mut ByteViewMut<'_>,
    offset: usize,
) -> Result<(), MarshalError> {
    match (shape, value) {
        (TypeShape::Void, _) => Ok(()),
        (TypeShape::Array(element), _) => write_array(value, element, view, offset),
        (TypeShape::String, Value::Null) => Ok(NativeString::null().write_to(view, offset)?),
        (TypeShape::String, Value::String(text)) => {
            let mut string = NativeString::new(text)?;
            string.write_to(view, offset).map_err(|err| {
                // SAFETY: allocated just above and never published.
                unsafe { string.release() };
                MarshalError::from(err)
            })
        }
        (TypeShape::Pointer, Value::Null) => Ok(view.write(offset, 0usize)?),
        (TypeShape::Pointer, Value::Pointer(address)) => Ok(view.write(offset, *address)?),
        (TypeShape::View(expected), Value::View { element, data, count }) if element == &**expected => {
            Ok(NativeArray::from_raw_parts(*data as *mut c_void, *count).write_to(view, offset)?)
        }
        (TypeShape::View(_), Value::Null) => Ok(NativeArray::empty().write_to(view, offset)?),
        (TypeShape::Bool, Value::Bool(flag)) => Ok(view.write(offset, *flag)?),
        (TypeShape::Primitive(kind), _) => write_primitive(value, *kind, shape, view, offset),
        (TypeShape::Handle, Value::Null) => Ok(view.write(offset, 0usize)?),
        (TypeShape::Handle, Value::Handle(handle)) => {
            let handle = usize::try_from(*handle).map_err(|_| mismatch(value, shape))?;
            Ok(view.write(offset, handle)?)
        }
        (TypeShape::Struct(layout), Value::Struct { fields }) => {
            write_struct(fields, layout, view, offset)
        }
        _ => Err(mismatch(value, shape)),
    }
}

fn write_primitive(
    value: &Value,
    kind: PrimitiveKind,
    shape: &TypeShape,
    view: &mut ByteViewMut<'_>,
    offset: usize,
) -> Result<(), MarshalError> {
    if value.primitive_kind() != Some(kind) {
        return Err(mismatch(value, shape));
    }
    match *value {
        Value::I8(v) => view.write(offset, v)?,
        Value::U8(v) => view.write(offset, v)?,
        Value::I16(v) => view.write(offset, v)?,
        Value::U16(v) => view.write(offset, v)?,
        Value::I32(v) => view.write(offset, v)?,
        Value::U32(v) => view.write(offset, v)?,
        Value::I64(v) => view.write(offset, v)?,
        Value::U64(v) => view.write(offset, v)?,
        Value::F32(v) => view.write(offset, v)?,
        Value::F64(v) => view.write(offset, v)?,
        _ => return Err(mismatch(value, shape)),
    }
    Ok(())
}

fn write_struct(
    fields: &[(String, Value)],
    layout: &StructLayout,
    view: &mut ByteViewMut<'_>,
    offset: usize,
) -> Result<(), MarshalError> {
    view.fill_zero(offset, layout.size)?;
    for (idx, field) in layout.fields.iter().enumerate() {
        let result = fields
            .iter()
            .find(|(name, _)| name == &field.name)
            .ok_or_else(|| MarshalError::MissingField(field.name.clone()))
            .and_then(|(_, value)| write_at(value, &field.shape, view, offset + field.offset));
        if let Err(err) = result {
            for written in &layout.fields[..idx] {
                // SAFETY: every earlier field was written by this call.
                unsafe { release_at(view, offset + written.offset, &written.shape) };
            }
            return Err(err);
        }
    }
    Ok(())
}

fn write_array(
    value: &Value,
    element: &TypeShape,
    view: &mut ByteViewMut<'_>,
    offset: usize,
) -> Result<(), MarshalError> {
    let items = match value {
        Value::Null => return Ok(NativeArray::empty().write_to(view, offset)?),
        Value::Array {
            element: declared,
            items,
        } if declared == element => items,
        _ => return Err(mismatch(value, &TypeShape::Array(Box::new(element.clone())))),
    };
    if items.is_empty() {
        return Ok(NativeArray::empty().write_to(view, offset)?);
    }

    let too_many = || MarshalError::TooManyElements { count: items.len() };
    let count = i32::try_from(items.len()).map_err(|_| too_many())?;
    let size = element.size();
    let total = size.checked_mul(items.len()).ok_or_else(too_many)?;
    let data = alloc::allocate_zeroed(total)?;
    trace!(count, %element, bytes = total, "allocated native array");

    let release_all = |written: usize| {
        // SAFETY: `data` holds `total` bytes allocated above, of which the
        // first `written` elements were filled by this call.
        unsafe {
            if owns_memory(element) {
                let bytes = core::slice::from_raw_parts_mut(data.as_ptr(), total);
                let mut elements = ByteViewMut::new(bytes);
                for idx in 0..written {
                    release_at(&mut elements, idx * size, element);
                }
            }
            alloc::release(data.as_ptr());
        }
    };

    for (idx, item) in items.iter().enumerate() {
        // SAFETY: `data` is a live allocation of `total` bytes owned by this
        // call; the slice is dropped before the buffer is released.
        let bytes = unsafe { core::slice::from_raw_parts_mut(data.as_ptr(), total) };
        if let Err(err) = write_at(item, element, &mut ByteViewMut::new(bytes), idx * size) {
            release_all(idx);
            return Err(err);
        }
    }

    let array = NativeArray::from_raw_parts(data.as_ptr().cast(), count);
    array.write_to(view, offset).map_err(|err| {
        release_all(items.len());
        MarshalError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hostbridge_abi::ByteView;
    use hostbridge_symbol::{ARRAY_DESCRIPTOR_SIZE, STRING_DESCRIPTOR_SIZE};

    use super::*;
    use crate::inbound::read_inbound;
    use crate::release::release_outbound;

    fn i32_shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::I32)
    }

    #[test]
    fn test_void_writes_nothing() {
        let mut buffer = [0xAAu8; 4];
        write_outbound(&Value::I32(1), &TypeShape::Void, &mut buffer).unwrap();
        assert_eq!(buffer, [0xAA; 4]);
    }

    #[test]
    fn test_short_destination() {
        let mut buffer = [0u8; 2];
        let err = write_outbound(&Value::I32(1), &i32_shape(), &mut buffer).unwrap_err();
        assert!(matches!(err, MarshalError::OutOfBounds(_)));
    }

    #[test]
    fn test_primitive_kind_is_strict() {
        let mut buffer = [0u8; 8];
        assert!(matches!(
            write_outbound(&Value::I64(1), &i32_shape(), &mut buffer),
            Err(MarshalError::Mismatch { value: "i64", .. })
        ));
    }

    #[test]
    fn test_bool_writes_one_byte() {
        let mut buffer = [0xFFu8; 4];
        write_outbound(&Value::Bool(true), &TypeShape::Bool, &mut buffer).unwrap();
        assert_eq!(buffer, [1, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_null_string_and_empty_array() {
        let mut buffer = [0xFFu8; STRING_DESCRIPTOR_SIZE];
        write_outbound(&Value::Null, &TypeShape::String, &mut buffer).unwrap();
        assert!(buffer.iter().all(|byte| *byte == 0));

        let shape = TypeShape::Array(Box::new(i32_shape()));
        let mut buffer = [0xFFu8; ARRAY_DESCRIPTOR_SIZE];
        let empty = Value::Array {
            element: i32_shape(),
            items: Vec::new(),
        };
        write_outbound(&empty, &shape, &mut buffer).unwrap();
        let array = NativeArray::read_from(&ByteView::new(&buffer), 0).unwrap();
        assert!(array.data.is_null());
        assert_eq!(array.length, 0);
    }

    #[test]
    fn test_array_elements_in_index_order() {
        let shape = TypeShape::Array(Box::new(i32_shape()));
        let value = Value::Array {
            element: i32_shape(),
            items: vec![Value::I32(10), Value::I32(20), Value::I32(30)],
        };
        let mut buffer = [0u8; ARRAY_DESCRIPTOR_SIZE];
        write_outbound(&value, &shape, &mut buffer).unwrap();

        let array = NativeArray::read_from(&ByteView::new(&buffer), 0).unwrap();
        assert_eq!(array.length, 3);
        let bytes = unsafe { array.bytes(4) }.unwrap();
        let elements = ByteView::new(bytes);
        assert_eq!(elements.read::<i32>(4).unwrap(), 20);
        assert_eq!(elements.read::<i32>(8).unwrap(), 30);
        unsafe { release_outbound(&mut buffer, &shape) };
    }

    #[test]
    fn test_failed_element_leaves_destination_untouched() {
        let shape = TypeShape::Array(Box::new(TypeShape::String));
        let value = Value::Array {
            element: TypeShape::String,
            items: vec![Value::from("ok"), Value::I32(3)],
        };
        let mut buffer = [0x5Au8; ARRAY_DESCRIPTOR_SIZE];
        assert!(write_outbound(&value, &shape, &mut buffer).is_err());
        assert_eq!(buffer, [0x5A; ARRAY_DESCRIPTOR_SIZE]);
    }

    #[test]
    fn test_struct_padding_is_zeroed() {
        let layout = Arc::new(StructLayout::sequential([
            ("flag", TypeShape::Bool),
            ("value", i32_shape()),
        ]));
        let shape = TypeShape::Struct(Arc::clone(&layout));
        let value = Value::Struct {
            fields: vec![("flag".into(), Value::Bool(true)), ("value".into(), Value::I32(-1))],
        };
        let mut buffer = [0xEEu8; 8];
        write_outbound(&value, &shape, &mut buffer).unwrap();
        assert_eq!(&buffer[..4], &[1, 0, 0, 0]);
        assert_eq!(unsafe { read_inbound(&buffer, &shape) }.unwrap(), value);
    }

    #[test]
    fn test_struct_missing_field() {
        let layout = Arc::new(StructLayout::sequential([
            ("name", TypeShape::String),
            ("id", i32_shape()),
        ]));
        let value = Value::Struct {
            fields: vec![("name".into(), "x".into())],
        };
        let mut buffer = [0u8; 32];
        assert_eq!(
            write_outbound(&value, &TypeShape::Struct(layout), &mut buffer),
            Err(MarshalError::MissingField("id".into()))
        );
    }

    #[test]
    fn test_view_is_not_copied() {
        let backing = [1i32, 2, 3];
        let value = Value::View {
            element: i32_shape(),
            data: backing.as_ptr() as usize,
            count: 3,
        };
        let shape = TypeShape::View(Box::new(i32_shape()));
        let mut buffer = [0u8; ARRAY_DESCRIPTOR_SIZE];
        write_outbound(&value, &shape, &mut buffer).unwrap();
        let array = NativeArray::read_from(&ByteView::new(&buffer), 0).unwrap();
        assert_eq!(array.data as usize, backing.as_ptr() as usize);
        assert_eq!(array.length, 3);
    }

    #[test]
    fn test_pointer_and_handle() {
        let mut buffer = [0xFFu8; 8];
        write_outbound(&Value::Null, &TypeShape::Pointer, &mut buffer).unwrap();
        assert!(buffer[..size_of::<usize>()].iter().all(|b| *b == 0));
        write_outbound(&Value::Handle(42), &TypeShape::Handle, &mut buffer).unwrap();
        assert_eq!(
            ByteView::new(&buffer).read::<usize>(0).unwrap(),
            42
        );
    }
}
