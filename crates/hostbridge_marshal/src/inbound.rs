use hostbridge_abi::{ByteView, NativeArray, NativeString};
use hostbridge_symbol::{PrimitiveKind, TypeShape};
use hostbridge_ty::Value;

use crate::error::MarshalError;

/// Materializes a value of `shape` from the native bytes in `source`.
///
/// Pointers and handles are taken as-is without touching the pointee.
/// Strings and arrays are copied out of the memory their descriptors point
/// at; views keep pointing at it. A void shape reads as `Value::Null`.
///
/// # Safety
/// Every string and array descriptor inside `source` must be null or point
/// at memory readable for the length it states.
pub unsafe fn read_inbound(source: &[u8], shape: &TypeShape) -> Result<Value, MarshalError> {
    unsafe { read_at(&ByteView::new(source), 0, shape) }
}

unsafe fn read_at(view: &ByteView<'_>, offset: usize, shape: &TypeShape) -> Result<Value, MarshalError> {
    let value = match shape {
        TypeShape::Void => Value::Null,
        TypeShape::Pointer => Value::Pointer(view.read::<usize>(offset)?),
        TypeShape::Handle => match view.read::<usize>(offset)? {
            0 => Value::Null,
            handle => Value::Handle(handle as u64),
        },
        TypeShape::Bool => Value::Bool(view.read::<bool>(offset)?),
        TypeShape::String => {
            let string = NativeString::read_from(view, offset)?;
            unsafe { string.to_string_lossy() }.map_or(Value::Null, Value::String)
        }
        TypeShape::Array(element) => unsafe { read_array(view, offset, element)? },
        TypeShape::View(element) => {
            let array = NativeArray::read_from(view, offset)?;
            Value::View {
                element: (**element).clone(),
                data: array.data as usize,
                count: array.length,
            }
        }
        TypeShape::Primitive(kind) => read_primitive(view, offset, *kind)?,
        TypeShape::Struct(layout) => {
            view.slice(offset, layout.size)?;
            let fields = layout
                .fields
                .iter()
                .map(|field| {
                    let value = unsafe { read_at(view, offset + field.offset, &field.shape)? };
                    Ok((field.name.clone(), value))
                })
                .collect::<Result<Vec<_>, MarshalError>>()?;
            Value::Struct { fields }
        }
    };
    Ok(value)
}

unsafe fn read_array(
    view: &ByteView<'_>,
    offset: usize,
    element: &TypeShape,
) -> Result<Value, MarshalError> {
    let array = NativeArray::read_from(view, offset)?;
    if array.length < 0 {
        return Err(MarshalError::NegativeLength(array.length));
    }
    if array.length > 0 && array.data.is_null() {
        return Err(MarshalError::NullArrayData {
            count: array.length,
        });
    }

    let size = element.size();
    let bytes = unsafe { array.bytes(size) }.ok_or(MarshalError::TooManyElements {
        count: array.len(),
    })?;
    let elements = ByteView::new(bytes);
    let items = (0..array.len())
        .map(|idx| unsafe { read_at(&elements, idx * size, element) })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array {
        element: element.clone(),
        items,
    })
}

fn read_primitive(view: &ByteView<'_>, offset: usize, kind: PrimitiveKind) -> Result<Value, MarshalError> {
    let value = match kind {
        PrimitiveKind::I8 => Value::I8(view.read(offset)?),
        PrimitiveKind::U8 => Value::U8(view.read(offset)?),
        PrimitiveKind::I16 => Value::I16(view.read(offset)?),
        PrimitiveKind::U16 => Value::U16(view.read(offset)?),
        PrimitiveKind::I32 => Value::I32(view.read(offset)?),
        PrimitiveKind::U32 => Value::U32(view.read(offset)?),
        PrimitiveKind::I64 => Value::I64(view.read(offset)?),
        PrimitiveKind::U64 => Value::U64(view.read(offset)?),
        PrimitiveKind::F32 => Value::F32(view.read(offset)?),
        PrimitiveKind::F64 => Value::F64(view.read(offset)?),
    };
    Ok(value)
}
