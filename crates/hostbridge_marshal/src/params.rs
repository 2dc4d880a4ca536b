use hostbridge_abi::bytes::{borrow_native, borrow_native_slice};
use hostbridge_ty::{MethodInfo, Value};
use tracing::debug;

use crate::error::MarshalError;
use crate::inbound::read_inbound;

/// Reads `count` arguments for `method` from a buffer of pointers, one per
/// parameter, in positional order.
///
/// No method gives `Ok(None)`. A null buffer counts as zero arguments. A
/// null entry reads as `Value::Null` for its position.
///
/// # Safety
/// A non-null `parameters` must point at `count` pointers, and each non-null
/// entry at a value laid out as the matching parameter's shape.
pub unsafe fn read_parameter_list(
    parameters: *const *const u8,
    count: usize,
    method: Option<&MethodInfo>,
) -> Result<Option<Vec<Value>>, MarshalError> {
    let Some(method) = method else {
        return Ok(None);
    };

    let received = if parameters.is_null() { 0 } else { count };
    if received != method.arity() {
        debug!(method = %method.name, received, "parameter count does not match arity");
        return Err(MarshalError::ArityMismatch {
            expected: method.arity(),
            received,
        });
    }
    if received == 0 {
        return Ok(Some(Vec::new()));
    }

    let pointers = unsafe { borrow_native_slice(parameters, received) }.unwrap_or_default();
    let values = method
        .parameters
        .iter()
        .zip(pointers)
        .map(|(parameter, pointer)| {
            if pointer.is_null() {
                return Ok(Value::Null);
            }
            let source = unsafe { borrow_native(*pointer, parameter.shape.size()) }.unwrap_or_default();
            unsafe { read_inbound(source, &parameter.shape) }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(values))
}
