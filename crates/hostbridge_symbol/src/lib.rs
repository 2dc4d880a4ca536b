pub mod shape;
pub mod symbol;

pub use shape::{
    ARRAY_DESCRIPTOR_SIZE, FieldLayout, POINTER_SIZE, PrimitiveKind, STRING_DESCRIPTOR_SIZE,
    StructLayout, TypeShape,
};
pub use symbol::Symbol;
