use std::fmt;

use hostbridge_symbol::{PrimitiveKind, TypeShape};

/// A managed value as the bridge sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Pointer(usize),
    /// Live object in the handle heap.
    Handle(u64),
    Array {
        element: TypeShape,
        items: Vec<Value>,
    },
    /// Borrowed native window; `data` is never dereferenced by the bridge.
    View {
        element: TypeShape,
        data: usize,
        count: i32,
    },
    Struct {
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    /// The zero value a field of `shape` starts with.
    pub fn default_for(shape: &TypeShape) -> Self {
        match shape {
            TypeShape::Void | TypeShape::String | TypeShape::Handle | TypeShape::Array(_) => {
                Self::Null
            }
            TypeShape::Bool => Self::Bool(false),
            TypeShape::Primitive(kind) => match kind {
                PrimitiveKind::I8 => Self::I8(0),
                PrimitiveKind::U8 => Self::U8(0),
                PrimitiveKind::I16 => Self::I16(0),
                PrimitiveKind::U16 => Self::U16(0),
                PrimitiveKind::I32 => Self::I32(0),
                PrimitiveKind::U32 => Self::U32(0),
                PrimitiveKind::I64 => Self::I64(0),
                PrimitiveKind::U64 => Self::U64(0),
                PrimitiveKind::F32 => Self::F32(0.0),
                PrimitiveKind::F64 => Self::F64(0.0),
            },
            TypeShape::Pointer => Self::Pointer(0),
            TypeShape::View(element) => Self::View {
                element: (**element).clone(),
                data: 0,
                count: 0,
            },
            TypeShape::Struct(layout) => Self::Struct {
                fields: layout
                    .fields
                    .iter()
                    .map(|field| (field.name.clone(), Self::default_for(&field.shape)))
                    .collect(),
            },
        }
    }

    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::I8(_) => Some(PrimitiveKind::I8),
            Self::U8(_) => Some(PrimitiveKind::U8),
            Self::I16(_) => Some(PrimitiveKind::I16),
            Self::U16(_) => Some(PrimitiveKind::U16),
            Self::I32(_) => Some(PrimitiveKind::I32),
            Self::U32(_) => Some(PrimitiveKind::U32),
            Self::I64(_) => Some(PrimitiveKind::I64),
            Self::U64(_) => Some(PrimitiveKind::U64),
            Self::F32(_) => Some(PrimitiveKind::F32),
            Self::F64(_) => Some(PrimitiveKind::F64),
            _ => None,
        }
    }

    /// Whether this value can be laid out as `shape`.
    pub fn conforms_to(&self, shape: &TypeShape) -> bool {
        match (self, shape) {
            (Self::Null, TypeShape::Void | TypeShape::String | TypeShape::Pointer)
            | (Self::Null, TypeShape::Handle | TypeShape::Array(_))
            | (Self::Bool(_), TypeShape::Bool)
            | (Self::String(_), TypeShape::String)
            | (Self::Pointer(_), TypeShape::Pointer)
            | (Self::Handle(_), TypeShape::Handle) => true,
            (Self::Array { element, items }, TypeShape::Array(expected)) => {
                element == &**expected && items.iter().all(|item| item.conforms_to(expected))
            }
            (Self::View { element, .. }, TypeShape::View(expected)) => element == &**expected,
            (Self::Struct { fields }, TypeShape::Struct(layout)) => {
                fields.len() == layout.fields.len()
                    && fields.iter().zip(&layout.fields).all(|((name, value), field)| {
                        name == &field.name && value.conforms_to(&field.shape)
                    })
            }
            (value, TypeShape::Primitive(kind)) => value.primitive_kind() == Some(*kind),
            _ => false,
        }
    }

    pub const fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::U8(_) => "u8",
            Self::I16(_) => "i16",
            Self::U16(_) => "u16",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Pointer(_) => "pointer",
            Self::Handle(_) => "handle",
            Self::Array { .. } => "array",
            Self::View { .. } => "view",
            Self::Struct { .. } => "struct",
        }
    }

    /// Field lookup on struct values.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct { fields } => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Struct { fields } => fields
                .iter_mut()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::I8(value) => write!(f, "{value}"),
            Self::U8(value) => write!(f, "{value}"),
            Self::I16(value) => write!(f, "{value}"),
            Self::U16(value) => write!(f, "{value}"),
            Self::I32(value) => write!(f, "{value}"),
            Self::U32(value) => write!(f, "{value}"),
            Self::I64(value) => write!(f, "{value}"),
            Self::U64(value) => write!(f, "{value}"),
            Self::F32(value) => write!(f, "{value}"),
            Self::F64(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Pointer(value) => write!(f, "{value:#x}"),
            Self::Handle(value) => write!(f, "#{value}"),
            Self::Array { items, .. } => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::View { element, data, count } => {
                write!(f, "view<{element}>({data:#x}, {count})")
            }
            Self::Struct { fields } => {
                write!(f, "{{")?;
                for (idx, (name, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
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

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hostbridge_symbol::StructLayout;

    use super::*;

    #[test]
    fn test_default_struct() {
        let layout = StructLayout::sequential([
            ("count", TypeShape::Primitive(PrimitiveKind::I32)),
            ("label", TypeShape::String),
        ]);
        let value = Value::default_for(&TypeShape::Struct(Arc::new(layout)));
        assert_eq!(value.field("count"), Some(&Value::I32(0)));
        assert_eq!(value.field("label"), Some(&Value::Null));
    }

    #[test]
    fn test_conformance_is_strict_on_primitive_kind() {
        let shape = TypeShape::Primitive(PrimitiveKind::I64);
        assert!(Value::I64(1).conforms_to(&shape));
        assert!(!Value::I32(1).conforms_to(&shape));
        assert!(Value::Null.conforms_to(&TypeShape::String));
        assert!(!Value::Null.conforms_to(&TypeShape::Bool));
    }

    #[test]
    fn test_array_conformance_checks_items() {
        let shape = TypeShape::Array(Box::new(TypeShape::String));
        let good = Value::Array {
            element: TypeShape::String,
            items: vec![Value::from("a"), Value::Null],
        };
        let bad = Value::Array {
            element: TypeShape::String,
            items: vec![Value::I32(3)],
        };
        assert!(good.conforms_to(&shape));
        assert!(!bad.conforms_to(&shape));
    }

    #[test]
    fn test_display() {
        let value = Value::Struct {
            fields: vec![("x".into(), Value::I32(1)), ("name".into(), "a".into())],
        };
        assert_eq!(value.to_string(), "{x: 1, name: \"a\"}");
    }
}
