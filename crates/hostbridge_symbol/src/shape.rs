use std::fmt;
use std::sync::Arc;

pub const POINTER_SIZE: usize = size_of::<usize>();
/// `{ data: *mut c_char, len: usize }`
pub const STRING_DESCRIPTOR_SIZE: usize = 2 * POINTER_SIZE;
/// `{ data: *mut c_void, length: i32 }` padded to pointer alignment.
pub const ARRAY_DESCRIPTOR_SIZE: usize = round_up(POINTER_SIZE + 4, POINTER_SIZE);

#[inline]
pub const fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Native layout category of a type as it crosses the boundary.
///
/// Shapes are closed: every value the bridge moves is one of these, and the
/// size and alignment of each are fixed per target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Void,
    Bool,
    Primitive(PrimitiveKind),
    String,
    Pointer,
    /// Managed object reference, carried as a pointer-sized handle.
    Handle,
    Array(Box<TypeShape>),
    /// Borrowed `{ data, count }` window over native memory.
    View(Box<TypeShape>),
    Struct(Arc<StructLayout>),
}

impl TypeShape {
    pub fn size(&self) -> usize {
        match self {
            Self::Void => 0,
            Self::Bool => 1,
            Self::Primitive(kind) => kind.size(),
            Self::String => STRING_DESCRIPTOR_SIZE,
            Self::Pointer | Self::Handle => POINTER_SIZE,
            Self::Array(_) | Self::View(_) => ARRAY_DESCRIPTOR_SIZE,
            Self::Struct(layout) => layout.size,
        }
    }

    pub fn align(&self) -> usize {
        match self {
            Self::Void | Self::Bool => 1,
            Self::Primitive(kind) => kind.size(),
            Self::String | Self::Pointer | Self::Handle | Self::Array(_) | Self::View(_) => {
                POINTER_SIZE
            }
            Self::Struct(layout) => layout.align,
        }
    }

    #[inline]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Void => write!(f, "void"),
            TypeShape::Bool => write!(f, "bool"),
            TypeShape::Primitive(kind) => write!(f, "{}", kind.name()),
            TypeShape::String => write!(f, "string"),
            TypeShape::Pointer => write!(f, "pointer"),
            TypeShape::Handle => write!(f, "handle"),
            TypeShape::Array(element) => write!(f, "{element}[]"),
            TypeShape::View(element) => write!(f, "view<{element}>"),
            TypeShape::Struct(layout) => {
                write!(f, "struct {{")?;
                for (idx, field) in layout.fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.shape)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldLayout {
    pub name: String,
    pub shape: TypeShape,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructLayout {
    pub fields: Vec<FieldLayout>,
    pub size: usize,
    pub align: usize,
}

impl StructLayout {
    /// Lays fields out in declaration order with C alignment rules.
    pub fn sequential<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeShape)>,
        S: Into<String>,
    {
        let mut offset = 0usize;
        let mut align = 1usize;
        let fields = fields
            .into_iter()
            .map(|(name, shape)| {
                let field_align = shape.align();
                offset = round_up(offset, field_align);
                align = align.max(field_align);
                let field = FieldLayout {
                    name: name.into(),
                    offset,
                    shape,
                };
                offset += field.shape.size();
                field
            })
            .collect::<Vec<_>>();

        // Empty structs still occupy one byte.
        let size = round_up(offset, align).max(1);
        Self {
            fields,
            size,
            align,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_sizes() {
        assert_eq!(TypeShape::String.size(), 2 * POINTER_SIZE);
        assert_eq!(TypeShape::Bool.size(), 1);
        assert_eq!(TypeShape::Void.size(), 0);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            TypeShape::Array(Box::new(TypeShape::Primitive(PrimitiveKind::I32))).size(),
            16
        );
    }

    #[test]
    fn test_sequential_layout_padding() {
        let layout = StructLayout::sequential([
            ("flag", TypeShape::Bool),
            ("value", TypeShape::Primitive(PrimitiveKind::I32)),
            ("small", TypeShape::Primitive(PrimitiveKind::U8)),
        ]);
        let offsets = layout
            .fields
            .iter()
            .map(|field| field.offset)
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 4, 8]);
        assert_eq!(layout.size, 12);
        assert_eq!(layout.align, 4);
    }

    #[test]
    fn test_nested_struct_alignment() {
        let inner = Arc::new(StructLayout::sequential([
            ("x", TypeShape::Primitive(PrimitiveKind::F64)),
        ]));
        let outer = StructLayout::sequential([
            ("tag", TypeShape::Primitive(PrimitiveKind::U8)),
            ("inner", TypeShape::Struct(inner)),
        ]);
        assert_eq!(outer.field("inner").map(|f| f.offset), Some(8));
        assert_eq!(outer.size, 16);
    }

    #[test]
    fn test_empty_struct_occupies_one_byte() {
        let layout = StructLayout::sequential(Vec::<(String, TypeShape)>::new());
        assert_eq!(layout.size, 1);
    }

    #[test]
    fn test_display() {
        let shape = TypeShape::Array(Box::new(TypeShape::String));
        assert_eq!(shape.to_string(), "string[]");
        let layout = StructLayout::sequential([("a", TypeShape::Bool)]);
        assert_eq!(
            TypeShape::Struct(Arc::new(layout)).to_string(),
            "struct {a: bool}"
        );
    }
}
