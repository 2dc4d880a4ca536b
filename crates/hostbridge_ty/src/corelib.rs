//! The core library every directory starts with.

use hostbridge_symbol::{PrimitiveKind, TypeShape};
use tracing::error;

use crate::directory::TypeDirectory;
use crate::providers::TypeProvider;
use crate::{MemberAccess, TypeBuilder, Variance};

pub const CORE_ASSEMBLY: &str = "System.Private.CoreLib";
pub const INTEROP_ASSEMBLY: &str = "Hostbridge.Interop";

pub const OBJECT: &str = "System.Object";
pub const VALUE_TYPE: &str = "System.ValueType";
pub const STRING: &str = "System.String";
pub const ARRAY: &str = "System.Array";
pub const VOID: &str = "System.Void";
pub const BOOLEAN: &str = "System.Boolean";
pub const CHAR: &str = "System.Char";
pub const SBYTE: &str = "System.SByte";
pub const BYTE: &str = "System.Byte";
pub const INT16: &str = "System.Int16";
pub const UINT16: &str = "System.UInt16";
pub const INT32: &str = "System.Int32";
pub const UINT32: &str = "System.UInt32";
pub const INT64: &str = "System.Int64";
pub const UINT64: &str = "System.UInt64";
pub const SINGLE: &str = "System.Single";
pub const DOUBLE: &str = "System.Double";
pub const INTPTR: &str = "System.IntPtr";
pub const UINTPTR: &str = "System.UIntPtr";

/// Borrowed `{ data, count }` window over native elements.
pub const NATIVE_ARRAY: &str = "Hostbridge.Interop.NativeArray`1";

pub const ENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";
pub const COMPARER: &str = "System.Collections.Generic.IComparer`1";
pub const LIST: &str = "System.Collections.Generic.IList`1";

pub(crate) static BUILTIN_PROVIDERS: &[TypeProvider] = &[
    TypeProvider {
        namespace: "System",
        autoload: true,
        register: register_system,
    },
    TypeProvider {
        namespace: "System.Collections.Generic",
        autoload: false,
        register: register_generic_collections,
    },
    TypeProvider {
        namespace: "Hostbridge.Interop",
        autoload: false,
        register: register_interop,
    },
];

fn define_all(directory: &TypeDirectory, builders: impl IntoIterator<Item = TypeBuilder>) {
    for builder in builders {
        let name = builder.name().clone();
        if let Err(err) = directory.define(builder) {
            error!(ty = %name, "failed to register core type: {err}");
        }
    }
}

fn register_system(directory: &TypeDirectory) {
    let primitives = [
        (VOID, TypeShape::Void),
        (BOOLEAN, TypeShape::Bool),
        (CHAR, TypeShape::Primitive(PrimitiveKind::U16)),
        (SBYTE, TypeShape::Primitive(PrimitiveKind::I8)),
        (BYTE, TypeShape::Primitive(PrimitiveKind::U8)),
        (INT16, TypeShape::Primitive(PrimitiveKind::I16)),
        (UINT16, TypeShape::Primitive(PrimitiveKind::U16)),
        (INT32, TypeShape::Primitive(PrimitiveKind::I32)),
        (UINT32, TypeShape::Primitive(PrimitiveKind::U32)),
        (INT64, TypeShape::Primitive(PrimitiveKind::I64)),
        (UINT64, TypeShape::Primitive(PrimitiveKind::U64)),
        (SINGLE, TypeShape::Primitive(PrimitiveKind::F32)),
        (DOUBLE, TypeShape::Primitive(PrimitiveKind::F64)),
        (INTPTR, TypeShape::Pointer),
        (UINTPTR, TypeShape::Pointer),
    ];
    define_all(
        directory,
        primitives
            .into_iter()
            .map(|(name, shape)| TypeBuilder::primitive(name, shape).assembly(CORE_ASSEMBLY)),
    );

    // Object goes last: its members refer to the types above.
    define_all(
        directory,
        [
            TypeBuilder::class(STRING)
                .shape(TypeShape::String)
                .method("get_Length", &[], Some(INT32)),
            TypeBuilder::class(VALUE_TYPE),
            TypeBuilder::class(ARRAY).method("get_Length", &[], Some(INT32)),
            TypeBuilder::class(OBJECT)
                .constructor(&[])
                .method("ToString", &[], Some(STRING))
                .method("Equals", &[("obj", OBJECT)], Some(BOOLEAN))
                .method("GetHashCode", &[], Some(INT32))
                .method_with("Finalize", MemberAccess::Family, false, &[], None)
                .method_with("MemberwiseClone", MemberAccess::Family, false, &[], Some(OBJECT)),
        ]
        .into_iter()
        .map(|builder| builder.assembly(CORE_ASSEMBLY)),
    );
}

fn register_generic_collections(directory: &TypeDirectory) {
    define_all(
        directory,
        [
            TypeBuilder::interface(ENUMERABLE).generic_param("T", Variance::Covariant),
            TypeBuilder::interface(COMPARER)
                .generic_param("T", Variance::Contravariant)
                .method("Compare", &[("x", "T"), ("y", "T")], Some(INT32)),
            TypeBuilder::interface(LIST)
                .generic_param("T", Variance::Invariant)
                .implements("System.Collections.Generic.IEnumerable`1[[T]]")
                .method("get_Count", &[], Some(INT32))
                .method("get_Item", &[("index", INT32)], Some("T")),
        ]
        .into_iter()
        .map(|builder| builder.assembly(CORE_ASSEMBLY)),
    );
}

fn register_interop(directory: &TypeDirectory) {
    define_all(
        directory,
        [TypeBuilder::value_type(NATIVE_ARRAY)
            .generic_param("T", Variance::Invariant)
            .shape(TypeShape::View(Box::new(TypeShape::Void)))
            .assembly(INTEROP_ASSEMBLY)],
    );
}
