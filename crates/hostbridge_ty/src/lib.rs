//! Managed type model: registered types, their members and shapes, the
//! value representation and the subtype relation.

pub mod access;
pub mod assignability;
pub mod builder;
pub mod corelib;
pub mod directory;
pub mod error;
pub mod providers;
pub mod value;

use hostbridge_abi::TypeHandle;
use hostbridge_symbol::{Symbol, TypeShape};

pub use access::MemberAccess;
pub use builder::TypeBuilder;
pub use directory::TypeDirectory;
pub use error::TypeError;
pub use providers::TypeProvider;
pub use value::Value;

/// Name of constructor methods.
pub const CONSTRUCTOR: &str = ".ctor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Primitive,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    pub name: String,
    pub variance: Variance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericInstance {
    pub definition: Symbol,
    pub arguments: Vec<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: Symbol,
    pub shape: TypeShape,
    pub access: MemberAccess,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub parameter_type: Symbol,
    pub shape: TypeShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: String,
    pub access: MemberAccess,
    pub is_static: bool,
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Option<Symbol>,
    pub return_shape: TypeShape,
}

impl MethodInfo {
    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    fn same_signature(&self, other: &Self) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.parameter_type == b.parameter_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub handle: TypeHandle,
    pub name: Symbol,
    pub assembly: String,
    pub kind: TypeKind,
    pub base: Option<Symbol>,
    pub interfaces: Vec<Symbol>,
    /// Element type of array types.
    pub element: Option<Symbol>,
    /// Parameters of an open generic definition.
    pub generic_params: Vec<GenericParam>,
    pub generic_instance: Option<GenericInstance>,
    /// Shape of a value of this type when stored in a field or parameter.
    pub shape: TypeShape,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl TypeInfo {
    #[inline]
    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Primitive)
    }

    #[inline]
    pub fn is_reference_type(&self) -> bool {
        !self.is_value_type()
    }

    #[inline]
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params.is_empty()
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter().filter(|method| method.is_constructor())
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn assembly_qualified_name(&self) -> String {
        format!("{}, {}", self.name, self.assembly)
    }
}
