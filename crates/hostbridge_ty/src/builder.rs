//! Declarative construction of [`TypeInfo`] entries.
//!
//! Member types are named, not shaped: [`TypeDirectory::define`] resolves
//! every member type against the directory and computes the shapes once.

use std::sync::Arc;

use hostbridge_abi::TypeHandle;
use hostbridge_symbol::{StructLayout, Symbol, TypeShape};

use crate::corelib::{OBJECT, VALUE_TYPE, VOID};
use crate::directory::{TypeDirectory, mentions_param};
use crate::{
    CONSTRUCTOR, FieldInfo, GenericParam, MemberAccess, MethodInfo, ParameterInfo, TypeError,
    TypeInfo, TypeKind, Variance,
};

/// Assembly assigned to types that do not name one.
pub const DEFAULT_ASSEMBLY: &str = "Hostbridge.Dynamic";

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    field_type: Symbol,
    access: MemberAccess,
    is_static: bool,
}

#[derive(Debug, Clone)]
struct MethodSpec {
    name: String,
    access: MemberAccess,
    is_static: bool,
    parameters: Vec<(String, Symbol)>,
    return_type: Option<Symbol>,
}

#[derive(Debug, Clone)]
pub struct TypeBuilder {
    name: Symbol,
    assembly: String,
    kind: TypeKind,
    base: Option<Symbol>,
    interfaces: Vec<Symbol>,
    generic_params: Vec<GenericParam>,
    shape: Option<TypeShape>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
}

impl TypeBuilder {
    fn new(name: Symbol, kind: TypeKind, base: Option<Symbol>) -> Self {
        Self {
            name,
            assembly: DEFAULT_ASSEMBLY.to_owned(),
            kind,
            base,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            shape: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A reference type deriving from `System.Object`.
    pub fn class(name: impl Into<Symbol>) -> Self {
        let name = name.into();
        let base = (name.as_str() != OBJECT).then(|| Symbol::from(OBJECT));
        Self::new(name, TypeKind::Class, base)
    }

    /// A value type deriving from `System.ValueType`, laid out from its
    /// instance fields.
    pub fn value_type(name: impl Into<Symbol>) -> Self {
        Self::new(name.into(), TypeKind::Struct, Some(Symbol::from(VALUE_TYPE)))
    }

    pub fn interface(name: impl Into<Symbol>) -> Self {
        Self::new(name.into(), TypeKind::Interface, None)
    }

    pub fn primitive(name: impl Into<Symbol>, shape: TypeShape) -> Self {
        let mut builder = Self::new(name.into(), TypeKind::Primitive, Some(Symbol::from(VALUE_TYPE)));
        builder.shape = Some(shape);
        builder
    }

    pub fn assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = assembly.into();
        self
    }

    pub fn base(mut self, base: impl Into<Symbol>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn no_base(mut self) -> Self {
        self.base = None;
        self
    }

    pub fn implements(mut self, interface: impl Into<Symbol>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn generic_param(mut self, name: impl Into<String>, variance: Variance) -> Self {
        self.generic_params.push(GenericParam {
            name: name.into(),
            variance,
        });
        self
    }

    /// Overrides the computed value shape.
    pub fn shape(mut self, shape: TypeShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// A public instance field.
    pub fn field(self, name: impl Into<String>, field_type: impl Into<Symbol>) -> Self {
        self.field_with(name, field_type, MemberAccess::Public, false)
    }

    pub fn field_with(
        mut self,
        name: impl Into<String>,
        field_type: impl Into<Symbol>,
        access: MemberAccess,
        is_static: bool,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type: field_type.into(),
            access,
            is_static,
        });
        self
    }

    /// A public instance method.
    pub fn method(
        self,
        name: impl Into<String>,
        parameters: &[(&str, &str)],
        return_type: Option<&str>,
    ) -> Self {
        self.method_with(name, MemberAccess::Public, false, parameters, return_type)
    }

    pub fn method_with(
        mut self,
        name: impl Into<String>,
        access: MemberAccess,
        is_static: bool,
        parameters: &[(&str, &str)],
        return_type: Option<&str>,
    ) -> Self {
        self.methods.push(MethodSpec {
            name: name.into(),
            access,
            is_static,
            parameters: parameters
                .iter()
                .map(|(name, ty)| ((*name).to_owned(), Symbol::from(*ty)))
                .collect(),
            return_type: return_type.map(Symbol::from),
        });
        self
    }

    /// A public constructor.
    pub fn constructor(self, parameters: &[(&str, &str)]) -> Self {
        self.method_with(CONSTRUCTOR, MemberAccess::Public, false, parameters, None)
    }

    #[inline]
    pub const fn name(&self) -> &Symbol {
        &self.name
    }

    fn member_shape(
        &self,
        directory: &TypeDirectory,
        own_shape: Option<&TypeShape>,
        member: &str,
        member_type: &Symbol,
    ) -> Result<TypeShape, TypeError> {
        if member_type == &self.name {
            return own_shape.cloned().ok_or_else(|| self.unresolved(member, member_type));
        }
        if mentions_param(member_type, &self.generic_params) {
            // Filled in per instantiation.
            return Ok(TypeShape::Void);
        }
        directory
            .shape_of(member_type.as_str())
            .ok_or_else(|| self.unresolved(member, member_type))
    }

    fn unresolved(&self, member: &str, member_type: &Symbol) -> TypeError {
        TypeError::UnresolvedMember {
            ty: self.name.clone(),
            member: member.to_owned(),
            member_type: member_type.clone(),
        }
    }

    fn build(self, directory: &TypeDirectory) -> Result<TypeInfo, TypeError> {
        // A class can hold a reference to itself; a struct cannot contain
        // itself, so it has no shape until its fields are known.
        let reference_shape = match self.kind {
            TypeKind::Struct | TypeKind::Primitive => None,
            TypeKind::Class | TypeKind::Interface | TypeKind::Array => {
                Some(self.shape.clone().unwrap_or(TypeShape::Handle))
            }
        };

        let fields = self
            .fields
            .iter()
            .map(|field| {
                let shape =
                    self.member_shape(directory, reference_shape.as_ref(), &field.name, &field.field_type)?;
                Ok(FieldInfo {
                    name: field.name.clone(),
                    field_type: field.field_type.clone(),
                    shape,
                    access: field.access,
                    is_static: field.is_static,
                })
            })
            .collect::<Result<Vec<_>, TypeError>>()?;

        let shape = match (&self.shape, self.kind) {
            (Some(shape), _) => shape.clone(),
            (None, TypeKind::Struct) => {
                let layout = StructLayout::sequential(
                    fields
                        .iter()
                        .filter(|field| !field.is_static)
                        .map(|field| (field.name.clone(), field.shape.clone())),
                );
                TypeShape::Struct(Arc::new(layout))
            }
            (None, _) => TypeShape::Handle,
        };

        let methods = self
            .methods
            .iter()
            .map(|method| {
                let parameters = method
                    .parameters
                    .iter()
                    .map(|(name, ty)| {
                        Ok(ParameterInfo {
                            name: name.clone(),
                            parameter_type: ty.clone(),
                            shape: self.member_shape(directory, Some(&shape), &method.name, ty)?,
                        })
                    })
                    .collect::<Result<Vec<_>, TypeError>>()?;
                let return_shape = match &method.return_type {
                    Some(ty) if ty.as_str() != VOID => {
                        self.member_shape(directory, Some(&shape), &method.name, ty)?
                    }
                    _ => TypeShape::Void,
                };
                Ok(MethodInfo {
                    name: method.name.clone(),
                    access: method.access,
                    is_static: method.is_static,
                    parameters,
                    return_type: method.return_type.clone(),
                    return_shape,
                })
            })
            .collect::<Result<Vec<_>, TypeError>>()?;

        Ok(TypeInfo {
            handle: TypeHandle::NULL,
            name: self.name,
            assembly: self.assembly,
            kind: self.kind,
            base: self.base,
            interfaces: self.interfaces,
            element: None,
            generic_params: self.generic_params,
            generic_instance: None,
            shape,
            fields,
            methods,
        })
    }
}

impl TypeDirectory {
    /// Resolves member shapes and registers the type.
    pub fn define(&self, builder: TypeBuilder) -> Result<TypeHandle, TypeError> {
        let info = builder.build(self)?;
        Ok(self.register(info))
    }
}
