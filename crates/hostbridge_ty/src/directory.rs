use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use hostbridge_abi::TypeHandle;
use hostbridge_symbol::{StructLayout, Symbol, TypeShape};
use parking_lot::RwLock;
use tracing::debug;

use crate::corelib::{ARRAY, VOID};
use crate::{
    FieldInfo, GenericInstance, GenericParam, MethodInfo, ParameterInfo, TypeError, TypeInfo,
    TypeKind, Value,
};

pub(crate) type TypeRegistrar = fn(&TypeDirectory);

/// Nesting limit for generic instantiation. A value type whose fields name
/// ever larger instantiations of itself never reaches a fixed point.
const MAX_INSTANTIATION_DEPTH: usize = 32;

thread_local! {
    static INSTANTIATION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct InstantiationGuard;

impl InstantiationGuard {
    fn enter() -> Option<Self> {
        INSTANTIATION_DEPTH.with(|depth| {
            let current = depth.get();
            (current < MAX_INSTANTIATION_DEPTH).then(|| {
                depth.set(current + 1);
                Self
            })
        })
    }
}

impl Drop for InstantiationGuard {
    fn drop(&mut self) {
        INSTANTIATION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Registry of every type the bridge can describe, keyed by full name and by
/// handle.
///
/// Array types and constructed generics are synthesized on first lookup and
/// cached. Namespaces can be registered lazily and are activated by the first
/// lookup that misses inside them.
pub struct TypeDirectory {
    types: RwLock<AHashMap<Symbol, Arc<TypeInfo>>>,
    handles: RwLock<AHashMap<u64, Arc<TypeInfo>>>,
    next_handle: AtomicU64,
    lazy_namespaces: RwLock<AHashMap<String, Vec<TypeRegistrar>>>,
    active_namespaces: RwLock<HashSet<String>>,
}

impl Default for TypeDirectory {
    fn default() -> Self {
        Self {
            types: RwLock::new(AHashMap::new()),
            handles: RwLock::new(AHashMap::new()),
            next_handle: AtomicU64::new(1),
            lazy_namespaces: RwLock::new(AHashMap::new()),
            active_namespaces: RwLock::new(HashSet::new()),
        }
    }
}

impl TypeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `info`. A name that is already present keeps its handle.
    pub fn register(&self, info: TypeInfo) -> TypeHandle {
        self.insert(info).handle
    }

    fn insert(&self, mut info: TypeInfo) -> Arc<TypeInfo> {
        let mut types = self.types.write();
        info.handle = types.get(&info.name).map_or_else(
            || TypeHandle(self.next_handle.fetch_add(1, Ordering::Relaxed)),
            |existing| existing.handle,
        );
        let info = Arc::new(info);
        types.insert(info.name.clone(), Arc::clone(&info));
        self.handles.write().insert(info.handle.0, Arc::clone(&info));
        info
    }

    pub fn register_lazy_namespace(&self, namespace: impl Into<String>, registrar: TypeRegistrar) {
        let mut namespaces = self.lazy_namespaces.write();
        namespaces.entry(namespace.into()).or_default().push(registrar);
    }

    pub fn mark_namespace_active(&self, namespace: impl Into<String>) {
        self.active_namespaces.write().insert(namespace.into());
    }

    /// Runs the pending registrars of `namespace`. Returns whether anything ran.
    pub fn activate_namespace(&self, namespace: &str) -> bool {
        if self.is_namespace_active(namespace) {
            return false;
        }

        let registrars = {
            let mut namespaces = self.lazy_namespaces.write();
            namespaces.remove(namespace)
        };

        if let Some(registrars) = registrars {
            self.mark_namespace_active(namespace);
            debug!(namespace, "activating lazy type namespace");
            for registrar in registrars {
                (registrar)(self);
            }
            true
        } else {
            false
        }
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.is_namespace_active(namespace) || self.lazy_namespaces.read().contains_key(namespace)
    }

    pub fn is_namespace_active(&self, namespace: &str) -> bool {
        self.active_namespaces.read().contains(namespace)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    fn lookup(&self, name: &str) -> Option<Arc<TypeInfo>> {
        self.types.read().get(name).cloned()
    }

    /// Finds a type by full name. A miss is `None`, never an error.
    pub fn resolve(&self, name: &str) -> Option<Arc<TypeInfo>> {
        if let Some(info) = self.lookup(name) {
            return Some(info);
        }

        let symbol = Symbol::from(name);
        if let Some(element) = symbol.array_element() {
            return self.instantiate_array(symbol, &element);
        }
        if let Some(definition) = symbol.generic_definition() {
            return self.instantiate_generic(&symbol, &definition);
        }

        let namespace = symbol.namespace()?;
        if self.activate_namespace(namespace) {
            return self.lookup(name);
        }
        None
    }

    pub fn resolve_handle(&self, handle: TypeHandle) -> Option<Arc<TypeInfo>> {
        self.handles.read().get(&handle.0).cloned()
    }

    /// The value shape of `name` without forcing instantiation of reference
    /// types, so self-referential generics terminate.
    pub fn shape_of(&self, name: &str) -> Option<TypeShape> {
        if let Some(info) = self.lookup(name) {
            return Some(info.shape.clone());
        }

        let symbol = Symbol::from(name);
        if let Some(element) = symbol.array_element() {
            return self
                .shape_of(element.as_str())
                .map(|element| TypeShape::Array(Box::new(element)));
        }
        if let Some(definition) = symbol.generic_definition() {
            let definition = self.resolve(definition.as_str())?;
            if definition.is_reference_type() {
                return Some(definition.shape.clone());
            }
        }
        self.resolve(name).map(|info| info.shape.clone())
    }

    fn instantiate_array(&self, name: Symbol, element: &Symbol) -> Option<Arc<TypeInfo>> {
        let element = self.resolve(element.as_str())?;
        debug!(array = %name, "synthesizing array type");
        Some(self.insert(TypeInfo {
            handle: TypeHandle::NULL,
            name,
            assembly: element.assembly.clone(),
            kind: TypeKind::Array,
            base: Some(Symbol::from(ARRAY)),
            interfaces: Vec::new(),
            element: Some(element.name.clone()),
            generic_params: Vec::new(),
            generic_instance: None,
            shape: TypeShape::Array(Box::new(element.shape.clone())),
            fields: Vec::new(),
            methods: Vec::new(),
        }))
    }

    fn instantiate_generic(&self, name: &Symbol, definition: &Symbol) -> Option<Arc<TypeInfo>> {
        let Some(_guard) = InstantiationGuard::enter() else {
            debug!(generic = %name, "generic instantiation nested too deeply");
            return None;
        };
        let definition = self.resolve(definition.as_str())?;
        let arguments = name.generic_arguments();
        if arguments.len() != definition.generic_params.len() {
            return None;
        }
        let arguments = arguments
            .iter()
            .map(|argument| self.resolve(argument.as_str()))
            .collect::<Option<Vec<_>>>()?;
        let argument_names = arguments
            .iter()
            .map(|argument| argument.name.clone())
            .collect::<Vec<_>>();

        let params = &definition.generic_params;
        let apply = |symbol: &Symbol| substitute(symbol, params, &argument_names);
        let shape_for = |symbol: &Symbol| {
            if symbol == name {
                Some(definition.shape.clone())
            } else {
                self.shape_of(symbol.as_str())
            }
        };

        let fields = definition
            .fields
            .iter()
            .map(|field| {
                let field_type = apply(&field.field_type);
                Some(FieldInfo {
                    shape: shape_for(&field_type)?,
                    field_type,
                    ..field.clone()
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let shape = match (&definition.shape, definition.kind) {
            (TypeShape::View(_), _) => {
                TypeShape::View(Box::new(arguments.first()?.shape.clone()))
            }
            (_, TypeKind::Struct) => TypeShape::Struct(Arc::new(StructLayout::sequential(
                fields
                    .iter()
                    .filter(|field| !field.is_static)
                    .map(|field| (field.name.clone(), field.shape.clone())),
            ))),
            (shape, _) => shape.clone(),
        };

        let methods = definition
            .methods
            .iter()
            .map(|method| {
                let parameters = method
                    .parameters
                    .iter()
                    .map(|parameter| {
                        let parameter_type = apply(&parameter.parameter_type);
                        Some(ParameterInfo {
                            name: parameter.name.clone(),
                            shape: if &parameter_type == name {
                                shape.clone()
                            } else {
                                self.shape_of(parameter_type.as_str())?
                            },
                            parameter_type,
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;
                let return_type = method.return_type.as_ref().map(apply);
                let return_shape = match &return_type {
                    Some(ty) if ty == name => shape.clone(),
                    Some(ty) if ty.as_str() != VOID => self.shape_of(ty.as_str())?,
                    _ => TypeShape::Void,
                };
                Some(MethodInfo {
                    parameters,
                    return_type,
                    return_shape,
                    ..method.clone()
                })
            })
            .collect::<Option<Vec<_>>>()?;

        debug!(generic = %name, "instantiating generic type");
        Some(self.insert(TypeInfo {
            handle: TypeHandle::NULL,
            name: name.clone(),
            assembly: definition.assembly.clone(),
            kind: definition.kind,
            base: definition.base.as_ref().map(apply),
            interfaces: definition.interfaces.iter().map(apply).collect(),
            element: None,
            generic_params: Vec::new(),
            generic_instance: Some(GenericInstance {
                definition: definition.name.clone(),
                arguments: argument_names.clone(),
            }),
            shape,
            fields,
            methods,
        }))
    }

    /// `info` followed by its base types, nearest first.
    pub fn base_chain(&self, info: &Arc<TypeInfo>) -> Vec<Arc<TypeInfo>> {
        let mut chain = vec![Arc::clone(info)];
        let mut seen = HashSet::from([info.name.clone()]);
        let mut current = info.base.clone();
        while let Some(base) = current {
            if !seen.insert(base.clone()) {
                break;
            }
            let Some(base) = self.resolve(base.as_str()) else {
                break;
            };
            current = base.base.clone();
            chain.push(base);
        }
        chain
    }

    /// Instance fields in layout order, most-base first.
    pub fn instance_fields_of(&self, info: &Arc<TypeInfo>) -> Vec<FieldInfo> {
        self.base_chain(info)
            .iter()
            .rev()
            .flat_map(|ty| ty.fields.iter().filter(|field| !field.is_static).cloned())
            .collect()
    }

    /// Methods visible through `name`: declared ones in declaration order,
    /// then inherited non-private instance methods walking up the base
    /// chain. Constructors are excluded; an override hides the base method
    /// with the same signature.
    pub fn methods_of(&self, name: &str) -> Option<Vec<MethodInfo>> {
        let info = self.resolve(name)?;
        let mut methods: Vec<MethodInfo> = Vec::new();
        for (depth, ty) in self.base_chain(&info).iter().enumerate() {
            for method in ty.methods.iter().filter(|method| !method.is_constructor()) {
                if depth > 0
                    && (method.is_static
                        || method.access.is_private()
                        || methods.iter().any(|seen| seen.same_signature(method)))
                {
                    continue;
                }
                methods.push(method.clone());
            }
        }
        Some(methods)
    }

    /// Fields visible through `name`, ordered like [`Self::methods_of`].
    pub fn fields_of(&self, name: &str) -> Option<Vec<FieldInfo>> {
        let info = self.resolve(name)?;
        let mut fields = Vec::new();
        for (depth, ty) in self.base_chain(&info).iter().enumerate() {
            fields.extend(
                ty.fields
                    .iter()
                    .filter(|field| depth == 0 || !(field.is_static || field.access.is_private()))
                    .cloned(),
            );
        }
        Some(fields)
    }

    /// Builds the initial value of a new instance of `handle`.
    ///
    /// The constructor with matching arity is selected; each of its
    /// parameters initializes the instance field of the same name, compared
    /// ASCII case-insensitively. Remaining fields start at their defaults.
    pub fn construct(&self, handle: TypeHandle, arguments: Vec<Value>) -> Result<Value, TypeError> {
        let info = self
            .resolve_handle(handle)
            .ok_or(TypeError::UnknownHandle(handle.0))?;
        if info.kind == TypeKind::Interface || info.is_generic_definition() {
            return Err(TypeError::NotConstructible(info.name.clone()));
        }

        let no_match = || TypeError::NoMatchingConstructor {
            ty: info.name.clone(),
            arity: arguments.len(),
        };
        let parameters = if info.constructors().next().is_none() {
            if !arguments.is_empty() {
                return Err(no_match());
            }
            &[][..]
        } else {
            info.constructors()
                .find(|ctor| ctor.arity() == arguments.len())
                .map(|ctor| ctor.parameters.as_slice())
                .ok_or_else(no_match)?
        };

        for (parameter, argument) in parameters.iter().zip(&arguments) {
            if !argument.conforms_to(&parameter.shape) {
                return Err(TypeError::ArgumentMismatch {
                    ty: info.name.clone(),
                    parameter: parameter.name.clone(),
                    expected: parameter.shape.to_string(),
                    found: argument.type_label(),
                });
            }
        }

        let fields = self
            .instance_fields_of(&info)
            .into_iter()
            .map(|field| {
                let value = parameters
                    .iter()
                    .zip(&arguments)
                    .find(|(parameter, _)| parameter.name.eq_ignore_ascii_case(&field.name))
                    .map_or_else(|| Value::default_for(&field.shape), |(_, arg)| arg.clone());
                (field.name, value)
            })
            .collect();
        Ok(Value::Struct { fields })
    }
}

/// Whether `symbol` names, or is built from, one of `params`.
pub(crate) fn mentions_param(symbol: &Symbol, params: &[GenericParam]) -> bool {
    if params.iter().any(|param| param.name == symbol.as_str()) {
        return true;
    }
    if let Some(element) = symbol.array_element() {
        return mentions_param(&element, params);
    }
    symbol
        .generic_arguments()
        .iter()
        .any(|argument| mentions_param(argument, params))
}

/// Replaces generic parameter names inside `symbol` with `arguments`.
pub(crate) fn substitute(symbol: &Symbol, params: &[GenericParam], arguments: &[Symbol]) -> Symbol {
    if let Some((_, argument)) = params
        .iter()
        .zip(arguments)
        .find(|(param, _)| param.name == symbol.as_str())
    {
        return argument.clone();
    }
    if let Some(element) = symbol.array_element() {
        return Symbol::array_of(&substitute(&element, params, arguments));
    }
    if let Some(definition) = symbol.generic_definition() {
        let inner = symbol
            .generic_arguments()
            .iter()
            .map(|argument| substitute(argument, params, arguments))
            .collect::<Vec<_>>();
        return Symbol::generic(&definition, &inner);
    }
    symbol.clone()
}

#[cfg(test)]
mod tests {
    use hostbridge_symbol::PrimitiveKind;

    use super::*;
    use crate::corelib::{INT32, NATIVE_ARRAY, OBJECT, STRING};
    use crate::{MemberAccess, TypeBuilder, Variance};

    fn directory() -> TypeDirectory {
        let directory = TypeDirectory::new();
        directory.bootstrap(true);
        directory
    }

    fn define_animals(directory: &TypeDirectory) {
        directory
            .define(
                TypeBuilder::class("Zoo.Animal")
                    .field("Name", STRING)
                    .field_with("secret", INT32, MemberAccess::Private, false)
                    .field_with("Count", INT32, MemberAccess::Public, true)
                    .constructor(&[("name", STRING)])
                    .method("Speak", &[], Some(STRING))
                    .method_with("Hidden", MemberAccess::Private, false, &[], None)
                    .method_with("Create", MemberAccess::Public, true, &[], Some("Zoo.Animal")),
            )
            .unwrap();
        directory
            .define(
                TypeBuilder::class("Zoo.Dog")
                    .base("Zoo.Animal")
                    .field("Breed", STRING)
                    .constructor(&[("name", STRING), ("breed", STRING)])
                    .method("Speak", &[], Some(STRING))
                    .method("Fetch", &[("times", INT32)], None),
            )
            .unwrap();
    }

    #[test]
    fn test_miss_is_none() {
        let directory = directory();
        assert!(directory.resolve("Zoo.Unicorn").is_none());
        assert!(directory.resolve("Zoo.Unicorn[]").is_none());
        assert!(directory.resolve_handle(TypeHandle(9999)).is_none());
    }

    #[test]
    fn test_reregister_keeps_handle() {
        let directory = directory();
        let first = directory.define(TypeBuilder::class("Zoo.Cage")).unwrap();
        let second = directory
            .define(TypeBuilder::class("Zoo.Cage").field("Size", INT32))
            .unwrap();
        assert_eq!(first, second);
        let info = directory.resolve_handle(first).unwrap();
        assert_eq!(info.fields.len(), 1);
    }

    #[test]
    fn test_core_types_present() {
        let directory = directory();
        let object = directory.resolve(OBJECT).unwrap();
        assert!(object.base.is_none());
        let int = directory.resolve(INT32).unwrap();
        assert_eq!(int.shape, TypeShape::Primitive(PrimitiveKind::I32));
        assert!(int.is_value_type());
    }

    #[test]
    fn test_lazy_namespace_activates_on_miss() {
        let directory = directory();
        assert!(!directory.is_namespace_active("Hostbridge.Interop"));
        assert!(directory.has_namespace("Hostbridge.Interop"));
        assert!(directory.resolve(NATIVE_ARRAY).is_some());
        assert!(directory.is_namespace_active("Hostbridge.Interop"));
    }

    #[test]
    fn test_array_synthesis() {
        let directory = directory();
        let array = directory.resolve("System.Int32[]").unwrap();
        assert_eq!(array.kind, TypeKind::Array);
        assert_eq!(array.element.as_ref().map(Symbol::as_str), Some(INT32));
        assert_eq!(
            array.shape,
            TypeShape::Array(Box::new(TypeShape::Primitive(PrimitiveKind::I32)))
        );
        let again = directory.resolve("System.Int32[]").unwrap();
        assert_eq!(array.handle, again.handle);
    }

    #[test]
    fn test_view_instantiation() {
        let directory = directory();
        let name = Symbol::generic(&Symbol::from(NATIVE_ARRAY), &[Symbol::from(INT32)]);
        let view = directory.resolve(name.as_str()).unwrap();
        assert_eq!(
            view.shape,
            TypeShape::View(Box::new(TypeShape::Primitive(PrimitiveKind::I32)))
        );
        assert_eq!(
            view.generic_instance.as_ref().map(|g| g.definition.as_str()),
            Some(NATIVE_ARRAY)
        );
    }

    #[test]
    fn test_generic_struct_substitution() {
        let directory = directory();
        directory
            .define(
                TypeBuilder::value_type("Zoo.Pair`2")
                    .generic_param("TKey", Variance::Invariant)
                    .generic_param("TValue", Variance::Invariant)
                    .field("Key", "TKey")
                    .field("Values", "TValue[]")
                    .method("Swap", &[("other", "Zoo.Pair`2[[TKey],[TValue]]")], None),
            )
            .unwrap();
        let name = Symbol::generic(
            &Symbol::from("Zoo.Pair`2"),
            &[Symbol::from(INT32), Symbol::from(STRING)],
        );
        let pair = directory.resolve(name.as_str()).unwrap();
        assert_eq!(pair.fields[1].field_type.as_str(), "System.String[]");
        let TypeShape::Struct(layout) = &pair.shape else {
            panic!("expected struct shape");
        };
        assert_eq!(layout.fields[0].shape, TypeShape::Primitive(PrimitiveKind::I32));
        assert_eq!(pair.methods[0].parameters[0].parameter_type, name);
        assert_eq!(pair.methods[0].parameters[0].shape, pair.shape);
    }

    #[test]
    fn test_expanding_generic_struct_is_miss() {
        let directory = directory();
        directory
            .define(
                TypeBuilder::value_type("Zoo.Nest`1")
                    .generic_param("T", Variance::Invariant)
                    .field("Value", "T")
                    .field("Inner", "Zoo.Nest`1[[T[]]]"),
            )
            .unwrap();
        assert!(directory.resolve("Zoo.Nest`1[[System.Int32]]").is_none());
        assert!(directory.shape_of("Zoo.Nest`1[[System.Int32]]").is_none());

        // The limit is per lookup; ordinary instantiations still work after.
        assert!(directory.resolve("Hostbridge.Interop.NativeArray`1[[System.Int32]]").is_some());
        assert_eq!(INSTANTIATION_DEPTH.with(Cell::get), 0);
    }

    #[test]
    fn test_generic_arity_mismatch_is_miss() {
        let directory = directory();
        assert!(directory.resolve("Hostbridge.Interop.NativeArray`1[[System.Int32],[System.Int32]]").is_none());
        assert!(directory.resolve("Hostbridge.Interop.NativeArray`1[[Zoo.Missing]]").is_none());
    }

    #[test]
    fn test_methods_declared_then_inherited() {
        let directory = directory();
        define_animals(&directory);
        let names = directory
            .methods_of("Zoo.Dog")
            .unwrap()
            .into_iter()
            .map(|method| method.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "Speak",
                "Fetch",
                "ToString",
                "Equals",
                "GetHashCode",
                "Finalize",
                "MemberwiseClone"
            ]
        );

        let animal = directory
            .methods_of("Zoo.Animal")
            .unwrap()
            .into_iter()
            .map(|method| method.name)
            .collect::<Vec<_>>();
        assert_eq!(&animal[..3], &["Speak", "Hidden", "Create"]);
    }

    #[test]
    fn test_fields_exclude_inherited_private_and_static() {
        let directory = directory();
        define_animals(&directory);
        let names = directory
            .fields_of("Zoo.Dog")
            .unwrap()
            .into_iter()
            .map(|field| field.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Breed", "Name"]);
        assert_eq!(directory.fields_of("Zoo.Animal").unwrap().len(), 3);
    }

    #[test]
    fn test_construct_fills_matching_fields() {
        let directory = directory();
        define_animals(&directory);
        let dog = directory.resolve("Zoo.Dog").unwrap();
        let value = directory
            .construct(dog.handle, vec!["Rex".into(), "Collie".into()])
            .unwrap();
        assert_eq!(
            value,
            Value::Struct {
                fields: vec![
                    ("Name".into(), "Rex".into()),
                    ("secret".into(), Value::I32(0)),
                    ("Breed".into(), "Collie".into()),
                ]
            }
        );
    }

    #[test]
    fn test_construct_errors() {
        let directory = directory();
        define_animals(&directory);
        let dog = directory.resolve("Zoo.Dog").unwrap();
        assert!(matches!(
            directory.construct(dog.handle, vec![]),
            Err(TypeError::NoMatchingConstructor { arity: 0, .. })
        ));
        assert!(matches!(
            directory.construct(dog.handle, vec![Value::I32(1), "x".into()]),
            Err(TypeError::ArgumentMismatch { found: "i32", .. })
        ));
        assert_eq!(
            directory.construct(TypeHandle(777), vec![]),
            Err(TypeError::UnknownHandle(777))
        );

        let handle = directory
            .define(TypeBuilder::interface("Zoo.IPet"))
            .unwrap();
        assert!(matches!(
            directory.construct(handle, vec![]),
            Err(TypeError::NotConstructible(_))
        ));
    }

    #[test]
    fn test_construct_without_constructor() {
        let directory = directory();
        let handle = directory
            .define(TypeBuilder::class("Zoo.Bowl").field("Level", INT32))
            .unwrap();
        let value = directory.construct(handle, vec![]).unwrap();
        assert_eq!(value.field("Level"), Some(&Value::I32(0)));
        assert!(directory.construct(handle, vec![Value::I32(1)]).is_err());
    }

    #[test]
    fn test_base_chain_cycle_terminates() {
        let directory = directory();
        directory
            .define(TypeBuilder::class("Zoo.A").base("Zoo.B"))
            .unwrap();
        directory
            .define(TypeBuilder::class("Zoo.B").base("Zoo.A"))
            .unwrap();
        let a = directory.resolve("Zoo.A").unwrap();
        assert_eq!(directory.base_chain(&a).len(), 2);
    }

    #[test]
    fn test_substitute_nested() {
        let params = vec![GenericParam {
            name: "T".into(),
            variance: Variance::Invariant,
        }];
        let symbol = Symbol::from("Zoo.Box`1[[T[]]]");
        assert!(mentions_param(&symbol, &params));
        assert_eq!(
            substitute(&symbol, &params, &[Symbol::from(INT32)]).as_str(),
            "Zoo.Box`1[[System.Int32[]]]"
        );
    }
}
