//! The subtype relation between registered types.

use std::collections::HashSet;
use std::sync::Arc;

use crate::corelib::OBJECT;
use crate::directory::TypeDirectory;
use crate::{TypeInfo, TypeKind, Variance};

impl TypeDirectory {
    /// Whether a value of `from` can be stored where `to` is expected.
    /// Unresolvable names are never assignable.
    pub fn is_assignable_to(&self, from: &str, to: &str) -> bool {
        match (self.resolve(from), self.resolve(to)) {
            (Some(from), Some(to)) => self.assignable(&from, &to),
            _ => false,
        }
    }

    #[inline]
    pub fn is_assignable_from(&self, target: &str, source: &str) -> bool {
        self.is_assignable_to(source, target)
    }

    fn assignable(&self, from: &Arc<TypeInfo>, to: &Arc<TypeInfo>) -> bool {
        if from.name == to.name || to.name.as_str() == OBJECT {
            return true;
        }

        if from.kind == TypeKind::Array
            && to.kind == TypeKind::Array
            && let (Some(from_element), Some(to_element)) = (&from.element, &to.element)
            && let (Some(from_element), Some(to_element)) =
                (self.resolve(from_element.as_str()), self.resolve(to_element.as_str()))
            && from_element.is_reference_type()
            && to_element.is_reference_type()
            && self.assignable(&from_element, &to_element)
        {
            return true;
        }

        let chain = self.base_chain(from);
        if to.kind == TypeKind::Interface {
            return self
                .interfaces_of(&chain)
                .iter()
                .any(|interface| self.variant_match(interface, to));
        }
        chain.iter().any(|ancestor| self.variant_match(ancestor, to))
    }

    /// Every interface implemented along `chain`, including interfaces
    /// inherited by interfaces.
    fn interfaces_of(&self, chain: &[Arc<TypeInfo>]) -> Vec<Arc<TypeInfo>> {
        let mut seen = HashSet::new();
        let mut pending = chain
            .iter()
            .flat_map(|ty| {
                let own = (ty.kind == TypeKind::Interface).then(|| ty.name.clone());
                own.into_iter().chain(ty.interfaces.iter().cloned())
            })
            .collect::<Vec<_>>();
        let mut found = Vec::new();
        while let Some(name) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(interface) = self.resolve(name.as_str()) {
                pending.extend(interface.interfaces.iter().cloned());
                found.push(interface);
            }
        }
        found
    }

    /// Identity, or a variance-compatible instance of the same generic
    /// interface.
    fn variant_match(&self, candidate: &Arc<TypeInfo>, target: &Arc<TypeInfo>) -> bool {
        if candidate.name == target.name {
            return true;
        }
        let (Some(source), Some(dest)) = (&candidate.generic_instance, &target.generic_instance)
        else {
            return false;
        };
        if source.definition != dest.definition || source.arguments.len() != dest.arguments.len() {
            return false;
        }
        let Some(definition) = self.resolve(source.definition.as_str()) else {
            return false;
        };
        if definition.kind != TypeKind::Interface {
            return false;
        }

        definition
            .generic_params
            .iter()
            .zip(source.arguments.iter().zip(&dest.arguments))
            .all(|(param, (from, to))| {
                if from == to {
                    return true;
                }
                let (Some(from), Some(to)) = (self.resolve(from.as_str()), self.resolve(to.as_str()))
                else {
                    return false;
                };
                if !(from.is_reference_type() && to.is_reference_type()) {
                    return false;
                }
                match param.variance {
                    Variance::Invariant => false,
                    Variance::Covariant => self.assignable(&from, &to),
                    Variance::Contravariant => self.assignable(&to, &from),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use hostbridge_symbol::Symbol;

    use crate::TypeBuilder;
    use crate::corelib::{ARRAY, ENUMERABLE, INT32, OBJECT, STRING, VALUE_TYPE};

    use super::*;

    fn directory() -> TypeDirectory {
        let directory = TypeDirectory::new();
        directory.bootstrap(true);
        directory
            .define(TypeBuilder::interface("Shapes.IShape"))
            .unwrap();
        directory
            .define(TypeBuilder::interface("Shapes.IPolygon").implements("Shapes.IShape"))
            .unwrap();
        directory
            .define(TypeBuilder::class("Shapes.Polygon").implements("Shapes.IPolygon"))
            .unwrap();
        directory
            .define(TypeBuilder::class("Shapes.Square").base("Shapes.Polygon"))
            .unwrap();
        directory
            .define(TypeBuilder::value_type("Shapes.Point").field("X", INT32))
            .unwrap();
        directory
    }

    fn generic(definition: &str, argument: &str) -> String {
        Symbol::generic(&Symbol::from(definition), &[Symbol::from(argument)])
            .as_str()
            .to_owned()
    }

    #[test]
    fn test_reflexive_and_unresolved() {
        let directory = directory();
        for name in ["Shapes.Square", INT32, STRING, "Shapes.IShape", "Shapes.Point[]"] {
            assert!(directory.is_assignable_to(name, name), "{name}");
        }
        assert!(!directory.is_assignable_to("Shapes.Circle", "Shapes.Circle"));
        assert!(!directory.is_assignable_to("Shapes.Square", "Shapes.Circle"));
        assert!(!directory.is_assignable_to("Shapes.Circle", OBJECT));
    }

    #[test]
    fn test_base_chain_and_roots() {
        let directory = directory();
        assert!(directory.is_assignable_to("Shapes.Square", "Shapes.Polygon"));
        assert!(!directory.is_assignable_to("Shapes.Polygon", "Shapes.Square"));
        assert!(directory.is_assignable_to("Shapes.Point", OBJECT));
        assert!(directory.is_assignable_to("Shapes.Point", VALUE_TYPE));
        assert!(directory.is_assignable_to(INT32, VALUE_TYPE));
        assert!(!directory.is_assignable_to("Shapes.Square", VALUE_TYPE));
        assert!(directory.is_assignable_to("Shapes.IShape", OBJECT));
        assert!(directory.is_assignable_to("Shapes.Point[]", ARRAY));
    }

    #[test]
    fn test_interfaces_through_chain() {
        let directory = directory();
        assert!(directory.is_assignable_to("Shapes.Square", "Shapes.IPolygon"));
        assert!(directory.is_assignable_to("Shapes.Square", "Shapes.IShape"));
        assert!(directory.is_assignable_to("Shapes.IPolygon", "Shapes.IShape"));
        assert!(!directory.is_assignable_to("Shapes.IShape", "Shapes.IPolygon"));
        assert!(!directory.is_assignable_to("Shapes.Point", "Shapes.IShape"));
    }

    #[test]
    fn test_assignable_from_is_reversed() {
        let directory = directory();
        assert!(directory.is_assignable_from("Shapes.Polygon", "Shapes.Square"));
        assert!(!directory.is_assignable_from("Shapes.Square", "Shapes.Polygon"));
    }

    #[test]
    fn test_array_covariance() {
        let directory = directory();
        assert!(directory.is_assignable_to("Shapes.Square[]", "Shapes.Polygon[]"));
        assert!(directory.is_assignable_to("Shapes.Square[]", "Shapes.IShape[]"));
        assert!(!directory.is_assignable_to("Shapes.Polygon[]", "Shapes.Square[]"));
        assert!(!directory.is_assignable_to("Shapes.Point[]", "System.ValueType[]"));
        assert!(!directory.is_assignable_to("System.Int32[]", "System.Int64[]"));
    }

    #[test]
    fn test_generic_variance() {
        let directory = directory();
        let squares = generic(ENUMERABLE, "Shapes.Square");
        let shapes = generic(ENUMERABLE, "Shapes.IShape");
        let ints = generic(ENUMERABLE, INT32);
        let objects = generic(ENUMERABLE, OBJECT);
        assert!(directory.is_assignable_to(&squares, &shapes));
        assert!(!directory.is_assignable_to(&shapes, &squares));
        assert!(!directory.is_assignable_to(&ints, &objects));

        let comparer = "System.Collections.Generic.IComparer`1";
        assert!(directory.is_assignable_to(
            &generic(comparer, "Shapes.Polygon"),
            &generic(comparer, "Shapes.Square")
        ));
        assert!(!directory.is_assignable_to(
            &generic(comparer, "Shapes.Square"),
            &generic(comparer, "Shapes.Polygon")
        ));

        let list = "System.Collections.Generic.IList`1";
        assert!(!directory.is_assignable_to(
            &generic(list, "Shapes.Square"),
            &generic(list, "Shapes.Polygon")
        ));
        assert!(directory.is_assignable_to(&generic(list, "Shapes.Square"), &shapes));
    }

    #[test]
    fn test_class_implementing_generic_interface() {
        let directory = directory();
        directory
            .define(
                TypeBuilder::class("Shapes.SquareSet")
                    .implements(generic(ENUMERABLE, "Shapes.Square").as_str()),
            )
            .unwrap();
        assert!(directory.is_assignable_to(
            "Shapes.SquareSet",
            &generic(ENUMERABLE, "Shapes.Polygon")
        ));
        assert!(!directory.is_assignable_to(
            "Shapes.SquareSet",
            &generic(ENUMERABLE, STRING)
        ));
    }
}
