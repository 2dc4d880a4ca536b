//! Fully-qualified type names used as directory keys.
//!
//! Names follow the runtime's reflection spelling: `Namespace.Outer+Inner`,
//! arrays as `Element[]` and constructed generics as
//! `Namespace.Definition`1[[Argument]]`.

use core::borrow::Borrow;
use core::fmt::{Display, Formatter, Result};

/// An encoded, fully-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `Element[]`.
    pub fn array_of(element: &Symbol) -> Self {
        Self(format!("{}[]", element.0))
    }

    /// The element name of a single-dimension array name.
    pub fn array_element(&self) -> Option<Symbol> {
        self.0
            .strip_suffix("[]")
            .filter(|element| !element.is_empty())
            .map(Symbol::from)
    }

    /// Builds `Definition[[A],[B]]`.
    pub fn generic(definition: &Symbol, arguments: &[Symbol]) -> Self {
        let arguments = arguments
            .iter()
            .map(|argument| format!("[{}]", argument.0))
            .collect::<Vec<_>>()
            .join(",");
        Self(format!("{}[{arguments}]", definition.0))
    }

    /// The open definition name of a constructed generic, e.g. `NativeArray`1`.
    pub fn generic_definition(&self) -> Option<Symbol> {
        if !self.0.ends_with("]]") {
            return None;
        }
        self.0.find("[[").map(|idx| Symbol::from(&self.0[..idx]))
    }

    /// The argument names of a constructed generic, in order.
    pub fn generic_arguments(&self) -> Vec<Symbol> {
        let Some(definition) = self.generic_definition() else {
            return Vec::new();
        };
        let inner = &self.0[definition.0.len() + 1..self.0.len() - 1];

        let mut arguments = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;
        for (idx, ch) in inner.char_indices() {
            match ch {
                '[' => {
                    if depth == 0 {
                        start = idx + 1;
                    }
                    depth += 1;
                }
                ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        arguments.push(Symbol::from(&inner[start..idx]));
                    }
                }
                _ => {}
            }
        }
        arguments
    }

    /// Dot and plus positions at bracket depth zero, ignoring anything after
    /// the first nested-type separator for the namespace split.
    fn split_points(&self) -> (Option<usize>, Option<usize>) {
        let mut depth = 0usize;
        let mut namespace_dot = None;
        let mut last_plus = None;
        for (idx, ch) in self.0.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '.' if depth == 0 && last_plus.is_none() => namespace_dot = Some(idx),
                '+' if depth == 0 => last_plus = Some(idx),
                _ => {}
            }
        }
        (namespace_dot, last_plus)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.split_points().0.map(|idx| &self.0[..idx])
    }

    /// The short name without namespace, declaring types or generic arguments.
    pub fn simple_name(&self) -> &str {
        let (dot, plus) = self.split_points();
        let start = plus.or(dot).map_or(0, |idx| idx + 1);
        let name = &self.0[start..];
        match self.generic_definition() {
            Some(definition) => &name[..definition.0.len().saturating_sub(start)],
            None => name,
        }
    }
}

impl Display for Symbol {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for Symbol {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    #[inline]
    fn from(val: &str) -> Self {
        Self(val.to_owned())
    }
}

impl From<String> for Symbol {
    #[inline]
    fn from(val: String) -> Self {
        Self(val)
    }
}

impl From<&Symbol> for Symbol {
    #[inline]
    fn from(val: &Symbol) -> Self {
        val.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_and_name() {
        let symbol = Symbol::from("Game.Entities.Player");
        assert_eq!(symbol.namespace(), Some("Game.Entities"));
        assert_eq!(symbol.simple_name(), "Player");

        let global = Symbol::from("Player");
        assert_eq!(global.namespace(), None);
        assert_eq!(global.simple_name(), "Player");
    }

    #[test]
    fn test_nested_type_name() {
        let symbol = Symbol::from("Game.World+Chunk");
        assert_eq!(symbol.namespace(), Some("Game"));
        assert_eq!(symbol.simple_name(), "Chunk");
    }

    #[test]
    fn test_array_names() {
        let element = Symbol::from("System.Int32");
        let array = Symbol::array_of(&element);
        assert_eq!(array.as_str(), "System.Int32[]");
        assert_eq!(array.array_element(), Some(element));
        assert_eq!(array.simple_name(), "Int32[]");
        assert_eq!(array.namespace(), Some("System"));
        assert_eq!(Symbol::from("[]").array_element(), None);
    }

    #[test]
    fn test_generic_names() {
        let definition = Symbol::from("Hostbridge.Interop.NativeArray`1");
        let constructed = Symbol::generic(&definition, &[Symbol::from("Game.Vec3")]);
        assert_eq!(
            constructed.as_str(),
            "Hostbridge.Interop.NativeArray`1[[Game.Vec3]]"
        );
        assert_eq!(constructed.generic_definition(), Some(definition));
        assert_eq!(constructed.generic_arguments(), vec![Symbol::from("Game.Vec3")]);
        assert_eq!(constructed.namespace(), Some("Hostbridge.Interop"));
        assert_eq!(constructed.simple_name(), "NativeArray`1");
    }

    #[test]
    fn test_nested_generic_arguments() {
        let inner = Symbol::generic(&Symbol::from("Sys.Box`1"), &[Symbol::from("Sys.Int32")]);
        let outer = Symbol::generic(
            &Symbol::from("Sys.Pair`2"),
            &[inner.clone(), Symbol::from("Sys.String")],
        );
        assert_eq!(
            outer.generic_arguments(),
            vec![inner, Symbol::from("Sys.String")]
        );
        assert!(Symbol::from("Sys.Int32[]").generic_arguments().is_empty());
    }
}
