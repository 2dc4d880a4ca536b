use hostbridge_symbol::Symbol;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("no type is registered for handle {0}")]
    UnknownHandle(u64),
    #[error("type `{0}` cannot be constructed")]
    NotConstructible(Symbol),
    #[error("type `{ty}` has no constructor taking {arity} argument(s)")]
    NoMatchingConstructor { ty: Symbol, arity: usize },
    #[error("argument `{parameter}` of `{ty}` expects {expected}, found {found}")]
    ArgumentMismatch {
        ty: Symbol,
        parameter: String,
        expected: String,
        found: &'static str,
    },
    #[error("member `{member}` of `{ty}` has unresolved type `{member_type}`")]
    UnresolvedMember {
        ty: Symbol,
        member: String,
        member_type: Symbol,
    },
}
