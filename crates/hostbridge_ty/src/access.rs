//! Member access levels and their mapping to [`TypeVisibility`].

use hostbridge_abi::TypeVisibility;

/// Member access as encoded in the low three bits of member attributes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MemberAccess {
    CompilerControlled = 0,
    Private = 1,
    FamilyAndAssembly = 2,
    Assembly = 3,
    Family = 4,
    FamilyOrAssembly = 5,
    #[default]
    Public = 6,
}

impl MemberAccess {
    pub const MASK: u32 = 0x7;

    /// Decodes the access bits; the unused value `7` gives `None`.
    pub const fn from_attributes(attributes: u32) -> Option<Self> {
        match attributes & Self::MASK {
            0 => Some(Self::CompilerControlled),
            1 => Some(Self::Private),
            2 => Some(Self::FamilyAndAssembly),
            3 => Some(Self::Assembly),
            4 => Some(Self::Family),
            5 => Some(Self::FamilyOrAssembly),
            6 => Some(Self::Public),
            _ => None,
        }
    }

    /// The visibility this access level maps to, if it has one.
    pub const fn explicit_visibility(self) -> Option<TypeVisibility> {
        match self {
            Self::Public => Some(TypeVisibility::Public),
            Self::Private => Some(TypeVisibility::Private),
            Self::Family => Some(TypeVisibility::Protected),
            Self::Assembly => Some(TypeVisibility::Internal),
            Self::FamilyOrAssembly => Some(TypeVisibility::ProtectedPublic),
            Self::FamilyAndAssembly => Some(TypeVisibility::PrivateProtected),
            Self::CompilerControlled => None,
        }
    }

    #[inline]
    pub const fn visibility(self) -> TypeVisibility {
        match self.explicit_visibility() {
            Some(visibility) => visibility,
            None => TypeVisibility::Public,
        }
    }

    #[inline]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// Classifies raw member attributes. Unmapped values fall back to public.
pub const fn classify_attributes(attributes: u32) -> TypeVisibility {
    match MemberAccess::from_attributes(attributes) {
        Some(access) => access.visibility(),
        None => TypeVisibility::Public,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        assert_eq!(MemberAccess::Public.visibility(), TypeVisibility::Public);
        assert_eq!(MemberAccess::Private.visibility(), TypeVisibility::Private);
        assert_eq!(MemberAccess::Family.visibility(), TypeVisibility::Protected);
        assert_eq!(MemberAccess::Assembly.visibility(), TypeVisibility::Internal);
        assert_eq!(
            MemberAccess::FamilyOrAssembly.visibility(),
            TypeVisibility::ProtectedPublic
        );
        assert_eq!(
            MemberAccess::FamilyAndAssembly.visibility(),
            TypeVisibility::PrivateProtected
        );
    }

    #[test]
    fn test_fallback_reachable_only_from_unmapped_values() {
        let fallbacks = (0..=MemberAccess::MASK)
            .filter(|bits| {
                MemberAccess::from_attributes(*bits)
                    .and_then(MemberAccess::explicit_visibility)
                    .is_none()
            })
            .collect::<Vec<_>>();
        assert_eq!(fallbacks, vec![0, 7]);
        assert_eq!(classify_attributes(0), TypeVisibility::Public);
        assert_eq!(classify_attributes(7), TypeVisibility::Public);
    }

    #[test]
    fn test_classification_ignores_high_bits() {
        assert_eq!(classify_attributes(0x0010 | 1), TypeVisibility::Private);
        assert_eq!(classify_attributes(0x8000 | 4), classify_attributes(4));
    }
}
