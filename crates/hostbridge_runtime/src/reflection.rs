//! Construction of the native reflection descriptors.
//!
//! Every descriptor is built completely before it is handed out; a failed
//! allocation releases whatever was already built.

use hostbridge_abi::{AllocError, MemberDescriptor, NativeString, ReflectionType, TypeVisibility};
use hostbridge_symbol::Symbol;
use hostbridge_ty::TypeInfo;

fn build_strings<const N: usize>(texts: [Option<&str>; N]) -> Result<[NativeString; N], AllocError> {
    let mut built: [NativeString; N] = core::array::from_fn(|_| NativeString::null());
    for (idx, text) in texts.into_iter().enumerate() {
        match NativeString::from_option(text) {
            Ok(string) => built[idx] = string,
            Err(err) => {
                for string in &mut built[..idx] {
                    // SAFETY: produced above and never published.
                    unsafe { string.release() };
                }
                return Err(err);
            }
        }
    }
    Ok(built)
}

pub fn build_reflection_type(info: &TypeInfo) -> Result<ReflectionType, AllocError> {
    let qualified = info.assembly_qualified_name();
    let [full_name, name, namespace, base, qualified] = build_strings([
        Some(info.name.as_str()),
        Some(info.name.simple_name()),
        info.name.namespace(),
        info.base.as_ref().map(Symbol::as_str),
        Some(qualified.as_str()),
    ])?;
    Ok(ReflectionType::new(full_name, name, namespace, base, qualified))
}

pub fn build_member_descriptors<'a, I>(members: I) -> Result<Vec<MemberDescriptor>, AllocError>
where
    I: IntoIterator<Item = (&'a str, TypeVisibility)>,
{
    let mut descriptors: Vec<MemberDescriptor> = Vec::new();
    for (name, visibility) in members {
        match NativeString::new(name) {
            Ok(name) => descriptors.push(MemberDescriptor { name, visibility }),
            Err(err) => {
                for descriptor in &mut descriptors {
                    // SAFETY: produced above and never published.
                    unsafe { descriptor.release() };
                }
                return Err(err);
            }
        }
    }
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use hostbridge_ty::{TypeBuilder, TypeDirectory};

    use super::*;

    fn text(string: &NativeString) -> Option<String> {
        unsafe { string.to_string_lossy() }
    }

    #[test]
    fn test_descriptor_fields() {
        let directory = TypeDirectory::new();
        directory.bootstrap(true);
        directory
            .define(TypeBuilder::class("Game.Entities.Player").assembly("Game"))
            .unwrap();
        let info = directory.resolve("Game.Entities.Player").unwrap();

        let mut descriptor = build_reflection_type(&info).unwrap();
        assert_eq!(text(&descriptor.full_name).as_deref(), Some("Game.Entities.Player"));
        assert_eq!(text(&descriptor.name).as_deref(), Some("Player"));
        assert_eq!(text(&descriptor.namespace).as_deref(), Some("Game.Entities"));
        assert_eq!(text(&descriptor.base_type_name).as_deref(), Some("System.Object"));
        assert_eq!(
            text(&descriptor.assembly_qualified_name).as_deref(),
            Some("Game.Entities.Player, Game")
        );
        unsafe { descriptor.release() };
    }

    #[test]
    fn test_root_type_has_null_base() {
        let directory = TypeDirectory::new();
        directory.bootstrap(true);
        let object = directory.resolve("System.Object").unwrap();
        let mut descriptor = build_reflection_type(&object).unwrap();
        assert!(descriptor.base_type_name.is_null());
        assert!(!descriptor.full_name.is_null());
        unsafe { descriptor.release() };
    }

    #[test]
    fn test_member_descriptors_keep_order() {
        let mut descriptors = build_member_descriptors([
            ("a", TypeVisibility::Public),
            ("b", TypeVisibility::Private),
        ])
        .unwrap();
        assert_eq!(text(&descriptors[1].name).as_deref(), Some("b"));
        assert_eq!(descriptors[1].visibility, TypeVisibility::Private);
        for descriptor in &mut descriptors {
            unsafe { descriptor.release() };
        }
    }
}
