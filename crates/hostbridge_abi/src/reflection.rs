use crate::string::NativeString;

#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeVisibility {
    #[default]
    Public = 0,
    Private = 1,
    Protected = 2,
    Internal = 3,
    ProtectedPublic = 4,
    PrivateProtected = 5,
}

/// Reflection summary of one type. Every string is native-owned once
/// written out; a null `base_type_name` means the type has no base.
#[repr(C)]
#[derive(Debug, Default)]
pub struct ReflectionType {
    pub full_name: NativeString,
    pub name: NativeString,
    pub namespace: NativeString,
    pub base_type_name: NativeString,
    pub assembly_qualified_name: NativeString,
    _padding: usize,
}

impl ReflectionType {
    pub const fn new(
        full_name: NativeString,
        name: NativeString,
        namespace: NativeString,
        base_type_name: NativeString,
        assembly_qualified_name: NativeString,
    ) -> Self {
        Self {
            full_name,
            name,
            namespace,
            base_type_name,
            assembly_qualified_name,
            _padding: 0,
        }
    }

    /// # Safety
    /// Every non-null string must have been produced by the bridge and not
    /// released elsewhere.
    pub unsafe fn release(&mut self) {
        unsafe {
            self.full_name.release();
            self.name.release();
            self.namespace.release();
            self.base_type_name.release();
            self.assembly_qualified_name.release();
        }
    }
}

#[repr(C)]
#[derive(Debug, Default)]
pub struct MemberDescriptor {
    pub name: NativeString,
    pub visibility: TypeVisibility,
}

impl MemberDescriptor {
    /// # Safety
    /// See [`NativeString::release`].
    pub unsafe fn release(&mut self) {
        unsafe { self.name.release() };
    }
}
