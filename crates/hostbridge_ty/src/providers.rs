use crate::corelib::BUILTIN_PROVIDERS;
use crate::directory::TypeDirectory;

/// Registers the types of one namespace, either at bootstrap or on the first
/// lookup that misses inside it.
#[derive(Clone, Copy)]
pub struct TypeProvider {
    pub namespace: &'static str,
    pub autoload: bool,
    pub register: fn(&TypeDirectory),
}

inventory::collect!(crate::providers::TypeProvider);

impl TypeDirectory {
    /// Installs the core library plus every provider submitted through
    /// `inventory`. With `autoload` off every namespace starts lazy.
    pub fn bootstrap(&self, autoload: bool) {
        for provider in BUILTIN_PROVIDERS
            .iter()
            .chain(inventory::iter::<TypeProvider>)
        {
            if provider.autoload && autoload {
                self.mark_namespace_active(provider.namespace);
                (provider.register)(self);
            } else {
                self.register_lazy_namespace(provider.namespace, provider.register);
            }
        }
    }
}
