use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hostbridge_abi::{ObjectHandle, TypeHandle};
use hostbridge_symbol::Symbol;
use hostbridge_ty::Value;
use parking_lot::RwLock;

/// A live instance reachable from native code only through its handle.
pub struct ManagedObject {
    pub type_handle: TypeHandle,
    pub type_name: Symbol,
    value: RwLock<Value>,
}

impl ManagedObject {
    pub fn field(&self, name: &str) -> Option<Value> {
        self.value.read().field(name).cloned()
    }

    /// Replaces an existing field. Returns false when there is no such field.
    pub fn set_field(&self, name: &str, value: Value) -> bool {
        match self.value.write().field_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Handle table of live objects. Handles are nonzero and never reused.
pub struct ObjectHeap {
    next_handle: AtomicU64,
    objects: RwLock<HashMap<u64, Arc<ManagedObject>>>,
}

impl Default for ObjectHeap {
    fn default() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            objects: RwLock::new(HashMap::new()),
        }
    }
}

impl ObjectHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, type_handle: TypeHandle, type_name: Symbol, value: Value) -> ObjectHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let object = Arc::new(ManagedObject {
            type_handle,
            type_name,
            value: RwLock::new(value),
        });
        self.objects.write().insert(handle, object);
        ObjectHandle(handle)
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<Arc<ManagedObject>> {
        self.objects.read().get(&handle.0).cloned()
    }

    pub fn release(&self, handle: ObjectHandle) -> bool {
        self.objects.write().remove(&handle.0).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_value() -> Value {
        Value::Struct {
            fields: vec![("Health".into(), Value::I32(100))],
        }
    }

    #[test]
    fn test_insert_get_release() {
        let heap = ObjectHeap::new();
        let handle = heap.insert(TypeHandle(4), Symbol::from("Game.Player"), object_value());
        assert!(!handle.is_null());
        let object = heap.get(handle).unwrap();
        assert_eq!(object.type_name.as_str(), "Game.Player");
        assert!(heap.release(handle));
        assert!(!heap.release(handle));
        assert!(heap.get(handle).is_none());
        assert!(heap.is_empty());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let heap = ObjectHeap::new();
        let first = heap.insert(TypeHandle(1), Symbol::from("A"), Value::Null);
        heap.release(first);
        let second = heap.insert(TypeHandle(1), Symbol::from("A"), Value::Null);
        assert_ne!(first, second);
    }

    #[test]
    fn test_field_update() {
        let heap = ObjectHeap::new();
        let handle = heap.insert(TypeHandle(4), Symbol::from("Game.Player"), object_value());
        let object = heap.get(handle).unwrap();
        assert!(object.set_field("Health", Value::I32(7)));
        assert!(!object.set_field("Mana", Value::I32(7)));
        assert_eq!(object.field("Health"), Some(Value::I32(7)));
    }
}
