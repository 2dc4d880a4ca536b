//! Delivery of internal faults to the native side.

use core::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use hostbridge_abi::NativeString;
use parking_lot::Mutex;
use tracing::{error, warn};

use crate::error::BridgeError;

/// Receives one owned message per failing operation. The receiver releases
/// it with `hostbridge_native_string_free`.
pub type FaultCallback = unsafe extern "C" fn(message: NativeString);

pub trait FaultSink {
    fn report(&self, operation: &str, error: &BridgeError);
}

/// Single-slot, process-wide callback registration.
///
/// With no callback registered faults are only logged.
pub struct FaultChannel {
    slot: AtomicPtr<()>,
    include_operation: AtomicBool,
}

impl Default for FaultChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultChannel {
    pub const fn new() -> Self {
        Self {
            slot: AtomicPtr::new(ptr::null_mut()),
            include_operation: AtomicBool::new(true),
        }
    }

    pub fn set_include_operation(&self, include: bool) {
        self.include_operation.store(include, Ordering::Relaxed);
    }

    /// Replaces the registered callback and returns the previous one.
    pub fn set_callback(&self, callback: Option<FaultCallback>) -> Option<FaultCallback> {
        let raw = callback.map_or(ptr::null_mut(), |callback| callback as *mut ());
        let previous = self.slot.swap(raw, Ordering::AcqRel);
        // SAFETY: the slot only ever holds null or a `FaultCallback`.
        (!previous.is_null())
            .then(|| unsafe { core::mem::transmute::<*mut (), FaultCallback>(previous) })
    }

    pub fn callback(&self) -> Option<FaultCallback> {
        let raw = self.slot.load(Ordering::Acquire);
        // SAFETY: see `set_callback`.
        (!raw.is_null()).then(|| unsafe { core::mem::transmute::<*mut (), FaultCallback>(raw) })
    }

    pub fn format(&self, operation: &str, error: &BridgeError) -> String {
        if self.include_operation.load(Ordering::Relaxed) {
            format!("{operation}: {error}")
        } else {
            error.to_string()
        }
    }
}

impl FaultSink for FaultChannel {
    fn report(&self, operation: &str, error: &BridgeError) {
        warn!(operation, "bridge fault: {error}");
        let Some(callback) = self.callback() else {
            return;
        };
        match NativeString::new(&self.format(operation, error)) {
            // SAFETY: the registrant guarantees the callback is callable.
            Ok(message) => unsafe { callback(message) },
            Err(err) => error!(operation, "dropping fault message: {err}"),
        }
    }
}

/// Collects formatted fault messages in memory.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl FaultSink for RecordingSink {
    fn report(&self, operation: &str, error: &BridgeError) {
        self.messages.lock().push(format!("{operation}: {error}"));
    }
}
