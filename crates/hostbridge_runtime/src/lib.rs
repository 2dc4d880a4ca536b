//! The boundary side of the bridge: reflection descriptors, the fault
//! channel, live objects and the `extern "C"` surface.

pub mod bridge;
pub mod config;
pub mod error;
pub mod exports;
pub mod fault;
pub mod heap;
pub mod reflection;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use error::BridgeError;
pub use fault::{FaultCallback, FaultChannel, FaultSink, RecordingSink};
pub use heap::{ManagedObject, ObjectHeap};
