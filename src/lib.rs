//! Native bridge to a managed object model.
//!
//! The `cdylib` exports the `hostbridge_*` C entry points from
//! [`runtime::exports`]; Rust hosts can use the crates directly.

pub use hostbridge_abi as abi;
pub use hostbridge_marshal as marshal;
pub use hostbridge_runtime as runtime;
pub use hostbridge_symbol as symbol;
pub use hostbridge_ty as ty;
pub use hostbridge_utils as utils;

pub use hostbridge_runtime::exports::{BridgeExports, bridge, hostbridge_exports};
pub use hostbridge_runtime::{Bridge, BridgeConfig, BridgeError};
