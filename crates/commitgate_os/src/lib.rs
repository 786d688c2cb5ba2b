#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod update;
pub mod verifier;

pub use config::{ConfigError, CurrentValueBinding, RecordUpdateConfig};
pub use error::{RegistryError, UnauthorizedReason, UpdateError};
pub use registry::ControllerRegistry;
pub use update::RecordUpdateRuntime;
