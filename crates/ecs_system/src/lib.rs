//! # ecs_system
//!
//! The "S" of the ECS runtime.
//!
//! - [`System`]: the trait processing units implement.
//! - [`SystemRegistry`]: owns one instance per system type, its required
//!   signature, and its working set of matching entities.
//!
//! Systems never see entities that do not match: the registry re-evaluates
//! membership whenever the coordinator reports an entity's new signature.

pub mod error;
pub mod registry;
pub mod system;

pub use error::SystemError;
pub use registry::SystemRegistry;
pub use system::System;
