//!
//! # Kubernetes spec types
//!
//! Resource objects as they appear in spec files, the actions that can be
//! requested against them, and the static kind registry that drives scope,
//! plural and apply order decisions.
//!
mod action;
mod format;
mod object;
mod registry;
mod scope;

pub use self::action::*;
pub use self::format::*;
pub use self::object::*;
pub use self::registry::*;
pub use self::scope::*;

pub const CORE_GROUP: &str = "core";
pub const SECRET_KIND: &str = "Secret";
