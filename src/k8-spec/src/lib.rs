mod basename;
mod builder;
mod error;
mod matcher;
mod secret;
mod serialize;
mod uri;

pub use self::basename::*;
pub use self::builder::*;
pub use self::error::SpecError;
pub use self::matcher::*;
pub use self::secret::*;
pub use self::serialize::*;
pub use self::uri::*;

pub mod types {
    pub use k8_spec_types::*;
}
