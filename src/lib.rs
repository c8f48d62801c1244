pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{InMemoryField, ViaCepClient};
pub use config::toml_config::TomlConfig;
pub use core::binder::{AddressForm, BlurOutcome, CepBinder};
pub use core::mask::{format_cep, normalize_cep};
pub use domain::model::{Address, FieldKind, PostalCode, SequencePolicy};
pub use utils::error::{CepError, Result};
