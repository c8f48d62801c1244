pub mod binder;
pub mod mask;

pub use crate::domain::model::{Address, FieldKind, PostalCode, SequencePolicy};
pub use crate::domain::ports::{AddressLookup, ConfigProvider, FormField};
pub use crate::utils::error::Result;
