// Adapters layer: concrete implementations of the domain ports (http lookup, form fields).

pub mod memory;
pub mod viacep;

pub use memory::InMemoryField;
pub use viacep::{ViaCepClient, DEFAULT_BASE_URL};
